use std::collections::HashSet;

/// Clean problem fragments (heads, options, explanations).
#[must_use]
pub fn sanitize_html(html: &str) -> String {
    let tags: HashSet<&str> = [
        "p", "div", "span", "br", "em", "strong", "b", "i", "u", "sub", "sup", "code", "ruby",
        "rt", "rp", "small",
    ]
    .into_iter()
    .collect();

    ammonia::Builder::new()
        .tags(tags)
        .generic_attributes(["class"].into_iter().collect())
        .clean(html)
        .to_string()
}

/// Clean a stored session snapshot, keeping the markup the exam view emits.
#[must_use]
pub fn sanitize_snapshot(html: &str) -> String {
    let mut builder = ammonia::Builder::default();
    builder
        .add_tags(["input", "label"])
        .add_generic_attributes([
            "class",
            "id",
            "role",
            "aria-label",
            "aria-valuenow",
            "aria-valuemin",
            "aria-valuemax",
        ])
        .add_tag_attributes("input", ["type", "name", "value", "checked", "disabled"])
        .add_tag_attributes("label", ["for"])
        .add_tag_attributes("div", ["style"])
        .filter_style_properties(["width"].into_iter().collect());
    builder.clean(html).to_string()
}

use async_trait::async_trait;

/// Contents of a yes/no prompt. `body` may carry inline HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub title: String,
    pub body: String,
}

impl ConfirmRequest {
    #[must_use]
    pub fn restart() -> Self {
        Self {
            title: "确认".to_string(),
            body: r#"确认<span class="text-danger">重新开始</span>测试？"#.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmDecision {
    Yes,
    /// Covers both "No" and dismissing the prompt.
    No,
}

/// Asks the user to confirm a destructive action.
#[async_trait(?Send)]
pub trait ConfirmPrompt {
    async fn confirm(&self, request: &ConfirmRequest) -> ConfirmDecision;
}

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use quiz_core::model::{HistoryTag, TestName, TestTypeId, ValidSelection};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::repository::{
    CatalogRepository, HistoryRepository, ProblemRecord, ProblemRepository, Storage, StorageError,
};

pub mod wire;

pub use wire::{HistoryPayload, LEGACY_SUCCESS, interpret_save_response};

/// Connection settings for the quiz server.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl HttpConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://127.0.0.1:3733";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HttpInitError {
    #[error("server url cannot carry a path: {0}")]
    InvalidUrl(String),
    #[error(transparent)]
    Client(#[from] reqwest::Error),
}

/// Repository backed by the quiz server's HTTP endpoints.
#[derive(Clone)]
pub struct HttpRepository {
    client: Client,
    config: HttpConfig,
}

impl HttpRepository {
    /// Build the HTTP client for the given server.
    ///
    /// # Errors
    ///
    /// Returns `HttpInitError::InvalidUrl` for URLs without a path (e.g. `mailto:`)
    /// and `HttpInitError::Client` if the TLS backend cannot be initialised.
    pub fn connect(config: HttpConfig) -> Result<Self, HttpInitError> {
        if config.base_url.cannot_be_a_base() {
            return Err(HttpInitError::InvalidUrl(config.base_url.to_string()));
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the base URL cannot carry a path.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, StorageError> {
        let mut url = self.config.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                StorageError::Connection(format!("invalid base url {}", self.config.base_url))
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<Response, StorageError> {
        log::debug!("GET {url}");
        let response = self.client.get(url).send().await.map_err(transport)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound);
        }
        check_status(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, StorageError> {
        self.get(url).await?.json::<T>().await.map_err(transport)
    }
}

async fn check_status(response: Response) -> Result<Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let detail = response.text().await.unwrap_or_default();
    let detail = if detail.trim().is_empty() {
        status.canonical_reason().unwrap_or("unknown").to_string()
    } else {
        detail
    };
    Err(StorageError::Http {
        status: status.as_u16(),
        detail,
    })
}

fn transport(err: reqwest::Error) -> StorageError {
    if err.is_decode() {
        StorageError::Serialization(err.to_string())
    } else {
        StorageError::Connection(err.to_string())
    }
}

#[async_trait]
impl ProblemRepository for HttpRepository {
    async fn fetch_problems(
        &self,
        selection: &ValidSelection,
        count: usize,
    ) -> Result<Vec<ProblemRecord>, StorageError> {
        let url = self.endpoint(&[
            "exam",
            &selection.test_type().to_string(),
            selection.test_name().as_str(),
            &count.to_string(),
        ])?;
        self.get_json(url).await
    }
}

#[async_trait]
impl HistoryRepository for HttpRepository {
    async fn save_history(
        &self,
        selection: &ValidSelection,
        snapshot_html: &str,
    ) -> Result<(), StorageError> {
        let url = self.endpoint(&["save_history"])?;
        log::debug!("POST {url} ({} bytes)", snapshot_html.len());
        let payload = HistoryPayload::new(selection, snapshot_html);
        let response = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(transport)?;
        let body = check_status(response)
            .await?
            .text()
            .await
            .map_err(transport)?;
        interpret_save_response(&body)
    }

    async fn list_history(
        &self,
        selection: &ValidSelection,
    ) -> Result<Vec<HistoryTag>, StorageError> {
        let url = self.endpoint(&[
            "list_history",
            &selection.test_type().to_string(),
            selection.test_name().as_str(),
        ])?;
        let raw: Vec<String> = self.get_json(url).await?;
        let mut tags: Vec<_> = raw.into_iter().filter_map(HistoryTag::new).collect();
        tags.sort();
        Ok(tags)
    }

    async fn load_history(
        &self,
        selection: &ValidSelection,
        tag: &HistoryTag,
    ) -> Result<String, StorageError> {
        let file = format!("{tag}.html");
        let url = self.endpoint(&[
            "history",
            &selection.test_type().to_string(),
            selection.test_name().as_str(),
            &file,
        ])?;
        self.get(url).await?.text().await.map_err(transport)
    }
}

#[async_trait]
impl CatalogRepository for HttpRepository {
    async fn list_test_names(&self, test_type: TestTypeId) -> Result<Vec<TestName>, StorageError> {
        let url = self.endpoint(&["card", "test_name_option", &test_type.to_string()])?;
        let raw: Vec<String> = self.get_json(url).await?;
        Ok(raw.into_iter().filter_map(TestName::new).collect())
    }
}

impl Storage {
    #[must_use]
    pub fn http(repo: HttpRepository) -> Self {
        let problems: Arc<dyn ProblemRepository> = Arc::new(repo.clone());
        let history: Arc<dyn HistoryRepository> = Arc::new(repo.clone());
        let catalog: Arc<dyn CatalogRepository> = Arc::new(repo);
        Self {
            problems,
            history,
            catalog,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(base: &str) -> HttpRepository {
        HttpRepository::connect(HttpConfig::new(Url::parse(base).unwrap())).unwrap()
    }

    #[test]
    fn endpoint_encodes_segments() {
        let repo = repo(HttpConfig::DEFAULT_BASE_URL);
        let url = repo.endpoint(&["exam", "1", "a b", "10"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:3733/exam/1/a%20b/10");
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let repo = repo("http://quiz.local/app/");
        let url = repo.endpoint(&["save_history"]).unwrap();
        assert_eq!(url.as_str(), "http://quiz.local/app/save_history");
    }

    #[test]
    fn connect_rejects_pathless_urls() {
        let config = HttpConfig::new(Url::parse("mailto:someone@example.com").unwrap());
        assert!(matches!(
            HttpRepository::connect(config),
            Err(HttpInitError::InvalidUrl(_))
        ));
    }

    fn radicals() -> ValidSelection {
        ValidSelection::new(TestTypeId::CLUSTERING, TestName::new("部首").unwrap())
    }

    async fn save_against(status: usize, body: &str) -> Result<(), StorageError> {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/save_history")
            .with_status(status)
            .with_body(body)
            .create_async()
            .await;
        repo(&server.url())
            .save_history(&radicals(), "<div></div>")
            .await
    }

    #[tokio::test]
    async fn save_maps_server_error_to_http_status() {
        let err = save_against(500, "Internal Server Error").await.unwrap_err();
        assert!(
            matches!(&err, StorageError::Http { status: 500, detail } if detail == "Internal Server Error"),
            "unexpected {err:?}"
        );
    }

    #[tokio::test]
    async fn save_accepts_legacy_success_string() {
        assert!(save_against(200, r#""保存成功""#).await.is_ok());
    }

    #[tokio::test]
    async fn save_maps_typed_error_to_rejected() {
        let err = save_against(200, r#"{"status":"error","detail":"disk full"}"#)
            .await
            .unwrap_err();
        assert!(
            matches!(&err, StorageError::Rejected(detail) if detail == "disk full"),
            "unexpected {err:?}"
        );
    }

    #[tokio::test]
    async fn save_posts_payload_fields() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/save_history")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "typ": "1",
                "name": "部首",
                "data": "<div></div>",
            })))
            .with_status(200)
            .with_body(r#"{"status":"ok"}"#)
            .create_async()
            .await;
        repo(&server.url())
            .save_history(&radicals(), "<div></div>")
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_test_maps_to_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(404)
            .create_async()
            .await;
        let err = repo(&server.url())
            .fetch_problems(&radicals(), 10)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound), "unexpected {err:?}");
    }
}

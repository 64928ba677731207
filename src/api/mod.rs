use crate::internal::categories::ALL_CATEGORIES;
use crate::internal::models::{Category, StatsSnapshot, StoryItem, Suggestion, UpdateResponse};
use crate::internal::stats::StatsTab;
use anyhow::{Context, Result};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

/// HTTP client for the news backend.
///
/// Every endpoint is a GET that returns JSON. The public fetch methods never
/// fail: transport errors, non-2xx statuses and malformed bodies are logged
/// with their full `anyhow` context and surface to callers as `None`.
#[derive(Clone, Debug)]
pub struct ApiService {
    client: Client,
    base_url: String,
    log_timings: bool,
}

impl ApiService {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            log_timings: false,
        })
    }

    /// Client with default settings pointed at `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            log_timings: false,
        }
    }

    pub fn with_performance_metrics(mut self, enabled: bool) -> Self {
        self.log_timings = enabled;
        self
    }

    /// Absolute URL for `path` with the given query pairs.
    pub fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let raw = format!("{}{}", self.base_url, path);
        let mut url = Url::parse(&raw).with_context(|| format!("invalid endpoint url {}", raw))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// GET `url` and deserialize the JSON body into `T`.
    async fn get_json<T>(&self, url: Url) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("failed to send GET request to {}", url))?
            .error_for_status()
            .with_context(|| format!("unexpected status from {}", url))?;

        resp.json::<T>()
            .await
            .with_context(|| format!("failed to parse JSON response from {}", url))
    }

    /// Fetch helper: any failure is logged and becomes `None`.
    #[tracing::instrument(skip(self, query), level = "debug")]
    pub async fn fetch<T>(&self, path: &str, query: &[(&str, &str)]) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let start = Instant::now();
        let result = match self.endpoint(path, query) {
            Ok(url) => self.get_json(url).await,
            Err(e) => Err(e),
        };

        if self.log_timings {
            tracing::debug!(path, elapsed = ?start.elapsed(), ok = result.is_ok(), "fetch");
        }

        match result {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Error fetching data from {}: {:#}", path, e);
                None
            }
        }
    }

    pub async fn categories(&self) -> Option<Vec<Category>> {
        self.fetch("/categories", &[]).await
    }

    /// Stories for a category; "all" omits the filter.
    pub async fn news(&self, category: &str) -> Option<Vec<StoryItem>> {
        match category == ALL_CATEGORIES {
            true => self.fetch("/news", &[]).await,
            false => self.fetch("/news", &[("category", category)]).await,
        }
    }

    pub async fn search(&self, query: &str, category: &str) -> Option<Vec<StoryItem>> {
        match category == ALL_CATEGORIES {
            true => self.fetch("/search", &[("q", query)]).await,
            false => {
                self.fetch("/search", &[("q", query), ("category", category)])
                    .await
            }
        }
    }

    pub async fn autocomplete(&self, query: &str) -> Option<Vec<Suggestion>> {
        self.fetch("/autocomplete", &[("q", query)]).await
    }

    pub async fn stats(&self) -> Option<StatsSnapshot> {
        self.fetch("/stats", &[]).await
    }

    pub async fn top_stories(&self, tab: StatsTab) -> Option<Vec<StoryItem>> {
        let path = match tab {
            StatsTab::Recent => "/stats/top-recent",
            StatsTab::AllTime => "/stats/top-alltime",
        };
        self.fetch(path, &[]).await
    }

    /// Ask the backend to sync with Hacker News. Side-effecting.
    pub async fn update(&self) -> Option<UpdateResponse> {
        self.fetch("/update", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn endpoint_encodes_query_pairs() {
        let api = ApiService::with_base_url("http://localhost:5001/");
        let url = api
            .endpoint("/search", &[("q", "rust & go"), ("category", "Ask HN")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5001/search?q=rust+%26+go&category=Ask+HN"
        );
    }

    #[test]
    fn endpoint_without_query_has_no_question_mark() {
        let api = ApiService::with_base_url("http://localhost:5001");
        let url = api.endpoint("/news", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5001/news");
    }

    #[test]
    fn bad_base_url_is_an_error() {
        let api = ApiService::with_base_url("not a url");
        assert!(api.endpoint("/news", &[]).is_err());
    }

    #[tokio::test]
    async fn news_for_category_sends_filter() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/news")
            .match_query(Matcher::UrlEncoded("category".into(), "Programming".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": 1, "title": "Rust 2.0", "time": 100}]"#)
            .create_async()
            .await;

        let api = ApiService::with_base_url(server.url());
        let stories = api.news("Programming").await.unwrap();

        m.assert_async().await;
        assert_eq!(stories.len(), 1);
        assert_eq!(stories[0].title.as_deref(), Some("Rust 2.0"));
    }

    #[tokio::test]
    async fn http_error_becomes_none() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/stats")
            .with_status(500)
            .create_async()
            .await;

        let api = ApiService::with_base_url(server.url());
        assert!(api.stats().await.is_none());
    }

    #[tokio::test]
    async fn malformed_json_becomes_none() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/categories")
            .with_status(200)
            .with_body("{not json")
            .create_async()
            .await;

        let api = ApiService::with_base_url(server.url());
        assert!(api.categories().await.is_none());
    }

    #[tokio::test]
    async fn top_stories_hits_tab_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/stats/top-alltime")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let api = ApiService::with_base_url(server.url());
        assert_eq!(api.top_stories(StatsTab::AllTime).await, Some(Vec::new()));
        m.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_backend_becomes_none() {
        let api = ApiService::new("http://127.0.0.1:9", Some(Duration::from_millis(200))).unwrap();
        assert!(api.update().await.is_none());
    }
}

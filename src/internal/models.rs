use serde::Deserialize;

/// A story as returned by `/news`, `/search` and the `/stats/top-*` endpoints.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct StoryItem {
    #[serde(default)]
    pub id: Option<u64>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub by: Option<String>,
    pub score: Option<u32>,
    /// Unix seconds; the backend column is nullable.
    pub time: Option<i64>,
    pub descendants: Option<u32>,
    pub category: Option<String>,
}

/// A category name with its story count, as returned by `/categories` and `/stats`.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub count: i64,
}

impl Category {
    pub fn new(name: impl Into<String>, count: i64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct StatsSnapshot {
    #[serde(default)]
    pub total_stories: u64,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl StatsSnapshot {
    /// Count for a single category, zero when the backend did not report it.
    pub fn count_for(&self, name: &str) -> i64 {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}

/// One autocomplete candidate from `/autocomplete`.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub value: String,
}

/// Body of the `/update` trigger response.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct UpdateResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl UpdateResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// One front-page hit from the search API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Story {
    #[serde(rename = "objectID")]
    pub id: String,
    pub title: String,
    pub points: i64,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub num_comments: Option<u32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub hits: Vec<Story>,
}

/// Lifecycle of a single front-page request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FetchState {
    #[default]
    Loading,
    Error(String),
    Success(Vec<Story>),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }
}

// Self posts come back with either a null or an empty url
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let url = Option::<String>::deserialize(deserializer)?;
    Ok(url.filter(|u| !u.trim().is_empty()))
}

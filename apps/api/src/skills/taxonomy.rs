//! Skills-taxonomy search client (Lightcast). Each query returns candidate related
//! skills with an optional relevance score.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

const LIGHTCAST_SEARCH_URL: &str = "https://api.lightcast.io/v1/skills/search";

/// A related-skill candidate. `score` is absent when the service gives none.
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedSkill {
    pub name: String,
    pub score: Option<f64>,
}

#[async_trait]
pub trait SkillsTaxonomy: Send + Sync {
    /// `false` when the service cannot be reached at all (e.g. no credential);
    /// callers then skip querying.
    fn is_enabled(&self) -> bool {
        true
    }

    async fn search(&self, query: &str) -> Result<Vec<RelatedSkill>>;
}

pub struct LightcastClient {
    client: Client,
    api_key: Option<String>,
    search_url: String,
}

impl LightcastClient {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            search_url: LIGHTCAST_SEARCH_URL.to_string(),
        })
    }
}

#[async_trait]
impl SkillsTaxonomy for LightcastClient {
    fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search(&self, query: &str) -> Result<Vec<RelatedSkill>> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(Vec::new());
        };
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .get(&self.search_url)
            .query(&[("query", query)])
            .bearer_auth(api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            debug!("Lightcast search for '{query}' returned {}", response.status());
            return Ok(Vec::new());
        }

        let payload: Value = response.json().await?;
        Ok(parse_search_payload(&payload))
    }
}

/// Accepts `{"data": [...]}` or `{"results": [...]}`; names come from `name`,
/// `skill` or `label`, scores from `score`, `relevance` or `confidence` (numbers or
/// numeric strings).
pub fn parse_search_payload(payload: &Value) -> Vec<RelatedSkill> {
    let items = payload
        .get("data")
        .and_then(Value::as_array)
        .or_else(|| payload.get("results").and_then(Value::as_array));

    let Some(items) = items else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let item = item.as_object()?;
            let name = ["name", "skill", "label"]
                .iter()
                .find_map(|k| item.get(*k).and_then(Value::as_str))
                .map(str::trim)
                .filter(|n| !n.is_empty())?;
            let score = ["score", "relevance", "confidence"]
                .iter()
                .find_map(|k| item.get(*k))
                .and_then(numeric);
            Some(RelatedSkill {
                name: name.to_string(),
                score,
            })
        })
        .collect()
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

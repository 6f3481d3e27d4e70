//! Catalog documents returned by the content API
//!
//! Only the fields the client reads are typed; everything else the API
//! sends is kept in `extra` untouched.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Collection exposed by the REST API under `/api/<resource>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Destinations,
    Countries,
    Articles,
}

impl Resource {
    pub fn all() -> &'static [Resource] {
        &[Self::Destinations, Self::Countries, Self::Articles]
    }

    /// Path segment under `/api`
    pub fn id(&self) -> &'static str {
        match self {
            Self::Destinations => "destinations",
            Self::Countries => "countries",
            Self::Articles => "articles",
        }
    }

    pub fn from_id(id: &str) -> Result<Self, String> {
        match id.trim().to_lowercase().as_str() {
            "destinations" | "destination" => Ok(Self::Destinations),
            "countries" | "country" => Ok(Self::Countries),
            "articles" | "article" | "blog" => Ok(Self::Articles),
            _ => Err(format!(
                "Unknown resource '{}'. Valid options: destinations, countries, articles",
                id
            )),
        }
    }

    /// Collection path, e.g. `/api/destinations`
    pub fn collection_path(&self) -> String {
        format!("/api/{}", self.id())
    }

    /// Single document path, e.g. `/api/articles/42`
    pub fn item_path(&self, id: &str) -> String {
        format!("/api/{}/{}", self.id(), id)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A travel destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// A country grouping destinations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// A blog article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

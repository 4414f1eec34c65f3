use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::store::Collection;

/// Journal label used when a bottle's wine reference dangles.
pub const UNKNOWN_WINE_LABEL: &str = "Vin Inconnu";

/// Colour or family of a wine. Types this crate does not know keep their
/// stored spelling so a rewrite hands them back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WineType {
    #[default]
    Red,
    White,
    Rose,
    Sparkling,
    Sweet,
    Spirit,
    Other(String),
}

impl WineType {
    pub fn as_str(&self) -> &str {
        match self {
            WineType::Red => "RED",
            WineType::White => "WHITE",
            WineType::Rose => "ROSE",
            WineType::Sparkling => "SPARKLING",
            WineType::Sweet => "SWEET",
            WineType::Spirit => "SPIRIT",
            WineType::Other(raw) => raw,
        }
    }
}

impl From<String> for WineType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "RED" => WineType::Red,
            "WHITE" => WineType::White,
            "ROSE" => WineType::Rose,
            "SPARKLING" => WineType::Sparkling,
            "SWEET" => WineType::Sweet,
            "SPIRIT" => WineType::Spirit,
            _ => WineType::Other(raw),
        }
    }
}

impl From<WineType> for String {
    fn from(wine_type: WineType) -> Self {
        match wine_type {
            WineType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Reference entity owning zero or more bottles.
///
/// The ledger only reads wines (name, vintage, colour, favourite flag).
/// Fields it does not know about are kept in `extra` so rewriting the
/// collection never drops data written by other parts of the app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wine {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vintage: Option<i32>,
    #[serde(rename = "type", default)]
    pub wine_type: WineType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Wine {
    pub fn new(id: impl Into<String>, name: impl Into<String>, wine_type: WineType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            vintage: None,
            wine_type,
            producer: None,
            region: None,
            is_favorite: false,
            extra: Map::new(),
        }
    }

    pub fn with_vintage(mut self, vintage: i32) -> Self {
        self.vintage = Some(vintage);
        self
    }

    pub fn favorite(mut self) -> Self {
        self.is_favorite = true;
        self
    }

    /// Case-insensitive substring match on name or vintage.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        self.name.to_lowercase().contains(&needle)
            || self
                .vintage
                .is_some_and(|v| v.to_string().contains(&needle))
    }
}

impl Collection for Wine {
    const KEY: &'static str = "vf_wines";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Name of `wine_id` in `wines`, or the unknown-wine label.
pub fn wine_name(wines: &[Wine], wine_id: &str) -> String {
    wines
        .iter()
        .find(|w| w.id == wine_id)
        .map(|w| w.name.clone())
        .unwrap_or_else(|| UNKNOWN_WINE_LABEL.to_string())
}

//! Output document model for the media search index.
//!
//! These types represent the flat, fully derived documents handed to the
//! index-publishing layer. A [`Document`] is constructed once per source
//! row and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Orientation class derived from pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectRatio {
    Tall,
    Wide,
    Square,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tall => "tall",
            Self::Wide => "wide",
            Self::Square => "square",
        }
    }
}

/// Resolution band derived from pixel dimensions.
///
/// Band upper bounds are exclusive; `Large` is open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

impl SizeClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

/// One normalized tag. `accuracy` survives only when the source tag
/// carried it; all other source keys are dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tag {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

/// Fully normalized search document for one image row.
///
/// Invariants upheld by construction:
/// - `normalized_popularity`, `authority_boost`, and `authority_penalty`
///   are `None` or within `[0.0, 100.0]`.
/// - `aspect_ratio` and `size` are `None` iff height or width was null.
/// - `tags` is `None` for an empty or absent source tag list, never an
///   empty stand-in for "no tags".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// Copied from the row; doubles as the destination index identifier.
    pub id: i64,
    pub title: Option<String>,
    pub identifier: Option<String>,
    pub creator: Option<String>,
    pub creator_url: Option<String>,
    pub tags: Option<Vec<Tag>>,
    pub created_on: Option<DateTime<Utc>>,
    pub url: String,
    pub thumbnail: Option<String>,
    pub provider: Option<String>,
    pub source: String,
    /// Lower-cased license slug.
    pub license: String,
    pub license_version: Option<String>,
    pub foreign_landing_url: Option<String>,
    /// Metadata description, truncated to 2000 characters.
    pub description: Option<String>,
    /// Lower-cased file extension taken from `url`.
    pub extension: Option<String>,
    /// Supplied by the category classifier collaborator.
    pub categories: Option<Vec<String>>,
    pub aspect_ratio: Option<AspectRatio>,
    pub size: Option<SizeClass>,
    pub license_url: Option<String>,
    pub mature: bool,
    pub normalized_popularity: Option<f64>,
    pub authority_boost: Option<f64>,
    pub authority_penalty: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn enums_serialize_lowercase() {
        assert_eq!(serde_json::to_value(AspectRatio::Tall).unwrap(), json!("tall"));
        assert_eq!(serde_json::to_value(SizeClass::Medium).unwrap(), json!("medium"));
    }

    #[test]
    fn tag_omits_absent_accuracy() {
        let with = Tag {
            name: "cat".to_string(),
            accuracy: Some(0.9),
        };
        let without = Tag {
            name: "dog".to_string(),
            accuracy: None,
        };
        assert_eq!(
            serde_json::to_value(&with).unwrap(),
            json!({"name": "cat", "accuracy": 0.9})
        );
        assert_eq!(serde_json::to_value(&without).unwrap(), json!({"name": "dog"}));
    }
}

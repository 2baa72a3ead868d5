//! Row-to-document normalization rules.
//!
//! The heart of the crate: a pure, deterministic translation from one
//! raw source row (plus its schema) to one fully derived search
//! [`Document`]. Every derivation is a standalone function so each rule
//! is independently testable, and the whole translation is referentially
//! transparent — identical inputs always produce identical documents.
//!
//! Recovery policy mirrors the error taxonomy in [`crate::error`]:
//! required fields fail hard with a schema mismatch, optional fields and
//! malformed metadata degrade to null, and collaborator failures pass
//! through untouched.

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::trace;

use crate::error::Result;
use crate::models::{AspectRatio, Document, SizeClass, Tag};
use crate::policy::{AuthorityScorer, CategoryClassifier};
use crate::schema::{RowView, Schema};

/// Maximum characters kept from a metadata description.
const DESCRIPTION_MAX_CHARS: usize = 2000;

/// Exclusive resolution upper bound per size band, ascending. Checked in
/// order, first match wins; anything at or above the last bound is
/// [`SizeClass::Large`].
const SIZE_BANDS: [(i64, SizeClass); 2] = [
    (640 * 480, SizeClass::Small),
    (1600 * 900, SizeClass::Medium),
];

/// Score bounds for popularity and authority fields.
const SCORE_LOW: f64 = 0.0;
const SCORE_HIGH: f64 = 100.0;

/// Stand-in for a row with no usable metadata cell.
static NO_METADATA: Value = Value::Null;

/// Normalizes rows of one source table into search documents.
///
/// Implementations must be pure: no internal state, no side effects,
/// identical output for identical `(row, schema)` input. That makes
/// them safe to invoke concurrently across worker threads without
/// coordination.
pub trait DocumentNormalizer: Send + Sync {
    /// Source-of-truth table this normalizer understands (e.g. `"image"`).
    fn table(&self) -> &str;

    /// Convert one raw row and its schema into a search document.
    ///
    /// Fails with [`NormalizeError::SchemaMismatch`] when a required
    /// field is unusable, or passes a collaborator failure through.
    /// There is no partial output: the call either yields a complete
    /// document or none at all.
    ///
    /// [`NormalizeError::SchemaMismatch`]: crate::error::NormalizeError::SchemaMismatch
    fn normalize(&self, row: &[Value], schema: &Schema) -> Result<Document>;
}

/// Normalizer for the `image` table.
pub struct ImageNormalizer {
    categories: Arc<dyn CategoryClassifier>,
    authority: Arc<dyn AuthorityScorer>,
}

impl ImageNormalizer {
    pub fn new(categories: Arc<dyn CategoryClassifier>, authority: Arc<dyn AuthorityScorer>) -> Self {
        Self {
            categories,
            authority,
        }
    }
}

impl DocumentNormalizer for ImageNormalizer {
    fn table(&self) -> &str {
        "image"
    }

    fn normalize(&self, row: &[Value], schema: &Schema) -> Result<Document> {
        let view = RowView::new(row, schema);

        // Required fields have no sensible default; their absence fails
        // the whole record.
        let id = view.required_i64("id")?;
        let url = view.required_str("url")?.to_string();
        let source = view.required_str("source")?.to_string();
        let license = view.required_str("license")?.to_lowercase();

        let height = view.opt_i64("height");
        let width = view.opt_i64("width");
        let meta = view.cell("meta_data").unwrap_or(&NO_METADATA);
        let extension = parse_extension(&url);

        // Absence of the popularity column is distinguished from an
        // explicit score: no column means null, never zero.
        let normalized_popularity = if view.has_column("normalized_popularity") {
            view.opt_f64("normalized_popularity")
                .map(|p| constrain_between(p, SCORE_LOW, SCORE_HIGH))
        } else {
            None
        };

        let categories = self.categories.categories(extension.as_deref(), &source)?;
        let authority_boost = authority_score(meta, "authority_boost", &source, |s| {
            self.authority.boost(s)
        })?;
        let authority_penalty = authority_score(meta, "authority_penalty", &source, |s| {
            self.authority.penalty(s)
        })?;

        Ok(Document {
            id,
            title: view.opt_string("title"),
            identifier: view.opt_string("identifier"),
            creator: view.opt_string("creator"),
            creator_url: view.opt_string("creator_url"),
            tags: parse_detailed_tags(view.cell("tags")),
            created_on: parse_timestamp(view.cell("created_on")),
            thumbnail: view.opt_string("thumbnail"),
            provider: view.opt_string("provider"),
            license_version: view.opt_string("license_version"),
            foreign_landing_url: view.opt_string("foreign_landing_url"),
            description: parse_description(meta),
            extension,
            categories,
            aspect_ratio: aspect_ratio(height, width),
            size: size_class(height, width),
            license_url: license_url(meta),
            mature: maturity(meta, view.opt_bool("mature").unwrap_or(false)),
            normalized_popularity,
            authority_boost,
            authority_penalty,
            url,
            source,
            license,
        })
    }
}

/// Lower-cased file extension of `url`: the substring after the last `.`.
///
/// Answers `None` when the URL has no dot at all, or when the candidate
/// still contains a `/` — which means the last dot sat before a path
/// segment, not before a file extension.
pub fn parse_extension(url: &str) -> Option<String> {
    let (_, candidate) = url.rsplit_once('.')?;
    if candidate.contains('/') {
        return None;
    }
    Some(candidate.to_lowercase())
}

/// Orientation from pixel dimensions; `None` when either is unknown.
pub fn aspect_ratio(height: Option<i64>, width: Option<i64>) -> Option<AspectRatio> {
    let (h, w) = (height?, width?);
    Some(if h > w {
        AspectRatio::Tall
    } else if h < w {
        AspectRatio::Wide
    } else {
        AspectRatio::Square
    })
}

/// Resolution band from pixel dimensions; `None` when either is unknown.
///
/// Strict less-than against each band bound, so a resolution exactly at
/// a boundary lands in the next band up.
pub fn size_class(height: Option<i64>, width: Option<i64>) -> Option<SizeClass> {
    let resolution = height?.saturating_mul(width?);
    for (bound, class) in SIZE_BANDS {
        if resolution < bound {
            return Some(class);
        }
    }
    Some(SizeClass::Large)
}

/// Metadata description truncated to the first 2000 characters.
///
/// Any shape mismatch — metadata is not an object, the key is absent,
/// the value is not a string — degrades to `None`.
pub fn parse_description(meta: &Value) -> Option<String> {
    let text = meta.get("description")?.as_str()?;
    Some(text.chars().take(DESCRIPTION_MAX_CHARS).collect())
}

/// Metadata-supplied license URL, if any.
///
/// Synthesizing a URL from `license` and `license_version` when the
/// metadata omits one is a known gap, deliberately left open; the field
/// is simply null in that case.
pub fn license_url(meta: &Value) -> Option<String> {
    meta.get("license_url")?.as_str().map(str::to_string)
}

/// Whether the work is labeled for mature audiences only.
///
/// The metadata flag is adopted when present; the record-level API flag
/// represents our own manual labeling and always wins, but can only push
/// the result toward `true`.
pub fn maturity(meta: &Value, api_maturity_flag: bool) -> bool {
    let mut mature = meta.get("mature").and_then(Value::as_bool).unwrap_or(false);
    if api_maturity_flag {
        mature = true;
    }
    mature
}

/// Constrain `value` into `[low, high]`: cap at the ceiling first, then
/// raise to the floor. The ordering is deliberate and preserved verbatim
/// from the scoring rules this crate replicates.
pub fn constrain_between(value: f64, low: f64, high: f64) -> f64 {
    low.max(value.min(high))
}

/// Authority score for one of the `authority_boost` / `authority_penalty`
/// metadata keys.
///
/// A numeric metadata value (JSON number or numeric string) is clamped
/// into the score range. An absent key, or a value that fails to parse,
/// defers to the per-source policy lookup instead.
fn authority_score<F>(
    meta: &Value,
    key: &str,
    source: &str,
    lookup: F,
) -> Result<Option<f64>>
where
    F: FnOnce(&str) -> anyhow::Result<Option<f64>>,
{
    if let Some(raw) = meta.get(key) {
        if let Some(score) = parse_score(raw) {
            return Ok(Some(constrain_between(score, SCORE_LOW, SCORE_HIGH)));
        }
        trace!(key, source, "non-numeric authority score in metadata, deferring to policy lookup");
    }
    Ok(lookup(source)?)
}

/// Accept both JSON numbers and numeric strings as scores.
fn parse_score(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Normalize a raw tag list: keep only tags carrying a `name`, preserve
/// `accuracy` when present, drop every other key.
///
/// An empty or absent input list yields `None` — "no tags" is distinct
/// from an empty tag list. A non-empty list whose tags all lack a name
/// filters down to an empty list, matching the source system exactly.
pub fn parse_detailed_tags(raw: Option<&Value>) -> Option<Vec<Tag>> {
    let items = raw?.as_array()?;
    if items.is_empty() {
        return None;
    }
    Some(
        items
            .iter()
            .filter_map(|tag| {
                let name = tag.get("name")?.as_str()?.to_string();
                let accuracy = tag.get("accuracy").and_then(Value::as_f64);
                Some(Tag { name, accuracy })
            })
            .collect(),
    )
}

/// Creation timestamp from the raw cell, accepting RFC 3339 or the
/// `YYYY-MM-DD HH:MM:SS` shape relational stores emit. Unparseable or
/// null cells degrade to `None`.
fn parse_timestamp(cell: Option<&Value>) -> Option<DateTime<Utc>> {
    let text = cell?.as_str()?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

//! Category and authority policy collaborators.
//!
//! The normalizer treats category classification and authority scoring
//! as pure functions supplied from outside its own authority: it never
//! papers over their failures and never second-guesses their output.
//! The traits here are the seam; the table-backed implementations are
//! the defaults, built from [`PolicyConfig`](crate::config::PolicyConfig)
//! tables so deployments can extend them without code changes.

use std::collections::HashMap;

use anyhow::Result;

use crate::config::{AuthorityConfig, CategoryConfig};

/// Assigns search categories to a work from its file extension and
/// source identifier.
///
/// Implementations must be pure: identical inputs, identical output.
pub trait CategoryClassifier: Send + Sync {
    /// Categories for a work, or `None` when no rule applies.
    fn categories(&self, extension: Option<&str>, source: &str) -> Result<Option<Vec<String>>>;
}

/// Per-source ranking-weight lookup.
///
/// Scores returned by implementations must lie within `[0.0, 100.0]`;
/// the normalizer carries them into the document unmodified.
pub trait AuthorityScorer: Send + Sync {
    fn boost(&self, source: &str) -> Result<Option<f64>>;
    fn penalty(&self, source: &str) -> Result<Option<f64>>;
}

/// Table-backed classifier built from [`CategoryConfig`].
///
/// Source-keyed categories and the category implied by the file
/// extension are merged, then sorted and deduplicated so the output is
/// order-stable across runs.
pub struct TableCategoryClassifier {
    by_source: HashMap<String, Vec<String>>,
    by_extension: HashMap<String, String>,
}

impl TableCategoryClassifier {
    pub fn new(config: &CategoryConfig) -> Self {
        Self {
            by_source: config.by_source.clone(),
            by_extension: config.by_extension.clone(),
        }
    }
}

impl CategoryClassifier for TableCategoryClassifier {
    fn categories(&self, extension: Option<&str>, source: &str) -> Result<Option<Vec<String>>> {
        let mut categories: Vec<String> = self.by_source.get(source).cloned().unwrap_or_default();
        if let Some(ext) = extension {
            if let Some(category) = self.by_extension.get(ext) {
                categories.push(category.clone());
            }
        }
        categories.sort();
        categories.dedup();
        Ok(if categories.is_empty() {
            None
        } else {
            Some(categories)
        })
    }
}

/// Table-backed authority scorer built from [`AuthorityConfig`].
pub struct TableAuthorityScorer {
    boost: HashMap<String, f64>,
    penalty: HashMap<String, f64>,
}

impl TableAuthorityScorer {
    pub fn new(config: &AuthorityConfig) -> Self {
        Self {
            boost: config.boost.clone(),
            penalty: config.penalty.clone(),
        }
    }
}

impl AuthorityScorer for TableAuthorityScorer {
    fn boost(&self, source: &str) -> Result<Option<f64>> {
        Ok(self.boost.get(source).copied())
    }

    fn penalty(&self, source: &str) -> Result<Option<f64>> {
        Ok(self.penalty.get(source).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolicyConfig;

    #[test]
    fn classifier_merges_source_and_extension_rules() {
        let mut config = CategoryConfig::default();
        config
            .by_source
            .insert("sciencemuseum".to_string(), vec!["digitized_artwork".to_string()]);
        config
            .by_extension
            .insert("svg".to_string(), "illustration".to_string());

        let classifier = TableCategoryClassifier::new(&config);
        let cats = classifier
            .categories(Some("svg"), "sciencemuseum")
            .unwrap()
            .unwrap();
        assert_eq!(cats, vec!["digitized_artwork", "illustration"]);
    }

    #[test]
    fn classifier_output_is_sorted_and_deduplicated() {
        let mut config = CategoryConfig::default();
        config.by_source.insert(
            "gallery".to_string(),
            vec!["illustration".to_string(), "photograph".to_string()],
        );
        config
            .by_extension
            .insert("svg".to_string(), "illustration".to_string());

        let classifier = TableCategoryClassifier::new(&config);
        let cats = classifier.categories(Some("svg"), "gallery").unwrap().unwrap();
        assert_eq!(cats, vec!["illustration", "photograph"]);
    }

    #[test]
    fn classifier_answers_none_when_no_rule_applies() {
        let classifier = TableCategoryClassifier::new(&CategoryConfig::default());
        assert_eq!(
            classifier.categories(Some("xyz"), "nobody-home").unwrap(),
            None
        );
        assert_eq!(classifier.categories(None, "nobody-home").unwrap(), None);
    }

    #[test]
    fn scorer_reads_config_tables() {
        let mut config = AuthorityConfig::default();
        config.boost.insert("flickr".to_string(), 80.0);
        config.penalty.insert("low-trust".to_string(), 30.0);

        let scorer = TableAuthorityScorer::new(&config);
        assert_eq!(scorer.boost("flickr").unwrap(), Some(80.0));
        assert_eq!(scorer.penalty("low-trust").unwrap(), Some(30.0));
        assert_eq!(scorer.boost("unknown-source").unwrap(), None);
        assert_eq!(scorer.penalty("unknown-source").unwrap(), None);
    }

    #[test]
    fn built_in_defaults_cover_known_sources() {
        let config = PolicyConfig::default();
        let scorer = TableAuthorityScorer::new(&config.authority);
        assert!(scorer.boost("flickr").unwrap().is_some());

        let classifier = TableCategoryClassifier::new(&config.categories);
        assert!(classifier
            .categories(Some("svg"), "unknown")
            .unwrap()
            .is_some());
    }
}

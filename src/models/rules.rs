use serde::Serialize;

use crate::traits::items::ItemSet;

/// A single association rule: if every antecedent item is liked,
/// the consequent items are recommended with `confidence`.
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    pub antecedent: ItemSet,
    pub consequent: ItemSet,
    pub confidence: f64,
}

impl Rule {
    /// Create a new rule
    pub fn new(antecedent: ItemSet, consequent: ItemSet, confidence: f64) -> Self {
        Self {
            antecedent,
            consequent,
            confidence,
        }
    }
}

/// Provenance of one model generation, as written by the training job
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModelMetadata {
    pub version: String,
    /// ISO-8601 timestamp of when the rules were mined
    pub model_date: String,
    pub support_threshold: Option<f64>,
    pub confidence_threshold: Option<f64>,
    pub rule_count: usize,
    pub playlist_count: Option<u64>,
}

/// One immutable generation of association rules.
///
/// A reload never edits a `RuleModel` in place; the loader builds a fresh one
/// and the store publishes it as a whole.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleModel {
    rules: Vec<Rule>,
    metadata: ModelMetadata,
}

impl RuleModel {
    /// Create a new model from parsed rules and their metadata
    pub fn new(rules: Vec<Rule>, metadata: ModelMetadata) -> Self {
        Self { rules, metadata }
    }

    /// Rules in the order they were stored in the model file
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Get the model metadata
    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Get the number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check whether the model holds no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn metadata(version: &str, model_date: &str, rule_count: usize) -> ModelMetadata {
        ModelMetadata {
            version: version.to_string(),
            model_date: model_date.to_string(),
            support_threshold: Some(0.05),
            confidence_threshold: Some(0.5),
            rule_count,
            playlist_count: None,
        }
    }

    pub fn rule(antecedent: &[&str], consequent: &[&str], confidence: f64) -> Rule {
        Rule::new(
            ItemSet::new(antecedent.iter().copied()),
            ItemSet::new(consequent.iter().copied()),
            confidence,
        )
    }

    pub fn model(rules: Vec<Rule>) -> RuleModel {
        let count = rules.len();
        RuleModel::new(rules, metadata("1.0", "2024-01-01T12:00:00", count))
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_rule_model_accessors() {
        let m = model(vec![
            rule(&["X"], &["Y"], 0.9),
            rule(&["X", "Y"], &["Z"], 0.7),
        ]);

        assert_eq!(m.len(), 2);
        assert!(!m.is_empty());
        assert_eq!(m.metadata().rule_count, 2);
        assert_eq!(m.rules()[1].antecedent.len(), 2);
        assert_eq!(m.rules()[1].confidence, 0.7);
    }

    #[test]
    fn test_empty_rule_model() {
        let m = model(Vec::new());
        assert!(m.is_empty());
        assert_eq!(m.metadata().rule_count, 0);
    }
}

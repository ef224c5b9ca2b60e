use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use crate::models::rules::{ModelMetadata, Rule, RuleModel};
use crate::traits::items::ItemSet;
use crate::traits::model::ModelError;

/// On-disk layout written by the rule mining job
#[derive(Debug, Deserialize)]
struct RawModel {
    rules: Vec<RawRule>,
    metadata: RawMetadata,
}

/// `[antecedent, consequent, confidence]`
#[derive(Debug, Deserialize)]
struct RawRule(RawItems, RawItems, f64);

/// Either side of a rule may be a bare item or a list of items
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawItems {
    One(String),
    Many(Vec<String>),
}

impl From<RawItems> for ItemSet {
    fn from(raw: RawItems) -> Self {
        match raw {
            RawItems::One(item) => ItemSet::single(item),
            RawItems::Many(items) => ItemSet::new(items),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
    model_date: String,
    version: Option<String>,
    min_support: Option<f64>,
    min_confidence: Option<f64>,
    num_rules: Option<usize>,
    num_playlists: Option<u64>,
}

/// Load a rule model from a file on disk
pub fn load_model(path: impl AsRef<Path>) -> Result<RuleModel, ModelError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => ModelError::SourceNotFound(path.to_path_buf()),
        _ => ModelError::IoError(err),
    })?;

    let mut bytes = Vec::new();
    BufReader::new(file).read_to_end(&mut bytes)?;
    parse_model(&bytes)
}

/// Decode and validate a serialized rule model.
///
/// Single-item antecedents and consequents are normalized into one-element
/// sets here so nothing downstream branches on arity.
pub fn parse_model(bytes: &[u8]) -> Result<RuleModel, ModelError> {
    let raw: RawModel = serde_json::from_slice(bytes)?;

    let mut rules = Vec::with_capacity(raw.rules.len());
    for (index, RawRule(antecedent, consequent, confidence)) in raw.rules.into_iter().enumerate() {
        let antecedent = ItemSet::from(antecedent);
        let consequent = ItemSet::from(consequent);

        if antecedent.is_empty() || consequent.is_empty() {
            return Err(ModelError::MalformedModel(format!(
                "rule {} has an empty antecedent or consequent",
                index
            )));
        }
        if !(confidence > 0.0 && confidence <= 1.0) {
            return Err(ModelError::MalformedModel(format!(
                "rule {} has confidence {} outside (0, 1]",
                index, confidence
            )));
        }

        rules.push(Rule::new(antecedent, consequent, confidence));
    }

    let metadata = ModelMetadata {
        version: raw.metadata.version.unwrap_or_else(|| "unknown".to_string()),
        model_date: raw.metadata.model_date,
        support_threshold: raw.metadata.min_support,
        confidence_threshold: raw.metadata.min_confidence,
        rule_count: raw.metadata.num_rules.unwrap_or(rules.len()),
        playlist_count: raw.metadata.num_playlists,
    };

    Ok(RuleModel::new(rules, metadata))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "rules": [
            ["Yesterday", "Let It Be", 0.9],
            [["Yesterday", "Help!"], ["Hey Jude", "Something"], 0.75]
        ],
        "freq_itemsets": [[["Yesterday"], 120]],
        "metadata": {
            "model_date": "2024-01-01T12:00:00",
            "version": "1.0",
            "num_playlists": 10000,
            "num_rules": 2,
            "min_support": 0.05,
            "min_confidence": 0.5
        }
    }"#;

    #[test]
    fn test_parse_model_normalizes_arity() {
        let model = parse_model(SAMPLE.as_bytes()).unwrap();

        assert_eq!(model.len(), 2);
        let first = &model.rules()[0];
        assert_eq!(first.antecedent, ItemSet::single("Yesterday"));
        assert_eq!(first.consequent, ItemSet::single("Let It Be"));
        assert_eq!(first.confidence, 0.9);

        let second = &model.rules()[1];
        assert_eq!(second.antecedent.len(), 2);
        assert_eq!(second.consequent.iter().collect::<Vec<_>>(), vec!["Hey Jude", "Something"]);
    }

    #[test]
    fn test_parse_model_metadata() {
        let model = parse_model(SAMPLE.as_bytes()).unwrap();
        let meta = model.metadata();

        assert_eq!(meta.version, "1.0");
        assert_eq!(meta.model_date, "2024-01-01T12:00:00");
        assert_eq!(meta.support_threshold, Some(0.05));
        assert_eq!(meta.confidence_threshold, Some(0.5));
        assert_eq!(meta.rule_count, 2);
        assert_eq!(meta.playlist_count, Some(10000));
    }

    #[test]
    fn test_parse_model_optional_metadata() {
        let json = r#"{"rules": [["a", "b", 1.0]], "metadata": {"model_date": "2024-05-01T00:00:00"}}"#;
        let model = parse_model(json.as_bytes()).unwrap();

        assert_eq!(model.metadata().version, "unknown");
        assert_eq!(model.metadata().rule_count, 1);
        assert_eq!(model.metadata().support_threshold, None);
    }

    #[test]
    fn test_parse_model_structural_errors() {
        let cases = [
            "not json at all",
            "[]",
            r#"{"metadata": {"model_date": "2024-01-01"}}"#,
            r#"{"rules": {}, "metadata": {"model_date": "2024-01-01"}}"#,
            r#"{"rules": []}"#,
            r#"{"rules": [], "metadata": {"version": "1.0"}}"#,
            r#"{"rules": [["a", "b"]], "metadata": {"model_date": "2024-01-01"}}"#,
            r#"{"rules": [["a", 3, 0.5]], "metadata": {"model_date": "2024-01-01"}}"#,
        ];

        for case in cases {
            let result = parse_model(case.as_bytes());
            assert!(
                matches!(result, Err(ModelError::MalformedModel(_))),
                "expected MalformedModel for {}",
                case
            );
        }
    }

    #[test]
    fn test_parse_model_rejects_invalid_rules() {
        let empty_side = r#"{"rules": [[[], "b", 0.5]], "metadata": {"model_date": "2024-01-01"}}"#;
        match parse_model(empty_side.as_bytes()) {
            Err(ModelError::MalformedModel(msg)) => assert!(msg.contains("rule 0")),
            other => panic!("Expected MalformedModel, got {:?}", other),
        }

        for confidence in ["0.0", "-0.2", "1.5"] {
            let json = format!(
                r#"{{"rules": [["a", "b", 0.5], ["a", "c", {}]], "metadata": {{"model_date": "2024-01-01"}}}}"#,
                confidence
            );
            match parse_model(json.as_bytes()) {
                Err(ModelError::MalformedModel(msg)) => assert!(msg.contains("rule 1")),
                other => panic!("Expected MalformedModel, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_load_model_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let mut file = File::create(&path).unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        drop(file);

        let model = load_model(&path).unwrap();
        assert_eq!(model.len(), 2);
    }

    #[test]
    fn test_load_model_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        match load_model(&path) {
            Err(ModelError::SourceNotFound(p)) => assert_eq!(p, path),
            other => panic!("Expected SourceNotFound, got {:?}", other),
        }
    }
}

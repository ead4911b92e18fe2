use std::fs;
use std::path::Path;

use crate::error::DslError;
use crate::workflow::{RawWorkflow, Workflow};

/// Parse a YAML string into a Workflow.
///
/// This function handles the initial conversion from YAML text to structured data
/// and resolves every statement node to exactly one variant. It does not check
/// variable flow between statements - that's handled separately by the
/// validation module.
pub fn parse_workflow_yaml(yaml_str: &str) -> Result<Workflow, DslError> {
    let raw: RawWorkflow = serde_yaml::from_str(yaml_str)?;
    resolve(raw)
}

/// Parse a JSON string into a Workflow.
pub fn parse_workflow_json(json_str: &str) -> Result<Workflow, DslError> {
    let raw: RawWorkflow = serde_json::from_str(json_str)?;
    resolve(raw)
}

/// Load a workflow document from disk.
///
/// Files ending in `.json` are parsed as JSON, anything else as YAML.
pub fn load_workflow_file(path: impl AsRef<Path>) -> Result<Workflow, DslError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        parse_workflow_json(&content)
    } else {
        parse_workflow_yaml(&content)
    }
}

fn resolve(raw: RawWorkflow) -> Result<Workflow, DslError> {
    raw.into_workflow()
        .map_err(|err| DslError::AmbiguousStatement(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::Statement;

    #[test]
    fn test_parse_minimal_valid_document() {
        let yaml = r#"
        variables:
          arg1: value1
        root:
          activity:
            name: sampleActivity
            arguments: [arg1]
            result: result1
        "#;

        let result = parse_workflow_yaml(yaml);
        assert!(result.is_ok(), "Failed to parse valid document: {:?}", result.err());

        let workflow = result.unwrap();
        assert_eq!(workflow.variables.get("arg1").map(String::as_str), Some("value1"));
        assert_eq!(workflow.root, Statement::activity("sampleActivity", &["arg1"], "result1"));
    }

    #[test]
    fn test_invalid_yaml_syntax() {
        let yaml = r#"
        variables:
          arg1: value1
        root: [
          - activity: broken
        "#;

        let result = parse_workflow_yaml(yaml);
        assert!(result.is_err());

        match result.err().unwrap() {
            DslError::YamlError(_) => {},
            err => panic!("Expected YamlError, got {:?}", err),
        }
    }

    #[test]
    fn test_ambiguous_statement_is_reported_with_path() {
        let yaml = r#"
        root:
          parallel:
            branches:
              - activity:
                  name: a
                  result: r
                sequence:
                  elements: []
        "#;

        match parse_workflow_yaml(yaml) {
            Err(DslError::AmbiguousStatement(message)) => {
                assert!(message.contains("root.branches[0]"), "{}", message);
                assert!(message.contains("activity, sequence"), "{}", message);
            }
            other => panic!("Expected AmbiguousStatement, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let yaml = r#"
        root:
          loop:
            elements: []
        "#;

        assert!(matches!(parse_workflow_yaml(yaml), Err(DslError::YamlError(_))));
    }

    #[test]
    fn test_parse_json_document() {
        let json = r#"{
            "variables": {"var1": "value1"},
            "root": {"sequence": {"elements": [
                {"activity": {"name": "sampleActivity", "arguments": ["var1"], "result": "out"}}
            ]}}
        }"#;

        let workflow = parse_workflow_json(json).expect("valid json workflow");
        assert_eq!(workflow.root.count_activities(), 1);
    }
}

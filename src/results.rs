//! Execution result bridge
//!
//! The executed program may leave a JSON artifact behind in the project
//! directory. The only section this side cares about is the flat
//! `savedEnvironment` object, which is handed back to the host so it can
//! inject the variables into the running job.

use crate::error::{ForgeError, ForgeResult};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;

/// File name of the result artifact inside the project directory
pub const RESULT_FILE_NAME: &str = "execution-result.json";

/// Top-level field holding the captured environment map
pub const SAVED_ENVIRONMENT_KEY: &str = "savedEnvironment";

/// Read the result artifact, if the executed program emitted one
pub async fn read_result_file(project_dir: &Path) -> ForgeResult<Option<String>> {
    let path = project_dir.join(RESULT_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .await
        .map_err(|e| ForgeError::io(format!("reading {}", path.display()), e))?;
    Ok(Some(content))
}

/// Extract the captured environment map from a result artifact
///
/// A missing `savedEnvironment` section is an expected condition, not an
/// error: the script may simply not have emitted one, so the result is an
/// empty map. Values get their backslashes doubled before being handed to
/// the environment-injection side; that is the single escaping rule applied
/// here.
pub fn extract_environment(document: &str) -> ForgeResult<BTreeMap<String, String>> {
    let value: Value = serde_json::from_str(document)?;

    let mut environment = BTreeMap::new();
    let Some(section) = value.get(SAVED_ENVIRONMENT_KEY).and_then(Value::as_object) else {
        return Ok(environment);
    };

    for (key, value) in section {
        let raw = match value {
            Value::String(s) => s.clone(),
            Value::Null => "null".to_string(),
            other => other.to_string(),
        };
        environment.insert(key.clone(), raw.replace('\\', "\\\\"));
    }

    Ok(environment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn extracts_flat_map() {
        let doc = r#"{"savedEnvironment": {"FOO": "bar", "COUNT": "3"}}"#;
        let env = extract_environment(doc).unwrap();
        assert_eq!(env.get("FOO").unwrap(), "bar");
        assert_eq!(env.get("COUNT").unwrap(), "3");
    }

    #[test]
    fn missing_section_yields_empty_map() {
        let env = extract_environment(r#"{"somethingElse": 1}"#).unwrap();
        assert!(env.is_empty());
    }

    #[test]
    fn section_of_wrong_shape_yields_empty_map() {
        let env = extract_environment(r#"{"savedEnvironment": "not a map"}"#).unwrap();
        assert!(env.is_empty());
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(extract_environment("{oops").is_err());
    }

    #[test]
    fn backslashes_are_doubled() {
        let doc = r#"{"savedEnvironment": {"PATHISH": "C:\\tools\\bin"}}"#;
        let env = extract_environment(doc).unwrap();
        assert_eq!(env.get("PATHISH").unwrap(), r"C:\\tools\\bin");
    }

    #[test]
    fn null_value_becomes_literal_null() {
        let doc = r#"{"savedEnvironment": {"EMPTY": null}}"#;
        let env = extract_environment(doc).unwrap();
        assert_eq!(env.get("EMPTY").unwrap(), "null");
    }

    #[test]
    fn non_string_scalars_are_stringified() {
        let doc = r#"{"savedEnvironment": {"N": 42, "B": true}}"#;
        let env = extract_environment(doc).unwrap();
        assert_eq!(env.get("N").unwrap(), "42");
        assert_eq!(env.get("B").unwrap(), "true");
    }

    #[tokio::test]
    async fn missing_artifact_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_result_file(dir.path()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn artifact_is_read_back() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(RESULT_FILE_NAME), "{}").unwrap();
        let content = read_result_file(dir.path()).await.unwrap();
        assert_eq!(content.unwrap(), "{}");
    }
}

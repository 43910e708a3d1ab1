// src/core/parameters.rs

use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use std::{collections::HashMap, fs, path::Path};

/// Zips two equal-length sequences (values, names) into a name-to-value
/// mapping: `param_names[0]` names the value at `params[0]`.
///
/// A length mismatch is a hard error raised to the caller; it means the job
/// submission itself is malformed and no script should run.
pub fn build_params_map(
    params: &[Value],
    param_names: &[String],
) -> Result<HashMap<String, Value>> {
    if params.len() != param_names.len() {
        return Err(anyhow!(
            "Parameter and parameter name length mismatch ({} values, {} names).",
            params.len(),
            param_names.len()
        ));
    }

    Ok(param_names
        .iter()
        .cloned()
        .zip(params.iter().cloned())
        .collect())
}

/// Loads a parameter context from a JSON file. The top level must be an
/// object; each entry becomes a template variable binding.
pub fn load_context_file(path: &Path) -> Result<HashMap<String, Value>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameter file '{}'", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse parameter file '{}' as JSON", path.display()))?;

    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => Err(anyhow!(
            "Parameter file '{}' must contain a JSON object at the top level.",
            path.display()
        )),
    }
}

/// The text a context value substitutes as. Strings substitute bare, without
/// the JSON quoting; everything else uses its JSON rendering.
pub fn context_value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn to_names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_build_params_map_zips_names_to_values() {
        let params = vec![json!("test1"), json!(2)];
        let names = to_names(&["param1", "param2"]);

        let map = build_params_map(&params, &names).unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("param1"), Some(&json!("test1")));
        assert_eq!(map.get("param2"), Some(&json!(2)));
    }

    #[test]
    fn test_build_params_map_rejects_length_mismatch() {
        let params = vec![json!("only one")];
        let names = to_names(&["param1", "param2"]);

        let result = build_params_map(&params, &names);

        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("length mismatch")
        );
    }

    #[test]
    fn test_load_context_file_reads_object() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"branch": "main", "jobs": 4}"#).unwrap();
        file.flush().unwrap();

        let context = load_context_file(file.path()).unwrap();

        assert_eq!(context.get("branch"), Some(&json!("main")));
        assert_eq!(context.get("jobs"), Some(&json!(4)));
    }

    #[test]
    fn test_load_context_file_rejects_non_object_root() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[1, 2, 3]").unwrap();
        file.flush().unwrap();

        let result = load_context_file(file.path());

        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("JSON object at the top level")
        );
    }

    #[test]
    fn test_context_value_text_strips_string_quoting() {
        assert_eq!(context_value_text(&json!("main")), "main");
        assert_eq!(context_value_text(&json!(4)), "4");
        assert_eq!(context_value_text(&json!(false)), "false");
    }
}

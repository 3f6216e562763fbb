//! File helpers shared by the store-backed commands.

use std::fs;
use std::path::{Path, PathBuf};

use evohold_arena::SolutionStore;
use serde_json::Value;

use crate::config::Config;
use crate::error::CliError;

/// Reads and parses a JSON document.
pub fn read_json_file(path: &Path) -> Result<(String, Value), CliError> {
    let raw = fs::read_to_string(path).map_err(|e| {
        CliError::InvalidInput(format!("cannot read {}: {}", path.display(), e))
    })?;
    let value = serde_json::from_str(&raw)?;
    Ok((raw, value))
}

/// The store named by `--store`, falling back to the configured one.
pub fn open_store(flag: Option<PathBuf>, config: &Config) -> Result<SolutionStore, CliError> {
    let root = flag.unwrap_or_else(|| PathBuf::from(&config.store));
    Ok(SolutionStore::open(root)?)
}

/// Splits a submission into its genome payload and its metadata.
///
/// A submission is either a bare genome payload, or an object with a
/// `genome` payload next to optional `metadata`.
pub fn split_submission(value: &Value) -> (&Value, &Value) {
    static NO_METADATA: Value = Value::Null;
    match value.get("genome") {
        Some(genome) if genome.is_object() => {
            (genome, value.get("metadata").unwrap_or(&NO_METADATA))
        }
        _ => (value, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_bare_payload() {
        let v = json!({"aggression": 0.5, "author": "x"});
        let (genome, meta) = split_submission(&v);
        assert_eq!(genome, &v);
        assert_eq!(meta["author"], "x");
    }

    #[test]
    fn test_split_wrapped_payload() {
        let v = json!({"genome": {"aggression": 0.5}, "metadata": {"author": "y"}});
        let (genome, meta) = split_submission(&v);
        assert_eq!(genome["aggression"], 0.5);
        assert_eq!(meta["author"], "y");
    }

    #[test]
    fn test_read_missing_file_is_invalid_input() {
        let e = read_json_file(Path::new("/nonexistent/evohold.json")).unwrap_err();
        assert!(matches!(e, CliError::InvalidInput(_)));
    }
}

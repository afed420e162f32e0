use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A tracked topic and the search terms that roll up into it.
///
/// Collectors may search for `"Dubai"` or `"Abu Dhabi"`; with an
/// `aliases` entry both are reported under the group `"UAE"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryGroup {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueriesFile {
    pub queries: Vec<QueryGroup>,
}

impl QueriesFile {
    /// Lowercased search term → group name, including each group's own name.
    #[must_use]
    pub fn alias_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        for group in &self.queries {
            map.insert(group.name.trim().to_lowercase(), group.name.clone());
            for alias in &group.aliases {
                map.insert(alias.trim().to_lowercase(), group.name.clone());
            }
        }
        map
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.queries.iter().map(|g| g.name.as_str()).collect()
    }
}

/// Load and validate the query groups from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_queries(path: &Path) -> Result<QueriesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::QueriesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let queries_file: QueriesFile = serde_yaml::from_str(&content)?;

    validate_queries(&queries_file)?;

    Ok(queries_file)
}

fn validate_queries(queries_file: &QueriesFile) -> Result<(), ConfigError> {
    let mut seen_terms = HashSet::new();

    for group in &queries_file.queries {
        if group.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "query group name must be non-empty".to_string(),
            ));
        }

        if !seen_terms.insert(group.name.trim().to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate query term: '{}'",
                group.name
            )));
        }

        for alias in &group.aliases {
            if alias.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "query group '{}' has an empty alias",
                    group.name
                )));
            }
            let key = alias.trim().to_lowercase();
            // An alias equal to its own group name is redundant but harmless.
            if key == group.name.trim().to_lowercase() {
                continue;
            }
            if !seen_terms.insert(key) {
                return Err(ConfigError::Validation(format!(
                    "duplicate query term: '{alias}' (in group '{}')",
                    group.name
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "queries_test.rs"]
mod tests;

//! Request fixture loading.
//!
//! A request is described by three files: the stored rules (with the default
//! target areas and registry entries), the page classification and the
//! content lists. Each may be JSON or YAML, selected by extension.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use wa_rules::{PageContext, RuleRecord, SkippedAttachment, rules_from_records};
use wa_swap::{ContentLists, MemoryHost, RegistryEntry, TargetArea};

/// Error reading a fixture file.
#[derive(Debug, thiserror::Error)]
pub(crate) enum FixtureError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Unsupported fixture format: {} (expected .json, .yaml or .yml)", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Stored rules file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RulesFile {
    /// Default areas eligible for replacement, in registration order.
    pub targets: Vec<TargetArea>,
    /// Stored replacement rules.
    pub rules: Vec<RuleRecord>,
    /// Extra registry entries (replacement areas, custom markup).
    pub entries: Vec<RegistryEntry>,
}

/// Supported fixture encodings.
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self, FixtureError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(FixtureError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Read and deserialize a fixture file.
pub(crate) fn read_fixture<T: DeserializeOwned>(path: &Path) -> Result<T, FixtureError> {
    let format = Format::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), "Loading fixture");

    match format {
        Format::Json => serde_json::from_str(&content).map_err(|source| FixtureError::Json {
            path: path.to_path_buf(),
            source,
        }),
        Format::Yaml => serde_yaml::from_str(&content).map_err(|source| FixtureError::Yaml {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// In-memory host for one request, plus attachments dropped while loading.
pub(crate) struct Request {
    pub host: MemoryHost,
    pub skipped: Vec<SkippedAttachment>,
}

/// Load the rules and page context files into an in-memory host.
pub(crate) fn load_request(rules_path: &Path, context_path: &Path) -> Result<Request, FixtureError> {
    let rules_file: RulesFile = read_fixture(rules_path)?;
    let context: PageContext = read_fixture(context_path)?;
    Ok(build_request(rules_file, context))
}

/// Load a content lists file.
pub(crate) fn load_contents(path: &Path) -> Result<ContentLists, FixtureError> {
    read_fixture(path)
}

fn build_request(rules_file: RulesFile, context: PageContext) -> Request {
    let (rules, skipped) = rules_from_records(&rules_file.rules);

    let mut host = MemoryHost::new().with_context(context);
    for target in rules_file.targets {
        host = host.with_target(target.id, target.name);
    }
    // Replacement areas are registered too, so discovery renders and
    // restores see them.
    for rule in &rules {
        host = host.with_entry(RegistryEntry::new(
            rule.candidate.id.clone(),
            rule.candidate.name.clone(),
        ));
    }
    for entry in rules_file.entries {
        host = host.with_entry(entry);
    }
    for rule in rules {
        host = host.with_rule(rule);
    }

    tracing::info!(skipped = skipped.len(), "Loaded request fixtures");

    Request { host, skipped }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use wa_swap::{AreaRegistry, RequestHost};

    use super::*;

    const RULES_YAML: &str = r#"
targets:
  - id: sidebar-main
    name: Main Sidebar
rules:
  - area_id: page-7
    area_name: Page 7
    target_area_id: sidebar-main
    attachments:
      - item_type: post_type
        object: page
        object_id: "7"
      - item_type: post_type
        object: page
        object_id: seven
entries:
  - id: sidebar-main
    name: Main Sidebar
    before_widget: "<li>"
    after_widget: "</li>"
"#;

    const CONTEXT_JSON: &str = r#"{ "page": { "id": 7 } }"#;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_fixture_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "contents.json", r#"{"sidebar-main": ["text-1"]}"#);

        let lists = load_contents(&path).unwrap();

        assert_eq!(lists.get("sidebar-main"), Some(&vec!["text-1".to_owned()]));
    }

    #[test]
    fn test_read_fixture_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "contents.yml", "sidebar-main:\n  - text-1\n  - text-2\n");

        let lists = load_contents(&path).unwrap();

        assert_eq!(
            lists.get("sidebar-main"),
            Some(&vec!["text-1".to_owned(), "text-2".to_owned()])
        );
    }

    #[test]
    fn test_read_fixture_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "contents.toml", "");

        let err = load_contents(&path).unwrap_err();

        assert!(matches!(err, FixtureError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_read_fixture_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let err = load_contents(&dir.path().join("missing.json")).unwrap_err();

        assert!(matches!(err, FixtureError::Io { .. }));
    }

    #[test]
    fn test_read_fixture_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "context.json", "{ not json");

        let err = read_fixture::<PageContext>(&path).unwrap_err();

        assert!(matches!(err, FixtureError::Json { .. }));
        assert!(err.to_string().contains("context.json"));
    }

    #[test]
    fn test_load_request_builds_host() {
        let dir = tempfile::tempdir().unwrap();
        let rules = write(dir.path(), "rules.yaml", RULES_YAML);
        let context = write(dir.path(), "context.json", CONTEXT_JSON);

        let request = load_request(&rules, &context).unwrap();

        let targets = request.host.default_target_areas();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].id, "sidebar-main");

        let candidates = request.host.candidate_rules("sidebar-main");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].attachments.len(), 1);

        assert_eq!(request.skipped.len(), 1);
        assert_eq!(request.skipped[0].area_id, "page-7");
        assert_eq!(request.skipped[0].index, 1);

        // Explicit entries win over the generated ones.
        let entry = request.host.entry("sidebar-main").unwrap();
        assert_eq!(entry.before_widget, "<li>");
        assert!(request.host.entry("page-7").is_some());

        assert_eq!(request.host.classify_current_request().page.unwrap().id, 7);
    }
}

//! Configuration management for widget area swapping.
//!
//! Parses `wa.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Path Expansion
//!
//! Fixture paths are expanded like a shell would:
//!
//! - `~` - the home directory
//! - `$VAR` / `${VAR}` - the value of VAR, errors if unset
//! - `${VAR:-default}` - VAR if set, otherwise the default
//!
//! Expanded fields:
//! - `fixtures.rules`
//! - `fixtures.context`
//! - `fixtures.contents`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use wa_resolver::TemplateMatch;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override page template comparison mode.
    pub template_match: Option<TemplateMatch>,
    /// Override preview masking flag.
    pub preview_enabled: Option<bool>,
    /// Override rule records file.
    pub rules: Option<PathBuf>,
    /// Override page context file.
    pub context: Option<PathBuf>,
    /// Override content lists file.
    pub contents: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "wa.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Resolver configuration.
    pub resolver: ResolverConfig,
    /// Preview-mode configuration.
    pub preview: PreviewConfig,
    /// Fixture file locations (relative strings from TOML).
    fixtures: FixturesConfigRaw,

    /// Resolved fixture locations (set after loading).
    #[serde(skip)]
    pub fixtures_resolved: FixturesConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Resolver configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// How page template attachments are compared.
    pub template_match: TemplateMatch,
}

/// Preview-mode configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Whether replaced areas are masked while an editor is active.
    pub enabled: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Raw fixture configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FixturesConfigRaw {
    rules: Option<String>,
    context: Option<String>,
    contents: Option<String>,
}

/// Resolved fixture locations with absolute paths.
#[derive(Debug, Default)]
pub struct FixturesConfig {
    /// Rule records file (JSON or YAML).
    pub rules: PathBuf,
    /// Page context file (JSON or YAML).
    pub context: PathBuf,
    /// Content lists file (JSON or YAML).
    pub contents: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`fixtures.rules`").
        field: String,
        /// Error message (e.g., "${`RULES_DIR`} not set").
        message: String,
    },
}

/// Require a path field to be non-empty.
fn require_non_empty(value: &Path, field: &str) -> Result<(), ConfigError> {
    if value.as_os_str().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a fixture file to have a supported extension.
fn require_fixture_extension(path: &Path, field: &str) -> Result<(), ConfigError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json" | "yaml" | "yml") => Ok(()),
        _ => Err(ConfigError::Validation(format!(
            "{field} must be a .json, .yaml or .yml file"
        ))),
    }
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `wa.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(template_match) = settings.template_match {
            self.resolver.template_match = template_match;
        }
        if let Some(preview_enabled) = settings.preview_enabled {
            self.preview.enabled = preview_enabled;
        }
        if let Some(rules) = &settings.rules {
            self.fixtures_resolved.rules.clone_from(rules);
        }
        if let Some(context) = &settings.context {
            self.fixtures_resolved.context.clone_from(context);
        }
        if let Some(contents) = &settings.contents {
            self.fixtures_resolved.contents.clone_from(contents);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            resolver: ResolverConfig::default(),
            preview: PreviewConfig::default(),
            fixtures: FixturesConfigRaw::default(),
            fixtures_resolved: FixturesConfig {
                rules: base.join("rules.yaml"),
                context: base.join("context.json"),
                contents: base.join("contents.json"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_paths()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any fixture path is empty or has
    /// an unsupported extension.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fixtures = [
            (&self.fixtures_resolved.rules, "fixtures.rules"),
            (&self.fixtures_resolved.context, "fixtures.context"),
            (&self.fixtures_resolved.contents, "fixtures.contents"),
        ];
        for (path, field) in fixtures {
            require_non_empty(path, field)?;
            require_fixture_extension(path, field)?;
        }
        Ok(())
    }

    /// Expand fixture paths before they are resolved.
    fn expand_paths(&mut self) -> Result<(), ConfigError> {
        if let Some(ref rules) = self.fixtures.rules {
            self.fixtures.rules = Some(expand::expand_path(rules, "fixtures.rules")?);
        }
        if let Some(ref context) = self.fixtures.context {
            self.fixtures.context = Some(expand::expand_path(context, "fixtures.context")?);
        }
        if let Some(ref contents) = self.fixtures.contents {
            self.fixtures.contents = Some(expand::expand_path(contents, "fixtures.contents")?);
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.fixtures_resolved = FixturesConfig {
            rules: resolve(self.fixtures.rules.as_deref(), "rules.yaml"),
            context: resolve(self.fixtures.context.as_deref(), "context.json"),
            contents: resolve(self.fixtures.contents.as_deref(), "contents.json"),
        };
    }
}

//! `wa check` command implementation.

use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::Args;
use wa_config::{CliSettings, Config};
use wa_rules::rules_from_records;

use crate::error::CliError;
use crate::fixtures::{RulesFile, read_fixture};
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Path to configuration file (default: auto-discover wa.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rule records file (overrides config).
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if the rules cannot be read or any attachment is
    /// malformed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let cli_settings = CliSettings {
            rules: self.rules,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let rules_file: RulesFile = read_fixture(&config.fixtures_resolved.rules)?;
        let (rules, skipped) = rules_from_records(&rules_file.rules);

        let targets: BTreeSet<&str> = rules_file
            .targets
            .iter()
            .map(|area| area.id.as_str())
            .collect();
        for rule in &rules {
            if !targets.contains(rule.target_area_id.as_str()) {
                output.warning(&format!(
                    "{} targets {}, which is not a default area",
                    rule.candidate.id, rule.target_area_id
                ));
            }
            if rule.attachments.is_empty() {
                output.warning(&format!("{} has no usable attachments", rule.candidate.id));
            }
        }

        for entry in &skipped {
            output.skipped(entry);
        }

        if !skipped.is_empty() {
            return Err(CliError::Validation(format!(
                "{} attachment(s) skipped in {}",
                skipped.len(),
                config.fixtures_resolved.rules.display()
            )));
        }

        output.success(&format!("{} rule(s) OK", rules.len()));
        Ok(())
    }
}

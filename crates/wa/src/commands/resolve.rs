//! `wa resolve` command implementation.

use clap::Args;
use wa_config::CliSettings;
use wa_swap::{RequestHost, SwapCoordinator, SwapOptions};

use super::{FixtureArgs, resolver_for};
use crate::error::CliError;
use crate::fixtures::load_request;
use crate::output::Output;

/// Arguments for the resolve command.
#[derive(Args)]
pub(crate) struct ResolveArgs {
    #[command(flatten)]
    pub fixtures: FixtureArgs,

    /// Only resolve this area.
    #[arg(short, long)]
    target: Option<String>,
}

impl ResolveArgs {
    /// Execute the resolve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or fixtures cannot be loaded.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.fixtures.load_config(CliSettings::default())?;
        let request = load_request(
            &config.fixtures_resolved.rules,
            &config.fixtures_resolved.context,
        )?;
        for skipped in &request.skipped {
            output.skipped(skipped);
        }

        let resolver = resolver_for(&config);
        let mut coordinator =
            SwapCoordinator::new(&request.host, &resolver, SwapOptions::default());

        let targets: Vec<String> = match self.target {
            Some(target) => vec![target],
            None => request
                .host
                .default_target_areas()
                .into_iter()
                .map(|area| area.id)
                .collect(),
        };
        for target in &targets {
            coordinator.ensure_resolved(target);
        }

        let decisions: Vec<_> = targets
            .iter()
            .filter_map(|target| coordinator.decisions().get(target))
            .collect();
        for decision in &decisions {
            output.decision(decision);
        }

        output.result(&serde_json::to_string_pretty(&decisions)?);
        Ok(())
    }
}

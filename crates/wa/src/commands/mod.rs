//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod resolve;
pub(crate) mod swap;

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use wa_config::{CliSettings, Config};
use wa_resolver::{Resolver, ResolverOptions, TemplateMatch};

pub(crate) use check::CheckArgs;
pub(crate) use resolve::ResolveArgs;
pub(crate) use swap::SwapArgs;

use crate::error::CliError;

/// Page template comparison mode flag.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum TemplateMatchArg {
    /// Template display name must occur in the stored label.
    Label,
    /// Compare stable template files, falling back to the label.
    TemplateFile,
}

impl From<TemplateMatchArg> for TemplateMatch {
    fn from(arg: TemplateMatchArg) -> Self {
        match arg {
            TemplateMatchArg::Label => Self::Label,
            TemplateMatchArg::TemplateFile => Self::TemplateFile,
        }
    }
}

/// Arguments shared by commands that run a request.
#[derive(Args)]
pub(crate) struct FixtureArgs {
    /// Path to configuration file (default: auto-discover wa.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rule records file (overrides config).
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Page context file (overrides config).
    #[arg(long)]
    context: Option<PathBuf>,

    /// Page template comparison mode (overrides config).
    #[arg(long, value_enum)]
    template_match: Option<TemplateMatchArg>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl FixtureArgs {
    /// Load config with these arguments and any extra overrides applied.
    pub(crate) fn load_config(&self, extra: CliSettings) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            template_match: self.template_match.map(Into::into),
            rules: self.rules.clone(),
            context: self.context.clone(),
            ..extra
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Build the resolver configured by `config`.
pub(crate) fn resolver_for(config: &Config) -> Resolver {
    Resolver::new(ResolverOptions {
        template_match: config.resolver.template_match,
    })
}

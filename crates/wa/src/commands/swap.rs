//! `wa swap` command implementation.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use serde::Serialize;
use wa_config::CliSettings;
use wa_swap::{
    AreaState, ContentLists, RenderSurface, RequestHost, SwapCoordinator, SwapMap, SwapOptions,
};

use super::{FixtureArgs, resolver_for};
use crate::error::CliError;
use crate::fixtures::{load_contents, load_request};
use crate::output::Output;

/// Render surface flag.
#[derive(Clone, Copy, Default, ValueEnum)]
enum SurfaceArg {
    /// Public page render.
    #[default]
    Frontend,
    /// Administration screen.
    Admin,
    /// Live editing surface.
    Editor,
}

impl From<SurfaceArg> for RenderSurface {
    fn from(arg: SurfaceArg) -> Self {
        match arg {
            SurfaceArg::Frontend => Self::Frontend,
            SurfaceArg::Admin => Self::Admin,
            SurfaceArg::Editor => Self::Editor,
        }
    }
}

/// Arguments for the swap command.
#[derive(Args)]
pub(crate) struct SwapArgs {
    #[command(flatten)]
    pub fixtures: FixtureArgs,

    /// Content lists file (overrides config).
    #[arg(long)]
    contents: Option<PathBuf>,

    /// Surface the request renders for.
    #[arg(long, value_enum, default_value_t)]
    surface: SurfaceArg,

    /// Disable preview masking on the editor surface.
    #[arg(long)]
    no_preview: bool,
}

/// Preview masking observed during the request.
#[derive(Serialize)]
struct PreviewReport {
    hidden: Vec<String>,
    discovery_renders: Vec<String>,
}

/// Swap command result.
#[derive(Serialize)]
struct SwapReport<'a> {
    swap_map: &'a SwapMap,
    contents: ContentLists,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<PreviewReport>,
}

impl SwapArgs {
    /// Execute the swap command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or fixtures cannot be loaded.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.fixtures.load_config(CliSettings {
            contents: self.contents,
            preview_enabled: self.no_preview.then_some(false),
            ..CliSettings::default()
        })?;

        let request = load_request(
            &config.fixtures_resolved.rules,
            &config.fixtures_resolved.context,
        )?;
        for skipped in &request.skipped {
            output.skipped(skipped);
        }
        let lists = load_contents(&config.fixtures_resolved.contents)?;

        let resolver = resolver_for(&config);
        let options = SwapOptions {
            surface: self.surface.into(),
            preview_enabled: config.preview.enabled,
        };
        let mut coordinator = SwapCoordinator::new(&request.host, &resolver, options);

        let contents = coordinator.swap_widgets(lists);

        let preview = if options.surface == RenderSurface::Editor && options.preview_enabled {
            coordinator.enter_preview_mode();
            let hidden = request
                .host
                .default_target_areas()
                .into_iter()
                .filter(|area| coordinator.area_state(&area.id) == AreaState::Hidden)
                .map(|area| area.id)
                .collect();
            let discovery_renders = request.host.discovery_renders();
            coordinator.exit_preview_mode();
            Some(PreviewReport {
                hidden,
                discovery_renders,
            })
        } else {
            None
        };

        for (target, winner) in coordinator.swap_map() {
            output.swapped(target, winner);
        }
        if coordinator.swap_map().is_empty() {
            output.warning("No areas replaced");
        }

        let report = SwapReport {
            swap_map: coordinator.swap_map(),
            contents,
            preview,
        };
        output.result(&serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}

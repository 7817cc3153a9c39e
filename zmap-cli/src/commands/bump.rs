//! Bump command implementation - lay out a dumped column

use anyhow::{Context, Result};
use std::path::PathBuf;
use zmap_canvas::LongItems;
use zmap_core::{BumpContext, BumpListener, BumpMode, CompressionScope};

use crate::config::Config;
use crate::error::CliError;
use crate::input::{ColumnFile, LayoutFile};

/// Reports bump events through the log.
struct LogListener;

impl BumpListener for LogListener {
    fn hidden_by_bump_changed(&mut self, featureset: &str, hidden: usize) {
        log::info!("{}: {} features now hidden outside the bump scope", featureset, hidden);
    }
}

pub fn execute(
    config: &Config,
    input: PathBuf,
    mode: Option<BumpMode>,
    scope: Option<CompressionScope>,
    spacing: Option<f64>,
    output: Option<PathBuf>,
) -> Result<()> {
    log::info!("Loading column from: {}", input.display());
    let mut set = ColumnFile::load(&input)?.into_feature_set()?;
    log::info!("Loaded {} features in {}", set.len(), set.name());

    let mut settings = config.bump.clone();
    if let Some(spacing) = spacing {
        if !(spacing >= 0.0) {
            return Err(CliError::validation(format!("Spacing must not be negative, got: {}", spacing)).into());
        }
        settings.spacing = spacing;
    }
    let mode = mode.unwrap_or(settings.default_mode);
    let scope = scope.unwrap_or(settings.default_scope);
    let mut ctx = BumpContext::new(settings);

    let outcome = set
        .bump(&mut ctx, mode, scope, &mut LogListener)
        .map_err(CliError::from)?;
    log::info!(
        "Bumped {} as {}: {} lanes, width {}",
        set.name(),
        mode,
        outcome.lanes,
        outcome.bump_width
    );
    if outcome.skipped_chains > 0 {
        log::warn!("{} composite features had broken chains and were not laid out", outcome.skipped_chains);
    }

    let mut long_items = LongItems::with_window_size(config.canvas.max_zoom, config.canvas.max_window_size);
    let layout = LayoutFile::new(&set, outcome, &mut long_items);
    if !layout.long_features.is_empty() {
        log::info!(
            "{} features exceed {} pixels at zoom {} and will be cropped when drawn",
            layout.long_features.len(),
            config.canvas.max_window_size,
            config.canvas.max_zoom
        );
    }
    let json = serde_json::to_string_pretty(&layout).context("Failed to serialize layout")?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write layout: {}", path.display()))?;
            log::info!("Layout written to: {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

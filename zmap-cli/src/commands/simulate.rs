//! Simulate command implementation - bump a random column and time it

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::time::Instant;
use zmap_core::{
    BumpContext, BumpMode, BumpOutcome, ColumnStyle, FeatureInterval, FeatureSet, NoopListener,
};

use crate::config::Config;
use crate::error::CliError;

const GROUPS: [&str; 6] = ["vertebrate_mRNA", "human_est", "mouse_est", "swissprot", "trembl", "ditag"];

/// Shape of the random column.
#[derive(Debug, Clone, Copy)]
pub struct SimulationParams {
    pub features: usize,
    pub seed: u64,
    /// Length of the simulated sequence.
    pub region: u64,
    pub max_len: u64,
    /// Percentage of features that are composites.
    pub composite_percent: u32,
}

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub features: usize,
    pub seed: u64,
    pub outcome: BumpOutcome,
    pub pool_records: usize,
    pub elapsed_ms: f64,
}

/// Deterministic for a given seed.
pub fn generate_column(params: &SimulationParams) -> Result<FeatureSet> {
    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut set = FeatureSet::new("simulated", ColumnStyle::default());
    let keys: Vec<_> = GROUPS.iter().map(|name| set.intern_group(name)).collect();
    let max_len = params.max_len.max(1);
    let region = params.region.max(max_len + 1);

    for _ in 0..params.features {
        let key = keys[rng.gen_range(0..keys.len())];
        let width = rng.gen_range(4..=10) as f64;
        let start = rng.gen_range(1..=region - max_len);

        if rng.gen_range(0..100) < params.composite_percent {
            let blocks = rng.gen_range(2..=5);
            let mut pos = start;
            let mut parts = Vec::with_capacity(blocks);
            for _ in 0..blocks {
                let len = rng.gen_range(1..=max_len / 4 + 1);
                parts.push(FeatureInterval::new(pos, pos + len, width)?.with_group(key));
                pos += len + rng.gen_range(1..=max_len / 2 + 1);
            }
            set.add_composite(parts)?;
        } else {
            let len = rng.gen_range(0..max_len);
            set.add_feature(FeatureInterval::new(start, start + len, width)?.with_group(key));
        }
    }

    Ok(set)
}

pub fn execute(config: &Config, params: SimulationParams, mode: Option<BumpMode>) -> Result<()> {
    let mode = mode.unwrap_or(config.bump.default_mode);
    log::info!(
        "Simulating {} features over {} bases (seed {})",
        params.features,
        params.region,
        params.seed
    );
    let mut set = generate_column(&params)?;
    set.ensure_index();

    let mut ctx = BumpContext::new(config.bump.clone());
    let started = Instant::now();
    let outcome = set
        .bump(&mut ctx, mode, config.bump.default_scope, &mut NoopListener)
        .map_err(CliError::from)?;
    let elapsed = started.elapsed();

    log::info!(
        "{}: {} lanes, {} comparisons in {:.2?}",
        mode,
        outcome.lanes,
        outcome.stats.comparisons,
        elapsed
    );

    let report = SimulationReport {
        features: set.len(),
        seed: params.seed,
        outcome,
        pool_records: ctx.pool().capacity(),
        elapsed_ms: elapsed.as_secs_f64() * 1000.0,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

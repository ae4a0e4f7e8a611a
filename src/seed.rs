use std::collections::HashSet;

use anyhow::{bail, Context};
use tracing::info;

use crate::models::IcoSeed;

/// The tracked ICO list shipped with the binary
const EMBEDDED_SEED: &str = include_str!("../data/icos.json");

/// Loads tracked ICOs from `path`, or the embedded list when no path is given
pub async fn load(path: Option<&str>) -> anyhow::Result<Vec<IcoSeed>> {
    let seeds = match path {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading seed file {path}"))?;
            parse(&raw).with_context(|| format!("parsing seed file {path}"))?
        }
        None => parse(EMBEDDED_SEED).context("parsing embedded seed")?,
    };
    info!("Tracking {} ICOs", seeds.len());
    Ok(seeds)
}

pub fn parse(raw: &str) -> anyhow::Result<Vec<IcoSeed>> {
    let seeds: Vec<IcoSeed> = serde_json::from_str(raw)?;

    let mut ids = HashSet::new();
    for seed in &seeds {
        if !ids.insert(seed.id.as_str()) {
            bail!("duplicate ICO id {}", seed.id);
        }
        if seed.start_date.is_some() && seed.start_date().is_none() {
            bail!("ICO {} has a start date not in MM/DD/YYYY form", seed.id);
        }
    }
    Ok(seeds)
}

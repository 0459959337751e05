use crate::ir::Vocabulary;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Region size while it holds 0-2 nodes.
    pub region_base_width: f32,
    pub region_base_height: f32,
    /// Growth factor for regions holding 3-4 nodes.
    pub medium_scale: f32,
    /// Growth factor for regions holding 5-6 nodes.
    pub large_scale: f32,
    /// Rendered node box.
    pub node_width: f32,
    pub node_height: f32,
    /// Space reserved per node when a crowded region grows into a sub-grid.
    pub node_footprint_width: f32,
    pub node_footprint_height: f32,
    /// Inner padding between a region border and its nodes.
    pub region_padding: f32,
    /// Gap between neighbouring regions of the 3x3 grid.
    pub region_gap: f32,
    /// Minimum clearance kept between siblings after a drag settles.
    pub collision_gap: f32,
    pub collision_iterations: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            region_base_width: 300.0,
            region_base_height: 240.0,
            medium_scale: 1.3,
            large_scale: 1.6,
            node_width: 120.0,
            node_height: 60.0,
            node_footprint_width: 150.0,
            node_footprint_height: 100.0,
            region_padding: 30.0,
            region_gap: 40.0,
            collision_gap: 12.0,
            collision_iterations: 16,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HistoryConfig {
    /// Maximum number of retained snapshots; unbounded when absent.
    pub capacity: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionConfig {
    pub idle_opacity: f32,
    pub focal_opacity: f32,
    pub related_opacity: f32,
    pub suppressed_opacity: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            idle_opacity: 1.0,
            focal_opacity: 1.0,
            related_opacity: 0.85,
            suppressed_opacity: 0.25,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IngestConfig {
    /// Vocabulary used when the semantic graph is exported.
    pub vocabulary: Vocabulary,
    /// Generate ids for nodes that arrive without one instead of dropping them.
    pub generate_missing_ids: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            vocabulary: Vocabulary::Portuguese,
            generate_missing_ids: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub layout: LayoutConfig,
    pub history: HistoryConfig,
    pub interaction: InteractionConfig,
    pub ingest: IngestConfig,
}

/// Loads a JSON5 config file over the defaults. Missing keys keep their
/// default values.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("parsing config file {}", path.display()))
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = json5::from_str(contents)?;
    Ok(config)
}

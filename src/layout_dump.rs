use crate::config::LayoutConfig;
use crate::ir::{HandleSide, Vocabulary};
use crate::layout::{Layout, absolute_center};
use crate::model::GraphModel;
use crate::session::EditorSession;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Canvas-space snapshot of a laid-out process network, for renderers and
/// debugging.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub regions: Vec<RegionDump>,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionDump {
    pub id: String,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub id: String,
    pub label: String,
    pub category: String,
    pub region: String,
    /// Absolute top-left corner.
    pub x: f32,
    pub y: f32,
    /// Region-relative top-left corner.
    pub local_x: f32,
    pub local_y: f32,
    pub width: f32,
    pub height: f32,
    pub is_target: bool,
    pub is_moderator: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDump {
    pub id: String,
    pub from: String,
    pub to: String,
    pub source_handle: Option<HandleSide>,
    pub target_handle: Option<HandleSide>,
    pub weight: String,
    pub polarity: String,
    pub bidirectional: bool,
    /// Node centres, source first.
    pub points: Vec<[f32; 2]>,
}

impl LayoutDump {
    pub fn from_layout(
        layout: &Layout,
        model: &GraphModel,
        config: &LayoutConfig,
        vocabulary: Vocabulary,
    ) -> Self {
        let regions = layout
            .regions
            .iter()
            .map(|frame| RegionDump {
                id: frame.region.container_id().to_string(),
                label: frame.region.category().label(vocabulary).to_string(),
                x: frame.x,
                y: frame.y,
                width: frame.width,
                height: frame.height,
                nodes: frame.node_ids.clone(),
            })
            .collect();

        let nodes = model
            .nodes()
            .iter()
            .map(|node| {
                let origin = layout.to_absolute(node.region, node.position);
                NodeDump {
                    id: node.id.clone(),
                    label: node.label.clone(),
                    category: node.category.label(vocabulary).to_string(),
                    region: node.region.container_id().to_string(),
                    x: origin.x,
                    y: origin.y,
                    local_x: node.position.x,
                    local_y: node.position.y,
                    width: config.node_width,
                    height: config.node_height,
                    is_target: node.is_target,
                    is_moderator: node.is_moderator,
                }
            })
            .collect();

        let edges = model
            .edges()
            .iter()
            .map(|edge| {
                let points = [&edge.source, &edge.target]
                    .into_iter()
                    .filter_map(|id| model.node(id))
                    .map(|node| {
                        let center = absolute_center(node, layout, config);
                        [center.x, center.y]
                    })
                    .collect();
                EdgeDump {
                    id: edge.id.clone(),
                    from: edge.source.clone(),
                    to: edge.target.clone(),
                    source_handle: edge.source_handle,
                    target_handle: edge.target_handle,
                    weight: edge.weight.token(vocabulary).to_string(),
                    polarity: edge.polarity.token(vocabulary).to_string(),
                    bidirectional: edge.bidirectional,
                    points,
                }
            })
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            regions,
            nodes,
            edges,
        }
    }

    pub fn from_session(session: &EditorSession) -> Self {
        let config = session.config();
        Self::from_layout(
            session.layout(),
            session.model(),
            &config.layout,
            config.ingest.vocabulary,
        )
    }
}

pub fn write_layout_dump(path: &Path, session: &EditorSession) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_session(session);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

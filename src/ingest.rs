//! Boundary between caller payloads and the typed graph.
//!
//! Caller records are loosely typed (ids may be numbers, flags may be
//! strings, enum values come in two languages). Everything is parsed into
//! `Raw*` structs first and then validated or coerced into `Node`/`Edge`.
//! Every coercion is recorded in an `IngestReport`; nothing is silently lost
//! except what the report says was dropped.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::ir::{Category, ChangeStatus, Edge, Node, Point, Polarity, Vocabulary, Weight};
use crate::model::{GraphModel, unique_edge_id};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawNode {
    #[serde(deserialize_with = "loose_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub label: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub category: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub change: Option<String>,
    #[serde(deserialize_with = "loose_bool")]
    pub is_target: Option<bool>,
    #[serde(deserialize_with = "loose_bool")]
    pub is_moderator: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawEdge {
    #[serde(deserialize_with = "loose_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub source: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub target: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub relation: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub weight: Option<String>,
    #[serde(deserialize_with = "loose_bool")]
    pub bidirectional: Option<bool>,
    #[serde(deserialize_with = "loose_string")]
    pub polarity: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub reverse_weight: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub reverse_polarity: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawGraph {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawEdge>,
}

/// Semantic node as persisted by the caller: no position, region or handles.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticNode {
    pub id: String,
    pub label: String,
    pub category: String,
    pub change: String,
    pub is_target: bool,
    pub is_moderator: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticEdge {
    pub source: String,
    pub target: String,
    pub relation: String,
    pub weight: String,
    pub bidirectional: bool,
    pub polarity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse_polarity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SemanticGraph {
    pub nodes: Vec<SemanticNode>,
    pub edges: Vec<SemanticEdge>,
}

impl SemanticGraph {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// One coercion or drop performed while ingesting a payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestIssue {
    #[error("node #{index} had no id; generated `{id}`")]
    GeneratedNodeId { index: usize, id: String },
    #[error("node #{index} had no id and was dropped")]
    DroppedNodeWithoutId { index: usize },
    #[error("duplicate node `{0}` dropped")]
    DuplicateNode(String),
    #[error("node `{node}` has no category; placed in Context")]
    MissingCategory { node: String },
    #[error("node `{node}` has unknown category `{category}`; placed in Context")]
    UnknownCategory { node: String, category: String },
    #[error("node `{node}` has unknown change status `{value}`; using stable")]
    UnknownChange { node: String, value: String },
    #[error("edge #{index} has unknown weight `{value}`; using moderate")]
    UnknownWeight { index: usize, value: String },
    #[error("edge #{index} has unknown polarity `{value}`; using positive")]
    UnknownPolarity { index: usize, value: String },
    #[error("edge #{index} references missing node `{node}`; dropped")]
    DanglingEdge { index: usize, node: String },
    #[error("edge #{index} loops on `{node}`; dropped")]
    SelfLoop { index: usize, node: String },
    #[error("edge #{index} reuses id `{id}`; dropped")]
    DuplicateEdge { index: usize, id: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub issues: Vec<IngestIssue>,
}

impl IngestReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    fn push(&mut self, issue: IngestIssue) {
        match &issue {
            IngestIssue::UnknownCategory { .. } => debug!("{issue}"),
            _ => warn!("{issue}"),
        }
        self.issues.push(issue);
    }
}

pub fn parse_graph(
    json: &str,
    config: &IngestConfig,
) -> Result<(GraphModel, IngestReport), IngestError> {
    let raw: RawGraph = serde_json::from_str(json)?;
    ingest(raw, config)
}

/// Validates a raw payload into a graph model. Positions are left at the
/// origin; callers run a layout pass afterwards.
pub fn ingest(
    raw: RawGraph,
    config: &IngestConfig,
) -> Result<(GraphModel, IngestReport), IngestError> {
    let mut report = IngestReport::default();
    let mut nodes: Vec<Node> = Vec::with_capacity(raw.nodes.len());
    let mut node_ids: HashSet<String> = HashSet::new();

    for (index, raw_node) in raw.nodes.into_iter().enumerate() {
        let id = match raw_node.id.filter(|id| !id.trim().is_empty()) {
            Some(id) => id,
            None if config.generate_missing_ids => {
                let id = Uuid::new_v4().to_string();
                report.push(IngestIssue::GeneratedNodeId {
                    index,
                    id: id.clone(),
                });
                id
            }
            None => {
                report.push(IngestIssue::DroppedNodeWithoutId { index });
                continue;
            }
        };
        if !node_ids.insert(id.clone()) {
            report.push(IngestIssue::DuplicateNode(id));
            continue;
        }

        let category = match raw_node.category.as_deref().map(str::trim) {
            None | Some("") => {
                report.push(IngestIssue::MissingCategory { node: id.clone() });
                Category::Context
            }
            Some(value) => Category::parse(value),
        };
        if let Category::Other(raw_category) = &category {
            report.push(IngestIssue::UnknownCategory {
                node: id.clone(),
                category: raw_category.clone(),
            });
        }
        let change = match raw_node.change.as_deref() {
            None | Some("") => ChangeStatus::default(),
            Some(value) => ChangeStatus::from_token(value).unwrap_or_else(|| {
                report.push(IngestIssue::UnknownChange {
                    node: id.clone(),
                    value: value.to_string(),
                });
                ChangeStatus::default()
            }),
        };

        nodes.push(Node {
            label: raw_node.label.unwrap_or_else(|| id.clone()),
            region: category.region(),
            id,
            category,
            change,
            is_target: raw_node.is_target.unwrap_or(false),
            is_moderator: raw_node.is_moderator.unwrap_or(false),
            position: Point::default(),
        });
    }

    // Explicit edge ids win over generated ones, wherever they appear.
    let reserved: HashSet<String> = raw
        .edges
        .iter()
        .filter_map(|edge| edge.id.clone())
        .filter(|id| !id.trim().is_empty())
        .collect();
    let mut edges: Vec<Edge> = Vec::with_capacity(raw.edges.len());
    for (index, raw_edge) in raw.edges.into_iter().enumerate() {
        let source = raw_edge.source.unwrap_or_default();
        let target = raw_edge.target.unwrap_or_default();
        if let Some(missing) = [&source, &target]
            .into_iter()
            .find(|endpoint| !node_ids.contains(endpoint.as_str()))
        {
            report.push(IngestIssue::DanglingEdge {
                index,
                node: missing.clone(),
            });
            continue;
        }
        if source == target {
            report.push(IngestIssue::SelfLoop {
                index,
                node: source,
            });
            continue;
        }

        let weight = coerce_weight(raw_edge.weight.as_deref(), index, &mut report);
        let polarity = coerce_polarity(raw_edge.polarity.as_deref(), index, &mut report);
        let bidirectional = raw_edge.bidirectional.unwrap_or(false);
        let reverse_weight = raw_edge
            .reverse_weight
            .as_deref()
            .filter(|_| bidirectional)
            .map(|value| coerce_weight(Some(value), index, &mut report));
        let reverse_polarity = raw_edge
            .reverse_polarity
            .as_deref()
            .filter(|_| bidirectional)
            .map(|value| coerce_polarity(Some(value), index, &mut report));

        let id = match raw_edge.id.filter(|id| !id.trim().is_empty()) {
            Some(id) if edges.iter().any(|e| e.id == id) => {
                report.push(IngestIssue::DuplicateEdge { index, id });
                continue;
            }
            Some(id) => id,
            None => unique_edge_id(&source, &target, |candidate| {
                reserved.contains(candidate) || edges.iter().any(|e| e.id == candidate)
            }),
        };

        let edge = Edge {
            id,
            source,
            target,
            relation: raw_edge.relation.unwrap_or_default(),
            weight,
            polarity,
            bidirectional,
            reverse_weight,
            reverse_polarity,
            source_handle: None,
            target_handle: None,
        };
        edges.push(edge);
    }

    let model = GraphModel::from_parts(nodes, edges)?;
    debug!(
        nodes = model.nodes().len(),
        edges = model.edges().len(),
        issues = report.issues.len(),
        "ingested process network"
    );
    Ok((model, report))
}

fn coerce_weight(value: Option<&str>, index: usize, report: &mut IngestReport) -> Weight {
    match value {
        None | Some("") => Weight::default(),
        Some(value) => Weight::from_token(value).unwrap_or_else(|| {
            report.push(IngestIssue::UnknownWeight {
                index,
                value: value.to_string(),
            });
            Weight::default()
        }),
    }
}

fn coerce_polarity(value: Option<&str>, index: usize, report: &mut IngestReport) -> Polarity {
    match value {
        None | Some("") => Polarity::default(),
        Some(value) => Polarity::from_token(value).unwrap_or_else(|| {
            report.push(IngestIssue::UnknownPolarity {
                index,
                value: value.to_string(),
            });
            Polarity::default()
        }),
    }
}

/// Strips layout data and renders enum values in `vocabulary`.
pub fn export(model: &GraphModel, vocabulary: Vocabulary) -> SemanticGraph {
    let nodes = model
        .nodes()
        .iter()
        .map(|node| SemanticNode {
            id: node.id.clone(),
            label: node.label.clone(),
            category: node.category.label(vocabulary).to_string(),
            change: node.change.token(vocabulary).to_string(),
            is_target: node.is_target,
            is_moderator: node.is_moderator,
        })
        .collect();
    let edges = model
        .edges()
        .iter()
        .map(|edge| SemanticEdge {
            source: edge.source.clone(),
            target: edge.target.clone(),
            relation: edge.relation.clone(),
            weight: edge.weight.token(vocabulary).to_string(),
            bidirectional: edge.bidirectional,
            polarity: edge.polarity.token(vocabulary).to_string(),
            reverse_weight: edge
                .effective_reverse_weight()
                .map(|w| w.token(vocabulary).to_string()),
            reverse_polarity: edge
                .effective_reverse_polarity()
                .map(|p| p.token(vocabulary).to_string()),
        })
        .collect();
    SemanticGraph { nodes, edges }
}

fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

fn loose_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => Some(b),
        Value::Number(n) => n.as_f64().map(|v| v != 0.0),
        Value::String(s) => match crate::ir::normalize_token(&s).as_str() {
            "true" | "sim" | "yes" | "1" => Some(true),
            "false" | "nao" | "no" | "0" | "" => Some(false),
            _ => None,
        },
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

//! Focus and highlight model.
//!
//! A hovered or selected node becomes the focal element; elements one hop
//! away from it are related and everything else is suppressed. Hover wins
//! over selection while the pointer is over a node.

use serde::Serialize;

use crate::config::InteractionConfig;
use crate::model::GraphModel;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum Selection {
    Node(String),
    Edge(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Emphasis {
    /// Nothing is focused.
    Normal,
    Focal,
    Related,
    Suppressed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusMode<'a> {
    Idle,
    Context { focal: &'a str },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDecoration {
    pub id: String,
    pub emphasis: Emphasis,
    pub opacity: f32,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDecoration {
    pub id: String,
    pub emphasis: Emphasis,
    pub opacity: f32,
    pub label_visible: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    hovered: Option<String>,
    selected: Option<Selection>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hover_enter(&mut self, node_id: &str) {
        self.hovered = Some(node_id.to_string());
    }

    /// Ignores a leave event for a node that is no longer hovered.
    pub fn hover_leave(&mut self, node_id: &str) {
        if self.hovered.as_deref() == Some(node_id) {
            self.hovered = None;
        }
    }

    pub fn select(&mut self, selection: Selection) {
        self.selected = Some(selection);
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selected.as_ref()
    }

    pub fn mode(&self) -> FocusMode<'_> {
        match self.focal() {
            Some(focal) => FocusMode::Context { focal },
            None => FocusMode::Idle,
        }
    }

    pub fn focal(&self) -> Option<&str> {
        self.hovered.as_deref().or(match &self.selected {
            Some(Selection::Node(id)) => Some(id.as_str()),
            _ => None,
        })
    }

    /// Drops hover/selection pointing at elements that no longer exist.
    pub fn forget_missing(&mut self, model: &GraphModel) {
        if self
            .hovered
            .as_deref()
            .is_some_and(|id| !model.contains_node(id))
        {
            self.hovered = None;
        }
        let stale = match &self.selected {
            Some(Selection::Node(id)) => !model.contains_node(id),
            Some(Selection::Edge(id)) => model.edge(id).is_none(),
            None => false,
        };
        if stale {
            self.selected = None;
        }
    }

    pub fn node_emphasis(&self, model: &GraphModel, node_id: &str) -> Emphasis {
        let Some(focal) = self.focal() else {
            return Emphasis::Normal;
        };
        if focal == node_id {
            return Emphasis::Focal;
        }
        let adjacent = model
            .edges_touching(focal)
            .any(|edge| edge.touches(node_id));
        if adjacent {
            Emphasis::Related
        } else {
            Emphasis::Suppressed
        }
    }

    pub fn edge_emphasis(&self, model: &GraphModel, edge_id: &str) -> Emphasis {
        let Some(focal) = self.focal() else {
            return Emphasis::Normal;
        };
        match model.edge(edge_id) {
            Some(edge) if edge.touches(focal) => Emphasis::Related,
            _ => Emphasis::Suppressed,
        }
    }

    /// Per-element render hints for the whole graph.
    pub fn decorate(
        &self,
        model: &GraphModel,
        config: &InteractionConfig,
    ) -> (Vec<NodeDecoration>, Vec<EdgeDecoration>) {
        let nodes = model
            .nodes()
            .iter()
            .map(|node| {
                let emphasis = self.node_emphasis(model, &node.id);
                NodeDecoration {
                    id: node.id.clone(),
                    emphasis,
                    opacity: opacity(emphasis, config),
                    selected: self.selected == Some(Selection::Node(node.id.clone())),
                }
            })
            .collect();
        let edges = model
            .edges()
            .iter()
            .map(|edge| {
                let emphasis = self.edge_emphasis(model, &edge.id);
                EdgeDecoration {
                    id: edge.id.clone(),
                    emphasis,
                    opacity: opacity(emphasis, config),
                    label_visible: emphasis == Emphasis::Related,
                    selected: self.selected == Some(Selection::Edge(edge.id.clone())),
                }
            })
            .collect();
        (nodes, edges)
    }
}

fn opacity(emphasis: Emphasis, config: &InteractionConfig) -> f32 {
    match emphasis {
        Emphasis::Normal => config.idle_opacity,
        Emphasis::Focal => config.focal_opacity,
        Emphasis::Related => config.related_opacity,
        Emphasis::Suppressed => config.suppressed_opacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Category, EdgeSpec, NodeSpec};

    fn chain() -> GraphModel {
        // a -> b -> c, d isolated
        let mut model = GraphModel::new();
        for (id, category) in [
            ("a", Category::Cognitive),
            ("b", Category::Affective),
            ("c", Category::Behavioral),
            ("d", Category::Context),
        ] {
            model
                .add_node(NodeSpec::new(id, category).with_id(id))
                .expect("node");
        }
        model.add_edge(EdgeSpec::new("a", "b")).expect("edge");
        model.add_edge(EdgeSpec::new("b", "c")).expect("edge");
        model
    }

    #[test]
    fn idle_shows_everything_without_labels() {
        let model = chain();
        let controller = InteractionController::new();
        assert_eq!(controller.mode(), FocusMode::Idle);
        let (nodes, edges) = controller.decorate(&model, &InteractionConfig::default());
        assert!(nodes.iter().all(|n| n.emphasis == Emphasis::Normal));
        assert!(edges.iter().all(|e| !e.label_visible));
    }

    #[test]
    fn hover_classifies_one_hop_neighbourhood() {
        let model = chain();
        let mut controller = InteractionController::new();
        controller.hover_enter("a");
        assert_eq!(controller.mode(), FocusMode::Context { focal: "a" });

        assert_eq!(controller.node_emphasis(&model, "a"), Emphasis::Focal);
        assert_eq!(controller.node_emphasis(&model, "b"), Emphasis::Related);
        // two hops away
        assert_eq!(controller.node_emphasis(&model, "c"), Emphasis::Suppressed);
        assert_eq!(controller.node_emphasis(&model, "d"), Emphasis::Suppressed);
        assert_eq!(controller.edge_emphasis(&model, "e-a-b"), Emphasis::Related);
        assert_eq!(controller.edge_emphasis(&model, "e-b-c"), Emphasis::Suppressed);

        let (_, edges) = controller.decorate(&model, &InteractionConfig::default());
        let visible: Vec<&str> = edges
            .iter()
            .filter(|e| e.label_visible)
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(visible, vec!["e-a-b"]);
    }

    #[test]
    fn hover_takes_precedence_over_selection() {
        let mut controller = InteractionController::new();
        controller.select(Selection::Node("c".into()));
        assert_eq!(controller.focal(), Some("c"));
        controller.hover_enter("a");
        assert_eq!(controller.focal(), Some("a"));
        controller.hover_leave("a");
        assert_eq!(controller.focal(), Some("c"));
        controller.deselect();
        assert_eq!(controller.mode(), FocusMode::Idle);
    }

    #[test]
    fn stale_leave_does_not_clear_current_hover() {
        let mut controller = InteractionController::new();
        controller.hover_enter("a");
        controller.hover_enter("b");
        controller.hover_leave("a");
        assert_eq!(controller.hovered(), Some("b"));
    }

    #[test]
    fn edge_selection_does_not_create_focus() {
        let mut controller = InteractionController::new();
        controller.select(Selection::Edge("e-a-b".into()));
        assert_eq!(controller.mode(), FocusMode::Idle);
    }

    #[test]
    fn forgets_deleted_elements() {
        let mut model = chain();
        let mut controller = InteractionController::new();
        controller.hover_enter("b");
        controller.select(Selection::Edge("e-a-b".into()));
        model.remove_node("b").expect("remove");
        controller.forget_missing(&model);
        assert_eq!(controller.hovered(), None);
        assert_eq!(controller.selection(), None);
    }

    #[test]
    fn opacities_follow_config() {
        let model = chain();
        let config = InteractionConfig::default();
        let mut controller = InteractionController::new();
        controller.hover_enter("b");
        let (nodes, _) = controller.decorate(&model, &config);
        let by_id = |id: &str| nodes.iter().find(|n| n.id == id).map(|n| n.opacity);
        assert_eq!(by_id("b"), Some(config.focal_opacity));
        assert_eq!(by_id("a"), Some(config.related_opacity));
        assert_eq!(by_id("d"), Some(config.suppressed_opacity));
    }
}

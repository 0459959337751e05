//! Editor session: the one owner of graph, layout, history and focus state.
//!
//! Every committed mutation follows the same sequence: apply to the model,
//! refresh the region layout, push one history snapshot, emit the semantic
//! graph to the sink. Drag frames and hover changes never commit.
//!
//! Handles are inferred when an edge is created, on auto-organize and when
//! an endpoint changes region. A commit also re-infers every cross-region
//! edge touching a region whose container moved on the grid. Drags inside a
//! region keep the existing handles.

use tracing::debug;

use crate::config::Config;
use crate::connection::{ConnectionDrop, HandlePair, resolve_connection, resolve_handles};
use crate::error::{EditorError, IngestError};
use crate::history::HistoryStack;
use crate::ingest::{IngestReport, RawGraph, SemanticGraph, export, ingest};
use crate::interaction::{EdgeDecoration, InteractionController, NodeDecoration, Selection};
use crate::ir::{
    Category, ChangeStatus, EdgePatch, EdgeSpec, NodePatch, NodeSpec, Point, Polarity, Weight,
};
use crate::layout::{
    self, CollisionResult, Layout, Rect, Region, absolute_center, compute_layout,
    default_position, node_rect, settle_node,
};
use crate::model::{GraphModel, Snapshot};
use crate::shortcuts::{KeyChord, ShortcutAction};

/// Receives the caller-facing graph after every committed change.
pub trait GraphSink {
    fn graph_changed(&mut self, graph: &SemanticGraph);
}

impl<F> GraphSink for F
where
    F: FnMut(&SemanticGraph),
{
    fn graph_changed(&mut self, graph: &SemanticGraph) {
        self(graph)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeForm {
    pub id: String,
    pub label: String,
    pub category: Category,
    pub change: ChangeStatus,
    pub is_target: bool,
    pub is_moderator: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeForm {
    pub id: String,
    pub relation: String,
    pub weight: Weight,
    pub polarity: Polarity,
    pub bidirectional: bool,
    /// Ignored unless `bidirectional` is set.
    pub reverse_weight: Weight,
    pub reverse_polarity: Polarity,
}

/// Editable copy of one element, handed out by [`EditorSession::open_edit`].
#[derive(Debug, Clone, PartialEq)]
pub enum EditForm {
    Node(NodeForm),
    Edge(EdgeForm),
}

impl EditForm {
    fn selection(&self) -> Selection {
        match self {
            EditForm::Node(form) => Selection::Node(form.id.clone()),
            EditForm::Edge(form) => Selection::Edge(form.id.clone()),
        }
    }
}

#[derive(Debug, Clone)]
struct DragState {
    node_id: String,
    origin: Point,
}

pub struct EditorSession {
    config: Config,
    model: GraphModel,
    layout: Layout,
    history: HistoryStack<Snapshot>,
    interaction: InteractionController,
    editing: Option<Selection>,
    drag: Option<DragState>,
    mounted: bool,
    sink: Option<Box<dyn GraphSink>>,
    /// Regions whose container moved since the last commit.
    moved_regions: Vec<Region>,
}

impl EditorSession {
    /// Empty session. The empty graph is the initial history state.
    pub fn new(config: Config) -> Self {
        Self::from_model(GraphModel::new(), config)
    }

    /// Session over an already-validated model. Runs one auto-organize pass
    /// and seeds the history with the result.
    pub fn from_model(model: GraphModel, config: Config) -> Self {
        let mut session = Self {
            layout: compute_layout(model.nodes(), &config.layout),
            history: HistoryStack::with_capacity(config.history.capacity),
            config,
            model,
            interaction: InteractionController::new(),
            editing: None,
            drag: None,
            mounted: true,
            sink: None,
            moved_regions: Vec::new(),
        };
        session.organize_in_place();
        session.history.set_initial_state(session.model.snapshot());
        session
    }

    pub fn from_raw(raw: RawGraph, config: Config) -> Result<(Self, IngestReport), IngestError> {
        let (model, report) = ingest(raw, &config.ingest)?;
        Ok((Self::from_model(model, config), report))
    }

    pub fn from_json(json: &str, config: Config) -> Result<(Self, IngestReport), IngestError> {
        let raw: RawGraph = serde_json::from_str(json)?;
        Self::from_raw(raw, config)
    }

    /// Replaces the graph with a new caller payload. Seeds the history when
    /// nothing has been recorded yet; otherwise the reload is one undoable
    /// step.
    pub fn reload(&mut self, raw: RawGraph) -> Result<IngestReport, IngestError> {
        let (model, report) = ingest(raw, &self.config.ingest)?;
        self.model = model;
        self.editing = None;
        self.drag = None;
        self.interaction.forget_missing(&self.model);
        self.organize_in_place();
        if self.history.set_initial_state(self.model.snapshot()) {
            self.emit();
        } else {
            self.commit();
        }
        Ok(report)
    }

    pub fn set_sink(&mut self, sink: impl GraphSink + 'static) {
        self.sink = Some(Box::new(sink));
    }

    pub fn clear_sink(&mut self) {
        self.sink = None;
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn history(&self) -> &HistoryStack<Snapshot> {
        &self.history
    }

    pub fn interaction(&self) -> &InteractionController {
        &self.interaction
    }

    pub fn semantic(&self) -> SemanticGraph {
        export(&self.model, self.config.ingest.vocabulary)
    }

    /// Re-runs the full layout and handle inference. One snapshot.
    pub fn auto_organize(&mut self) -> Snapshot {
        self.organize_in_place();
        self.commit()
    }

    pub fn add_node(&mut self, spec: NodeSpec) -> Result<Snapshot, EditorError> {
        self.model.add_node(spec)?;
        if let Some(id) = self.model.nodes().last().map(|n| n.id.clone()) {
            self.refresh_layout();
            self.place_in_region(&id)?;
        }
        Ok(self.commit())
    }

    /// Applies a node patch. A category change moves the node to the centre
    /// of its new region and re-settles it there.
    pub fn update_node(&mut self, id: &str, patch: NodePatch) -> Result<Snapshot, EditorError> {
        let old_region = self
            .model
            .node(id)
            .map(|n| n.region)
            .ok_or_else(|| EditorError::UnknownNode(id.to_string()))?;
        self.model.update_node(id, patch)?;
        let new_region = self.model.node(id).map(|n| n.region).unwrap_or(old_region);
        self.refresh_layout();
        if new_region != old_region {
            debug!(node = %id, from = ?old_region, to = ?new_region, "reassigning region");
            self.place_in_region(id)?;
            self.clamp_region(old_region);
            self.refresh_handles_for(id);
        }
        Ok(self.commit())
    }

    /// Removes a node and its edges. The region it leaves may drop a size
    /// tier, so the remaining members are pulled back inside and re-settled.
    pub fn delete_node(&mut self, id: &str) -> Result<Snapshot, EditorError> {
        let region = self
            .model
            .node(id)
            .map(|n| n.region)
            .ok_or_else(|| EditorError::UnknownNode(id.to_string()))?;
        self.model.remove_node(id)?;
        if self.drag.as_ref().is_some_and(|d| d.node_id == id) {
            self.drag = None;
        }
        self.forget_stale();
        self.refresh_layout();
        self.clamp_region(region);
        Ok(self.commit())
    }

    /// Creates an edge from a connection gesture, inferring facing handles
    /// from the current node centres.
    pub fn connect(&mut self, mut spec: EdgeSpec, drop: ConnectionDrop) -> Result<Snapshot, EditorError> {
        let source = self.center_of(&spec.source)?;
        let target = self.center_of(&spec.target)?;
        let handles = resolve_connection(drop, source, target);
        spec.source_handle = Some(handles.source);
        spec.target_handle = Some(handles.target);
        self.model.add_edge(spec)?;
        Ok(self.commit())
    }

    pub fn update_edge(&mut self, id: &str, patch: EdgePatch) -> Result<Snapshot, EditorError> {
        self.model.update_edge(id, patch)?;
        Ok(self.commit())
    }

    pub fn delete_edge(&mut self, id: &str) -> Result<Snapshot, EditorError> {
        self.model.remove_edge(id)?;
        self.forget_stale();
        Ok(self.commit())
    }

    /// One drag frame: moves the node inside its region without recording
    /// history. The position is region-relative.
    pub fn drag_node(&mut self, id: &str, position: Point) -> Result<(), EditorError> {
        let node = self
            .model
            .node(id)
            .ok_or_else(|| EditorError::UnknownNode(id.to_string()))?;
        if self.drag.as_ref().is_none_or(|d| d.node_id != id) {
            self.drag = Some(DragState {
                node_id: id.to_string(),
                origin: node.position,
            });
        }
        let frame = self.layout.region(node.region);
        let interior = frame.interior(self.config.layout.region_padding);
        let rect = Rect::at(position, self.config.layout.node_width, self.config.layout.node_height);
        self.model.set_position(id, interior.clamp_inside(rect).origin())
    }

    /// Ends a drag: settles the node against its siblings and records
    /// exactly one snapshot.
    pub fn end_drag(&mut self, id: &str) -> Result<CollisionResult, EditorError> {
        self.drag = None;
        let result = self
            .on_settled(id)
            .ok_or_else(|| EditorError::UnknownNode(id.to_string()))?;
        self.model.set_position(id, result.resolved)?;
        self.commit();
        Ok(result)
    }

    /// Abandons an in-flight drag and puts the node back.
    pub fn cancel_drag(&mut self) -> Result<(), EditorError> {
        match self.drag.take() {
            Some(drag) => self.model.set_position(&drag.node_id, drag.origin),
            None => Ok(()),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Post-drag collision pass for one node. Pure over the current state.
    pub fn on_settled(&self, id: &str) -> Option<CollisionResult> {
        settle_node(self.model.nodes(), id, &self.layout, &self.config.layout)
    }

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.apply_history(&snapshot);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.apply_history(&snapshot);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Keyboard shortcuts only apply while the editor is mounted.
    pub fn mount(&mut self) {
        self.mounted = true;
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    /// Returns whether the chord was consumed. Undo/redo at the stack
    /// boundaries still consume the chord.
    pub fn handle_key(&mut self, chord: &KeyChord) -> bool {
        if !self.mounted {
            return false;
        }
        match ShortcutAction::from_chord(chord) {
            Some(ShortcutAction::Undo) => {
                self.undo();
                true
            }
            Some(ShortcutAction::Redo) => {
                self.redo();
                true
            }
            None => false,
        }
    }

    pub fn hover_enter(&mut self, node_id: &str) {
        if self.model.contains_node(node_id) {
            self.interaction.hover_enter(node_id);
        }
    }

    pub fn hover_leave(&mut self, node_id: &str) {
        self.interaction.hover_leave(node_id);
    }

    pub fn select(&mut self, selection: Selection) -> Result<(), EditorError> {
        self.ensure_exists(&selection)?;
        self.interaction.select(selection);
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.interaction.deselect();
    }

    pub fn decorate(&self) -> (Vec<NodeDecoration>, Vec<EdgeDecoration>) {
        self.interaction.decorate(&self.model, &self.config.interaction)
    }

    /// Opens the edit form for a node or edge and selects it.
    pub fn open_edit(&mut self, selection: Selection) -> Result<EditForm, EditorError> {
        let form = match &selection {
            Selection::Node(id) => {
                let node = self
                    .model
                    .node(id)
                    .ok_or_else(|| EditorError::UnknownNode(id.clone()))?;
                EditForm::Node(NodeForm {
                    id: node.id.clone(),
                    label: node.label.clone(),
                    category: node.category.clone(),
                    change: node.change,
                    is_target: node.is_target,
                    is_moderator: node.is_moderator,
                })
            }
            Selection::Edge(id) => {
                let edge = self
                    .model
                    .edge(id)
                    .ok_or_else(|| EditorError::UnknownEdge(id.clone()))?;
                EditForm::Edge(EdgeForm {
                    id: edge.id.clone(),
                    relation: edge.relation.clone(),
                    weight: edge.weight,
                    polarity: edge.polarity,
                    bidirectional: edge.bidirectional,
                    reverse_weight: edge.reverse_weight.unwrap_or(edge.weight),
                    reverse_polarity: edge.reverse_polarity.unwrap_or(edge.polarity),
                })
            }
        };
        self.interaction.select(selection.clone());
        self.editing = Some(selection);
        Ok(form)
    }

    pub fn editing(&self) -> Option<&Selection> {
        self.editing.as_ref()
    }

    /// Commits the form for the element currently open for editing.
    pub fn save_edit(&mut self, form: EditForm) -> Result<Snapshot, EditorError> {
        let editing = self.editing.as_ref().ok_or(EditorError::NoActiveEdit)?;
        if *editing != form.selection() {
            return Err(EditorError::EditMismatch);
        }
        let snapshot = match form {
            EditForm::Node(form) => self.update_node(
                &form.id,
                NodePatch {
                    label: Some(form.label),
                    category: Some(form.category),
                    change: Some(form.change),
                    is_target: Some(form.is_target),
                    is_moderator: Some(form.is_moderator),
                },
            )?,
            EditForm::Edge(form) => {
                let (reverse_weight, reverse_polarity) = if form.bidirectional {
                    (Some(form.reverse_weight), Some(form.reverse_polarity))
                } else {
                    (None, None)
                };
                self.update_edge(
                    &form.id,
                    EdgePatch {
                        relation: Some(form.relation),
                        weight: Some(form.weight),
                        polarity: Some(form.polarity),
                        bidirectional: Some(form.bidirectional),
                        reverse_weight: Some(reverse_weight),
                        reverse_polarity: Some(reverse_polarity),
                    },
                )?
            }
        };
        self.editing = None;
        Ok(snapshot)
    }

    /// Deletes the element open for editing, cascading for nodes.
    pub fn delete_selected(&mut self) -> Result<Snapshot, EditorError> {
        let editing = self.editing.take().ok_or(EditorError::NoActiveEdit)?;
        let result = match &editing {
            Selection::Node(id) => self.delete_node(id),
            Selection::Edge(id) => self.delete_edge(id),
        };
        if result.is_err() {
            self.editing = Some(editing);
        }
        result
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    fn commit(&mut self) -> Snapshot {
        self.refresh_layout();
        self.reinfer_shifted_edges();
        let snapshot = self.model.snapshot();
        self.history.take_snapshot(snapshot.clone());
        debug!(
            pointer = self.history.pointer(),
            entries = self.history.len(),
            "committed snapshot"
        );
        self.emit();
        snapshot
    }

    fn emit(&mut self) {
        if self.sink.is_none() {
            return;
        }
        let graph = self.semantic();
        if let Some(sink) = self.sink.as_mut() {
            sink.graph_changed(&graph);
        }
    }

    fn apply_history(&mut self, snapshot: &Snapshot) {
        self.model.restore(snapshot);
        self.drag = None;
        self.forget_stale();
        self.refresh_layout();
        self.moved_regions.clear();
        debug!(
            pointer = self.history.pointer(),
            entries = self.history.len(),
            "restored snapshot"
        );
        self.emit();
    }

    fn forget_stale(&mut self) {
        self.interaction.forget_missing(&self.model);
        let stale = match &self.editing {
            Some(Selection::Node(id)) => !self.model.contains_node(id),
            Some(Selection::Edge(id)) => self.model.edge(id).is_none(),
            None => false,
        };
        if stale {
            self.editing = None;
        }
    }

    fn ensure_exists(&self, selection: &Selection) -> Result<(), EditorError> {
        match selection {
            Selection::Node(id) if !self.model.contains_node(id) => {
                Err(EditorError::UnknownNode(id.clone()))
            }
            Selection::Edge(id) if self.model.edge(id).is_none() => {
                Err(EditorError::UnknownEdge(id.clone()))
            }
            _ => Ok(()),
        }
    }

    fn refresh_layout(&mut self) {
        let layout = compute_layout(self.model.nodes(), &self.config.layout);
        for (before, after) in self.layout.regions.iter().zip(&layout.regions) {
            let moved = before.x != after.x || before.y != after.y;
            if moved && !self.moved_regions.contains(&after.region) {
                self.moved_regions.push(after.region);
            }
        }
        self.layout = layout;
    }

    fn reinfer_shifted_edges(&mut self) {
        if self.moved_regions.is_empty() {
            return;
        }
        let moved = std::mem::take(&mut self.moved_regions);
        let region_of = |id: &str| self.model.node(id).map(|n| n.region);
        let ids: Vec<String> = self
            .model
            .edges()
            .iter()
            .filter(|edge| {
                let (Some(source), Some(target)) = (region_of(&edge.source), region_of(&edge.target))
                else {
                    return false;
                };
                source != target && (moved.contains(&source) || moved.contains(&target))
            })
            .map(|edge| edge.id.clone())
            .collect();
        debug!(regions = moved.len(), edges = ids.len(), "re-inferring shifted edges");
        self.reinfer_handles(ids);
    }

    fn organize_in_place(&mut self) {
        self.layout = layout::auto_organize(self.model.nodes_mut(), &self.config.layout);
        let ids: Vec<String> = self.model.edges().iter().map(|e| e.id.clone()).collect();
        self.reinfer_handles(ids);
    }

    fn refresh_handles_for(&mut self, node_id: &str) {
        let ids: Vec<String> = self
            .model
            .edges_touching(node_id)
            .map(|e| e.id.clone())
            .collect();
        self.reinfer_handles(ids);
    }

    fn reinfer_handles(&mut self, edge_ids: Vec<String>) {
        for id in edge_ids {
            if let Some(handles) = self.inferred_handles(&id) {
                let _ = self.model.set_handles(&id, handles);
            }
        }
    }

    fn inferred_handles(&self, edge_id: &str) -> Option<HandlePair> {
        let edge = self.model.edge(edge_id)?;
        let source = self.center_of(&edge.source).ok()?;
        let target = self.center_of(&edge.target).ok()?;
        Some(resolve_handles(source, target))
    }

    fn center_of(&self, node_id: &str) -> Result<Point, EditorError> {
        self.model
            .node(node_id)
            .map(|node| absolute_center(node, &self.layout, &self.config.layout))
            .ok_or_else(|| EditorError::UnknownNode(node_id.to_string()))
    }

    /// Drops a node at its region's default point and settles it there.
    fn place_in_region(&mut self, id: &str) -> Result<(), EditorError> {
        let region = self
            .model
            .node(id)
            .map(|n| n.region)
            .ok_or_else(|| EditorError::UnknownNode(id.to_string()))?;
        let start = default_position(self.layout.region(region), &self.config.layout);
        self.model.set_position(id, start)?;
        if let Some(result) = self.on_settled(id) {
            self.model.set_position(id, result.resolved)?;
        }
        Ok(())
    }

    /// Pulls every member of `region` back inside its (possibly shrunk)
    /// interior, then settles them against each other.
    fn clamp_region(&mut self, region: Region) {
        let frame = self.layout.region(region);
        let interior = frame.interior(self.config.layout.region_padding);
        let moves: Vec<(String, Point)> = self
            .model
            .nodes()
            .iter()
            .filter(|n| n.region == region)
            .map(|n| {
                let rect = node_rect(n, &self.config.layout);
                (n.id.clone(), interior.clamp_inside(rect).origin())
            })
            .collect();
        let ids: Vec<String> = moves.iter().map(|(id, _)| id.clone()).collect();
        for (id, position) in moves {
            let _ = self.model.set_position(&id, position);
        }
        for id in ids {
            if let Some(result) = self.on_settled(&id) {
                let _ = self.model.set_position(&id, result.resolved);
            }
        }
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::HandleSide;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session_with(nodes: &[(&str, Category)]) -> EditorSession {
        let mut session = EditorSession::default();
        for (id, category) in nodes {
            session
                .add_node(NodeSpec::new(*id, category.clone()).with_id(*id))
                .expect("add node");
        }
        session
    }

    fn inside_interior(session: &EditorSession, id: &str) -> bool {
        let config = &session.config().layout;
        let node = session.model().node(id).expect("node");
        let interior = session
            .layout()
            .region(node.region)
            .interior(config.region_padding);
        interior.contains(&node_rect(node, config))
    }

    #[test]
    fn new_session_starts_with_one_history_entry() {
        let session = EditorSession::default();
        assert_eq!(session.history().len(), 1);
        assert!(!session.can_undo());
    }

    #[test]
    fn each_mutation_records_one_snapshot() {
        let mut session = session_with(&[("a", Category::Cognitive), ("b", Category::Affective)]);
        assert_eq!(session.history().len(), 3);
        session
            .connect(EdgeSpec::new("a", "b"), ConnectionDrop::BodyToBody)
            .expect("connect");
        assert_eq!(session.history().len(), 4);
        assert!(session.delete_node("zzz").is_err());
        assert_eq!(session.history().len(), 4);
    }

    #[test]
    fn connect_infers_opposing_handles() {
        let mut session = session_with(&[("a", Category::Cognitive), ("b", Category::Affective)]);
        session
            .connect(EdgeSpec::new("a", "b"), ConnectionDrop::BodyToBody)
            .expect("connect");
        let edge = session.model().edge("e-a-b").expect("edge");
        // Cognitive sits top-centre, Affective middle-left.
        assert_eq!(edge.source_handle, Some(HandleSide::Left));
        assert_eq!(edge.target_handle, Some(HandleSide::Right));
    }

    #[test]
    fn grid_shift_re_infers_cross_region_handles() {
        let mut session = session_with(&[("a", Category::Attentional), ("b", Category::Context)]);
        session
            .connect(EdgeSpec::new("a", "b"), ConnectionDrop::BodyToBody)
            .expect("connect");
        let edge = session.model().edge("e-a-b").expect("edge");
        assert_eq!(edge.source_handle, Some(HandleSide::Right));

        // Growing the top-right region pushes the middle row down.
        for idx in 0..5 {
            let id = format!("s{idx}");
            session
                .add_node(NodeSpec::new(id.clone(), Category::SelfConcept).with_id(id))
                .expect("add");
        }
        let edge = session.model().edge("e-a-b").expect("edge");
        assert_eq!(edge.source_handle, Some(HandleSide::Bottom));
        assert_eq!(edge.target_handle, Some(HandleSide::Top));
    }

    #[test]
    fn handle_to_body_keeps_the_dragged_handle() {
        let mut session = session_with(&[("a", Category::Cognitive), ("b", Category::Affective)]);
        session
            .connect(
                EdgeSpec::new("a", "b"),
                ConnectionDrop::HandleToBody {
                    source: HandleSide::Bottom,
                },
            )
            .expect("connect");
        let edge = session.model().edge("e-a-b").expect("edge");
        assert_eq!(edge.source_handle, Some(HandleSide::Bottom));
        assert_eq!(edge.target_handle, Some(HandleSide::Right));
    }

    #[test]
    fn new_nodes_do_not_overlap_siblings() {
        let session = session_with(&[
            ("a", Category::Behavioral),
            ("b", Category::Behavioral),
            ("c", Category::Behavioral),
        ]);
        let config = &session.config().layout;
        let rects: Vec<Rect> = session
            .model()
            .nodes()
            .iter()
            .map(|n| node_rect(n, config))
            .collect();
        for (i, a) in rects.iter().enumerate() {
            for b in rects.iter().skip(i + 1) {
                assert!(!a.intersects(b, 0.0), "{a:?} overlaps {b:?}");
            }
        }
        for id in ["a", "b", "c"] {
            assert!(inside_interior(&session, id));
        }
    }

    #[test]
    fn drag_frames_do_not_snapshot_but_end_drag_does() {
        let mut session = session_with(&[("a", Category::Cognitive), ("b", Category::Cognitive)]);
        let entries = session.history().len();
        let target = session.model().node("a").expect("a").position;
        for step in 0..5 {
            let p = Point::new(target.x + step as f32, target.y);
            session.drag_node("b", p).expect("drag");
        }
        assert!(session.is_dragging());
        assert_eq!(session.history().len(), entries);

        let result = session.end_drag("b").expect("settle");
        assert_eq!(session.history().len(), entries + 1);
        assert!(result.collided_with.contains(&"a".to_string()));
        let config = &session.config().layout;
        let a = node_rect(session.model().node("a").expect("a"), config);
        let b = node_rect(session.model().node("b").expect("b"), config);
        assert!(!a.intersects(&b, 0.0));
        assert!(inside_interior(&session, "b"));
    }

    #[test]
    fn cancel_drag_restores_origin() {
        let mut session = session_with(&[("a", Category::Cognitive)]);
        let origin = session.model().node("a").expect("a").position;
        session.drag_node("a", Point::new(31.0, 31.0)).expect("drag");
        session.cancel_drag().expect("cancel");
        assert_eq!(session.model().node("a").expect("a").position, origin);
        assert!(!session.is_dragging());
    }

    #[test]
    fn category_change_moves_node_between_regions() {
        let mut session = session_with(&[("a", Category::Cognitive), ("b", Category::Affective)]);
        session
            .connect(EdgeSpec::new("a", "b"), ConnectionDrop::BodyToBody)
            .expect("connect");
        session
            .update_node(
                "a",
                NodePatch {
                    category: Some(Category::Sociocultural),
                    ..Default::default()
                },
            )
            .expect("update");
        let node = session.model().node("a").expect("a");
        assert_eq!(node.region, Region::Sociocultural);
        assert!(inside_interior(&session, "a"));
        assert!(session.layout().region(Region::Cognitive).node_ids.is_empty());
        // Sociocultural is bottom-right of Affective.
        let edge = session.model().edge("e-a-b").expect("edge");
        assert_eq!(edge.source_handle, Some(HandleSide::Left));
    }

    fn crowded_behavioral_session() -> EditorSession {
        let nodes: Vec<(&str, Category)> = ["b0", "b1", "b2", "b3", "b4"]
            .into_iter()
            .map(|id| (id, Category::Behavioral))
            .collect();
        let mut session = session_with(&nodes);
        session.auto_organize();
        session
    }

    #[test]
    fn deleting_from_a_large_region_keeps_survivors_inside() {
        let mut session = crowded_behavioral_session();
        for id in ["b0", "b1", "b2"] {
            session.delete_node(id).expect("delete");
            for survivor in session.model().nodes() {
                assert!(
                    inside_interior(&session, &survivor.id),
                    "{} escaped after deleting {id}",
                    survivor.id
                );
            }
        }
        let config = &session.config().layout;
        let b3 = node_rect(session.model().node("b3").expect("b3"), config);
        let b4 = node_rect(session.model().node("b4").expect("b4"), config);
        assert!(!b3.intersects(&b4, 0.0));
    }

    #[test]
    fn delete_selected_reflows_the_shrunk_region() {
        let mut session = crowded_behavioral_session();
        for id in ["b0", "b1", "b2"] {
            session.open_edit(Selection::Node(id.into())).expect("open");
            session.delete_selected().expect("delete");
        }
        assert!(inside_interior(&session, "b3"));
        assert!(inside_interior(&session, "b4"));
    }

    #[test]
    fn undo_redo_emit_to_sink() {
        let seen: Rc<RefCell<Vec<usize>>> = Rc::default();
        let mut session = EditorSession::default();
        let log = Rc::clone(&seen);
        session.set_sink(move |graph: &SemanticGraph| log.borrow_mut().push(graph.nodes.len()));

        session
            .add_node(NodeSpec::new("x", Category::Cognitive))
            .expect("add");
        assert!(session.undo());
        assert!(session.redo());
        assert!(!session.redo());
        assert_eq!(*seen.borrow(), vec![1, 0, 1]);
    }

    #[test]
    fn cleared_sink_stops_receiving_commits() {
        let seen: Rc<RefCell<usize>> = Rc::default();
        let mut session = EditorSession::default();
        let log = Rc::clone(&seen);
        session.set_sink(move |_: &SemanticGraph| *log.borrow_mut() += 1);

        session
            .add_node(NodeSpec::new("x", Category::Cognitive))
            .expect("add");
        session.clear_sink();
        session
            .add_node(NodeSpec::new("y", Category::Affective))
            .expect("add");
        assert!(session.undo());
        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn keyboard_shortcuts_drive_history() {
        let mut session = session_with(&[("a", Category::Cognitive)]);
        assert!(session.handle_key(&KeyChord::new("z").ctrl()));
        assert!(session.model().nodes().is_empty());
        // Boundary is a consumed no-op.
        assert!(session.handle_key(&KeyChord::new("z").ctrl()));
        assert!(session.handle_key(&KeyChord::new("y").meta()));
        assert_eq!(session.model().nodes().len(), 1);
        assert!(!session.handle_key(&KeyChord::new("a").ctrl()));

        session.unmount();
        assert!(!session.handle_key(&KeyChord::new("z").ctrl()));
        assert_eq!(session.model().nodes().len(), 1);
    }

    #[test]
    fn edit_contract_commits_once() {
        let mut session = session_with(&[("a", Category::Cognitive), ("b", Category::Affective)]);
        session
            .connect(EdgeSpec::new("a", "b"), ConnectionDrop::BodyToBody)
            .expect("connect");
        let entries = session.history().len();

        let EditForm::Edge(mut form) = session
            .open_edit(Selection::Edge("e-a-b".into()))
            .expect("open")
        else {
            panic!("expected edge form");
        };
        form.weight = Weight::Strong;
        form.bidirectional = true;
        form.reverse_polarity = Polarity::Negative;
        session.save_edit(EditForm::Edge(form)).expect("save");

        assert_eq!(session.history().len(), entries + 1);
        assert_eq!(session.editing(), None);
        let edge = session.model().edge("e-a-b").expect("edge");
        assert_eq!(edge.weight, Weight::Strong);
        assert_eq!(edge.reverse_polarity, Some(Polarity::Negative));
    }

    #[test]
    fn save_without_open_edit_fails() {
        let mut session = session_with(&[("a", Category::Cognitive)]);
        let form = EditForm::Node(NodeForm {
            id: "a".into(),
            label: "A".into(),
            category: Category::Cognitive,
            change: ChangeStatus::Stable,
            is_target: false,
            is_moderator: false,
        });
        assert_eq!(session.save_edit(form.clone()), Err(EditorError::NoActiveEdit));

        session
            .open_edit(Selection::Node("a".into()))
            .expect("open");
        let EditForm::Node(mut other) = form else {
            unreachable!()
        };
        other.id = "b".into();
        assert_eq!(
            session.save_edit(EditForm::Node(other)),
            Err(EditorError::EditMismatch)
        );
    }

    #[test]
    fn delete_selected_cascades_and_clears_focus() {
        let mut session = session_with(&[("a", Category::Cognitive), ("b", Category::Affective)]);
        session
            .connect(EdgeSpec::new("a", "b"), ConnectionDrop::BodyToBody)
            .expect("connect");
        session.hover_enter("a");
        session.open_edit(Selection::Node("a".into())).expect("open");
        session.delete_selected().expect("delete");

        assert!(session.model().edges().is_empty());
        assert_eq!(session.interaction().hovered(), None);
        assert_eq!(session.interaction().selection(), None);
        assert_eq!(session.delete_selected(), Err(EditorError::NoActiveEdit));
    }

    #[test]
    fn cancel_edit_discards_without_snapshot() {
        let mut session = session_with(&[("a", Category::Cognitive)]);
        let entries = session.history().len();
        session.open_edit(Selection::Node("a".into())).expect("open");
        session.cancel_edit();
        assert_eq!(session.editing(), None);
        assert_eq!(session.history().len(), entries);
    }

    #[test]
    fn reload_after_edits_is_undoable() {
        let mut session = session_with(&[("a", Category::Cognitive)]);
        let raw: RawGraph =
            serde_json::from_str(r#"{"nodes":[{"id":"z","label":"Z","category":"Afetiva"}]}"#)
                .expect("json");
        session.reload(raw).expect("reload");
        assert_eq!(session.model().node("z").map(|n| n.region), Some(Region::Affective));
        assert!(session.undo());
        assert!(session.model().contains_node("a"));
    }
}

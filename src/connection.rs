//! Anchor handle inference for new relations.
//!
//! The dominant axis between the two node centres decides which sides face
//! each other; the target always gets the side opposite the source's.

use crate::ir::{HandleSide, Point};

/// Handles chosen for one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlePair {
    pub source: HandleSide,
    pub target: HandleSide,
}

/// How the user finished a connection gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionDrop {
    /// Started on a specific handle and released on a specific handle. The
    /// handles only identify the nodes; the facing pair is still inferred.
    HandleToHandle {
        source: HandleSide,
        target: HandleSide,
    },
    /// Started on a specific handle, released on the target's body.
    HandleToBody { source: HandleSide },
    /// No handle involved on either end.
    BodyToBody,
}

/// Facing sides for an edge from `source` to `target` (both node centres in
/// canvas space). Equal axis distances resolve vertically.
pub fn resolve_handles(source: Point, target: Point) -> HandlePair {
    let dx = target.x - source.x;
    let dy = target.y - source.y;
    let source_side = if dx.abs() > dy.abs() {
        if dx > 0.0 {
            HandleSide::Right
        } else {
            HandleSide::Left
        }
    } else if dy > 0.0 {
        HandleSide::Bottom
    } else {
        HandleSide::Top
    };
    HandlePair {
        source: source_side,
        target: source_side.opposite(),
    }
}

/// Keeps the handle the user dragged from and infers only the target side.
pub fn resolve_target_handle(source_handle: HandleSide, source: Point, target: Point) -> HandlePair {
    HandlePair {
        source: source_handle,
        target: resolve_handles(source, target).target,
    }
}

pub fn resolve_connection(drop: ConnectionDrop, source: Point, target: Point) -> HandlePair {
    match drop {
        ConnectionDrop::HandleToHandle { .. } | ConnectionDrop::BodyToBody => {
            resolve_handles(source, target)
        }
        ConnectionDrop::HandleToBody {
            source: source_handle,
        } => resolve_target_handle(source_handle, source, target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_dominance_uses_side_handles() {
        let a = Point::new(400.0, 100.0);
        let b = Point::new(100.0, 120.0);
        // a is to the right of b
        assert_eq!(
            resolve_handles(a, b),
            HandlePair {
                source: HandleSide::Left,
                target: HandleSide::Right
            }
        );
        assert_eq!(
            resolve_handles(b, a),
            HandlePair {
                source: HandleSide::Right,
                target: HandleSide::Left
            }
        );
    }

    #[test]
    fn vertical_dominance_uses_top_and_bottom() {
        let upper = Point::new(100.0, 0.0);
        let lower = Point::new(130.0, 300.0);
        assert_eq!(
            resolve_handles(upper, lower),
            HandlePair {
                source: HandleSide::Bottom,
                target: HandleSide::Top
            }
        );
        assert_eq!(
            resolve_handles(lower, upper),
            HandlePair {
                source: HandleSide::Top,
                target: HandleSide::Bottom
            }
        );
    }

    #[test]
    fn ties_and_coincident_nodes_resolve_vertically() {
        let pair = resolve_handles(Point::new(0.0, 0.0), Point::new(50.0, 50.0));
        assert_eq!(pair.source, HandleSide::Bottom);
        let same = resolve_handles(Point::new(5.0, 5.0), Point::new(5.0, 5.0));
        assert_eq!(same.target, same.source.opposite());
    }

    #[test]
    fn body_drop_keeps_explicit_source_handle() {
        let pair = resolve_connection(
            ConnectionDrop::HandleToBody {
                source: HandleSide::Top,
            },
            Point::new(0.0, 0.0),
            Point::new(300.0, 10.0),
        );
        assert_eq!(pair.source, HandleSide::Top);
        assert_eq!(pair.target, HandleSide::Left);
    }

    #[test]
    fn handle_to_handle_drag_still_faces_the_target() {
        let pair = resolve_connection(
            ConnectionDrop::HandleToHandle {
                source: HandleSide::Left,
                target: HandleSide::Bottom,
            },
            Point::new(0.0, 0.0),
            Point::new(300.0, 10.0),
        );
        assert_eq!(pair.source, HandleSide::Right);
        assert_eq!(pair.target, HandleSide::Left);
    }
}

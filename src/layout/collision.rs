use serde::Serialize;

use crate::ir::Point;

use super::Rect;

/// Outcome of settling one node against its siblings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollisionResult {
    pub node_id: String,
    pub original: Point,
    pub resolved: Point,
    /// Siblings the node had to be pushed away from, in first-hit order.
    pub collided_with: Vec<String>,
}

impl CollisionResult {
    pub fn displaced(&self) -> bool {
        self.original != self.resolved
    }
}

/// Pushes `moving` out of every overlapping sibling along the axis needing
/// the shorter shift, then clamps it into `bounds`. Clamping can push the box back
/// into a sibling, so the sweep repeats up to `iterations` times.
///
/// All rectangles share one coordinate frame (region-relative in practice).
pub fn resolve_collisions(
    node_id: &str,
    moving: Rect,
    siblings: &[(String, Rect)],
    bounds: Rect,
    gap: f32,
    iterations: usize,
) -> CollisionResult {
    let original = moving.origin();
    let mut current = bounds.clamp_inside(moving);
    let mut collided_with: Vec<String> = Vec::new();

    for _ in 0..iterations.max(1) {
        let mut moved = false;
        for (sibling_id, sibling) in siblings {
            if sibling_id == node_id || !current.intersects(sibling, gap) {
                continue;
            }
            if !collided_with.iter().any(|id| id == sibling_id) {
                collided_with.push(sibling_id.clone());
            }
            current = push_apart(current, sibling, gap);
            current = bounds.clamp_inside(current);
            moved = true;
        }
        if !moved {
            break;
        }
    }

    CollisionResult {
        node_id: node_id.to_string(),
        original,
        resolved: current.origin(),
        collided_with,
    }
}

fn push_apart(moving: Rect, obstacle: &Rect, gap: f32) -> Rect {
    let moving_center = moving.center();
    let obstacle_center = obstacle.center();
    let shift_x = if moving_center.x < obstacle_center.x {
        -(moving.right() + gap - obstacle.x)
    } else {
        obstacle.right() + gap - moving.x
    };
    let shift_y = if moving_center.y < obstacle_center.y {
        -(moving.bottom() + gap - obstacle.y)
    } else {
        obstacle.bottom() + gap - moving.y
    };
    if shift_x.abs() < shift_y.abs() {
        Rect {
            x: moving.x + shift_x,
            ..moving
        }
    } else {
        Rect {
            y: moving.y + shift_y,
            ..moving
        }
    }
}

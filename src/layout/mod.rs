mod collision;
mod regions;
mod types;

pub use collision::{CollisionResult, resolve_collisions};
pub use regions::Region;
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::{Node, Point};
use std::f32::consts::PI;
use tracing::debug;

/// Width and height of a region holding `count` nodes.
///
/// Grows in steps (0-2, 3-4, 5-6) and then into a roughly square sub-grid of
/// per-node footprints. Never shrinks as `count` grows.
pub fn region_size(count: usize, config: &LayoutConfig) -> (f32, f32) {
    let base_w = config.region_base_width;
    let base_h = config.region_base_height;
    match count {
        0..=2 => (base_w, base_h),
        3..=4 => (base_w * config.medium_scale, base_h * config.medium_scale),
        5..=6 => (base_w * config.large_scale, base_h * config.large_scale),
        _ => {
            let (cols, rows) = sub_grid_dims(count);
            let grid_w = cols as f32 * config.node_footprint_width + config.region_padding * 2.0;
            let grid_h = rows as f32 * config.node_footprint_height + config.region_padding * 2.0;
            let (tier_w, tier_h) = region_size(6, config);
            (
                base_w.max(grid_w).max(tier_w),
                base_h.max(grid_h).max(tier_h),
            )
        }
    }
}

/// ⌈√n⌉ columns and as many rows as needed.
fn sub_grid_dims(count: usize) -> (usize, usize) {
    if count == 0 {
        return (0, 0);
    }
    let cols = (count as f32).sqrt().ceil().max(1.0) as usize;
    let rows = count.div_ceil(cols);
    (cols, rows)
}

/// Groups node ids by region, keeping graph order within each region.
pub fn region_members<'a, I>(nodes: I) -> [Vec<String>; 9]
where
    I: IntoIterator<Item = &'a Node>,
{
    let mut members: [Vec<String>; 9] = Default::default();
    for node in nodes {
        members[node.category.region().index()].push(node.id.clone());
    }
    members
}

/// Places the nine region containers for the current node population.
///
/// Column widths and row heights are the largest region in that column/row,
/// so the grid is non-uniform once some regions have grown.
pub fn compute_layout<'a, I>(nodes: I, config: &LayoutConfig) -> Layout
where
    I: IntoIterator<Item = &'a Node>,
{
    let members = region_members(nodes);
    let sizes: Vec<(f32, f32)> = members
        .iter()
        .map(|ids| region_size(ids.len(), config))
        .collect();

    let mut col_widths = [0.0_f32; 3];
    let mut row_heights = [0.0_f32; 3];
    for region in Region::ALL {
        let (w, h) = sizes[region.index()];
        col_widths[region.column()] = col_widths[region.column()].max(w);
        row_heights[region.row()] = row_heights[region.row()].max(h);
    }

    let gap = config.region_gap;
    let col_offsets = cumulative_offsets(&col_widths, gap);
    let row_offsets = cumulative_offsets(&row_heights, gap);

    let regions: Vec<RegionLayout> = Region::ALL
        .iter()
        .zip(members)
        .map(|(&region, node_ids)| {
            let (width, height) = sizes[region.index()];
            RegionLayout {
                region,
                x: col_offsets[region.column()],
                y: row_offsets[region.row()],
                width,
                height,
                node_ids,
            }
        })
        .collect();

    let width = col_offsets[2] + col_widths[2];
    let height = row_offsets[2] + row_heights[2];

    Layout {
        regions,
        width,
        height,
    }
}

fn cumulative_offsets(extents: &[f32; 3], gap: f32) -> [f32; 3] {
    let mut offsets = [0.0_f32; 3];
    let mut cursor = 0.0;
    for (idx, extent) in extents.iter().enumerate() {
        offsets[idx] = cursor;
        cursor += extent + gap;
    }
    offsets
}

/// Region-relative top-left positions for `count` nodes in a region of the
/// given size.
pub fn distribute(count: usize, width: f32, height: f32, config: &LayoutConfig) -> Vec<Point> {
    let pad = config.region_padding;
    let node_w = config.node_width;
    let node_h = config.node_height;
    let avail_w = (width - pad * 2.0).max(0.0);
    let avail_h = (height - pad * 2.0).max(0.0);
    let center = Point::new(width / 2.0, height / 2.0);

    let centers: Vec<Point> = match count {
        0 => Vec::new(),
        1 => vec![center],
        2..=4 => {
            let radius = avail_w.min(avail_h) / 3.0;
            (0..count)
                .map(|idx| {
                    // Start at twelve o'clock.
                    let angle = idx as f32 * 2.0 * PI / count as f32 - PI / 2.0;
                    Point::new(
                        center.x + radius * angle.cos(),
                        center.y + radius * angle.sin(),
                    )
                })
                .collect()
        }
        _ => {
            let (cols, rows) = sub_grid_dims(count);
            let cell_w = avail_w / cols as f32;
            let cell_h = avail_h / rows as f32;
            (0..count)
                .map(|idx| {
                    let col = idx % cols;
                    let row = idx / cols;
                    Point::new(
                        pad + cell_w * (col as f32 + 0.5),
                        pad + cell_h * (row as f32 + 0.5),
                    )
                })
                .collect()
        }
    };

    let interior = Rect::new(pad, pad, avail_w, avail_h);
    centers
        .into_iter()
        .map(|c| {
            let rect = Rect::new(c.x - node_w / 2.0, c.y - node_h / 2.0, node_w, node_h);
            interior.clamp_inside(rect).origin()
        })
        .collect()
}

/// Full auto-organize pass: assigns every node its region and a packed
/// position inside it.
pub fn auto_organize(nodes: &mut [Node], config: &LayoutConfig) -> Layout {
    let layout = compute_layout(nodes.iter(), config);
    for frame in &layout.regions {
        let positions = distribute(frame.node_ids.len(), frame.width, frame.height, config);
        for (node_id, position) in frame.node_ids.iter().zip(positions) {
            if let Some(node) = nodes.iter_mut().find(|n| &n.id == node_id) {
                node.region = frame.region;
                node.position = position;
            }
        }
    }
    debug!(
        nodes = nodes.len(),
        width = layout.width,
        height = layout.height,
        "auto-organized process network"
    );
    layout
}

/// Default drop point for a node entering `frame`: the centre of the region.
pub fn default_position(frame: &RegionLayout, config: &LayoutConfig) -> Point {
    let interior = frame.interior(config.region_padding);
    let center = frame.frame().center();
    let rect = Rect::new(
        center.x - frame.x - config.node_width / 2.0,
        center.y - frame.y - config.node_height / 2.0,
        config.node_width,
        config.node_height,
    );
    interior.clamp_inside(rect).origin()
}

/// Region-relative box of a node.
pub fn node_rect(node: &Node, config: &LayoutConfig) -> Rect {
    Rect::at(node.position, config.node_width, config.node_height)
}

/// Canvas-space centre of a node, used for connection handle inference.
pub fn absolute_center(node: &Node, layout: &Layout, config: &LayoutConfig) -> Point {
    let origin = layout.to_absolute(node.region, node.position);
    Point::new(
        origin.x + config.node_width / 2.0,
        origin.y + config.node_height / 2.0,
    )
}

/// Settles `node_id` against the other members of its region.
pub fn settle_node(
    nodes: &[Node],
    node_id: &str,
    layout: &Layout,
    config: &LayoutConfig,
) -> Option<CollisionResult> {
    let node = nodes.iter().find(|n| n.id == node_id)?;
    let frame = layout.region(node.region);
    let siblings: Vec<(String, Rect)> = nodes
        .iter()
        .filter(|n| n.region == node.region && n.id != node.id)
        .map(|n| (n.id.clone(), node_rect(n, config)))
        .collect();
    Some(resolve_collisions(
        node_id,
        node_rect(node, config),
        &siblings,
        frame.interior(config.region_padding),
        config.collision_gap,
        config.collision_iterations,
    ))
}

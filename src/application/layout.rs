//! Deterministic tree layout.
//!
//! Children grow to the right of their parent. Three passes run over the tree:
//! sizes (own footprint), areas (post-order, footprint of the whole subtree) and positions
//! (pre-order, each node vertically centered in the band its parent allotted to it).
//! Results are keyed by node identity.

use std::collections::HashMap;
use std::rc::Rc;

use kurbo::{Point, Size};
use tracing::{instrument, warn};

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::config::LayoutSettings;
use crate::domain::{Node, NodeRef};

type NodeKey = *const Node;

fn key(node: &Node) -> NodeKey {
    node as NodeKey
}

/// Geometry of one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeLayout {
    /// Footprint of the node itself
    pub size: Size,
    /// Footprint of the node plus all its descendants
    pub area: Size,
    /// Top-left corner of the node itself
    pub position: Point,
}

/// Size, area and position of every node of one tree.
#[derive(Debug)]
pub struct PositionLookup {
    root: NodeRef,
    root_offset: Point,
    layouts: HashMap<NodeKey, NodeLayout>,
}

impl PositionLookup {
    #[instrument(level = "debug", skip_all, fields(root_type = root.node_type()))]
    pub fn new(root: &NodeRef, settings: &LayoutSettings) -> Self {
        let mut sizes = HashMap::new();
        size_pass(root, settings, &mut sizes);

        let mut areas = HashMap::new();
        let root_area = area_pass(root, true, settings, &sizes, &mut areas);

        let root_offset = Point::new(0.0, -root_area.height / 2.0);
        let mut positions = HashMap::new();
        position_pass(root, true, root_offset, settings, &sizes, &areas, &mut positions);

        let layouts = positions
            .into_iter()
            .filter_map(|(node, position)| {
                Some((
                    node,
                    NodeLayout {
                        size: *sizes.get(&node)?,
                        area: *areas.get(&node)?,
                        position,
                    },
                ))
            })
            .collect();

        Self {
            root: Rc::clone(root),
            root_offset,
            layouts,
        }
    }

    pub fn with_defaults(root: &NodeRef) -> Self {
        Self::new(root, &LayoutSettings::default())
    }

    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    /// Offset that centers the tree around the horizontal axis: `(0, -rootArea.height / 2)`.
    pub fn root_offset(&self) -> Point {
        self.root_offset
    }

    /// Area of the whole tree.
    pub fn total_area(&self) -> Size {
        self.layouts
            .get(&key(&self.root))
            .map(|l| l.area)
            .unwrap_or(Size::ZERO)
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.layouts.contains_key(&key(node))
    }

    pub fn layout(&self, node: &Node) -> ApplicationResult<NodeLayout> {
        self.layouts
            .get(&key(node))
            .copied()
            .ok_or_else(|| ApplicationError::NodeNotInLayout {
                node_type: node.node_type().to_string(),
            })
    }

    pub fn size(&self, node: &Node) -> ApplicationResult<Size> {
        Ok(self.layout(node)?.size)
    }

    pub fn area(&self, node: &Node) -> ApplicationResult<Size> {
        Ok(self.layout(node)?.area)
    }

    pub fn position(&self, node: &Node) -> ApplicationResult<Point> {
        Ok(self.layout(node)?.position)
    }
}

/// Own footprint: header, optional name row and one row per field (array fields one row per
/// element, at least one). Independent of children.
pub fn node_size(node: &Node, settings: &LayoutSettings) -> Size {
    let name_height = if node.name().is_some() {
        settings.node_name_height
    } else {
        0.0
    };
    let fields_height: f64 = node
        .fields()
        .iter()
        .map(|field| {
            let rows = field.value().array_len().map_or(1, |len| len.max(1));
            rows as f64 * settings.node_field_height
        })
        .sum();
    Size::new(
        settings.node_width,
        settings.node_header_height + name_height + fields_height,
    )
}

fn size_pass(node: &NodeRef, settings: &LayoutSettings, sizes: &mut HashMap<NodeKey, Size>) {
    if sizes.insert(key(node), node_size(node, settings)).is_some() {
        warn!(
            node_type = node.node_type(),
            "node instance appears more than once in the tree"
        );
    }
    for child in node.direct_children() {
        size_pass(&child, settings, sizes);
    }
}

fn area_pass(
    node: &NodeRef,
    is_root: bool,
    settings: &LayoutSettings,
    sizes: &HashMap<NodeKey, Size>,
    areas: &mut HashMap<NodeKey, Size>,
) -> Size {
    let size = sizes.get(&key(node)).copied().unwrap_or(Size::ZERO);
    let children = node.direct_children();

    let area = if children.is_empty() {
        size
    } else {
        let mut max_child_width: f64 = 0.0;
        let mut children_height = 0.0;
        for child in &children {
            let child_area = area_pass(child, false, settings, sizes, areas);
            max_child_width = max_child_width.max(child_area.width);
            children_height += child_area.height;
        }
        children_height += (children.len() - 1) as f64 * settings.vertical_spacing;
        if !is_root {
            children_height += settings.tier_spacing;
        }
        Size::new(
            size.width + max_child_width + settings.horizontal_spacing,
            size.height.max(children_height),
        )
    };
    areas.insert(key(node), area);
    area
}

fn position_pass(
    node: &NodeRef,
    is_root: bool,
    reference: Point,
    settings: &LayoutSettings,
    sizes: &HashMap<NodeKey, Size>,
    areas: &HashMap<NodeKey, Size>,
    positions: &mut HashMap<NodeKey, Point>,
) {
    let size = sizes.get(&key(node)).copied().unwrap_or(Size::ZERO);
    let area = areas.get(&key(node)).copied().unwrap_or(size);
    positions.insert(
        key(node),
        Point::new(
            reference.x,
            reference.y + area.height / 2.0 - size.height / 2.0,
        ),
    );

    let child_x = reference.x + size.width + settings.horizontal_spacing;
    let mut child_y = reference.y;
    if !is_root {
        child_y += settings.tier_spacing / 2.0;
    }
    for child in node.direct_children() {
        position_pass(
            &child,
            false,
            Point::new(child_x, child_y),
            settings,
            sizes,
            areas,
            positions,
        );
        let child_area = areas.get(&key(&child)).copied().unwrap_or(Size::ZERO);
        child_y += child_area.height + settings.vertical_spacing;
    }
}

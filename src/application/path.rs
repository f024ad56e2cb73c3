//! Route finding from a descendant back up to the root.

use std::ops::ControlFlow;
use std::rc::Rc;

use tracing::{instrument, trace};

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::{ChildSlot, NodeRef};

/// Field and slot of a parent that lead to a child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeOutput {
    pub field_name: String,
    pub offset: usize,
}

impl From<ChildSlot<'_>> for NodeOutput {
    fn from(slot: ChildSlot<'_>) -> Self {
        Self {
            field_name: slot.field_name.to_string(),
            offset: slot.offset,
        }
    }
}

/// One ancestor on the route to a target, with the output that leads towards the target.
#[derive(Debug, Clone, PartialEq)]
pub struct PathElement {
    pub node: NodeRef,
    pub output: NodeOutput,
}

/// Ancestors of `target`, nearest first, ending at `root`.
///
/// Matching is by identity: a structurally equal but distinct node is not the target.
/// The path is empty when `target` is `root`. Empty slots holding a `none` node are searched
/// too, so a `none` placeholder can be the target of an edit.
#[instrument(level = "trace", skip_all, fields(target_type = target.node_type()))]
pub fn find_path_to_root(root: &NodeRef, target: &NodeRef) -> ApplicationResult<Vec<PathElement>> {
    if Rc::ptr_eq(root, target) {
        return Ok(Vec::new());
    }

    // Depth-first; on the way back up every ancestor appends itself, so the nearest comes first.
    fn search(node: &NodeRef, target: &NodeRef, path: &mut Vec<PathElement>) -> bool {
        let flow = node.for_each_direct_slot(|child, slot| {
            if Rc::ptr_eq(child, target) || search(child, target, path) {
                ControlFlow::Break(NodeOutput::from(slot))
            } else {
                ControlFlow::Continue(())
            }
        });
        match flow {
            ControlFlow::Break(output) => {
                path.push(PathElement {
                    node: Rc::clone(node),
                    output,
                });
                true
            }
            ControlFlow::Continue(()) => false,
        }
    }

    let mut path = Vec::new();
    if search(root, target, &mut path) {
        trace!(depth = path.len(), "path found");
        Ok(path)
    } else {
        Err(ApplicationError::NodeNotInTree {
            node_type: target.node_type().to_string(),
        })
    }
}

/// Direct parent of `target`, or `None` when `target` is the root.
pub fn get_parent(root: &NodeRef, target: &NodeRef) -> ApplicationResult<Option<PathElement>> {
    Ok(find_path_to_root(root, target)?.into_iter().next())
}

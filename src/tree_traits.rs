//! Text rendering of trees via `termtree`.

use std::fmt;

use termtree::Tree;
use tracing::instrument;

use crate::domain::{FieldValue, Node};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

fn node_label(node: &Node) -> String {
    match node.name() {
        Some(name) => format!("{} ({})", node.node_type(), name),
        None => node.node_type().to_string(),
    }
}

impl TreeNodeConvert for Node {
    /// Children are labelled with the field that holds them, e.g. `children[1]: Move`.
    #[instrument(level = "trace", skip(self), fields(node_type = self.node_type()))]
    fn to_tree_string(&self) -> Tree<String> {
        let mut tree = Tree::new(node_label(self));
        let _ = self.for_each_direct_child(|child, slot| {
            let is_array = matches!(
                self.field(slot.field_name).map(|f| f.value()),
                Some(FieldValue::NodeArray(_))
            );
            let prefix = if is_array {
                format!("{}[{}]", slot.field_name, slot.offset)
            } else {
                slot.field_name.to_string()
            };

            let mut leaf = child.to_tree_string();
            leaf.root = format!("{}: {}", prefix, leaf.root);
            tree.push(leaf);
            std::ops::ControlFlow::<()>::Continue(())
        });
        tree
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_tree_string())
    }
}

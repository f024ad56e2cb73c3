//! A scheme paired with a tree that conforms to it.

use std::rc::Rc;

use tracing::instrument;

use crate::application::error::ApplicationResult;
use crate::application::instantiator::duplicate_with_missing_fields;
use crate::application::validator::{validate, ValidationError};
use crate::domain::{NodeRef, Scheme};

/// Validity is checked on construction; a `TreePack` always holds a valid tree.
#[derive(Debug, Clone)]
pub struct TreePack {
    scheme: Rc<Scheme>,
    tree: NodeRef,
}

impl TreePack {
    #[instrument(level = "debug", skip_all)]
    pub fn new(scheme: Scheme, tree: NodeRef) -> Result<Self, ValidationError> {
        Self::with_shared_scheme(Rc::new(scheme), tree)
    }

    pub fn with_shared_scheme(scheme: Rc<Scheme>, tree: NodeRef) -> Result<Self, ValidationError> {
        validate(&scheme, &tree)?;
        Ok(Self { scheme, tree })
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    pub fn tree(&self) -> &NodeRef {
        &self.tree
    }

    pub fn into_parts(self) -> (Rc<Scheme>, NodeRef) {
        (self.scheme, self.tree)
    }

    /// Same scheme, edited tree. The new tree is validated again.
    pub fn with_tree(&self, tree: NodeRef) -> Result<Self, ValidationError> {
        Self::with_shared_scheme(Rc::clone(&self.scheme), tree)
    }

    /// Same scheme, tree rebuilt so every node carries exactly its declared fields.
    pub fn with_missing_fields(&self) -> ApplicationResult<Self> {
        let tree = duplicate_with_missing_fields(&self.scheme, &self.tree)?;
        Ok(Self {
            scheme: Rc::clone(&self.scheme),
            tree,
        })
    }
}

impl PartialEq for TreePack {
    fn eq(&self, other: &Self) -> bool {
        self.scheme == other.scheme && self.tree == other.tree
    }
}

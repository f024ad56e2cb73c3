//! Schema-validated persistent trees.
//!
//! Trees are immutable: every edit returns a new root that shares all untouched subtrees with
//! the old one. A [`domain::Scheme`] describes which node types exist and which fields they
//! carry; the [`application`] layer validates, instantiates, edits and lays out trees against
//! it, and [`infrastructure`] reads and writes them as JSON.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;

pub use application::{ApplicationError, ApplicationResult, PositionLookup, TreePack};
pub use crate::config::{LayoutSettings, Settings};
pub use domain::{DomainError, DomainResult, Field, Node, NodeRef, Scheme};
pub use infrastructure::{InfraError, InfraResult};
pub use tree_traits::TreeNodeConvert;

//! Infrastructure layer: JSON serialization of trees, schemes and packs
//!
//! Everything that touches a text format lives here; the domain and application layers never
//! see JSON.

pub mod error;
pub mod pack_json;
pub mod scheme_json;
pub mod tree_json;

pub use error::{InfraError, InfraResult};
pub use pack_json::{compose_pack, compose_pack_text, parse_pack};
pub use scheme_json::{compose_scheme, compose_scheme_text, parse_scheme, parse_scheme_value};
pub use tree_json::{compose_json, compose_json_text, parse_json, parse_json_value, NAME_KEY, TYPE_KEY};

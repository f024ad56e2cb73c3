//! TreePack ⇄ JSON: `{ "scheme": <scheme>, "tree": <tree> }`.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::instrument;

use crate::application::TreePack;
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::scheme_json::{compose_scheme, parse_scheme_value};
use crate::infrastructure::tree_json::{compose_json, parse_json_value};

#[derive(Debug, Deserialize)]
struct RawPack {
    scheme: Value,
    tree: Value,
}

/// Parse a pack; the tree is validated against the scheme.
#[instrument(level = "debug", skip_all, fields(len = text.len()))]
pub fn parse_pack(text: &str) -> InfraResult<TreePack> {
    let raw: RawPack = serde_json::from_str(text).map_err(|e| InfraError::json("parse pack", e))?;
    let scheme = parse_scheme_value(&raw.scheme)?;
    let tree = parse_json_value(&raw.tree)?;
    Ok(TreePack::new(scheme, tree)?)
}

pub fn compose_pack(pack: &TreePack) -> InfraResult<Value> {
    Ok(json!({
        "scheme": compose_scheme(pack.scheme())?,
        "tree": compose_json(pack.tree())?,
    }))
}

pub fn compose_pack_text(pack: &TreePack, pretty: bool) -> InfraResult<String> {
    let value = compose_pack(pack)?;
    let text = if pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    };
    text.map_err(|e| InfraError::json("compose pack", e))
}

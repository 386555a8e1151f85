//! Call-tree representations shared by the decode/normalize/render pipeline.
//!
//! `RawNode` models the irregular shapes the pipeline receives: decoded
//! extrinsic JSON with `{section, method, args}` call triples, plain
//! mappings and sequences, and scalar placeholders. `CanonicalNode` is the
//! pruned uniform shape the normalizer produces and the renderer consumes.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Un-normalized call tree node.
///
/// Mappings preserve insertion order; order is significant all the way
/// through to rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum RawNode {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    Seq(Vec<RawNode>),
    Map(IndexMap<String, RawNode>),
    /// A dispatchable call triple, e.g. `utility.batchAll` with its
    /// argument subtree.
    Call {
        section: String,
        method: String,
        args: Box<RawNode>,
    },
}

impl From<Value> for RawNode {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RawNode::Null,
            Value::Bool(b) => RawNode::Bool(b),
            Value::Number(n) => RawNode::Number(n),
            Value::String(s) => RawNode::Text(s),
            Value::Array(items) => RawNode::Seq(items.into_iter().map(RawNode::from).collect()),
            Value::Object(mut map) => {
                let section = match map.get("section") {
                    Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                    _ => None,
                };
                let method = match map.get("method") {
                    Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                    _ => None,
                };
                if let (Some(section), Some(method)) = (section, method) {
                    let args = map.remove("args").map(RawNode::from).unwrap_or(RawNode::Null);
                    RawNode::Call {
                        section,
                        method,
                        args: Box::new(args),
                    }
                } else {
                    RawNode::Map(map.into_iter().map(|(k, v)| (k, RawNode::from(v))).collect())
                }
            }
        }
    }
}

impl From<CanonicalNode> for RawNode {
    fn from(node: CanonicalNode) -> Self {
        match node {
            CanonicalNode::Null => RawNode::Null,
            CanonicalNode::Bool(b) => RawNode::Bool(b),
            CanonicalNode::Number(n) => RawNode::Number(n),
            CanonicalNode::Text(s) => RawNode::Text(s),
            CanonicalNode::Seq(items) => {
                RawNode::Seq(items.into_iter().map(RawNode::from).collect())
            }
            CanonicalNode::Map(entries) => RawNode::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, RawNode::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Normalized call tree node.
///
/// Containers are never empty (the normalizer prunes them), and mapping
/// keys are either plain field names or composite `"section.method"` call
/// labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CanonicalNode {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    Seq(Vec<CanonicalNode>),
    Map(IndexMap<String, CanonicalNode>),
}

impl CanonicalNode {
    /// Leaf check used by the renderer's inline special cases.
    pub fn is_hex_text(&self) -> bool {
        matches!(self, CanonicalNode::Text(s) if s.starts_with("0x"))
    }
}

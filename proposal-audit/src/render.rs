//! Deterministic line rendering of canonical call trees.
//!
//! The renderer is a pure function: mapping keys in insertion order, array
//! elements in index order, no output sink. Each line carries a cosmetic
//! [`LineKind`] tag so a display adapter can style it; the tags have no
//! behavioral contract beyond being deterministic per node kind.

use std::fmt;
use std::fmt::Write as _;

use indexmap::IndexMap;

use crate::tree::CanonicalNode;

/// Byte length of an EVM address; a mapping of exactly this many
/// consecutive byte-indexed keys is packed into a single hex line.
pub const ADDRESS_BYTES: usize = 20;

const INDENT_UNIT: &str = "    ";
const RAIL: &str = "│   ";
const TEE: &str = "├── ";
const ELBOW: &str = "└── ";

/// Cosmetic classification of a rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `[i]` marker before an array element
    Index,
    /// Byte-indexed mapping packed into one hex line
    ByteBlob,
    /// Sequence of hex strings joined onto one line
    HexList,
    /// Composite `"section.method"` call label
    CallLabel,
    /// Key introducing a sequence subtree
    ArrayKey,
    /// Key introducing a mapping that looks like an unfolded call
    SubcallKey,
    /// Key introducing a plain mapping subtree
    StructKey,
    /// Key with a null value
    NullValue,
    /// Key with a hex-valued leaf
    HexValue,
    /// Key with any other scalar leaf
    Scalar,
}

/// One display line of the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub text: String,
    pub kind: LineKind,
}

impl fmt::Display for RenderedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Renders a canonical tree as an indented, annotated outline.
pub fn render(node: &CanonicalNode) -> Vec<RenderedLine> {
    let mut lines = Vec::new();
    walk(node, String::new(), None, &mut lines);
    lines
}

fn walk(
    node: &CanonicalNode,
    mut indent: String,
    index: Option<usize>,
    out: &mut Vec<RenderedLine>,
) {
    if let Some(i) = index {
        out.push(RenderedLine {
            text: format!("{indent}[{i}]"),
            kind: LineKind::Index,
        });
        indent.push_str(INDENT_UNIT);
    }

    match node {
        CanonicalNode::Map(entries) => {
            if let Some(packed) = pack_byte_map(entries) {
                out.push(RenderedLine {
                    text: format!("{indent}0x{packed}"),
                    kind: LineKind::ByteBlob,
                });
                return;
            }
            let last = entries.len().saturating_sub(1);
            for (i, (key, value)) in entries.iter().enumerate() {
                let is_last = i == last;
                let prefix = format!("{indent}{}", if is_last { ELBOW } else { TEE });
                let child_indent = format!("{indent}{}", if is_last { INDENT_UNIT } else { RAIL });

                if let Some(list) = inline_hex_list(value) {
                    out.push(RenderedLine {
                        text: format!("{prefix}{key}: {list}"),
                        kind: LineKind::HexList,
                    });
                    continue;
                }

                out.push(key_line(&prefix, key, value));

                match value {
                    CanonicalNode::Seq(items) => {
                        for (idx, item) in items.iter().enumerate() {
                            walk(item, child_indent.clone(), Some(idx), out);
                        }
                    }
                    CanonicalNode::Map(_) => walk(value, child_indent, None, out),
                    _ => {}
                }
            }
        }
        CanonicalNode::Seq(items) => {
            for (idx, item) in items.iter().enumerate() {
                walk(item, indent.clone(), Some(idx), out);
            }
        }
        leaf => out.push(RenderedLine {
            text: format!("{indent}{}", leaf_text(leaf)),
            kind: leaf_kind(leaf),
        }),
    }
}

fn key_line(prefix: &str, key: &str, value: &CanonicalNode) -> RenderedLine {
    let (text, kind) = if key.contains('.') {
        (format!("{prefix}{key}:"), LineKind::CallLabel)
    } else {
        match value {
            CanonicalNode::Seq(_) => (format!("{prefix}{key}:"), LineKind::ArrayKey),
            CanonicalNode::Map(entries) => {
                let kind = if entries.contains_key("method") {
                    LineKind::SubcallKey
                } else {
                    LineKind::StructKey
                };
                (format!("{prefix}{key}:"), kind)
            }
            CanonicalNode::Null => (format!("{prefix}{key}: null"), LineKind::NullValue),
            CanonicalNode::Text(s) if s.starts_with("0x") => {
                (format!("{prefix}{key}: {s}"), LineKind::HexValue)
            }
            leaf => (format!("{prefix}{key}: {}", leaf_text(leaf)), LineKind::Scalar),
        }
    };
    RenderedLine { text, kind }
}

fn leaf_text(node: &CanonicalNode) -> String {
    match node {
        CanonicalNode::Null => "null".to_string(),
        CanonicalNode::Bool(b) => b.to_string(),
        CanonicalNode::Number(n) => n.to_string(),
        CanonicalNode::Text(s) => s.clone(),
        CanonicalNode::Seq(_) | CanonicalNode::Map(_) => String::new(),
    }
}

fn leaf_kind(node: &CanonicalNode) -> LineKind {
    match node {
        CanonicalNode::Null => LineKind::NullValue,
        CanonicalNode::Text(s) if s.starts_with("0x") => LineKind::HexValue,
        _ => LineKind::Scalar,
    }
}

/// A sequence whose elements are all leaves, led by a hex string, renders
/// inline as one comma-joined line.
fn inline_hex_list(value: &CanonicalNode) -> Option<String> {
    let CanonicalNode::Seq(items) = value else {
        return None;
    };
    if !items.first().is_some_and(CanonicalNode::is_hex_text) {
        return None;
    }
    if items
        .iter()
        .any(|item| matches!(item, CanonicalNode::Seq(_) | CanonicalNode::Map(_)))
    {
        return None;
    }
    Some(
        items
            .iter()
            .map(leaf_text)
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// Packs a mapping keyed `"0".."19"` (one entry per address byte) into a
/// bare hex string. A literal `"x"` value contributes `"0"`; this is a
/// degenerate artifact of one nested encoding and is reproduced as-is.
fn pack_byte_map(entries: &IndexMap<String, CanonicalNode>) -> Option<String> {
    if entries.len() != ADDRESS_BYTES {
        return None;
    }
    let mut bytes: Vec<(usize, &CanonicalNode)> = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        bytes.push((key.parse().ok()?, value));
    }
    bytes.sort_by_key(|(index, _)| *index);
    if bytes.iter().enumerate().any(|(pos, (index, _))| pos != *index) {
        return None;
    }

    let mut packed = String::with_capacity(entries.len() * 2);
    for (_, value) in bytes {
        match value {
            CanonicalNode::Number(n) => {
                let byte = n.as_u64()?;
                let _ = write!(packed, "{byte:02x}");
            }
            CanonicalNode::Text(s) if s.eq_ignore_ascii_case("x") => packed.push('0'),
            CanonicalNode::Text(s) => {
                let lowered = s.to_ascii_lowercase();
                for _ in lowered.len()..2 {
                    packed.push('0');
                }
                packed.push_str(&lowered);
            }
            _ => return None,
        }
    }
    Some(packed)
}

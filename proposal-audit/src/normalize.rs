//! Canonicalization of raw call trees.
//!
//! Two call conventions flow into the pipeline: dispatchable
//! `{section, method, args}` triples from decoded extrinsics, and ABI call
//! data hidden inside hex arguments. Normalization folds both into one
//! shape: a mapping under a composite `"section.method"` label, with empty
//! and null branches pruned away.

use indexmap::IndexMap;

use crate::decoder::{CallDecoder, DecodeOutcome};
use crate::tree::{CanonicalNode, RawNode};

/// Canonicalizes raw call trees against a decoder.
pub struct TreeNormalizer<'a> {
    decoder: &'a CallDecoder,
}

impl<'a> TreeNormalizer<'a> {
    pub fn new(decoder: &'a CallDecoder) -> Self {
        Self { decoder }
    }

    /// Normalizes a raw node.
    ///
    /// Returns `None` when the node reduces to nothing meaningful (an empty
    /// container, or a call whose arguments all pruned away); callers treat
    /// that the same as an empty mapping. Normalization is idempotent:
    /// feeding a canonical tree back through produces the same tree.
    pub fn normalize(&self, node: &RawNode) -> Option<CanonicalNode> {
        match node {
            RawNode::Null => Some(CanonicalNode::Null),
            RawNode::Bool(b) => Some(CanonicalNode::Bool(*b)),
            RawNode::Number(n) => Some(CanonicalNode::Number(n.clone())),
            RawNode::Text(text) => self.normalize_text(text),
            RawNode::Seq(items) => {
                let out: Vec<CanonicalNode> = items
                    .iter()
                    .filter_map(|item| self.normalize(item))
                    .filter(|c| !matches!(c, CanonicalNode::Null))
                    .collect();
                if out.is_empty() {
                    None
                } else {
                    Some(CanonicalNode::Seq(out))
                }
            }
            RawNode::Map(entries) => {
                let mut out = IndexMap::new();
                for (key, value) in entries {
                    if let Some(normalized) = self.normalize(value) {
                        if !matches!(normalized, CanonicalNode::Null) {
                            out.insert(key.clone(), normalized);
                        }
                    }
                }
                if out.is_empty() {
                    None
                } else {
                    Some(CanonicalNode::Map(out))
                }
            }
            RawNode::Call {
                section,
                method,
                args,
            } => {
                let args = self.normalize(args)?;
                if matches!(args, CanonicalNode::Null) {
                    return None;
                }
                let mut out = IndexMap::new();
                out.insert(format!("{section}.{method}"), args);
                Some(CanonicalNode::Map(out))
            }
        }
    }

    /// Hex text is re-decoded through the registry; anything else passes
    /// through. A decoded call re-enters normalization as a call triple so
    /// nested call data keeps unfolding.
    fn normalize_text(&self, text: &str) -> Option<CanonicalNode> {
        if !text.starts_with("0x") {
            return Some(CanonicalNode::Text(text.to_string()));
        }
        match self.decoder.decode_call(text) {
            DecodeOutcome::Call(call) => self.normalize(&RawNode::from(call)),
            DecodeOutcome::Opaque(_) => Some(CanonicalNode::Text(text.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::InterfaceRegistry;
    use alloy_dyn_abi::{DynSolValue, JsonAbiExt};
    use alloy_primitives::U256;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const ERC20_ABI: &str = r#"[
        {
            "type": "function",
            "name": "approve",
            "inputs": [
                {"name": "spender", "type": "address"},
                {"name": "amount", "type": "uint256"}
            ],
            "outputs": [{"name": "", "type": "bool"}],
            "stateMutability": "nonpayable"
        }
    ]"#;

    fn decoder() -> CallDecoder {
        CallDecoder::new(InterfaceRegistry::load([("Token", ERC20_ABI)]).unwrap())
    }

    fn approve_payload(amount: u64) -> String {
        let registry = InterfaceRegistry::load([("Token", ERC20_ABI)]).unwrap();
        let function = registry
            .get("Token")
            .unwrap()
            .function("approve")
            .unwrap()
            .first()
            .unwrap()
            .clone();
        let input = function
            .abi_encode_input(&[
                DynSolValue::Address(
                    "0x3333333333333333333333333333333333333333".parse().unwrap(),
                ),
                DynSolValue::Uint(U256::from(amount), 256),
            ])
            .unwrap();
        format!("0x{}", hex::encode(input))
    }

    fn canonical_map(entries: Vec<(&str, CanonicalNode)>) -> CanonicalNode {
        CanonicalNode::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    #[test]
    fn triple_folds_into_composite_label() {
        let decoder = decoder();
        let normalizer = TreeNormalizer::new(&decoder);
        let raw = RawNode::from(json!({
            "section": "assetRegistry",
            "method": "register",
            "args": {"symbol": "DOT", "decimals": 10}
        }));

        let normalized = normalizer.normalize(&raw).unwrap();
        assert_eq!(
            normalized,
            canonical_map(vec![(
                "assetRegistry.register",
                canonical_map(vec![
                    ("symbol", CanonicalNode::Text("DOT".to_string())),
                    ("decimals", CanonicalNode::Number(10.into())),
                ]),
            )])
        );
    }

    #[test]
    fn triple_with_empty_args_is_omitted() {
        let decoder = decoder();
        let normalizer = TreeNormalizer::new(&decoder);
        let raw = RawNode::from(json!({
            "section": "system",
            "method": "remark",
            "args": {}
        }));
        assert_eq!(normalizer.normalize(&raw), None);
    }

    #[test]
    fn nulls_and_empty_containers_are_pruned() {
        let decoder = decoder();
        let normalizer = TreeNormalizer::new(&decoder);
        let raw = RawNode::from(json!({
            "keep": "value",
            "gone": null,
            "empty_map": {},
            "empty_seq": [],
            "sparse": [null, "x", null]
        }));

        let normalized = normalizer.normalize(&raw).unwrap();
        assert_eq!(
            normalized,
            canonical_map(vec![
                ("keep", CanonicalNode::Text("value".to_string())),
                (
                    "sparse",
                    CanonicalNode::Seq(vec![CanonicalNode::Text("x".to_string())])
                ),
            ])
        );
    }

    #[test]
    fn hex_argument_is_decoded_into_labeled_call() {
        let decoder = decoder();
        let normalizer = TreeNormalizer::new(&decoder);
        let raw = RawNode::from(json!({
            "section": "evm",
            "method": "call",
            "args": {"input": approve_payload(777)}
        }));

        let normalized = normalizer.normalize(&raw).unwrap();
        assert_eq!(
            normalized,
            canonical_map(vec![(
                "evm.call",
                canonical_map(vec![(
                    "input",
                    canonical_map(vec![(
                        "Token.approve",
                        canonical_map(vec![
                            (
                                "spender",
                                CanonicalNode::Text(
                                    "0x3333333333333333333333333333333333333333".to_string()
                                )
                            ),
                            ("amount", CanonicalNode::Text("777".to_string())),
                        ]),
                    )]),
                )]),
            )])
        );
    }

    #[test]
    fn undecodable_hex_passes_through_unchanged() {
        let decoder = decoder();
        let normalizer = TreeNormalizer::new(&decoder);
        let raw = RawNode::Text("0xdeadbeef".to_string());
        assert_eq!(
            normalizer.normalize(&raw),
            Some(CanonicalNode::Text("0xdeadbeef".to_string()))
        );
    }

    #[test]
    fn normalize_is_idempotent() {
        let decoder = decoder();
        let normalizer = TreeNormalizer::new(&decoder);
        let raw = RawNode::from(json!({
            "section": "utility",
            "method": "batchAll",
            "args": {
                "calls": [
                    {
                        "section": "evm",
                        "method": "call",
                        "args": {"input": approve_payload(41), "value": "0"}
                    },
                    null
                ]
            }
        }));

        let once = normalizer.normalize(&raw).unwrap();
        let twice = normalizer.normalize(&RawNode::from(once.clone())).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn output_contains_no_empty_containers() {
        fn assert_no_empty(node: &CanonicalNode) {
            match node {
                CanonicalNode::Seq(items) => {
                    assert!(!items.is_empty());
                    items.iter().for_each(assert_no_empty);
                }
                CanonicalNode::Map(entries) => {
                    assert!(!entries.is_empty());
                    entries.values().for_each(assert_no_empty);
                }
                _ => {}
            }
        }

        let decoder = decoder();
        let normalizer = TreeNormalizer::new(&decoder);
        let raw = RawNode::from(json!({
            "a": {"b": [], "c": {"d": null}},
            "e": [[], {}, null, {"f": "g"}],
            "payload": "0xdead"
        }));

        let normalized = normalizer.normalize(&raw).unwrap();
        assert_no_empty(&normalized);
    }
}

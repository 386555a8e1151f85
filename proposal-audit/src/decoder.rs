//! Greedy call-data decoder over a set of registered interfaces.
//!
//! Decoding is a first-match scan: interfaces are tried in registry load
//! order, and within one interface candidate functions are tried in
//! `JsonAbi::functions()` iteration order (sorted by name, reproducible).
//! The first candidate whose selector matches and whose full parameter list
//! decodes wins. Anything that cannot be decoded comes back unchanged as
//! [`DecodeOutcome::Opaque`] so the caller can still display it.

use alloy_dyn_abi::{DynSolValue, JsonAbiExt};
use alloy_json_abi::{Function, Param};
use indexmap::IndexMap;

use crate::registry::InterfaceRegistry;
use crate::tree::RawNode;

/// Width of the leading function selector in bytes
pub const SELECTOR_BYTES: usize = 4;

/// Width of one ABI head slot in bytes
const SLOT_BYTES: usize = 32;

/// A call successfully matched against a registered interface.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedCall {
    /// Registered name of the interface that matched
    pub interface: String,
    /// Name of the matched function
    pub function: String,
    /// Decoded parameters, keyed by declared parameter name, in
    /// declaration order
    pub params: IndexMap<String, RawNode>,
}

impl DecodedCall {
    /// Composite call label, e.g. `"Pool.supply"`
    pub fn label(&self) -> String {
        format!("{}.{}", self.interface, self.function)
    }
}

impl From<DecodedCall> for RawNode {
    fn from(call: DecodedCall) -> Self {
        RawNode::Call {
            section: call.interface,
            method: call.function,
            args: Box::new(RawNode::Map(call.params)),
        }
    }
}

/// Result of a decode attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome {
    /// The payload matched a registered interface
    Call(DecodedCall),
    /// The payload could not be decoded; the input is returned unchanged
    Opaque(String),
}

impl DecodeOutcome {
    pub fn is_opaque(&self) -> bool {
        matches!(self, DecodeOutcome::Opaque(_))
    }
}

/// Failure while reshaping one decoded value into its declared form.
///
/// These never abort the enclosing call: the affected field degrades to the
/// raw hex of its head slot window.
#[derive(Debug, thiserror::Error)]
enum ReshapeError {
    #[error("tuple value for a parameter without component types")]
    MissingComponents,
    #[error("tuple arity mismatch: {expected} components, {actual} values")]
    TupleArity { expected: usize, actual: usize },
    #[error("unsupported value kind: {0}")]
    Unsupported(String),
}

/// Decodes call payloads against every interface in a registry.
pub struct CallDecoder {
    registry: InterfaceRegistry,
}

impl CallDecoder {
    pub fn new(registry: InterfaceRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &InterfaceRegistry {
        &self.registry
    }

    /// Decodes a `0x`-prefixed hex call payload.
    ///
    /// Returns [`DecodeOutcome::Opaque`] with the input unchanged when the
    /// payload is not well-formed hex, is shorter than the selector, or
    /// matches no registered interface. Never panics.
    pub fn decode_call(&self, payload: &str) -> DecodeOutcome {
        let Some(stripped) = payload.strip_prefix("0x") else {
            return DecodeOutcome::Opaque(payload.to_string());
        };
        let Ok(data) = hex::decode(stripped) else {
            return DecodeOutcome::Opaque(payload.to_string());
        };
        if data.len() < SELECTOR_BYTES {
            return DecodeOutcome::Opaque(payload.to_string());
        }

        for (name, abi) in self.registry.iter() {
            for function in abi.functions() {
                if function.selector().as_slice() != &data[..SELECTOR_BYTES] {
                    continue;
                }
                match function.abi_decode_input(&data[SELECTOR_BYTES..]) {
                    Ok(values) => {
                        return DecodeOutcome::Call(reassemble(name, function, &values, &data));
                    }
                    Err(err) => {
                        tracing::debug!(
                            interface = name,
                            function = %function.name,
                            %err,
                            "candidate signature rejected"
                        );
                    }
                }
            }
        }

        DecodeOutcome::Opaque(payload.to_string())
    }
}

/// Reassembles decoded values into a name-keyed parameter map. A field
/// whose reshape fails is replaced by the raw hex of its head slot window.
fn reassemble(
    interface: &str,
    function: &Function,
    values: &[DynSolValue],
    data: &[u8],
) -> DecodedCall {
    let mut params = IndexMap::new();
    for (i, (param, value)) in function.inputs.iter().zip(values).enumerate() {
        let name = if param.name.is_empty() {
            format!("param{i}")
        } else {
            param.name.clone()
        };
        let node = match reshape(value, param) {
            Ok(node) => node,
            Err(err) => {
                tracing::debug!(
                    interface,
                    function = %function.name,
                    param = %name,
                    %err,
                    "field decode failed, substituting raw slot"
                );
                RawNode::Text(slot_window_hex(data, i))
            }
        };
        params.insert(name, node);
    }
    DecodedCall {
        interface: interface.to_string(),
        function: function.name.clone(),
        params,
    }
}

/// Raw hex of the 32-byte head slot for parameter `index`, offset past the
/// selector and clamped to the payload length.
fn slot_window_hex(data: &[u8], index: usize) -> String {
    let start = SELECTOR_BYTES + index * SLOT_BYTES;
    if start >= data.len() {
        return "0x".to_string();
    }
    let end = (start + SLOT_BYTES).min(data.len());
    format!("0x{}", hex::encode(&data[start..end]))
}

/// Type-directed reshape of one decoded value.
///
/// Numbers are stringified in full precision, byte values become `0x` hex
/// text, tuples become mappings keyed by component name, and arrays recurse
/// on their declared element type.
fn reshape(value: &DynSolValue, param: &Param) -> Result<RawNode, ReshapeError> {
    match value {
        DynSolValue::Bool(b) => Ok(RawNode::Bool(*b)),
        DynSolValue::Uint(v, _) => Ok(RawNode::Text(v.to_string())),
        DynSolValue::Int(v, _) => Ok(RawNode::Text(v.to_string())),
        DynSolValue::Address(addr) => Ok(RawNode::Text(addr.to_string())),
        DynSolValue::FixedBytes(word, size) => {
            Ok(RawNode::Text(format!("0x{}", hex::encode(&word.as_slice()[..*size]))))
        }
        DynSolValue::Bytes(bytes) => Ok(RawNode::Text(format!("0x{}", hex::encode(bytes)))),
        DynSolValue::String(s) => Ok(RawNode::Text(s.clone())),
        DynSolValue::Tuple(fields) => named_components(fields, param),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                let node = match item {
                    DynSolValue::Tuple(fields) if !param.components.is_empty() => {
                        named_components(fields, param)?
                    }
                    _ if !param.components.is_empty() => reshape(item, &param.components[0])?,
                    _ => reshape(item, param)?,
                };
                out.push(node);
            }
            Ok(RawNode::Seq(out))
        }
        other => Err(ReshapeError::Unsupported(format!("{other:?}"))),
    }
}

/// Zips struct fields with their declared components into a name-keyed
/// mapping, recursively.
fn named_components(fields: &[DynSolValue], param: &Param) -> Result<RawNode, ReshapeError> {
    if param.components.is_empty() {
        return Err(ReshapeError::MissingComponents);
    }
    if fields.len() != param.components.len() {
        return Err(ReshapeError::TupleArity {
            expected: param.components.len(),
            actual: fields.len(),
        });
    }
    let mut map = IndexMap::new();
    for (j, (component, field)) in param.components.iter().zip(fields).enumerate() {
        let name = if component.name.is_empty() {
            format!("param{j}")
        } else {
            component.name.clone()
        };
        map.insert(name, reshape(field, component)?);
    }
    Ok(RawNode::Map(map))
}

//! Governance proposal call-data pipeline.
//!
//! Operational tasks queue outbound calls into a [`BatchAccumulator`]; an
//! external encoder packs them into one batched payload; this crate decodes
//! that payload back against an [`InterfaceRegistry`], canonicalizes the
//! resulting call tree, and renders it as a deterministic outline for human
//! review before submission.
//!
//! The pipeline degrades instead of failing: malformed or unregistered
//! call data is carried through as opaque hex so the reviewer always sees
//! the full proposal.

pub mod accounts;
pub mod batch;
pub mod decoder;
pub mod normalize;
pub mod registry;
pub mod render;
pub mod tree;

pub use batch::{BatchAccumulator, CallRecord};
pub use decoder::{CallDecoder, DecodeOutcome, DecodedCall, SELECTOR_BYTES};
pub use normalize::TreeNormalizer;
pub use registry::{InterfaceRegistry, RegistryError};
pub use render::{ADDRESS_BYTES, LineKind, RenderedLine, render};
pub use tree::{CanonicalNode, RawNode};

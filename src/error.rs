use crate::registry::EventId;

/// Errors produced while building a registry from chain metadata.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
	#[error("type index {index} referenced by '{path}' is not present in the type registry")]
	UnknownTypeIndex { path: String, index: u32 },

	#[error("pallet '{pallet}' declares {kind} type {index} but it is not a variant type")]
	NotAVariant { pallet: String, kind: &'static str, index: u32 },

	#[error("unsupported type definition at '{path}' (type index {index}): {reason}")]
	UnsupportedType { path: String, index: u32, reason: &'static str },

	#[error("unsupported compact inner type at '{path}' (type index {index}): {reason}")]
	UnsupportedCompactType { path: String, index: u32, reason: &'static str },

	#[error("recursive type at index {index} could not be resolved: {reason}")]
	RecursiveResolution { index: u32, reason: &'static str },

	#[error("duplicate event id {0:?} while building the event registry")]
	DuplicateEventId(EventId),
}

/// Errors produced while decoding a payload against a previously built registry entry.
#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
	#[error("failed to read bytes while decoding field '{field}': {source}")]
	Read { field: String, #[source] source: codec::Error },

	#[error("unknown variant discriminant {discriminant} while decoding field '{field}'")]
	UnknownVariant { field: String, discriminant: u8 },

	#[error("decoder node {0:?} has no resolved recursive target; the registry that produced it failed to build correctly")]
	MissingDecoder(crate::node::NodeId),

	#[error("no registry entry found for key '{0}'")]
	UnknownCallOrError(String),

	#[error("no registry entry found for event id {0:?}")]
	UnknownEvent(EventId),
}

//! Builds call, event, and error decoder registries from v14 chain metadata,
//! and decodes SCALE-encoded payloads against them.
//!
//! The engine runs in two phases. [`builder::Builder`] walks the metadata's
//! type graph once per registry, producing a finite graph of [`node::DecoderNode`]s
//! addressed by [`node::NodeId`] and memoized by type index so that cyclic and
//! shared types are each materialised exactly once. [`driver::decode_type`]
//! then executes a built [`registry::Type`] against a byte stream without
//! ever re-touching the metadata that produced it.
//!
//! ```ignore
//! let metadata = Metadata::new(runtime_metadata_v14);
//! let calls = build_call_registry(&metadata)?;
//! let decoded = calls.decode("System.remark", &mut bytes)?;
//! ```

mod builder;
mod driver;
mod error;
mod metadata;
mod node;
mod primitives;
mod registry;
mod value;

pub use error::{BuildError, DecodeError};
pub use metadata::Metadata;
pub use node::{CompositeField, DecoderArena, DecoderNode, NodeId};
pub use registry::{
	build_call_registry, build_error_registry, build_event_registry, CallRegistry, ErrorRegistry,
	EventId, EventRegistry, Type,
};
pub use value::{Composite, Value};

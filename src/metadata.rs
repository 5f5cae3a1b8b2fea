use frame_metadata::v14::{PalletMetadata, RuntimeMetadataV14};
use scale_info::PortableRegistry;

/// Thin wrapper over the externally-parsed v14 metadata envelope, giving the
/// rest of this crate descriptive pallet lookups instead of raw `Option`
/// plumbing through `Vec<PalletMetadata>`.
#[derive(Debug, Clone)]
pub struct Metadata {
	inner: RuntimeMetadataV14,
}

impl Metadata {
	pub fn new(inner: RuntimeMetadataV14) -> Self {
		Self { inner }
	}

	pub fn types(&self) -> &PortableRegistry {
		&self.inner.types
	}

	pub fn pallets(&self) -> impl Iterator<Item = &PalletMetadata<scale_info::form::PortableForm>> {
		self.inner.pallets.iter()
	}

	pub fn pallet_by_index(&self, index: u8) -> Option<&PalletMetadata<scale_info::form::PortableForm>> {
		self.inner.pallets.iter().find(|p| p.index == index)
	}

	pub fn pallet_by_name(&self, name: &str) -> Option<&PalletMetadata<scale_info::form::PortableForm>> {
		self.inner.pallets.iter().find(|p| p.name == name)
	}
}

impl From<RuntimeMetadataV14> for Metadata {
	fn from(inner: RuntimeMetadataV14) -> Self {
		Self::new(inner)
	}
}

use bitvec::order::Lsb0;
use bitvec::vec::BitVec;
use codec::{Compact, Encode};
use hex_literal::hex;
use frame_metadata::v14::{ExtrinsicMetadata, PalletCallMetadata, PalletErrorMetadata, PalletEventMetadata, PalletMetadata, RuntimeMetadataV14};
use scale_info::{MetaType, TypeInfo};

use scale_metadata_registry::{
	build_call_registry, build_error_registry, build_event_registry, EventId, Metadata, Value,
};

#[derive(TypeInfo, Encode)]
#[allow(dead_code)]
enum SystemCall {
	Remark { remark: Vec<u8> },
}

#[derive(TypeInfo, Encode)]
#[allow(dead_code)]
enum BalancesEvent {
	Transfer { from: u32, to: u32, amount: u64 },
	DustLost,
}

#[derive(TypeInfo, Encode)]
#[allow(dead_code)]
enum BalancesError {
	InsufficientBalance,
}

#[derive(TypeInfo, Encode)]
#[allow(dead_code)]
enum BitsCall {
	SetFlags { flags: BitVec<u8, Lsb0> },
}

fn empty_extrinsic() -> ExtrinsicMetadata {
	ExtrinsicMetadata { ty: MetaType::new::<()>(), version: 4, signed_extensions: vec![] }
}

fn build_metadata(pallets: Vec<PalletMetadata>) -> Metadata {
	let raw = RuntimeMetadataV14::new(pallets, empty_extrinsic(), MetaType::new::<()>());
	Metadata::new(raw)
}

fn bare_pallet(name: &'static str, index: u8) -> PalletMetadata {
	PalletMetadata { name, storage: None, calls: None, event: None, constants: vec![], error: None, index }
}

/// S1 — a primitive/Vec<u8> call field decodes in field declaration order.
#[test]
fn decodes_remark_call_with_vec_u8_field() {
	let mut pallet = bare_pallet("System", 0);
	pallet.calls = Some(PalletCallMetadata { ty: MetaType::new::<SystemCall>() });
	let metadata = build_metadata(vec![pallet]);

	let registry = build_call_registry(&metadata).unwrap();

	let mut bytes: &[u8] = &hex!("08AABB");
	let decoded = registry.decode("System.Remark", &mut bytes).unwrap();

	assert_eq!(decoded.get("remark"), Some(&Value::Sequence(vec![Value::U8(0xAA), Value::U8(0xBB)])));
	assert!(bytes.is_empty());
}

/// Same fixture as above, but the payload arrives as a runtime hex string
/// (e.g. lifted from an RPC response) rather than a compile-time literal.
#[test]
fn decodes_remark_call_from_runtime_hex_string() {
	let mut pallet = bare_pallet("System", 0);
	pallet.calls = Some(PalletCallMetadata { ty: MetaType::new::<SystemCall>() });
	let metadata = build_metadata(vec![pallet]);
	let registry = build_call_registry(&metadata).unwrap();

	let payload = hex::decode("08aabb").unwrap();
	let mut bytes: &[u8] = &payload;
	let decoded = registry.decode("System.Remark", &mut bytes).unwrap();

	assert_eq!(decoded.get("remark"), Some(&Value::Sequence(vec![Value::U8(0xAA), Value::U8(0xBB)])));
}

/// S3 — events are keyed by `(pallet_index, variant_index)`, not by name.
#[test]
fn event_registry_is_keyed_by_pallet_and_variant_index() {
	let mut pallet = bare_pallet("Balances", 6);
	pallet.event = Some(PalletEventMetadata { ty: MetaType::new::<BalancesEvent>() });
	let metadata = build_metadata(vec![pallet]);

	let registry = build_event_registry(&metadata).unwrap();

	let transfer = registry.get(EventId(6, 0)).expect("Transfer variant should be registered");
	assert_eq!(transfer.name, "Balances.Transfer");

	let dust_lost = registry.get(EventId(6, 1)).expect("DustLost variant should be registered");
	assert_eq!(dust_lost.name, "Balances.DustLost");

	assert!(registry.get(EventId(6, 2)).is_none());
	assert!(registry.get(EventId(0, 0)).is_none());
}

/// A payload-less event variant surfaces its own discriminant byte rather
/// than an empty mapping.
#[test]
fn payload_less_event_variant_decodes_to_its_discriminant() {
	let mut pallet = bare_pallet("Balances", 6);
	pallet.event = Some(PalletEventMetadata { ty: MetaType::new::<BalancesEvent>() });
	let metadata = build_metadata(vec![pallet]);
	let registry = build_event_registry(&metadata).unwrap();

	let dust_lost = registry.get(EventId(6, 1)).unwrap();
	assert!(dust_lost.fields.is_empty());
}

/// S6 — building against a declared-but-missing type index fails descriptively
/// and does not produce a partial registry.
#[test]
fn missing_errors_type_index_fails_the_whole_build() {
	let mut pallet = bare_pallet("Broken", 1);
	pallet.error = Some(PalletErrorMetadata { ty: MetaType::new::<()>() });
	let mut metadata_raw =
		RuntimeMetadataV14::new(vec![pallet], empty_extrinsic(), MetaType::new::<()>());

	// Corrupt the registered error type index so it no longer resolves.
	let bogus_index = metadata_raw.types.types.len() as u32 + 1000;
	metadata_raw.pallets[0].error.as_mut().unwrap().ty.id = bogus_index;
	let metadata = Metadata::new(metadata_raw);

	let result = build_error_registry(&metadata);
	assert!(result.is_err());
}

/// Errors registry surfaces a `NotAVariant` error if the declared type is not
/// itself a variant (e.g. pointing at a plain composite or primitive).
#[test]
fn errors_type_that_is_not_a_variant_is_rejected() {
	let mut pallet = bare_pallet("Broken", 1);
	pallet.error = Some(PalletErrorMetadata { ty: MetaType::new::<u8>() });
	let metadata = build_metadata(vec![pallet]);

	let result = build_error_registry(&metadata);
	assert!(result.is_err());
}

/// S5 — a BitSequence field decodes to a `{ bit_store, bit_order }` mapping.
#[test]
fn bit_sequence_field_decodes_store_and_order() {
	let mut pallet = bare_pallet("Bits", 2);
	pallet.calls = Some(PalletCallMetadata { ty: MetaType::new::<BitsCall>() });
	let metadata = build_metadata(vec![pallet]);
	let registry = build_call_registry(&metadata).unwrap();

	let mut flags: BitVec<u8, Lsb0> = BitVec::new();
	flags.push(true);
	flags.push(false);
	flags.push(true);
	let encoded = flags.encode();
	let mut cursor: &[u8] = &encoded;

	let decoded = registry.decode("Bits.SetFlags", &mut cursor).unwrap();
	assert_eq!(decoded.len(), 1);
	let (_, field_value) = decoded.iter().next().expect("call has exactly one field");
	match field_value {
		Value::Map(inner) => {
			assert!(inner.get("bit_store").is_some());
			assert!(inner.get("bit_order").is_some());
		},
		other => panic!("expected a bit-sequence mapping, got {other:?}"),
	}
}

/// Compact-encoded unsigned integers decode through the same field path as
/// plain primitives, independent of bit width.
#[test]
fn compact_field_decodes_as_unsigned_integer() {
	#[derive(TypeInfo, Encode)]
	#[allow(dead_code)]
	enum StakingCall {
		Bond {
			#[codec(compact)]
			amount: u128,
		},
	}

	let mut pallet = bare_pallet("Staking", 3);
	pallet.calls = Some(PalletCallMetadata { ty: MetaType::new::<StakingCall>() });
	let metadata = build_metadata(vec![pallet]);
	let registry = build_call_registry(&metadata).unwrap();

	let bytes = Compact(12_345u128).encode();
	let mut cursor: &[u8] = &bytes;

	let decoded = registry.decode("Staking.Bond", &mut cursor).unwrap();
	assert_eq!(decoded.get("amount"), Some(&Value::U128(12_345)));
}

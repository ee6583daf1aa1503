use frame_metadata::v14::{
    ExtrinsicMetadata, PalletCallMetadata, PalletConstantMetadata, PalletMetadata,
    PalletStorageMetadata, RuntimeMetadataV14, SignedExtensionMetadata, StorageEntryMetadata,
    StorageEntryModifier, StorageEntryType,
};
use frame_metadata::RuntimeMetadataPrefixed;
use parity_scale_codec::{Compact, Encode};
use scale_info::{meta_type, TypeInfo};
use sp_core::{crypto::AccountId32, H256, H512};
use sp_crypto_hashing::blake2_256;
use sp_runtime::{generic::Era, MultiAddress};
use std::marker::PhantomData;

use crate::cards::ParsedData;
use crate::compacts::get_compact;
use crate::error::{EraError, MetadataError, ParserError, RegistryError, TxError};
use crate::metadata::CheckedMetadata;
use crate::methods;
use crate::{
    decode_signed_tx, decode_signing_payload, decode_unsigned_tx, signed_tx, signing_payload,
    tx_hash, BaseTxInfo, TxOptions, UnsignedTransaction,
};

const ALICE_HEX: &str = "d43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d";
const ALICE_SS58: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
const BOB_HEX: &str = "8eaf04151687736326c9fea17e25fc5287613693c912909cb226aa4794f26a48";
const BOB_SS58: &str = "5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty";
const GENESIS_HASH: &str = "e143f23803ac50e8f6f8e62695d1ce9e4e1d68aa36c1cd2cfd15340213f3423e";
const BLOCK_HASH: &str = "5b1d91c89d3de85a4d6eee76ecf3a303cf38b59e7d81522eb7cd24b02eb161ff";

type Balance = u128;
type TestAddress = MultiAddress<AccountId32, u32>;

mod system {
    use super::*;

    #[allow(non_camel_case_types)]
    #[derive(Encode, TypeInfo)]
    pub enum Call {
        #[codec(index = 1)]
        remark { remark: Vec<u8> },
    }
}

mod balances {
    use super::*;

    #[allow(non_camel_case_types)]
    #[derive(Encode, TypeInfo)]
    pub enum Call {
        #[codec(index = 0)]
        transfer {
            dest: TestAddress,
            #[codec(compact)]
            value: Balance,
        },
        #[codec(index = 3)]
        transfer_keep_alive {
            dest: TestAddress,
            #[codec(compact)]
            value: Balance,
        },
        #[codec(index = 4)]
        transfer_all { dest: TestAddress, keep_alive: bool },
    }
}

mod utility {
    use super::*;

    #[allow(non_camel_case_types)]
    #[derive(Encode, TypeInfo)]
    pub enum Call {
        #[codec(index = 2)]
        batch_all { calls: Vec<RuntimeCall> },
    }
}

#[derive(Encode, TypeInfo)]
enum RuntimeCall {
    #[codec(index = 0)]
    System(system::Call),
    #[codec(index = 4)]
    Balances(balances::Call),
    #[codec(index = 16)]
    Utility(utility::Call),
}

#[derive(Encode, TypeInfo)]
enum TestSignature {
    #[codec(index = 0)]
    Ed25519(H512),
    #[codec(index = 1)]
    Sr25519(H512),
}

#[derive(TypeInfo)]
struct TestExtra;

#[derive(TypeInfo)]
struct UncheckedExtrinsic<Address, Call, Signature, Extra> {
    marker: PhantomData<(Address, Call, Signature, Extra)>,
}

#[derive(TypeInfo)]
struct Runtime;

#[derive(Encode, TypeInfo)]
struct RuntimeVersion {
    spec_name: String,
    spec_version: u32,
    transaction_version: u32,
}

fn signed_extensions() -> Vec<SignedExtensionMetadata> {
    vec![
        SignedExtensionMetadata {
            identifier: "CheckNonZeroSender",
            ty: meta_type::<()>(),
            additional_signed: meta_type::<()>(),
        },
        SignedExtensionMetadata {
            identifier: "CheckSpecVersion",
            ty: meta_type::<()>(),
            additional_signed: meta_type::<u32>(),
        },
        SignedExtensionMetadata {
            identifier: "CheckTxVersion",
            ty: meta_type::<()>(),
            additional_signed: meta_type::<u32>(),
        },
        SignedExtensionMetadata {
            identifier: "CheckGenesis",
            ty: meta_type::<()>(),
            additional_signed: meta_type::<H256>(),
        },
        SignedExtensionMetadata {
            identifier: "CheckMortality",
            ty: meta_type::<Era>(),
            additional_signed: meta_type::<H256>(),
        },
        SignedExtensionMetadata {
            identifier: "CheckNonce",
            ty: meta_type::<Compact<u32>>(),
            additional_signed: meta_type::<()>(),
        },
        SignedExtensionMetadata {
            identifier: "CheckWeight",
            ty: meta_type::<()>(),
            additional_signed: meta_type::<()>(),
        },
        SignedExtensionMetadata {
            identifier: "ChargeTransactionPayment",
            ty: meta_type::<Compact<u128>>(),
            additional_signed: meta_type::<()>(),
        },
    ]
}

fn test_metadata() -> RuntimeMetadataV14 {
    let runtime_version = RuntimeVersion {
        spec_name: String::from("test-runtime"),
        spec_version: 9999,
        transaction_version: 7,
    };
    let pallets = vec![
        PalletMetadata {
            name: "System",
            storage: Some(PalletStorageMetadata {
                prefix: "System",
                entries: vec![StorageEntryMetadata {
                    name: "Number",
                    modifier: StorageEntryModifier::Default,
                    ty: StorageEntryType::Plain(meta_type::<u32>()),
                    default: 0u32.encode(),
                    docs: vec![],
                }],
            }),
            calls: Some(PalletCallMetadata {
                ty: meta_type::<system::Call>(),
            }),
            event: None,
            constants: vec![PalletConstantMetadata {
                name: "Version",
                ty: meta_type::<RuntimeVersion>(),
                value: runtime_version.encode(),
                docs: vec![],
            }],
            error: None,
            index: 0,
        },
        PalletMetadata {
            name: "Balances",
            storage: None,
            calls: Some(PalletCallMetadata {
                ty: meta_type::<balances::Call>(),
            }),
            event: None,
            constants: vec![],
            error: None,
            index: 4,
        },
        PalletMetadata {
            name: "Utility",
            storage: None,
            calls: Some(PalletCallMetadata {
                ty: meta_type::<utility::Call>(),
            }),
            event: None,
            constants: vec![],
            error: None,
            index: 16,
        },
    ];
    let extrinsic = ExtrinsicMetadata {
        ty: meta_type::<UncheckedExtrinsic<TestAddress, RuntimeCall, TestSignature, TestExtra>>(),
        version: 4,
        signed_extensions: signed_extensions(),
    };
    RuntimeMetadataV14::new(pallets, extrinsic, meta_type::<Runtime>())
}

fn test_metadata_hex() -> String {
    let prefixed = RuntimeMetadataPrefixed::from(test_metadata());
    format!("0x{}", hex::encode(prefixed.encode()))
}

fn checked_metadata() -> CheckedMetadata {
    CheckedMetadata::from_hex(&test_metadata_hex(), false, None).unwrap()
}

fn base_tx_info() -> BaseTxInfo {
    BaseTxInfo {
        address: ALICE_SS58.to_string(),
        block_hash: format!("0x{}", BLOCK_HASH),
        block_number: 4302222,
        era_period: Some(64),
        genesis_hash: format!("0x{}", GENESIS_HASH),
        metadata_rpc: test_metadata_hex(),
        nonce: 2,
        spec_version: 9999,
        tip: 0,
        transaction_version: 7,
    }
}

#[test]
fn metadata_binds_and_finds_spec_version() {
    let checked_metadata = checked_metadata();
    assert_eq!(checked_metadata.version, "9999");
}

#[test]
fn metadata_input_errors() {
    assert!(matches!(
        CheckedMetadata::from_hex("0xzz", false, None),
        Err(MetadataError::NotHex)
    ));
    assert!(matches!(
        CheckedMetadata::from_hex("0xff", false, None),
        Err(MetadataError::Undecodable)
    ));
    let mut tampered = RuntimeMetadataPrefixed::from(test_metadata()).encode();
    tampered[0..4].copy_from_slice(&[0; 4]);
    assert!(matches!(
        CheckedMetadata::from_hex(&hex::encode(tampered), false, None),
        Err(MetadataError::NotMeta)
    ));
}

#[test]
fn calls_only_trimming() {
    let full = checked_metadata();
    assert!(full.storage_entry_type("System", "Number").is_ok());

    let trimmed = CheckedMetadata::from_hex(&test_metadata_hex(), true, None).unwrap();
    assert_eq!(trimmed.version, "9999");
    assert!(matches!(
        trimmed.storage_entry_type("System", "Number"),
        Err(RegistryError::NoStorageInPallet { .. })
    ));

    // call decoding still works off the shared type registry
    let unsigned = methods::balances::transfer(
        methods::balances::TransferArgs {
            dest: BOB_SS58,
            value: 100,
        },
        &base_tx_info(),
        &trimmed,
    )
    .unwrap();
    assert!(signing_payload(&unsigned, &trimmed).is_ok());
}

#[test]
fn builds_transfer_keep_alive_record() {
    let checked_metadata = checked_metadata();
    let unsigned = methods::balances::transfer_keep_alive(
        methods::balances::TransferArgs {
            dest: BOB_SS58,
            value: 10_000_000_000,
        },
        &base_tx_info(),
        &checked_metadata,
    )
    .unwrap();

    assert_eq!(
        unsigned.method,
        format!("0x040300{}0700e40b5402", BOB_HEX)
    );
    assert_eq!(unsigned.era, "0xe500");
    assert_eq!(unsigned.nonce, "0x08");
    assert_eq!(unsigned.tip, "0x00");
    assert_eq!(unsigned.block_number, "0x0041a58e");
    assert_eq!(unsigned.spec_version, "0x0000270f");
    assert_eq!(unsigned.transaction_version, "0x00000007");

    let options = TxOptions::new(&unsigned.metadata_rpc);
    let decoded = decode_unsigned_tx(&unsigned, &options).unwrap();
    assert_eq!(decoded.block_number, 4302222);
    assert_eq!(decoded.era_period, 64);
    assert_eq!(decoded.nonce, 2);
    assert_eq!(decoded.spec_version, 9999);
    assert_eq!(decoded.tip, 0);
    assert_eq!(decoded.transaction_version, 7);
    assert_eq!(hex::encode(decoded.genesis_hash), GENESIS_HASH);
    assert_eq!(decoded.metadata_rpc, unsigned.metadata_rpc);
    assert_eq!(decoded.method.pallet_name, "Balances");
    assert_eq!(decoded.method.call_name, "transfer_keep_alive");
}

#[test]
fn signing_payload_assembles_and_decodes() {
    let checked_metadata = checked_metadata();
    let unsigned = methods::balances::transfer_keep_alive(
        methods::balances::TransferArgs {
            dest: BOB_SS58,
            value: 10_000_000_000,
        },
        &base_tx_info(),
        &checked_metadata,
    )
    .unwrap();

    let payload = signing_payload(&unsigned, &checked_metadata).unwrap();
    let payload_known = format!(
        "0xa4040300{}0700e40b5402e50008000f27000007000000{}{}",
        BOB_HEX, GENESIS_HASH, BLOCK_HASH
    );
    assert_eq!(payload, payload_known);

    let decoded = decode_signing_payload(&payload, &checked_metadata).unwrap();
    assert_eq!(decoded.era, Era::Mortal(64, 14));
    assert_eq!(decoded.era_period, 64);
    assert_eq!(decoded.nonce, 2);
    assert_eq!(decoded.tip, 0);
    assert_eq!(decoded.spec_version, "9999");
    assert_eq!(decoded.transaction_version, Some("7".to_string()));
    assert_eq!(hex::encode(decoded.genesis_hash), GENESIS_HASH);
    assert_eq!(hex::encode(decoded.block_hash.unwrap()), BLOCK_HASH);

    let method_known = format!(
        r#"pallet: Balances
  call: transfer_keep_alive
    field_name: dest
      enum_variant_name: Id
        Id: {}
    field_name: value
      balance: 10000000000"#,
        BOB_SS58
    );
    assert_eq!(decoded.method.show(0), method_known);
}

#[test]
fn signed_tx_assembles_and_decodes() {
    let checked_metadata = checked_metadata();
    let unsigned = methods::balances::transfer_keep_alive(
        methods::balances::TransferArgs {
            dest: BOB_SS58,
            value: 10_000_000_000,
        },
        &base_tx_info(),
        &checked_metadata,
    )
    .unwrap();

    let signature_hex = format!("0x01{}", "ab".repeat(64));
    let tx = signed_tx(&unsigned, &signature_hex, &checked_metadata).unwrap();
    let tx_known = format!(
        "0x41028400{}01{}e5000800040300{}0700e40b5402",
        ALICE_HEX,
        "ab".repeat(64),
        BOB_HEX
    );
    assert_eq!(tx, tx_known);

    let decoded = decode_signed_tx(&tx, &checked_metadata).unwrap();
    assert_eq!(decoded.era, Era::Mortal(64, 14));
    assert_eq!(decoded.era_period, 64);
    assert_eq!(decoded.nonce, 2);
    assert_eq!(decoded.tip, 0);
    assert_eq!(decoded.method.pallet_name, "Balances");
    assert_eq!(decoded.method.call_name, "transfer_keep_alive");
    assert_eq!(
        decoded.address.data.show(0),
        format!("enum_variant_name: Id\n  Id: {}", ALICE_SS58)
    );
    assert_eq!(
        decoded.signature.data.show(0),
        format!("enum_variant_name: Sr25519\n  H512: {}", "ab".repeat(64))
    );

    let tx_bytes = hex::decode(tx.strip_prefix("0x").unwrap()).unwrap();
    assert_eq!(
        tx_hash(&tx).unwrap(),
        format!("0x{}", hex::encode(blake2_256(&tx_bytes)))
    );
}

#[test]
fn hex_address_accepted() {
    let checked_metadata = checked_metadata();
    let unsigned = methods::balances::transfer(
        methods::balances::TransferArgs {
            dest: &format!("0x{}", BOB_HEX),
            value: 100,
        },
        &base_tx_info(),
        &checked_metadata,
    )
    .unwrap();
    assert_eq!(unsigned.method, format!("0x040000{}9101", BOB_HEX));
}

#[test]
fn builds_transfer_all_record() {
    let checked_metadata = checked_metadata();
    let unsigned = methods::balances::transfer_all(
        BOB_SS58,
        true,
        &base_tx_info(),
        &checked_metadata,
    )
    .unwrap();
    assert_eq!(unsigned.method, format!("0x040400{}01", BOB_HEX));

    let payload = signing_payload(&unsigned, &checked_metadata).unwrap();
    let decoded = decode_signing_payload(&payload, &checked_metadata).unwrap();
    assert_eq!(decoded.method.call_name, "transfer_all");
}

#[test]
fn builds_remark_record() {
    let checked_metadata = checked_metadata();
    let unsigned =
        methods::system::remark(b"hello", &base_tx_info(), &checked_metadata).unwrap();
    assert_eq!(unsigned.method, "0x00011468656c6c6f");

    let payload = signing_payload(&unsigned, &checked_metadata).unwrap();
    let decoded = decode_signing_payload(&payload, &checked_metadata).unwrap();
    assert_eq!(decoded.method.pallet_name, "System");
    assert_eq!(decoded.method.call_name, "remark");
    assert!(decoded
        .method
        .show(0)
        .contains("sequence u8: 68656c6c6f"));
}

#[test]
fn builds_batch_all_record() {
    let checked_metadata = checked_metadata();
    let base = base_tx_info();
    let remark = methods::system::remark(b"hello", &base, &checked_metadata).unwrap();
    let transfer = methods::balances::transfer(
        methods::balances::TransferArgs {
            dest: BOB_SS58,
            value: 100,
        },
        &base,
        &checked_metadata,
    )
    .unwrap();

    let unsigned = methods::utility::batch_all(
        &[remark.method, transfer.method],
        &base,
        &checked_metadata,
    )
    .unwrap();
    let payload = signing_payload(&unsigned, &checked_metadata).unwrap();
    let decoded = decode_signing_payload(&payload, &checked_metadata).unwrap();
    assert_eq!(decoded.method.pallet_name, "Utility");
    assert_eq!(decoded.method.call_name, "batch_all");
    if let ParsedData::Sequence(ref sequence_data) = decoded.method.fields[0].data.data {
        assert_eq!(sequence_data.data.len(), 2);
        match sequence_data.data[0] {
            ParsedData::Call(ref inner) => {
                assert_eq!(inner.pallet_name, "System");
                assert_eq!(inner.call_name, "remark");
            }
            ref other => panic!("expected inner call, got {:?}", other),
        }
        match sequence_data.data[1] {
            ParsedData::Call(ref inner) => {
                assert_eq!(inner.pallet_name, "Balances");
                assert_eq!(inner.call_name, "transfer");
            }
            ref other => panic!("expected inner call, got {:?}", other),
        }
    } else {
        panic!(
            "expected sequence of calls, got {:?}",
            decoded.method.fields[0].data.data
        );
    }
}

#[test]
fn batch_rejects_undecodable_inner_method() {
    let checked_metadata = checked_metadata();
    let result = methods::utility::batch_all(
        &["0xff00".to_string()],
        &base_tx_info(),
        &checked_metadata,
    );
    assert!(matches!(
        result,
        Err(TxError::Parsing(ParserError::Registry(
            RegistryError::PalletNotFound { index: 0xff }
        )))
    ));
}

#[test]
fn immortal_transaction_roundtrip() {
    let checked_metadata = checked_metadata();
    let mut base = base_tx_info();
    base.era_period = None;
    base.block_hash = format!("0x{}", GENESIS_HASH);
    let unsigned = methods::balances::transfer(
        methods::balances::TransferArgs {
            dest: BOB_SS58,
            value: 100,
        },
        &base,
        &checked_metadata,
    )
    .unwrap();
    assert_eq!(unsigned.era, "0x00");

    let payload = signing_payload(&unsigned, &checked_metadata).unwrap();
    let decoded = decode_signing_payload(&payload, &checked_metadata).unwrap();
    assert_eq!(decoded.era, Era::Immortal);
    assert_eq!(decoded.era_period, 0);
}

#[test]
fn immortal_hash_mismatch_rejected() {
    let checked_metadata = checked_metadata();
    let mut base = base_tx_info();
    base.era_period = None;
    // block hash differs from genesis hash
    let unsigned = methods::balances::transfer(
        methods::balances::TransferArgs {
            dest: BOB_SS58,
            value: 100,
        },
        &base,
        &checked_metadata,
    )
    .unwrap();
    let payload = signing_payload(&unsigned, &checked_metadata).unwrap();
    assert!(matches!(
        decode_signing_payload(&payload, &checked_metadata),
        Err(TxError::ImmortalHashMismatch)
    ));
}

#[test]
fn wrong_spec_version_rejected() {
    let checked_metadata = checked_metadata();
    let mut base = base_tx_info();
    base.spec_version = 9998;
    let unsigned = methods::balances::transfer(
        methods::balances::TransferArgs {
            dest: BOB_SS58,
            value: 100,
        },
        &base,
        &checked_metadata,
    )
    .unwrap();
    let payload = signing_payload(&unsigned, &checked_metadata).unwrap();
    match decode_signing_payload(&payload, &checked_metadata) {
        Err(TxError::WrongSpecVersion {
            as_decoded,
            in_metadata,
        }) => {
            assert_eq!(as_decoded, "9998");
            assert_eq!(in_metadata, "9999");
        }
        other => panic!("expected spec version mismatch, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn era_expectation_enforced() {
    let base = base_tx_info();
    let checked_metadata = checked_metadata();
    let mortal = methods::balances::transfer(
        methods::balances::TransferArgs {
            dest: BOB_SS58,
            value: 100,
        },
        &base,
        &checked_metadata,
    )
    .unwrap();
    let mut options = TxOptions::new(&mortal.metadata_rpc);
    options.immortal_era = Some(true);
    assert!(matches!(
        decode_unsigned_tx(&mortal, &options),
        Err(TxError::Era(EraError::ExpectedImmortal { first_byte: 0xe5 }))
    ));

    let mut base_immortal = base_tx_info();
    base_immortal.era_period = None;
    let immortal = methods::balances::transfer(
        methods::balances::TransferArgs {
            dest: BOB_SS58,
            value: 100,
        },
        &base_immortal,
        &checked_metadata,
    )
    .unwrap();
    let mut options = TxOptions::new(&immortal.metadata_rpc);
    options.immortal_era = Some(false);
    assert!(matches!(
        decode_unsigned_tx(&immortal, &options),
        Err(TxError::Era(EraError::ExpectedMortal))
    ));
}

#[test]
fn calls_filter_enforced() {
    let filtered =
        CheckedMetadata::from_hex(&test_metadata_hex(), false, Some(vec![[4, 3]])).unwrap();

    // allowed call goes through
    let keep_alive = methods::balances::transfer_keep_alive(
        methods::balances::TransferArgs {
            dest: BOB_SS58,
            value: 100,
        },
        &base_tx_info(),
        &filtered,
    );
    assert!(keep_alive.is_ok());

    // building a filtered-out call fails
    let transfer = methods::balances::transfer(
        methods::balances::TransferArgs {
            dest: BOB_SS58,
            value: 100,
        },
        &base_tx_info(),
        &filtered,
    );
    assert!(matches!(
        transfer,
        Err(TxError::Registry(RegistryError::CallNotAllowed {
            pallet_index: 4,
            call_index: 0,
        }))
    ));

    // decoding a filtered-out call fails as well
    let unfiltered = checked_metadata();
    let unsigned = methods::balances::transfer(
        methods::balances::TransferArgs {
            dest: BOB_SS58,
            value: 100,
        },
        &base_tx_info(),
        &unfiltered,
    )
    .unwrap();
    let payload = signing_payload(&unsigned, &unfiltered).unwrap();
    assert!(matches!(
        decode_signing_payload(&payload, &filtered),
        Err(TxError::Parsing(ParserError::Registry(
            RegistryError::CallNotAllowed {
                pallet_index: 4,
                call_index: 0,
            }
        )))
    ));
}

#[test]
fn unknown_call_rejected() {
    let checked_metadata = checked_metadata();
    let base = base_tx_info();
    let mut unsigned = methods::balances::transfer(
        methods::balances::TransferArgs {
            dest: BOB_SS58,
            value: 100,
        },
        &base,
        &checked_metadata,
    )
    .unwrap();
    unsigned.method = "0x042a".to_string();
    assert!(matches!(
        signing_payload(&unsigned, &checked_metadata),
        Err(TxError::Parsing(ParserError::UnexpectedEnumVariant {
            position: 1
        }))
    ));
}

#[test]
fn signed_tx_wire_format_checks() {
    let checked_metadata = checked_metadata();

    let not_signed = format!("0x{}04", hex::encode(Compact(1u32).encode()));
    assert!(matches!(
        decode_signed_tx(&not_signed, &checked_metadata),
        Err(TxError::NotSigned)
    ));

    let wrong_version = format!("0x{}85", hex::encode(Compact(1u32).encode()));
    assert!(matches!(
        decode_signed_tx(&wrong_version, &checked_metadata),
        Err(TxError::VersionMismatch {
            version_byte: 0x85,
            version: 4,
        })
    ));

    let length_off = format!("0x{}84", hex::encode(Compact(5u32).encode()));
    assert!(matches!(
        decode_signed_tx(&length_off, &checked_metadata),
        Err(TxError::LengthMismatch {
            declared: 5,
            found: 1,
        })
    ));
}

#[test]
fn cut_signing_payload_rejected() {
    let checked_metadata = checked_metadata();
    // declared call length runs past the end of the data
    assert!(matches!(
        decode_signing_payload("0xa40403", &checked_metadata),
        Err(TxError::CutSignable)
    ));
}

#[test]
fn large_tip_survives_roundtrip() {
    let checked_metadata = checked_metadata();
    let mut base = base_tx_info();
    base.tip = 1u128 << 80;
    let unsigned = methods::balances::transfer(
        methods::balances::TransferArgs {
            dest: BOB_SS58,
            value: 100,
        },
        &base,
        &checked_metadata,
    )
    .unwrap();
    // big-integer compact: 11 data bytes, mode byte (11 - 4) << 2 | 0b11
    assert_eq!(unsigned.tip, format!("0x1f{}01", "00".repeat(10)));

    let options = TxOptions::new(&unsigned.metadata_rpc);
    let decoded_record = decode_unsigned_tx(&unsigned, &options).unwrap();
    assert_eq!(decoded_record.tip, 1u128 << 80);

    let payload = signing_payload(&unsigned, &checked_metadata).unwrap();
    let decoded = decode_signing_payload(&payload, &checked_metadata).unwrap();
    assert_eq!(decoded.tip, 1u128 << 80);
}

#[test]
fn compact_boundary_values() {
    for value in [0u32, 63, 64, (1 << 30) - 1, 1 << 30, u32::MAX] {
        let encoded = Compact(value).encode();
        let mut position = 0;
        assert_eq!(get_compact::<u32>(&encoded, &mut position).unwrap(), value);
        assert_eq!(position, encoded.len());
    }

    // truncated four-byte compact
    let mut position = 0;
    assert!(get_compact::<u32>(&[0x03, 0x00], &mut position).is_err());
}

#[test]
fn record_json_roundtrip() {
    let checked_metadata = checked_metadata();
    let unsigned = methods::balances::transfer_keep_alive(
        methods::balances::TransferArgs {
            dest: BOB_SS58,
            value: 10_000_000_000,
        },
        &base_tx_info(),
        &checked_metadata,
    )
    .unwrap();

    let json = serde_json::to_string(&unsigned).unwrap();
    assert!(json.contains("\"blockNumber\":\"0x0041a58e\""));
    assert!(json.contains("\"specVersion\":\"0x0000270f\""));
    assert!(json.contains(&format!("\"genesisHash\":\"0x{}\"", GENESIS_HASH)));

    let back: UnsignedTransaction = serde_json::from_str(&json).unwrap();
    assert_eq!(back, unsigned);
}

#[test]
fn tx_hash_of_empty_input() {
    assert_eq!(
        tx_hash("0x").unwrap(),
        "0x0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8"
    );
}

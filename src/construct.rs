//! Construct signing payloads and signed extrinsics from unsigned
//! transaction records.
use parity_scale_codec::{Compact, Encode};
use scale_info::TypeDef;
use sp_core::crypto::{AccountId32, Ss58Codec};
use sp_crypto_hashing::blake2_256;

use crate::decode::{decode_era, SIGNED_BIT};
use crate::decoding::decode_as_call;
use crate::error::{BuilderError, ExtensionsError, RegistryError, TxError};
use crate::metadata::CheckedMetadata;
use crate::special::{
    CHARGE_TRANSACTION_PAYMENT, CHECK_GENESIS, CHECK_MORTALITY, CHECK_NONCE, CHECK_SPEC_VERSION,
    CHECK_TX_VERSION,
};
use crate::{
    compact_from_hex, h256_from_hex, hex_to_bytes, u32_from_be_hex, UnsignedTransaction,
};

/// Assemble the signing payload for an unsigned transaction record.
///
/// Output order is dictated by the `signed_extensions` list in metadata:
/// compact call length and call bytes first, then in-payload extension
/// values, then additional-signed values. This is the exact byte string a
/// signer is expected to sign (chains hash it with blake2b-256 first when it
/// is longer than 256 bytes; the payload is returned unhashed).
pub fn signing_payload(
    unsigned: &UnsignedTransaction,
    checked_metadata: &CheckedMetadata,
) -> Result<String, TxError> {
    let method_bytes = checked_method(unsigned, checked_metadata)?;

    let mut payload: Vec<u8> = Vec::new();
    payload.extend_from_slice(&Compact(method_bytes.len() as u32).encode());
    payload.extend_from_slice(&method_bytes);
    payload.extend_from_slice(&encode_in_payload_extensions(unsigned, checked_metadata)?);
    payload.extend_from_slice(&encode_additional_signed(unsigned, checked_metadata)?);
    Ok(format!("0x{}", hex::encode(payload)))
}

/// Assemble a signed extrinsic from an unsigned transaction record and a
/// signature.
///
/// The signature hex is used as supplied and must carry its own
/// `MultiSignature` discriminant byte. The address from the record is
/// wrapped as `MultiAddress::Id`.
pub fn signed_tx(
    unsigned: &UnsignedTransaction,
    signature_hex: &str,
    checked_metadata: &CheckedMetadata,
) -> Result<String, TxError> {
    let method_bytes = checked_method(unsigned, checked_metadata)?;
    let account_id = parse_account_id(&unsigned.address)?;
    let signature_bytes = hex_to_bytes(signature_hex, "signature")?;

    let mut inner: Vec<u8> = Vec::new();
    inner.push(SIGNED_BIT | checked_metadata.meta_v14.extrinsic.version);
    // MultiAddress::Id discriminant
    inner.push(0);
    inner.extend_from_slice(account_id.as_ref());
    inner.extend_from_slice(&signature_bytes);
    inner.extend_from_slice(&encode_in_payload_extensions(unsigned, checked_metadata)?);
    inner.extend_from_slice(&method_bytes);

    let mut tx: Vec<u8> = Vec::new();
    tx.extend_from_slice(&Compact(inner.len() as u32).encode());
    tx.extend_from_slice(&inner);
    Ok(format!("0x{}", hex::encode(tx)))
}

/// Transaction hash of a finished extrinsic: blake2b-256 of its full bytes.
pub fn tx_hash(tx_hex: &str) -> Result<String, TxError> {
    let tx_bytes = hex_to_bytes(tx_hex, "tx")?;
    Ok(format!("0x{}", hex::encode(blake2_256(&tx_bytes))))
}

/// Method bytes from the record, checked to be a decodable call under the
/// bound metadata and its allow-list.
fn checked_method(
    unsigned: &UnsignedTransaction,
    checked_metadata: &CheckedMetadata,
) -> Result<Vec<u8>, TxError> {
    let method_bytes = hex_to_bytes(&unsigned.method, "method")?;
    let mut position = 0;
    decode_as_call(&method_bytes, &mut position, checked_metadata).map_err(TxError::Parsing)?;
    if position != method_bytes.len() {
        return Err(TxError::SomeDataNotUsedCall {
            from: position,
            to: method_bytes.len(),
        });
    }
    Ok(method_bytes)
}

/// In-payload extension values, in `signed_extensions` order.
fn encode_in_payload_extensions(
    unsigned: &UnsignedTransaction,
    checked_metadata: &CheckedMetadata,
) -> Result<Vec<u8>, TxError> {
    let mut out: Vec<u8> = Vec::new();
    for ext in checked_metadata.meta_v14.extrinsic.signed_extensions.iter() {
        match ext.identifier.as_str() {
            CHECK_MORTALITY => {
                let era_bytes = hex_to_bytes(&unsigned.era, "era")?;
                decode_era(&era_bytes, None)?;
                out.extend_from_slice(&era_bytes);
            }
            CHECK_NONCE => {
                let nonce = compact_from_hex::<u32>(&unsigned.nonce, "nonce")?;
                out.extend_from_slice(&Compact(nonce).encode());
            }
            CHARGE_TRANSACTION_PAYMENT => {
                let tip = compact_from_hex::<u128>(&unsigned.tip, "tip")?;
                out.extend_from_slice(&Compact(tip).encode());
            }
            _ => ensure_unit_type(ext.ty.id, &ext.identifier, checked_metadata)?,
        }
    }
    Ok(out)
}

/// Additional-signed extension values, in `signed_extensions` order.
fn encode_additional_signed(
    unsigned: &UnsignedTransaction,
    checked_metadata: &CheckedMetadata,
) -> Result<Vec<u8>, TxError> {
    let mut out: Vec<u8> = Vec::new();
    for ext in checked_metadata.meta_v14.extrinsic.signed_extensions.iter() {
        match ext.identifier.as_str() {
            CHECK_SPEC_VERSION => {
                let spec_version = u32_from_be_hex(&unsigned.spec_version, "specVersion")?;
                out.extend_from_slice(&spec_version.encode());
            }
            CHECK_TX_VERSION => {
                let transaction_version =
                    u32_from_be_hex(&unsigned.transaction_version, "transactionVersion")?;
                out.extend_from_slice(&transaction_version.encode());
            }
            CHECK_GENESIS => {
                let genesis_hash = h256_from_hex(&unsigned.genesis_hash, "genesisHash")?;
                out.extend_from_slice(genesis_hash.as_ref());
            }
            CHECK_MORTALITY => {
                let block_hash = h256_from_hex(&unsigned.block_hash, "blockHash")?;
                out.extend_from_slice(block_hash.as_ref());
            }
            _ => ensure_unit_type(ext.additional_signed.id, &ext.identifier, checked_metadata)?,
        }
    }
    Ok(out)
}

/// An extension this crate has no value for must carry no data.
fn ensure_unit_type(
    ty_id: u32,
    identifier: &str,
    checked_metadata: &CheckedMetadata,
) -> Result<(), TxError> {
    let ty = checked_metadata
        .meta_v14
        .types
        .resolve(ty_id)
        .ok_or(TxError::Registry(RegistryError::TypeNotResolved {
            id: ty_id,
        }))?;
    let is_unit = match &ty.type_def {
        TypeDef::Tuple(x) => x.fields.is_empty(),
        TypeDef::Composite(x) => x.fields.is_empty(),
        _ => false,
    };
    if is_unit {
        Ok(())
    } else {
        Err(TxError::Extensions(ExtensionsError::UnsupportedExtension {
            identifier: identifier.to_string(),
        }))
    }
}

/// Interpret an address as raw hexadecimal account id or SS58 text.
pub(crate) fn parse_account_id(address: &str) -> Result<AccountId32, BuilderError> {
    if let Some(stripped) = address.strip_prefix("0x") {
        let bytes = hex::decode(stripped).map_err(|_| BuilderError::InvalidAddress {
            address: address.to_string(),
        })?;
        let array: [u8; 32] = bytes
            .try_into()
            .map_err(|_| BuilderError::InvalidAddress {
                address: address.to_string(),
            })?;
        Ok(AccountId32::new(array))
    } else {
        AccountId32::from_ss58check(address).map_err(|_| BuilderError::InvalidAddress {
            address: address.to_string(),
        })
    }
}

//! Offline constructor and decoder for Substrate chain transactions.
//!
//! This crate assembles and parses transaction data for Substrate-based
//! chains without any network access. Everything is driven by the chain
//! metadata: a hex `RuntimeMetadataPrefixed` blob (`V14` only) is bound once
//! into [`CheckedMetadata`], and all further operations borrow it.
//!
//! Supported operations:
//!
//! - decode an [`UnsignedTransaction`] record into typed values, with the
//!   call data parsed into cards ([`decode_unsigned_tx`]);
//! - decode a signing payload or a finished signed extrinsic
//!   ([`decode_signing_payload`], [`decode_signed_tx`]), with spec version
//!   and genesis hash cross-checks;
//! - assemble the signing payload and the signed extrinsic for a record
//!   ([`signing_payload`], [`signed_tx`]), and hash a finished extrinsic
//!   ([`tx_hash`]);
//! - build [`UnsignedTransaction`] records for well-known calls
//!   ([`methods`]).
//!
//! Record fields follow the JSON exchange format: hashes and SCALE pieces
//! (`era`, `method`) are raw hex, `blockNumber`/`specVersion`/
//! `transactionVersion` are big-endian numeric hex, `nonce` and `tip` are
//! SCALE compact hex. Balances and tips are `u128` end to end.
//!
//! Decoding is deterministic and total: every byte of input must be used,
//! and any mismatch between data and the type grammar declared in metadata
//! is a terminal error.
pub mod cards;
pub mod compacts;
pub mod construct;
pub mod decode;
pub mod decoding;
pub mod error;
pub mod extensions;
pub mod metadata;
pub mod methods;
pub mod propagated;
pub mod special;

#[cfg(test)]
mod tests;

use parity_scale_codec::{Compact, Decode, Encode, HasCompact};
use serde::{Deserialize, Serialize};
use sp_core::H256;
use sp_runtime::generic::Era;

pub use crate::cards::{Call, ExtendedData, FieldData, Info, ParsedData, VariantData};
pub use crate::construct::{signed_tx, signing_payload, tx_hash};
pub use crate::decode::{decode_signed_tx, decode_signing_payload, decode_unsigned_tx};
pub use crate::decoding::{decode_all_as_type, decode_as_call};
pub use crate::error::TxError;
pub use crate::metadata::{CallIndex, CheckedMetadata};

use crate::compacts::get_compact;

/// Unsigned transaction record, in the JSON exchange shape.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsignedTransaction {
    pub address: String,
    pub block_hash: String,
    pub block_number: String,
    pub era: String,
    pub genesis_hash: String,
    pub metadata_rpc: String,
    pub method: String,
    pub nonce: String,
    pub spec_version: String,
    pub tip: String,
    pub transaction_version: String,
}

/// Options for decoding an [`UnsignedTransaction`].
pub struct TxOptions<'a> {
    /// Hex metadata blob to bind.
    pub metadata_rpc: &'a str,

    /// Trim pallet sections other than calls after binding.
    pub calls_only: bool,

    /// Restrict decodable calls to the listed pallet/call index pairs.
    pub calls_filter: Option<Vec<CallIndex>>,

    /// Mortality expectation for the era field. `None` accepts either kind,
    /// `Some(true)` requires immortal era, `Some(false)` requires mortal.
    pub immortal_era: Option<bool>,
}

impl<'a> TxOptions<'a> {
    pub fn new(metadata_rpc: &'a str) -> Self {
        Self {
            metadata_rpc,
            calls_only: false,
            calls_filter: None,
            immortal_era: None,
        }
    }
}

/// [`UnsignedTransaction`] decoded into typed values.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodedUnsignedTx {
    pub address: String,
    pub block_hash: H256,
    pub block_number: u32,

    /// Era period, `0` for immortal era.
    pub era_period: u64,
    pub genesis_hash: H256,

    /// Metadata blob the record was decoded against, passed through.
    pub metadata_rpc: String,
    pub method: Call,
    pub nonce: u32,
    pub spec_version: u32,
    pub tip: u128,
    pub transaction_version: u32,
}

/// Signing payload decoded into call and extension values.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodedSigningPayload {
    /// Block hash from additional-signed data, if mortality is declared in
    /// metadata.
    pub block_hash: Option<H256>,
    pub era: Era,

    /// Era period, `0` for immortal era.
    pub era_period: u64,

    /// All decoded extension cards, in metadata order: in-payload values
    /// first, additional-signed values second.
    pub extensions: Vec<ExtendedData>,
    pub genesis_hash: H256,
    pub method: Call,
    pub nonce: u128,
    pub spec_version: String,
    pub tip: u128,
    pub transaction_version: Option<String>,
}

/// Signed extrinsic decoded into its wire parts.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodedSignedTx {
    pub address: ExtendedData,
    pub era: Era,

    /// Era period, `0` for immortal era.
    pub era_period: u64,

    /// Decoded in-payload extension cards, in metadata order.
    pub extra: Vec<ExtendedData>,
    pub method: Call,
    pub nonce: u128,
    pub signature: ExtendedData,
    pub tip: u128,
}

/// Per-transaction values shared by all method builders.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BaseTxInfo {
    /// Sender, SS58 text or raw hexadecimal account id.
    pub address: String,
    pub block_hash: String,
    pub block_number: u32,

    /// Mortal era period, `None` for immortal transactions.
    pub era_period: Option<u64>,
    pub genesis_hash: String,
    pub metadata_rpc: String,
    pub nonce: u32,
    pub spec_version: u32,
    pub tip: u128,
    pub transaction_version: u32,
}

pub(crate) fn hex_to_bytes(hex_input: &str, field: &'static str) -> Result<Vec<u8>, TxError> {
    let stripped = hex_input.strip_prefix("0x").unwrap_or(hex_input);
    hex::decode(stripped).map_err(|_| TxError::NotHex { field })
}

pub(crate) fn h256_from_hex(hex_input: &str, field: &'static str) -> Result<H256, TxError> {
    let bytes = hex_to_bytes(hex_input, field)?;
    let array: [u8; 32] = bytes.try_into().map_err(|_| TxError::NotHex { field })?;
    Ok(H256(array))
}

/// Parse a big-endian numeric hex field, at most 4 bytes.
pub(crate) fn u32_from_be_hex(hex_input: &str, field: &'static str) -> Result<u32, TxError> {
    let bytes = hex_to_bytes(hex_input, field)?;
    if bytes.is_empty() || bytes.len() > 4 {
        return Err(TxError::NotHex { field });
    }
    let mut value: u32 = 0;
    for byte in bytes.iter() {
        value = (value << 8) | *byte as u32;
    }
    Ok(value)
}

/// Fixed-width big-endian numeric hex.
pub(crate) fn u32_to_be_hex(value: u32) -> String {
    format!("0x{value:08x}")
}

/// Parse a SCALE compact hex field, all bytes must be used.
pub(crate) fn compact_from_hex<T>(hex_input: &str, field: &'static str) -> Result<T, TxError>
where
    T: HasCompact,
    Compact<T>: Decode,
{
    let bytes = hex_to_bytes(hex_input, field)?;
    let mut position = 0;
    let value = get_compact::<T>(&bytes, &mut position).map_err(|_| TxError::NotHex { field })?;
    if position != bytes.len() {
        return Err(TxError::NotHex { field });
    }
    Ok(value)
}

pub(crate) fn compact_u32_to_hex(value: u32) -> String {
    format!("0x{}", hex::encode(Compact(value).encode()))
}

pub(crate) fn compact_u128_to_hex(value: u128) -> String {
    format!("0x{}", hex::encode(Compact(value).encode()))
}

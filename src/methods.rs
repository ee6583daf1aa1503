//! Method builders: produce unsigned transaction records for a set of
//! well-known calls, validated against the bound metadata.
use parity_scale_codec::{Compact, Encode};
use scale_info::TypeDef;
use sp_runtime::generic::Era;

use crate::construct::parse_account_id;
use crate::error::{BuilderError, RegistryError, TxError};
use crate::metadata::CheckedMetadata;
use crate::{compact_u128_to_hex, compact_u32_to_hex, u32_to_be_hex, BaseTxInfo, UnsignedTransaction};

/// Find the call in metadata by pallet and call name, check the argument
/// count, and assemble the record.
fn build_unsigned(
    pallet_name: &str,
    call_name: &str,
    args: Vec<Vec<u8>>,
    base: &BaseTxInfo,
    checked_metadata: &CheckedMetadata,
) -> Result<UnsignedTransaction, TxError> {
    let pallet = checked_metadata
        .meta_v14
        .pallets
        .iter()
        .find(|pallet| pallet.name == pallet_name)
        .ok_or_else(|| BuilderError::PalletNotFound {
            pallet: pallet_name.to_string(),
        })?;
    let calls_symbol = match pallet.calls {
        Some(ref calls) => calls.ty,
        None => {
            return Err(TxError::Registry(RegistryError::NoCallsInPallet {
                pallet: pallet_name.to_string(),
            }))
        }
    };
    let calls_ty = checked_metadata
        .meta_v14
        .types
        .resolve(calls_symbol.id)
        .ok_or(RegistryError::TypeNotResolved {
            id: calls_symbol.id,
        })?;
    let call_variant = match &calls_ty.type_def {
        TypeDef::Variant(x) => x
            .variants
            .iter()
            .find(|variant| variant.name == call_name)
            .ok_or_else(|| BuilderError::CallNotFound {
                pallet: pallet_name.to_string(),
                call: call_name.to_string(),
            })?,
        _ => {
            return Err(TxError::Registry(RegistryError::NotACall {
                id: calls_symbol.id,
            }))
        }
    };
    if call_variant.fields.len() != args.len() {
        return Err(TxError::Builder(BuilderError::ArgumentCountMismatch {
            pallet: pallet_name.to_string(),
            call: call_name.to_string(),
            expected: call_variant.fields.len(),
            provided: args.len(),
        }));
    }
    checked_metadata.check_call_allowed(pallet.index, call_variant.index)?;

    let mut method: Vec<u8> = vec![pallet.index, call_variant.index];
    for arg in args.iter() {
        method.extend_from_slice(arg);
    }

    let era_bytes = match base.era_period {
        Some(period) => Era::mortal(period, base.block_number as u64).encode(),
        None => Era::Immortal.encode(),
    };

    Ok(UnsignedTransaction {
        address: base.address.to_owned(),
        block_hash: base.block_hash.to_owned(),
        block_number: u32_to_be_hex(base.block_number),
        era: format!("0x{}", hex::encode(era_bytes)),
        genesis_hash: base.genesis_hash.to_owned(),
        metadata_rpc: base.metadata_rpc.to_owned(),
        method: format!("0x{}", hex::encode(method)),
        nonce: compact_u32_to_hex(base.nonce),
        spec_version: u32_to_be_hex(base.spec_version),
        tip: compact_u128_to_hex(base.tip),
        transaction_version: u32_to_be_hex(base.transaction_version),
    })
}

pub mod balances {
    use super::*;

    /// Arguments of the balances transfer call family.
    pub struct TransferArgs<'a> {
        /// Destination, SS58 text or raw hexadecimal account id.
        pub dest: &'a str,
        pub value: u128,
    }

    fn transfer_family(
        call_name: &str,
        args: TransferArgs<'_>,
        base: &BaseTxInfo,
        checked_metadata: &CheckedMetadata,
    ) -> Result<UnsignedTransaction, TxError> {
        let dest_account = parse_account_id(args.dest)?;
        // MultiAddress::Id discriminant and account bytes
        let mut dest_encoded = vec![0u8];
        dest_encoded.extend_from_slice(dest_account.as_ref());
        let value_encoded = Compact(args.value).encode();
        build_unsigned(
            "Balances",
            call_name,
            vec![dest_encoded, value_encoded],
            base,
            checked_metadata,
        )
    }

    pub fn transfer(
        args: TransferArgs<'_>,
        base: &BaseTxInfo,
        checked_metadata: &CheckedMetadata,
    ) -> Result<UnsignedTransaction, TxError> {
        transfer_family("transfer", args, base, checked_metadata)
    }

    pub fn transfer_keep_alive(
        args: TransferArgs<'_>,
        base: &BaseTxInfo,
        checked_metadata: &CheckedMetadata,
    ) -> Result<UnsignedTransaction, TxError> {
        transfer_family("transfer_keep_alive", args, base, checked_metadata)
    }

    /// `transfer_all` has no value argument, only destination and the
    /// keep-alive flag.
    pub fn transfer_all(
        dest: &str,
        keep_alive: bool,
        base: &BaseTxInfo,
        checked_metadata: &CheckedMetadata,
    ) -> Result<UnsignedTransaction, TxError> {
        let dest_account = parse_account_id(dest)?;
        let mut dest_encoded = vec![0u8];
        dest_encoded.extend_from_slice(dest_account.as_ref());
        build_unsigned(
            "Balances",
            "transfer_all",
            vec![dest_encoded, keep_alive.encode()],
            base,
            checked_metadata,
        )
    }
}

pub mod system {
    use super::*;

    pub fn remark(
        remark: &[u8],
        base: &BaseTxInfo,
        checked_metadata: &CheckedMetadata,
    ) -> Result<UnsignedTransaction, TxError> {
        let mut remark_encoded = Compact(remark.len() as u32).encode();
        remark_encoded.extend_from_slice(remark);
        build_unsigned(
            "System",
            "remark",
            vec![remark_encoded],
            base,
            checked_metadata,
        )
    }
}

pub mod utility {
    use super::*;
    use crate::decoding::decode_as_call;

    /// Batch a set of already assembled method hex strings into a single
    /// `batch_all` call. Each inner method is checked to be a decodable call
    /// first.
    pub fn batch_all(
        methods: &[String],
        base: &BaseTxInfo,
        checked_metadata: &CheckedMetadata,
    ) -> Result<UnsignedTransaction, TxError> {
        let mut calls_encoded = Compact(methods.len() as u32).encode();
        for method in methods.iter() {
            let method_bytes = crate::hex_to_bytes(method, "method")?;
            let mut position = 0;
            decode_as_call(&method_bytes, &mut position, checked_metadata)
                .map_err(TxError::Parsing)?;
            if position != method_bytes.len() {
                return Err(TxError::SomeDataNotUsedCall {
                    from: position,
                    to: method_bytes.len(),
                });
            }
            calls_encoded.extend_from_slice(&method_bytes);
        }
        build_unsigned(
            "Utility",
            "batch_all",
            vec![calls_encoded],
            base,
            checked_metadata,
        )
    }
}

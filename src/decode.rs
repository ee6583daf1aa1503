//! Decode transactions: unsigned records, signing payloads, signed
//! extrinsics.
use parity_scale_codec::Decode;
use sp_runtime::generic::Era;

use crate::cards::ExtendedData;
use crate::compacts::get_compact;
use crate::decoding::{decode_as_call, decode_with_type};
use crate::error::{EraError, ExtensionsError, ParserError, RegistryError, TxError};
use crate::extensions::{check_extensions, decode_extensions, CollectedExt};
use crate::metadata::CheckedMetadata;
use crate::propagated::Propagated;
use crate::{
    compact_from_hex, h256_from_hex, hex_to_bytes, u32_from_be_hex, DecodedSignedTx,
    DecodedSigningPayload, DecodedUnsignedTx, TxOptions, UnsignedTransaction,
};

/// Last 7 bits of the version byte are the extrinsic format version.
pub(crate) const VERSION_MASK: u8 = 0b0111_1111;

/// First bit of the version byte is set in signed extrinsics.
pub(crate) const SIGNED_BIT: u8 = 0b1000_0000;

/// Decode an unsigned transaction record into typed values.
///
/// Metadata is accepted through `options` and bound first; the method is
/// decoded against it, numeric fields are parsed from their hex forms, and
/// the era encoding is checked against the mortality expectation, if one is
/// set.
pub fn decode_unsigned_tx(
    unsigned: &UnsignedTransaction,
    options: &TxOptions<'_>,
) -> Result<DecodedUnsignedTx, TxError> {
    let checked_metadata = CheckedMetadata::from_hex(
        options.metadata_rpc,
        options.calls_only,
        options.calls_filter.clone(),
    )?;

    let method_bytes = hex_to_bytes(&unsigned.method, "method")?;
    let mut position = 0;
    let method = decode_as_call(&method_bytes, &mut position, &checked_metadata)
        .map_err(TxError::Parsing)?;
    if position != method_bytes.len() {
        return Err(TxError::SomeDataNotUsedCall {
            from: position,
            to: method_bytes.len(),
        });
    }

    let era_bytes = hex_to_bytes(&unsigned.era, "era")?;
    let era = decode_era(&era_bytes, options.immortal_era)?;
    let era_period = match era {
        Era::Immortal => 0,
        Era::Mortal(period, _) => period,
    };

    Ok(DecodedUnsignedTx {
        address: unsigned.address.to_owned(),
        block_hash: h256_from_hex(&unsigned.block_hash, "blockHash")?,
        block_number: u32_from_be_hex(&unsigned.block_number, "blockNumber")?,
        era_period,
        genesis_hash: h256_from_hex(&unsigned.genesis_hash, "genesisHash")?,
        metadata_rpc: options.metadata_rpc.to_owned(),
        method,
        nonce: compact_from_hex::<u32>(&unsigned.nonce, "nonce")?,
        spec_version: u32_from_be_hex(&unsigned.spec_version, "specVersion")?,
        tip: compact_from_hex::<u128>(&unsigned.tip, "tip")?,
        transaction_version: u32_from_be_hex(&unsigned.transaction_version, "transactionVersion")?,
    })
}

/// Decode a signing payload.
///
/// Payload starts with compact length of the call data, the call itself
/// follows, then the extension values in metadata order: in-payload parts
/// first, additional-signed parts second. Spec version and genesis hash found
/// in the extensions are checked against the metadata used for decoding.
pub fn decode_signing_payload(
    signing_payload_hex: &str,
    checked_metadata: &CheckedMetadata,
) -> Result<DecodedSigningPayload, TxError> {
    let data = hex_to_bytes(signing_payload_hex, "signingPayload")?;
    let mut position = 0;
    let call_length = get_compact::<u32>(&data, &mut position)
        .map_err(|_| TxError::CutSignable)? as usize;
    let call_end = position + call_length;
    if call_end > data.len() {
        return Err(TxError::CutSignable);
    }

    let method = decode_as_call(&data[..call_end], &mut position, checked_metadata)
        .map_err(TxError::Parsing)?;
    if position != call_end {
        return Err(TxError::SomeDataNotUsedCall {
            from: position,
            to: call_end,
        });
    }

    let extensions = decode_extensions(&data, call_end, checked_metadata)?;
    let collected_ext = check_extensions(&extensions, &checked_metadata.version)?;

    let era = collected_ext.era.unwrap_or(Era::Immortal);
    let era_period = match era {
        Era::Immortal => 0,
        Era::Mortal(period, _) => period,
    };
    let genesis_hash = match collected_ext.genesis_hash {
        Some(a) => a,
        None => return Err(TxError::Extensions(ExtensionsError::NoGenesisHash)),
    };
    let spec_version = match collected_ext.spec_version_printed {
        Some(ref a) => a.to_owned(),
        None => return Err(TxError::Extensions(ExtensionsError::NoSpecVersion)),
    };

    Ok(DecodedSigningPayload {
        block_hash: collected_ext.block_hash,
        era,
        era_period,
        extensions,
        genesis_hash,
        method,
        nonce: collected_ext.nonce.unwrap_or(0),
        spec_version,
        tip: collected_ext.tip.unwrap_or(0),
        transaction_version: collected_ext.tx_version_printed,
    })
}

/// Decode a finished signed extrinsic.
///
/// Wire format: compact byte length, version byte with the signed bit set,
/// address, signature, extension in-payload values, call.
pub fn decode_signed_tx(
    tx_hex: &str,
    checked_metadata: &CheckedMetadata,
) -> Result<DecodedSignedTx, TxError> {
    let data = hex_to_bytes(tx_hex, "tx")?;
    let mut position = 0;
    let declared_length =
        get_compact::<u32>(&data, &mut position).map_err(TxError::Parsing)? as usize;
    if data.len() - position != declared_length {
        return Err(TxError::LengthMismatch {
            declared: declared_length,
            found: data.len() - position,
        });
    }

    let version_byte = match data.get(position) {
        Some(a) => *a,
        None => {
            return Err(TxError::Parsing(ParserError::DataTooShort {
                position,
                minimal_length: 1,
            }))
        }
    };
    position += 1;
    let version = checked_metadata.meta_v14.extrinsic.version;
    if version_byte & VERSION_MASK != version {
        return Err(TxError::VersionMismatch {
            version_byte,
            version,
        });
    }
    if version_byte & SIGNED_BIT == 0 {
        return Err(TxError::NotSigned);
    }

    let address = decode_extrinsic_type_param(
        "Address",
        &data,
        &mut position,
        checked_metadata,
    )?;
    let signature = decode_extrinsic_type_param(
        "Signature",
        &data,
        &mut position,
        checked_metadata,
    )?;

    let mut extra: Vec<ExtendedData> = Vec::new();
    for signed_extensions_metadata in checked_metadata.meta_v14.extrinsic.signed_extensions.iter()
    {
        extra.push(
            decode_with_type(
                signed_extensions_metadata.ty.id,
                &data,
                &mut position,
                checked_metadata,
                Propagated::from_ext_meta(signed_extensions_metadata),
            )
            .map_err(TxError::Parsing)?,
        )
    }

    let method = decode_as_call(&data, &mut position, checked_metadata)
        .map_err(TxError::Parsing)?;
    if position != data.len() {
        return Err(TxError::SomeDataNotUsedCall {
            from: position,
            to: data.len(),
        });
    }

    let collected_ext = CollectedExt::from_extensions(&extra)?;
    let era = collected_ext.era.unwrap_or(Era::Immortal);
    let era_period = match era {
        Era::Immortal => 0,
        Era::Mortal(period, _) => period,
    };

    Ok(DecodedSignedTx {
        address,
        era,
        era_period,
        extra,
        method,
        nonce: collected_ext.nonce.unwrap_or(0),
        signature,
        tip: collected_ext.tip.unwrap_or(0),
    })
}

/// Decode one of the extrinsic type parameters declared in metadata, by
/// parameter name.
fn decode_extrinsic_type_param(
    param_name: &'static str,
    data: &[u8],
    position: &mut usize,
    checked_metadata: &CheckedMetadata,
) -> Result<ExtendedData, TxError> {
    let extrinsic_ty_id = checked_metadata.meta_v14.extrinsic.ty.id;
    let extrinsic_ty = checked_metadata
        .meta_v14
        .types
        .resolve(extrinsic_ty_id)
        .ok_or(TxError::Registry(RegistryError::TypeNotResolved {
            id: extrinsic_ty_id,
        }))?;
    let param_ty_id = extrinsic_ty
        .type_params
        .iter()
        .find(|param| param.name == param_name)
        .and_then(|param| param.ty.as_ref())
        .map(|symbol| symbol.id)
        .ok_or(TxError::Registry(RegistryError::ExtrinsicParamMissing {
            param: param_name,
        }))?;
    decode_with_type(
        param_ty_id,
        data,
        position,
        checked_metadata,
        Propagated::new(),
    )
    .map_err(TxError::Parsing)
}

/// Decode era bytes, checking them against the mortality expectation if one
/// is set.
///
/// Immortal era is a single zero byte, mortal era is two bytes. Either way
/// all era bytes must be used up.
pub(crate) fn decode_era(
    era_bytes: &[u8],
    immortal_expected: Option<bool>,
) -> Result<Era, EraError> {
    let era = Era::decode(&mut &era_bytes[..]).map_err(|_| EraError::Undecodable)?;
    let used = match era {
        Era::Immortal => 1,
        Era::Mortal(_, _) => 2,
    };
    if era_bytes.len() != used {
        return Err(EraError::ExtraBytes);
    }
    match (immortal_expected, era) {
        (Some(true), Era::Mortal(_, _)) => Err(EraError::ExpectedImmortal {
            first_byte: era_bytes[0],
        }),
        (Some(false), Era::Immortal) => Err(EraError::ExpectedMortal),
        _ => Ok(era),
    }
}

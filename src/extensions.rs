//! Decode and check signable transaction extensions using `V14` metadata.
use sp_core::H256;
use sp_runtime::generic::Era;

use crate::cards::{ExtendedData, ParsedData};
use crate::decoding::decode_with_type;
use crate::error::{ExtensionsError, TxError};
use crate::metadata::CheckedMetadata;
use crate::propagated::Propagated;
use crate::special::SpecialtyUnsignedInteger;

/// Parse signable transaction extensions.
///
/// Data gets consumed. All input data past `position` is expected to be used
/// in parsing.
///
/// Extensions and their order are determined by `signed_extensions` in
/// [`ExtrinsicMetadata`](frame_metadata::v14::ExtrinsicMetadata).
///
/// Whole `signed_extensions` set is scanned first for types in `ty` field, and
/// then the second time, for types in `additional_signed` field.
pub fn decode_extensions(
    data: &[u8],
    mut position: usize,
    checked_metadata: &CheckedMetadata,
) -> Result<Vec<ExtendedData>, TxError> {
    let mut extensions: Vec<ExtendedData> = Vec::new();
    for signed_extensions_metadata in checked_metadata.meta_v14.extrinsic.signed_extensions.iter()
    {
        extensions.push(
            decode_with_type(
                signed_extensions_metadata.ty.id,
                data,
                &mut position,
                checked_metadata,
                Propagated::from_ext_meta(signed_extensions_metadata),
            )
            .map_err(TxError::Parsing)?,
        )
    }
    for signed_extensions_metadata in checked_metadata.meta_v14.extrinsic.signed_extensions.iter()
    {
        extensions.push(
            decode_with_type(
                signed_extensions_metadata.additional_signed.id,
                data,
                &mut position,
                checked_metadata,
                Propagated::from_ext_meta(signed_extensions_metadata),
            )
            .map_err(TxError::Parsing)?,
        )
    }
    if position != data.len() {
        return Err(TxError::SomeDataNotUsedExtensions { from: position });
    }
    Ok(extensions)
}

/// Collect and check the decoded extension set.
///
/// Extensions must include metadata spec version matching the one of the
/// metadata used for decoding, and chain genesis hash. If extensions also
/// include an immortal `Era`, the block hash must match the genesis hash.
pub fn check_extensions(
    extensions: &[ExtendedData],
    version: &str,
) -> Result<CollectedExt, TxError> {
    let collected_ext = CollectedExt::from_extensions(extensions)?;
    match collected_ext.spec_version_printed {
        Some(ref spec_version_found) => {
            if spec_version_found != version {
                return Err(TxError::WrongSpecVersion {
                    as_decoded: spec_version_found.to_owned(),
                    in_metadata: version.to_owned(),
                });
            }
        }
        None => return Err(TxError::Extensions(ExtensionsError::NoSpecVersion)),
    }
    let genesis_hash = match collected_ext.genesis_hash {
        Some(genesis_hash) => genesis_hash,
        None => return Err(TxError::Extensions(ExtensionsError::NoGenesisHash)),
    };
    if let Some(Era::Immortal) = collected_ext.era {
        if let Some(block_hash) = collected_ext.block_hash {
            if genesis_hash != block_hash {
                return Err(TxError::ImmortalHashMismatch);
            }
        }
    }
    Ok(collected_ext)
}

/// Values of interest gathered from decoded extensions.
pub struct CollectedExt {
    pub era: Option<Era>,
    pub genesis_hash: Option<H256>,
    pub block_hash: Option<H256>,
    pub spec_version_printed: Option<String>,
    pub tx_version_printed: Option<String>,
    pub nonce: Option<u128>,
    pub tip: Option<u128>,
}

impl CollectedExt {
    /// Gather values of interest from a decoded extension set.
    pub fn from_extensions(extensions: &[ExtendedData]) -> Result<Self, TxError> {
        let mut collected_ext = Self::new();
        for ext in extensions.iter() {
            // single-field structs are also checked
            if let ParsedData::Composite(ref field_data) = ext.data {
                if field_data.len() == 1 {
                    collected_ext.update(&field_data[0].data.data)?;
                }
            } else {
                collected_ext.update(&ext.data)?;
            }
        }
        Ok(collected_ext)
    }

    fn new() -> Self {
        Self {
            era: None,
            genesis_hash: None,
            block_hash: None,
            spec_version_printed: None,
            tx_version_printed: None,
            nonce: None,
            tip: None,
        }
    }

    fn update(&mut self, parsed_data: &ParsedData) -> Result<(), TxError> {
        match parsed_data {
            ParsedData::Era(era) => self.add_era(*era),
            ParsedData::GenesisHash(h) => self.add_genesis_hash(*h),
            ParsedData::BlockHash(h) => self.add_block_hash(*h),
            ParsedData::PrimitiveU8 { value, specialty } => {
                self.add_unsigned(*value as u128, *specialty)
            }
            ParsedData::PrimitiveU16 { value, specialty } => {
                self.add_unsigned(*value as u128, *specialty)
            }
            ParsedData::PrimitiveU32 { value, specialty } => {
                self.add_unsigned(*value as u128, *specialty)
            }
            ParsedData::PrimitiveU64 { value, specialty } => {
                self.add_unsigned(*value as u128, *specialty)
            }
            ParsedData::PrimitiveU128 { value, specialty } => {
                self.add_unsigned(*value, *specialty)
            }
            _ => Ok(()),
        }
    }

    fn add_era(&mut self, era: Era) -> Result<(), TxError> {
        if self.era.is_some() {
            Err(TxError::Extensions(ExtensionsError::EraTwice))
        } else {
            self.era = Some(era);
            Ok(())
        }
    }

    fn add_genesis_hash(&mut self, genesis_hash: H256) -> Result<(), TxError> {
        if self.genesis_hash.is_some() {
            Err(TxError::Extensions(ExtensionsError::GenesisHashTwice))
        } else {
            self.genesis_hash = Some(genesis_hash);
            Ok(())
        }
    }

    fn add_block_hash(&mut self, block_hash: H256) -> Result<(), TxError> {
        if self.block_hash.is_some() {
            Err(TxError::Extensions(ExtensionsError::BlockHashTwice))
        } else {
            self.block_hash = Some(block_hash);
            Ok(())
        }
    }

    fn add_unsigned(
        &mut self,
        value: u128,
        specialty: SpecialtyUnsignedInteger,
    ) -> Result<(), TxError> {
        match specialty {
            SpecialtyUnsignedInteger::SpecVersion => {
                if self.spec_version_printed.is_some() {
                    Err(TxError::Extensions(ExtensionsError::SpecVersionTwice))
                } else {
                    self.spec_version_printed = Some(value.to_string());
                    Ok(())
                }
            }
            SpecialtyUnsignedInteger::TxVersion => {
                if self.tx_version_printed.is_none() {
                    self.tx_version_printed = Some(value.to_string());
                }
                Ok(())
            }
            SpecialtyUnsignedInteger::Nonce => {
                if self.nonce.is_none() {
                    self.nonce = Some(value);
                }
                Ok(())
            }
            SpecialtyUnsignedInteger::Tip => {
                if self.tip.is_none() {
                    self.tip = Some(value);
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

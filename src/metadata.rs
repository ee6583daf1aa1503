//! Metadata loading and checking.
//!
//! The metadata blob is accepted once, as hex-encoded SCALE of
//! `RuntimeMetadataPrefixed`, and transformed into immutable
//! [`CheckedMetadata`] that every decode and construct operation borrows.
//! Spec version is determined here, from the `Version` constant of the
//! `System` pallet, and later gets compared with the spec version in signable
//! transaction extensions.
use frame_metadata::{
    v14::{PalletMetadata, RuntimeMetadataV14, StorageEntryType},
    RuntimeMetadata, RuntimeMetadataPrefixed, META_RESERVED,
};
use parity_scale_codec::Decode;
use scale_info::form::PortableForm;

use crate::cards::ParsedData;
use crate::decoding::decode_all_as_type;
use crate::error::{MetadataError, RegistryError};
use crate::special::SpecialtyUnsignedInteger;

/// Call identifier: pallet index byte and call index byte.
pub type CallIndex = [u8; 2];

/// Metadata with spec version and optional call restrictions, ready for use.
pub struct CheckedMetadata {
    /// Runtime metadata, possibly trimmed to calls-only.
    pub meta_v14: RuntimeMetadataV14,

    /// Metadata spec version, printed.
    pub version: String,

    /// If set, only the listed calls may be decoded or constructed.
    pub calls_filter: Option<Vec<CallIndex>>,
}

impl CheckedMetadata {
    /// Accept a hex-encoded metadata blob.
    ///
    /// With `calls_only` set, pallet sections other than calls are emptied,
    /// shrinking what the resulting value answers for. `calls_filter`
    /// restricts decodable and constructable calls to the listed
    /// pallet/call index pairs.
    pub fn from_hex(
        metadata_rpc: &str,
        calls_only: bool,
        calls_filter: Option<Vec<CallIndex>>,
    ) -> Result<Self, MetadataError> {
        let stripped = metadata_rpc
            .strip_prefix("0x")
            .unwrap_or(metadata_rpc);
        let meta_bytes = hex::decode(stripped).map_err(|_| MetadataError::NotHex)?;
        let meta_prefixed = RuntimeMetadataPrefixed::decode(&mut &meta_bytes[..])
            .map_err(|_| MetadataError::Undecodable)?;
        if meta_prefixed.0 != META_RESERVED {
            return Err(MetadataError::NotMeta);
        }
        let meta_v14 = match meta_prefixed.1 {
            RuntimeMetadata::V14(meta_v14) => meta_v14,
            _ => return Err(MetadataError::UnsupportedVersion),
        };
        let mut out = Self {
            meta_v14,
            version: String::new(),
            calls_filter,
        };
        out.version = out.find_spec_version()?;
        if calls_only {
            trim_to_calls(&mut out.meta_v14);
        }
        Ok(out)
    }

    /// Search metadata for `System` pallet and `Version` constant within it,
    /// decode `Version` constant and find the field with spec version
    /// content.
    fn find_spec_version(&self) -> Result<String, MetadataError> {
        let mut runtime_version_data_and_ty = None;
        let mut system_block = false;
        for pallet in self.meta_v14.pallets.iter() {
            if pallet.name == "System" {
                system_block = true;
                for constant in pallet.constants.iter() {
                    if constant.name == "Version" {
                        runtime_version_data_and_ty =
                            Some((constant.value.to_owned(), constant.ty))
                    }
                }
                break;
            }
        }
        if !system_block {
            return Err(MetadataError::NoSystemPallet);
        }
        let (value, ty) = runtime_version_data_and_ty.ok_or(MetadataError::NoVersionInConstants)?;
        let extended_data = decode_all_as_type(ty.id, &value, self)
            .map_err(|_| MetadataError::RuntimeVersionNotDecodable)?;
        if let ParsedData::Composite(fields) = extended_data.data {
            for field in fields.iter() {
                match field.data.data {
                    ParsedData::PrimitiveU8 {
                        value,
                        specialty: SpecialtyUnsignedInteger::SpecVersion,
                    } => return Ok(value.to_string()),
                    ParsedData::PrimitiveU16 {
                        value,
                        specialty: SpecialtyUnsignedInteger::SpecVersion,
                    } => return Ok(value.to_string()),
                    ParsedData::PrimitiveU32 {
                        value,
                        specialty: SpecialtyUnsignedInteger::SpecVersion,
                    } => return Ok(value.to_string()),
                    ParsedData::PrimitiveU64 {
                        value,
                        specialty: SpecialtyUnsignedInteger::SpecVersion,
                    } => return Ok(value.to_string()),
                    ParsedData::PrimitiveU128 {
                        value,
                        specialty: SpecialtyUnsignedInteger::SpecVersion,
                    } => return Ok(value.to_string()),
                    _ => (),
                }
            }
            Err(MetadataError::NoSpecVersionIdentifier)
        } else {
            Err(MetadataError::UnexpectedRuntimeVersionFormat)
        }
    }

    /// Pallet record by pallet index byte.
    pub fn pallet_by_index(
        &self,
        pallet_index: u8,
    ) -> Result<&PalletMetadata<PortableForm>, RegistryError> {
        self.meta_v14
            .pallets
            .iter()
            .find(|pallet| pallet.index == pallet_index)
            .ok_or(RegistryError::PalletNotFound {
                index: pallet_index,
            })
    }

    /// Pallet record by pallet name.
    pub fn pallet_by_name(
        &self,
        pallet_name: &str,
    ) -> Result<&PalletMetadata<PortableForm>, RegistryError> {
        self.meta_v14
            .pallets
            .iter()
            .find(|pallet| pallet.name == pallet_name)
            .ok_or_else(|| RegistryError::NoPalletWithName {
                pallet: pallet_name.to_string(),
            })
    }

    /// Check a call against the allow-list, if one was set.
    pub fn check_call_allowed(
        &self,
        pallet_index: u8,
        call_index: u8,
    ) -> Result<(), RegistryError> {
        match self.calls_filter {
            Some(ref filter) => {
                if filter.contains(&[pallet_index, call_index]) {
                    Ok(())
                } else {
                    Err(RegistryError::CallNotAllowed {
                        pallet_index,
                        call_index,
                    })
                }
            }
            None => Ok(()),
        }
    }

    /// Storage entry type for a named entry.
    ///
    /// Answers only if the metadata was not trimmed to calls-only.
    pub fn storage_entry_type(
        &self,
        pallet_name: &str,
        entry_name: &str,
    ) -> Result<&StorageEntryType<PortableForm>, RegistryError> {
        let pallet = self.pallet_by_name(pallet_name)?;
        let storage = pallet
            .storage
            .as_ref()
            .ok_or_else(|| RegistryError::NoStorageInPallet {
                pallet: pallet_name.to_string(),
            })?;
        storage
            .entries
            .iter()
            .find(|entry| entry.name == entry_name)
            .map(|entry| &entry.ty)
            .ok_or_else(|| RegistryError::StorageEntryNotFound {
                pallet: pallet_name.to_string(),
                entry: entry_name.to_string(),
            })
    }
}

/// Empty out pallet sections not needed for call decoding.
///
/// The shared type registry stays as is, so call decoding keeps working;
/// storage, event, constant and error lookups stop answering.
fn trim_to_calls(meta_v14: &mut RuntimeMetadataV14) {
    let trimmed_pallets = meta_v14
        .pallets
        .iter()
        .map(|pallet| PalletMetadata {
            name: pallet.name.to_owned(),
            storage: None,
            calls: pallet.calls.to_owned(),
            event: None,
            constants: Vec::new(),
            error: None,
            index: pallet.index,
        })
        .collect();
    meta_v14.pallets = trimmed_pallets;
}

//! Decode data using types from [`RuntimeMetadataV14`] type registry.
use bitvec::prelude::{BitVec, Lsb0, Msb0};
use num_bigint::{BigInt, BigUint};
use parity_scale_codec::{Decode, OptionBool};
use scale_info::{
    form::PortableForm, Field, TypeDef, TypeDefBitSequence, TypeDefPrimitive, Variant,
};
use sp_arithmetic::{PerU16, Perbill, Percent, Permill, Perquintill};
use sp_core::{H160, H512};

use crate::cards::{
    Call, Documented, ExtendedData, FieldData, Info, ParsedData, SequenceData, VariantData,
};
use crate::compacts::get_compact;
use crate::error::{ParserError, RegistryError};
use crate::metadata::CheckedMetadata;
use crate::propagated::{Checker, Propagated};
use crate::special::{
    special_case_account_id32, special_case_era, special_case_h256, CheckCompact, SpecialArray,
    SpecialtyTypeChecked, UnsignedInteger,
};

/// Decode data between `position` and the end as a single known type,
/// consuming all of it.
pub fn decode_all_as_type(
    ty_id: u32,
    data: &[u8],
    checked_metadata: &CheckedMetadata,
) -> Result<ExtendedData, ParserError> {
    let mut position = 0;
    let out = decode_with_type(ty_id, data, &mut position, checked_metadata, Propagated::new())?;
    if position != data.len() {
        Err(ParserError::SomeDataNotUsedBlob { from: position })
    } else {
        Ok(out)
    }
}

/// Decode data as a call, starting at `position`.
///
/// First comes the pallet index byte, the pallet record names the call enum
/// type, next byte picks the call variant, variant fields follow.
pub fn decode_as_call(
    data: &[u8],
    position: &mut usize,
    checked_metadata: &CheckedMetadata,
) -> Result<Call, ParserError> {
    let pallet_index = match data.get(*position) {
        Some(x) => *x,
        None => {
            return Err(ParserError::DataTooShort {
                position: *position,
                minimal_length: 1,
            })
        }
    };
    *position += 1;

    let pallet = checked_metadata.pallet_by_index(pallet_index)?;
    let calls_symbol = match pallet.calls {
        Some(ref calls) => calls.ty,
        None => {
            return Err(ParserError::Registry(RegistryError::NoCallsInPallet {
                pallet: pallet.name.to_owned(),
            }))
        }
    };
    let calls_in_pallet_type = checked_metadata
        .meta_v14
        .types
        .resolve(calls_symbol.id)
        .ok_or(RegistryError::TypeNotResolved {
            id: calls_symbol.id,
        })?;
    let pallet_info = Info::from_ty(calls_in_pallet_type);

    if let TypeDef::Variant(x) = &calls_in_pallet_type.type_def {
        let found_variant = pick_variant(&x.variants, data, *position)?;
        checked_metadata.check_call_allowed(pallet_index, found_variant.index)?;
        *position += 1;
        let fields = decode_fields(
            &found_variant.fields,
            data,
            position,
            checked_metadata,
            &Checker::new(),
        )?;
        Ok(Call {
            pallet_name: pallet.name.to_owned(),
            pallet_info,
            call_name: found_variant.name.to_owned(),
            call_docs: found_variant.collect_docs(),
            fields,
        })
    } else {
        Err(ParserError::Registry(RegistryError::NotACall {
            id: calls_symbol.id,
        }))
    }
}

/// Decode data at `position` as a type from the registry.
pub fn decode_with_type(
    ty_id: u32,
    data: &[u8],
    position: &mut usize,
    checked_metadata: &CheckedMetadata,
    mut propagated: Propagated,
) -> Result<ExtendedData, ParserError> {
    let ty = checked_metadata
        .meta_v14
        .types
        .resolve(ty_id)
        .ok_or(RegistryError::TypeNotResolved { id: ty_id })?;
    propagated.checker.check_id(ty_id)?;
    let info_ty = Info::from_ty(ty);
    propagated.add_info(&info_ty);
    match SpecialtyTypeChecked::from_type(ty, &checked_metadata.meta_v14) {
        SpecialtyTypeChecked::None => match &ty.type_def {
            TypeDef::Composite(x) => {
                let field_data_set = decode_fields(
                    &x.fields,
                    data,
                    position,
                    checked_metadata,
                    &propagated.checker,
                )?;
                Ok(ExtendedData {
                    info: propagated.info,
                    data: ParsedData::Composite(field_data_set),
                })
            }
            TypeDef::Variant(x) => {
                propagated.checker.reject_compact()?;
                let variant_data =
                    decode_variant(&x.variants, data, position, checked_metadata)?;
                Ok(ExtendedData {
                    info: propagated.info,
                    data: ParsedData::Variant(variant_data),
                })
            }
            TypeDef::Sequence(x) => {
                let number_of_elements = get_compact::<u32>(data, position)?;
                propagated.checker.drop_cycle_check();
                decode_elements_set(
                    x.type_param.id,
                    number_of_elements,
                    data,
                    position,
                    checked_metadata,
                    propagated,
                )
            }
            TypeDef::Array(x) => decode_elements_set(
                x.type_param.id,
                x.len,
                data,
                position,
                checked_metadata,
                propagated,
            ),
            TypeDef::Tuple(x) => {
                if x.fields.len() > 1 {
                    propagated.checker.reject_compact()?
                }
                let mut tuple_data_set: Vec<ExtendedData> = Vec::new();
                for inner_ty_symbol in x.fields.iter() {
                    let tuple_data_element = decode_with_type(
                        inner_ty_symbol.id,
                        data,
                        position,
                        checked_metadata,
                        Propagated::with_checker(propagated.checker.clone()),
                    )?;
                    tuple_data_set.push(tuple_data_element);
                }
                Ok(ExtendedData {
                    info: propagated.info,
                    data: ParsedData::Tuple(tuple_data_set),
                })
            }
            TypeDef::Primitive(x) => {
                let parsed_data = decode_type_def_primitive(x, data, position, &propagated)?;
                Ok(ExtendedData {
                    info: propagated.info,
                    data: parsed_data,
                })
            }
            TypeDef::Compact(x) => {
                propagated.checker.specialty_set.compact_at = Some(ty_id);
                decode_with_type(x.type_param.id, data, position, checked_metadata, propagated)
            }
            TypeDef::BitSequence(x) => Ok(ExtendedData {
                info: propagated.info,
                data: decode_type_def_bit_sequence(x, data, position, checked_metadata)?,
            }),
        },
        SpecialtyTypeChecked::AccountId32 => {
            propagated.checker.reject_compact()?;
            Ok(ExtendedData {
                info: propagated.info,
                data: special_case_account_id32(data, position)?,
            })
        }
        SpecialtyTypeChecked::Call => {
            propagated.checker.reject_compact()?;
            let call = decode_as_call(data, position, checked_metadata)?;
            Ok(ExtendedData {
                info: propagated.info,
                data: ParsedData::Call(call),
            })
        }
        SpecialtyTypeChecked::Era => {
            propagated.checker.reject_compact()?;
            Ok(ExtendedData {
                info: propagated.info,
                data: special_case_era(data, position)?,
            })
        }
        SpecialtyTypeChecked::H160 => {
            propagated.checker.reject_compact()?;
            Ok(ExtendedData {
                info: propagated.info,
                data: H160::cut_and_decode(data, position)?,
            })
        }
        SpecialtyTypeChecked::H256 => {
            propagated.checker.reject_compact()?;
            Ok(ExtendedData {
                info: propagated.info,
                data: special_case_h256(
                    data,
                    position,
                    propagated.checker.specialty_set.hint.hash256(),
                )?,
            })
        }
        SpecialtyTypeChecked::H512 => {
            propagated.checker.reject_compact()?;
            Ok(ExtendedData {
                info: propagated.info,
                data: H512::cut_and_decode(data, position)?,
            })
        }
        SpecialtyTypeChecked::Option(ty_symbol) => {
            propagated.checker.reject_compact()?;
            let param_ty = checked_metadata
                .meta_v14
                .types
                .resolve(ty_symbol.id)
                .ok_or(RegistryError::TypeNotResolved { id: ty_symbol.id })?;
            match &param_ty.type_def {
                TypeDef::Primitive(TypeDefPrimitive::Bool) => match data.get(*position) {
                    Some(a) => {
                        let parsed_data = match OptionBool::decode(&mut [*a].as_slice()) {
                            Ok(OptionBool(Some(true))) => {
                                ParsedData::Option(Some(Box::new(ParsedData::PrimitiveBool(true))))
                            }
                            Ok(OptionBool(Some(false))) => {
                                ParsedData::Option(Some(Box::new(ParsedData::PrimitiveBool(false))))
                            }
                            Ok(OptionBool(None)) => ParsedData::Option(None),
                            Err(_) => {
                                return Err(ParserError::UnexpectedOptionVariant {
                                    position: *position,
                                })
                            }
                        };
                        *position += 1;
                        Ok(ExtendedData {
                            info: propagated.info,
                            data: parsed_data,
                        })
                    }
                    None => Err(ParserError::DataTooShort {
                        position: *position,
                        minimal_length: 1,
                    }),
                },
                _ => match data.get(*position) {
                    Some(0) => {
                        *position += 1;
                        Ok(ExtendedData {
                            info: propagated.info,
                            data: ParsedData::Option(None),
                        })
                    }
                    Some(1) => {
                        *position += 1;
                        let extended_option_data = decode_with_type(
                            ty_symbol.id,
                            data,
                            position,
                            checked_metadata,
                            Propagated::new(),
                        )?;
                        propagated.add_info_slice(&extended_option_data.info);
                        Ok(ExtendedData {
                            info: propagated.info,
                            data: ParsedData::Option(Some(Box::new(extended_option_data.data))),
                        })
                    }
                    Some(_) => Err(ParserError::UnexpectedOptionVariant {
                        position: *position,
                    }),
                    None => Err(ParserError::DataTooShort {
                        position: *position,
                        minimal_length: 1,
                    }),
                },
            }
        }
        SpecialtyTypeChecked::Perbill => Ok(ExtendedData {
            info: propagated.info,
            data: Perbill::parse_check_compact(
                data,
                position,
                propagated.checker.specialty_set.compact_at,
            )?,
        }),
        SpecialtyTypeChecked::Percent => Ok(ExtendedData {
            info: propagated.info,
            data: Percent::parse_check_compact(
                data,
                position,
                propagated.checker.specialty_set.compact_at,
            )?,
        }),
        SpecialtyTypeChecked::Permill => Ok(ExtendedData {
            info: propagated.info,
            data: Permill::parse_check_compact(
                data,
                position,
                propagated.checker.specialty_set.compact_at,
            )?,
        }),
        SpecialtyTypeChecked::Perquintill => Ok(ExtendedData {
            info: propagated.info,
            data: Perquintill::parse_check_compact(
                data,
                position,
                propagated.checker.specialty_set.compact_at,
            )?,
        }),
        SpecialtyTypeChecked::PerU16 => Ok(ExtendedData {
            info: propagated.info,
            data: PerU16::parse_check_compact(
                data,
                position,
                propagated.checker.specialty_set.compact_at,
            )?,
        }),
    }
}

fn decode_type_def_primitive(
    found_ty: &TypeDefPrimitive,
    data: &[u8],
    position: &mut usize,
    propagated: &Propagated,
) -> Result<ParsedData, ParserError> {
    let specialty_set = propagated.checker.specialty_set;
    let compact_at = specialty_set.compact_at;
    match found_ty {
        TypeDefPrimitive::Bool => bool::parse_check_compact(data, position, compact_at),
        TypeDefPrimitive::Char => char::parse_check_compact(data, position, compact_at),
        TypeDefPrimitive::Str => {
            propagated.checker.reject_compact()?;
            decode_str(data, position)
        }
        TypeDefPrimitive::U8 => u8::parse_unsigned_integer(data, position, specialty_set),
        TypeDefPrimitive::U16 => u16::parse_unsigned_integer(data, position, specialty_set),
        TypeDefPrimitive::U32 => u32::parse_unsigned_integer(data, position, specialty_set),
        TypeDefPrimitive::U64 => u64::parse_unsigned_integer(data, position, specialty_set),
        TypeDefPrimitive::U128 => u128::parse_unsigned_integer(data, position, specialty_set),
        TypeDefPrimitive::U256 => BigUint::parse_check_compact(data, position, compact_at),
        TypeDefPrimitive::I8 => i8::parse_check_compact(data, position, compact_at),
        TypeDefPrimitive::I16 => i16::parse_check_compact(data, position, compact_at),
        TypeDefPrimitive::I32 => i32::parse_check_compact(data, position, compact_at),
        TypeDefPrimitive::I64 => i64::parse_check_compact(data, position, compact_at),
        TypeDefPrimitive::I128 => i128::parse_check_compact(data, position, compact_at),
        TypeDefPrimitive::I256 => BigInt::parse_check_compact(data, position, compact_at),
    }
}

/// Decode `str`: a compact length followed by utf8 bytes.
fn decode_str(data: &[u8], position: &mut usize) -> Result<ParsedData, ParserError> {
    let str_length = get_compact::<u32>(data, position)? as usize;
    match data.get(*position..*position + str_length) {
        Some(a) => {
            let text = String::from_utf8(a.to_vec()).map_err(|_| ParserError::TypeFailure {
                position: *position,
                ty: "str",
            })?;
            *position += str_length;
            Ok(ParsedData::Text(text))
        }
        None => Err(ParserError::DataTooShort {
            position: *position,
            minimal_length: str_length,
        }),
    }
}

pub fn decode_fields(
    fields: &[Field<PortableForm>],
    data: &[u8],
    position: &mut usize,
    checked_metadata: &CheckedMetadata,
    checker: &Checker,
) -> Result<Vec<FieldData>, ParserError> {
    if fields.len() > 1 {
        checker.reject_compact()?;
    }
    let mut out: Vec<FieldData> = Vec::new();
    for field in fields.iter() {
        let this_field_data = decode_with_type(
            field.ty.id,
            data,
            position,
            checked_metadata,
            Propagated::for_field(checker, field),
        )?;
        out.push(FieldData {
            field_name: field.name.to_owned(),
            type_name: field.type_name.to_owned(),
            field_docs: field.collect_docs(),
            data: this_field_data,
        })
    }
    Ok(out)
}

fn decode_elements_set(
    element_ty_id: u32,
    number_of_elements: u32,
    data: &[u8],
    position: &mut usize,
    checked_metadata: &CheckedMetadata,
    propagated: Propagated,
) -> Result<ExtendedData, ParserError> {
    propagated.checker.reject_compact()?;
    let element_ty = checked_metadata
        .meta_v14
        .types
        .resolve(element_ty_id)
        .ok_or(RegistryError::TypeNotResolved { id: element_ty_id })?;

    // `Vec<u8>` and `[u8; N]` stay as byte blobs
    if matches!(element_ty.type_def, TypeDef::Primitive(TypeDefPrimitive::U8))
        && element_ty.path.ident().is_none()
    {
        let length = number_of_elements as usize;
        return match data.get(*position..*position + length) {
            Some(a) => {
                let out = a.to_vec();
                *position += length;
                Ok(ExtendedData {
                    info: propagated.info,
                    data: ParsedData::SequenceU8(out),
                })
            }
            None => Err(ParserError::DataTooShort {
                position: *position,
                minimal_length: length,
            }),
        };
    }

    let element_type_info = Info::from_ty(element_ty);
    let element_info = {
        if element_type_info.is_empty() {
            Vec::new()
        } else {
            vec![element_type_info]
        }
    };
    let mut elements: Vec<ParsedData> = Vec::new();
    for _i in 0..number_of_elements {
        let element_extended_data = decode_with_type(
            element_ty_id,
            data,
            position,
            checked_metadata,
            Propagated::with_checker(propagated.checker.clone()),
        )?;
        elements.push(element_extended_data.data);
    }
    Ok(ExtendedData {
        info: propagated.info,
        data: ParsedData::Sequence(SequenceData {
            element_info,
            data: elements,
        }),
    })
}

pub(crate) fn pick_variant<'a>(
    variants: &'a [Variant<PortableForm>],
    data: &[u8],
    position: usize,
) -> Result<&'a Variant<PortableForm>, ParserError> {
    let enum_index = match data.get(position) {
        Some(x) => *x,
        None => {
            return Err(ParserError::DataTooShort {
                position,
                minimal_length: 1,
            })
        }
    };

    let mut found_variant = None;
    for x in variants.iter() {
        if x.index == enum_index {
            found_variant = Some(x);
            break;
        }
    }
    match found_variant {
        Some(a) => Ok(a),
        None => Err(ParserError::UnexpectedEnumVariant { position }),
    }
}

fn decode_variant(
    variants: &[Variant<PortableForm>],
    data: &[u8],
    position: &mut usize,
    checked_metadata: &CheckedMetadata,
) -> Result<VariantData, ParserError> {
    let found_variant = pick_variant(variants, data, *position)?;
    *position += 1;
    let fields = decode_fields(
        &found_variant.fields,
        data,
        position,
        checked_metadata,
        &Checker::new(),
    )?;

    Ok(VariantData {
        variant_name: found_variant.name.to_owned(),
        variant_docs: found_variant.collect_docs(),
        fields,
    })
}

enum FoundBitOrder {
    Lsb0,
    Msb0,
}

const LSB0: &str = "Lsb0";
const MSB0: &str = "Msb0";

fn decode_type_def_bit_sequence(
    bit_ty: &TypeDefBitSequence<PortableForm>,
    data: &[u8],
    position: &mut usize,
    checked_metadata: &CheckedMetadata,
) -> Result<ParsedData, ParserError> {
    let compact_start = *position;
    let bit_length = get_compact::<u32>(data, position)?;
    let byte_length = match bit_length % 8 {
        0 => bit_length / 8,
        _ => (bit_length / 8) + 1,
    } as usize;

    // compact prefix stays in the slice, `BitVec::decode` expects it
    let into_decode = match data.get(compact_start..*position + byte_length) {
        Some(a) => a,
        None => {
            return Err(ParserError::DataTooShort {
                position: *position,
                minimal_length: byte_length,
            })
        }
    };
    *position += byte_length;

    let bitorder_ty_id = bit_ty.bit_order_type.id;
    let bitorder_ty = checked_metadata
        .meta_v14
        .types
        .resolve(bitorder_ty_id)
        .ok_or(RegistryError::TypeNotResolved { id: bitorder_ty_id })?;
    let bitorder = match &bitorder_ty.type_def {
        TypeDef::Composite(_) => match bitorder_ty.path.ident() {
            Some(x) => match x.as_str() {
                LSB0 => FoundBitOrder::Lsb0,
                MSB0 => FoundBitOrder::Msb0,
                _ => return Err(ParserError::NotBitOrderType { id: bitorder_ty_id }),
            },
            None => return Err(ParserError::NotBitOrderType { id: bitorder_ty_id }),
        },
        _ => return Err(ParserError::NotBitOrderType { id: bitorder_ty_id }),
    };

    let bitstore_ty_id = bit_ty.bit_store_type.id;
    let bitstore_ty = checked_metadata
        .meta_v14
        .types
        .resolve(bitstore_ty_id)
        .ok_or(RegistryError::TypeNotResolved { id: bitstore_ty_id })?;

    match &bitstore_ty.type_def {
        TypeDef::Primitive(TypeDefPrimitive::U8) => match bitorder {
            FoundBitOrder::Lsb0 => {
                <BitVec<u8, Lsb0>>::decode(&mut &into_decode[..]).map(ParsedData::BitVecU8Lsb0)
            }
            FoundBitOrder::Msb0 => {
                <BitVec<u8, Msb0>>::decode(&mut &into_decode[..]).map(ParsedData::BitVecU8Msb0)
            }
        },
        TypeDef::Primitive(TypeDefPrimitive::U16) => match bitorder {
            FoundBitOrder::Lsb0 => {
                <BitVec<u16, Lsb0>>::decode(&mut &into_decode[..]).map(ParsedData::BitVecU16Lsb0)
            }
            FoundBitOrder::Msb0 => {
                <BitVec<u16, Msb0>>::decode(&mut &into_decode[..]).map(ParsedData::BitVecU16Msb0)
            }
        },
        TypeDef::Primitive(TypeDefPrimitive::U32) => match bitorder {
            FoundBitOrder::Lsb0 => {
                <BitVec<u32, Lsb0>>::decode(&mut &into_decode[..]).map(ParsedData::BitVecU32Lsb0)
            }
            FoundBitOrder::Msb0 => {
                <BitVec<u32, Msb0>>::decode(&mut &into_decode[..]).map(ParsedData::BitVecU32Msb0)
            }
        },
        TypeDef::Primitive(TypeDefPrimitive::U64) => match bitorder {
            FoundBitOrder::Lsb0 => {
                <BitVec<u64, Lsb0>>::decode(&mut &into_decode[..]).map(ParsedData::BitVecU64Lsb0)
            }
            FoundBitOrder::Msb0 => {
                <BitVec<u64, Msb0>>::decode(&mut &into_decode[..]).map(ParsedData::BitVecU64Msb0)
            }
        },
        _ => return Err(ParserError::NotBitStoreType { id: bitstore_ty_id }),
    }
    .map_err(|_| ParserError::BitVecFailure {
        position: compact_start,
    })
}

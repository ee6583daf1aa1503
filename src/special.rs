//! Special decoding triggers and special-case decoders.
//!
//! [`RuntimeMetadataV14`] has all sufficient data to decode the data for a
//! known type, but some types must be treated specially: either decoded
//! directly as the well-known custom type the metadata descriptors mention,
//! or marked for further handling (balances, nonce, spec version).
use frame_metadata::v14::RuntimeMetadataV14;
use num_bigint::{BigInt, BigUint};
use parity_scale_codec::{Decode, HasCompact};
use scale_info::{form::PortableForm, interner::UntrackedSymbol, Field, Path, Type, TypeDef};
use sp_arithmetic::{PerU16, Perbill, Percent, Permill, Perquintill};
use sp_core::{crypto::AccountId32, H160, H256, H512};
use sp_runtime::generic::Era;
use std::{convert::TryInto, mem::size_of};

use crate::cards::ParsedData;
use crate::compacts::get_compact;
use crate::error::ParserError;
use crate::propagated::SpecialtySet;

/// [`Field`] `type_name` set indicating that the value *may* be
/// currency-related.
///
/// If the value is unsigned integer, it will be considered currency.
pub const BALANCE_ID_SET: &[&str] = &[
    "Balance",
    "BalanceOf<T>",
    "BalanceOf<T, I>",
    "DepositBalance",
    "ExtendedBalance",
    "PalletBalanceOf<T>",
    "T::Balance",
];

/// [`Field`] `name` set indicating the value *may* be nonce.
pub const NONCE_ID_SET: &[&str] = &["nonce"];

/// [`Field`] `name` set indicating the value *may* be spec version.
pub const SPEC_VERSION_ID_SET: &[&str] = &["spec_version"];

/// [`Field`] `name` set indicating the value *may* be transaction version.
pub const TX_VERSION_ID_SET: &[&str] = &["transaction_version"];

/// [`Type`]-associated [`Path`] `ident` for [sp_core::crypto::AccountId32].
pub const ACCOUNT_ID32: &str = "AccountId32";

/// [`Type`]-associated [`Path`] `ident` set indicating that the data to
/// follow *may* be a call.
///
/// Newer chains name the outer call enum `RuntimeCall`, pallet-level call
/// enums and older outer enums are plain `Call`.
pub const CALL_SET: &[&str] = &["Call", "RuntimeCall"];

/// [`Type`]-associated [`Path`] `ident` for [sp_runtime::generic::Era].
pub const ERA: &str = "Era";

/// [`Type`]-associated [`Path`] `ident` set for [sp_core::H160].
pub const H160_SET: &[&str] = &["AccountId20", "H160"];

/// [`Type`]-associated [`Path`] `ident` for [sp_core::H256].
pub const H256_ID: &str = "H256";

/// [`Type`]-associated [`Path`] `ident` for [sp_core::H512].
pub const H512_ID: &str = "H512";

/// [`Type`]-associated [`Path`] `ident` indicating that the data to follow
/// *may* be an option.
pub const OPTION: &str = "Option";

/// [`Type`]-associated [`Path`] `ident` for [sp_arithmetic::Perbill].
pub const PERBILL: &str = "Perbill";

/// [`Type`]-associated [`Path`] `ident` for [sp_arithmetic::Percent].
pub const PERCENT: &str = "Percent";

/// [`Type`]-associated [`Path`] `ident` for [sp_arithmetic::Permill].
pub const PERMILL: &str = "Permill";

/// [`Type`]-associated [`Path`] `ident` for [sp_arithmetic::Perquintill].
pub const PERQUINTILL: &str = "Perquintill";

/// [`Type`]-associated [`Path`] `ident` for [sp_arithmetic::PerU16].
pub const PERU16: &str = "PerU16";

/// [`Variant`] name `None` that must be found for type to be processed as
/// `Option`.
pub const NONE: &str = "None";

/// [`Variant`] name `Some` that must be found for type to be processed as
/// `Option`.
pub const SOME: &str = "Some";

/// Extension `identifier` for metadata spec version.
///
/// If underlying value is unsigned integer, it will be considered spec
/// version. Apparently established `identifier` across different chains.
pub const CHECK_SPEC_VERSION: &str = "CheckSpecVersion";

/// Extension `identifier` for tx version.
pub const CHECK_TX_VERSION: &str = "CheckTxVersion";

/// Extension `identifier` for chain genesis hash.
///
/// If underlying value is `H256`, it will be considered genesis hash.
pub const CHECK_GENESIS: &str = "CheckGenesis";

/// Extension `identifier` for era in payload and block hash in
/// additional-signed data.
///
/// `Era` itself gets detected by matching [`Path`] of the corresponding
/// [`Type`] with [`ERA`].
pub const CHECK_MORTALITY: &str = "CheckMortality";

/// Extension `identifier` for nonce.
pub const CHECK_NONCE: &str = "CheckNonce";

/// Extension `identifier` for transaction tip.
pub const CHARGE_TRANSACTION_PAYMENT: &str = "ChargeTransactionPayment";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SpecialtyUnsignedInteger {
    None,
    Balance,
    Tip,
    Nonce,
    SpecVersion,
    TxVersion,
}

impl SpecialtyUnsignedInteger {
    /// Card name for `show()`, with the primitive name as fallback.
    pub(crate) fn card_name(&self, default: &'static str) -> &'static str {
        match &self {
            SpecialtyUnsignedInteger::None => default,
            SpecialtyUnsignedInteger::Balance => "balance",
            SpecialtyUnsignedInteger::Tip => "tip",
            SpecialtyUnsignedInteger::Nonce => "nonce",
            SpecialtyUnsignedInteger::SpecVersion => "spec_version",
            SpecialtyUnsignedInteger::TxVersion => "tx_version",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SpecialtyH256 {
    None,
    GenesisHash,
    BlockHash,
}

/// Specialty hint, propagated while resolving types until it reaches a value
/// it is compatible with.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Hint {
    None,
    CheckSpecVersion,
    CheckTxVersion,
    CheckGenesis,
    CheckMortality,
    CheckNonce,
    ChargeTransactionPayment,
    FieldBalance,
    FieldNonce,
    FieldSpecVersion,
    FieldTxVersion,
}

impl Hint {
    pub fn from_field(field: &Field<PortableForm>) -> Self {
        let mut out = match field.name {
            Some(ref name) => match name.as_str() {
                a if NONCE_ID_SET.contains(&a) => Self::FieldNonce,
                a if SPEC_VERSION_ID_SET.contains(&a) => Self::FieldSpecVersion,
                a if TX_VERSION_ID_SET.contains(&a) => Self::FieldTxVersion,
                _ => Self::None,
            },
            None => Self::None,
        };
        if let Self::None = out {
            if let Some(ref type_name) = field.type_name {
                out = match type_name.as_str() {
                    a if BALANCE_ID_SET.contains(&a) => Self::FieldBalance,
                    _ => Self::None,
                };
            }
        }
        out
    }

    pub fn from_ext_identifier(identifier: &str) -> Self {
        match identifier {
            CHECK_SPEC_VERSION => Self::CheckSpecVersion,
            CHECK_TX_VERSION => Self::CheckTxVersion,
            CHECK_GENESIS => Self::CheckGenesis,
            CHECK_MORTALITY => Self::CheckMortality,
            CHECK_NONCE => Self::CheckNonce,
            CHARGE_TRANSACTION_PAYMENT => Self::ChargeTransactionPayment,
            _ => Self::None,
        }
    }

    /// Propagated [`Hint`] has reached unsigned integer decoding.
    pub fn unsigned_integer(&self) -> SpecialtyUnsignedInteger {
        match &self {
            Hint::CheckSpecVersion | Hint::FieldSpecVersion => SpecialtyUnsignedInteger::SpecVersion,
            Hint::CheckTxVersion | Hint::FieldTxVersion => SpecialtyUnsignedInteger::TxVersion,
            Hint::CheckNonce | Hint::FieldNonce => SpecialtyUnsignedInteger::Nonce,
            Hint::ChargeTransactionPayment => SpecialtyUnsignedInteger::Tip,
            Hint::FieldBalance => SpecialtyUnsignedInteger::Balance,
            _ => SpecialtyUnsignedInteger::None,
        }
    }

    /// Propagated [`Hint`] has reached `H256` decoding.
    pub fn hash256(&self) -> SpecialtyH256 {
        match &self {
            Hint::CheckGenesis => SpecialtyH256::GenesisHash,
            Hint::CheckMortality => SpecialtyH256::BlockHash,
            _ => SpecialtyH256::None,
        }
    }
}

/// Specialty found from `path` of the [`Type`].
///
/// Becomes other than `None` if a [`Type`] has recognizable `ident` component
/// of the [`Path`]. If found, **tries** sending decoding through a special
/// decoding route. Gets checked each time a new type is encountered.
pub enum SpecialtyTypeHinted {
    None,
    Call,
    Option,
}

impl SpecialtyTypeHinted {
    pub fn from_path(path: &Path<PortableForm>) -> Self {
        match path.ident() {
            Some(a) => match a.as_str() {
                a if CALL_SET.contains(&a) => Self::Call,
                OPTION => Self::Option,
                _ => Self::None,
            },
            None => Self::None,
        }
    }
}

pub enum SpecialtyTypeChecked<'a> {
    None,
    AccountId32,
    Call,
    Era,
    H160,
    H256,
    H512,
    Option(&'a UntrackedSymbol<std::any::TypeId>),
    Perbill,
    Percent,
    Permill,
    Perquintill,
    PerU16,
}

impl<'a> SpecialtyTypeChecked<'a> {
    pub fn from_type(ty: &'a Type<PortableForm>, meta_v14: &'a RuntimeMetadataV14) -> Self {
        let path = &ty.path;
        match SpecialtyTypeHinted::from_path(path) {
            SpecialtyTypeHinted::Option => {
                if let TypeDef::Variant(x) = &ty.type_def {
                    let params = &ty.type_params;
                    if params.len() == 1 {
                        if let Some(ref ty_symbol) = params[0].ty {
                            let mut has_none = false;
                            let mut has_some = false;
                            for variant in x.variants.iter() {
                                if variant.index == 0 && variant.name == NONE {
                                    has_none = true
                                }
                                if variant.index == 1 && variant.name == SOME {
                                    has_some = true
                                }
                            }
                            if has_none && has_some && (x.variants.len() == 2) {
                                Self::Option(ty_symbol)
                            } else {
                                Self::None
                            }
                        } else {
                            Self::None
                        }
                    } else {
                        Self::None
                    }
                } else {
                    Self::None
                }
            }
            SpecialtyTypeHinted::Call => {
                // a call enum has variants mapping into the pallet call
                // enums registered in metadata pallets
                if is_call_enum(ty, meta_v14) {
                    Self::Call
                } else {
                    Self::None
                }
            }
            SpecialtyTypeHinted::None => match path.ident() {
                Some(a) => match a.as_str() {
                    ACCOUNT_ID32 => Self::AccountId32,
                    ERA => Self::Era,
                    a if H160_SET.contains(&a) => Self::H160,
                    H256_ID => Self::H256,
                    H512_ID => Self::H512,
                    PERBILL => Self::Perbill,
                    PERCENT => Self::Percent,
                    PERMILL => Self::Permill,
                    PERQUINTILL => Self::Perquintill,
                    PERU16 => Self::PerU16,
                    _ => Self::None,
                },
                None => Self::None,
            },
        }
    }
}

/// Check that a `Call`-named type is the outer call enum: a variant type with
/// each variant wrapping a pallet call enum, itself a variant type with
/// `Call` path ident.
fn is_call_enum(ty: &Type<PortableForm>, meta_v14: &RuntimeMetadataV14) -> bool {
    if let TypeDef::Variant(x) = &ty.type_def {
        for variant in x.variants.iter() {
            if variant.fields.len() != 1 {
                return false;
            }
            match meta_v14.types.resolve(variant.fields[0].ty.id) {
                Some(inner_ty) => {
                    if !matches!(
                        SpecialtyTypeHinted::from_path(&inner_ty.path),
                        SpecialtyTypeHinted::Call
                    ) {
                        return false;
                    }
                }
                None => return false,
            }
        }
        !x.variants.is_empty()
    } else {
        false
    }
}

pub(crate) trait StLen: Sized {
    fn decode_value(data: &[u8], position: &mut usize) -> Result<Self, ParserError>;
}

macro_rules! impl_stable_length_decodable {
    ($($ty: ty), *) => {
        $(
            impl StLen for $ty {
                fn decode_value(data: &[u8], position: &mut usize) -> Result<Self, ParserError> {
                    let length = size_of::<Self>();
                    match data.get(*position..*position + length) {
                        Some(slice_to_decode) => {
                            let out = <Self>::decode(&mut &slice_to_decode[..])
                                .map_err(|_| ParserError::TypeFailure { position: *position, ty: stringify!($ty) })?;
                            *position += length;
                            Ok(out)
                        },
                        None => Err(ParserError::DataTooShort { position: *position, minimal_length: length })
                    }
                }
            }
        )*
    }
}

impl_stable_length_decodable!(
    bool,
    i8,
    i16,
    i32,
    i64,
    i128,
    u8,
    u16,
    u32,
    u64,
    u128,
    PerU16,
    Percent,
    Permill,
    Perbill,
    Perquintill
);

macro_rules! impl_stable_length_big {
    ($($big: ty, $get: ident), *) => {
        $(
            impl StLen for $big {
                fn decode_value(data: &[u8], position: &mut usize) -> Result<Self, ParserError> {
                    match data.get(*position..*position + 32) {
                        Some(slice_to_big256) => {
                            let out = Self::$get(slice_to_big256);
                            *position += 32;
                            Ok(out)
                        },
                        None => Err(ParserError::DataTooShort { position: *position, minimal_length: 32 }),
                    }
                }
            }
        )*
    }
}

impl_stable_length_big!(BigUint, from_bytes_le);
impl_stable_length_big!(BigInt, from_signed_bytes_le);

impl StLen for char {
    fn decode_value(data: &[u8], position: &mut usize) -> Result<Self, ParserError> {
        match data.get(*position..*position + 4) {
            Some(slice_to_char) => match char::from_u32(<u32>::from_le_bytes(
                slice_to_char
                    .try_into()
                    .expect("constant length, always fits"),
            )) {
                Some(ch) => {
                    *position += 4;
                    Ok(ch)
                }
                None => Err(ParserError::TypeFailure {
                    position: *position,
                    ty: "char",
                }),
            },
            None => Err(ParserError::DataTooShort {
                position: *position,
                minimal_length: 4,
            }),
        }
    }
}

pub(crate) trait UnsignedInteger: StLen + HasCompact {
    fn parse_unsigned_integer(
        data: &[u8],
        position: &mut usize,
        specialty_set: SpecialtySet,
    ) -> Result<ParsedData, ParserError>;
}

macro_rules! impl_unsigned_integer {
    ($($ty: ty, $enum_variant: ident), *) => {
        $(
            impl UnsignedInteger for $ty {
                fn parse_unsigned_integer(data: &[u8], position: &mut usize, specialty_set: SpecialtySet) -> Result<ParsedData, ParserError> {
                    let value = {
                        if specialty_set.compact_at.is_some() {get_compact::<Self>(data, position)?}
                        else {<Self>::decode_value(data, position)?}
                    };
                    Ok(ParsedData::$enum_variant{value, specialty: specialty_set.hint.unsigned_integer()})
                }
            }
        )*
    }
}

impl_unsigned_integer!(u8, PrimitiveU8);
impl_unsigned_integer!(u16, PrimitiveU16);
impl_unsigned_integer!(u32, PrimitiveU32);
impl_unsigned_integer!(u64, PrimitiveU64);
impl_unsigned_integer!(u128, PrimitiveU128);

pub(crate) trait CheckCompact: StLen {
    fn parse_check_compact(
        data: &[u8],
        position: &mut usize,
        compact_at: Option<u32>,
    ) -> Result<ParsedData, ParserError>;
}

macro_rules! impl_allow_compact {
    ($($perthing: ident), *) => {
        $(
            impl CheckCompact for $perthing where $perthing: HasCompact {
                fn parse_check_compact(data: &[u8], position: &mut usize, compact_at: Option<u32>) -> Result<ParsedData, ParserError> {
                    let value = {
                        if compact_at.is_some() {get_compact::<Self>(data, position)?}
                        else {<Self>::decode_value(data, position)?}
                    };
                    Ok(ParsedData::$perthing(value))
                }
            }
        )*
    }
}

impl_allow_compact!(PerU16, Percent, Permill, Perbill, Perquintill);

macro_rules! impl_block_compact {
    ($($ty: ty, $enum_variant: ident), *) => {
        $(
            impl CheckCompact for $ty {
                fn parse_check_compact(data: &[u8], position: &mut usize, compact_at: Option<u32>) -> Result<ParsedData, ParserError> {
                    let value = match compact_at {
                        Some(id) => return Err(ParserError::UnexpectedCompactInsides { id }),
                        None => <Self>::decode_value(data, position)?,
                    };
                    Ok(ParsedData::$enum_variant(value))
                }
            }
        )*
    }
}

impl_block_compact!(bool, PrimitiveBool);
impl_block_compact!(char, PrimitiveChar);
impl_block_compact!(i8, PrimitiveI8);
impl_block_compact!(i16, PrimitiveI16);
impl_block_compact!(i32, PrimitiveI32);
impl_block_compact!(i64, PrimitiveI64);
impl_block_compact!(i128, PrimitiveI128);
impl_block_compact!(BigInt, PrimitiveI256);
impl_block_compact!(BigUint, PrimitiveU256);

pub(crate) fn special_case_account_id32(
    data: &[u8],
    position: &mut usize,
) -> Result<ParsedData, ParserError> {
    match data.get(*position..*position + 32) {
        Some(a) => {
            let array_decoded: [u8; 32] = a.try_into().expect("constant length, always fits");
            *position += 32;
            Ok(ParsedData::Id(AccountId32::new(array_decoded)))
        }
        None => Err(ParserError::DataTooShort {
            position: *position,
            minimal_length: 32,
        }),
    }
}

pub(crate) trait SpecialArray {
    fn cut_and_decode(data: &[u8], position: &mut usize) -> Result<ParsedData, ParserError>;
}

macro_rules! impl_special_array_h {
    ($($hash: ident), *) => {
        $(
            impl SpecialArray for $hash {
                fn cut_and_decode(data: &[u8], position: &mut usize) -> Result<ParsedData, ParserError> {
                    let length = <$hash>::len_bytes();
                    match data.get(*position..*position + length) {
                        Some(slice) => {
                            let out_data = $hash(slice.try_into().expect("fixed checked length, always fits"));
                            *position += length;
                            Ok(ParsedData::$hash(out_data))
                        },
                        None => Err(ParserError::DataTooShort { position: *position, minimal_length: length })
                    }
                }
            }
        )*
    }
}

impl_special_array_h!(H160, H512);

pub(crate) fn special_case_h256(
    data: &[u8],
    position: &mut usize,
    specialty_hash: SpecialtyH256,
) -> Result<ParsedData, ParserError> {
    let length = H256::len_bytes();
    match data.get(*position..*position + length) {
        Some(slice) => {
            let out_data = H256(slice.try_into().expect("fixed checked length, always fits"));
            *position += length;
            match specialty_hash {
                SpecialtyH256::GenesisHash => Ok(ParsedData::GenesisHash(out_data)),
                SpecialtyH256::BlockHash => Ok(ParsedData::BlockHash(out_data)),
                SpecialtyH256::None => Ok(ParsedData::H256(out_data)),
            }
        }
        None => Err(ParserError::DataTooShort {
            position: *position,
            minimal_length: length,
        }),
    }
}

pub(crate) fn special_case_era(
    data: &[u8],
    position: &mut usize,
) -> Result<ParsedData, ParserError> {
    let era_data = match data.get(*position) {
        Some(0) => {
            let out = data[*position..*position + 1].to_vec();
            *position += 1;
            out
        }
        Some(_) => match data.get(*position..*position + 2) {
            Some(a) => {
                let out = a.to_vec();
                *position += 2;
                out
            }
            None => {
                return Err(ParserError::DataTooShort {
                    position: *position,
                    minimal_length: 2,
                })
            }
        },
        None => {
            return Err(ParserError::DataTooShort {
                position: *position,
                minimal_length: 1,
            })
        }
    };
    match Era::decode(&mut &era_data[..]) {
        Ok(a) => Ok(ParsedData::Era(a)),
        Err(_) => Err(ParserError::Era {
            position: *position,
        }),
    }
}

//! Parsed cards for decoded call and extensions data.
use bitvec::prelude::{BitVec, Lsb0, Msb0};
use num_bigint::{BigInt, BigUint};
use scale_info::{form::PortableForm, Field, Path, Type, Variant};
use sp_arithmetic::{PerU16, Perbill, Percent, Permill, Perquintill};
use sp_core::{
    crypto::{AccountId32, Ss58Codec},
    H160, H256, H512,
};
use sp_runtime::generic::Era;

use crate::special::SpecialtyUnsignedInteger;

/// Type-associated information: docs and path collected from the metadata
/// type registry while resolving the type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Info {
    pub docs: String,
    pub path: Path<PortableForm>,
}

impl Info {
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty() && self.path.is_empty()
    }
    pub fn from_ty(ty: &Type<PortableForm>) -> Self {
        Self {
            docs: ty.collect_docs(),
            path: ty.path.to_owned(),
        }
    }
}

pub trait Documented {
    fn collect_docs(&self) -> String;
}

macro_rules! impl_documented {
    ($($ty: ty), *) => {
        $(
            impl Documented for $ty {
                fn collect_docs(&self) -> String {
                    let mut docs = String::new();
                    for (i, docs_line) in self.docs.iter().enumerate() {
                        if i > 0 {docs.push('\n')}
                        docs.push_str(docs_line);
                    }
                    docs
                }
            }
        )*
    }
}

impl_documented!(
    Type<PortableForm>,
    Field<PortableForm>,
    Variant<PortableForm>
);

/// Each decoding results in `ExtendedData`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExtendedData {
    pub info: Vec<Info>,
    pub data: ParsedData,
}

/// Decoded call: pallet and call variant names, with decoded fields.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Call {
    pub pallet_name: String,
    pub pallet_info: Info,
    pub call_name: String,
    pub call_docs: String,
    pub fields: Vec<FieldData>,
}

impl Call {
    pub fn show(&self, indent: u32) -> String {
        let mut out = [
            readable(indent, "pallet", &self.pallet_name),
            String::from("\n"),
            readable(indent + 1, "call", &self.call_name),
        ]
        .concat();
        for (i, field_data) in self.fields.iter().enumerate() {
            out.push('\n');
            match field_data.field_name {
                Some(ref a) => out.push_str(&readable(indent + 2, "field_name", a)),
                None => out.push_str(&readable(indent + 2, "field_number", &i.to_string())),
            }
            out.push('\n');
            out.push_str(&field_data.data.data.show(indent + 3))
        }
        out
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldData {
    pub field_name: Option<String>,
    pub type_name: Option<String>,
    pub field_docs: String,
    pub data: ExtendedData,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VariantData {
    pub variant_name: String,
    pub variant_docs: String,
    pub fields: Vec<FieldData>,
}

/// For both vectors and arrays with non-`u8` elements.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SequenceData {
    /// Info associated with every element of the sequence.
    pub element_info: Vec<Info>,
    pub data: Vec<ParsedData>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParsedData {
    BitVecU8Lsb0(BitVec<u8, Lsb0>),
    BitVecU16Lsb0(BitVec<u16, Lsb0>),
    BitVecU32Lsb0(BitVec<u32, Lsb0>),
    BitVecU64Lsb0(BitVec<u64, Lsb0>),
    BitVecU8Msb0(BitVec<u8, Msb0>),
    BitVecU16Msb0(BitVec<u16, Msb0>),
    BitVecU32Msb0(BitVec<u32, Msb0>),
    BitVecU64Msb0(BitVec<u64, Msb0>),
    BlockHash(H256),
    Call(Call),
    Composite(Vec<FieldData>),
    Era(Era),
    GenesisHash(H256),
    H160(H160),
    H256(H256),
    H512(H512),
    Id(AccountId32),
    Option(Option<Box<ParsedData>>),
    PerU16(PerU16),
    Percent(Percent),
    Permill(Permill),
    Perbill(Perbill),
    Perquintill(Perquintill),
    PrimitiveBool(bool),
    PrimitiveChar(char),
    PrimitiveI8(i8),
    PrimitiveI16(i16),
    PrimitiveI32(i32),
    PrimitiveI64(i64),
    PrimitiveI128(i128),
    PrimitiveI256(BigInt),
    PrimitiveU8 {
        value: u8,
        specialty: SpecialtyUnsignedInteger,
    },
    PrimitiveU16 {
        value: u16,
        specialty: SpecialtyUnsignedInteger,
    },
    PrimitiveU32 {
        value: u32,
        specialty: SpecialtyUnsignedInteger,
    },
    PrimitiveU64 {
        value: u64,
        specialty: SpecialtyUnsignedInteger,
    },
    PrimitiveU128 {
        value: u128,
        specialty: SpecialtyUnsignedInteger,
    },
    PrimitiveU256(BigUint),
    Sequence(SequenceData),
    SequenceU8(Vec<u8>),
    Text(String),
    Tuple(Vec<ExtendedData>),
    Variant(VariantData),
}

impl ParsedData {
    pub fn show(&self, indent: u32) -> String {
        match &self {
            ParsedData::BitVecU8Lsb0(a) => readable(indent, "BitVec<u8, Lsb0>", &a.to_string()),
            ParsedData::BitVecU16Lsb0(a) => readable(indent, "BitVec<u16, Lsb0>", &a.to_string()),
            ParsedData::BitVecU32Lsb0(a) => readable(indent, "BitVec<u32, Lsb0>", &a.to_string()),
            ParsedData::BitVecU64Lsb0(a) => readable(indent, "BitVec<u64, Lsb0>", &a.to_string()),
            ParsedData::BitVecU8Msb0(a) => readable(indent, "BitVec<u8, Msb0>", &a.to_string()),
            ParsedData::BitVecU16Msb0(a) => readable(indent, "BitVec<u16, Msb0>", &a.to_string()),
            ParsedData::BitVecU32Msb0(a) => readable(indent, "BitVec<u32, Msb0>", &a.to_string()),
            ParsedData::BitVecU64Msb0(a) => readable(indent, "BitVec<u64, Msb0>", &a.to_string()),
            ParsedData::BlockHash(block_hash) => {
                readable(indent, "block_hash", &hex::encode(block_hash))
            }
            ParsedData::Call(call) => call.show(indent),
            ParsedData::Composite(field_data_set) => {
                if (field_data_set.len() == 1) && (field_data_set[0].field_name.is_none()) {
                    field_data_set[0].data.data.show(indent)
                } else {
                    let mut out = String::new();
                    for (i, field_data) in field_data_set.iter().enumerate() {
                        if i > 0 {
                            out.push('\n')
                        }
                        match field_data.field_name {
                            Some(ref a) => out.push_str(&readable(indent, "field_name", a)),
                            None => out.push_str(&readable(indent, "field_number", &i.to_string())),
                        }
                        out.push('\n');
                        out.push_str(&field_data.data.data.show(indent + 1))
                    }
                    out
                }
            }
            ParsedData::Era(era) => match era {
                Era::Immortal => readable(indent, "era", "Immortal"),
                Era::Mortal(period, phase) => readable(
                    indent,
                    "era",
                    &format!("Mortal, phase: {}, period: {}", phase, period),
                ),
            },
            ParsedData::GenesisHash(genesis_hash) => {
                readable(indent, "genesis_hash", &hex::encode(genesis_hash))
            }
            ParsedData::H160(h) => readable(indent, "H160", &hex::encode(h.0)),
            ParsedData::H256(h) => readable(indent, "H256", &hex::encode(h.0)),
            ParsedData::H512(h) => readable(indent, "H512", &hex::encode(h.0)),
            ParsedData::Id(id) => readable(indent, "Id", &id.to_ss58check()),
            ParsedData::Option(option_data) => match option_data {
                Some(parsed_data) => parsed_data.show(indent),
                None => readable(indent, "option", "none"),
            },
            ParsedData::PerU16(a) => readable(indent, "per_u16", &a.deconstruct().to_string()),
            ParsedData::Percent(a) => readable(indent, "percent", &a.deconstruct().to_string()),
            ParsedData::Permill(a) => readable(indent, "permill", &a.deconstruct().to_string()),
            ParsedData::Perbill(a) => readable(indent, "perbill", &a.deconstruct().to_string()),
            ParsedData::Perquintill(a) => {
                readable(indent, "perquintill", &a.deconstruct().to_string())
            }
            ParsedData::PrimitiveBool(a) => readable(indent, "bool", &a.to_string()),
            ParsedData::PrimitiveChar(a) => readable(indent, "char", &a.to_string()),
            ParsedData::PrimitiveI8(a) => readable(indent, "i8", &a.to_string()),
            ParsedData::PrimitiveI16(a) => readable(indent, "i16", &a.to_string()),
            ParsedData::PrimitiveI32(a) => readable(indent, "i32", &a.to_string()),
            ParsedData::PrimitiveI64(a) => readable(indent, "i64", &a.to_string()),
            ParsedData::PrimitiveI128(a) => readable(indent, "i128", &a.to_string()),
            ParsedData::PrimitiveI256(a) => readable(indent, "i256", &a.to_string()),
            ParsedData::PrimitiveU8 { value, specialty } => {
                readable(indent, specialty.card_name("u8"), &value.to_string())
            }
            ParsedData::PrimitiveU16 { value, specialty } => {
                readable(indent, specialty.card_name("u16"), &value.to_string())
            }
            ParsedData::PrimitiveU32 { value, specialty } => {
                readable(indent, specialty.card_name("u32"), &value.to_string())
            }
            ParsedData::PrimitiveU64 { value, specialty } => {
                readable(indent, specialty.card_name("u64"), &value.to_string())
            }
            ParsedData::PrimitiveU128 { value, specialty } => {
                readable(indent, specialty.card_name("u128"), &value.to_string())
            }
            ParsedData::PrimitiveU256(a) => readable(indent, "u256", &a.to_string()),
            ParsedData::Sequence(sequence_data) => {
                let mut out = String::new();
                for (i, x) in sequence_data.data.iter().enumerate() {
                    if i > 0 {
                        out.push('\n')
                    }
                    out.push_str(&x.show(indent))
                }
                out
            }
            ParsedData::SequenceU8(a) => readable(indent, "sequence u8", &hex::encode(a)),
            ParsedData::Text(decoded_text) => readable(indent, "text", decoded_text),
            ParsedData::Tuple(extended_data_set) => {
                let mut out = String::new();
                for (i, extended_data) in extended_data_set.iter().enumerate() {
                    if i > 0 {
                        out.push('\n')
                    }
                    out.push_str(&extended_data.data.show(indent))
                }
                out
            }
            ParsedData::Variant(variant_data) => {
                let mut out = readable(indent, "enum_variant_name", &variant_data.variant_name);
                if (variant_data.fields.len() == 1) && (variant_data.fields[0].field_name.is_none())
                {
                    out.push('\n');
                    out.push_str(&variant_data.fields[0].data.data.show(indent + 1))
                } else {
                    for (i, field_data) in variant_data.fields.iter().enumerate() {
                        out.push('\n');
                        match field_data.field_name {
                            Some(ref a) => out.push_str(&readable(indent + 1, "field_name", a)),
                            None => {
                                out.push_str(&readable(indent + 1, "field_number", &i.to_string()))
                            }
                        }
                        out.push('\n');
                        out.push_str(&field_data.data.data.show(indent + 2))
                    }
                }
                out
            }
        }
    }
}

impl ExtendedData {
    pub fn show(&self, indent: u32) -> String {
        self.data.show(indent)
    }
}

fn readable(indent: u32, card_type: &str, card_payload: &str) -> String {
    format!(
        "{}{}: {}",
        "  ".repeat(indent as usize),
        card_type,
        card_payload
    )
}

//! Errors.
use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Errors in transaction-level operations: decoding an unsigned transaction
/// record, a signing payload, or a signed extrinsic, and constructing the
/// inverse.
#[derive(Debug, Eq, PartialEq)]
pub enum TxError {
    Builder(BuilderError),
    CutSignable,
    Era(EraError),
    Extensions(ExtensionsError),
    ImmortalHashMismatch,
    LengthMismatch {
        declared: usize,
        found: usize,
    },
    Metadata(MetadataError),
    NotSigned,
    NotHex {
        field: &'static str,
    },
    Parsing(ParserError),
    Registry(RegistryError),
    SomeDataNotUsedCall {
        from: usize,
        to: usize,
    },
    SomeDataNotUsedExtensions {
        from: usize,
    },
    VersionMismatch {
        version_byte: u8,
        version: u8,
    },
    WrongSpecVersion {
        as_decoded: String,
        in_metadata: String,
    },
}

impl TxError {
    fn error_text(&self) -> String {
        match &self {
            TxError::Builder(builder_error) => builder_error.error_text(),
            TxError::CutSignable => String::from("Unable to separate signing payload data into call data and extensions data."),
            TxError::Era(era_error) => era_error.error_text(),
            TxError::Extensions(extensions_error) => extensions_error.error_text(),
            TxError::ImmortalHashMismatch => String::from("Block hash does not match the chain genesis hash in transaction with immortal era."),
            TxError::LengthMismatch { declared, found } => format!("Length prefix in extrinsic declares {declared} byte(s), {found} byte(s) found after the prefix."),
            TxError::Metadata(metadata_error) => metadata_error.error_text(),
            TxError::NotSigned => String::from("Extrinsic has the signed bit unset, there is no signature to decode."),
            TxError::NotHex { field } => format!("Transaction field {field} is not a valid hexadecimal string."),
            TxError::Parsing(parser_error) => format!("Parsing error. {parser_error}"),
            TxError::Registry(registry_error) => registry_error.error_text(),
            TxError::SomeDataNotUsedCall { from, to } => format!("Some call data (input positions [{from}..{to}]) remained unused after decoding."),
            TxError::SomeDataNotUsedExtensions { from } => format!("Some extensions data (input positions [{from}..]) remained unused after decoding."),
            TxError::VersionMismatch { version_byte, version } => format!("Version byte in extrinsic {version_byte} does not match extrinsic version {version} from provided metadata. Last 7 bits were expected to be identical."),
            TxError::WrongSpecVersion { as_decoded, in_metadata } => format!("Wrong metadata spec version. When decoding transaction with metadata version {in_metadata}, the apparent spec version in extensions is {as_decoded}."),
        }
    }
}

/// Errors in data parsing, i.e. in bytes not matching the type grammar the
/// metadata declares for them.
#[derive(Debug, Eq, PartialEq)]
pub enum ParserError {
    BitVecFailure { position: usize },
    DataTooShort { position: usize, minimal_length: usize },
    Era { position: usize },
    NoCompact { position: usize },
    NotBitOrderType { id: u32 },
    NotBitStoreType { id: u32 },
    Registry(RegistryError),
    SomeDataNotUsedBlob { from: usize },
    TypeFailure { position: usize, ty: &'static str },
    UnexpectedCompactInsides { id: u32 },
    UnexpectedEnumVariant { position: usize },
    UnexpectedOptionVariant { position: usize },
}

impl ParserError {
    fn error_text(&self) -> String {
        match &self {
            ParserError::BitVecFailure { position } => {
                format!("Unable to decode data starting at position {position} as bit sequence.")
            }
            ParserError::DataTooShort {
                position,
                minimal_length,
            } => format!(
                "Data is too short: expected at least {minimal_length} more element(s) at position {position}."
            ),
            ParserError::Era { position } => {
                format!("Unable to decode data starting at position {position} as Era.")
            }
            ParserError::NoCompact { position } => {
                format!("Expected compact starting at position {position}, not found one.")
            }
            ParserError::NotBitOrderType { id } => {
                format!("BitVec type {id} in metadata type registry has unexpected BitOrder type.")
            }
            ParserError::NotBitStoreType { id } => {
                format!("BitVec type {id} in metadata type registry has unexpected BitStore type.")
            }
            ParserError::Registry(registry_error) => registry_error.error_text(),
            ParserError::SomeDataNotUsedBlob { from } => {
                format!("Some data (input positions [{from}..]) remained unused after decoding.")
            }
            ParserError::TypeFailure { position, ty } => {
                format!("Unable to decode data starting at position {position} as {ty}.")
            }
            ParserError::UnexpectedCompactInsides { id } => format!(
                "Compact type {id} in metadata type registry has unexpected type inside compact."
            ),
            ParserError::UnexpectedEnumVariant { position } => {
                format!("Encountered unexpected enum variant at position {position}.")
            }
            ParserError::UnexpectedOptionVariant { position } => {
                format!("Encountered unexpected Option<_> variant at position {position}.")
            }
        }
    }
}

/// Errors in querying the bound schema: a name or id the metadata cannot
/// answer for.
#[derive(Debug, Eq, PartialEq)]
pub enum RegistryError {
    CallNotAllowed {
        pallet_index: u8,
        call_index: u8,
    },
    CyclicMetadata {
        id: u32,
    },
    ExtrinsicParamMissing {
        param: &'static str,
    },
    NoCallsInPallet {
        pallet: String,
    },
    NoPalletWithName {
        pallet: String,
    },
    NoStorageInPallet {
        pallet: String,
    },
    NotACall {
        id: u32,
    },
    PalletNotFound {
        index: u8,
    },
    StorageEntryNotFound {
        pallet: String,
        entry: String,
    },
    TypeNotResolved {
        id: u32,
    },
}

impl RegistryError {
    fn error_text(&self) -> String {
        match &self {
            RegistryError::CallNotAllowed { pallet_index, call_index } => format!("Call [{pallet_index}, {call_index}] is not in the allow-list the metadata was loaded with."),
            RegistryError::CyclicMetadata { id } => format!("Resolving type id {id} in metadata type registry results in cycling."),
            RegistryError::ExtrinsicParamMissing { param } => format!("Extrinsic type in provided metadata has no {param} parameter."),
            RegistryError::NoCallsInPallet { pallet } => format!("Pallet {pallet} has no calls in provided metadata."),
            RegistryError::NoPalletWithName { pallet } => format!("No pallet named {pallet} in provided metadata."),
            RegistryError::NoStorageInPallet { pallet } => format!("Pallet {pallet} has no storage entries in provided metadata."),
            RegistryError::NotACall { id } => format!("Type {id} in metadata type registry was expected to be a call enum, and is not one."),
            RegistryError::PalletNotFound { index } => format!("Pallet with index {index} is not found in provided metadata."),
            RegistryError::StorageEntryNotFound { pallet, entry } => format!("Pallet {pallet} has no storage entry {entry} in provided metadata."),
            RegistryError::TypeNotResolved { id } => format!("Unable to resolve type id {id} in metadata type registry."),
        }
    }
}

/// Errors in accepting the metadata blob itself.
#[derive(Debug, Eq, PartialEq)]
pub enum MetadataError {
    NoSpecVersionIdentifier,
    NoSystemPallet,
    NoVersionInConstants,
    NotHex,
    NotMeta,
    RuntimeVersionNotDecodable,
    Undecodable,
    UnexpectedRuntimeVersionFormat,
    UnsupportedVersion,
}

impl MetadataError {
    fn error_text(&self) -> String {
        match &self {
            MetadataError::NoSpecVersionIdentifier => {
                String::from("No spec version found in decoded `Version` constant.")
            }
            MetadataError::NoSystemPallet => String::from("No `System` pallet in metadata."),
            MetadataError::NoVersionInConstants => {
                String::from("No `Version` constant in metadata `System` pallet.")
            }
            MetadataError::NotHex => {
                String::from("Metadata blob is not a valid hexadecimal string.")
            }
            MetadataError::NotMeta => {
                String::from("Metadata blob does not start with expected `META` prefix.")
            }
            MetadataError::RuntimeVersionNotDecodable => String::from(
                "`Version` constant from metadata `System` pallet could not be decoded.",
            ),
            MetadataError::Undecodable => {
                String::from("Metadata blob could not be decoded as runtime metadata.")
            }
            MetadataError::UnexpectedRuntimeVersionFormat => String::from(
                "Decoded `Version` constant from metadata `System` pallet is not a composite.",
            ),
            MetadataError::UnsupportedVersion => {
                String::from("Only `V14` runtime metadata is supported.")
            }
        }
    }
}

/// Era flag contradicting the actual era bytes, or era bytes gone bad.
#[derive(Debug, Eq, PartialEq)]
pub enum EraError {
    ExpectedImmortal { first_byte: u8 },
    ExpectedMortal,
    ExtraBytes,
    Undecodable,
}

impl EraError {
    fn error_text(&self) -> String {
        match &self {
            EraError::ExpectedImmortal { first_byte } => format!("Era was requested to be immortal, but era data starts with {first_byte} and is mortal."),
            EraError::ExpectedMortal => String::from("Era was requested to be mortal, but era data is a single zero byte, i.e. immortal."),
            EraError::ExtraBytes => String::from("Era data contains bytes beyond the encoded era."),
            EraError::Undecodable => String::from("Unable to decode era data."),
        }
    }
}

/// Errors caused by the signed extensions set declared in the metadata or
/// decoded from a payload.
#[derive(Debug, Eq, PartialEq)]
pub enum ExtensionsError {
    BlockHashTwice,
    EraTwice,
    GenesisHashTwice,
    NoGenesisHash,
    NoSpecVersion,
    SpecVersionTwice,
    UnsupportedExtension { identifier: String },
}

impl ExtensionsError {
    fn error_text(&self) -> String {
        match &self {
            ExtensionsError::BlockHashTwice => String::from("Signable transaction extensions contain more than one block hash entry."),
            ExtensionsError::EraTwice => String::from("Signable transaction extensions contain more than one era entry."),
            ExtensionsError::GenesisHashTwice => String::from("Signable transaction extensions contain more than one genesis hash entry. Unable to verify that correct chain is used."),
            ExtensionsError::NoGenesisHash => String::from("Signable transaction extensions do not include chain genesis hash. Unable to verify that correct chain is used."),
            ExtensionsError::NoSpecVersion => String::from("Signable transaction extensions do not include metadata spec version. Unable to verify that correct metadata version is used."),
            ExtensionsError::SpecVersionTwice => String::from("Signable transaction extensions contain more than one metadata spec version entry. Unable to verify that correct metadata version is used."),
            ExtensionsError::UnsupportedExtension { identifier } => format!("Signed extension {identifier} declared in metadata carries data this crate cannot assemble."),
        }
    }
}

/// Errors in method builders.
#[derive(Debug, Eq, PartialEq)]
pub enum BuilderError {
    ArgumentCountMismatch {
        pallet: String,
        call: String,
        expected: usize,
        provided: usize,
    },
    CallNotFound {
        pallet: String,
        call: String,
    },
    InvalidAddress {
        address: String,
    },
    PalletNotFound {
        pallet: String,
    },
}

impl BuilderError {
    fn error_text(&self) -> String {
        match &self {
            BuilderError::ArgumentCountMismatch { pallet, call, expected, provided } => format!("Call {pallet}::{call} declares {expected} argument(s) in metadata, builder provided {provided}."),
            BuilderError::CallNotFound { pallet, call } => format!("Pallet {pallet} has no call named {call} in provided metadata."),
            BuilderError::InvalidAddress { address } => format!("Unable to interpret {address} as an SS58 address or a raw hexadecimal account id."),
            BuilderError::PalletNotFound { pallet } => format!("No pallet named {pallet} in provided metadata."),
        }
    }
}

/// Implement [`Display`] and [`Error`] for all error types.
macro_rules! impl_display_and_error {
    ($($ty: ty), *) => {
        $(
            impl Display for $ty {
                fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                    write!(f, "{}", self.error_text())
                }
            }

            impl Error for $ty {
                fn source(&self) -> Option<&(dyn Error + 'static)> {
                    None
                }
            }
        )*
    }
}

impl_display_and_error!(
    BuilderError,
    EraError,
    ExtensionsError,
    MetadataError,
    ParserError,
    RegistryError,
    TxError
);

impl From<RegistryError> for ParserError {
    fn from(registry_error: RegistryError) -> Self {
        ParserError::Registry(registry_error)
    }
}

/// Implement `From` conversions into [`TxError`].
macro_rules! impl_from_tx_error {
    ($($ty: ty, $variant: ident), *) => {
        $(
            impl From<$ty> for TxError {
                fn from(inner: $ty) -> Self {
                    TxError::$variant(inner)
                }
            }
        )*
    }
}

impl_from_tx_error!(
    BuilderError,
    Builder,
    EraError,
    Era,
    ExtensionsError,
    Extensions,
    MetadataError,
    Metadata,
    ParserError,
    Parsing,
    RegistryError,
    Registry
);

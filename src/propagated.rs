//! Type information propagated during decoding.
use frame_metadata::v14::SignedExtensionMetadata;
use scale_info::form::PortableForm;

use crate::cards::Info;
use crate::error::{ParserError, RegistryError};
use crate::special::Hint;

/// Compact flag and specialty hint, collected while resolving a type chain.
#[derive(Clone, Copy, Debug)]
pub struct SpecialtySet {
    /// Type id of the compact wrapper, if one was encountered.
    pub compact_at: Option<u32>,
    pub hint: Hint,
}

impl SpecialtySet {
    pub fn new() -> Self {
        Self {
            compact_at: None,
            hint: Hint::None,
        }
    }
    pub fn reject_compact(&self) -> Result<(), ParserError> {
        match self.compact_at {
            Some(id) => Err(ParserError::UnexpectedCompactInsides { id }),
            None => Ok(()),
        }
    }
}

impl Default for SpecialtySet {
    fn default() -> Self {
        Self::new()
    }
}

/// Propagation tracker: specialty set and resolved type ids along the current
/// chain of type references that consumed no data yet.
///
/// If a type id repeats within such a chain, the metadata is cyclic and no
/// data would ever get consumed. Consuming any data (picking an enum variant,
/// cutting a sequence length) resets the chain.
#[derive(Clone, Debug)]
pub struct Checker {
    pub specialty_set: SpecialtySet,
    pub cycle_check: Vec<u32>,
}

impl Checker {
    pub fn new() -> Self {
        Self {
            specialty_set: SpecialtySet::new(),
            cycle_check: Vec::new(),
        }
    }

    /// Check new type id against the no-progress chain, record it.
    pub fn check_id(&mut self, id: u32) -> Result<(), RegistryError> {
        if self.cycle_check.contains(&id) {
            Err(RegistryError::CyclicMetadata { id })
        } else {
            self.cycle_check.push(id);
            Ok(())
        }
    }

    /// Data got consumed, the chain is no longer without progress.
    pub fn drop_cycle_check(&mut self) {
        self.cycle_check.clear()
    }

    pub fn reject_compact(&self) -> Result<(), ParserError> {
        self.specialty_set.reject_compact()
    }

    /// Inherit a checker into an inner type, updating the hint if the inner
    /// one carries none yet.
    pub fn update_hint(&mut self, hint: Hint) {
        if let Hint::None = self.specialty_set.hint {
            self.specialty_set.hint = hint;
        }
    }
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

/// Propagating type info.
#[derive(Clone, Debug)]
pub struct Propagated {
    pub checker: Checker,

    /// Set of [`Info`] collected while resolving the type.
    ///
    /// Only non-empty [`Info`] entries are added.
    pub info: Vec<Info>,
}

impl Propagated {
    pub fn new() -> Self {
        Self {
            checker: Checker::new(),
            info: Vec::new(),
        }
    }
    pub fn with_checker(checker: Checker) -> Self {
        Self {
            checker,
            info: Vec::new(),
        }
    }
    pub fn for_field(
        checker: &Checker,
        field: &scale_info::Field<PortableForm>,
    ) -> Self {
        let mut checker = checker.clone();
        checker.update_hint(Hint::from_field(field));
        Self {
            checker,
            info: Vec::new(),
        }
    }
    pub fn from_ext_meta(signed_ext_meta: &SignedExtensionMetadata<PortableForm>) -> Self {
        let mut checker = Checker::new();
        checker.update_hint(Hint::from_ext_identifier(signed_ext_meta.identifier.as_str()));
        Self {
            checker,
            info: Vec::new(),
        }
    }
    pub fn add_info(&mut self, info_update: &Info) {
        if !info_update.is_empty() {
            self.info.push(info_update.clone())
        }
    }
    pub fn add_info_slice(&mut self, info_update_slice: &[Info]) {
        self.info.extend_from_slice(info_update_slice)
    }
}

impl Default for Propagated {
    fn default() -> Self {
        Self::new()
    }
}

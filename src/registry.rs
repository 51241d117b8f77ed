//!
//! Catalog of the known mask templates.
//!
//! The registry is built once and shared, usually behind an `Rc`.
//! There is no way to change it after construction.
//!

use crate::MaskError;
use crate::mask_template::MaskTemplate;
use rustc_hash::FxHashMap;
use std::fmt::{Display, Formatter};

/// Identifies a mask template.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MaskId {
    /// No mask. Never registered.
    #[default]
    None,
    /// Brazilian individual taxpayer id.
    Cpf,
    /// Brazilian company id.
    Cnpj,
    /// dd/mm/yyyy
    Date,
    /// Brazilian postal code.
    Cep,
    /// Mobile number with area code.
    Mobile,
    /// Landline number with area code.
    Phone,
}

impl MaskId {
    /// All ids that can carry a template.
    pub const MASKED: [MaskId; 6] = [
        MaskId::Cpf,
        MaskId::Cnpj,
        MaskId::Date,
        MaskId::Cep,
        MaskId::Mobile,
        MaskId::Phone,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MaskId::None => "none",
            MaskId::Cpf => "cpf",
            MaskId::Cnpj => "cnpj",
            MaskId::Date => "date",
            MaskId::Cep => "cep",
            MaskId::Mobile => "mobile",
            MaskId::Phone => "phone",
        }
    }

    /// Lookup by name. Case-insensitive.
    pub fn from_name(name: &str) -> Option<MaskId> {
        [MaskId::None]
            .into_iter()
            .chain(MaskId::MASKED)
            .find(|v| v.name().eq_ignore_ascii_case(name))
    }
}

impl Display for MaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

const BUILTIN: [(MaskId, &str); 6] = [
    (MaskId::Cpf, "___.___.___-__"),
    (MaskId::Cnpj, "__.___.___/____-__"),
    (MaskId::Date, "__/__/____"),
    (MaskId::Cep, "_____-___"),
    (MaskId::Mobile, "(__) _____-____"),
    (MaskId::Phone, "(__) ____-____"),
];

/// Immutable mapping from [MaskId] to [MaskTemplate].
#[derive(Debug, Clone)]
pub struct MaskRegistry {
    templates: FxHashMap<MaskId, MaskTemplate>,
}

impl Default for MaskRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MaskRegistry {
    /// Registry with the builtin catalog.
    pub fn builtin() -> Self {
        Self::from_templates(BUILTIN).expect("valid builtin masks")
    }

    /// Registry from (id, pattern) pairs. Patterns use `_` for slots.
    ///
    /// Each pattern is validated, see [MaskTemplate::from_parts].
    /// [MaskId::None] can't be registered.
    pub fn from_templates<'a>(
        templates: impl IntoIterator<Item = (MaskId, &'a str)>,
    ) -> Result<Self, MaskError> {
        let mut map = FxHashMap::default();
        for (id, pattern) in templates {
            if id == MaskId::None {
                return Err(MaskError::InvalidTemplate(format!(
                    "{} can't be registered",
                    id
                )));
            }
            map.insert(id, MaskTemplate::parse(pattern)?);
        }
        Ok(Self { templates: map })
    }

    /// Template for the id.
    pub fn lookup(&self, id: MaskId) -> Result<&MaskTemplate, MaskError> {
        self.templates
            .get(&id)
            .ok_or(MaskError::UnknownTemplate(id))
    }

    /// Template string with all slots empty.
    pub fn pattern(&self, id: MaskId) -> Result<&str, MaskError> {
        Ok(self.lookup(id)?.pattern())
    }

    /// Number of digits the template holds.
    pub fn slot_count(&self, id: MaskId) -> Result<usize, MaskError> {
        Ok(self.lookup(id)?.slot_count())
    }

    /// Registered ids in declaration order.
    pub fn ids(&self) -> Vec<MaskId> {
        let mut ids = self.templates.keys().copied().collect::<Vec<_>>();
        ids.sort();
        ids
    }
}

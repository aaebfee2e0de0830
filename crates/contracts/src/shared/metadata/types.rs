//! Field description for registration forms
//!
//! All schemas are `'static` so every page can declare its form as a constant.

use super::field_type::FieldKind;
use super::mask;

/// One form field. Supplied by the page hosting the form, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
        }
    }

    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    /// Placeholder shown in the empty input
    pub fn placeholder(&self) -> Option<&'static str> {
        match self.kind {
            FieldKind::Masked { mask } => Some(mask::placeholder(mask)),
            FieldKind::TextArea => Some("Descreva o serviço..."),
            FieldKind::EntityLookup { target } => Some(match target {
                super::LookupKind::Client => "Digite o nome do cliente",
                super::LookupKind::Technician => "Digite o nome do técnico",
                super::LookupKind::Material => "Busque um material",
            }),
            _ => None,
        }
    }
}

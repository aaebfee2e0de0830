//! Form metadata: field kinds, field specs, masks and required checks
//!
//! ## Usage
//!
//! ```rust,ignore
//! use contracts::shared::metadata::{FieldKind, FieldSpec, LookupKind};
//!
//! const FIELDS: &[FieldSpec] = &[
//!     FieldSpec::text("nome", "Nome").required(),
//!     FieldSpec::new("tecnico", "Técnico", FieldKind::EntityLookup { target: LookupKind::Technician }),
//! ];
//! ```

mod field_type;
pub mod mask;
mod types;
mod validation;

pub use field_type::{FieldKind, LookupKind};
pub use types::FieldSpec;
pub use validation::{first_missing, has_value, required_message};

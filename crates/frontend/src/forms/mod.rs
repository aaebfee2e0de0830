//! Registration form engine
//!
//! [`FormSession`] owns one draft and everything typed around it; the
//! submit pipeline saves it and, for service tickets, reconciles the material
//! line items. `ui` hosts the session in a leptos component.

pub mod draft;
pub mod error;
pub mod events;
pub mod line_items;
pub mod lookup;
pub mod payload;
pub mod reconcile;
pub mod session;
pub mod submit;
pub mod ui;

pub use draft::{Draft, LineItem, LineOrigin, MaterialRef};
pub use error::FormError;
pub use events::FormEvent;
pub use reconcile::ReconcileTally;
pub use session::{FormSession, StatusKind, StatusMessage};
pub use submit::{SubmissionResult, SubmitOutcome, SubmitPhase};

pub mod edit;

pub use edit::{load_service_for_edit, normalize_service};

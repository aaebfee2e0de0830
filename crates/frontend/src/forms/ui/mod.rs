mod fields;
pub mod view;
pub mod view_model;

pub use view::RegistrationForm;
pub use view_model::FormViewModel;

pub mod listing;
pub mod metadata;
pub mod number;
pub mod status;

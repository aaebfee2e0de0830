pub mod domain;
pub mod forms;
pub mod shared;

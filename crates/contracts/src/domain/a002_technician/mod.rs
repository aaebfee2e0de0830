pub mod aggregate;

pub use aggregate::Technician;

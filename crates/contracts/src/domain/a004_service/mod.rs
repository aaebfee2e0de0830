pub mod aggregate;

pub use aggregate::{IdRef, ServicePayload};

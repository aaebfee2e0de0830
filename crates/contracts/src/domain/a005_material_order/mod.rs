pub mod aggregate;

pub use aggregate::{MaterialOrder, MaterialOrderPayload};

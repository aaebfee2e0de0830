pub mod aggregate;

pub use aggregate::{Material, MaterialPayload, PENDING_BRAND, PENDING_PRICE_FLOOR};

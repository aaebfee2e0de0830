pub mod a001_client;
pub mod a002_technician;
pub mod a003_material;
pub mod a004_service;
pub mod a005_material_order;
pub mod common;

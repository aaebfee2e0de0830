pub mod a004_service;
pub mod entity_list;

//! Common types shared by every record

pub mod record_id;

pub use record_id::{lenient_optional_id, lenient_record_id, record_id_from_value, RecordId, SavedRecord};

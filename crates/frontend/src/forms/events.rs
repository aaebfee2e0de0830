use contracts::domain::common::RecordId;

/// Lifecycle notifications for the page hosting a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Opened { editing_id: Option<RecordId> },
    /// A record was written; lists should refresh
    Saved { record_id: Option<RecordId> },
    Closed,
}

//! Service ticket status catalog

/// Status id sent when the draft has none
pub const DEFAULT_STATUS_ID: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    Completed,
    InProgress,
    Open,
}

impl ServiceStatus {
    pub const ALL: [ServiceStatus; 3] = [Self::Completed, Self::InProgress, Self::Open];

    pub fn id(&self) -> i64 {
        match self {
            Self::Completed => 1,
            Self::InProgress => 2,
            Self::Open => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed => "Concluído",
            Self::InProgress => "Em andamento",
            Self::Open => "Em aberto",
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }
}

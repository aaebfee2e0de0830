//! Submit pipeline: validated plan → save request → reconciliation
//!
//! `FormSession::begin_submit` produces a [`SubmitPlan`]; [`execute_submit`]
//! runs it without touching the session, so the UI can await it while the
//! session stays free; `FormSession::complete_submit` applies the report.

use super::draft::LineItem;
use super::reconcile::{reconcile, ReconcileTally};
use crate::shared::http::{send_checked, ApiRequest, ApiTransport};
use contracts::domain::common::{RecordId, SavedRecord};

/// INIT → VALIDATING → SUBMITTING → SUCCESS | FAILED
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitPhase {
    #[default]
    Init,
    Validating,
    Submitting,
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved,
    ValidationFailed,
    NetworkError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionResult {
    pub outcome: SubmitOutcome,
    pub record_id: Option<RecordId>,
    /// Server answer for failed saves, missing field label for validation
    pub detail: Option<String>,
    pub reconciliation: Option<ReconcileTally>,
}

impl SubmissionResult {
    pub fn validation_failed(label: &str) -> Self {
        Self {
            outcome: SubmitOutcome::ValidationFailed,
            record_id: None,
            detail: Some(label.to_string()),
            reconciliation: None,
        }
    }

    pub fn is_saved(&self) -> bool {
        self.outcome == SubmitOutcome::Saved
    }
}

/// Line items to persist once the service ticket is saved
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcilePlan {
    pub client_id: Option<RecordId>,
    pub items: Vec<LineItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitPlan {
    pub generation: u64,
    pub editing_id: Option<RecordId>,
    pub request: ApiRequest,
    pub reconcile: Option<ReconcilePlan>,
    /// Bulk-import file submission instead of a field payload
    pub is_upload: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitReport {
    pub generation: u64,
    pub is_upload: bool,
    pub result: SubmissionResult,
}

/// Send the save request, then reconcile line items when the plan has some
pub async fn execute_submit<T>(transport: &T, plan: SubmitPlan) -> SubmitReport
where
    T: ApiTransport + ?Sized,
{
    let SubmitPlan {
        generation,
        editing_id,
        request,
        reconcile: reconcile_plan,
        is_upload,
    } = plan;

    let response = match send_checked(transport, request).await {
        Ok(response) => response,
        Err(e) => {
            log::error!("Save failed: {}", e);
            return SubmitReport {
                generation,
                is_upload,
                result: SubmissionResult {
                    outcome: SubmitOutcome::NetworkError,
                    record_id: None,
                    detail: Some(e.detail()),
                    reconciliation: None,
                },
            };
        }
    };

    // The save answer is only read for the new id; any body is accepted
    let saved_id = response.json::<SavedRecord>().ok().and_then(|r| r.id);
    let record_id = editing_id.or(saved_id);

    let reconciliation = match reconcile_plan.filter(|p| !p.items.is_empty()) {
        Some(plan) => match record_id {
            Some(service_id) => {
                Some(reconcile(transport, service_id, editing_id, plan.client_id, &plan.items).await)
            }
            None => {
                log::warn!("Saved service has no id, {} line items not persisted", plan.items.len());
                None
            }
        },
        None => None,
    };

    SubmitReport {
        generation,
        is_upload,
        result: SubmissionResult {
            outcome: SubmitOutcome::Saved,
            record_id,
            detail: None,
            reconciliation,
        },
    }
}

//! Material line-item reconciliation for service tickets
//!
//! After a ticket is saved its material associations are rewritten to match
//! the draft: existing associations are deleted (edits only), typed materials
//! are created as incomplete records, then one association is written per
//! row. Every step is awaited in order; nothing is rolled back.

use super::draft::{LineItem, LineOrigin};
use crate::shared::api_utils::{record_path, resource_path};
use crate::shared::http::{get_json, send_checked, ApiRequest, ApiTransport};
use contracts::domain::a003_material::MaterialPayload;
use contracts::domain::a005_material_order::MaterialOrderPayload;
use contracts::domain::common::{RecordId, SavedRecord};
use contracts::shared::listing::Listing;

const MATERIAL_RESOURCE: &str = "material";
const ASSOCIATION_RESOURCE: &str = "materialpedido";

/// Per-item outcome counters of one reconciliation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileTally {
    pub materials_created: usize,
    pub associations_written: usize,
    pub skipped_failed_creation: usize,
    pub associations_failed: usize,
    pub associations_removed: usize,
    /// Existing rows whose material id is not numeric
    pub skipped_invalid_id: usize,
}

impl ReconcileTally {
    /// Notes appended to the success message
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.materials_created > 0 {
            lines.push(format!(
                "• {} material(ais) criado(s) e marcado(s) como pendente.",
                self.materials_created
            ));
        }
        if self.skipped_failed_creation > 0 {
            lines.push(format!(
                "• {} material(ais) não puderam ser criados.",
                self.skipped_failed_creation
            ));
        }
        if self.associations_failed > 0 {
            lines.push(format!(
                "• {} material(ais) não foram vinculados ao serviço.",
                self.associations_failed
            ));
        }
        if self.skipped_invalid_id > 0 {
            lines.push(format!(
                "• {} material(ais) sem código válido não foram vinculados.",
                self.skipped_invalid_id
            ));
        }
        lines
    }
}

/// Associations of a service ticket: `/api/materialpedido/servico/{id}`
pub fn associations_path(service_id: RecordId) -> String {
    format!("{}/servico/{}", resource_path(ASSOCIATION_RESOURCE), service_id)
}

/// Rewrite the association set of `service_id` from `items`
pub async fn reconcile<T>(
    transport: &T,
    service_id: RecordId,
    editing_id: Option<RecordId>,
    client_id: Option<RecordId>,
    items: &[LineItem],
) -> ReconcileTally
where
    T: ApiTransport + ?Sized,
{
    let mut tally = ReconcileTally::default();

    if let Some(editing_id) = editing_id {
        tally.associations_removed = remove_associations(transport, editing_id).await;
    }

    for item in items {
        let material_id = match item.origin {
            LineOrigin::Pending => match create_pending_material(transport, item).await {
                Some(id) => {
                    tally.materials_created += 1;
                    id
                }
                None => {
                    tally.skipped_failed_creation += 1;
                    continue;
                }
            },
            LineOrigin::Existing => match item.reference.backend_id() {
                Some(id) => id,
                None => {
                    log::warn!(
                        "Line item '{}' ({}) has no material id, not associated",
                        item.description,
                        item.reference.key()
                    );
                    tally.skipped_invalid_id += 1;
                    continue;
                }
            },
        };

        let body = MaterialOrderPayload {
            servico_id: service_id,
            cliente_id: client_id,
            materiais_id: material_id,
            quantidade: item.quantity,
        };
        let written = match ApiRequest::post_json(resource_path(ASSOCIATION_RESOURCE), &body) {
            Ok(request) => send_checked(transport, request).await.map(|_| ()),
            Err(e) => Err(e),
        };
        match written {
            Ok(()) => tally.associations_written += 1,
            Err(e) => {
                log::error!("Failed to associate material {} with service {}: {}", material_id, service_id, e);
                tally.associations_failed += 1;
            }
        }
    }

    log::info!("Reconciled service {}: {:?}", service_id, tally);
    tally
}

async fn remove_associations<T>(transport: &T, service_id: RecordId) -> usize
where
    T: ApiTransport + ?Sized,
{
    let existing: Listing<SavedRecord> = match get_json(transport, associations_path(service_id)).await {
        Ok(listing) => listing,
        Err(e) => {
            log::warn!("Could not list associations of service {}, keeping them: {}", service_id, e);
            return 0;
        }
    };

    let mut removed = 0;
    for id in existing.into_items().into_iter().filter_map(|a| a.id) {
        let path = record_path(ASSOCIATION_RESOURCE, id);
        match send_checked(transport, ApiRequest::delete(path)).await {
            Ok(_) => removed += 1,
            Err(e) => log::error!("Failed to delete association {}: {}", id, e),
        }
    }
    removed
}

/// Create the backing record of a typed material; `None` when the backend refused
async fn create_pending_material<T>(transport: &T, item: &LineItem) -> Option<RecordId>
where
    T: ApiTransport + ?Sized,
{
    let unit_price = if item.price_provisional { 0.0 } else { item.unit_price };
    let body = MaterialPayload::pending(item.description.clone(), unit_price);
    let request = ApiRequest::post_json(resource_path(MATERIAL_RESOURCE), &body).ok()?;

    let response = match send_checked(transport, request).await {
        Ok(response) => response,
        Err(e) => {
            log::error!("Failed to create material '{}': {}", item.description, e);
            return None;
        }
    };
    match response.json::<SavedRecord>().ok().and_then(|r| r.id) {
        Some(id) => Some(id),
        None => {
            log::error!("Material '{}' created without an id in the answer", item.description);
            None
        }
    }
}

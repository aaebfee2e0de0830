//! One registration form session: draft, transient inputs and submit state

use super::draft::Draft;
use super::error::FormError;
use super::events::FormEvent;
use super::line_items::{self, parse_quantity, LineItemInput};
use super::lookup::{LookupRequest, Lookups, Suggestions};
use super::payload::{build_payload, grand_total, EndpointKind, Payload};
use super::submit::{
    execute_submit, ReconcilePlan, SubmissionResult, SubmitOutcome, SubmitPhase, SubmitPlan, SubmitReport,
};
use crate::shared::api_utils::{record_path, resource_path};
use crate::shared::config::FormConfig;
use crate::shared::http::{ApiRequest, ApiTransport, UploadFile};
use contracts::domain::common::RecordId;
use contracts::forms::FormSpec;
use contracts::shared::metadata::{first_missing, LookupKind};
use serde_json::{json, Value};

/// Multipart field carrying a bulk-import file
pub const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    fn success(text: String) -> Self {
        Self {
            kind: StatusKind::Success,
            text,
        }
    }

    fn error(err: &FormError) -> Self {
        Self {
            kind: StatusKind::Error,
            text: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormSession {
    spec: FormSpec,
    min_lookup_chars: usize,
    editing_id: Option<RecordId>,
    draft: Draft,
    lookups: Lookups,
    line_input: LineItemInput,
    phase: SubmitPhase,
    upload: Option<UploadFile>,
    status: Option<StatusMessage>,
    last_result: Option<SubmissionResult>,
    /// Bumped on every (re)initialization; stale async completions compare against it
    generation: u64,
    events: Vec<FormEvent>,
}

impl FormSession {
    pub fn new(spec: FormSpec, config: &FormConfig) -> Self {
        Self {
            spec,
            min_lookup_chars: config.min_lookup_chars,
            editing_id: None,
            draft: Draft::default(),
            lookups: Lookups::default(),
            line_input: LineItemInput::default(),
            phase: SubmitPhase::Init,
            upload: None,
            status: None,
            last_result: None,
            generation: 0,
            events: Vec::new(),
        }
    }

    // ---- accessors ----

    pub fn spec(&self) -> &FormSpec {
        &self.spec
    }

    pub fn editing_id(&self) -> Option<RecordId> {
        self.editing_id
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn lookups(&self) -> &Lookups {
        &self.lookups
    }

    pub fn line_input(&self) -> &LineItemInput {
        &self.line_input
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == SubmitPhase::Submitting
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn last_result(&self) -> Option<&SubmissionResult> {
        self.last_result.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn upload_name(&self) -> Option<&str> {
        self.upload.as_ref().map(|f| f.name.as_str())
    }

    /// Form heading: "Editar Serviço" or the schema title
    pub fn title(&self) -> String {
        match self.editing_id {
            Some(_) => format!("Editar {}", self.spec.entity_name()),
            None => self.spec.title.to_string(),
        }
    }

    // ---- lifecycle ----

    /// Start a session for a new record or an existing one
    pub fn open(&mut self, editing_id: Option<RecordId>, record: Option<&Value>) {
        self.editing_id = editing_id;
        self.initialize(record);
        log::debug!("{} form opened (editing {:?})", self.spec.endpoint, editing_id);
        self.events.push(FormEvent::Opened { editing_id });
    }

    /// Reseed the draft and drop every transient input
    pub fn initialize(&mut self, record: Option<&Value>) {
        self.draft = record.map(Draft::from_record).unwrap_or_default();
        self.lookups = Lookups::default();
        self.line_input = LineItemInput::default();
        self.phase = SubmitPhase::Init;
        self.upload = None;
        self.status = None;
        self.last_result = None;
        self.generation += 1;
    }

    /// Close after a successful save once the message was shown.
    /// Ignored when the session moved on since `generation`.
    pub fn finish(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.phase != SubmitPhase::Success {
            return false;
        }
        let record_id = self.last_result.as_ref().and_then(|r| r.record_id);
        self.reset();
        self.events.push(FormEvent::Saved { record_id });
        self.events.push(FormEvent::Closed);
        true
    }

    pub fn cancel(&mut self) {
        self.reset();
        self.events.push(FormEvent::Closed);
    }

    pub fn drain_events(&mut self) -> Vec<FormEvent> {
        std::mem::take(&mut self.events)
    }

    fn reset(&mut self) {
        self.editing_id = None;
        self.initialize(None);
    }

    // ---- fields ----

    pub fn set_field(&mut self, name: &str, value: Value) -> bool {
        self.draft.set(name, value)
    }

    pub fn attach_upload(&mut self, file: Option<UploadFile>) {
        if let Some(f) = &file {
            log::info!("Bulk import file attached: {} ({} bytes)", f.name, f.bytes.len());
        }
        self.upload = file;
    }

    /// Attach a file read in the background; dropped when the form was
    /// reopened since `generation`
    pub fn attach_upload_for(&mut self, generation: u64, file: UploadFile) -> bool {
        if generation != self.generation {
            log::debug!("Dropping stale upload {}", file.name);
            return false;
        }
        self.attach_upload(Some(file));
        true
    }

    // ---- lookups ----

    /// Search request for `text`, or `None` (suggestions cleared) when it is too short
    pub fn lookup_related(&mut self, kind: LookupKind, text: &str) -> Option<LookupRequest> {
        if text.chars().count() < self.min_lookup_chars {
            self.lookups.clear(kind, text);
            return None;
        }
        self.lookups.start(kind, text);
        Some(LookupRequest {
            kind,
            query: text.to_string(),
            generation: self.generation,
        })
    }

    /// Text typed into a lookup input: store it where the kind keeps it, then search
    pub fn type_lookup(&mut self, kind: LookupKind, text: &str) -> Option<LookupRequest> {
        match kind {
            LookupKind::Client => {
                self.draft.set("nome", json!(text));
            }
            LookupKind::Technician => {
                self.draft.set("tecnico", json!({ "nome": text }));
            }
            LookupKind::Material => {
                self.line_input.text = text.to_string();
                self.line_input.staged = None;
            }
        }
        self.lookup_related(kind, text)
    }

    /// Apply lookup results unless the input or the session changed meanwhile
    pub fn complete_lookup(&mut self, request: &LookupRequest, suggestions: Suggestions) -> bool {
        let current = request.generation == self.generation
            && suggestions.kind() == request.kind
            && self.lookups.query(request.kind) == request.query;
        if !current {
            log::debug!("Dropping stale {} lookup '{}'", request.kind.as_str(), request.query);
            return false;
        }
        self.lookups.fill(suggestions);
        true
    }

    pub fn select_client(&mut self, idx: usize) -> bool {
        let Some(client) = self.lookups.client.suggestions.get(idx).cloned() else {
            return false;
        };
        client.copy_into(&mut self.draft.fields);
        self.lookups.client.query = client.name;
        self.lookups.client.clear();
        true
    }

    pub fn select_technician(&mut self, idx: usize) -> bool {
        let Some(technician) = self.lookups.technician.suggestions.get(idx).cloned() else {
            return false;
        };
        technician.copy_into(&mut self.draft.fields);
        self.lookups.technician.query = technician.name;
        self.lookups.technician.clear();
        true
    }

    /// Stage a material suggestion for the "add material" input
    pub fn select_material(&mut self, idx: usize) -> bool {
        let Some(material) = self.lookups.material.suggestions.get(idx).cloned() else {
            return false;
        };
        self.line_input.text = material.description.clone();
        self.line_input.quantity = 1;
        self.lookups.material.query = material.description.clone();
        self.line_input.staged = Some(material);
        self.lookups.material.clear();
        true
    }

    // ---- line items ----

    pub fn set_line_input_quantity(&mut self, raw: &str) {
        self.line_input.quantity = parse_quantity(raw);
    }

    pub fn add_or_merge_line_item(&mut self) -> Option<usize> {
        self.add_or_merge_line_item_at(chrono::Utc::now().timestamp_millis())
    }

    /// Same as [`Self::add_or_merge_line_item`] with an explicit clock for placeholder ids
    pub fn add_or_merge_line_item_at(&mut self, now_millis: i64) -> Option<usize> {
        let idx = line_items::add_or_merge(
            &mut self.draft.line_items,
            self.line_input.staged.as_ref(),
            &self.line_input.text,
            self.line_input.quantity,
            now_millis,
        )?;
        self.line_input = LineItemInput::default();
        self.lookups.clear(LookupKind::Material, "");
        Some(idx)
    }

    pub fn remove_line_item(&mut self, idx: usize) -> bool {
        line_items::remove_at(&mut self.draft.line_items, idx).is_some()
    }

    pub fn set_line_item_quantity(&mut self, idx: usize, quantity: u32) -> bool {
        line_items::set_quantity(&mut self.draft.line_items, idx, quantity)
    }

    pub fn set_line_item_price(&mut self, idx: usize, price: f64) -> bool {
        line_items::set_price(&mut self.draft.line_items, idx, price)
    }

    pub fn line_items_total(&self) -> f64 {
        line_items::line_items_total(&self.draft.line_items)
    }

    pub fn grand_total(&self) -> f64 {
        grand_total(&self.draft)
    }

    // ---- submit ----

    pub fn endpoint_kind(&self) -> EndpointKind {
        EndpointKind::from_endpoint(self.spec.endpoint)
    }

    pub fn build_payload(&self) -> Payload {
        build_payload(self.endpoint_kind(), &self.draft)
    }

    /// Validate and plan the save. Validation is skipped when a file is attached.
    pub fn begin_submit(&mut self) -> Result<SubmitPlan, FormError> {
        if self.is_submitting() {
            return Err(FormError::InFlight);
        }
        self.phase = SubmitPhase::Validating;

        if self.upload.is_none() {
            if let Some(field) = first_missing(self.spec.fields, &self.draft.fields) {
                let err = FormError::Validation {
                    field: field.name,
                    label: field.label,
                };
                log::warn!("{} form: {}", self.spec.endpoint, err);
                self.fail(SubmissionResult::validation_failed(field.label), &err);
                return Err(err);
            }
        }

        let request = match self.save_request() {
            Ok(request) => request,
            Err(err) => {
                self.fail(
                    SubmissionResult {
                        outcome: SubmitOutcome::NetworkError,
                        record_id: None,
                        detail: Some(err.to_string()),
                        reconciliation: None,
                    },
                    &err,
                );
                return Err(err);
            }
        };

        let reconcile = (self.upload.is_none()
            && self.endpoint_kind() == EndpointKind::Service
            && !self.draft.line_items.is_empty())
        .then(|| ReconcilePlan {
            client_id: self.draft.record_id("cliente_id"),
            items: self.draft.line_items.clone(),
        });

        self.phase = SubmitPhase::Submitting;
        self.status = None;
        Ok(SubmitPlan {
            generation: self.generation,
            editing_id: self.editing_id,
            request,
            reconcile,
            is_upload: self.upload.is_some(),
        })
    }

    /// Apply the outcome of an executed plan; stale reports are ignored
    pub fn complete_submit(&mut self, report: SubmitReport) -> bool {
        if report.generation != self.generation || !self.is_submitting() {
            log::debug!("Ignoring submit result of an earlier form session");
            return false;
        }

        let result = report.result;
        match result.outcome {
            SubmitOutcome::Saved => {
                log::info!("{} saved (id {:?})", self.spec.endpoint, result.record_id);
                self.phase = SubmitPhase::Success;
                self.status = Some(StatusMessage::success(self.success_message(&result)));
                self.last_result = Some(result);
            }
            SubmitOutcome::NetworkError | SubmitOutcome::ValidationFailed => {
                let detail = result.detail.clone().unwrap_or_default();
                let err = if report.is_upload {
                    FormError::Upload(detail)
                } else {
                    FormError::Save(detail)
                };
                self.fail(result, &err);
            }
        }
        true
    }

    /// Validate, save and reconcile in one go
    pub async fn submit<T>(&mut self, transport: &T) -> Result<SubmissionResult, FormError>
    where
        T: ApiTransport + ?Sized,
    {
        let plan = self.begin_submit()?;
        let report = execute_submit(transport, plan).await;
        let result = report.result.clone();
        self.complete_submit(report);
        Ok(result)
    }

    fn fail(&mut self, result: SubmissionResult, err: &FormError) {
        self.phase = SubmitPhase::Failed;
        self.status = Some(StatusMessage::error(err));
        self.last_result = Some(result);
    }

    fn save_request(&self) -> Result<ApiRequest, FormError> {
        let endpoint = self.spec.endpoint;
        if let Some(file) = &self.upload {
            let path = format!("{}/upload", resource_path(endpoint));
            return Ok(ApiRequest::upload(path, UPLOAD_FIELD, file.clone()));
        }

        let payload = self.build_payload();
        let request = match self.editing_id {
            Some(id) => ApiRequest::put_json(record_path(endpoint, id), &payload),
            None => ApiRequest::post_json(resource_path(endpoint), &payload),
        };
        request.map_err(|e| FormError::Save(e.detail()))
    }

    fn success_message(&self, result: &SubmissionResult) -> String {
        let verb = if self.is_editing() { "atualizado" } else { "cadastrado" };
        let mut text = format!("{} {} com sucesso!", self.spec.entity_name(), verb);
        if let Some(tally) = &result.reconciliation {
            for line in tally.summary_lines() {
                text.push('\n');
                text.push_str(&line);
            }
        }
        text
    }
}

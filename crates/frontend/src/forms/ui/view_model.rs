use crate::forms::events::FormEvent;
use crate::forms::lookup::fetch_suggestions;
use crate::forms::session::FormSession;
use crate::forms::submit::execute_submit;
use crate::shared::config::config;
use crate::shared::http::{GlooTransport, UploadFile};
use contracts::domain::common::RecordId;
use contracts::forms::FormSpec;
use contracts::shared::metadata::mask::apply_mask;
use contracts::shared::metadata::LookupKind;
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::Value;

/// ViewModel for the registration form.
///
/// The session lives in a signal; async work runs on a snapshot (plan or
/// request) and writes back through `complete_*`, so no borrow is held
/// across an await.
#[derive(Clone, Copy)]
pub struct FormViewModel {
    pub session: RwSignal<FormSession>,
    on_event: Callback<FormEvent>,
}

impl FormViewModel {
    pub fn new(spec: FormSpec, on_event: Callback<FormEvent>) -> Self {
        Self {
            session: RwSignal::new(FormSession::new(spec, &config().form)),
            on_event,
        }
    }

    pub fn open(&self, editing_id: Option<RecordId>, record: Option<Value>) {
        self.session.update(|s| s.open(editing_id, record.as_ref()));
        self.flush_events();
    }

    pub fn cancel(&self) {
        self.session.update(|s| s.cancel());
        self.flush_events();
    }

    pub fn set_field(&self, name: &'static str, value: Value) {
        self.session.update(|s| {
            s.set_field(name, value);
        });
    }

    pub fn set_masked(&self, name: &'static str, mask: &'static str, raw: &str) {
        self.set_field(name, Value::String(apply_mask(mask, raw)));
    }

    /// Store typed lookup text and search in the background
    pub fn type_lookup(&self, kind: LookupKind, text: String) {
        let Some(request) = self.session.try_update(|s| s.type_lookup(kind, &text)).flatten() else {
            return;
        };
        let session = self.session;
        spawn_local(async move {
            let transport = GlooTransport::from_config();
            let suggestions = fetch_suggestions(&transport, &request).await;
            session.update(|s| {
                s.complete_lookup(&request, suggestions);
            });
        });
    }

    pub fn select(&self, kind: LookupKind, idx: usize) {
        self.session.update(|s| {
            match kind {
                LookupKind::Client => s.select_client(idx),
                LookupKind::Technician => s.select_technician(idx),
                LookupKind::Material => s.select_material(idx),
            };
        });
    }

    pub fn set_line_input_quantity(&self, raw: String) {
        self.session.update(|s| s.set_line_input_quantity(&raw));
    }

    pub fn add_line_item(&self) {
        self.session.update(|s| {
            s.add_or_merge_line_item();
        });
    }

    pub fn remove_line_item(&self, idx: usize) {
        self.session.update(|s| {
            s.remove_line_item(idx);
        });
    }

    pub fn set_line_item_quantity(&self, idx: usize, quantity: u32) {
        self.session.update(|s| {
            s.set_line_item_quantity(idx, quantity);
        });
    }

    pub fn set_line_item_price(&self, idx: usize, price: f64) {
        self.session.update(|s| {
            s.set_line_item_price(idx, price);
        });
    }

    /// Read the picked bulk-import file into memory and attach it
    pub fn attach_file(&self, file: Option<web_sys::File>) {
        let Some(file) = file else {
            self.session.update(|s| s.attach_upload(None));
            return;
        };
        let session = self.session;
        let generation = session.with_untracked(|s| s.generation());
        spawn_local(async move {
            match read_file(&file).await {
                Ok(bytes) => session.update(|s| {
                    s.attach_upload_for(
                        generation,
                        UploadFile {
                            name: file.name(),
                            mime: file.type_(),
                            bytes,
                        },
                    );
                }),
                Err(e) => {
                    log::error!("Failed to read {}: {}", file.name(), e);
                    alert(&e);
                }
            }
        });
    }

    /// Validate, save, show the result, then close after the display delay
    pub fn submit(&self) {
        let plan = match self.session.try_update(|s| s.begin_submit()) {
            Some(Ok(plan)) => plan,
            Some(Err(e)) => {
                alert(&e.to_string());
                return;
            }
            None => return,
        };

        let vm = *self;
        spawn_local(async move {
            let transport = GlooTransport::from_config();
            let report = execute_submit(&transport, plan).await;
            let generation = report.generation;
            let saved = report.result.is_saved();

            let applied = vm.session.try_update(|s| s.complete_submit(report)).unwrap_or(false);
            if !applied {
                return;
            }
            if !saved {
                if let Some(text) = vm.session.with_untracked(|s| s.status().map(|m| m.text.clone())) {
                    alert(&text);
                }
                return;
            }

            gloo_timers::future::TimeoutFuture::new(config().form.status_display_ms).await;
            vm.session.update(|s| {
                s.finish(generation);
            });
            vm.flush_events();
        });
    }

    fn flush_events(&self) {
        let events = self.session.try_update(|s| s.drain_events()).unwrap_or_default();
        for event in events {
            self.on_event.run(event);
        }
    }
}

async fn read_file(file: &web_sys::File) -> Result<Vec<u8>, String> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Erro ao ler arquivo: {:?}", e))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Blocking browser alert
pub(crate) fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

use super::fields::FieldRow;
use super::view_model::FormViewModel;
use crate::forms::session::StatusKind;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Side panel with the fields of one registration form
#[component]
pub fn RegistrationForm(vm: FormViewModel) -> impl IntoView {
    let session = vm.session;
    let spec = session.with_untracked(|s| *s.spec());

    let success_text = move || {
        session.with(|s| {
            s.status()
                .filter(|m| m.kind == StatusKind::Success)
                .map(|m| m.text.clone())
        })
    };

    view! {
        <div class="details-container registration-form">
            <div class="details-header">
                <h3>{move || session.with(|s| s.title())}</h3>
                <button type="button" class="btn-fechar" on:click=move |_| vm.cancel()>
                    "✕"
                </button>
            </div>

            <form
                class="details-form cadastro-form"
                on:submit=move |ev| {
                    ev.prevent_default();
                    vm.submit();
                }
            >
                {spec
                    .fields
                    .iter()
                    .map(|field| view! { <FieldRow vm=vm field=*field /> })
                    .collect_view()}

                {spec.accepts_upload.then(|| view! { <UploadInput vm=vm /> })}

                {move || success_text().map(|text| view! {
                    <div class="alert alert-success status-message">{text}</div>
                })}

                <div class="details-actions">
                    <button
                        type="submit"
                        class="btn btn-primary btn-salvar"
                        disabled=move || session.with(|s| s.is_submitting())
                    >
                        {move || if session.with(|s| s.is_editing()) { "Atualizar" } else { "Salvar" }}
                    </button>
                </div>
            </form>
        </div>
    }
}

/// Bulk-import file picker; an attached file replaces the field payload
#[component]
fn UploadInput(vm: FormViewModel) -> impl IntoView {
    let session = vm.session;

    view! {
        <div class="form-group">
            <label for="upload">"Importar arquivo"</label>
            <input
                type="file"
                id="upload"
                accept=".csv,.xlsx"
                on:change=move |ev: web_sys::Event| {
                    let file = ev
                        .target()
                        .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
                        .and_then(|input| input.files())
                        .and_then(|files| files.get(0));
                    vm.attach_file(file);
                }
            />
            {move || session.with(|s| s.upload_name().map(str::to_string)).map(|name| view! {
                <small class="upload-name">{name}</small>
            })}
        </div>
    }
}

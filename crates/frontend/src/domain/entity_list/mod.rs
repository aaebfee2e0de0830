//! Paginated list of one entity page with edit and delete actions

use crate::domain::a004_service::load_service_for_edit;
use crate::forms::ui::view_model::alert;
use crate::forms::ui::FormViewModel;
use crate::layout::global_context::{AppGlobalContext, Page};
use crate::shared::config::config;
use crate::shared::date_utils::format_date;
use crate::shared::http::GlooTransport;
use crate::shared::pagination::{delete_record, fetch_page, ListQuery, ListState};
use contracts::domain::common::record_id_from_value;
use contracts::shared::metadata::{FieldKind, FieldSpec, LookupKind};
use contracts::shared::status::ServiceStatus;
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::Value;

/// Text shown in a list cell for `field` of a stored record
pub fn cell_text(row: &Value, field: &FieldSpec) -> String {
    let nested_name = |key: &str| {
        row.get(key)
            .and_then(|v| v.get("nome"))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    match field.kind {
        FieldKind::EntityLookup { target: LookupKind::Client } => {
            nested_name("cliente").unwrap_or_else(|| plain_text(row.get(field.name)))
        }
        FieldKind::EntityLookup { target } => nested_name(target.resource()).unwrap_or_default(),
        FieldKind::StatusSelect => {
            let id = record_id_from_value(row.get("status").and_then(|s| s.get("id")))
                .or_else(|| record_id_from_value(row.get("status_id")))
                .or_else(|| record_id_from_value(row.get("status")));
            id.and_then(ServiceStatus::from_id)
                .map(|s| s.label().to_string())
                .unwrap_or_default()
        }
        FieldKind::Date => format_date(&plain_text(row.get(field.name))),
        _ => plain_text(row.get(field.name)),
    }
}

fn plain_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Fields worth a column in the list
fn columns(page: Page) -> Vec<FieldSpec> {
    page.form()
        .fields
        .iter()
        .filter(|f| f.kind.stores_value() && f.kind != FieldKind::TextArea)
        .copied()
        .collect()
}

#[component]
#[allow(non_snake_case)]
pub fn EntityList(ctx: AppGlobalContext, page: Page, vm: FormViewModel) -> impl IntoView {
    let resource = page.form().endpoint;
    let limit = config().form.page_size;
    let state = RwSignal::new(ListState::<Value>::new(limit));

    let fetch = move || {
        let query = ListQuery::new(limit)
            .with_term(&ctx.term.get_untracked())
            .with_page(ctx.list_page.get_untracked());
        state.update(|s| {
            s.query = query.clone();
            s.loading = true;
        });
        spawn_local(async move {
            let transport = GlooTransport::from_config();
            let result = fetch_page::<Value, _>(&transport, resource, &query).await;
            // a newer query may have started meanwhile
            state.update(|s| {
                if s.query == query {
                    s.apply(result);
                }
            });
        });
    };

    Effect::new(move |_| {
        ctx.term.track();
        ctx.list_page.track();
        ctx.reload.track();
        fetch();
    });

    let handle_edit = move |row: Value| {
        let id = record_id_from_value(row.get("id"));
        if page != Page::Servico {
            vm.open(id, Some(row));
            return;
        }
        spawn_local(async move {
            let transport = GlooTransport::from_config();
            match load_service_for_edit(&transport, &row).await {
                Ok(record) => vm.open(id, Some(record)),
                Err(e) => {
                    log::error!("Failed to load service materials: {}", e);
                    alert("Erro ao carregar materiais deste serviço. Verifique a conexão com o servidor.");
                }
            }
        });
    };

    let handle_delete = move |id: i64| {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message("Deseja realmente excluir este registro?").ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        spawn_local(async move {
            let transport = GlooTransport::from_config();
            match delete_record(&transport, resource, id).await {
                Ok(()) => ctx.refresh(),
                Err(e) => alert(&format!("Erro ao excluir: {}", e.detail())),
            }
        });
    };

    let fields = columns(page);
    let header = fields.clone();

    view! {
        <div class="page">
            <div class="header">
                <h1 class="header__title">{page.label()}</h1>
                <div class="header__actions">
                    <input
                        type="search"
                        class="form-control"
                        placeholder="Filtrar"
                        prop:value=move || ctx.term.get()
                        on:change=move |ev| {
                            ctx.term.set(event_target_value(&ev));
                            ctx.list_page.set(1);
                        }
                    />
                    <button class="button button--primary" on:click=move |_| vm.open(None, None)>
                        "Novo"
                    </button>
                </div>
            </div>

            <table class="table">
                <thead>
                    <tr>
                        {header.iter().map(|f| view! { <th>{f.label}</th> }).collect_view()}
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        let rows = state.with(|s| s.items.clone());
                        let fields = fields.clone();
                        rows.into_iter()
                            .map(|row| {
                                let cells = fields
                                    .iter()
                                    .map(|f| view! { <td>{cell_text(&row, f)}</td> })
                                    .collect_view();
                                let id = record_id_from_value(row.get("id"));
                                view! {
                                    <tr>
                                        {cells}
                                        <td class="row-actions">
                                            <button
                                                class="button button--small"
                                                on:click=move |_| handle_edit(row.clone())
                                            >
                                                "Editar"
                                            </button>
                                            {id.map(|id| view! {
                                                <button
                                                    class="button button--small button--danger"
                                                    on:click=move |_| handle_delete(id)
                                                >
                                                    "Excluir"
                                                </button>
                                            })}
                                        </td>
                                    </tr>
                                }
                            })
                            .collect_view()
                    }}
                </tbody>
            </table>

            {move || state.with(|s| s.loading).then(|| view! { <div class="loading">"Carregando..."</div> })}

            <div class="pagination">
                <button
                    class="button button--secondary"
                    disabled=move || state.with(|s| !s.has_previous())
                    on:click=move |_| ctx.list_page.update(|p| *p = p.saturating_sub(1).max(1))
                >
                    "Anterior"
                </button>
                <span>
                    {move || state.with(|s| format!("Página {} de {}", s.query.page, s.total_pages().max(1)))}
                </span>
                <button
                    class="button button--secondary"
                    disabled=move || state.with(|s| !s.has_next())
                    on:click=move |_| ctx.list_page.update(|p| *p += 1)
                >
                    "Próxima"
                </button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::forms::SERVICE_FORM;
    use serde_json::json;

    fn field(name: &str) -> FieldSpec {
        *SERVICE_FORM.field(name).unwrap()
    }

    #[test]
    fn test_cell_text_reads_nested_records() {
        let row = json!({
            "id": 1,
            "cliente": {"id": 3, "nome": "Ana"},
            "tecnico": {"id": 4, "nome": "Bruno"},
            "status": {"id": 2},
            "data": "2024-03-15T00:00:00.000Z",
            "kilometragem": 12
        });

        assert_eq!(cell_text(&row, &field("nome")), "Ana");
        assert_eq!(cell_text(&row, &field("tecnico")), "Bruno");
        assert_eq!(cell_text(&row, &field("status")), ServiceStatus::from_id(2).unwrap().label());
        assert_eq!(cell_text(&row, &field("data")), "15/03/2024");
        assert_eq!(cell_text(&row, &field("kilometragem")), "12");
        assert_eq!(cell_text(&row, &field("empresa")), "");
    }

    #[test]
    fn test_columns_skip_line_items_and_totals() {
        let names: Vec<&str> = columns(Page::Servico).iter().map(|f| f.name).collect();
        assert!(names.contains(&"nome"));
        assert!(!names.contains(&"materiais"));
        assert!(!names.contains(&"total"));
        assert!(!names.contains(&"descricaoServico"));
    }
}

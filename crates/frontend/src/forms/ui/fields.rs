//! One renderer per field kind

use super::view_model::FormViewModel;
use crate::forms::line_items::parse_quantity;
use crate::shared::number_format::format_money;
use contracts::shared::metadata::{FieldKind, FieldSpec, LookupKind};
use contracts::shared::number::parse_float_prefix;
use contracts::shared::status::ServiceStatus;
use leptos::prelude::*;
use serde_json::Value;

#[component]
pub fn FieldRow(vm: FormViewModel, field: FieldSpec) -> impl IntoView {
    view! {
        <div class="form-group">
            <label for=field.name>
                {field.label}
                {field.required.then_some(" *")}
            </label>
            {render_field(vm, field)}
        </div>
    }
}

fn render_field(vm: FormViewModel, field: FieldSpec) -> AnyView {
    match field.kind {
        FieldKind::Text => plain_input(vm, field, "text"),
        FieldKind::Time => plain_input(vm, field, "time"),
        FieldKind::Date => plain_input(vm, field, "date"),
        FieldKind::Number => plain_input(vm, field, "number"),
        FieldKind::TextArea => text_area(vm, field),
        FieldKind::Masked { mask } => masked_input(vm, field, mask),
        FieldKind::StatusSelect => status_select(vm, field),
        FieldKind::EntityLookup { target } => lookup_input(vm, field, target),
        FieldKind::LineItemList => line_item_editor(vm),
        FieldKind::ComputedTotal => computed_total(vm),
    }
}

fn plain_input(vm: FormViewModel, field: FieldSpec, input_type: &'static str) -> AnyView {
    let session = vm.session;
    let name = field.name;
    view! {
        <input
            type=input_type
            id=name
            name=name
            class="form-control"
            prop:value=move || session.with(|s| s.draft().text(name))
            on:input=move |ev| vm.set_field(name, Value::String(event_target_value(&ev)))
        />
    }
    .into_any()
}

fn text_area(vm: FormViewModel, field: FieldSpec) -> AnyView {
    let session = vm.session;
    let name = field.name;
    view! {
        <textarea
            id=name
            class="form-control"
            rows="5"
            placeholder=field.placeholder().unwrap_or_default()
            prop:value=move || session.with(|s| s.draft().text(name))
            on:input=move |ev| vm.set_field(name, Value::String(event_target_value(&ev)))
        />
    }
    .into_any()
}

fn masked_input(vm: FormViewModel, field: FieldSpec, mask: &'static str) -> AnyView {
    let session = vm.session;
    let name = field.name;
    view! {
        <input
            type="text"
            id=name
            name=name
            class="form-control"
            placeholder=mask
            prop:value=move || session.with(|s| s.draft().text(name))
            on:input=move |ev| vm.set_masked(name, mask, &event_target_value(&ev))
        />
    }
    .into_any()
}

fn status_select(vm: FormViewModel, field: FieldSpec) -> AnyView {
    let session = vm.session;
    let name = field.name;
    view! {
        <select
            id=name
            class="form-control"
            prop:value=move || session.with(|s| s.draft().text(name))
            on:change=move |ev| {
                let value = event_target_value(&ev)
                    .parse::<i64>()
                    .map(Value::from)
                    .unwrap_or_else(|_| Value::String(String::new()));
                vm.set_field(name, value);
            }
        >
            <option value="">"Selecione o status"</option>
            {ServiceStatus::ALL
                .iter()
                .map(|status| view! { <option value=status.id().to_string()>{status.label()}</option> })
                .collect_view()}
        </select>
    }
    .into_any()
}

fn lookup_input(vm: FormViewModel, field: FieldSpec, target: LookupKind) -> AnyView {
    let session = vm.session;
    let name = field.name;
    let value = move || {
        session.with(|s| match target {
            LookupKind::Technician => s.draft().nested_text(name, "nome"),
            LookupKind::Client => s.draft().text(name),
            LookupKind::Material => s.line_input().text.clone(),
        })
    };

    view! {
        <div class="lookup">
            <input
                type="text"
                id=name
                class="form-control"
                autocomplete="off"
                placeholder=field.placeholder().unwrap_or_default()
                prop:value=value
                on:input=move |ev| vm.type_lookup(target, event_target_value(&ev))
            />
            {move || session
                .with(|s| s.lookups().is_loading(target))
                .then(|| view! { <div class="lookup-loading">"Carregando..."</div> })}
            {suggestion_list(vm, target)}
        </div>
    }
    .into_any()
}

fn suggestion_list(vm: FormViewModel, kind: LookupKind) -> impl IntoView {
    let session = vm.session;
    move || {
        let labels = session.with(|s| s.lookups().labels(kind));
        (!labels.is_empty()).then(|| {
            view! {
                <ul class="lookup-suggestions">
                    {labels
                        .into_iter()
                        .enumerate()
                        .map(|(idx, label)| view! {
                            <li role="button" on:click=move |_| vm.select(kind, idx)>{label}</li>
                        })
                        .collect_view()}
                </ul>
            }
        })
    }
}

fn line_item_editor(vm: FormViewModel) -> AnyView {
    let session = vm.session;

    let rows = move || {
        let items = session.with(|s| s.draft().line_items.clone());
        (!items.is_empty()).then(|| {
            view! {
                <table class="table table-sm line-items">
                    <thead>
                        <tr>
                            <th>"Material"</th>
                            <th>"Qtd"</th>
                            <th>"Preço"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        {items
                            .into_iter()
                            .enumerate()
                            .map(|(idx, item)| {
                                let pending = item.is_pending();
                                let price = if item.price_provisional {
                                    view! {
                                        <input
                                            type="number"
                                            step="0.01"
                                            class="form-control"
                                            placeholder="Preço"
                                            on:change=move |ev| {
                                                let raw = event_target_value(&ev);
                                                vm.set_line_item_price(idx, parse_float_prefix(&raw).unwrap_or(0.0));
                                            }
                                        />
                                    }
                                    .into_any()
                                } else {
                                    view! { <span>{format_money(item.unit_price)}</span> }.into_any()
                                };
                                view! {
                                    <tr class=if pending { "table-warning" } else { "" }>
                                        <td>
                                            {item.description.clone()}
                                            {pending.then(|| view! {
                                                <span class="badge" title="Material não cadastrado">"Novo"</span>
                                            })}
                                        </td>
                                        <td>
                                            <input
                                                type="number"
                                                min="1"
                                                class="form-control"
                                                prop:value=item.quantity.to_string()
                                                on:change=move |ev| {
                                                    vm.set_line_item_quantity(idx, parse_quantity(&event_target_value(&ev)))
                                                }
                                            />
                                        </td>
                                        <td>{price}</td>
                                        <td>
                                            <button
                                                type="button"
                                                class="material-btn remove"
                                                on:click=move |_| vm.remove_line_item(idx)
                                            >
                                                "✕"
                                            </button>
                                        </td>
                                    </tr>
                                }
                            })
                            .collect_view()}
                    </tbody>
                </table>
            }
        })
    };

    view! {
        <div class="materiais-fieldlist">
            <div class="line-item-input">
                <input
                    type="text"
                    class="form-control"
                    autocomplete="off"
                    placeholder="Busque um material"
                    prop:value=move || session.with(|s| s.line_input().text.clone())
                    on:input=move |ev| vm.type_lookup(LookupKind::Material, event_target_value(&ev))
                />
                <input
                    type="number"
                    min="1"
                    class="form-control qty"
                    placeholder="Qtd"
                    prop:value=move || session.with(|s| s.line_input().quantity.to_string())
                    on:input=move |ev| vm.set_line_input_quantity(event_target_value(&ev))
                />
                <button type="button" class="material-btn add" on:click=move |_| vm.add_line_item()>
                    "+"
                </button>
            </div>
            {suggestion_list(vm, LookupKind::Material)}
            {rows}
            <div class="line-items-total">
                <strong>"Total Materiais: "</strong>
                {move || format_money(session.with(|s| s.line_items_total()))}
            </div>
        </div>
    }
    .into_any()
}

fn computed_total(vm: FormViewModel) -> AnyView {
    let session = vm.session;
    view! {
        <input
            type="text"
            class="form-control total"
            readonly=true
            prop:value=move || format_money(session.with(|s| s.grand_total()))
        />
    }
    .into_any()
}

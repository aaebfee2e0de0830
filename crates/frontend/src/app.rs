use crate::domain::entity_list::EntityList;
use crate::forms::ui::view_model::alert;
use crate::forms::ui::{FormViewModel, RegistrationForm};
use crate::forms::FormEvent;
use crate::layout::global_context::{AppGlobalContext, Page};
use crate::shared::http::GlooTransport;
use crate::shared::search::{GlobalSearch, SearchOutcome};
use crate::shared::storage::LocalStorage;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn App() -> impl IntoView {
    let ctx = AppGlobalContext::new();
    provide_context(ctx);
    ctx.init_router_integration();

    let form_open = RwSignal::new(false);
    let on_event = Callback::new(move |event: FormEvent| match event {
        FormEvent::Opened { editing_id } => {
            log::debug!("Form opened (editing {:?})", editing_id);
            form_open.set(true);
        }
        FormEvent::Saved { record_id } => {
            log::info!("Record saved: {:?}", record_id);
            ctx.refresh();
        }
        FormEvent::Closed => form_open.set(false),
    });

    // one form per page, indexed like Page::ALL
    let forms = Page::ALL.map(|page| FormViewModel::new(page.form(), on_event));
    let form_for = move |page: Page| forms[page as usize];

    let switch_page = move |page: Page| {
        if form_open.get_untracked() {
            form_for(ctx.page.get_untracked()).cancel();
        }
        ctx.open_page(page);
    };

    view! {
        <div class="app">
            <header class="top-header">
                <nav class="top-header__nav">
                    {Page::ALL
                        .into_iter()
                        .map(|page| view! {
                            <button
                                class="nav-button"
                                class:active=move || ctx.page.get() == page
                                on:click=move |_| switch_page(page)
                            >
                                {page.label()}
                            </button>
                        })
                        .collect_view()}
                </nav>
                <GlobalSearchBox ctx=ctx />
            </header>

            <main class="content">
                {move || {
                    let page = ctx.page.get();
                    view! { <EntityList ctx=ctx page=page vm=form_for(page) /> }
                }}
            </main>

            {move || form_open.get().then(|| {
                let vm = form_for(ctx.page.get_untracked());
                view! {
                    <aside class="side-panel">
                        <RegistrationForm vm=vm />
                    </aside>
                }
            })}
        </div>
    }
}

/// Search box querying every entity at once; other matching categories are
/// offered as shortcuts until the cached search expires
#[component]
fn GlobalSearchBox(ctx: AppGlobalContext) -> impl IntoView {
    let term = RwSignal::new(String::new());
    let others = RwSignal::new(GlobalSearch::new(LocalStorage).last_search());
    // only the latest scheduled reset may fire
    let reset_epoch = RwSignal::new(0u32);

    let schedule_reset = move |delay_ms: u32| {
        let epoch = reset_epoch.get_untracked().wrapping_add(1);
        reset_epoch.set(epoch);
        spawn_local(async move {
            TimeoutFuture::new(delay_ms).await;
            if reset_epoch.get_untracked() != epoch {
                return;
            }
            GlobalSearch::new(LocalStorage).clear();
            term.set(String::new());
            others.set(None);
        });
    };

    let run_search = move || {
        let text = term.get_untracked();
        spawn_local(async move {
            let search = GlobalSearch::new(LocalStorage);
            let transport = GlooTransport::from_config();
            match search.search(&transport, &text).await {
                Ok(SearchOutcome::Ignored) => {}
                Ok(SearchOutcome::NoResults) => {
                    others.set(None);
                    term.set(String::new());
                    alert("Nenhum resultado encontrado");
                }
                Ok(SearchOutcome::Navigate {
                    route,
                    others: rest,
                    clear_after_ms,
                }) => {
                    ctx.navigate(&route);
                    others.set(rest);
                    schedule_reset(clear_after_ms);
                }
                Err(e) => {
                    log::error!("Global search failed: {}", e);
                    alert("Erro ao buscar.");
                }
            }
        });
    };

    let visit = move |category: String| {
        let visit = GlobalSearch::new(LocalStorage).visit_category(&category, &term.get_untracked());
        ctx.navigate(&visit.route);
        others.update(|o| {
            if let Some(last) = o {
                last.outros.remove(&category);
            }
            if o.as_ref().is_some_and(|last| last.outros.is_empty()) {
                *o = None;
            }
        });
        if let Some(delay) = visit.clear_after_ms {
            schedule_reset(delay);
        }
    };

    view! {
        <div class="global-search">
            <input
                type="search"
                class="form-control"
                placeholder="Buscar..."
                prop:value=move || term.get()
                on:input=move |ev| term.set(event_target_value(&ev))
                on:keydown=move |ev: leptos::ev::KeyboardEvent| {
                    if ev.key() == "Enter" {
                        ev.prevent_default();
                        run_search();
                    }
                }
            />
            <button class="button button--primary" on:click=move |_| run_search()>
                "Buscar"
            </button>
            {move || others.get().map(|last| {
                let badge = last.total_hits();
                view! {
                    <div class="global-search__others">
                        <span class="badge">{badge}</span>
                        <ul>
                            {last
                                .outros
                                .into_iter()
                                .map(|(category, hits)| {
                                    let label = format!("{} ({})", category, hits);
                                    view! {
                                        <li role="button" on:click=move |_| visit(category.clone())>{label}</li>
                                    }
                                })
                                .collect_view()}
                        </ul>
                    </div>
                }
            })}
        </div>
    }
}

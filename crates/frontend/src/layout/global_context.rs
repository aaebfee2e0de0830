use contracts::forms::{FormSpec, CLIENT_FORM, MATERIAL_FORM, SERVICE_FORM, TECHNICIAN_FORM};
use leptos::prelude::Effect;
use leptos::prelude::*;
use serde::{Deserialize, Serialize};
use web_sys::window;

/// Entity list pages, addressed as `/{slug}?termo=..&page=..`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Clientes,
    Tecnicos,
    Materiais,
    Servico,
}

impl Page {
    pub const ALL: [Page; 4] = [Self::Clientes, Self::Tecnicos, Self::Materiais, Self::Servico];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Clientes => "clientes",
            Self::Tecnicos => "tecnicos",
            Self::Materiais => "materiais",
            Self::Servico => "servico",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.slug() == slug)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Clientes => "Clientes",
            Self::Tecnicos => "Técnicos",
            Self::Materiais => "Materiais",
            Self::Servico => "Serviços",
        }
    }

    pub fn form(&self) -> FormSpec {
        match self {
            Self::Clientes => CLIENT_FORM,
            Self::Tecnicos => TECHNICIAN_FORM,
            Self::Materiais => MATERIAL_FORM,
            Self::Servico => SERVICE_FORM,
        }
    }
}

/// Query part of a page route
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// Split `/clientes?termo=ana&page=1` into its page and query
pub fn parse_route(route: &str) -> Option<(Page, RouteQuery)> {
    let (path, search) = route.split_once('?').unwrap_or((route, ""));
    let page = Page::from_slug(path.trim_matches('/'))?;
    let query = serde_qs::from_str(search).unwrap_or_else(|e| {
        log::warn!("Ignoring malformed route query '{}': {}", search, e);
        RouteQuery::default()
    });
    Some((page, query))
}

pub fn page_route(page: Page, query: &RouteQuery) -> String {
    match serde_qs::to_string(query) {
        Ok(qs) if !qs.is_empty() => format!("/{}?{}", page.slug(), qs),
        _ => format!("/{}", page.slug()),
    }
}

#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub page: RwSignal<Page>,
    /// Filter of the current list, set by the list search box or a global search
    pub term: RwSignal<String>,
    pub list_page: RwSignal<u32>,
    /// Bumped after a save or delete so lists reload
    pub reload: RwSignal<u32>,
}

impl AppGlobalContext {
    pub fn new() -> Self {
        Self {
            page: RwSignal::new(Page::Servico),
            term: RwSignal::new(String::new()),
            list_page: RwSignal::new(1),
            reload: RwSignal::new(0),
        }
    }

    pub fn open_page(&self, page: Page) {
        self.page.set(page);
        self.term.set(String::new());
        self.list_page.set(1);
    }

    /// Follow a route produced by the global search
    pub fn navigate(&self, route: &str) {
        match parse_route(route) {
            Some((page, query)) => {
                self.page.set(page);
                self.term.set(query.termo.unwrap_or_default());
                self.list_page.set(query.page.unwrap_or(1).max(1));
            }
            None => log::warn!("Unknown route '{}'", route),
        }
    }

    pub fn refresh(&self) {
        self.reload.update(|n| *n = n.wrapping_add(1));
    }

    /// Restore the page from the address bar, then keep the address bar in sync
    pub fn init_router_integration(&self) {
        let current = window()
            .and_then(|w| {
                let location = w.location();
                Some(format!("{}{}", location.pathname().ok()?, location.search().ok()?))
            })
            .unwrap_or_default();
        if parse_route(&current).is_some() {
            self.navigate(&current);
        }

        let this = *self;
        Effect::new(move |_| {
            let term = this.term.get();
            let query = RouteQuery {
                termo: (!term.is_empty()).then_some(term),
                page: Some(this.list_page.get()),
            };
            let new_url = page_route(this.page.get(), &query);

            if let Some(w) = window() {
                if let Ok(history) = w.history() {
                    let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&new_url));
                }
            }
        });
    }
}

impl Default for AppGlobalContext {
    fn default() -> Self {
        Self::new()
    }
}

//! Related-entity lookup (client, technician, material) behind the form inputs

use crate::shared::api_utils::search_path;
use crate::shared::http::{get_json, ApiTransport};
use contracts::domain::a001_client::Client;
use contracts::domain::a002_technician::Technician;
use contracts::domain::a003_material::Material;
use contracts::shared::listing::Listing;
use contracts::shared::metadata::LookupKind;
use serde::de::DeserializeOwned;

/// Record type a lookup field searches for
pub trait LookupTarget: DeserializeOwned {
    const KIND: LookupKind;

    /// Line shown in the suggestion list
    fn suggestion_label(&self) -> String;
}

impl LookupTarget for Client {
    const KIND: LookupKind = LookupKind::Client;

    fn suggestion_label(&self) -> String {
        self.display_label()
    }
}

impl LookupTarget for Technician {
    const KIND: LookupKind = LookupKind::Technician;

    fn suggestion_label(&self) -> String {
        self.display_label()
    }
}

impl LookupTarget for Material {
    const KIND: LookupKind = LookupKind::Material;

    fn suggestion_label(&self) -> String {
        self.display_label()
    }
}

/// Query text, loading flag and current suggestions of one lookup input
#[derive(Debug, Clone, PartialEq)]
pub struct LookupSlot<T> {
    pub query: String,
    pub loading: bool,
    pub suggestions: Vec<T>,
}

impl<T> Default for LookupSlot<T> {
    fn default() -> Self {
        Self {
            query: String::new(),
            loading: false,
            suggestions: Vec::new(),
        }
    }
}

impl<T: LookupTarget> LookupSlot<T> {
    pub fn labels(&self) -> Vec<String> {
        self.suggestions.iter().map(LookupTarget::suggestion_label).collect()
    }
}

impl<T> LookupSlot<T> {
    pub fn clear(&mut self) {
        self.loading = false;
        self.suggestions.clear();
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lookups {
    pub client: LookupSlot<Client>,
    pub technician: LookupSlot<Technician>,
    pub material: LookupSlot<Material>,
}

impl Lookups {
    pub fn start(&mut self, kind: LookupKind, query: &str) {
        let query = query.to_string();
        match kind {
            LookupKind::Client => set_loading(&mut self.client, query),
            LookupKind::Technician => set_loading(&mut self.technician, query),
            LookupKind::Material => set_loading(&mut self.material, query),
        }
    }

    pub fn clear(&mut self, kind: LookupKind, query: &str) {
        let query = query.to_string();
        match kind {
            LookupKind::Client => reset(&mut self.client, query),
            LookupKind::Technician => reset(&mut self.technician, query),
            LookupKind::Material => reset(&mut self.material, query),
        }
    }

    pub fn query(&self, kind: LookupKind) -> &str {
        match kind {
            LookupKind::Client => &self.client.query,
            LookupKind::Technician => &self.technician.query,
            LookupKind::Material => &self.material.query,
        }
    }

    pub fn is_loading(&self, kind: LookupKind) -> bool {
        match kind {
            LookupKind::Client => self.client.loading,
            LookupKind::Technician => self.technician.loading,
            LookupKind::Material => self.material.loading,
        }
    }

    pub fn labels(&self, kind: LookupKind) -> Vec<String> {
        match kind {
            LookupKind::Client => self.client.labels(),
            LookupKind::Technician => self.technician.labels(),
            LookupKind::Material => self.material.labels(),
        }
    }

    /// Store fetched suggestions in the slot of their kind
    pub fn fill(&mut self, suggestions: Suggestions) {
        match suggestions {
            Suggestions::Clients(items) => fill(&mut self.client, items),
            Suggestions::Technicians(items) => fill(&mut self.technician, items),
            Suggestions::Materials(items) => fill(&mut self.material, items),
        }
    }
}

fn set_loading<T>(slot: &mut LookupSlot<T>, query: String) {
    slot.query = query;
    slot.loading = true;
}

fn reset<T>(slot: &mut LookupSlot<T>, query: String) {
    slot.query = query;
    slot.clear();
}

fn fill<T>(slot: &mut LookupSlot<T>, items: Vec<T>) {
    slot.suggestions = items;
    slot.loading = false;
}

/// A search to run for one lookup input
#[derive(Debug, Clone, PartialEq)]
pub struct LookupRequest {
    pub kind: LookupKind,
    pub query: String,
    /// Session generation the request belongs to
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Suggestions {
    Clients(Vec<Client>),
    Technicians(Vec<Technician>),
    Materials(Vec<Material>),
}

impl Suggestions {
    pub fn kind(&self) -> LookupKind {
        match self {
            Self::Clients(_) => LookupKind::Client,
            Self::Technicians(_) => LookupKind::Technician,
            Self::Materials(_) => LookupKind::Material,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Clients(items) => items.len(),
            Self::Technicians(items) => items.len(),
            Self::Materials(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Run a lookup search. Failures and non-2xx answers give no suggestions.
pub async fn fetch_suggestions<T>(transport: &T, request: &LookupRequest) -> Suggestions
where
    T: ApiTransport + ?Sized,
{
    match request.kind {
        LookupKind::Client => Suggestions::Clients(search(transport, &request.query).await),
        LookupKind::Technician => Suggestions::Technicians(search(transport, &request.query).await),
        LookupKind::Material => Suggestions::Materials(search(transport, &request.query).await),
    }
}

async fn search<R, T>(transport: &T, query: &str) -> Vec<R>
where
    R: LookupTarget,
    T: ApiTransport + ?Sized,
{
    let path = search_path(R::KIND.resource(), query);
    match get_json::<Listing<R>, _>(transport, path).await {
        Ok(listing) => listing.into_items(),
        Err(e) => {
            log::warn!("{} lookup '{}' failed: {}", R::KIND.as_str(), query, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::http::testing::FakeTransport;
    use crate::shared::http::Method;
    use serde_json::json;

    fn request(kind: LookupKind, query: &str) -> LookupRequest {
        LookupRequest {
            kind,
            query: query.into(),
            generation: 1,
        }
    }

    #[tokio::test]
    async fn test_fetch_client_suggestions() {
        let transport = FakeTransport::new();
        transport.respond_json(
            Method::Get,
            "/api/cliente/search?termo=an",
            200,
            json!([{"id": 1, "nome": "Ana", "empresa": "ACME"}, {"id": 2, "nome": "Andre"}]),
        );

        let suggestions = fetch_suggestions(&transport, &request(LookupKind::Client, "an")).await;
        let mut lookups = Lookups::default();
        lookups.fill(suggestions);
        assert_eq!(lookups.labels(LookupKind::Client), vec!["Ana - ACME", "Andre"]);
    }

    #[tokio::test]
    async fn test_paged_envelope_is_accepted() {
        let transport = FakeTransport::new();
        transport.respond_json(
            Method::Get,
            "/api/material/search?termo=cabo",
            200,
            json!({"data": [{"id": 3, "descricao": "Cabo", "preco": 2}], "total": 1}),
        );
        let suggestions = fetch_suggestions(&transport, &request(LookupKind::Material, "cabo")).await;
        assert_eq!(suggestions.kind(), LookupKind::Material);
        assert_eq!(suggestions.len(), 1);
    }

    #[tokio::test]
    async fn test_string_ids_are_accepted() {
        let transport = FakeTransport::new();
        transport.respond_json(
            Method::Get,
            "/api/material/search?termo=cab",
            200,
            json!([{"id": 3, "descricao": "Cabo"}, {"id": "4", "descricao": "Cabo flex"}]),
        );
        let suggestions = fetch_suggestions(&transport, &request(LookupKind::Material, "cab")).await;
        let Suggestions::Materials(materials) = suggestions else {
            panic!("expected materials");
        };
        let ids: Vec<_> = materials.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 4]);
    }

    #[tokio::test]
    async fn test_failures_soft_fail_to_empty() {
        let transport = FakeTransport::new();
        transport.respond(Method::Get, "/api/tecnico/search?termo=jo", 404, "nenhum");
        transport.fail(Method::Get, "/api/cliente/search?termo=jo", "offline");
        transport.respond(Method::Get, "/api/material/search?termo=jo", 200, "<html>");

        for kind in LookupKind::ALL {
            let suggestions = fetch_suggestions(&transport, &request(kind, "jo")).await;
            assert!(suggestions.is_empty(), "{}", kind.as_str());
        }
    }

    #[test]
    fn test_clear_resets_loading() {
        let mut lookups = Lookups::default();
        lookups.start(LookupKind::Technician, "jo");
        assert!(lookups.is_loading(LookupKind::Technician));
        lookups.clear(LookupKind::Technician, "j");
        assert!(!lookups.is_loading(LookupKind::Technician));
        assert_eq!(lookups.query(LookupKind::Technician), "j");
    }
}

//! Global search across every entity list
//!
//! `GET /api/search?termo=..` answers `{category: [records]}`. The first
//! category with results is opened; the others are remembered under a single
//! storage key so the user can jump to them until the cache expires.

use crate::shared::http::{get_json, ApiError, ApiTransport};
use crate::shared::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Storage key of the one cached search
pub const LAST_SEARCH_KEY: &str = "ultimaBusca";

/// Cache lifetime while more than one category matched
pub const MULTI_CATEGORY_CLEAR_MS: u32 = 15_000;
/// Delay before the search box resets when a single category matched
pub const SINGLE_CATEGORY_CLEAR_MS: u32 = 5_000;
/// Delay before the search box resets once the last remaining category is visited
pub const LAST_CATEGORY_CLEAR_MS: u32 = 3_000;

/// Cached term plus the categories not opened yet, with their hit counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastSearch {
    pub termo: String,
    pub outros: Map<String, Value>,
}

impl LastSearch {
    pub fn categories(&self) -> Vec<&str> {
        self.outros.keys().map(String::as_str).collect()
    }

    /// Sum of the remaining hits, shown as a badge
    pub fn total_hits(&self) -> u64 {
        self.outros.values().filter_map(Value::as_u64).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Blank term, nothing was sent
    Ignored,
    NoResults,
    Navigate {
        route: String,
        /// Other categories with hits, when there are any
        others: Option<LastSearch>,
        clear_after_ms: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryVisit {
    pub route: String,
    /// Set when the search state should be reset after this delay
    pub clear_after_ms: Option<u32>,
}

/// Route of an entity list filtered by `term`, first page
pub fn category_route(category: &str, term: &str) -> String {
    format!("/{}?termo={}&page=1", category, urlencoding::encode(term))
}

pub struct GlobalSearch<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> GlobalSearch<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn search<T>(&self, transport: &T, term: &str) -> Result<SearchOutcome, ApiError>
    where
        T: ApiTransport + ?Sized,
    {
        let term = term.trim();
        if term.is_empty() {
            return Ok(SearchOutcome::Ignored);
        }
        let path = format!("/api/search?termo={}", urlencoding::encode(term));
        let results: Map<String, Value> = get_json(transport, path).await?;
        Ok(self.apply_results(term, &results))
    }

    /// Pick the navigation target and update the cache from a search response
    pub fn apply_results(&self, term: &str, results: &Map<String, Value>) -> SearchOutcome {
        let mut hits = results.iter().filter_map(|(category, value)| match value {
            Value::Array(items) if !items.is_empty() => Some((category, items.len())),
            _ => None,
        });

        let Some((first, _)) = hits.next() else {
            log::info!("Global search '{}' found nothing", term);
            self.clear();
            return SearchOutcome::NoResults;
        };

        let outros: Map<String, Value> = hits.map(|(c, n)| (c.clone(), Value::from(n))).collect();
        let route = category_route(first, term);

        if outros.is_empty() {
            self.clear();
            return SearchOutcome::Navigate {
                route,
                others: None,
                clear_after_ms: SINGLE_CATEGORY_CLEAR_MS,
            };
        }

        let last = LastSearch {
            termo: term.to_string(),
            outros,
        };
        self.save(&last);
        SearchOutcome::Navigate {
            route,
            others: Some(last),
            clear_after_ms: MULTI_CATEGORY_CLEAR_MS,
        }
    }

    /// Open one of the remembered categories; the cache drops it and is
    /// removed once nothing is left
    pub fn visit_category(&self, category: &str, current_term: &str) -> CategoryVisit {
        let Some(mut last) = self.last_search() else {
            return CategoryVisit {
                route: category_route(category, current_term),
                clear_after_ms: None,
            };
        };

        let route = category_route(category, &last.termo);
        last.outros.remove(category);
        if last.outros.is_empty() {
            self.clear();
            CategoryVisit {
                route,
                clear_after_ms: Some(LAST_CATEGORY_CLEAR_MS),
            }
        } else {
            self.save(&last);
            CategoryVisit {
                route,
                clear_after_ms: Some(MULTI_CATEGORY_CLEAR_MS),
            }
        }
    }

    pub fn last_search(&self) -> Option<LastSearch> {
        let raw = self.store.get(LAST_SEARCH_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(last) => Some(last),
            Err(e) => {
                log::warn!("Discarding unreadable cached search: {}", e);
                self.clear();
                None
            }
        }
    }

    pub fn clear(&self) {
        self.store.remove(LAST_SEARCH_KEY);
    }

    fn save(&self, last: &LastSearch) {
        match serde_json::to_string(last) {
            Ok(raw) => self.store.set(LAST_SEARCH_KEY, &raw),
            Err(e) => log::error!("Failed to cache search: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::http::testing::FakeTransport;
    use crate::shared::http::Method;
    use crate::shared::storage::MemoryStore;
    use serde_json::json;

    fn results(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_first_category_is_target_and_rest_cached() {
        let store = MemoryStore::default();
        let search = GlobalSearch::new(&store);
        let outcome = search.apply_results(
            "cabo",
            &results(json!({
                "clientes": [],
                "materiais": [{"id": 1}, {"id": 2}],
                "servicos": [{"id": 9}],
                "tecnicos": [{"id": 3}, {"id": 4}, {"id": 5}]
            })),
        );

        let SearchOutcome::Navigate { route, others, clear_after_ms } = outcome else {
            panic!("expected navigation");
        };
        assert_eq!(route, "/materiais?termo=cabo&page=1");
        assert_eq!(clear_after_ms, MULTI_CATEGORY_CLEAR_MS);
        let others = others.unwrap();
        assert_eq!(others.categories(), vec!["servicos", "tecnicos"]);
        assert_eq!(others.total_hits(), 4);
        assert_eq!(search.last_search(), Some(others));
    }

    #[test]
    fn test_single_category_is_not_cached() {
        let store = MemoryStore::default();
        store.set(LAST_SEARCH_KEY, r#"{"termo":"velho","outros":{"clientes":1}}"#);
        let search = GlobalSearch::new(&store);

        let outcome = search.apply_results("ana", &results(json!({"clientes": [{"id": 1}]})));
        assert_eq!(
            outcome,
            SearchOutcome::Navigate {
                route: "/clientes?termo=ana&page=1".into(),
                others: None,
                clear_after_ms: SINGLE_CATEGORY_CLEAR_MS,
            }
        );
        assert_eq!(store.get(LAST_SEARCH_KEY), None);
    }

    #[test]
    fn test_no_results_clears_cache() {
        let store = MemoryStore::default();
        store.set(LAST_SEARCH_KEY, r#"{"termo":"x","outros":{"clientes":1}}"#);
        let search = GlobalSearch::new(&store);
        let outcome = search.apply_results("zzz", &results(json!({"clientes": [], "materiais": []})));
        assert_eq!(outcome, SearchOutcome::NoResults);
        assert_eq!(search.last_search(), None);
    }

    #[test]
    fn test_visiting_categories_drains_cache() {
        let store = MemoryStore::default();
        let search = GlobalSearch::new(&store);
        search.apply_results(
            "fio",
            &results(json!({"materiais": [1], "servicos": [1], "clientes": [1, 2]})),
        );

        let visit = search.visit_category("servicos", "");
        assert_eq!(visit.route, "/servicos?termo=fio&page=1");
        assert_eq!(visit.clear_after_ms, Some(MULTI_CATEGORY_CLEAR_MS));
        assert_eq!(search.last_search().unwrap().categories(), vec!["clientes"]);

        let visit = search.visit_category("clientes", "");
        assert_eq!(visit.clear_after_ms, Some(LAST_CATEGORY_CLEAR_MS));
        assert_eq!(search.last_search(), None);

        let visit = search.visit_category("clientes", "outro termo");
        assert_eq!(visit.route, "/clientes?termo=outro%20termo&page=1");
        assert_eq!(visit.clear_after_ms, None);
    }

    #[tokio::test]
    async fn test_blank_term_sends_nothing() {
        let transport = FakeTransport::new();
        let search = GlobalSearch::new(MemoryStore::default());
        assert_eq!(search.search(&transport, "   ").await, Ok(SearchOutcome::Ignored));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_search_request_and_failure() {
        let transport = FakeTransport::new();
        transport.respond_json(
            Method::Get,
            "/api/search?termo=cabo%20hdmi",
            200,
            json!({"materiais": [{"id": 1}]}),
        );
        transport.fail(Method::Get, "/api/search?termo=x", "offline");
        let search = GlobalSearch::new(MemoryStore::default());

        let outcome = search.search(&transport, " cabo hdmi ").await.unwrap();
        assert!(matches!(outcome, SearchOutcome::Navigate { others: None, .. }));
        assert!(search.search(&transport, "x").await.is_err());
    }
}

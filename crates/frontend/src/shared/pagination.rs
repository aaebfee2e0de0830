//! Paginated entity lists (`/api/{resource}?page&limit` and its search twin)

use crate::shared::api_utils::{record_path, resource_path};
use crate::shared::http::{send_checked, ApiError, ApiRequest, ApiTransport};
use contracts::domain::common::RecordId;
use contracts::shared::listing::Listing;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Query of one list page. Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termo: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl ListQuery {
    pub fn new(limit: u32) -> Self {
        Self {
            termo: None,
            page: 1,
            limit: limit.max(1),
        }
    }

    pub fn with_term(mut self, term: &str) -> Self {
        let term = term.trim();
        self.termo = (!term.is_empty()).then(|| term.to_string());
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Search route when a term is set, plain listing otherwise
    pub fn path(&self, resource: &str) -> String {
        let base = match self.termo {
            Some(_) => format!("{}/search", resource_path(resource)),
            None => resource_path(resource),
        };
        match serde_qs::to_string(self) {
            Ok(qs) => format!("{}?{}", base, qs),
            Err(e) => {
                log::warn!("Failed to encode list query: {}", e);
                format!("{}?page={}&limit={}", base, self.page, self.limit)
            }
        }
    }
}

/// Number of pages needed for `total` records
pub fn total_pages(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit as u64) as u32
}

/// Items of the current page plus the pager state
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    pub query: ListQuery,
    pub items: Vec<T>,
    pub total: u64,
    pub loading: bool,
}

impl<T> ListState<T> {
    pub fn new(limit: u32) -> Self {
        Self {
            query: ListQuery::new(limit),
            items: Vec::new(),
            total: 0,
            loading: false,
        }
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total, self.query.limit)
    }

    pub fn has_previous(&self) -> bool {
        self.query.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.query.page < self.total_pages()
    }

    /// Store a load result; failures degrade to an empty list
    pub fn apply(&mut self, result: Result<Listing<T>, ApiError>) {
        self.loading = false;
        match result {
            Ok(listing) => {
                self.total = listing.total();
                self.items = listing.into_items();
            }
            Err(e) => {
                log::error!("Failed to load list page: {}", e);
                self.items.clear();
                self.total = 0;
            }
        }
    }
}

pub async fn fetch_page<R, T>(transport: &T, resource: &str, query: &ListQuery) -> Result<Listing<R>, ApiError>
where
    R: DeserializeOwned,
    T: ApiTransport + ?Sized,
{
    let response = send_checked(transport, ApiRequest::get(query.path(resource))).await?;
    response.json()
}

/// `DELETE /api/{resource}/{id}`
pub async fn delete_record<T>(transport: &T, resource: &str, id: RecordId) -> Result<(), ApiError>
where
    T: ApiTransport + ?Sized,
{
    send_checked(transport, ApiRequest::delete(record_path(resource, id))).await?;
    log::info!("Deleted {} {}", resource, id);
    Ok(())
}

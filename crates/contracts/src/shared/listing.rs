//! List responses: the backend answers either a page envelope or a bare array

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Page {
        data: Vec<T>,
        #[serde(default)]
        total: Option<u64>,
    },
    Plain(Vec<T>),
}

impl<T> Listing<T> {
    /// Total number of matching records across all pages
    pub fn total(&self) -> u64 {
        match self {
            Self::Page { total, .. } => total.unwrap_or(0),
            Self::Plain(items) => items.len() as u64,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Page { data, .. } => data,
            Self::Plain(items) => items,
        }
    }
}

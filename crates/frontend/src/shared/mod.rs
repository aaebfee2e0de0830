pub mod api_utils;
pub mod config;
pub mod date_utils;
pub mod http;
pub mod number_format;
pub mod pagination;
pub mod search;
pub mod storage;

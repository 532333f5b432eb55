//! Credit lookup form library
//!
//! Provides the client for the credit API (lookup by NFS-e number or by credit
//! number), the search form state, and the server-rendered page hosting it.
//!
//! # Modules
//!
//! - `client`: HTTP client for the credit API.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers and router.
//! - `models`: Credit record and search mode.
//! - `render`: HTML rendering of the search page.
//! - `view`: Search form state and the search/clear operations.

pub mod client;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod render;
pub mod view;

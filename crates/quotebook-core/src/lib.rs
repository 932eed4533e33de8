//! quotebook-core - Core library for Quotebook
//!
//! This crate contains the quote model, the key/value persistence layer, the
//! in-memory repository, and the engine that keeps the local collection in
//! sync with a remote source. The CLI is a thin presentation layer on top.

pub mod categories;
pub mod config;
pub mod error;
pub mod models;
pub mod remote;
pub mod repository;
pub mod services;
pub mod store;
pub mod sync;
pub mod transfer;
pub mod util;

pub use categories::CategoryFilter;
pub use error::{Error, Result};
pub use models::Quote;
pub use repository::QuoteRepository;
pub use services::QuoteService;

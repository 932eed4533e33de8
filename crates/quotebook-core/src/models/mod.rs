//! Data models for Quotebook

mod quote;

pub use quote::{default_quotes, Quote};

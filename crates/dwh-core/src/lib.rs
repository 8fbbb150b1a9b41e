//! Core types and trait definitions for the dwh warehouse loader.
//!
//! This crate is free of database dependencies. Backends implement
//! [`store::SourceStore`] and [`store::WarehouseStore`]; the extractor, the
//! idempotent loader and the [`Pipeline`] are written against those traits.

// Native `async fn` in trait impls; the traits spell out `Send` futures.
#![allow(async_fn_in_trait)]

pub mod config;
pub mod entity;
pub mod error;
pub mod extract;
pub mod load;
pub mod pipeline;
pub mod store;

pub use error::{Error, Result};
pub use pipeline::{Pipeline, RunReport};

//! Post Service
//!
//! Media ingestion pipeline for the Prism content-sharing platform:
//! multipart upload intake, external media storage, post persistence,
//! and tag reconciliation.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod services;

// Public re-exports
pub use config::Config;
pub use error::{AppError, Result};

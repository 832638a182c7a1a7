//! Async controller, presentation adapter and source ingestion.

pub mod controller;
pub mod ingestion;
pub mod presentation;

//! HTTP client for the Storyquest chapter generation service.
//!
//! Implements the `ChapterService` and `SourceIngestion` seams from
//! `storyquest-core` over JSON/multipart HTTP.

pub mod config;
pub mod http;

pub use config::{ClientConfig, ConfigError};
pub use http::HttpChapterService;

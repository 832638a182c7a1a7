//! Chapter request orchestration.

pub mod orchestrator;

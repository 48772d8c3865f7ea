//! LegalEase Core Library
//!
//! Orchestrates multilingual legal questions across a retrieval-augmented
//! knowledge backend, a direct completion fallback and a speech/translation
//! suite, including configuration, service discovery and telemetry.

pub mod config;
pub mod context;
pub mod http;
pub mod language;
pub mod orchestrator;
pub mod pipeline;
pub mod services;
pub mod telemetry;

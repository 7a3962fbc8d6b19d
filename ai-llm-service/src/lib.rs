//! Shared LLM service layer: providers, profiles, health checks.
//!
//! Two active profiles are exposed through [`service_profiles::LlmServiceProfiles`]:
//! - **answer**    → text generation for final answers
//! - **embedding** → semantic embedding vectors (single and batch)
//!
//! Providers implemented: local Ollama and any OpenAI-compatible API.
//! All fallible paths return the unified [`error_handler::AiLlmError`].

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;

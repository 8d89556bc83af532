// STAR report generation.
// Implements: competency reference data, prompt building, response parsing, orchestration.
// All completion calls go through llm_client::CompletionProvider; no direct HTTP calls here.

pub mod competencies;
pub mod generator;
pub mod handlers;
pub mod parser;
pub mod prompts;

//! Integration Tests Module
//!
//! End-to-end tests over the public library surface: context assembly,
//! conversation lifecycle, message pagination, the streaming chat
//! session, and the extraction engine. Model calls go through a scripted
//! gateway so no network is touched.

// Shared fixtures and the scripted gateway
mod common;

// Mode-aware context assembly tests
mod context_test;

// Conversation lifecycle and archival tests
mod lifecycle_test;


// Streaming chat session tests
mod chat_test;

// Extraction engine tests
mod extraction_test;

//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate session, gate, schema and transport into use-case APIs.
//! - Keep UI/FFI and CLI layers free of flow bookkeeping.

pub mod form_flow;

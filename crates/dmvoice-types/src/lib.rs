//! Shared domain types for dmvoice.
//!
//! This crate contains the core domain types used across the dmvoice service:
//! audio clips, transcripts, speaker matches, intent decisions, knowledge
//! entries, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod audio;
pub mod config;
pub mod error;
pub mod intent;
pub mod knowledge;
pub mod speaker;

//! Request handlers, one module per endpoint group.

pub mod health;
pub mod intent;
pub mod knowledge;
pub mod speaker;
pub mod synthesize;
pub mod transcribe;

//! HTTP layer: router, error mapping, and request handlers.

pub mod error;
pub mod handlers;
pub mod router;

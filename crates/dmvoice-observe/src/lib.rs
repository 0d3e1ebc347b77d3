//! Observability setup for dmvoice.

pub mod tracing_setup;

//! Engine traits and session services for dmvoice.
//!
//! This crate defines the "ports" (model-engine traits) that the
//! infrastructure layer implements, plus the small amount of service logic
//! the HTTP layer composes: intent detection over trigger phrases, the
//! in-memory speaker registry, and knowledge upsert/search. It depends only
//! on `dmvoice-types` -- never on `dmvoice-infra` or any model/IO crate.

pub mod asr;
pub mod embed;
pub mod intent;
pub mod knowledge;
pub mod speaker;
pub mod tts;

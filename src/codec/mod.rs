//! High-level codec API
//!
//! Owns the subject binding of one event type and guarantees its deletion.

mod lifecycle;
mod scope;
mod state;

pub use lifecycle::Codec;
pub use scope::with_codec;
pub use state::CodecState;

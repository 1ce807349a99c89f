//! Codec lifecycle state

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Codec lifecycle state
///
/// `Uninitialized` and `Registering` only exist while a constructor runs and
/// show up in its log events. A [`Codec`](super::Codec) value is always
/// `Ready` or `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CodecState {
    /// Nothing resolved or registered yet
    Uninitialized = 0,
    /// Type resolved, registration in flight
    Registering = 1,
    /// Subject bound, encode/decode allowed
    Ready = 2,
    /// Teardown issued
    Closed = 3,
}

impl CodecState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => CodecState::Uninitialized,
            1 => CodecState::Registering,
            2 => CodecState::Ready,
            _ => CodecState::Closed,
        }
    }
}

impl fmt::Display for CodecState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CodecState::Uninitialized => "uninitialized",
            CodecState::Registering => "registering",
            CodecState::Ready => "ready",
            CodecState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Lock-free state cell shared by concurrent callers
#[derive(Debug)]
pub(crate) struct AtomicState(AtomicU8);

impl AtomicState {
    pub(crate) fn new(state: CodecState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    pub(crate) fn load(&self) -> CodecState {
        CodecState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Move from `from` to `to`; only one caller can win a given transition
    pub(crate) fn transition(&self, from: CodecState, to: CodecState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

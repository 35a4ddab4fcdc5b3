//! Shared foundational types used across the Vela simulation kernel.
//!
//! This crate provides the 2-state [`Bits`] value carried by every simulated
//! signal, interned identifiers for debug names, and content hashing used to
//! fingerprint output traces.

#![warn(missing_docs)]

pub mod bits;
pub mod hash;
pub mod ident;

pub use bits::{Bits, MAX_WIDTH};
pub use hash::{ContentHash, TraceHasher};
pub use ident::{Ident, Interner};

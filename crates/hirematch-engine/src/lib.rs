//! Matching and conversation rules for the recruitment marketplace.
//!
//! Every operation takes the store and the caller explicitly. A `None` caller is an
//! unauthenticated request; a caller with the wrong role is refused before any
//! store access.

pub mod access;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod matching;
pub mod profiles;

pub use error::{EngineError, Result};

#[cfg(test)]
pub(crate) mod test_support;

//! Base types and error handling.
//!
//! - [`error`]: [`ResolveError`](error::ResolveError) and the per-server failure types
//! - [`context`]: helpers attaching server context to IO and timeout errors

pub mod context;
pub mod error;

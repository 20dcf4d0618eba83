//! Application services shared by the use cases.

/// Scoped session acquisition.
pub mod session_scope;

pub use session_scope::with_session;

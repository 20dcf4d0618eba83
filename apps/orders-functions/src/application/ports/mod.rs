//! Application Ports (Driven)
//!
//! Ports define the interfaces the use cases need from the outside world.
//! The only driven port is the table store session.

mod session_port;

pub use session_port::{ResultSet, Session, SessionProvider, Statement, StoreError};

//! Scoped session acquisition.
//!
//! [`with_session`] acquires a session, runs one operation against it,
//! releases the session on every exit path and hands the operation's value
//! back to the caller.

use futures::future::BoxFuture;

use crate::application::ports::{Session, SessionProvider, StoreError};

/// Run `operation` inside a freshly acquired session.
///
/// The session is closed whether the operation succeeds or fails. No close
/// is attempted when acquisition itself fails. A failed close is logged and
/// does not override the operation's result.
///
/// ```ignore
/// let result = with_session(provider, move |session| {
///     Box::pin(async move { session.execute(&statement).await })
/// })
/// .await?;
/// ```
pub async fn with_session<P, T, F>(provider: &P, operation: F) -> Result<T, StoreError>
where
    P: SessionProvider + ?Sized,
    T: Send,
    F: for<'s> FnOnce(&'s mut P::Session) -> BoxFuture<'s, Result<T, StoreError>> + Send,
{
    let mut session = provider.acquire().await?;
    let result = operation(&mut session).await;

    if let Err(e) = session.close().await {
        tracing::warn!(error = %e, "Failed to close session");
    }

    result
}

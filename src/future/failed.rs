use super::CompletableFuture;
use crate::error::{StatusCode, UaError};

use std::error::Error;

/// Create a future which has already failed with `error`.
///
/// The returned future behaves exactly like one which failed later on:
/// observers registered on it receive the error once, and awaiting it yields
/// `Err(error)`.
///
/// # Examples
///
/// ```
/// use opcua_futures::future::failed_future;
/// use futures_lite::future::block_on;
///
/// let future = failed_future::<u8, _>("no session");
/// assert_eq!(block_on(future), Err("no session"));
/// ```
pub fn failed_future<T, E>(error: E) -> CompletableFuture<T, E> {
    CompletableFuture::failed(error)
}

/// Create a future which has already failed with a [`UaError`] built from
/// `status`.
///
/// # Examples
///
/// ```
/// use opcua_futures::error::StatusCode;
/// use opcua_futures::future::failed_ua_future;
/// use futures_lite::future::block_on;
///
/// let future = failed_ua_future::<u8>(StatusCode::BAD_TIMEOUT);
/// let err = block_on(future).unwrap_err();
/// assert_eq!(err.status_code(), StatusCode::BAD_TIMEOUT);
/// ```
pub fn failed_ua_future<T>(status: impl Into<StatusCode>) -> CompletableFuture<T, UaError> {
    failed_future(UaError::new(status))
}

/// Create a future which has already failed with a [`UaError`] built from
/// `status`, chaining `cause` as the source of the error.
pub fn failed_ua_future_with_cause<T, C>(
    status: impl Into<StatusCode>,
    cause: C,
) -> CompletableFuture<T, UaError>
where
    C: Into<Box<dyn Error + Send + Sync + 'static>>,
{
    failed_future(UaError::with_cause(status, cause))
}

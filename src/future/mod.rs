//! Completable futures and the combinators built on top of them.
//!
//! A [`CompletableFuture`] is a write-once cell which is resolved from the
//! outside, rather than by being polled to completion. It is the currency of
//! request/response plumbing: the side sending a request hands out a pending
//! future, and whichever side receives the response resolves it.
//!
//! # Examples
//!
//! ```
//! use opcua_futures::error::StatusCode;
//! use opcua_futures::future::{self, CompletableFuture};
//! use opcua_futures::prelude::*;
//! use futures_lite::future::block_on;
//!
//! block_on(async {
//!     // Wait for multiple responses, in request order.
//!     let a = CompletableFuture::<_, ()>::new();
//!     let b = CompletableFuture::new();
//!     let all = vec![a.clone(), b.clone()].sequence();
//!     b.complete(2);
//!     a.complete(1);
//!     assert_eq!(all.await, Ok(vec![1, 2]));
//!
//!     // Short-circuit without doing any asynchronous work.
//!     let failed = future::failed_ua_future::<()>(StatusCode::BAD_SHUTDOWN);
//!     assert!(failed.await.unwrap_err().status_code().is_bad());
//!
//!     // Complete a future handed out earlier from one created later.
//!     let response = CompletableFuture::<u8, ()>::new();
//!     let source = CompletableFuture::completed(7);
//!     let response = future::link(response).from(source);
//!     assert_eq!(response.await, Ok(7));
//! })
//! ```
//!
//! # Operations
//!
//! | Name                            | Returns                          | When is it resolved? |
//! | ---                             | ---                              | ---                  |
//! | [`Sequence`] / [`sequence`]     | `CompletableFuture<Vec<T>, E>`   | All inputs are `Ok`, or on the first `Err`
//! | [`failed_future`]               | `CompletableFuture<T, E>`        | Immediately, with the given error
//! | [`failed_ua_future`]            | `CompletableFuture<T, UaError>`  | Immediately, with a status code
//! | [`link`] + [`CompletionBuilder`]| the target                       | When the source is resolved
//!
//! [`UaError`]: crate::error::UaError
pub use complete::{link, CompletionBuilder};
pub use completable::CompletableFuture;
pub use failed::{failed_future, failed_ua_future, failed_ua_future_with_cause};
pub use sequence::{sequence, Sequence};

mod completable;
mod complete;
mod failed;
mod sequence;

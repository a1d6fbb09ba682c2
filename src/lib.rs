//! Completable futures and combinators for composing request/response
//! futures in an OPC UA stack.
//!
//! The centerpiece is [`future::CompletableFuture`], a write-once result cell
//! which is resolved from the outside and can be observed with callbacks or
//! awaited from any number of tasks. On top of it this crate provides:
//!
//! - [`future::Sequence`]: wait for a collection of futures and collect their
//!   values in order, or fail on the first error.
//! - [`future::failed_future`] and [`future::failed_ua_future`]: construct
//!   futures which have already failed.
//! - [`future::link`]: complete one future with the outcome of another,
//!   optionally hopping onto an [`executor::Executor`].
//!
//! # Examples
//!
//! ```rust
//! use opcua_futures::future::CompletableFuture;
//! use opcua_futures::prelude::*;
//! use futures_lite::future::block_on;
//!
//! let responses: Vec<CompletableFuture<u32, ()>> =
//!     (0..3).map(|_| CompletableFuture::new()).collect();
//! let all = responses.clone().sequence();
//!
//! // Responses arrive out of order...
//! for (i, response) in responses.iter().enumerate().rev() {
//!     response.complete(i as u32 * 10);
//! }
//!
//! // ...but are collected in request order.
//! assert_eq!(block_on(all), Ok(vec![0, 10, 20]));
//! ```
//!
//! # Features
//!
//! - `tokio`: implement [`executor::Executor`] for `tokio::runtime::Handle`.
//!
//! This crate never spawns threads, never blocks, and never logs: waiting is
//! expressed by registering observers and wakers, and all errors are handed
//! back to the caller through the futures themselves.

#![deny(missing_debug_implementations, nonstandard_style)]
#![warn(missing_docs, unreachable_pub)]

mod utils;

/// The opcua-futures prelude.
pub mod prelude {
    pub use super::future::Sequence as _;
}

pub mod error;
pub mod executor;
pub mod future;

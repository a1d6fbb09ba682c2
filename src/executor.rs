//! Execution contexts for scheduled completion callbacks.
//!
//! Observers normally run inline, on whichever thread resolves a
//! [`CompletableFuture`][crate::future::CompletableFuture]. When that thread
//! is latency sensitive (a network I/O thread, for example) the callback can
//! be handed to an [`Executor`] instead, see
//! [`CompletableFuture::on_complete_using`][crate::future::CompletableFuture::on_complete_using]
//! and [`CompletionBuilder::from_using`][crate::future::CompletionBuilder::from_using].

use core::fmt;
use std::sync::Arc;

/// A unit of work submitted to an [`Executor`].
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Something that can run a [`Task`], now or later, on some thread.
pub trait Executor {
    /// Schedule `task` to run exactly once.
    fn execute(&self, task: Task);
}

impl<X: Executor + ?Sized> Executor for &X {
    fn execute(&self, task: Task) {
        (**self).execute(task)
    }
}

impl<X: Executor + ?Sized> Executor for Box<X> {
    fn execute(&self, task: Task) {
        (**self).execute(task)
    }
}

impl<X: Executor + ?Sized> Executor for Arc<X> {
    fn execute(&self, task: Task) {
        (**self).execute(task)
    }
}

/// An executor which runs every task immediately on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inline;

impl Executor for Inline {
    fn execute(&self, task: Task) {
        task()
    }
}

/// Create an executor from a closure.
///
/// # Examples
///
/// ```
/// use opcua_futures::executor::{self, Executor};
/// use std::sync::mpsc;
///
/// let (sender, receiver) = mpsc::channel();
/// let executor = executor::from_fn(move |task| sender.send(task).unwrap());
///
/// executor.execute(Box::new(|| println!("hello")));
/// let task = receiver.recv().unwrap();
/// task();
/// ```
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: Fn(Task),
{
    FromFn { f }
}

/// An executor backed by a closure.
///
/// This `struct` is created by [`from_fn`]. See its documentation for more.
#[derive(Clone)]
pub struct FromFn<F> {
    f: F,
}

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromFn").finish_non_exhaustive()
    }
}

impl<F> Executor for FromFn<F>
where
    F: Fn(Task),
{
    fn execute(&self, task: Task) {
        (self.f)(task)
    }
}

/// Spawn tasks onto a Tokio runtime.
#[cfg(feature = "tokio")]
impl Executor for tokio::runtime::Handle {
    fn execute(&self, task: Task) {
        drop(self.spawn(async move { task() }));
    }
}

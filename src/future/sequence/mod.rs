use super::CompletableFuture;

pub(crate) mod array;
pub(crate) mod vec;

/// Wait for all futures to complete successfully, collecting their values in
/// order, or fail on the first error.
///
/// Unlike the other combinators in Rust's async ecosystem, `sequence` does
/// not poll anything: it registers one observer on each input and resolves a
/// new [`CompletableFuture`] once every input has been resolved. The returned
/// future can be awaited, observed, or forwarded like any other.
pub trait Sequence {
    /// The resulting output type.
    type Output;

    /// The error type shared by all inputs.
    type Error;

    /// Wait for all futures to complete successfully, collecting their values
    /// in order, or fail on the first error.
    ///
    /// The `i`-th element of the output is the value of the `i`-th input,
    /// whatever order the inputs are resolved in. An empty collection
    /// produces a future which has already been resolved with an empty
    /// output.
    ///
    /// If an input fails, the returned future fails with that error without
    /// waiting for the remaining inputs. When several inputs fail
    /// concurrently, the error which surfaces is whichever one is observed
    /// first; no ordering between them is guaranteed.
    ///
    /// # Examples
    ///
    /// ```
    /// use opcua_futures::future::CompletableFuture;
    /// use opcua_futures::prelude::*;
    /// use futures_lite::future::block_on;
    ///
    /// let a = CompletableFuture::<u8, ()>::new();
    /// let b = CompletableFuture::<u8, ()>::new();
    /// let all = vec![a.clone(), b.clone()].sequence();
    ///
    /// b.complete(2);
    /// a.complete(1);
    /// assert_eq!(block_on(all), Ok(vec![1, 2]));
    /// ```
    fn sequence(self) -> CompletableFuture<Self::Output, Self::Error>;
}

/// Wait for all futures produced by an iterator to complete successfully,
/// collecting their values in order, or fail on the first error.
///
/// This accepts anything which can be iterated over, including lazily
/// produced iterators. It behaves exactly like [`Sequence::sequence`].
///
/// # Examples
///
/// ```
/// use opcua_futures::future::{sequence, CompletableFuture};
/// use futures_lite::future::block_on;
///
/// let all = sequence((1..=3).map(CompletableFuture::<u8, ()>::completed));
/// assert_eq!(block_on(all), Ok(vec![1, 2, 3]));
/// ```
pub fn sequence<I, T, E>(futures: I) -> CompletableFuture<Vec<T>, E>
where
    I: IntoIterator<Item = CompletableFuture<T, E>>,
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    futures.into_iter().collect::<Vec<_>>().sequence()
}

use super::CompletableFuture;
use crate::executor::Executor;

/// Complete `target` with the outcome of another future, to be supplied to
/// the returned [`CompletionBuilder`].
///
/// Splitting creation of the target from wiring up its source lets callers
/// hand out the target before the source exists.
///
/// # Examples
///
/// ```
/// use opcua_futures::future::{link, CompletableFuture};
/// use futures_lite::future::block_on;
///
/// let target = CompletableFuture::<u32, String>::new();
/// let source = CompletableFuture::new();
///
/// let target = link(target).from(source.clone());
/// source.complete(4);
/// assert_eq!(block_on(target), Ok(4));
/// ```
pub fn link<T, E>(target: CompletableFuture<T, E>) -> CompletionBuilder<T, E> {
    CompletionBuilder { target }
}

/// Binds a future which is yet to be completed to the future it will be
/// completed from.
///
/// This `struct` is created by [`link`]. Both of its methods consume the
/// builder, so a target is only ever bound to a single source.
#[derive(Debug)]
#[must_use = "the target is not completed unless a source is supplied"]
pub struct CompletionBuilder<T, E> {
    target: CompletableFuture<T, E>,
}

impl<T, E> CompletionBuilder<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Complete the target with the outcome of `source`, returning the
    /// target.
    ///
    /// The target is completed on the thread which resolves `source`, or right
    /// away if `source` has already been resolved.
    pub fn from(self, source: CompletableFuture<T, E>) -> CompletableFuture<T, E> {
        let target = self.target.clone();
        source.on_complete(move |outcome| {
            target.complete_with(outcome.clone());
        });
        self.target
    }

    /// Complete the target with the outcome of `source` by way of `executor`,
    /// returning the target.
    ///
    /// Once `source` is resolved, completing the target is submitted to
    /// `executor` as a task instead of running on the resolving thread.
    pub fn from_using<X>(
        self,
        source: CompletableFuture<T, E>,
        executor: X,
    ) -> CompletableFuture<T, E>
    where
        X: Executor + Send + 'static,
    {
        let target = self.target.clone();
        source.on_complete_using(executor, move |outcome| {
            target.complete_with(outcome);
        });
        self.target
    }
}

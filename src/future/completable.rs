use crate::executor::Executor;
use crate::utils::{lock, WakerSet};

use core::fmt;
use core::future::Future;
use core::mem;
use core::pin::Pin;
use core::task::{Context, Poll};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, OnceLock};

use futures_core::future::FusedFuture;
use smallvec::SmallVec;

type Observer<T, E> = Box<dyn FnOnce(&Result<T, E>) + Send + 'static>;

struct Inner<T, E> {
    /// Written once, while `waiting` is locked.
    outcome: OnceLock<Result<T, E>>,
    waiting: Mutex<Waiting<T, E>>,
}

struct Waiting<T, E> {
    observers: SmallVec<[Observer<T, E>; 2]>,
    wakers: WakerSet,
}

/// A write-once result cell which is resolved from the outside.
///
/// A `CompletableFuture` starts out pending and is resolved exactly once,
/// either with a value through [`complete`] or with an error through
/// [`fail`]. Handles are cheap to clone and all refer to the same cell, so
/// one side of a request can hold on to a handle to resolve it while the
/// other side awaits it or registers observers on it.
///
/// Awaiting a handle yields a clone of the outcome, which is why the
/// [`Future`] implementation requires `T: Clone` and `E: Clone`.
///
/// # Examples
///
/// ```
/// use opcua_futures::future::CompletableFuture;
/// use futures_lite::future::block_on;
///
/// let response = CompletableFuture::<u32, String>::new();
/// let handle = response.clone();
///
/// std::thread::spawn(move || handle.complete(12));
///
/// assert_eq!(block_on(response), Ok(12));
/// ```
///
/// [`complete`]: CompletableFuture::complete
/// [`fail`]: CompletableFuture::fail
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct CompletableFuture<T, E> {
    inner: Arc<Inner<T, E>>,
    /// The slot this handle's waker occupies in the cell, if any.
    waker_key: Option<usize>,
    terminated: bool,
}

impl<T, E> CompletableFuture<T, E> {
    /// Create a new, pending future.
    pub fn new() -> Self {
        Self::from_inner(Arc::new(Inner {
            outcome: OnceLock::new(),
            waiting: Mutex::new(Waiting {
                observers: SmallVec::new(),
                wakers: WakerSet::new(),
            }),
        }))
    }

    /// Create a future which has already been resolved with `value`.
    pub fn completed(value: T) -> Self {
        Self::resolved(Ok(value))
    }

    /// Create a future which has already failed with `error`.
    pub fn failed(error: E) -> Self {
        Self::resolved(Err(error))
    }

    fn resolved(outcome: Result<T, E>) -> Self {
        let this = Self::new();
        this.inner.outcome.get_or_init(|| outcome);
        this
    }

    fn from_inner(inner: Arc<Inner<T, E>>) -> Self {
        Self {
            inner,
            waker_key: None,
            terminated: false,
        }
    }

    /// Resolve the future with `value`.
    ///
    /// Returns `false` if the future had already been resolved, in which case
    /// the existing outcome is kept and `value` is dropped.
    pub fn complete(&self, value: T) -> bool {
        self.complete_with(Ok(value))
    }

    /// Fail the future with `error`.
    ///
    /// Returns `false` if the future had already been resolved, in which case
    /// the existing outcome is kept and `error` is dropped.
    pub fn fail(&self, error: E) -> bool {
        self.complete_with(Err(error))
    }

    /// Resolve the future with `outcome`.
    ///
    /// Every task awaiting the future is woken, then the observers registered
    /// so far run on the calling thread before this method returns. A
    /// panicking observer does not keep the others from running: the first
    /// panic is resumed once all of them have run.
    pub fn complete_with(&self, outcome: Result<T, E>) -> bool {
        let (observers, wakers) = {
            let mut waiting = lock(&self.inner.waiting);
            if let Err(rejected) = self.inner.outcome.set(outcome) {
                drop(waiting);
                drop(rejected);
                return false;
            }
            (mem::take(&mut waiting.observers), waiting.wakers.take())
        };

        wakers.wake_all();

        let mut first_panic = None;
        if let Some(outcome) = self.inner.outcome.get() {
            for observer in observers {
                let result = panic::catch_unwind(AssertUnwindSafe(|| observer(outcome)));
                if let Err(payload) = result {
                    first_panic.get_or_insert(payload);
                }
            }
        }
        if let Some(payload) = first_panic {
            panic::resume_unwind(payload);
        }
        true
    }

    /// Register `f` to be called with the outcome of this future.
    ///
    /// If the future is still pending, `f` runs exactly once on the thread
    /// which resolves it. If it has already been resolved, `f` runs
    /// immediately on the calling thread.
    pub fn on_complete<F>(&self, f: F)
    where
        F: FnOnce(&Result<T, E>) + Send + 'static,
    {
        let mut waiting = lock(&self.inner.waiting);
        match self.inner.outcome.get() {
            Some(outcome) => {
                drop(waiting);
                f(outcome);
            }
            None => waiting.observers.push(Box::new(f)),
        }
    }

    /// Register `f` to be called with the outcome of this future, by way of
    /// `executor`.
    ///
    /// Once the future is resolved a clone of the outcome is moved into a task
    /// which is handed to `executor`, so `f` never runs on the resolving
    /// thread unless the executor decides to run it there.
    pub fn on_complete_using<X, F>(&self, executor: X, f: F)
    where
        X: Executor + Send + 'static,
        F: FnOnce(Result<T, E>) + Send + 'static,
        T: Clone + Send + 'static,
        E: Clone + Send + 'static,
    {
        self.on_complete(move |outcome| {
            let outcome = outcome.clone();
            executor.execute(Box::new(move || f(outcome)));
        });
    }

    /// Whether the future has been resolved, successfully or not.
    pub fn is_done(&self) -> bool {
        self.inner.outcome.get().is_some()
    }

    /// Whether the future has been resolved with an error.
    pub fn is_failed(&self) -> bool {
        matches!(self.inner.outcome.get(), Some(Err(_)))
    }

    /// The outcome of the future, if it has been resolved.
    pub fn peek(&self) -> Option<&Result<T, E>> {
        self.inner.outcome.get()
    }

    /// Whether both handles refer to the same cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T, E> Default for CompletableFuture<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Clone for CompletableFuture<T, E> {
    fn clone(&self) -> Self {
        Self::from_inner(self.inner.clone())
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for CompletableFuture<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletableFuture")
            .field("outcome", &self.inner.outcome.get())
            .finish()
    }
}

impl<T: Clone, E: Clone> Future for CompletableFuture<T, E> {
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if let Some(outcome) = this.inner.outcome.get() {
            this.terminated = true;
            return Poll::Ready(outcome.clone());
        }

        let mut waiting = lock(&this.inner.waiting);
        // The outcome may have been written between the check above and
        // taking the lock.
        if let Some(outcome) = this.inner.outcome.get() {
            drop(waiting);
            this.terminated = true;
            return Poll::Ready(outcome.clone());
        }
        this.waker_key = Some(waiting.wakers.register(this.waker_key, cx.waker()));
        Poll::Pending
    }
}

impl<T: Clone, E: Clone> FusedFuture for CompletableFuture<T, E> {
    fn is_terminated(&self) -> bool {
        self.terminated
    }
}

impl<T, E> Drop for CompletableFuture<T, E> {
    fn drop(&mut self) {
        if let Some(key) = self.waker_key.take() {
            let mut waiting = lock(&self.inner.waiting);
            if self.inner.outcome.get().is_none() {
                waiting.wakers.remove(key);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::executor;
    use futures::task::{noop_waker, waker, ArcWake};
    use futures_lite::future::block_on;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingWaker(Arc<AtomicUsize>);

    impl ArcWake for CountingWaker {
        fn wake_by_ref(arc_self: &Arc<Self>) {
            arc_self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn waker_fn(count: Arc<AtomicUsize>) -> core::task::Waker {
        waker(Arc::new(CountingWaker(count)))
    }

    #[test]
    fn complete_once() {
        let future = CompletableFuture::<u8, ()>::new();
        assert!(!future.is_done());
        assert!(future.complete(1));
        assert!(!future.complete(2));
        assert!(!future.fail(()));
        assert_eq!(future.peek(), Some(&Ok(1)));
        assert_eq!(block_on(future), Ok(1));
    }

    #[test]
    fn observers_run_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let future = CompletableFuture::<u8, ()>::new();

        let c = calls.clone();
        future.on_complete(move |outcome| {
            assert_eq!(outcome, &Err(()));
            c.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        future.fail(());
        future.fail(());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(future.is_failed());

        // Registered after resolution: runs right away.
        let c = calls.clone();
        future.on_complete(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn reentrant_observer() {
        let calls = Arc::new(AtomicUsize::new(0));
        let future = CompletableFuture::<u8, ()>::new();

        let inner = future.clone();
        let c = calls.clone();
        future.on_complete(move |_| {
            assert!(inner.is_done());
            inner.on_complete(move |outcome| {
                assert_eq!(outcome, &Ok(3));
                c.fetch_add(1, Ordering::SeqCst);
            });
        });

        future.complete(3);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_observer_does_not_starve_others() {
        let calls = Arc::new(AtomicUsize::new(0));
        let future = CompletableFuture::<u8, ()>::new();
        let mut handle = future.clone();

        let woken = Arc::new(AtomicUsize::new(0));
        let waker = waker_fn(woken.clone());
        let mut cx = Context::from_waker(&waker);
        assert!(Pin::new(&mut handle).poll(&mut cx).is_pending());

        future.on_complete(|_| panic!("observer failed"));
        let c = calls.clone();
        future.on_complete(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        future.on_complete(|_| panic!("second observer failed"));

        let result = panic::catch_unwind(AssertUnwindSafe(|| future.complete(4)));
        let payload = result.unwrap_err();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"observer failed"));

        assert!(future.is_done());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(woken.load(Ordering::SeqCst), 1);
        assert_eq!(Pin::new(&mut handle).poll(&mut cx), Poll::Ready(Ok(4)));
    }

    #[test]
    fn rejected_outcome_dropped_outside_lock() {
        struct Touch(Option<CompletableFuture<Touch, ()>>);

        impl Drop for Touch {
            fn drop(&mut self) {
                if let Some(cell) = self.0.take() {
                    cell.on_complete(|_| {});
                }
            }
        }

        let cell = CompletableFuture::<Touch, ()>::new();
        assert!(cell.complete(Touch(None)));
        assert!(!cell.complete(Touch(Some(cell.clone()))));
        assert!(!cell.fail(()));
    }

    #[test]
    fn on_complete_using_defers() {
        let queue: Arc<Mutex<Vec<executor::Task>>> = Arc::default();
        let q = queue.clone();
        let executor = executor::from_fn(move |task| q.lock().unwrap().push(task));

        let seen = Arc::new(Mutex::new(None));
        let future = CompletableFuture::<u8, ()>::new();
        let s = seen.clone();
        future.on_complete_using(executor, move |outcome| {
            *s.lock().unwrap() = Some(outcome);
        });

        future.complete(7);
        assert!(seen.lock().unwrap().is_none());

        let tasks: Vec<_> = queue.lock().unwrap().drain(..).collect();
        assert_eq!(tasks.len(), 1);
        tasks.into_iter().for_each(|task| task());
        assert_eq!(*seen.lock().unwrap(), Some(Ok(7)));
    }

    #[test]
    fn poll_registers_and_wakes() {
        let future = CompletableFuture::<u8, ()>::new();
        let mut handle = future.clone();
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);

        assert!(Pin::new(&mut handle).poll(&mut cx).is_pending());
        assert!(Pin::new(&mut handle).poll(&mut cx).is_pending());
        assert_eq!(lock(&future.inner.waiting).wakers.len(), 1);
        assert!(!handle.is_terminated());

        future.complete(5);
        assert_eq!(Pin::new(&mut handle).poll(&mut cx), Poll::Ready(Ok(5)));
        assert!(handle.is_terminated());
    }

    #[test]
    fn dropped_handle_deregisters() {
        let future = CompletableFuture::<u8, ()>::new();
        let mut handle = future.clone();
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);

        assert!(Pin::new(&mut handle).poll(&mut cx).is_pending());
        drop(handle);
        assert_eq!(lock(&future.inner.waiting).wakers.len(), 0);
    }

    #[test]
    fn resolved_constructors() {
        assert_eq!(block_on(CompletableFuture::<_, ()>::completed("hi")), Ok("hi"));

        let failed = CompletableFuture::<(), _>::failed("oh no");
        assert!(failed.is_done());
        assert!(failed.is_failed());
        assert_eq!(block_on(failed), Err("oh no"));
    }

    #[test]
    fn clones_share_cell() {
        let a = CompletableFuture::<u8, ()>::new();
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&CompletableFuture::new()));

        b.complete(9);
        assert_eq!(block_on(a), Ok(9));
    }
}

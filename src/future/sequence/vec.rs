use super::Sequence;
use crate::future::CompletableFuture;
use crate::utils::lock;

use core::mem;
use std::sync::{Arc, Mutex};

/// The values collected so far.
struct Slots<T> {
    items: Vec<Option<T>>,
    /// The number of inputs which have yet to resolve successfully.
    pending: usize,
    failed: bool,
}

impl<T> Slots<T> {
    fn new(len: usize) -> Self {
        Self {
            items: (0..len).map(|_| None).collect(),
            pending: len,
            failed: false,
        }
    }

    /// Store the value of input `index`, returning every value once the last
    /// one has arrived.
    fn fill(&mut self, index: usize, value: T) -> Option<Vec<T>> {
        if self.failed {
            return None;
        }
        self.items[index] = Some(value);
        self.pending -= 1;
        if self.pending > 0 {
            return None;
        }
        mem::take(&mut self.items).into_iter().collect()
    }

    /// Mark the aggregate as failed, releasing the values collected so far.
    /// Only the first call returns `true`.
    fn fail(&mut self) -> bool {
        if mem::replace(&mut self.failed, true) {
            return false;
        }
        self.items = Vec::new();
        true
    }
}

impl<T, E> Sequence for Vec<CompletableFuture<T, E>>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    type Output = Vec<T>;
    type Error = E;

    fn sequence(self) -> CompletableFuture<Self::Output, Self::Error> {
        if self.is_empty() {
            return CompletableFuture::completed(Vec::new());
        }

        let target = CompletableFuture::new();
        let slots = Arc::new(Mutex::new(Slots::new(self.len())));

        for (index, future) in self.iter().enumerate() {
            let target = target.clone();
            let slots = slots.clone();
            future.on_complete(move |outcome| match outcome {
                Ok(value) => {
                    let values = lock(&slots).fill(index, value.clone());
                    if let Some(values) = values {
                        target.complete(values);
                    }
                }
                Err(err) => {
                    let first = lock(&slots).fail();
                    if first {
                        target.fail(err.clone());
                    }
                }
            });
        }

        target
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use futures_lite::future::block_on;
    use std::io::{self, Error, ErrorKind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn empty() {
        let futures: Vec<CompletableFuture<u8, ()>> = vec![];
        let all = futures.sequence();
        assert_eq!(all.peek(), Some(&Ok(vec![])));
    }

    #[test]
    fn all_ok() {
        let a = CompletableFuture::<_, ()>::new();
        let b = CompletableFuture::new();
        let c = CompletableFuture::new();
        let all = vec![a.clone(), b.clone(), c.clone()].sequence();

        c.complete("three");
        assert!(!all.is_done());
        b.complete("two");
        a.complete("one");
        assert_eq!(block_on(all), Ok(vec!["one", "two", "three"]));
    }

    #[test]
    fn one_err() {
        let a = CompletableFuture::<&str, Arc<Error>>::new();
        let b = CompletableFuture::new();
        let all = vec![a.clone(), b.clone()].sequence();

        a.complete("hello");
        b.fail(Arc::new(Error::new(ErrorKind::Other, "oh no")));
        let res: Result<_, Arc<io::Error>> = block_on(all);
        assert_eq!(res.unwrap_err().to_string(), String::from("oh no"));
    }

    #[test]
    fn fails_without_waiting() {
        let a = CompletableFuture::<u8, &str>::new();
        let b = CompletableFuture::new();
        let all = vec![a.clone(), b.clone()].sequence();

        b.fail("E1");
        assert_eq!(all.peek(), Some(&Err("E1")));

        // A later success does not turn the failure into a partial list.
        a.complete(1);
        assert_eq!(block_on(all), Err("E1"));
    }

    #[test]
    fn failure_releases_collected_values() {
        let a = CompletableFuture::<Arc<u8>, &str>::new();
        let b = CompletableFuture::new();
        let c = CompletableFuture::new();
        let all = vec![a.clone(), b.clone(), c.clone()].sequence();

        let value = Arc::new(1);
        a.complete(value.clone());
        // Held by the test, the input cell, and the collected slot.
        assert_eq!(Arc::strong_count(&value), 3);

        b.fail("E1");
        // Only the test and the resolved input cell still hold the value.
        assert_eq!(Arc::strong_count(&value), 2);

        c.complete(Arc::new(3));
        assert_eq!(Arc::strong_count(&value), 2);
        assert_eq!(all.peek(), Some(&Err("E1")));
    }

    #[test]
    fn resolves_target_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let a = CompletableFuture::<u8, &str>::new();
        let b = CompletableFuture::new();
        let all = vec![a.clone(), b.clone()].sequence();

        let c = calls.clone();
        all.on_complete(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        a.fail("first");
        b.fail("second");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(all.peek(), Some(&Err("first")));
    }

    #[test]
    fn already_resolved_inputs() {
        let all = vec![
            CompletableFuture::<_, ()>::completed(1),
            CompletableFuture::completed(2),
        ]
        .sequence();
        assert_eq!(all.peek(), Some(&Ok(vec![1, 2])));
    }
}

use core::task::Waker;

use slab::Slab;

/// The wakers of every handle currently awaiting a cell.
///
/// Each handle owns at most one slot, identified by the key it got back from
/// [`WakerSet::register`].
#[derive(Debug, Default)]
pub(crate) struct WakerSet {
    wakers: Slab<Waker>,
}

impl WakerSet {
    pub(crate) fn new() -> Self {
        Self { wakers: Slab::new() }
    }

    /// Store `waker` under `key`, or in a fresh slot if the handle has none yet.
    pub(crate) fn register(&mut self, key: Option<usize>, waker: &Waker) -> usize {
        match key {
            Some(key) if self.wakers.contains(key) => {
                let slot = &mut self.wakers[key];
                if !slot.will_wake(waker) {
                    slot.clone_from(waker);
                }
                key
            }
            _ => self.wakers.insert(waker.clone()),
        }
    }

    pub(crate) fn remove(&mut self, key: usize) {
        self.wakers.try_remove(key);
    }

    /// Take every registered waker, leaving the set empty.
    pub(crate) fn take(&mut self) -> Self {
        core::mem::take(self)
    }

    pub(crate) fn wake_all(self) {
        for (_, waker) in self.wakers {
            waker.wake();
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.wakers.len()
    }
}

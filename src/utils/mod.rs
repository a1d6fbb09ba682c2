//! Utilities to implement the different futures of this crate.

mod lock;
mod wakers;

pub(crate) use lock::lock;
pub(crate) use wakers::WakerSet;

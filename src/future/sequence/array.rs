use super::Sequence;
use crate::future::CompletableFuture;

impl<T, E, const N: usize> Sequence for [CompletableFuture<T, E>; N]
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    type Output = Vec<T>;
    type Error = E;

    fn sequence(self) -> CompletableFuture<Self::Output, Self::Error> {
        Vec::from(self).sequence()
    }
}

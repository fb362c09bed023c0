use futures::Future;

/// Races a future against a cancellation future.
///
/// Resolves to `Some(output)` if the future completes first, or `None` if the
/// cancellation fires first. The inner future is dropped on cancellation.
#[async_trait::async_trait]
pub trait WithCancel: Future + Sized + Send {
    async fn with_cancel<C>(self, cancel: C) -> Option<Self::Output>
    where
        C: Future<Output = ()> + Send;
}

#[async_trait::async_trait]
impl<F> WithCancel for F
where
    F: Future + Send,
    F::Output: Send,
{
    async fn with_cancel<C>(self, cancel: C) -> Option<Self::Output>
    where
        C: Future<Output = ()> + Send,
    {
        tokio::select! {
            biased;
            _ = cancel => None,
            res = self => Some(res),
        }
    }
}

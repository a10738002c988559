//! Result delivery contract.

use tokio::sync::oneshot;

use super::image_stream::ImageStream;
use crate::domain::errors::FetchError;

/// Outcome handed to a [`DataCallback`].
pub type FetchResult = Result<ImageStream, FetchError>;

/// Receives the outcome of one fetch. Invoked at most once.
pub trait DataCallback: Send + 'static {
    /// Called with the readable image stream.
    fn on_data_ready(self: Box<Self>, stream: ImageStream);

    /// Called when the fetch failed.
    fn on_load_failed(self: Box<Self>, error: FetchError);
}

impl<F> DataCallback for F
where
    F: FnOnce(FetchResult) + Send + 'static,
{
    fn on_data_ready(self: Box<Self>, stream: ImageStream) {
        (*self)(Ok(stream));
    }

    fn on_load_failed(self: Box<Self>, error: FetchError) {
        (*self)(Err(error));
    }
}

/// Routes a result to the matching callback method.
pub(crate) fn deliver(callback: Box<dyn DataCallback>, result: FetchResult) {
    match result {
        Ok(stream) => callback.on_data_ready(stream),
        Err(error) => callback.on_load_failed(error),
    }
}

/// Returns a callback forwarding its result into a oneshot channel.
/// The receiver errors if the callback is dropped without firing.
#[must_use]
pub fn callback_channel() -> (impl DataCallback, oneshot::Receiver<FetchResult>) {
    let (tx, rx) = oneshot::channel();
    let callback = move |result: FetchResult| {
        let _ = tx.send(result);
    };
    (callback, rx)
}

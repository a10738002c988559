//! Application layer: the image fetcher and its delivery contract.

pub mod callback;
pub mod factory;
pub mod fetcher;
pub mod image_stream;

pub use callback::{DataCallback, FetchResult, callback_channel};
pub use factory::FetcherFactory;
pub use fetcher::{FetchContext, ImageFetcher};
pub use image_stream::ImageStream;

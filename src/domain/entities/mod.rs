mod book;
mod descriptors;
mod fetch_request;
mod image_url;
mod source;

pub use book::Book;
pub use descriptors::{DataClass, DataSource, Priority};
pub use fetch_request::{FetchOptions, FetchRequest};
pub use image_url::ImageUrl;
pub use source::{BookSource, DecodeRule};

//! Feed retrieval: HTTP download, charset handling and RSS decoding

mod charset;
mod fetcher;
pub mod model;
mod parse;

pub use charset::{CharsetSource, DecodeError};
pub use fetcher::{FeedError, FeedFetcher, FetchError};
pub use model::{FeedItem, FeedModel};
pub use parse::parse_feed;

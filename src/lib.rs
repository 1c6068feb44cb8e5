//! Emission counting for `futures` streams.
//!
//! Compose a stream with [`QueryCountExt::query_count`] (or
//! [`QueryCountTransformer`]) to receive every item wrapped in a
//! [`QueryCountResult`], which tells the first emission apart from later
//! updates:
//!
//! ```
//! use futures::{executor::block_on, stream, StreamExt};
//! use futures_query_count::QueryCountExt;
//!
//! let results: Vec<_> = block_on(stream::iter(["a", "b"]).query_count().collect());
//!
//! assert!(results[0].is_initial_update());
//! assert_eq!(results[1].update_count(), 1);
//! ```

mod error;
pub use error::*;

mod publisher;
pub use publisher::*;

mod query_count;
pub use query_count::*;

#[cfg(test)]
pub(crate) fn init_test_logger() {
    let _ = dotenv::dotenv();
    let _ = pretty_env_logger::try_init();
}

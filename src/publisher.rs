use std::error::Error;

use futures::Stream;

mod live_query;
pub use live_query::*;

/// A publisher delivers its current result, then every update, to each
/// subscriber stream.
///
/// call receive to create new subscriber stream.
pub trait Publisher {
    type Output;
    type Failure: Error;
    type Stream: Stream<Item = Self::Output>;

    ///  Create new receiver stream for this publisher
    fn receive(&self) -> Self::Stream;
}

use std::{
    marker::PhantomData,
    pin::Pin,
    task::{Context, Poll},
};

use futures::{ready, stream::FusedStream, Stream, TryStream};
use pin_project::pin_project;

use super::{EmitCounter, QueryCountResult};

/// Counts the emissions of a stream, wrapping each item in a
/// [`QueryCountResult`].
///
/// Each transformer owns a fresh [`EmitCounter`] and is consumed by
/// [`apply`](Self::apply), so every subscription starts counting at 1.
///
/// ```
/// use futures::{executor::block_on, stream, StreamExt};
/// use futures_query_count::QueryCountTransformer;
///
/// let counted = QueryCountTransformer::create().apply(stream::iter(["a", "b"]));
/// let updates: Vec<_> = block_on(
///     counted
///         .filter(|wrapper| futures::future::ready(!wrapper.is_initial_update()))
///         .map(|wrapper| wrapper.into_result())
///         .collect(),
/// );
///
/// assert_eq!(updates, vec!["b"]);
/// ```
#[derive(Debug)]
pub struct QueryCountTransformer<T> {
    counter: EmitCounter,
    _marker: PhantomData<fn(T) -> T>,
}

impl<T> Default for QueryCountTransformer<T> {
    fn default() -> Self {
        QueryCountTransformer {
            counter: EmitCounter::new(),
            _marker: PhantomData,
        }
    }
}

impl<T> QueryCountTransformer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create() -> Self {
        Self::new()
    }

    pub fn apply<S>(self, upstream: S) -> QueryCount<S>
    where
        S: Stream<Item = T>,
    {
        QueryCount {
            upstream,
            counter: self.counter,
        }
    }

    /// Like [`apply`](Self::apply) for fallible streams. Upstream errors are
    /// forwarded unchanged and end the stream.
    pub fn try_apply<S>(self, upstream: S) -> TryQueryCount<S>
    where
        S: TryStream<Ok = T>,
    {
        TryQueryCount {
            upstream,
            counter: self.counter,
            terminated: false,
        }
    }
}

/// Stream returned by [`QueryCountTransformer::apply`] and
/// [`QueryCountExt::query_count`].
#[pin_project]
#[must_use = "streams do nothing unless polled"]
#[derive(Debug)]
pub struct QueryCount<S> {
    #[pin]
    upstream: S,
    counter: EmitCounter,
}

impl<S> QueryCount<S> {
    /// Number of results produced so far.
    pub fn emit_count(&self) -> u64 {
        self.counter.current()
    }

    pub fn get_ref(&self) -> &S {
        &self.upstream
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.upstream
    }

    pub fn get_pin_mut(self: Pin<&mut Self>) -> Pin<&mut S> {
        self.project().upstream
    }

    pub fn into_inner(self) -> S {
        self.upstream
    }
}

impl<S> Stream for QueryCount<S>
where
    S: Stream,
{
    type Item = QueryCountResult<S::Item>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();

        match ready!(this.upstream.poll_next(cx)) {
            Some(item) => {
                let emit_count = this.counter.increment();
                log::trace!("emission {}", emit_count);

                Poll::Ready(Some(QueryCountResult::new(item, emit_count)))
            }
            None => {
                log::debug!("upstream completed after {} emissions", this.counter.current());

                Poll::Ready(None)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.upstream.size_hint()
    }
}

impl<S> FusedStream for QueryCount<S>
where
    S: FusedStream,
{
    fn is_terminated(&self) -> bool {
        self.upstream.is_terminated()
    }
}

/// Stream returned by [`QueryCountTransformer::try_apply`] and
/// [`TryQueryCountExt::try_query_count`].
#[pin_project]
#[must_use = "streams do nothing unless polled"]
#[derive(Debug)]
pub struct TryQueryCount<S> {
    #[pin]
    upstream: S,
    counter: EmitCounter,
    terminated: bool,
}

impl<S> TryQueryCount<S> {
    /// Number of results produced so far. Errors are not counted.
    pub fn emit_count(&self) -> u64 {
        self.counter.current()
    }

    pub fn get_ref(&self) -> &S {
        &self.upstream
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.upstream
    }

    pub fn get_pin_mut(self: Pin<&mut Self>) -> Pin<&mut S> {
        self.project().upstream
    }

    pub fn into_inner(self) -> S {
        self.upstream
    }
}

impl<S> Stream for TryQueryCount<S>
where
    S: TryStream,
{
    type Item = Result<QueryCountResult<S::Ok>, S::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();

        if *this.terminated {
            return Poll::Ready(None);
        }

        match ready!(this.upstream.try_poll_next(cx)) {
            Some(Ok(item)) => {
                let emit_count = this.counter.increment();
                log::trace!("emission {}", emit_count);

                Poll::Ready(Some(Ok(QueryCountResult::new(item, emit_count))))
            }
            Some(Err(err)) => {
                *this.terminated = true;
                log::debug!("upstream failed after {} emissions", this.counter.current());

                Poll::Ready(Some(Err(err)))
            }
            None => {
                *this.terminated = true;
                log::debug!("upstream completed after {} emissions", this.counter.current());

                Poll::Ready(None)
            }
        }
    }
}

impl<S> FusedStream for TryQueryCount<S>
where
    S: TryStream,
{
    fn is_terminated(&self) -> bool {
        self.terminated
    }
}

/// Adds [`query_count`](Self::query_count) to every [`Stream`].
pub trait QueryCountExt: Stream + Sized {
    fn query_count(self) -> QueryCount<Self> {
        QueryCountTransformer::create().apply(self)
    }
}

impl<S: Stream> QueryCountExt for S {}

/// Adds [`try_query_count`](Self::try_query_count) to every [`TryStream`].
pub trait TryQueryCountExt: TryStream + Sized {
    fn try_query_count(self) -> TryQueryCount<Self> {
        QueryCountTransformer::create().try_apply(self)
    }
}

impl<S: TryStream> TryQueryCountExt for S {}

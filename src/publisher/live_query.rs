use std::{
    pin::Pin,
    sync::Arc,
    task::{Context, Poll, Waker},
};

use futures::{stream::FusedStream, Stream};
use parking_lot::Mutex;

use super::Publisher;
use crate::{QueryCountError, Result};

/// Self-updating query result.
///
/// Every subscriber stream yields the current result on its first poll and
/// the latest result after each [`set`](Self::set). Results set between two
/// polls of a subscriber are coalesced into the newest one. Dropping the
/// `LiveQuery` closes it.
pub struct LiveQuery<Output>
where
    Output: Clone,
{
    inner: Arc<Mutex<LiveQueryImpl<Output>>>,
}

impl<Output> LiveQuery<Output>
where
    Output: Clone,
{
    pub fn new(init_value: Output) -> Self {
        LiveQuery {
            inner: Arc::new(Mutex::new(LiveQueryImpl::new(init_value))),
        }
    }

    pub fn set(&self, new_value: Output) -> Result<()> {
        self.inner.lock().write(new_value)
    }

    pub fn get(&self) -> Output {
        self.inner.lock().value.clone()
    }

    pub fn close(&self) {
        self.inner.lock().close();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }
}

impl<O> Publisher for LiveQuery<O>
where
    O: Clone,
{
    type Output = O;

    type Failure = QueryCountError;

    type Stream = LiveQueryStream<O>;

    fn receive(&self) -> Self::Stream {
        LiveQueryStream {
            inner: self.inner.clone(),
            seen_version: None,
            terminated: false,
        }
    }
}

impl<O> Drop for LiveQuery<O>
where
    O: Clone,
{
    fn drop(&mut self) {
        self.inner.lock().close();
    }
}

struct LiveQueryImpl<Output> {
    value: Output,
    version: u64,
    wakers: Vec<Waker>,
    closed: bool,
}

impl<Output> LiveQueryImpl<Output>
where
    Output: Clone,
{
    fn new(init: Output) -> Self {
        LiveQueryImpl {
            value: init,
            version: 0,
            wakers: vec![],
            closed: false,
        }
    }

    fn try_read(&mut self, waker: &Waker, seen: Option<u64>) -> Poll<Option<(Output, u64)>> {
        if seen.map_or(true, |seen| self.version > seen) {
            return Poll::Ready(Some((self.value.clone(), self.version)));
        }

        if self.closed {
            return Poll::Ready(None);
        }

        if !self.wakers.iter().any(|w| w.will_wake(waker)) {
            self.wakers.push(waker.clone());
        }

        Poll::Pending
    }

    fn write(&mut self, value: Output) -> Result<()> {
        if self.closed {
            return Err(QueryCountError::Closed);
        }

        self.value = value;
        self.version += 1;
        log::trace!("live query version {}", self.version);

        self.wake_all();

        Ok(())
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }

        self.closed = true;
        log::debug!("live query closed at version {}", self.version);

        self.wake_all();
    }

    fn wake_all(&mut self) {
        for waker in self.wakers.drain(..) {
            waker.wake();
        }
    }
}

/// Subscriber stream of a [`LiveQuery`].
pub struct LiveQueryStream<Output> {
    inner: Arc<Mutex<LiveQueryImpl<Output>>>,
    seen_version: Option<u64>,
    terminated: bool,
}

impl<Output> Clone for LiveQueryStream<Output> {
    fn clone(&self) -> Self {
        LiveQueryStream {
            inner: self.inner.clone(),
            seen_version: self.seen_version,
            terminated: self.terminated,
        }
    }
}

impl<Output> Stream for LiveQueryStream<Output>
where
    Output: Clone,
{
    type Item = Output;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.terminated {
            return Poll::Ready(None);
        }

        let polled = self.inner.lock().try_read(cx.waker(), self.seen_version);

        match polled {
            Poll::Ready(Some((value, version))) => {
                self.seen_version = Some(version);
                Poll::Ready(Some(value))
            }
            Poll::Ready(None) => {
                self.terminated = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<Output> FusedStream for LiveQueryStream<Output>
where
    Output: Clone,
{
    fn is_terminated(&self) -> bool {
        self.terminated
    }
}

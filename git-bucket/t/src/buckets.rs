//! Buckets with awkward behaviour, for testing consumers.

use std::{cell::Cell, rc::Rc};

use git_bucket::{Bucket, ByteView, Error};

/// Hides whatever the inner bucket has buffered, so that consumers can only
/// make progress by reading.
pub struct Unbuffered<B>(pub B);

impl<B: Bucket> Bucket for Unbuffered<B> {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn read(&mut self, max: usize) -> Result<ByteView, Error> {
        self.0.read(max)
    }

    fn duplicate(&mut self, reset: bool) -> Result<Box<dyn Bucket>, Error> {
        self.0.duplicate(reset)
    }

    fn dispose(&mut self) {
        self.0.dispose()
    }
}

/// Has nothing to offer on every other read, like a non-blocking source
/// waiting on the network.
pub struct Stalling<B> {
    inner: B,
    stall: bool,
}

impl<B> Stalling<B> {
    pub fn new(inner: B) -> Self {
        Self { inner, stall: true }
    }
}

impl<B: Bucket> Bucket for Stalling<B> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn read(&mut self, max: usize) -> Result<ByteView, Error> {
        self.stall = !self.stall;
        if self.stall {
            self.inner.read(max)
        } else {
            Ok(ByteView::Empty)
        }
    }
}

/// Counts every call to [`Bucket::dispose`].
pub struct Disposals<B> {
    inner: B,
    count: Rc<Cell<usize>>,
}

impl<B> Disposals<B> {
    pub fn new(inner: B) -> (Self, Rc<Cell<usize>>) {
        let count = Rc::new(Cell::new(0));
        (
            Self {
                inner,
                count: count.clone(),
            },
            count,
        )
    }
}

impl<B: Bucket> Bucket for Disposals<B> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn read(&mut self, max: usize) -> Result<ByteView, Error> {
        self.inner.read(max)
    }

    fn peek(&self) -> ByteView {
        self.inner.peek()
    }

    fn poll(&mut self, min: usize) -> Result<ByteView, Error> {
        self.inner.poll(min)
    }

    fn position(&self) -> Option<u64> {
        self.inner.position()
    }

    fn duplicate(&mut self, reset: bool) -> Result<Box<dyn Bucket>, Error> {
        self.inner.duplicate(reset)
    }

    fn dispose(&mut self) {
        self.count.set(self.count.get() + 1);
        self.inner.dispose()
    }
}

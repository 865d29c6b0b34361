// Copyright © 2022 The Radicle Link Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::{Bucket, ByteView, Error};

/// Exposes at most `limit` bytes of the inner bucket.
///
/// Once `limit` bytes have been delivered, [`ByteView::Eof`] is returned even
/// if the inner bucket has more to give. The inner bucket may end early, in
/// which case so does the `Take`.
#[derive(Debug)]
pub struct Take<B> {
    inner: B,
    /// The position of `inner` when the `Take` was created.
    start: Option<u64>,
    limit: u64,
    remaining: u64,
}

impl<B: Bucket> Take<B> {
    pub fn new(inner: B, limit: u64) -> Self {
        Self {
            start: inner.position(),
            inner,
            limit,
            remaining: limit,
        }
    }
}

impl<B> Take<B> {
    pub fn into_inner(self) -> B {
        self.inner
    }

    /// The number of bytes that may still be delivered.
    pub fn limit_remaining(&self) -> u64 {
        self.remaining
    }

    fn cap(&self, n: usize) -> usize {
        usize::try_from(self.remaining).map_or(n, |r| r.min(n))
    }
}

impl<B: Bucket> Bucket for Take<B> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn read(&mut self, max: usize) -> Result<ByteView, Error> {
        if self.remaining == 0 {
            return Ok(ByteView::Eof);
        }
        let view = self.inner.read(self.cap(max))?;
        self.remaining -= view.len() as u64;
        Ok(view)
    }

    fn peek(&self) -> ByteView {
        if self.remaining == 0 {
            return ByteView::Eof;
        }
        match self.inner.peek() {
            ByteView::Data(bytes) => {
                let n = self.cap(bytes.len());
                ByteView::from(bytes.slice(..n))
            },
            view => view,
        }
    }

    fn poll(&mut self, min: usize) -> Result<ByteView, Error> {
        if self.remaining == 0 {
            return Ok(ByteView::Eof);
        }
        match self.inner.poll(self.cap(min))? {
            ByteView::Data(bytes) => {
                let n = self.cap(bytes.len());
                Ok(ByteView::from(bytes.slice(..n)))
            },
            view => Ok(view),
        }
    }

    fn position(&self) -> Option<u64> {
        Some(self.limit - self.remaining)
    }

    fn remaining_len(&self) -> Option<u64> {
        self.inner
            .remaining_len()
            .map(|len| len.min(self.remaining))
    }

    /// With `reset`, the duplicate starts where the `Take` started, which
    /// requires the inner bucket to know its position.
    fn duplicate(&mut self, reset: bool) -> Result<Box<dyn Bucket>, Error> {
        if !reset {
            let inner = self.inner.duplicate(false)?;
            return Ok(Box::new(Take::new(inner, self.remaining)));
        }
        let start = self
            .start
            .ok_or_else(|| Error::unsupported(self.inner.name(), "duplicate"))?;
        let mut inner = self.inner.duplicate(true)?;
        rewind_to(&mut *inner, start)?;
        Ok(Box::new(Take::new(inner, self.limit)))
    }

    fn dispose(&mut self) {
        self.inner.dispose()
    }
}

/// Move a freshly rewound bucket forward to `offset`, seeking if possible.
fn rewind_to(bucket: &mut dyn Bucket, offset: u64) -> Result<(), Error> {
    if offset == 0 {
        return Ok(());
    }
    match bucket.seek(offset) {
        Err(Error::Unsupported { .. }) => {},
        result => return result,
    }
    let mut skip = offset;
    while skip > 0 {
        let max = usize::try_from(skip).unwrap_or(usize::MAX);
        match bucket.read(max)? {
            ByteView::Data(bytes) => skip -= bytes.len() as u64,
            ByteView::Eof => return Err(Error::unexpected_eof(bucket.name())),
            ByteView::Empty => return Err(Error::would_block(bucket.name())),
        }
    }
    Ok(())
}

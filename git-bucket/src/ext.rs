// Copyright © 2022 The Radicle Link Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use bytes::{Bytes, BytesMut};
use enumset::EnumSet;

use crate::{
    scan::{self, Eol, ScanState, Terminator},
    Bucket,
    BucketReader,
    ByteView,
    Concat,
    Error,
    NoDispose,
    Replay,
    Take,
};

/// Combinators and blocking helpers available on every [`Bucket`].
///
/// The helpers that read "until" something treat [`ByteView::Empty`] as
/// [`Error::WouldBlock`], since they cannot hand back a partial result.
pub trait BucketExt: Bucket {
    /// At most `n` bytes of this bucket.
    fn take(self, n: u64) -> Take<Self>
    where
        Self: Sized,
    {
        Take::new(self, n)
    }

    /// This bucket followed by `next`.
    fn chain<B: Bucket>(self, next: B) -> Concat<Self, B>
    where
        Self: Sized,
    {
        Concat::new(self, next)
    }

    fn no_dispose(self) -> NoDispose<Self>
    where
        Self: Sized,
    {
        NoDispose::new(self)
    }

    /// Record this bucket so that it can be duplicated and sought within.
    fn replay(self) -> Replay<Self>
    where
        Self: Sized,
    {
        Replay::new(self)
    }

    /// Adapt this bucket to [`std::io::Read`].
    fn io_reader(self) -> BucketReader<Self>
    where
        Self: Sized,
    {
        BucketReader::new(self)
    }

    /// Read exactly `n` bytes.
    ///
    /// # Errors
    ///
    /// [`Error::UnexpectedEof`] if the bucket ends before `n` bytes were read.
    fn read_exact_view(&mut self, n: usize) -> Result<ByteView, Error> {
        let mut view = ByteView::Empty;
        while view.len() < n {
            match self.read(n - view.len())? {
                ByteView::Data(bytes) => view = view.concat(ByteView::Data(bytes)),
                ByteView::Eof => return Err(Error::unexpected_eof(self.name())),
                ByteView::Empty => return Err(Error::would_block(self.name())),
            }
        }
        Ok(view)
    }

    /// Read everything up to the end of the bucket.
    fn read_to_end(&mut self) -> Result<Bytes, Error> {
        let mut buf = BytesMut::new();
        loop {
            match self.read(usize::MAX)? {
                ByteView::Data(bytes) if buf.is_empty() && self.peek().is_eof() => return Ok(bytes),
                ByteView::Data(bytes) => buf.extend_from_slice(&bytes),
                ByteView::Eof => return Ok(buf.freeze()),
                ByteView::Empty => return Err(Error::would_block(self.name())),
            }
        }
    }

    /// Read and discard everything up to the end of the bucket, returning the
    /// number of bytes skipped.
    fn skip_to_eof(&mut self) -> Result<u64, Error> {
        let mut skipped = 0;
        loop {
            match self.read(usize::MAX)? {
                ByteView::Data(bytes) => skipped += bytes.len() as u64,
                ByteView::Eof => return Ok(skipped),
                ByteView::Empty => return Err(Error::would_block(self.name())),
            }
        }
    }

    /// See [`scan::scan`].
    fn scan(
        &mut self,
        accepted: EnumSet<Eol>,
        max: usize,
        state: &mut ScanState,
    ) -> Result<(ByteView, Terminator), Error> {
        scan::scan(self, accepted, max, state)
    }

    /// See [`scan::scan_exact`].
    fn scan_exact(
        &mut self,
        accepted: EnumSet<Eol>,
        max: usize,
        state: &mut ScanState,
    ) -> Result<(ByteView, Terminator), Error> {
        scan::scan_exact(self, accepted, max, state)
    }
}

impl<B: Bucket + ?Sized> BucketExt for B {}

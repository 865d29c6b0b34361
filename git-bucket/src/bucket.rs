// Copyright © 2022 The Radicle Link Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! The [`Bucket`] contract.
//!
//! A bucket is consumed forward-only by exactly one owner at a time. There
//! is no internal locking: a bucket is `&mut` for every consuming operation
//! and the borrow checker rules out concurrent reads on the same instance.
//!
//! Only [`Bucket::read`] (and the operations built on it) may block while
//! waiting on the upstream source. [`Bucket::peek`] never fetches, and
//! [`Bucket::poll`] only materialises what can be had without waiting.

use crate::{ByteView, Error};

pub trait Bucket {
    /// A human readable name used to identify this bucket in errors.
    fn name(&self) -> &str;

    /// Read up to `max` bytes.
    ///
    /// Returns [`ByteView::Empty`] if the source has nothing to offer right
    /// now, and [`ByteView::Eof`] once it is exhausted. After
    /// [`Bucket::peek`] or [`Bucket::poll`] returned `k` bytes, reading
    /// `n <= k` bytes returns exactly those `n` bytes.
    fn read(&mut self, max: usize) -> Result<ByteView, Error>;

    /// The bytes already buffered, without consuming them.
    ///
    /// Returns [`ByteView::Empty`] if nothing is buffered, which says
    /// nothing about whether more data will arrive.
    fn peek(&self) -> ByteView {
        ByteView::Empty
    }

    /// Try to buffer at least `min` bytes without blocking, and return what
    /// is buffered.
    ///
    /// The result may be shorter than `min`.
    fn poll(&mut self, min: usize) -> Result<ByteView, Error> {
        let _ = min;
        Ok(self.peek())
    }

    /// The number of bytes delivered so far, if tracked.
    fn position(&self) -> Option<u64> {
        None
    }

    /// A hint of how many bytes are left, if knowable without reading them.
    fn remaining_len(&self) -> Option<u64> {
        None
    }

    /// Reposition the read cursor at `offset`.
    fn seek(&mut self, offset: u64) -> Result<(), Error> {
        let _ = offset;
        Err(Error::unsupported(self.name(), "seek"))
    }

    /// Produce an independent read cursor over the same data.
    ///
    /// If `reset` is `true` the new cursor starts at the beginning of the
    /// data, otherwise at the current position of `self`. Reading from the
    /// duplicate does not affect `self`.
    fn duplicate(&mut self, reset: bool) -> Result<Box<dyn Bucket>, Error> {
        let _ = reset;
        Err(Error::unsupported(self.name(), "duplicate"))
    }

    /// Release the upstream resources held by this bucket.
    ///
    /// Disposing more than once is a no-op. Reading after disposal yields
    /// [`ByteView::Eof`].
    fn dispose(&mut self) {}
}

impl<B: Bucket + ?Sized> Bucket for &mut B {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn read(&mut self, max: usize) -> Result<ByteView, Error> {
        (**self).read(max)
    }

    fn peek(&self) -> ByteView {
        (**self).peek()
    }

    fn poll(&mut self, min: usize) -> Result<ByteView, Error> {
        (**self).poll(min)
    }

    fn position(&self) -> Option<u64> {
        (**self).position()
    }

    fn remaining_len(&self) -> Option<u64> {
        (**self).remaining_len()
    }

    fn seek(&mut self, offset: u64) -> Result<(), Error> {
        (**self).seek(offset)
    }

    fn duplicate(&mut self, reset: bool) -> Result<Box<dyn Bucket>, Error> {
        (**self).duplicate(reset)
    }

    fn dispose(&mut self) {
        (**self).dispose()
    }
}

impl<B: Bucket + ?Sized> Bucket for Box<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn read(&mut self, max: usize) -> Result<ByteView, Error> {
        (**self).read(max)
    }

    fn peek(&self) -> ByteView {
        (**self).peek()
    }

    fn poll(&mut self, min: usize) -> Result<ByteView, Error> {
        (**self).poll(min)
    }

    fn position(&self) -> Option<u64> {
        (**self).position()
    }

    fn remaining_len(&self) -> Option<u64> {
        (**self).remaining_len()
    }

    fn seek(&mut self, offset: u64) -> Result<(), Error> {
        (**self).seek(offset)
    }

    fn duplicate(&mut self, reset: bool) -> Result<Box<dyn Bucket>, Error> {
        (**self).duplicate(reset)
    }

    fn dispose(&mut self) {
        (**self).dispose()
    }
}

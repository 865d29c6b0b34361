// Copyright © 2022 The Radicle Link Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Re-delivering bytes that were read one record too far.
//!
//! Some records can only be recognised by reading past their end, e.g. the
//! list of `parent` lines of a commit only ends once a line that is *not* a
//! `parent` line was read. [`spliced`] puts such an over-read back in front
//! of the bucket it came from, so the next stage reads it as if it had never
//! been consumed.

use crate::{Bucket, ByteView, Concat, Error, MemoryBucket, NoDispose};

/// The bucket returned by [`spliced`].
pub struct Spliced<B> {
    inner: Concat<MemoryBucket, NoDispose<B>>,
}

/// Construct a bucket that first re-delivers `already_read` and then
/// continues with `rest`.
///
/// Disposing the result does not dispose `rest`: the caller that handed out
/// `rest` stays responsible for it.
pub fn spliced<B: Bucket>(already_read: ByteView, rest: B) -> Spliced<B> {
    let prefix = MemoryBucket::from(already_read).with_name(rest.name());
    Spliced {
        inner: Concat::new(prefix, NoDispose::new(rest)),
    }
}

impl<B> Spliced<B> {
    /// Take the bucket apart, returning whatever is left of the re-delivered
    /// bytes and the continuation.
    pub fn into_parts(self) -> (ByteView, B) {
        let (prefix, rest) = self.inner.into_inner();
        (ByteView::from(prefix.remaining()), rest.into_inner())
    }

    pub fn rest(&self) -> &B {
        self.inner.second_ref().get_ref()
    }

    pub fn rest_mut(&mut self) -> &mut B {
        self.inner.second_mut().get_mut()
    }
}

impl<B: Bucket> Spliced<B> {
    /// Put `view` back in front of the bytes still to be re-delivered.
    pub fn unread(&mut self, view: ByteView) {
        if !view.has_data() {
            return;
        }
        let remaining = ByteView::from(self.inner.first_ref().remaining());
        let prefix = MemoryBucket::from(view.concat(remaining)).with_name(self.name());
        self.inner.replace_first(prefix);
    }
}

impl<B: Bucket> Bucket for Spliced<B> {
    fn name(&self) -> &str {
        self.rest().name()
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

    /// The position of `rest`, less the bytes still to be re-delivered.
    fn position(&self) -> Option<u64> {
        let pending = self.inner.first_ref().remaining().len() as u64;
        self.rest().position()?.checked_sub(pending)
    }

    fn remaining_len(&self) -> Option<u64> {
        self.inner.remaining_len()
    }

    /// The re-delivered bytes were taken from `rest`, so rewinding means
    /// rewinding `rest`. Otherwise the duplicate re-delivers what is left of
    /// the prefix before continuing with a duplicate of `rest`.
    fn duplicate(&mut self, reset: bool) -> Result<Box<dyn Bucket>, Error> {
        let rest = self.inner.second_mut().duplicate(reset)?;
        if reset {
            return Ok(rest);
        }
        let prefix = MemoryBucket::new(self.inner.first_ref().remaining()).with_name(self.name());
        Ok(Box::new(Concat::new(prefix, rest)))
    }

    fn dispose(&mut self) {
        self.inner.dispose()
    }
}

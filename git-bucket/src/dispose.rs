// Copyright © 2022 The Radicle Link Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::{Bucket, ByteView, Error};

/// Forwards everything to the inner bucket except [`Bucket::dispose`],
/// which does nothing.
///
/// Used when a bucket is lent to a second owner that must not release it,
/// e.g. the continuation of a [`crate::Spliced`] bucket.
#[derive(Debug)]
pub struct NoDispose<B>(B);

impl<B> NoDispose<B> {
    pub fn new(inner: B) -> Self {
        Self(inner)
    }

    pub fn into_inner(self) -> B {
        self.0
    }

    pub fn get_ref(&self) -> &B {
        &self.0
    }

    pub fn get_mut(&mut self) -> &mut B {
        &mut self.0
    }
}

impl<B: Bucket> Bucket for NoDispose<B> {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn read(&mut self, max: usize) -> Result<ByteView, Error> {
        self.0.read(max)
    }

    fn peek(&self) -> ByteView {
        self.0.peek()
    }

    fn poll(&mut self, min: usize) -> Result<ByteView, Error> {
        self.0.poll(min)
    }

    fn position(&self) -> Option<u64> {
        self.0.position()
    }

    fn remaining_len(&self) -> Option<u64> {
        self.0.remaining_len()
    }

    fn seek(&mut self, offset: u64) -> Result<(), Error> {
        self.0.seek(offset)
    }

    fn duplicate(&mut self, reset: bool) -> Result<Box<dyn Bucket>, Error> {
        self.0.duplicate(reset)
    }

    fn dispose(&mut self) {
        log::trace!("{}: dispose suppressed", self.0.name());
    }
}

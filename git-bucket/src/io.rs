// Copyright © 2022 The Radicle Link Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::io;

use crate::{error::into_io_err, Bucket, ByteView};

/// A [`std::io::Read`] over a [`Bucket`].
///
/// [`ByteView::Empty`] is reported as [`io::ErrorKind::WouldBlock`].
pub struct BucketReader<B> {
    inner: B,
}

impl<B> BucketReader<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> B {
        self.inner
    }
}

impl<B: Bucket> io::Read for BucketReader<B> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        match self.inner.read(buf.len()).map_err(into_io_err)? {
            ByteView::Data(bytes) => {
                buf[..bytes.len()].copy_from_slice(&bytes);
                Ok(bytes.len())
            },
            ByteView::Eof => Ok(0),
            ByteView::Empty => Err(io::Error::new(
                io::ErrorKind::WouldBlock,
                format!("'{}' has no data available yet", self.inner.name()),
            )),
        }
    }
}

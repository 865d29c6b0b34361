// Copyright © 2022 The Radicle Link Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::io::{self, Read};

use bytes::{Bytes, BytesMut};

use crate::{Bucket, ByteView, Error};

/// The default number of bytes fetched from the reader at once.
pub const DEFAULT_CHUNK: usize = 8 * 1024;

/// A [`Bucket`] over any [`std::io::Read`].
///
/// The reader is asked for [`DEFAULT_CHUNK`] bytes at a time, and whatever it
/// returns is buffered. A reader returning [`io::ErrorKind::WouldBlock`]
/// surfaces as [`ByteView::Empty`].
///
/// The reader is dropped when the bucket is disposed.
pub struct ReaderBucket<R> {
    name: String,
    reader: Option<R>,
    buf: Bytes,
    chunk: usize,
    position: u64,
}

impl<R: Read> ReaderBucket<R> {
    pub fn new(reader: R) -> Self {
        Self {
            name: "reader".to_owned(),
            reader: Some(reader),
            buf: Bytes::new(),
            chunk: DEFAULT_CHUNK,
            position: 0,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the number of bytes requested from the reader at once.
    pub fn with_chunk_size(mut self, chunk: usize) -> Self {
        self.chunk = chunk.max(1);
        self
    }

    /// Fill the buffer, returning `false` if the reader would block.
    fn fill(&mut self) -> Result<bool, Error> {
        let reader = match self.reader.as_mut() {
            Some(reader) => reader,
            None => return Ok(true),
        };
        let mut chunk = BytesMut::zeroed(self.chunk);
        loop {
            match reader.read(&mut chunk) {
                Ok(0) => {
                    log::trace!("{}: reached end of reader", self.name);
                    self.reader = None;
                    return Ok(true);
                },
                Ok(n) => {
                    chunk.truncate(n);
                    self.buf = chunk.freeze();
                    return Ok(true);
                },
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(false),
                Err(source) => {
                    return Err(Error::Io {
                        name: self.name.clone(),
                        source,
                    })
                },
            }
        }
    }
}

impl<R: Read> Bucket for ReaderBucket<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self, max: usize) -> Result<ByteView, Error> {
        if self.buf.is_empty() {
            if self.reader.is_none() {
                return Ok(ByteView::Eof);
            }
            if !self.fill()? {
                return Ok(ByteView::Empty);
            }
            if self.buf.is_empty() {
                return Ok(ByteView::Eof);
            }
        }
        let n = max.min(self.buf.len());
        self.position += n as u64;
        Ok(ByteView::from(self.buf.split_to(n)))
    }

    fn peek(&self) -> ByteView {
        if !self.buf.is_empty() {
            ByteView::Data(self.buf.clone())
        } else if self.reader.is_none() {
            ByteView::Eof
        } else {
            ByteView::Empty
        }
    }

    fn position(&self) -> Option<u64> {
        Some(self.position)
    }

    fn dispose(&mut self) {
        if self.reader.take().is_some() {
            log::trace!("{}: disposed", self.name);
        }
        self.buf = Bytes::new();
    }
}

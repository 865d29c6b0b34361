// Copyright © 2022 The Radicle Link Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use bytes::Bytes;

use crate::{Bucket, ByteView, Error, MemoryBucket};

/// Records every byte read from the inner bucket, so that the data can be
/// sought within and duplicated even if the inner bucket cannot.
///
/// Duplicating drains the inner bucket into the recording first, which
/// means it blocks until the inner bucket is exhausted. From then on both
/// the original and the duplicate are served from the same shared bytes.
pub struct Replay<B> {
    inner: B,
    tape: Tape,
    cursor: usize,
    disposed: bool,
}

enum Tape {
    Recording(Vec<u8>),
    Complete(Bytes),
}

impl<B: Bucket> Replay<B> {
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            tape: Tape::Recording(Vec::new()),
            cursor: 0,
            disposed: false,
        }
    }

    /// Read the inner bucket to its end, completing the recording.
    fn drain(&mut self) -> Result<Bytes, Error> {
        let recorded = match &mut self.tape {
            Tape::Complete(bytes) => return Ok(bytes.clone()),
            Tape::Recording(recorded) => recorded,
        };
        loop {
            match self.inner.read(usize::MAX)? {
                ByteView::Data(bytes) => recorded.extend_from_slice(&bytes),
                ByteView::Eof => break,
                ByteView::Empty => return Err(Error::would_block(self.inner.name())),
            }
        }
        let bytes = Bytes::from(std::mem::take(recorded));
        log::trace!(
            "{}: recorded {} bytes for replay",
            self.inner.name(),
            bytes.len()
        );
        self.tape = Tape::Complete(bytes.clone());
        Ok(bytes)
    }

    fn recorded_len(&self) -> usize {
        match &self.tape {
            Tape::Recording(recorded) => recorded.len(),
            Tape::Complete(bytes) => bytes.len(),
        }
    }
}

impl<B: Bucket> Bucket for Replay<B> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn read(&mut self, max: usize) -> Result<ByteView, Error> {
        if self.disposed {
            return Ok(ByteView::Eof);
        }
        match &mut self.tape {
            Tape::Complete(bytes) => {
                if self.cursor >= bytes.len() {
                    return Ok(ByteView::Eof);
                }
                let end = bytes.len().min(self.cursor.saturating_add(max));
                let view = ByteView::from(bytes.slice(self.cursor..end));
                self.cursor = end;
                Ok(view)
            },
            Tape::Recording(recorded) if self.cursor < recorded.len() => {
                let end = recorded.len().min(self.cursor.saturating_add(max));
                let view = ByteView::copy_from_slice(&recorded[self.cursor..end]);
                self.cursor = end;
                Ok(view)
            },
            Tape::Recording(recorded) => {
                let view = self.inner.read(max)?;
                recorded.extend_from_slice(&view);
                self.cursor += view.len();
                Ok(view)
            },
        }
    }

    fn peek(&self) -> ByteView {
        if self.disposed {
            return ByteView::Eof;
        }
        match &self.tape {
            Tape::Complete(bytes) if self.cursor >= bytes.len() => ByteView::Eof,
            Tape::Complete(bytes) => ByteView::from(bytes.slice(self.cursor..)),
            Tape::Recording(recorded) if self.cursor < recorded.len() => {
                ByteView::copy_from_slice(&recorded[self.cursor..])
            },
            Tape::Recording(_) => self.inner.peek(),
        }
    }

    fn poll(&mut self, min: usize) -> Result<ByteView, Error> {
        match &self.tape {
            Tape::Recording(recorded) if !self.disposed && self.cursor == recorded.len() => {
                self.inner.poll(min)
            },
            _ => Ok(self.peek()),
        }
    }

    fn position(&self) -> Option<u64> {
        Some(self.cursor as u64)
    }

    fn remaining_len(&self) -> Option<u64> {
        match &self.tape {
            Tape::Complete(bytes) => Some((bytes.len() - self.cursor) as u64),
            Tape::Recording(recorded) => self
                .inner
                .remaining_len()
                .map(|len| len + (recorded.len() - self.cursor) as u64),
        }
    }

    fn seek(&mut self, offset: u64) -> Result<(), Error> {
        let offset = usize::try_from(offset).map_err(|_| Error::unexpected_eof(self.name()))?;
        if offset > self.recorded_len() {
            self.drain()?;
        }
        if offset > self.recorded_len() {
            return Err(Error::unexpected_eof(self.name()));
        }
        self.cursor = offset;
        Ok(())
    }

    fn duplicate(&mut self, reset: bool) -> Result<Box<dyn Bucket>, Error> {
        let name = self.name().to_owned();
        let cursor = self.cursor;
        let mut dup = MemoryBucket::new(self.drain()?).with_name(name);
        if !reset {
            dup.seek(cursor as u64)?;
        }
        Ok(Box::new(dup))
    }

    fn dispose(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.inner.dispose();
            self.tape = Tape::Complete(Bytes::new());
            self.cursor = 0;
        }
    }
}

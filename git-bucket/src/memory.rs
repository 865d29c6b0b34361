// Copyright © 2022 The Radicle Link Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use bytes::Bytes;

use crate::{Bucket, ByteView, Error};

/// A [`Bucket`] over bytes that are already in memory.
///
/// Memory buckets support every optional capability: peeking at all
/// remaining bytes, seeking, and duplication.
#[derive(Clone, Debug)]
pub struct MemoryBucket {
    name: String,
    data: Bytes,
    pos: usize,
}

impl MemoryBucket {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            name: "memory".to_owned(),
            data: data.into(),
            pos: 0,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The bytes not yet read.
    pub fn remaining(&self) -> Bytes {
        match self.rest() {
            ByteView::Data(bytes) => bytes,
            _ => Bytes::new(),
        }
    }

    fn rest(&self) -> ByteView {
        if self.pos >= self.data.len() {
            ByteView::Eof
        } else {
            ByteView::Data(self.data.slice(self.pos..))
        }
    }
}

impl From<ByteView> for MemoryBucket {
    fn from(view: ByteView) -> Self {
        Self::new(view.into_bytes())
    }
}

impl Bucket for MemoryBucket {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self, max: usize) -> Result<ByteView, Error> {
        if self.pos >= self.data.len() {
            return Ok(ByteView::Eof);
        }
        let end = self.data.len().min(self.pos.saturating_add(max));
        let view = ByteView::from(self.data.slice(self.pos..end));
        self.pos = end;
        Ok(view)
    }

    fn peek(&self) -> ByteView {
        self.rest()
    }

    fn poll(&mut self, _min: usize) -> Result<ByteView, Error> {
        Ok(self.rest())
    }

    fn position(&self) -> Option<u64> {
        Some(self.pos as u64)
    }

    fn remaining_len(&self) -> Option<u64> {
        Some(self.data.len().saturating_sub(self.pos) as u64)
    }

    fn seek(&mut self, offset: u64) -> Result<(), Error> {
        match usize::try_from(offset) {
            Ok(offset) if offset <= self.data.len() => {
                self.pos = offset;
                Ok(())
            },
            _ => Err(Error::unexpected_eof(&self.name)),
        }
    }

    fn duplicate(&mut self, reset: bool) -> Result<Box<dyn Bucket>, Error> {
        Ok(Box::new(Self {
            name: self.name.clone(),
            data: self.data.clone(),
            pos: if reset { 0 } else { self.pos },
        }))
    }

    /// Releases the data. The position stays where it was.
    fn dispose(&mut self) {
        self.data = Bytes::new();
    }
}

// Copyright © 2022 The Radicle Link Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::VecDeque;

use bytes::Bytes;

use crate::{Bucket, ByteView, Error};

/// A [`Bucket`] delivering a sequence of fragments exactly as they were
/// handed to it, the way a chunked transport delivers data.
///
/// A read never crosses a fragment boundary, and [`Bucket::peek`] only
/// exposes what is left of the current fragment. Fragments that were read
/// are gone, so this bucket cannot be duplicated; wrap it in a
/// [`crate::Replay`] for that.
#[derive(Clone, Debug)]
pub struct ChunkedBucket {
    name: String,
    fragments: VecDeque<Bytes>,
    position: u64,
}

impl ChunkedBucket {
    pub fn new<I, T>(fragments: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Bytes>,
    {
        Self {
            name: "chunked".to_owned(),
            fragments: fragments
                .into_iter()
                .map(Into::into)
                .filter(|b: &Bytes| !b.is_empty())
                .collect(),
            position: 0,
        }
    }

    /// Cut `data` into fragments of `size` bytes, the last one possibly
    /// being shorter.
    pub fn split(data: impl Into<Bytes>, size: usize) -> Self {
        let mut data = data.into();
        let size = size.max(1);
        let mut fragments = Vec::with_capacity(data.len() / size + 1);
        while !data.is_empty() {
            let n = size.min(data.len());
            fragments.push(data.split_to(n));
        }
        Self::new(fragments)
    }

    /// Cut `data` at each of the given `offsets`.
    ///
    /// Offsets beyond the end of `data`, or not in increasing order, are
    /// ignored.
    pub fn split_at(data: impl Into<Bytes>, offsets: &[usize]) -> Self {
        let data = data.into();
        let mut fragments = Vec::with_capacity(offsets.len() + 1);
        let mut start = 0;
        for &offset in offsets {
            if offset > start && offset <= data.len() {
                fragments.push(data.slice(start..offset));
                start = offset;
            }
        }
        fragments.push(data.slice(start..));
        Self::new(fragments)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Bucket for ChunkedBucket {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self, max: usize) -> Result<ByteView, Error> {
        let front = match self.fragments.front_mut() {
            Some(front) => front,
            None => return Ok(ByteView::Eof),
        };
        let n = max.min(front.len());
        let view = front.split_to(n);
        if front.is_empty() {
            self.fragments.pop_front();
        }
        self.position += n as u64;
        Ok(ByteView::from(view))
    }

    fn peek(&self) -> ByteView {
        match self.fragments.front() {
            Some(front) => ByteView::from(front.clone()),
            None => ByteView::Eof,
        }
    }

    fn position(&self) -> Option<u64> {
        Some(self.position)
    }

    fn remaining_len(&self) -> Option<u64> {
        Some(self.fragments.iter().map(|f| f.len() as u64).sum())
    }

    fn dispose(&mut self) {
        self.fragments.clear();
    }
}

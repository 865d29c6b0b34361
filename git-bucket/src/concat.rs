// Copyright © 2022 The Radicle Link Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::{Bucket, ByteView, Error};

/// Reads `A` to its end, then continues with `B`.
///
/// The end of `A` is never surfaced: the read that finds `A` exhausted is
/// served by `B` instead.
#[derive(Debug)]
pub struct Concat<A, B> {
    first: A,
    second: B,
    first_done: bool,
    position: Option<u64>,
    disposed: bool,
}

impl<A: Bucket, B: Bucket> Concat<A, B> {
    /// The `Concat` tracks its position only if both buckets do.
    pub fn new(first: A, second: B) -> Self {
        let position = first.position().and(second.position()).map(|_| 0);
        Self {
            first,
            second,
            first_done: false,
            position,
            disposed: false,
        }
    }
}

impl<A, B> Concat<A, B> {

    pub fn into_inner(self) -> (A, B) {
        (self.first, self.second)
    }

    pub fn first_ref(&self) -> &A {
        &self.first
    }

    pub fn second_ref(&self) -> &B {
        &self.second
    }

    pub fn second_mut(&mut self) -> &mut B {
        &mut self.second
    }

    fn advance(&mut self, n: usize) {
        if let Some(position) = self.position.as_mut() {
            *position += n as u64;
        }
    }

    /// Swap in a new first bucket, which is read before continuing with the
    /// second even if the old one was already exhausted.
    pub fn replace_first(&mut self, first: A) -> A {
        self.first_done = false;
        std::mem::replace(&mut self.first, first)
    }
}

impl<A: Bucket, B: Bucket> Bucket for Concat<A, B> {
    fn name(&self) -> &str {
        if self.first_done {
            self.second.name()
        } else {
            self.first.name()
        }
    }

    fn read(&mut self, max: usize) -> Result<ByteView, Error> {
        if !self.first_done {
            match self.first.read(max)? {
                ByteView::Eof => self.first_done = true,
                view => {
                    self.advance(view.len());
                    return Ok(view);
                },
            }
        }
        let view = self.second.read(max)?;
        self.advance(view.len());
        Ok(view)
    }

    fn peek(&self) -> ByteView {
        if self.first_done {
            return self.second.peek();
        }
        match self.first.peek() {
            ByteView::Eof => self.second.peek(),
            view => view,
        }
    }

    fn poll(&mut self, min: usize) -> Result<ByteView, Error> {
        if !self.first_done {
            match self.first.poll(min)? {
                ByteView::Eof => self.first_done = true,
                view => return Ok(view),
            }
        }
        self.second.poll(min)
    }

    fn position(&self) -> Option<u64> {
        self.position
    }

    fn remaining_len(&self) -> Option<u64> {
        let second = self.second.remaining_len()?;
        if self.first_done {
            Some(second)
        } else {
            Some(self.first.remaining_len()? + second)
        }
    }

    fn duplicate(&mut self, reset: bool) -> Result<Box<dyn Bucket>, Error> {
        let second = self.second.duplicate(reset)?;
        if self.first_done && !reset {
            return Ok(second);
        }
        let first = self.first.duplicate(reset)?;
        Ok(Box::new(Concat::new(first, second)))
    }

    fn dispose(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.first.dispose();
            self.second.dispose();
        }
    }
}

// Copyright © 2022 The Radicle Link Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Scanning a [`Bucket`] for line (or record) terminators.
//!
//! The scanner only relies on [`Bucket::peek`], [`Bucket::poll`] and
//! [`Bucket::read`], and never reads past the terminator it is looking for
//! when the bucket can show what it has buffered. When it cannot, the scanner
//! reads a single byte at a time and keeps anything it could not deliver in
//! the [`ScanState`], which must therefore be used with one bucket only.
//!
//! A `\r` found at the very end of what is available may turn out to be the
//! first half of a `\r\n`. In that case [`scan`] returns
//! [`Terminator::CrSplit`] and records the split in the [`ScanState`]; the
//! next call resolves it before anything else. [`scan_exact`] does all of
//! this internally and always hands back a complete line.

use bytes::{Bytes, BytesMut};
use enumset::{enum_set, EnumSet, EnumSetType};

use crate::{Bucket, ByteView, Error};

/// A terminator that may be accepted by a scan.
///
/// [`Eol::Zero`] is used for NUL delimited records and is never mixed with
/// the line terminators.
#[derive(Debug, EnumSetType, Hash)]
pub enum Eol {
    Lf,
    Cr,
    CrLf,
    Zero,
}

impl Eol {
    /// Only `\n`, as used by git commit and tag objects.
    pub const LF: EnumSet<Eol> = enum_set!(Eol::Lf);
    /// Any of `\n`, `\r` and `\r\n`.
    pub const ANY_LINE: EnumSet<Eol> = enum_set!(Eol::Lf | Eol::Cr | Eol::CrLf);
    /// Only NUL.
    pub const ZERO: EnumSet<Eol> = enum_set!(Eol::Zero);
}

/// The terminator that ended a scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Terminator {
    /// No terminator was found (yet).
    None,
    Lf,
    Cr,
    CrLf,
    /// A `\r` was the last byte available. The matching `\n` may still
    /// arrive, see the module documentation.
    CrSplit,
    Zero,
}

impl Terminator {
    /// The number of bytes the terminator occupies at the end of a view.
    pub fn len(self) -> usize {
        match self {
            Self::None => 0,
            Self::Lf | Self::Cr | Self::CrSplit | Self::Zero => 1,
            Self::CrLf => 2,
        }
    }

    pub fn is_none(self) -> bool {
        self == Self::None
    }

    /// `view` without this terminator at its end.
    pub fn strip(self, view: &ByteView) -> ByteView {
        let len = view.len().saturating_sub(self.len());
        view.slice(0, len)
    }
}

/// Continuation state threaded through consecutive scans of one bucket.
#[derive(Debug, Default)]
pub struct ScanState {
    pending_cr: bool,
    carry: ByteView,
    partial: BytesMut,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` if the last scan ended in [`Terminator::CrSplit`] and the split
    /// is not resolved yet.
    pub fn is_pending_cr(&self) -> bool {
        self.pending_cr
    }

    /// Bytes that were consumed from the bucket but not yet delivered.
    ///
    /// Callers that stop scanning and go on reading the bucket directly must
    /// put these back in front of it, e.g. with [`crate::spliced`].
    pub fn take_carry(&mut self) -> ByteView {
        std::mem::take(&mut self.carry)
    }

    /// The bytes of an incomplete line gathered by [`scan_exact`] so far.
    pub fn partial(&self) -> &[u8] {
        &self.partial
    }

    /// Everything consumed from the bucket but not delivered, i.e. the
    /// incomplete line followed by the carry, resetting the state.
    pub fn take_unconsumed(&mut self) -> ByteView {
        self.pending_cr = false;
        let partial = ByteView::from(self.partial.split());
        partial.concat(self.take_carry())
    }
}

enum Chunk {
    /// Still inside the bucket, visible through `peek`/`poll`.
    Buffered(Bytes),
    /// Already taken out of the bucket.
    Consumed(Bytes),
    Empty,
    Eof,
}

enum Found {
    Lf,
    Cr,
    CrLf,
    CrAtEnd,
    Zero,
}

fn next_chunk<B>(bucket: &mut B, state: &mut ScanState) -> Result<Chunk, Error>
where
    B: Bucket + ?Sized,
{
    if let ByteView::Data(carry) = state.take_carry() {
        return Ok(Chunk::Consumed(carry));
    }
    match bucket.peek() {
        ByteView::Data(bytes) => return Ok(Chunk::Buffered(bytes)),
        ByteView::Eof => return Ok(Chunk::Eof),
        ByteView::Empty => {},
    }
    match bucket.poll(1)? {
        ByteView::Data(bytes) => return Ok(Chunk::Buffered(bytes)),
        ByteView::Eof => return Ok(Chunk::Eof),
        ByteView::Empty => {},
    }
    Ok(match bucket.read(1)? {
        ByteView::Data(bytes) => Chunk::Consumed(bytes),
        ByteView::Empty => Chunk::Empty,
        ByteView::Eof => Chunk::Eof,
    })
}

fn find(data: &[u8], limit: usize, accepted: EnumSet<Eol>) -> Option<(usize, Found)> {
    let cr = accepted.contains(Eol::Cr);
    let crlf = accepted.contains(Eol::CrLf);
    for (i, &b) in data.iter().enumerate().take(limit) {
        match b {
            b'\n' if accepted.contains(Eol::Lf) => return Some((i, Found::Lf)),
            b'\0' if accepted.contains(Eol::Zero) => return Some((i, Found::Zero)),
            b'\r' if cr || crlf => match data.get(i + 1) {
                Some(b'\n') if crlf => return Some((i, Found::CrLf)),
                Some(_) if cr => return Some((i, Found::Cr)),
                Some(_) => continue,
                None if crlf => return Some((i, Found::CrAtEnd)),
                None => return Some((i, Found::Cr)),
            },
            _ => continue,
        }
    }
    None
}

/// Take exactly `n` bytes that `peek`/`poll` showed to be buffered.
fn take_buffered<B>(bucket: &mut B, n: usize) -> Result<ByteView, Error>
where
    B: Bucket + ?Sized,
{
    let mut view = bucket.read(n)?;
    while view.len() < n {
        match bucket.read(n - view.len())? {
            ByteView::Data(more) => view = view.concat(ByteView::Data(more)),
            ByteView::Empty | ByteView::Eof => return Err(Error::unexpected_eof(bucket.name())),
        }
    }
    Ok(view)
}

/// Take the first `n` bytes of `chunk`, leaving the rest where it came from.
fn take<B>(bucket: &mut B, state: &mut ScanState, chunk: Chunk, n: usize) -> Result<ByteView, Error>
where
    B: Bucket + ?Sized,
{
    match chunk {
        Chunk::Buffered(_) => take_buffered(bucket, n),
        Chunk::Consumed(mut bytes) => {
            let head = bytes.split_to(n.min(bytes.len()));
            state.carry = ByteView::from(bytes);
            Ok(ByteView::from(head))
        },
        Chunk::Empty => Ok(ByteView::Empty),
        Chunk::Eof => Ok(ByteView::Eof),
    }
}

fn put_back(state: &mut ScanState, chunk: Chunk) {
    if let Chunk::Consumed(bytes) = chunk {
        state.carry = ByteView::from(bytes);
    }
}

/// Scan `bucket` for the first of the `accepted` terminators, returning at
/// most `max` bytes.
///
/// The returned view ends with the terminator, if one was found. Otherwise
/// it holds whatever was available, and the caller is expected to call again
/// with the same `state`. An `(Empty, Terminator::Cr)` result completes the
/// line returned by the previous call, whose `\r` turned out not to be part
/// of a `\r\n`.
pub fn scan<B>(
    bucket: &mut B,
    accepted: EnumSet<Eol>,
    max: usize,
    state: &mut ScanState,
) -> Result<(ByteView, Terminator), Error>
where
    B: Bucket + ?Sized,
{
    debug_assert!(
        !accepted.contains(Eol::Zero) || accepted == Eol::ZERO,
        "NUL terminators are not mixed with line terminators"
    );
    if max == 0 {
        return Ok((ByteView::Empty, Terminator::None));
    }

    let chunk = next_chunk(bucket, state)?;
    if state.pending_cr {
        let first = match &chunk {
            Chunk::Empty => return Ok((ByteView::Empty, Terminator::None)),
            Chunk::Eof => {
                state.pending_cr = false;
                return Ok(if accepted.contains(Eol::Cr) {
                    (ByteView::Empty, Terminator::Cr)
                } else {
                    (ByteView::Eof, Terminator::None)
                });
            },
            Chunk::Buffered(bytes) | Chunk::Consumed(bytes) => bytes[0],
        };
        state.pending_cr = false;
        if first == b'\n' {
            let lf = take(bucket, state, chunk, 1)?;
            return Ok((lf, Terminator::CrLf));
        }
        if accepted.contains(Eol::Cr) {
            put_back(state, chunk);
            return Ok((ByteView::Empty, Terminator::Cr));
        }
        // The `\r` was an ordinary byte, go on with the line.
    }

    let found = match &chunk {
        Chunk::Empty => return Ok((ByteView::Empty, Terminator::None)),
        Chunk::Eof => return Ok((ByteView::Eof, Terminator::None)),
        Chunk::Buffered(bytes) | Chunk::Consumed(bytes) => {
            find(bytes, max, accepted).ok_or_else(|| bytes.len().min(max))
        },
    };
    let (n, terminator) = match found {
        Err(n) => (n, Terminator::None),
        Ok((i, Found::Lf)) => (i + 1, Terminator::Lf),
        Ok((i, Found::Cr)) => (i + 1, Terminator::Cr),
        Ok((i, Found::Zero)) => (i + 1, Terminator::Zero),
        Ok((i, Found::CrLf)) => (i + 2, Terminator::CrLf),
        Ok((i, Found::CrAtEnd)) => {
            state.pending_cr = true;
            (i + 1, Terminator::CrSplit)
        },
    };
    let view = take(bucket, state, chunk, n)?;
    Ok((view, terminator))
}

/// Scan `bucket` until one of the `accepted` terminators or the end of the
/// bucket is found.
///
/// The returned view holds the complete line including its terminator, or
/// the final unterminated line with [`Terminator::None`], or is
/// [`ByteView::Eof`] if the bucket was already exhausted. If the bucket has
/// nothing to offer right now, `(Empty, Terminator::None)` is returned and
/// the bytes gathered so far are kept in `state` for the next call.
///
/// # Errors
///
/// [`Error::LineTooLong`] if `max` bytes were gathered without finding a
/// terminator.
pub fn scan_exact<B>(
    bucket: &mut B,
    accepted: EnumSet<Eol>,
    max: usize,
    state: &mut ScanState,
) -> Result<(ByteView, Terminator), Error>
where
    B: Bucket + ?Sized,
{
    loop {
        let limit = max.saturating_sub(state.partial.len());
        if limit == 0 && !state.pending_cr {
            return Err(Error::LineTooLong {
                name: bucket.name().to_owned(),
                max,
            });
        }
        match scan(bucket, accepted, limit.max(1), state)? {
            (ByteView::Data(bytes), Terminator::None | Terminator::CrSplit) => {
                state.partial.extend_from_slice(&bytes)
            },
            (ByteView::Data(bytes), terminator) => {
                if state.partial.is_empty() {
                    return Ok((ByteView::Data(bytes), terminator));
                }
                state.partial.extend_from_slice(&bytes);
                return Ok((ByteView::from(state.partial.split()), terminator));
            },
            (ByteView::Empty, Terminator::Cr) => {
                return Ok((ByteView::from(state.partial.split()), Terminator::Cr))
            },
            (ByteView::Empty, _) => return Ok((ByteView::Empty, Terminator::None)),
            (ByteView::Eof, _) if state.partial.is_empty() => {
                return Ok((ByteView::Eof, Terminator::None))
            },
            (ByteView::Eof, _) => return Ok((ByteView::from(state.partial.split()), Terminator::None)),
        }
    }
}

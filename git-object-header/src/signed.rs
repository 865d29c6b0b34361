// Copyright © 2022 The Radicle Link Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use bytes::{Bytes, BytesMut};
use git_bucket::{Bucket, ByteView};

use crate::{commit::ExtensionHeader, source::Source, Error, ParseConfig};

enum Phase {
    Headers,
    Signature,
    Body,
    Done,
}

/// The bytes of a commit that its signature covers, produced piece by
/// piece.
///
/// This is the raw commit with every `gpgsig` and `gpgsig-sha256` header
/// removed, continuation lines included. Everything else, the message in
/// particular, is passed through unchanged.
///
/// See [`crate::CommitReader::signed_payload`].
pub struct SignedPayload<B> {
    source: Source<B>,
    phase: Phase,
}

impl<B: Bucket> SignedPayload<B> {
    pub(crate) fn new(raw: B, config: &ParseConfig) -> Self {
        Self {
            source: Source::new(raw, config),
            phase: Phase::Headers,
        }
    }

    /// Collect the whole payload.
    pub fn into_bytes(self) -> Result<Bytes, Error> {
        let mut buf = BytesMut::new();
        for view in self {
            buf.extend_from_slice(&view?);
        }
        Ok(buf.freeze())
    }

    fn step(&mut self) -> Result<Option<ByteView>, Error> {
        loop {
            match self.phase {
                Phase::Headers => {
                    let line = match self.source.line()? {
                        Some(line) => line,
                        None => return Ok(None),
                    };
                    if line.is_blank() {
                        self.phase = Phase::Body;
                    } else if ExtensionHeader::from_key(&line.key_value().0).is_signature() {
                        self.phase = Phase::Signature;
                        continue;
                    }
                    return Ok(Some(line.raw));
                },
                Phase::Signature => match self.source.line()? {
                    None => return Ok(None),
                    Some(line) if line.starts_with(b" ") => continue,
                    Some(line) => {
                        self.source.unread(line.raw);
                        self.phase = Phase::Headers;
                    },
                },
                Phase::Body => {
                    return match self.source.read(usize::MAX)? {
                        ByteView::Eof => Ok(None),
                        ByteView::Empty => {
                            Err(git_bucket::Error::would_block(self.source.name()).into())
                        },
                        view => Ok(Some(view)),
                    }
                },
                Phase::Done => return Ok(None),
            }
        }
    }
}

impl<B: Bucket> Iterator for SignedPayload<B> {
    type Item = Result<ByteView, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.step() {
            Ok(Some(view)) => Some(Ok(view)),
            Ok(None) => {
                self.phase = Phase::Done;
                None
            },
            Err(e) => {
                self.phase = Phase::Done;
                Some(Err(e))
            },
        }
    }
}

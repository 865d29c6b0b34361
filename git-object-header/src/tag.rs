// Copyright © 2022 The Radicle Link Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Reading tag objects.
//!
//! ```text
//! object <id>
//! type <commit|tree|blob|tag>
//! tag <name>
//! tagger <person>
//!
//! <message>
//! <signature>         (optional)
//! ```

use std::fmt;

use bytes::{Bytes, BytesMut};
use git_bucket::{Bucket, BucketExt as _, ByteView, MemoryBucket};

use crate::{source::Source, Error, ObjectId, ObjectKind, ParseConfig, Person};

/// The lines a signature appended to a tag message may start with.
pub const ARMOR: [&[u8]; 4] = [
    b"-----BEGIN PGP SIGNATURE-----",
    b"-----BEGIN PGP MESSAGE-----",
    b"-----BEGIN SSH SIGNATURE-----",
    b"-----BEGIN SIGNED MESSAGE-----",
];

/// The number of bytes needed to recognise any of the [`ARMOR`] lines.
const PROBE: usize = 30;

/// The fixed fields of a tag header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagHeader {
    pub object: ObjectId,
    pub kind: ObjectKind,
    pub name: String,
    pub tagger: Person,
}

impl fmt::Display for TagHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "object {}", self.object)?;
        writeln!(f, "type {}", self.kind)?;
        writeln!(f, "tag {}", self.name)?;
        writeln!(f, "tagger {}", self.tagger)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Stage {
    ObjectType,
    Name,
    Tagger,
    Headers,
    Body,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BodyPhase {
    Message,
    Signature,
    Done,
}

struct Body {
    phase: BodyPhase,
    line_start: bool,
    /// The start of the current line, read ahead to look for [`ARMOR`].
    probe: BytesMut,
    captured: BytesMut,
    signature: Option<Bytes>,
}

/// A tag object read from a [`Bucket`].
///
/// Reading from the `TagReader` yields the tag message. A signature
/// following the message is not part of it, see [`TagReader::signature`].
pub struct TagReader<B> {
    source: Source<B>,
    config: ParseConfig,
    stage: Stage,
    failed: bool,
    object: Option<ObjectId>,
    kind: Option<ObjectKind>,
    name: Option<String>,
    tagger: Option<Person>,
    body: Body,
}

impl<B: Bucket> TagReader<B> {
    pub fn new(bucket: B) -> Self {
        Self::with_config(bucket, ParseConfig::default())
    }

    pub fn with_config(bucket: B, config: ParseConfig) -> Self {
        Self {
            source: Source::new(bucket, &config),
            config,
            stage: Stage::ObjectType,
            failed: false,
            object: None,
            kind: None,
            name: None,
            tagger: None,
            body: Body {
                phase: BodyPhase::Message,
                line_start: true,
                probe: BytesMut::new(),
                captured: BytesMut::new(),
                signature: None,
            },
        }
    }

    pub fn object_id(&mut self) -> Result<ObjectId, Error> {
        self.advance(Stage::Name)?;
        self.object.ok_or_else(|| Error::failed(self.source.name()))
    }

    pub fn object_kind(&mut self) -> Result<ObjectKind, Error> {
        self.advance(Stage::Name)?;
        self.kind.ok_or_else(|| Error::failed(self.source.name()))
    }

    pub fn tag_name(&mut self) -> Result<&str, Error> {
        self.advance(Stage::Tagger)?;
        self.name
            .as_deref()
            .ok_or_else(|| Error::failed(self.source.name()))
    }

    /// The tagger. Tags written without a tagger report [`Person::epoch`].
    pub fn tagger(&mut self) -> Result<&Person, Error> {
        self.advance(Stage::Headers)?;
        self.tagger
            .as_ref()
            .ok_or_else(|| Error::failed(self.source.name()))
    }

    pub fn header(&mut self) -> Result<TagHeader, Error> {
        self.advance(Stage::Headers)?;
        match (self.object, self.kind, &self.name, &self.tagger) {
            (Some(object), Some(kind), Some(name), Some(tagger)) => Ok(TagHeader {
                object,
                kind,
                name: name.clone(),
                tagger: tagger.clone(),
            }),
            _ => Err(Error::failed(self.source.name())),
        }
    }

    /// The signature following the message, if any.
    ///
    /// Any part of the message not read yet is skipped.
    pub fn signature(&mut self) -> Result<Option<Bytes>, Error> {
        while self.body.phase != BodyPhase::Done {
            if self.read_body(usize::MAX)?.is_empty() && self.body.phase == BodyPhase::Message {
                return Err(git_bucket::Error::would_block(self.source.name()).into());
            }
        }
        Ok(self.body.signature.clone())
    }

    /// The bytes covered by the tag's signature, i.e. the raw tag up to the
    /// start of the signature.
    ///
    /// The raw tag is read from a duplicate of the underlying bucket, rewound
    /// to the start.
    pub fn signed_payload(&mut self) -> Result<Bytes, Error> {
        let raw = self.source.duplicate(true)?.read_to_end()?;
        let replay = MemoryBucket::new(raw.clone()).with_name(self.source.name());
        let signature = TagReader::with_config(replay, self.config)
            .signature()?
            .map_or(0, |signature| signature.len());
        Ok(raw.slice(..raw.len() - signature))
    }

    fn advance(&mut self, target: Stage) -> Result<(), Error> {
        if self.failed {
            return Err(Error::failed(self.source.name()));
        }
        while self.stage < target {
            let stage = self.stage;
            if let Err(e) = self.step() {
                if !e.is_would_block() {
                    log::debug!("{}: tag failed in {:?}: {}", self.source.name(), stage, e);
                    self.fail();
                }
                return Err(e);
            }
            if stage != self.stage {
                log::trace!("{}: {:?} -> {:?}", self.source.name(), stage, self.stage);
            }
        }
        Ok(())
    }

    fn fail(&mut self) {
        self.failed = true;
        self.source.dispose();
    }

    fn step(&mut self) -> Result<(), Error> {
        match self.stage {
            Stage::ObjectType => {
                let line = self.source.expect_line(ObjectKind::Tag, "object record")?;
                let hex = line
                    .field(b"object ")
                    .ok_or_else(|| self.malformed("object record"))?;
                self.object = Some(
                    ObjectId::from_hex(&hex, self.config.hash)
                        .map_err(|e| Error::invalid_id(self.source.name(), "object", e))?,
                );
                match self.type_record() {
                    Ok(kind) => {
                        self.kind = Some(kind);
                        self.stage = Stage::Name;
                    },
                    Err(e) => {
                        self.object = None;
                        self.source.unread(line.raw);
                        return Err(e);
                    },
                }
            },
            Stage::Name => {
                let line = self.source.expect_line(ObjectKind::Tag, "tag record")?;
                let name = line
                    .field(b"tag ")
                    .ok_or_else(|| self.malformed("tag record"))?;
                let name =
                    String::from_utf8(name.to_vec()).map_err(|_| self.malformed("UTF-8 tag name"))?;
                self.name = Some(name);
                self.stage = Stage::Tagger;
            },
            Stage::Tagger => {
                let line = self.source.expect_line(ObjectKind::Tag, "tagger record")?;
                if line.is_blank() {
                    log::warn!(
                        "{}: tag has no tagger, using the epoch instead",
                        self.source.name()
                    );
                    self.tagger = Some(Person::epoch());
                    self.stage = Stage::Body;
                } else if let Some(value) = line.field(b"tagger ") {
                    let tagger = Person::from_bytes(&value)
                        .map_err(|e| Error::invalid_person(self.source.name(), "tagger", e))?;
                    self.tagger = Some(tagger);
                    self.stage = Stage::Headers;
                } else {
                    return Err(self.malformed("tagger record"));
                }
            },
            Stage::Headers => match self.source.line()? {
                Some(line) if line.terminator.is_none() => {
                    return Err(git_bucket::Error::unexpected_eof(self.source.name()).into())
                },
                Some(line) if !line.is_blank() => {
                    log::debug!(
                        "{}: skipping '{}' header line",
                        self.source.name(),
                        String::from_utf8_lossy(&line.key_value().0)
                    );
                },
                _ => self.stage = Stage::Body,
            },
            Stage::Body => {},
        }
        Ok(())
    }

    fn type_record(&mut self) -> Result<ObjectKind, Error> {
        let line = self.source.expect_line(ObjectKind::Tag, "type record")?;
        let kind = line
            .field(b"type ")
            .ok_or_else(|| self.malformed("type record"))?;
        ObjectKind::from_bytes(&kind).map_err(|_| self.malformed("commit, tree, blob or tag"))
    }

    fn malformed(&self, expected: &'static str) -> Error {
        Error::malformed(self.source.name(), ObjectKind::Tag, expected)
    }

    /// Read up to `max` bytes of the message, stopping at the end of each
    /// line so that the next one can be checked for a signature.
    fn read_body(&mut self, max: usize) -> Result<ByteView, Error> {
        self.advance(Stage::Body)?;
        if max == 0 {
            return Ok(ByteView::Empty);
        }
        loop {
            match self.body.phase {
                BodyPhase::Done => return Ok(ByteView::Eof),
                BodyPhase::Signature => {
                    if let Err(e) = self.capture() {
                        if !e.is_would_block() {
                            self.fail();
                        }
                        return Err(e);
                    }
                    continue;
                },
                BodyPhase::Message => {},
            }

            if self.body.line_start {
                if !self.fill_probe()? {
                    return Ok(ByteView::Empty);
                }
                if ARMOR.iter().any(|armor| self.body.probe.starts_with(armor)) {
                    log::debug!("{}: found signature", self.source.name());
                    let probe = self.body.probe.split();
                    self.body.captured.extend_from_slice(&probe);
                    self.body.phase = BodyPhase::Signature;
                    continue;
                }
                self.body.line_start = false;
            }

            if !self.body.probe.is_empty() {
                let n = match self.body.probe.iter().take(max).position(|b| *b == b'\n') {
                    Some(i) => {
                        self.body.line_start = true;
                        i + 1
                    },
                    None => max.min(self.body.probe.len()),
                };
                return Ok(ByteView::from(self.body.probe.split_to(n)));
            }

            return match self.source.read(max)? {
                ByteView::Data(bytes) => match bytes.iter().position(|b| *b == b'\n') {
                    Some(i) => {
                        self.body.line_start = true;
                        self.source.unread(ByteView::from(bytes.slice(i + 1..)));
                        Ok(ByteView::from(bytes.slice(..=i)))
                    },
                    None => Ok(ByteView::Data(bytes)),
                },
                ByteView::Eof => {
                    self.body.phase = BodyPhase::Done;
                    Ok(ByteView::Eof)
                },
                ByteView::Empty => Ok(ByteView::Empty),
            };
        }
    }

    /// Gather enough of the next line to tell whether it starts a
    /// signature. Returns `false` if the source has nothing to offer yet.
    fn fill_probe(&mut self) -> Result<bool, Error> {
        while self.body.probe.len() < PROBE && !self.body.probe.contains(&b'\n') {
            match self.source.read(PROBE - self.body.probe.len())? {
                ByteView::Data(bytes) => self.body.probe.extend_from_slice(&bytes),
                ByteView::Eof => break,
                ByteView::Empty => return Ok(false),
            }
        }
        Ok(true)
    }

    /// Read the signature, which runs to the end of the tag.
    fn capture(&mut self) -> Result<(), Error> {
        let max = self.config.max_signature;
        loop {
            if self.body.captured.len() > max {
                return Err(Error::SignatureTooLarge {
                    name: self.source.name().to_owned(),
                    max,
                });
            }
            match self.source.read(max + 1 - self.body.captured.len())? {
                ByteView::Data(bytes) => self.body.captured.extend_from_slice(&bytes),
                ByteView::Eof => {
                    self.body.signature = Some(self.body.captured.split().freeze());
                    self.body.phase = BodyPhase::Done;
                    return Ok(());
                },
                ByteView::Empty => {
                    return Err(git_bucket::Error::would_block(self.source.name()).into())
                },
            }
        }
    }
}

impl<B: Bucket> Bucket for TagReader<B> {
    fn name(&self) -> &str {
        self.source.name()
    }

    fn read(&mut self, max: usize) -> Result<ByteView, git_bucket::Error> {
        self.read_body(max).map_err(Into::into)
    }

    fn peek(&self) -> ByteView {
        if self.stage == Stage::Body && self.body.phase == BodyPhase::Done {
            ByteView::Eof
        } else {
            ByteView::Empty
        }
    }

    fn position(&self) -> Option<u64> {
        self.source.position()
    }

    /// Duplicates the raw object, not the reader.
    fn duplicate(&mut self, reset: bool) -> Result<Box<dyn Bucket>, git_bucket::Error> {
        self.source.duplicate(reset)
    }

    fn dispose(&mut self) {
        self.source.dispose()
    }
}

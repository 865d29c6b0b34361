// Copyright © 2022 The Radicle Link Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Reading commit objects.
//!
//! A commit is laid out as
//!
//! ```text
//! tree <id>
//! parent <id>         (zero or more)
//! author <person>
//! committer <person>
//! <key> <value>       (zero or more, continuation lines start with a space)
//!
//! <message>
//! ```
//!
//! [`CommitReader`] parses the header lazily, as far as the accessor being
//! called needs it, and then exposes the message as a [`Bucket`].

use std::fmt;

use bytes::{BufMut as _, Bytes, BytesMut};
use git_bucket::{Bucket, ByteView, MemoryBucket};

use crate::{
    signed::SignedPayload,
    source::Source,
    Error,
    ObjectId,
    ObjectKind,
    ParseConfig,
    Person,
};

/// The key of an extension header.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExtensionHeader {
    /// `mergetag`, a tag object folded into a merge commit.
    MergeTag,
    /// `gpgsig`
    Signature,
    /// `gpgsig-sha256`
    SignatureSha256,
    Unknown(String),
}

impl ExtensionHeader {
    pub fn from_key(key: &[u8]) -> Self {
        match key {
            b"mergetag" => Self::MergeTag,
            b"gpgsig" => Self::Signature,
            b"gpgsig-sha256" => Self::SignatureSha256,
            other => Self::Unknown(String::from_utf8_lossy(other).into_owned()),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::MergeTag => "mergetag",
            Self::Signature => "gpgsig",
            Self::SignatureSha256 => "gpgsig-sha256",
            Self::Unknown(key) => key,
        }
    }

    pub fn is_signature(&self) -> bool {
        matches!(self, Self::Signature | Self::SignatureSha256)
    }
}

impl fmt::Display for ExtensionHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Receives the value of every `mergetag`, `gpgsig` and `gpgsig-sha256`
/// header. The value is unfolded: continuation lines are joined with `\n`
/// and lose their leading space.
///
/// Whatever the handler leaves unread is skipped.
pub type HeaderHandler = Box<dyn FnMut(&ExtensionHeader, &mut dyn Bucket) -> Result<(), Error>>;

/// The fixed fields of a commit header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitHeader {
    pub tree: ObjectId,
    pub parents: Vec<ObjectId>,
    pub author: Person,
    pub committer: Person,
}

impl fmt::Display for CommitHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "tree {}", self.tree)?;
        for parent in &self.parents {
            writeln!(f, "parent {parent}")?;
        }
        writeln!(f, "author {}", self.author)?;
        writeln!(f, "committer {}", self.committer)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Stage {
    Tree,
    Parents,
    Author,
    Committer,
    Headers,
    Body,
}

/// A commit object read from a [`Bucket`].
///
/// Reading from the `CommitReader` yields the commit message.
pub struct CommitReader<B> {
    source: Source<B>,
    config: ParseConfig,
    stage: Stage,
    failed: bool,
    tree: Option<ObjectId>,
    parents: Vec<ObjectId>,
    author: Option<Person>,
    committer: Option<Person>,
    extensions: Vec<ExtensionHeader>,
    handler: Option<HeaderHandler>,
}

impl<B: Bucket> CommitReader<B> {
    pub fn new(bucket: B) -> Self {
        Self::with_config(bucket, ParseConfig::default())
    }

    pub fn with_config(bucket: B, config: ParseConfig) -> Self {
        Self {
            source: Source::new(bucket, &config),
            config,
            stage: Stage::Tree,
            failed: false,
            tree: None,
            parents: Vec::new(),
            author: None,
            committer: None,
            extensions: Vec::new(),
            handler: None,
        }
    }

    /// Set the [`HeaderHandler`]. Without one, extension header values are
    /// skipped.
    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&ExtensionHeader, &mut dyn Bucket) -> Result<(), Error> + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn tree_id(&mut self) -> Result<ObjectId, Error> {
        self.advance(Stage::Parents)?;
        self.tree.ok_or_else(|| Error::failed(self.source.name()))
    }

    /// The parents, in the order they appear in the commit.
    pub fn parent_ids(&mut self) -> Result<&[ObjectId], Error> {
        self.advance(Stage::Author)?;
        Ok(&self.parents)
    }

    pub fn author(&mut self) -> Result<&Person, Error> {
        self.advance(Stage::Committer)?;
        self.author
            .as_ref()
            .ok_or_else(|| Error::failed(self.source.name()))
    }

    pub fn committer(&mut self) -> Result<&Person, Error> {
        self.advance(Stage::Headers)?;
        self.committer
            .as_ref()
            .ok_or_else(|| Error::failed(self.source.name()))
    }

    pub fn header(&mut self) -> Result<CommitHeader, Error> {
        self.advance(Stage::Headers)?;
        match (self.tree, &self.author, &self.committer) {
            (Some(tree), Some(author), Some(committer)) => Ok(CommitHeader {
                tree,
                parents: self.parents.clone(),
                author: author.clone(),
                committer: committer.clone(),
            }),
            _ => Err(Error::failed(self.source.name())),
        }
    }

    /// The extension headers, in the order they appear in the commit. This
    /// reads the whole header.
    pub fn extension_headers(&mut self) -> Result<&[ExtensionHeader], Error> {
        self.advance(Stage::Body)?;
        Ok(&self.extensions)
    }

    /// The bytes covered by the commit's signature, i.e. the raw commit
    /// without its `gpgsig` and `gpgsig-sha256` headers.
    ///
    /// The payload is read from a duplicate of the underlying bucket, rewound
    /// to the start, so this neither depends on nor disturbs the state of
    /// this reader.
    pub fn signed_payload(&mut self) -> Result<SignedPayload<Box<dyn Bucket>>, Error> {
        let raw = self.source.duplicate(true)?;
        Ok(SignedPayload::new(raw, &self.config))
    }

    fn advance(&mut self, target: Stage) -> Result<(), Error> {
        if self.failed {
            return Err(Error::failed(self.source.name()));
        }
        while self.stage < target {
            let stage = self.stage;
            if let Err(e) = self.step() {
                if self.failed || !e.is_would_block() {
                    log::debug!("{}: commit failed in {:?}: {}", self.source.name(), stage, e);
                    self.failed = true;
                    self.source.dispose();
                }
                return Err(e);
            }
            if stage != self.stage {
                log::trace!("{}: {:?} -> {:?}", self.source.name(), stage, self.stage);
            }
        }
        Ok(())
    }

    fn step(&mut self) -> Result<(), Error> {
        match self.stage {
            Stage::Tree => {
                let line = self.source.expect_line(ObjectKind::Commit, "tree record")?;
                let hex = line
                    .field(b"tree ")
                    .ok_or_else(|| self.malformed("tree record"))?;
                self.tree = Some(self.id("tree", &hex)?);
                self.stage = Stage::Parents;
            },
            Stage::Parents => {
                let line = self
                    .source
                    .expect_line(ObjectKind::Commit, "parent or author record")?;
                if let Some(hex) = line.field(b"parent ") {
                    let parent = self.id("parent", &hex)?;
                    self.parents.push(parent);
                } else if line.starts_with(b"author ") {
                    self.source.unread(line.raw);
                    self.stage = Stage::Author;
                } else {
                    return Err(self.malformed("parent or author record"));
                }
            },
            Stage::Author => {
                self.author = Some(self.person("author", "author record")?);
                self.stage = Stage::Committer;
            },
            Stage::Committer => {
                self.committer = Some(self.person("committer", "committer record")?);
                self.stage = Stage::Headers;
            },
            Stage::Headers => self.extension_header()?,
            Stage::Body => {},
        }
        Ok(())
    }

    fn extension_header(&mut self) -> Result<(), Error> {
        let line = match self.source.line()? {
            Some(line) if !line.is_blank() => line,
            _ => {
                log::debug!(
                    "{}: header complete, {} parents, {} extension headers",
                    self.source.name(),
                    self.parents.len(),
                    self.extensions.len()
                );
                self.stage = Stage::Body;
                return Ok(());
            },
        };
        if line.terminator.is_none() {
            return Err(git_bucket::Error::unexpected_eof(self.source.name()).into());
        }
        if line.starts_with(b" ") {
            return Err(self.malformed("extension header"));
        }

        let (key, first) = line.key_value();
        let header = ExtensionHeader::from_key(&key);
        let value = self.folded_value(line.raw, first)?;
        match (&header, self.handler.as_mut()) {
            (ExtensionHeader::Unknown(key), _) => {
                log::debug!("{}: discarding '{key}' header", self.source.name());
            },
            (_, Some(handler)) => {
                let mut value = MemoryBucket::new(value).with_name(self.source.name());
                if let Err(e) = handler(&header, &mut value) {
                    self.failed = true;
                    return Err(e);
                }
            },
            (_, None) => {},
        }
        self.extensions.push(header);
        Ok(())
    }

    /// Gather the continuation lines following `first` and unfold them.
    ///
    /// If the source runs dry, every line read so far, starting with the
    /// `<key> <value>` line in `raw`, is put back so the header can be read
    /// again.
    fn folded_value(&mut self, raw: ByteView, first: ByteView) -> Result<Bytes, Error> {
        let mut lines = vec![raw];
        let mut value = BytesMut::from(&first[..]);
        loop {
            let line = match self.source.line() {
                Ok(line) => line,
                Err(e) => {
                    for raw in lines.into_iter().rev() {
                        self.source.unread(raw);
                    }
                    return Err(e.into());
                },
            };
            match line {
                None => break,
                Some(line) if line.starts_with(b" ") => {
                    if line.terminator.is_none() {
                        return Err(git_bucket::Error::unexpected_eof(self.source.name()).into());
                    }
                    value.put_u8(b'\n');
                    value.extend_from_slice(&line.content()[1..]);
                    lines.push(line.raw);
                },
                Some(line) => {
                    self.source.unread(line.raw);
                    break;
                },
            }
        }
        Ok(value.freeze())
    }

    fn person(&mut self, key: &'static str, expected: &'static str) -> Result<Person, Error> {
        let line = self.source.expect_line(ObjectKind::Commit, expected)?;
        let value = line
            .field(key.as_bytes())
            .and_then(|value| value.strip_prefix(b" "))
            .ok_or_else(|| self.malformed(expected))?;
        Person::from_bytes(&value).map_err(|e| Error::invalid_person(self.source.name(), key, e))
    }

    fn id(&self, field: &'static str, hex: &[u8]) -> Result<ObjectId, Error> {
        ObjectId::from_hex(hex, self.config.hash)
            .map_err(|e| Error::invalid_id(self.source.name(), field, e))
    }

    fn malformed(&self, expected: &'static str) -> Error {
        Error::malformed(self.source.name(), ObjectKind::Commit, expected)
    }
}

impl<B: Bucket> Bucket for CommitReader<B> {
    fn name(&self) -> &str {
        self.source.name()
    }

    fn read(&mut self, max: usize) -> Result<ByteView, git_bucket::Error> {
        self.advance(Stage::Body)?;
        self.source.read(max)
    }

    fn peek(&self) -> ByteView {
        if self.stage == Stage::Body && !self.failed {
            self.source.peek()
        } else {
            ByteView::Empty
        }
    }

    fn poll(&mut self, min: usize) -> Result<ByteView, git_bucket::Error> {
        self.advance(Stage::Body)?;
        self.source.poll(min)
    }

    /// The offset into the raw object.
    fn position(&self) -> Option<u64> {
        self.source.position()
    }

    fn remaining_len(&self) -> Option<u64> {
        if self.stage == Stage::Body {
            self.source.remaining_len()
        } else {
            None
        }
    }

    /// Duplicates the raw object, not the reader.
    fn duplicate(&mut self, reset: bool) -> Result<Box<dyn Bucket>, git_bucket::Error> {
        self.source.duplicate(reset)
    }

    fn dispose(&mut self) {
        self.source.dispose()
    }
}

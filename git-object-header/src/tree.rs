// Copyright © 2022 The Radicle Link Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Reading tree objects.
//!
//! A tree is a sequence of entries `<octal mode> <name>\0<raw id>`, without
//! any separator between entries.

use std::{fmt, io};

use bstr::{BStr, BString};
use git_bucket::{Bucket, ByteView};

use crate::{source::Source, Error, ObjectId, ObjectKind, ParseConfig};

/// The kind of a tree entry, as encoded in its mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileMode {
    Directory,
    File,
    FileExecutable,
    SymbolicLink,
    /// A submodule commit.
    GitLink,
}

impl FileMode {
    const TYPE_MASK: u32 = 0o170000;

    /// Parse an octal mode.
    ///
    /// Modes are classified by their type bits and, for files, the owner's
    /// executable bit, so that non-canonical modes written by old versions
    /// of git, e.g. `100664`, are accepted.
    pub fn from_octal(octal: &[u8]) -> Option<Self> {
        if octal.is_empty() || octal.len() > 7 {
            return None;
        }
        let mut mode = 0u32;
        for b in octal {
            match b {
                b'0'..=b'7' => mode = (mode << 3) | u32::from(b - b'0'),
                _ => return None,
            }
        }
        Self::from_bits(mode)
    }

    pub fn from_bits(mode: u32) -> Option<Self> {
        match mode & Self::TYPE_MASK {
            0o040000 => Some(Self::Directory),
            0o100000 if mode & 0o100 != 0 => Some(Self::FileExecutable),
            0o100000 => Some(Self::File),
            0o120000 => Some(Self::SymbolicLink),
            0o160000 => Some(Self::GitLink),
            _ => None,
        }
    }

    /// The canonical octal form git writes.
    pub const fn as_octal(&self) -> &'static str {
        match self {
            Self::Directory => "40000",
            Self::File => "100644",
            Self::FileExecutable => "100755",
            Self::SymbolicLink => "120000",
            Self::GitLink => "160000",
        }
    }

    /// The object kind an entry of this mode points to.
    pub fn object_kind(&self) -> ObjectKind {
        match self {
            Self::Directory => ObjectKind::Tree,
            Self::File | Self::FileExecutable | Self::SymbolicLink => ObjectKind::Blob,
            Self::GitLink => ObjectKind::Commit,
        }
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_octal())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: FileMode,
    pub name: BString,
    pub id: ObjectId,
}

impl TreeEntry {
    pub fn name(&self) -> &BStr {
        self.name.as_ref()
    }

    /// The entry in the form it takes in a tree object.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.name.len() + 8 + self.id.as_bytes().len());
        self.write_to(&mut buf)
            .map(|()| buf)
            .unwrap_or_default()
    }

    pub fn write_to<W: io::Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(self.mode.as_octal().as_bytes())?;
        w.write_all(b" ")?;
        w.write_all(&self.name)?;
        w.write_all(b"\0")?;
        w.write_all(self.id.as_bytes())
    }
}

/// The entries of a tree object read from a [`Bucket`].
///
/// The iterator ends after the first error.
pub struct TreeReader<B> {
    source: Source<B>,
    config: ParseConfig,
    declared: Option<ObjectKind>,
    checked: bool,
    done: bool,
}

impl<B: Bucket> TreeReader<B> {
    pub fn new(bucket: B) -> Self {
        Self::with_config(bucket, ParseConfig::default())
    }

    pub fn with_config(bucket: B, config: ParseConfig) -> Self {
        Self {
            source: Source::new(bucket, &config),
            config,
            declared: None,
            checked: false,
            done: false,
        }
    }

    /// Declare the kind of the object the bucket holds, e.g. as read from
    /// the object's envelope. Anything but a tree is rejected on first
    /// access.
    pub fn with_kind(mut self, kind: ObjectKind) -> Self {
        self.declared = Some(kind);
        self
    }

    fn check_kind(&mut self) -> Result<(), Error> {
        if self.checked {
            return Ok(());
        }
        match self.declared {
            Some(found) if found != ObjectKind::Tree => Err(Error::UnexpectedKind {
                name: self.source.name().to_owned(),
                expected: ObjectKind::Tree,
                found,
            }),
            _ => {
                self.checked = true;
                Ok(())
            },
        }
    }

    fn entry(&mut self) -> Result<Option<TreeEntry>, Error> {
        self.check_kind()?;
        let (raw_record, record) = match self.source.record()? {
            None => return Ok(None),
            Some(record) if record.terminator.is_none() => {
                return Err(Error::truncated_tree(
                    self.source.name(),
                    "entry ends before the end of its name",
                ))
            },
            Some(record) => (record.raw.clone(), record.content()),
        };
        let space = record.iter().position(|b| *b == b' ').ok_or_else(|| {
            Error::truncated_tree(self.source.name(), "no space between mode and name")
        })?;
        let mode = FileMode::from_octal(&record[..space])
            .ok_or_else(|| Error::malformed(self.source.name(), ObjectKind::Tree, "file mode"))?;
        let name = BString::from(&record[space + 1..]);

        let raw = match self.source.read_exact(self.config.hash.len()) {
            Ok(raw) => raw,
            Err(e) if e.is_unexpected_eof() => {
                return Err(Error::truncated_tree(
                    self.source.name(),
                    "object id is cut short",
                ))
            },
            Err(e) => {
                self.source.unread(raw_record);
                return Err(e.into());
            },
        };
        let id = ObjectId::from_bytes(&raw, self.config.hash)
            .map_err(|e| Error::invalid_id(self.source.name(), "entry", e))?;
        log::trace!("{}: {} {} {}", self.source.name(), mode, name, id);
        Ok(Some(TreeEntry { mode, name, id }))
    }
}

impl<B: Bucket> Iterator for TreeReader<B> {
    type Item = Result<TreeEntry, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.entry() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.done = true;
                None
            },
            Err(e) if e.is_would_block() => Some(Err(e)),
            Err(e) => {
                self.done = true;
                self.source.dispose();
                Some(Err(e))
            },
        }
    }
}

impl<B: Bucket> std::iter::FusedIterator for TreeReader<B> {}

/// Reading from a `TreeReader` yields the raw entries not iterated over yet.
impl<B: Bucket> Bucket for TreeReader<B> {
    fn name(&self) -> &str {
        self.source.name()
    }

    fn read(&mut self, max: usize) -> Result<ByteView, git_bucket::Error> {
        self.check_kind()?;
        self.source.read(max)
    }

    fn peek(&self) -> ByteView {
        if self.checked {
            self.source.peek()
        } else {
            ByteView::Empty
        }
    }

    fn position(&self) -> Option<u64> {
        self.source.position()
    }

    fn remaining_len(&self) -> Option<u64> {
        self.source.remaining_len()
    }

    fn duplicate(&mut self, reset: bool) -> Result<Box<dyn Bucket>, git_bucket::Error> {
        self.source.duplicate(reset)
    }

    fn dispose(&mut self) {
        self.source.dispose()
    }
}

// Copyright © 2022 The Radicle Link Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{fmt, ops::Deref, str};

use bytes::{Bytes, BytesMut};

/// A view of bytes handed out by a [`crate::Bucket`].
///
/// Cloning and slicing a view never copies the underlying bytes; the view
/// shares the storage it was cut from. A copy is only made by
/// [`ByteView::to_vec`].
///
/// A [`ByteView::Data`] is never empty, use [`ByteView::from`] to get the
/// normalisation for free.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub enum ByteView {
    /// Some bytes.
    Data(Bytes),
    /// Nothing is available right now, but more may arrive later.
    #[default]
    Empty,
    /// The source is exhausted.
    Eof,
}

impl ByteView {
    pub const fn from_static(bytes: &'static [u8]) -> Self {
        if bytes.is_empty() {
            Self::Empty
        } else {
            Self::Data(Bytes::from_static(bytes))
        }
    }

    pub fn copy_from_slice(bytes: &[u8]) -> Self {
        Self::from(Bytes::copy_from_slice(bytes))
    }

    /// `true` if this is the final [`ByteView::Eof`].
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }

    /// `true` if this view carries bytes.
    pub fn has_data(&self) -> bool {
        matches!(self, Self::Data(_))
    }

    pub fn as_slice(&self) -> &[u8] {
        match self {
            Self::Data(bytes) => bytes,
            Self::Empty | Self::Eof => &[],
        }
    }

    /// Cut `len` bytes starting at `start` out of this view.
    ///
    /// # Panics
    ///
    /// If `start + len` is out of bounds.
    pub fn slice(&self, start: usize, len: usize) -> Self {
        match self {
            Self::Data(bytes) => Self::from(bytes.slice(start..start + len)),
            Self::Empty | Self::Eof => {
                assert!(start == 0 && len == 0, "slice of an empty view");
                self.clone()
            },
        }
    }

    /// Everything from `start` to the end of the view.
    ///
    /// # Panics
    ///
    /// If `start` is out of bounds.
    pub fn slice_from(&self, start: usize) -> Self {
        self.slice(start, self.len() - start)
    }

    /// Split the view at `at`, returning the first part and leaving the
    /// remainder in `self`.
    ///
    /// # Panics
    ///
    /// If `at` is out of bounds.
    pub fn split_to(&mut self, at: usize) -> Self {
        match self {
            Self::Data(bytes) => {
                let head = bytes.split_to(at);
                if bytes.is_empty() {
                    *self = Self::Empty;
                }
                Self::from(head)
            },
            Self::Empty | Self::Eof => {
                assert!(at == 0, "split of an empty view");
                Self::Empty
            },
        }
    }

    /// If the view starts with `prefix`, return the rest of it.
    pub fn strip_prefix(&self, prefix: &[u8]) -> Option<Self> {
        self.as_slice()
            .starts_with(prefix)
            .then(|| self.slice_from(prefix.len()))
    }

    /// Interpret the view as UTF-8.
    pub fn to_str(&self) -> Result<&str, str::Utf8Error> {
        str::from_utf8(self.as_slice())
    }

    /// Compare against `other`, ignoring ASCII case.
    pub fn eq_ignore_ascii_case(&self, other: &[u8]) -> bool {
        self.as_slice().eq_ignore_ascii_case(other)
    }

    /// Materialise the view into an owned buffer.
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_slice().to_vec()
    }

    pub fn into_bytes(self) -> Bytes {
        match self {
            Self::Data(bytes) => bytes,
            Self::Empty | Self::Eof => Bytes::new(),
        }
    }

    /// Append `other` to `self`. This copies both views into a new buffer
    /// unless one of them is empty.
    pub fn concat(self, other: Self) -> Self {
        match (self, other) {
            (Self::Data(a), Self::Data(b)) => {
                let mut buf = BytesMut::with_capacity(a.len() + b.len());
                buf.extend_from_slice(&a);
                buf.extend_from_slice(&b);
                Self::Data(buf.freeze())
            },
            (Self::Data(a), _) => Self::Data(a),
            (_, other) => other,
        }
    }
}

impl Deref for ByteView {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl AsRef<[u8]> for ByteView {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl From<Bytes> for ByteView {
    fn from(bytes: Bytes) -> Self {
        if bytes.is_empty() {
            Self::Empty
        } else {
            Self::Data(bytes)
        }
    }
}

impl From<BytesMut> for ByteView {
    fn from(bytes: BytesMut) -> Self {
        Self::from(bytes.freeze())
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from(Bytes::from(bytes))
    }
}

impl From<&'static [u8]> for ByteView {
    fn from(bytes: &'static [u8]) -> Self {
        Self::from_static(bytes)
    }
}

impl From<&'static str> for ByteView {
    fn from(s: &'static str) -> Self {
        Self::from_static(s.as_bytes())
    }
}

impl PartialEq<[u8]> for ByteView {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_slice() == other
    }
}

impl PartialEq<&[u8]> for ByteView {
    fn eq(&self, other: &&[u8]) -> bool {
        self.as_slice() == *other
    }
}

impl<const N: usize> PartialEq<&[u8; N]> for ByteView {
    fn eq(&self, other: &&[u8; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl PartialEq<&str> for ByteView {
    fn eq(&self, other: &&str) -> bool {
        self.as_slice() == other.as_bytes()
    }
}

impl fmt::Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data(bytes) => write!(f, "Data({bytes:?})"),
            Self::Empty => f.write_str("Empty"),
            Self::Eof => f.write_str("Eof"),
        }
    }
}

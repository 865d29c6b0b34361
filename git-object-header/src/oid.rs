// Copyright © 2022 The Radicle Link Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{
    cmp::Ordering,
    fmt::{self, Display},
    hash::{Hash, Hasher},
    str::FromStr,
};

use thiserror::Error;

/// The hash function an object store names its objects with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HashKind {
    #[default]
    Sha1,
    Sha256,
}

impl HashKind {
    /// The width of a raw object id.
    pub const fn len(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
        }
    }

    /// The width of a hex encoded object id.
    pub const fn hex_len(self) -> usize {
        self.len() * 2
    }

    fn from_hex_len(len: usize) -> Option<Self> {
        match len {
            40 => Some(Self::Sha1),
            64 => Some(Self::Sha256),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("expected an object id of {expected} characters, found {found}")]
    InvalidLength { expected: usize, found: usize },
    #[error("invalid hex in object id")]
    InvalidHex(#[source] hex::FromHexError),
}

/// The id of a git object.
///
/// Ids compare byte-wise, so a SHA-1 id that is a prefix of a SHA-256 id
/// sorts before it.
#[derive(Clone, Copy)]
pub struct ObjectId {
    kind: HashKind,
    bytes: [u8; 32],
}

impl ObjectId {
    /// Parse `hex` as an id of the given `kind`.
    pub fn from_hex(hex: &[u8], kind: HashKind) -> Result<Self, ParseError> {
        if hex.len() != kind.hex_len() {
            return Err(ParseError::InvalidLength {
                expected: kind.hex_len(),
                found: hex.len(),
            });
        }
        let mut bytes = [0; 32];
        hex::decode_to_slice(hex, &mut bytes[..kind.len()]).map_err(ParseError::InvalidHex)?;
        Ok(Self { kind, bytes })
    }

    /// Construct an id from its raw bytes.
    pub fn from_bytes(raw: &[u8], kind: HashKind) -> Result<Self, ParseError> {
        if raw.len() != kind.len() {
            return Err(ParseError::InvalidLength {
                expected: kind.len(),
                found: raw.len(),
            });
        }
        let mut bytes = [0; 32];
        bytes[..raw.len()].copy_from_slice(raw);
        Ok(Self { kind, bytes })
    }

    pub fn kind(&self) -> HashKind {
        self.kind
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.kind.len()]
    }

    pub fn is_zero(&self) -> bool {
        self.as_bytes().iter().all(|b| *b == 0)
    }
}

impl PartialEq for ObjectId {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for ObjectId {}

impl Hash for ObjectId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state)
    }
}

impl PartialOrd for ObjectId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ObjectId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl AsRef<[u8]> for ObjectId {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&hex::encode(self.as_bytes()))
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ObjectId({self})")
    }
}

impl FromStr for ObjectId {
    type Err = ParseError;

    /// The [`HashKind`] is inferred from the length of `s`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = HashKind::from_hex_len(s.len()).ok_or(ParseError::InvalidLength {
            expected: HashKind::Sha1.hex_len(),
            found: s.len(),
        })?;
        Self::from_hex(s.as_bytes(), kind)
    }
}

impl TryFrom<&str> for ObjectId {
    type Error = ParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;
    use serde::{de::Visitor, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for ObjectId {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            self.to_string().serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for ObjectId {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            struct ObjectIdVisitor;

            impl<'de> Visitor<'de> for ObjectIdVisitor {
                type Value = ObjectId;

                fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    write!(f, "a hexadecimal SHA-1 or SHA-256 object id")
                }

                fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
                where
                    E: serde::de::Error,
                {
                    s.parse().map_err(serde::de::Error::custom)
                }
            }

            deserializer.deserialize_str(ObjectIdVisitor)
        }
    }
}

#[cfg(feature = "git2")]
mod git2_impls {
    use super::*;

    impl From<git2::Oid> for ObjectId {
        fn from(oid: git2::Oid) -> Self {
            let mut bytes = [0; 32];
            bytes[..20].copy_from_slice(oid.as_bytes());
            Self {
                kind: HashKind::Sha1,
                bytes,
            }
        }
    }

    impl TryFrom<ObjectId> for git2::Oid {
        type Error = git2::Error;

        fn try_from(id: ObjectId) -> Result<Self, Self::Error> {
            git2::Oid::from_bytes(id.as_bytes())
        }
    }
}

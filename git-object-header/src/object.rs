// Copyright © 2022 The Radicle Link Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{fmt, str::FromStr};

use thiserror::Error;

/// The type of a git object, as named by a tag's `type` header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Commit,
    Tree,
    Blob,
    Tag,
}

impl ObjectKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Commit => "commit",
            Self::Tree => "tree",
            Self::Blob => "blob",
            Self::Tag => "tag",
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseKindError> {
        match bytes {
            b"commit" => Ok(Self::Commit),
            b"tree" => Ok(Self::Tree),
            b"blob" => Ok(Self::Blob),
            b"tag" => Ok(Self::Tag),
            other => Err(ParseKindError(String::from_utf8_lossy(other).into_owned())),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown object type '{0}'")]
pub struct ParseKindError(pub String);

impl FromStr for ObjectKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "git2")]
mod git2_impls {
    use super::*;

    impl From<ObjectKind> for git2::ObjectType {
        fn from(kind: ObjectKind) -> Self {
            match kind {
                ObjectKind::Commit => Self::Commit,
                ObjectKind::Tree => Self::Tree,
                ObjectKind::Blob => Self::Blob,
                ObjectKind::Tag => Self::Tag,
            }
        }
    }

    impl TryFrom<git2::ObjectType> for ObjectKind {
        type Error = ParseKindError;

        fn try_from(kind: git2::ObjectType) -> Result<Self, Self::Error> {
            match kind {
                git2::ObjectType::Commit => Ok(Self::Commit),
                git2::ObjectType::Tree => Ok(Self::Tree),
                git2::ObjectType::Blob => Ok(Self::Blob),
                git2::ObjectType::Tag => Ok(Self::Tag),
                git2::ObjectType::Any => Err(ParseKindError(kind.str().to_owned())),
            }
        }
    }
}

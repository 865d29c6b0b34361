// Copyright © 2022 The Radicle Link Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::io;

use thiserror::Error;

use crate::{oid, person, ObjectKind};

/// Errors raised while reading commit, tag and tree objects.
///
/// Every variant names the bucket the object was read from.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("malformed {object} in '{name}': expected {expected}")]
    Malformed {
        name: String,
        object: ObjectKind,
        expected: &'static str,
    },
    #[error("invalid object id in the {field} of '{name}'")]
    InvalidId {
        name: String,
        field: &'static str,
        #[source]
        source: oid::ParseError,
    },
    #[error("invalid {field} in '{name}'")]
    InvalidPerson {
        name: String,
        field: &'static str,
        #[source]
        source: person::ParseError,
    },
    #[error("truncated tree entry in '{name}': {reason}")]
    TruncatedTree { name: String, reason: &'static str },
    #[error("'{name}' is a {found}, expected a {expected}")]
    UnexpectedKind {
        name: String,
        expected: ObjectKind,
        found: ObjectKind,
    },
    #[error("signature in '{name}' exceeds {max} bytes")]
    SignatureTooLarge { name: String, max: usize },
    #[error("an earlier error left '{name}' unreadable")]
    Failed { name: String },
    #[error(transparent)]
    Bucket(#[from] git_bucket::Error),
}

impl Error {
    /// `true` if the error only says that the bucket had no data available
    /// yet. Readers can be asked again after such an error.
    pub fn is_would_block(&self) -> bool {
        matches!(self, Self::Bucket(git_bucket::Error::WouldBlock { .. }))
    }

    fn source_name(&self) -> &str {
        match self {
            Self::Malformed { name, .. }
            | Self::InvalidId { name, .. }
            | Self::InvalidPerson { name, .. }
            | Self::TruncatedTree { name, .. }
            | Self::UnexpectedKind { name, .. }
            | Self::SignatureTooLarge { name, .. }
            | Self::Failed { name } => name,
            Self::Bucket(_) => "bucket",
        }
    }

    pub(crate) fn malformed(name: &str, object: ObjectKind, expected: &'static str) -> Self {
        Self::Malformed {
            name: name.to_owned(),
            object,
            expected,
        }
    }

    pub(crate) fn truncated_tree(name: &str, reason: &'static str) -> Self {
        Self::TruncatedTree {
            name: name.to_owned(),
            reason,
        }
    }

    pub(crate) fn invalid_id(name: &str, field: &'static str, source: oid::ParseError) -> Self {
        Self::InvalidId {
            name: name.to_owned(),
            field,
            source,
        }
    }

    pub(crate) fn invalid_person(
        name: &str,
        field: &'static str,
        source: person::ParseError,
    ) -> Self {
        Self::InvalidPerson {
            name: name.to_owned(),
            field,
            source,
        }
    }

    pub(crate) fn failed(name: &str) -> Self {
        Self::Failed {
            name: name.to_owned(),
        }
    }
}

/// Readers are buckets themselves, so their errors have to be expressed as
/// bucket errors when they surface through [`git_bucket::Bucket::read`].
impl From<Error> for git_bucket::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Bucket(e) => e,
            e => git_bucket::Error::Io {
                name: e.source_name().to_owned(),
                source: io::Error::new(io::ErrorKind::InvalidData, e),
            },
        }
    }
}

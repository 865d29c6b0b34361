// Copyright © 2022 The Radicle Link Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::io;

use thiserror::Error;

/// Errors raised by buckets and the scanning protocol.
///
/// Every variant names the bucket it originated from, see
/// [`crate::Bucket::name`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("failed to read from '{name}'")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("line in '{name}' exceeds {max} bytes without a terminator")]
    LineTooLong { name: String, max: usize },
    #[error("unexpected end of '{name}'")]
    UnexpectedEof { name: String },
    #[error("'{name}' does not support '{op}'")]
    Unsupported { name: String, op: &'static str },
    #[error("'{name}' has no data available yet")]
    WouldBlock { name: String },
}

impl Error {
    pub fn unsupported(name: &str, op: &'static str) -> Self {
        Self::Unsupported {
            name: name.to_owned(),
            op,
        }
    }

    pub fn unexpected_eof(name: &str) -> Self {
        Self::UnexpectedEof {
            name: name.to_owned(),
        }
    }

    pub fn would_block(name: &str) -> Self {
        Self::WouldBlock {
            name: name.to_owned(),
        }
    }

    pub fn is_unexpected_eof(&self) -> bool {
        matches!(self, Self::UnexpectedEof { .. })
    }
}

pub fn into_io_err(e: Error) -> io::Error {
    match e {
        Error::Io { source, .. } => source,
        Error::WouldBlock { .. } => io::Error::new(io::ErrorKind::WouldBlock, e),
        Error::UnexpectedEof { .. } => io::Error::new(io::ErrorKind::UnexpectedEof, e),
        Error::Unsupported { .. } => io::Error::new(io::ErrorKind::Unsupported, e),
        e => io::Error::new(io::ErrorKind::InvalidData, e),
    }
}

// Copyright © 2022 The Radicle Link Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use git_bucket::{EnumSet, Eol};

use crate::HashKind;

/// Parameters shared by the object readers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseConfig {
    /// The width of the object ids found in headers and tree entries.
    pub hash: HashKind,
    /// The accepted header line terminators.
    pub eol: EnumSet<Eol>,
    /// The longest header line, or tree record, that is accepted.
    pub max_line: usize,
    /// The largest tag signature that is captured.
    pub max_signature: usize,
}

impl ParseConfig {
    pub const DEFAULT_MAX_LINE: usize = 64 * 1024;
    pub const DEFAULT_MAX_SIGNATURE: usize = 8 * 1024;

    pub fn with_hash(mut self, hash: HashKind) -> Self {
        self.hash = hash;
        self
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            hash: HashKind::Sha1,
            eol: Eol::LF,
            max_line: Self::DEFAULT_MAX_LINE,
            max_signature: Self::DEFAULT_MAX_SIGNATURE,
        }
    }
}

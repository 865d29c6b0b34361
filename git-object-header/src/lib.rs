// Copyright © 2022 The Radicle Link Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! # `git-object-header`
//!
//! Streaming readers for the headers of git commit, tag and tree objects.
//!
//! The readers take the (already inflated) object as a
//! [`git_bucket::Bucket`] and never need the whole object in memory. Header
//! fields are parsed on first access and cached; whatever follows the header
//! is handed on as a bucket again:
//!
//! * [`CommitReader`] yields the commit message,
//! * [`TagReader`] yields the tag message, setting aside a trailing
//!   signature,
//! * [`TreeReader`] iterates over the [`TreeEntry`]s.
//!
//! The bytes a commit or tag signature covers can be reconstructed with
//! [`CommitReader::signed_payload`] and [`TagReader::signed_payload`].

pub mod commit;
pub use commit::{CommitHeader, CommitReader, ExtensionHeader, HeaderHandler};

mod config;
pub use config::ParseConfig;

pub mod error;
pub use error::Error;

pub mod object;
pub use object::ObjectKind;

pub mod oid;
pub use oid::{HashKind, ObjectId};

pub mod person;
pub use person::{Person, Time};

mod signed;
pub use signed::SignedPayload;

mod source;

pub mod tag;
pub use tag::{TagHeader, TagReader};

pub mod tree;
pub use tree::{FileMode, TreeEntry, TreeReader};

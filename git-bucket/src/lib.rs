// Copyright © 2022 The Radicle Link Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! # `git-bucket`
//!
//! A [`Bucket`] is a lazy, forward-only source of bytes. Buckets are
//! composed by wrapping: every bucket owns (or borrows) at most one
//! upstream bucket, forming a single chain from the consumer down to the
//! actual source of the bytes.
//!
//! The unit of exchange is the [`ByteView`], a cheaply cloneable view
//! into shared bytes with two sentinel states: [`ByteView::Empty`] (nothing
//! is available *yet*) and [`ByteView::Eof`] (nothing will ever be
//! available again).
//!
//! ## Sources
//!
//! * [`MemoryBucket`] -- bytes already in memory, replayable.
//! * [`ReaderBucket`] -- any [`std::io::Read`].
//! * [`ChunkedBucket`] -- a sequence of fragments delivered as-is.
//!
//! ## Combinators
//!
//! * [`Concat`] -- one bucket after another.
//! * [`Take`] -- at most `n` bytes of a bucket.
//! * [`NoDispose`] -- shares a bucket without handing over its disposal.
//! * [`Replay`] -- records what was read so it can be duplicated.
//! * [`Spliced`] -- re-delivers bytes that were read one record too far.
//!
//! Line oriented scanning lives in [`scan`].

pub mod bucket;
pub use bucket::Bucket;

pub mod chunked;
pub use chunked::ChunkedBucket;

pub mod concat;
pub use concat::Concat;

pub mod dispose;
pub use dispose::NoDispose;

pub mod error;
pub use error::Error;

pub mod ext;
pub use ext::BucketExt;

pub mod io;
pub use io::BucketReader;

pub mod memory;
pub use memory::MemoryBucket;

pub mod reader;
pub use reader::ReaderBucket;

pub mod replay;
pub use replay::Replay;

pub mod scan;
pub use scan::{Eol, ScanState, Terminator};

pub mod splice;
pub use splice::{spliced, Spliced};

pub mod take;
pub use take::Take;

pub mod view;
pub use view::ByteView;

pub use bytes::Bytes;
pub use enumset::{enum_set, EnumSet};

// Copyright © 2022 The Radicle Link Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use git_bucket::{
    scan,
    spliced,
    Bucket,
    ByteView,
    EnumSet,
    Eol,
    ScanState,
    Spliced,
    Terminator,
};

use crate::{Error, ObjectKind, ParseConfig};

/// One line (or NUL terminated record) of an object.
#[derive(Clone, Debug)]
pub(crate) struct Line {
    pub raw: ByteView,
    pub terminator: Terminator,
}

impl Line {
    /// The line without its terminator.
    pub fn content(&self) -> ByteView {
        self.terminator.strip(&self.raw)
    }

    pub fn is_blank(&self) -> bool {
        !self.terminator.is_none() && self.raw.len() == self.terminator.len()
    }

    /// The value of a `<key> <value>` line, if the line starts with `prefix`.
    pub fn field(&self, prefix: &[u8]) -> Option<ByteView> {
        self.content().strip_prefix(prefix)
    }

    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.raw.starts_with(prefix)
    }

    /// Split a header line at its first space into key and value.
    pub fn key_value(&self) -> (ByteView, ByteView) {
        let content = self.content();
        match content.iter().position(|b| *b == b' ') {
            Some(i) => (content.slice(0, i), content.slice_from(i + 1)),
            None => (content, ByteView::Empty),
        }
    }
}

/// The bucket an object reader reads from.
///
/// Lines that turn out to belong to the next stage of a reader are put back
/// with [`Source::unread`]. The scan state is emptied into the same place
/// after every scan, so that the source can always be read directly.
pub(crate) struct Source<B> {
    inner: Spliced<B>,
    state: ScanState,
    eol: EnumSet<Eol>,
    max_line: usize,
    disposed: bool,
}

impl<B: Bucket> Source<B> {
    pub fn new(bucket: B, config: &ParseConfig) -> Self {
        Self {
            inner: spliced(ByteView::Empty, bucket),
            state: ScanState::new(),
            eol: config.eol,
            max_line: config.max_line,
            disposed: false,
        }
    }

    /// The next header line, or `None` at the end of the object.
    pub fn line(&mut self) -> Result<Option<Line>, git_bucket::Error> {
        self.scan(self.eol)
    }

    /// The next NUL terminated record, or `None` at the end of the object.
    pub fn record(&mut self) -> Result<Option<Line>, git_bucket::Error> {
        self.scan(Eol::ZERO)
    }

    fn scan(&mut self, eol: EnumSet<Eol>) -> Result<Option<Line>, git_bucket::Error> {
        let result = scan::scan_exact(&mut self.inner, eol, self.max_line, &mut self.state);
        self.inner.unread(self.state.take_unconsumed());
        match result? {
            (ByteView::Eof, _) => Ok(None),
            (ByteView::Empty, Terminator::None) => {
                Err(git_bucket::Error::would_block(self.inner.name()))
            },
            (raw, terminator) => Ok(Some(Line { raw, terminator })),
        }
    }

    /// A header line that must be present and terminated.
    pub fn expect_line(&mut self, object: ObjectKind, expected: &'static str) -> Result<Line, Error> {
        match self.line()? {
            None => Err(Error::malformed(self.name(), object, expected)),
            Some(line) if line.terminator.is_none() => {
                Err(git_bucket::Error::unexpected_eof(self.name()).into())
            },
            Some(line) => Ok(line),
        }
    }

    pub fn unread(&mut self, view: ByteView) {
        self.inner.unread(view)
    }

    /// Read exactly `n` bytes. On error, whatever was read is put back.
    pub fn read_exact(&mut self, n: usize) -> Result<ByteView, git_bucket::Error> {
        let mut view = ByteView::Empty;
        while view.len() < n {
            let err = match self.inner.read(n - view.len()) {
                Ok(ByteView::Data(bytes)) => {
                    view = view.concat(ByteView::Data(bytes));
                    continue;
                },
                Ok(ByteView::Eof) => git_bucket::Error::unexpected_eof(self.name()),
                Ok(ByteView::Empty) => git_bucket::Error::would_block(self.name()),
                Err(e) => e,
            };
            self.inner.unread(view);
            return Err(err);
        }
        Ok(view)
    }
}

impl<B: Bucket> Bucket for Source<B> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn read(&mut self, max: usize) -> Result<ByteView, git_bucket::Error> {
        if self.disposed {
            return Ok(ByteView::Eof);
        }
        self.inner.read(max)
    }

    fn peek(&self) -> ByteView {
        if self.disposed {
            return ByteView::Eof;
        }
        self.inner.peek()
    }

    fn poll(&mut self, min: usize) -> Result<ByteView, git_bucket::Error> {
        if self.disposed {
            return Ok(ByteView::Eof);
        }
        self.inner.poll(min)
    }

    fn position(&self) -> Option<u64> {
        self.inner.position()
    }

    fn remaining_len(&self) -> Option<u64> {
        self.inner.remaining_len()
    }

    fn duplicate(&mut self, reset: bool) -> Result<Box<dyn Bucket>, git_bucket::Error> {
        self.inner.duplicate(reset)
    }

    fn dispose(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.inner.rest_mut().dispose();
            self.inner.dispose();
        }
    }
}

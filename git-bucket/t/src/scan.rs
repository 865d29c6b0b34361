use git_bucket::{
    scan::{scan, scan_exact},
    Bucket,
    ByteView,
    Bytes,
    ChunkedBucket,
    Eol,
    Error,
    MemoryBucket,
    ScanState,
    Terminator,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::{
    buckets::{Stalling, Unbuffered},
    gen,
};

const MAX: usize = 1024;

fn lines<B: Bucket>(mut bucket: B, accepted: git_bucket::EnumSet<Eol>) -> Vec<(ByteView, Terminator)> {
    let mut state = ScanState::new();
    let mut lines = Vec::new();
    loop {
        match scan_exact(&mut bucket, accepted, MAX, &mut state).unwrap() {
            (ByteView::Eof, _) => return lines,
            line => lines.push(line),
        }
    }
}

#[test]
fn lf_lines() {
    assert_eq!(
        lines(MemoryBucket::new("one\ntwo\n\nthree"), Eol::LF),
        vec![
            (ByteView::from("one\n"), Terminator::Lf),
            (ByteView::from("two\n"), Terminator::Lf),
            (ByteView::from("\n"), Terminator::Lf),
            (ByteView::from("three"), Terminator::None),
        ]
    );
}

#[test]
fn only_accepted_terminators() {
    assert_eq!(
        lines(MemoryBucket::new("a\r\nb"), Eol::LF),
        vec![
            (ByteView::from("a\r\n"), Terminator::Lf),
            (ByteView::from("b"), Terminator::None),
        ]
    );
}

#[test]
fn crlf_split_between_fragments() {
    assert_eq!(
        lines(ChunkedBucket::new(["line\r", "\nnext\n"]), Eol::ANY_LINE),
        vec![
            (ByteView::from("line\r\n"), Terminator::CrLf),
            (ByteView::from("next\n"), Terminator::Lf),
        ]
    );
}

#[test]
fn loose_scan_reports_the_split() {
    let mut bucket = ChunkedBucket::new(["line\r", "\nnext\n"]);
    let mut state = ScanState::new();

    let (view, terminator) = scan(&mut bucket, Eol::ANY_LINE, MAX, &mut state).unwrap();
    assert_eq!(view, "line\r");
    assert_eq!(terminator, Terminator::CrSplit);
    assert!(state.is_pending_cr());

    let (view, terminator) = scan(&mut bucket, Eol::ANY_LINE, MAX, &mut state).unwrap();
    assert_eq!(view, "\n");
    assert_eq!(terminator, Terminator::CrLf);
    assert!(!state.is_pending_cr());
}

#[test]
fn lone_cr_at_fragment_end() {
    assert_eq!(
        lines(ChunkedBucket::new(["a\r", "b\n"]), Eol::ANY_LINE),
        vec![
            (ByteView::from("a\r"), Terminator::Cr),
            (ByteView::from("b\n"), Terminator::Lf),
        ]
    );
}

#[test]
fn cr_at_eof() {
    assert_eq!(
        lines(ChunkedBucket::new(["a\r"]), Eol::ANY_LINE),
        vec![(ByteView::from("a\r"), Terminator::Cr)]
    );
}

#[test]
fn cr_split_without_a_buffer() {
    assert_eq!(
        lines(Unbuffered(MemoryBucket::new("a\rb\r\nc")), Eol::ANY_LINE),
        vec![
            (ByteView::from("a\r"), Terminator::Cr),
            (ByteView::from("b\r\n"), Terminator::CrLf),
            (ByteView::from("c"), Terminator::None),
        ]
    );
}

#[test]
fn nul_records() {
    let mut bucket = MemoryBucket::new(&b"100644 a\0\x01\x02"[..]);
    let mut state = ScanState::new();
    let (record, terminator) = scan_exact(&mut bucket, Eol::ZERO, MAX, &mut state).unwrap();
    assert_eq!(record, b"100644 a\0");
    assert_eq!(terminator, Terminator::Zero);
    assert_eq!(Terminator::Zero.strip(&record), "100644 a");
    assert_eq!(bucket.read(MAX).unwrap(), b"\x01\x02");
}

#[test]
fn line_too_long() {
    let long = "x".repeat(100);
    let mut state = ScanState::new();
    assert_matches!(
        scan_exact(&mut MemoryBucket::new(long.clone()), Eol::LF, 10, &mut state),
        Err(Error::LineTooLong { max: 10, .. })
    );
    let mut state = ScanState::new();
    assert_matches!(
        scan_exact(&mut Unbuffered(MemoryBucket::new(long)), Eol::LF, 10, &mut state),
        Err(Error::LineTooLong { max: 10, .. })
    );
}

#[test]
fn limit_includes_the_terminator() {
    let mut state = ScanState::new();
    assert_matches!(
        scan_exact(&mut MemoryBucket::new("abc\n"), Eol::LF, 4, &mut state),
        Ok((_, Terminator::Lf))
    );
    let mut state = ScanState::new();
    assert_matches!(
        scan_exact(&mut MemoryBucket::new("abcd\n"), Eol::LF, 4, &mut state),
        Err(Error::LineTooLong { .. })
    );
}

#[test]
fn resumes_after_would_block() {
    let mut bucket = Stalling::new(MemoryBucket::new("ab\ncd"));
    let mut state = ScanState::new();
    let mut attempts = 0;
    let line = loop {
        attempts += 1;
        match scan_exact(&mut bucket, Eol::LF, MAX, &mut state).unwrap() {
            (ByteView::Empty, Terminator::None) => continue,
            line => break line,
        }
    };
    assert_eq!(line, (ByteView::from("ab\n"), Terminator::Lf));
    assert!(attempts > 1);
    assert!(state.partial().is_empty());
}

fn joined(lines: &[String]) -> Bytes {
    Bytes::from(lines.iter().map(|l| format!("{l}\n")).collect::<String>())
}

proptest! {
    #[test]
    fn fragment_independence((input, bucket) in gen::lines().prop_flat_map(|lines| {
        let input = joined(&lines);
        (Just(input.clone()), gen::chunked(input))
    })) {
        prop_assert_eq!(
            lines(bucket, Eol::LF),
            lines(MemoryBucket::new(input), Eol::LF)
        );
    }

    #[test]
    fn unbuffered_independence(input in gen::lines()) {
        let input = joined(&input);
        prop_assert_eq!(
            lines(Unbuffered(MemoryBucket::new(input.clone())), Eol::ANY_LINE),
            lines(MemoryBucket::new(input), Eol::ANY_LINE)
        );
    }
}

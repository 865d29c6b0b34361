use git_bucket::{spliced, Bucket, BucketExt as _, ByteView, MemoryBucket};
use pretty_assertions::assert_eq;

use crate::buckets::{Disposals, Unbuffered};

#[test]
fn redelivers_the_over_read() {
    let mut rest = MemoryBucket::new("author x\ncommitter y\n");
    let over_read = rest.read(9).unwrap();
    assert_eq!(over_read, "author x\n");

    let mut bucket = spliced(over_read, &mut rest);
    assert_eq!(bucket.position(), Some(0));
    assert_eq!(bucket.read_to_end().unwrap(), "author x\ncommitter y\n");
    assert_eq!(bucket.position(), Some(21));
}

#[test]
fn does_not_dispose_the_rest() {
    let (rest, disposals) = Disposals::new(MemoryBucket::new("rest"));
    let mut bucket = spliced(ByteView::from("prefix "), rest);
    bucket.dispose();
    assert_eq!(disposals.get(), 0);

    let (prefix, mut rest) = bucket.into_parts();
    assert_eq!(prefix, ByteView::Empty);
    rest.dispose();
    assert_eq!(disposals.get(), 1);
}

#[test]
fn unread() {
    let mut bucket = spliced(ByteView::Empty, Unbuffered(MemoryBucket::new("c")));
    bucket.unread(ByteView::from("b"));
    bucket.unread(ByteView::from("a"));
    assert_eq!(bucket.read_to_end().unwrap(), "abc");

    bucket.unread(ByteView::from("again"));
    assert_eq!(bucket.read_to_end().unwrap(), "again");
}

#[test]
fn duplicate() {
    let mut rest = MemoryBucket::new("one two");
    let over_read = rest.read(4).unwrap();
    let mut bucket = spliced(over_read, rest);
    assert_eq!(bucket.read(2).unwrap(), "on");

    let mut here = bucket.duplicate(false).unwrap();
    let mut start = bucket.duplicate(true).unwrap();
    assert_eq!(here.read_to_end().unwrap(), "e two");
    assert_eq!(start.read_to_end().unwrap(), "one two");
    assert_eq!(bucket.read_to_end().unwrap(), "e two");
}

use bytes::{BufMut as _, Bytes, BytesMut};
use git_bucket::{BucketExt as _, ChunkedBucket, MemoryBucket};
use git_bucket_test::{
    buckets::{Disposals, Stalling, Unbuffered},
    gen::{fragment_sizes, offsets},
};
use git_object_header::{
    Error,
    FileMode,
    HashKind,
    ObjectId,
    ObjectKind,
    ParseConfig,
    TreeEntry,
    TreeReader,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::gen::tree::{entries, to_bytes};

const FILE_ID: [u8; 20] = [0xab; 20];
const DIR_ID: [u8; 20] = [0x01; 20];

fn raw<const N: usize>(entries: &[(&str, &str, [u8; N])]) -> Bytes {
    let mut buf = BytesMut::new();
    for (mode, name, id) in entries {
        buf.put_slice(mode.as_bytes());
        buf.put_u8(b' ');
        buf.put_slice(name.as_bytes());
        buf.put_u8(0);
        buf.put_slice(id);
    }
    buf.freeze()
}

fn sha1(raw: &[u8]) -> ObjectId {
    ObjectId::from_bytes(raw, HashKind::Sha1).unwrap()
}

#[test]
fn entries_in_order() {
    let tree = TreeReader::new(MemoryBucket::new(raw(&[
        ("100644", "file.txt", FILE_ID),
        ("40000", "src", DIR_ID),
        ("100755", "run.sh", FILE_ID),
        ("120000", "link", FILE_ID),
        ("160000", "vendor", DIR_ID),
    ])));
    let entries = tree.collect::<Result<Vec<_>, _>>().unwrap();

    assert_eq!(
        entries[0],
        TreeEntry {
            mode: FileMode::File,
            name: "file.txt".into(),
            id: sha1(&FILE_ID),
        }
    );
    assert_eq!(
        entries
            .iter()
            .map(|entry| (entry.mode, entry.name().to_string()))
            .collect::<Vec<_>>(),
        vec![
            (FileMode::File, "file.txt".to_owned()),
            (FileMode::Directory, "src".to_owned()),
            (FileMode::FileExecutable, "run.sh".to_owned()),
            (FileMode::SymbolicLink, "link".to_owned()),
            (FileMode::GitLink, "vendor".to_owned()),
        ]
    );
    assert_eq!(entries[1].mode.object_kind(), ObjectKind::Tree);
    assert_eq!(entries[4].mode.object_kind(), ObjectKind::Commit);
    assert_eq!(entries[1].id, sha1(&DIR_ID));
}

#[test]
fn non_canonical_modes() {
    assert_eq!(FileMode::from_octal(b"100664"), Some(FileMode::File));
    assert_eq!(FileMode::from_octal(b"100775"), Some(FileMode::FileExecutable));
    assert_eq!(FileMode::from_octal(b"040000"), Some(FileMode::Directory));
    assert_eq!(FileMode::from_octal(b"100648"), None);
    assert_eq!(FileMode::from_octal(b"10000000644"), None);
    assert_eq!(FileMode::from_octal(b""), None);

    let mut tree = TreeReader::new(MemoryBucket::new(raw(&[("100664", "old", FILE_ID)])));
    let entry = tree.next().unwrap().unwrap();
    assert_eq!(entry.mode, FileMode::File);
    assert!(entry.to_bytes().starts_with(b"100644 "));
}

#[test]
fn names_are_bytes() {
    let mut raw = BytesMut::from(&b"100644 caf\xe9 menu\0"[..]);
    raw.put_slice(&FILE_ID);
    let entry = TreeReader::new(MemoryBucket::new(raw.freeze()))
        .next()
        .unwrap()
        .unwrap();
    assert_eq!(entry.name, &b"caf\xe9 menu"[..]);
}

#[test]
fn empty_tree() {
    assert_eq!(TreeReader::new(MemoryBucket::new("")).count(), 0);
}

#[test]
fn truncated() {
    let mut full = raw(&[("100644", "a", FILE_ID)]);
    let cut = full.split_to(full.len() - 5);
    let mut tree = TreeReader::new(MemoryBucket::new(cut));
    assert_matches!(
        tree.next(),
        Some(Err(Error::TruncatedTree {
            reason: "object id is cut short",
            ..
        }))
    );
    assert_matches!(tree.next(), None);

    let mut tree = TreeReader::new(MemoryBucket::new("100644 a"));
    assert_matches!(
        tree.next(),
        Some(Err(Error::TruncatedTree {
            reason: "entry ends before the end of its name",
            ..
        }))
    );

    let mut tree = TreeReader::new(MemoryBucket::new(raw(&[("100644a", "", FILE_ID)])));
    assert_matches!(
        tree.next(),
        Some(Err(Error::Malformed {
            expected: "file mode",
            ..
        }))
    );

    let mut bad = BytesMut::from(&b"100644\0"[..]);
    bad.put_slice(&FILE_ID);
    let mut tree = TreeReader::new(MemoryBucket::new(bad.freeze()));
    assert_matches!(
        tree.next(),
        Some(Err(Error::TruncatedTree {
            reason: "no space between mode and name",
            ..
        }))
    );
}

#[test]
fn unexpected_kind() {
    let (bucket, disposals) = Disposals::new(MemoryBucket::new(raw(&[("100644", "a", FILE_ID)])));
    let mut tree = TreeReader::new(bucket).with_kind(ObjectKind::Blob);
    assert_matches!(
        tree.next(),
        Some(Err(Error::UnexpectedKind {
            expected: ObjectKind::Tree,
            found: ObjectKind::Blob,
            ..
        }))
    );
    assert_matches!(tree.next(), None);
    assert_eq!(disposals.get(), 1);

    let mut tree = TreeReader::new(MemoryBucket::new(raw(&[("100644", "a", FILE_ID)])))
        .with_kind(ObjectKind::Tree);
    assert!(tree.next().unwrap().is_ok());
}

#[test]
fn sha256() {
    let id = [0x5a; 32];
    let config = ParseConfig::default().with_hash(HashKind::Sha256);
    let mut tree = TreeReader::with_config(
        MemoryBucket::new(raw(&[("100644", "a", id), ("40000", "b", id)])),
        config,
    );
    let entry = tree.next().unwrap().unwrap();
    assert_eq!(entry.id.kind(), HashKind::Sha256);
    assert_eq!(entry.id.as_bytes(), &id[..]);
    assert_eq!(tree.next().unwrap().unwrap().name, "b");
    assert!(tree.next().is_none());
}

#[test]
fn remaining_entries_as_bytes() {
    let mut tree = TreeReader::new(MemoryBucket::new(raw(&[
        ("100644", "a", FILE_ID),
        ("100644", "b", FILE_ID),
    ])));
    tree.next().unwrap().unwrap();
    assert_eq!(
        tree.read_to_end().unwrap(),
        raw(&[("100644", "b", FILE_ID)])
    );
}

#[test]
fn resumes_after_would_block() {
    let raw = raw(&[("100644", "a", FILE_ID), ("40000", "dir", DIR_ID)]);
    let mut tree = TreeReader::new(Stalling::new(MemoryBucket::new(raw)));
    let mut entries = Vec::new();
    let mut stalls = 0;
    while let Some(entry) = tree.next() {
        match entry {
            Err(e) if e.is_would_block() => stalls += 1,
            entry => entries.push(entry.unwrap()),
        }
    }
    assert!(stalls > 0);
    assert_eq!(
        entries.iter().map(|e| e.name.to_string()).collect::<Vec<_>>(),
        vec!["a", "dir"]
    );
    assert_eq!(entries[1].id, sha1(&DIR_ID));
}

proptest! {
    #[test]
    fn prop_entries(expected in entries(), sizes in fragment_sizes()) {
        let raw = to_bytes(&expected);
        let whole = TreeReader::new(MemoryBucket::new(raw.clone()))
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        prop_assert_eq!(&whole, &expected);

        let fragmented = TreeReader::new(Unbuffered(ChunkedBucket::split_at(raw, &offsets(&sizes))))
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        prop_assert_eq!(&fragmented, &expected);
    }
}

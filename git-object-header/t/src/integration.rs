use std::io::Cursor;

use git_bucket::{BucketExt as _, MemoryBucket, ReaderBucket};
use git_object_header::{
    CommitReader,
    Error,
    FileMode,
    ObjectId,
    ObjectKind,
    Person,
    TagReader,
    TreeReader,
};
use pretty_assertions::assert_eq;

use crate::repository::{self, fixture, PGP_SIGNATURE, SSH_SIGNATURE};

#[test]
fn commits_written_by_git() {
    test_helpers::logging::init();

    let fixture = fixture().unwrap();
    let repo = &fixture.inner;
    for oid in [fixture.root, fixture.signed] {
        let expected = repo.find_commit(oid).unwrap();
        let (kind, raw) = repository::raw(repo, oid).unwrap();
        assert_eq!(kind, ObjectKind::Commit);

        let mut commit = CommitReader::new(MemoryBucket::new(raw).with_name(oid.to_string()));
        assert_eq!(commit.tree_id().unwrap(), ObjectId::from(expected.tree_id()));
        assert_eq!(
            commit.parent_ids().unwrap(),
            expected
                .parent_ids()
                .map(ObjectId::from)
                .collect::<Vec<_>>()
        );
        assert_eq!(
            commit.author().unwrap(),
            &Person::try_from(&expected.author()).unwrap()
        );
        assert_eq!(
            commit.committer().unwrap(),
            &Person::try_from(&expected.committer()).unwrap()
        );
        assert_eq!(
            commit.read_to_end().unwrap(),
            expected.message_raw_bytes()
        );
    }
}

#[test]
fn signed_commit() {
    let fixture = fixture().unwrap();
    let repo = &fixture.inner;
    let (_, raw) = repository::raw(repo, fixture.signed).unwrap();
    let (_, signed_data) = repo.extract_signature(&fixture.signed, None).unwrap();

    let bucket = ReaderBucket::new(Cursor::new(raw.to_vec()))
        .with_chunk_size(7)
        .replay();
    let mut commit = CommitReader::new(bucket).with_handler(|header, value| {
        assert!(header.is_signature());
        assert_eq!(value.read_to_end()?, SSH_SIGNATURE);
        Ok(())
    });
    assert_eq!(commit.extension_headers().unwrap().len(), 1);
    assert_eq!(
        commit.signed_payload().unwrap().into_bytes().unwrap(),
        &*signed_data
    );
}

#[test]
fn trees_written_by_git() {
    let fixture = fixture().unwrap();
    let repo = &fixture.inner;
    let expected = repo.find_tree(fixture.tree).unwrap();
    let (kind, raw) = repository::raw(repo, fixture.tree).unwrap();

    let entries = TreeReader::new(MemoryBucket::new(raw))
        .with_kind(kind)
        .collect::<Result<Vec<_>, Error>>()
        .unwrap();
    assert_eq!(entries.len(), expected.len());
    for (entry, expected) in entries.iter().zip(expected.iter()) {
        assert_eq!(entry.name.as_slice(), expected.name_bytes());
        assert_eq!(entry.id, ObjectId::from(expected.id()));
        assert_eq!(
            Some(entry.mode),
            FileMode::from_bits(expected.filemode() as u32)
        );
        assert_eq!(
            git2::ObjectType::from(entry.mode.object_kind()),
            expected.kind().unwrap()
        );
    }
    assert_eq!(
        entries.iter().map(|e| e.mode).collect::<Vec<_>>(),
        vec![
            FileMode::File,
            FileMode::SymbolicLink,
            FileMode::FileExecutable,
            FileMode::Directory
        ]
    );

    let (kind, raw) = repository::raw(repo, fixture.root).unwrap();
    let mut not_a_tree = TreeReader::new(MemoryBucket::new(raw)).with_kind(kind);
    assert_matches!(not_a_tree.next(), Some(Err(Error::UnexpectedKind { .. })));
}

#[test]
fn tags_written_by_git() {
    let fixture = fixture().unwrap();
    let repo = &fixture.inner;

    for oid in [fixture.tag, fixture.signed_tag] {
        let expected = repo.find_tag(oid).unwrap();
        let (kind, raw) = repository::raw(repo, oid).unwrap();
        assert_eq!(kind, ObjectKind::Tag);

        let mut tag = TagReader::new(MemoryBucket::new(raw));
        assert_eq!(tag.object_id().unwrap(), ObjectId::from(expected.target_id()));
        assert_eq!(
            git2::ObjectType::from(tag.object_kind().unwrap()),
            expected.target_type().unwrap()
        );
        assert_eq!(tag.tag_name().unwrap(), expected.name().unwrap());
        assert_eq!(
            tag.tagger().unwrap(),
            &Person::try_from(&expected.tagger().unwrap()).unwrap()
        );

        let mut message = tag.read_to_end().unwrap().to_vec();
        assert_eq!(message, b"Release 1.0\n");
        if let Some(signature) = tag.signature().unwrap() {
            assert_eq!(signature, PGP_SIGNATURE);
            message.extend_from_slice(&signature);
        }
        assert_eq!(Some(message.as_slice()), expected.message_bytes());
    }
}

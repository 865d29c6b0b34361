use bytes::Bytes;
use git_object_header::{FileMode, TreeEntry};
use proptest::{collection, prop_oneof, strategy::Just, strategy::Strategy};

use crate::gen;

pub fn mode() -> impl Strategy<Value = FileMode> {
    prop_oneof![
        Just(FileMode::Directory),
        Just(FileMode::File),
        Just(FileMode::FileExecutable),
        Just(FileMode::SymbolicLink),
        Just(FileMode::GitLink),
    ]
}

pub fn entry() -> impl Strategy<Value = TreeEntry> {
    (mode(), "[a-zA-Z0-9_. -]{1,32}", gen::object_id()).prop_map(|(mode, name, id)| TreeEntry {
        mode,
        name: name.into(),
        id,
    })
}

pub fn entries() -> impl Strategy<Value = Vec<TreeEntry>> {
    collection::vec(entry(), 0..16)
}

/// The raw tree object holding `entries`.
pub fn to_bytes(entries: &[TreeEntry]) -> Bytes {
    entries
        .iter()
        .flat_map(TreeEntry::to_bytes)
        .collect::<Vec<_>>()
        .into()
}

use bytes::Bytes;
use git_object_header::{ObjectKind, TagHeader};
use proptest::{collection, option, prop_oneof, strategy::Just, strategy::Strategy};

use crate::gen::{self, commit};

/// A tag as written by git, split into its parts.
#[derive(Clone, Debug)]
pub struct TagData {
    pub header: TagHeader,
    pub message: String,
    pub signature: Option<String>,
}

impl TagData {
    /// The raw tag object.
    pub fn to_bytes(&self) -> Bytes {
        let mut raw = self.header.to_string();
        raw.push('\n');
        raw.push_str(&self.message);
        if let Some(signature) = &self.signature {
            raw.push_str(signature);
        }
        Bytes::from(raw)
    }
}

pub fn kind() -> impl Strategy<Value = ObjectKind> {
    prop_oneof![
        Just(ObjectKind::Commit),
        Just(ObjectKind::Tree),
        Just(ObjectKind::Blob),
        Just(ObjectKind::Tag),
    ]
}

pub fn header() -> impl Strategy<Value = TagHeader> {
    (gen::object_id(), kind(), "[a-zA-Z0-9_./-]{1,32}", gen::person()).prop_map(
        |(object, kind, name, tagger)| TagHeader {
            object,
            kind,
            name,
            tagger,
        },
    )
}

/// A message of complete lines, none of which looks like a signature.
pub fn message() -> impl Strategy<Value = String> {
    collection::vec("[a-zA-Z0-9 ]{0,48}\n", 0..8).prop_map(|lines| lines.concat())
}

pub fn tag() -> impl Strategy<Value = TagData> {
    (
        header(),
        message(),
        option::of(prop_oneof![commit::pgp(), commit::ssh()]),
    )
        .prop_map(|(header, message, signature)| TagData {
            header,
            message,
            signature: signature.map(|signature| signature + "\n"),
        })
}

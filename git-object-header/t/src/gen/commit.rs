use bytes::Bytes;
use git_object_header::CommitHeader;
use proptest::{collection, prop_oneof, strategy::Strategy};

use crate::gen;

/// A commit as written by git, split into its parts.
#[derive(Clone, Debug)]
pub struct CommitData {
    pub header: CommitHeader,
    pub headers: Vec<(String, String)>,
    pub message: String,
}

impl CommitData {
    /// The raw commit object.
    pub fn to_bytes(&self) -> Bytes {
        let mut raw = self.header.to_string();
        for (key, value) in &self.headers {
            raw.push_str(key);
            raw.push(' ');
            raw.push_str(&value.replace('\n', "\n "));
            raw.push('\n');
        }
        raw.push('\n');
        raw.push_str(&self.message);
        Bytes::from(raw)
    }
}

pub fn commit() -> impl Strategy<Value = CommitData> {
    (
        header(),
        collection::vec(prop_oneof![extension(), signature()], 0..5),
        message(),
    )
        .prop_map(|(header, headers, message)| CommitData {
            header,
            headers,
            message,
        })
}

pub fn header() -> impl Strategy<Value = CommitHeader> {
    (
        gen::object_id(),
        collection::vec(gen::object_id(), 0..4),
        gen::person(),
        gen::person(),
    )
        .prop_map(|(tree, parents, author, committer)| CommitHeader {
            tree,
            parents,
            author,
            committer,
        })
}

pub fn message() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 \n]{0,128}"
}

fn extension() -> impl Strategy<Value = (String, String)> {
    (prop_oneof!["encoding", "foo", "foobar"], gen::alphanumeric())
}

pub fn signature() -> impl Strategy<Value = (String, String)> {
    (prop_oneof!["gpgsig", "gpgsig-sha256"], prop_oneof![pgp(), ssh()])
}

pub fn pgp() -> impl Strategy<Value = String> {
    "-----BEGIN PGP SIGNATURE-----\n([A-Za-z0-9+/=]{1,64}\n){1,8}-----END PGP SIGNATURE-----"
}

pub fn ssh() -> impl Strategy<Value = String> {
    "-----BEGIN SSH SIGNATURE-----\n([A-Za-z0-9+/=]{1,64}\n){1,8}-----END SSH SIGNATURE-----"
}

use std::str::FromStr as _;

use git_object_header::{oid::ParseError, HashKind, ObjectId, ObjectKind};
use proptest::prelude::*;
use test_helpers::roundtrip;

use crate::gen;

#[test]
fn hex_in_either_case() {
    let lower = ObjectId::from_str("4b825dc642cb6eb9a060e54bf8d69288fbee4904").unwrap();
    let upper = ObjectId::from_str("4B825DC642CB6EB9A060E54BF8D69288FBEE4904").unwrap();
    assert_eq!(lower, upper);
    assert_eq!(upper.to_string(), "4b825dc642cb6eb9a060e54bf8d69288fbee4904");
    assert_eq!(lower.kind(), HashKind::Sha1);
}

#[test]
fn kind_from_length() {
    let sha256 = "a".repeat(64);
    assert_eq!(ObjectId::from_str(&sha256).unwrap().kind(), HashKind::Sha256);
    assert_matches!(
        ObjectId::from_str("4b825dc6"),
        Err(ParseError::InvalidLength { found: 8, .. })
    );
    assert_matches!(
        ObjectId::from_hex(b"4b825dc642cb6eb9a060e54bf8d69288fbee4904", HashKind::Sha256),
        Err(ParseError::InvalidLength {
            expected: 64,
            found: 40
        })
    );
    assert_matches!(
        ObjectId::from_str("zz825dc642cb6eb9a060e54bf8d69288fbee4904"),
        Err(ParseError::InvalidHex(_))
    );
}

#[test]
fn zero() {
    assert!(ObjectId::from_bytes(&[0; 20], HashKind::Sha1).unwrap().is_zero());
    assert!(!ObjectId::from_bytes(&[1; 32], HashKind::Sha256).unwrap().is_zero());
}

#[test]
fn git2_conversions() {
    let oid = git2::Oid::from_str("4b825dc642cb6eb9a060e54bf8d69288fbee4904").unwrap();
    let id = ObjectId::from(oid);
    assert_eq!(id.to_string(), oid.to_string());
    assert_eq!(git2::Oid::try_from(id).unwrap(), oid);

    assert_eq!(git2::ObjectType::from(ObjectKind::Tag), git2::ObjectType::Tag);
    assert!(ObjectKind::try_from(git2::ObjectType::Any).is_err());
}

#[test]
fn object_kind() {
    roundtrip::str(ObjectKind::Commit);
    roundtrip::str(ObjectKind::Tree);
    roundtrip::str(ObjectKind::Blob);
    roundtrip::str(ObjectKind::Tag);
    assert!("tags".parse::<ObjectKind>().is_err());
}

proptest! {
    #[test]
    fn prop_roundtrip_str(id in gen::object_id()) {
        roundtrip::str(id)
    }

    #[test]
    fn prop_roundtrip_json(id in prop_oneof![gen::object_id(), gen::sha256_id()]) {
        roundtrip::json(id)
    }
}

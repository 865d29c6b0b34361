use git_object_header::{person::ParseError, Person, Time};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use test_helpers::roundtrip;

use crate::gen;

#[test]
fn parse() {
    let person: Person = "Ada Lovelace <ada@example.com> 1664467633 -0130"
        .parse()
        .unwrap();
    assert_eq!(person.name, "Ada Lovelace");
    assert_eq!(person.email, "ada@example.com");
    assert_eq!(person.time.seconds(), 1664467633);
    assert_eq!(person.time.offset(), -90);
    assert_eq!(person.time.to_string(), "1664467633 -0130");
}

#[test]
fn empty_name_and_email() {
    let person: Person = "<> 0 +0000".parse().unwrap();
    assert_eq!(person, Person::epoch());
    assert_eq!(person.to_string(), " <> 0 +0000");
}

#[test]
fn invalid() {
    assert_matches!(
        "Ada ada@example.com 0 +0000".parse::<Person>(),
        Err(ParseError::Missing("email"))
    );
    assert_matches!(
        "Ada <ada@example.com>".parse::<Person>(),
        Err(ParseError::Missing("time"))
    );
    assert_matches!(
        "Ada <ada@example.com> 0".parse::<Person>(),
        Err(ParseError::Missing("offset"))
    );
    assert_matches!(
        "Ada <ada@example.com> 0 0100".parse::<Person>(),
        Err(ParseError::Offset(_))
    );
    assert_matches!(
        "Ada <ada@example.com> noon +0000".parse::<Person>(),
        Err(ParseError::Time(_))
    );
    assert_matches!(
        Person::from_bytes(b"Ada <ada@\xff> 0 +0000"),
        Err(ParseError::Utf8(_))
    );
}

#[test]
fn git2_conversions() {
    let time = Time::new(1664467633, 120);
    assert_eq!(Time::from(git2::Time::from(time)), time);

    let sig = git2::Signature::new("Ada", "ada@example.com", &time.into()).unwrap();
    let person = Person::try_from(&sig).unwrap();
    assert_eq!(person.to_string(), "Ada <ada@example.com> 1664467633 +0200");
}

proptest! {
    #[test]
    fn prop_roundtrip(person in gen::person()) {
        roundtrip::str(person)
    }
}

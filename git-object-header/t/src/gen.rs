//! Provides proptest generators

use git_object_header::{HashKind, ObjectId, Person, Time};
use proptest::{
    prelude::any,
    strategy::{Just, Strategy},
};

pub mod commit;
pub mod tag;
pub mod tree;

pub fn alphanumeric() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]+"
}

pub fn object_id() -> impl Strategy<Value = ObjectId> {
    any::<[u8; 20]>().prop_map(|raw| {
        ObjectId::from_bytes(&raw, HashKind::Sha1).expect("20 bytes make a SHA-1 id")
    })
}

pub fn sha256_id() -> impl Strategy<Value = ObjectId> {
    any::<[u8; 32]>().prop_map(|raw| {
        ObjectId::from_bytes(&raw, HashKind::Sha256).expect("32 bytes make a SHA-256 id")
    })
}

pub fn time() -> impl Strategy<Value = Time> {
    (0..2_000_000_000i64, -720..=840i32).prop_map(|(seconds, offset)| Time::new(seconds, offset))
}

pub fn person() -> impl Strategy<Value = Person> {
    alphanumeric().prop_flat_map(move |name| {
        (Just(name), alphanumeric(), time()).prop_map(|(name, domain, time)| {
            let email = format!("{name}@{domain}");
            Person { name, email, time }
        })
    })
}

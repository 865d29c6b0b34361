//! Provides proptest generators

use bytes::Bytes;
use git_bucket::ChunkedBucket;
use proptest::{collection, strategy::Strategy};

/// Sizes to cut a byte stream into, single bytes included.
pub fn fragment_sizes() -> impl Strategy<Value = Vec<usize>> {
    collection::vec(1..16usize, 1..64)
}

/// The offsets of the fragments of the given `sizes`.
pub fn offsets(sizes: &[usize]) -> Vec<usize> {
    sizes
        .iter()
        .scan(0, |offset, size| {
            *offset += size;
            Some(*offset)
        })
        .collect()
}

/// `data` cut into arbitrary fragments.
pub fn chunked(data: Bytes) -> impl Strategy<Value = ChunkedBucket> {
    fragment_sizes().prop_map(move |sizes| ChunkedBucket::split_at(data.clone(), &offsets(&sizes)))
}

pub fn lines() -> impl Strategy<Value = Vec<String>> {
    collection::vec("[a-zA-Z0-9 ]{0,24}", 0..16)
}

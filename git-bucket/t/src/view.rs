use git_bucket::{ByteView, Bytes};
use pretty_assertions::assert_eq;

#[test]
fn slices_share_storage() {
    let view = ByteView::from(Bytes::from_static(b"hello world"));
    let world = view.slice(6, 5);
    assert_eq!(world, b"world");
    assert_eq!(world.as_ptr(), view[6..].as_ptr());
}

#[test]
fn empty_data_is_empty() {
    assert_eq!(ByteView::from(Vec::new()), ByteView::Empty);
    assert_eq!(ByteView::from_static(b""), ByteView::Empty);
    assert_eq!(ByteView::from("a").slice(1, 0), ByteView::Empty);
    assert!(!ByteView::Empty.is_eof());
    assert!(ByteView::Eof.is_eof());
}

#[test]
fn split_to() {
    let mut view = ByteView::from("abc");
    assert_eq!(view.split_to(1), "a");
    assert_eq!(view, "bc");
    assert_eq!(view.split_to(2), "bc");
    assert_eq!(view, ByteView::Empty);
}

#[test]
fn prefixes() {
    let view = ByteView::from("tree 1234");
    assert_eq!(view.strip_prefix(b"tree "), Some(ByteView::from("1234")));
    assert_eq!(view.strip_prefix(b"parent "), None);
    assert!(ByteView::from("GpgSig").eq_ignore_ascii_case(b"gpgsig"));
    assert_eq!(view.to_str().unwrap(), "tree 1234");
}

#[test]
fn concat() {
    assert_eq!(ByteView::from("ab").concat(ByteView::from("cd")), "abcd");
    assert_eq!(ByteView::Empty.concat(ByteView::from("cd")), "cd");
    assert_eq!(ByteView::from("ab").concat(ByteView::Eof), "ab");
}

use std::io;

use bytes::Bytes;
use git2::Oid;
use git_object_header::ObjectKind;
use test_helpers::tempdir::InTmpDir;

pub const SSH_SIGNATURE: &str = "\
-----BEGIN SSH SIGNATURE-----
U1NIU0lHAAAAAQAAADMAAAALc3NoLWVkMjU1MTkAAAAgvjrQogRxxLjzzWns8+mKJAGzEX
4fm2ALoN7pyvD2ttQAAAADZ2l0AAAAAAAAAAZzaGE1MTIAAABTAAAAC3NzaC1lZDI1NTE5
-----END SSH SIGNATURE-----";

pub const PGP_SIGNATURE: &str = "\
-----BEGIN PGP SIGNATURE-----

iQIzBAABCAAdFiEEHe7BWIo9taTY6TIiJVL7b2QGbLcFAmNcDhsACgkQJVL7b2QG
=6dw2
-----END PGP SIGNATURE-----
";

pub struct Fixture {
    pub inner: InTmpDir<git2::Repository>,
    pub tree: Oid,
    pub root: Oid,
    pub signed: Oid,
    pub tag: Oid,
    pub signed_tag: Oid,
}

/// Initialise a bare [`git2::Repository`] in a temporary directory, holding
/// a small tree, an unsigned root commit, a signed child commit and two
/// annotated tags of the latter, one of them signed.
pub fn fixture() -> io::Result<Fixture> {
    let repo = InTmpDir::try_new("objects", |path| {
        git2::Repository::init_bare(path).map_err(io_other)
    })?;
    let sig = git2::Signature::new(
        "Ada Lovelace",
        "ada@example.com",
        &git2::Time::new(1664467633, 120),
    )
    .map_err(io_other)?;

    let tree = {
        let readme = repo.blob(b"hello\n").map_err(io_other)?;
        let script = repo.blob(b"#!/bin/sh\n").map_err(io_other)?;
        let mut src = repo.treebuilder(None).map_err(io_other)?;
        src.insert("lib.rs", readme, git2::FileMode::Blob.into())
            .map_err(io_other)?;
        let src = src.write().map_err(io_other)?;

        let mut root = repo.treebuilder(None).map_err(io_other)?;
        root.insert("README", readme, git2::FileMode::Blob.into())
            .map_err(io_other)?;
        root.insert("run.sh", script, git2::FileMode::BlobExecutable.into())
            .map_err(io_other)?;
        root.insert("latest", readme, git2::FileMode::Link.into())
            .map_err(io_other)?;
        root.insert("src", src, git2::FileMode::Tree.into())
            .map_err(io_other)?;
        root.write().map_err(io_other)?
    };

    let (root, signed) = {
        let tree = repo.find_tree(tree).map_err(io_other)?;
        let root = repo
            .commit(None, &sig, &sig, "Initial commit\n", &tree, &[])
            .map_err(io_other)?;
        let parent = repo.find_commit(root).map_err(io_other)?;
        let buf = repo
            .commit_create_buffer(&sig, &sig, "Second\n\nWith a body.\n", &tree, &[&parent])
            .map_err(io_other)?;
        let content = buf
            .as_str()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "commit is not UTF-8"))?;
        let signed = repo
            .commit_signed(content, SSH_SIGNATURE, None)
            .map_err(io_other)?;
        (root, signed)
    };

    let (tag, signed_tag) = {
        let target = repo.find_object(signed, None).map_err(io_other)?;
        let tag = repo
            .tag("v1.0", &target, &sig, "Release 1.0\n", false)
            .map_err(io_other)?;
        let signed_tag = repo
            .tag(
                "v1.0-signed",
                &target,
                &sig,
                &format!("Release 1.0\n{PGP_SIGNATURE}"),
                false,
            )
            .map_err(io_other)?;
        (tag, signed_tag)
    };

    Ok(Fixture {
        inner: repo,
        tree,
        root,
        signed,
        tag,
        signed_tag,
    })
}

/// The kind and the raw, inflated bytes of an object.
pub fn raw(repo: &git2::Repository, oid: Oid) -> io::Result<(ObjectKind, Bytes)> {
    let odb = repo.odb().map_err(io_other)?;
    let object = odb.read(oid).map_err(io_other)?;
    let kind = ObjectKind::try_from(object.kind()).map_err(io_other)?;
    Ok((kind, Bytes::copy_from_slice(object.data())))
}

fn io_other<E>(e: E) -> io::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    io::Error::new(io::ErrorKind::Other, e)
}

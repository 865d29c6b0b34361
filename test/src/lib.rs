//! Pulls in the test crates of the workspace members.

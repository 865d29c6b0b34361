#[cfg(test)]
#[macro_use]
extern crate assert_matches;

#[cfg(any(test, feature = "test"))]
pub mod gen;

#[cfg(test)]
mod repository;


#[cfg(test)]
mod integration;

#[cfg(test)]
mod oid;

#[cfg(test)]
mod person;


#[cfg(test)]
mod tree;

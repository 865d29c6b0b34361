#[cfg(test)]
#[macro_use]
extern crate assert_matches;

#[cfg(any(test, feature = "test"))]
pub mod buckets;

#[cfg(any(test, feature = "test"))]
pub mod gen;


#[cfg(test)]
mod scan;


#[cfg(test)]
mod splice;

#[cfg(test)]
mod view;

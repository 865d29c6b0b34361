// Copyright © 2022 The Radicle Link Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{
    fmt,
    num::ParseIntError,
    str::{self, FromStr},
};

use bstr::ByteSlice as _;
use thiserror::Error;

/// The identity and time recorded by an `author`, `committer` or `tagger`
/// header.
///
/// Neither `name` nor `email` may contain `<` or `>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Person {
    pub name: String,
    pub email: String,
    pub time: Time,
}

/// Seconds since the epoch, and the offset of the local timezone in minutes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Time {
    seconds: i64,
    offset: i32,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("missing {0}")]
    Missing(&'static str),
    #[error("timezone offset '{0}' is not of the form +HHMM or -HHMM")]
    Offset(String),
    #[error("invalid timestamp")]
    Time(#[source] ParseIntError),
    #[error(transparent)]
    Utf8(#[from] str::Utf8Error),
}

impl Time {
    /// `1970-01-01T00:00:00Z`
    pub const EPOCH: Time = Time::new(0, 0);

    pub const fn new(seconds: i64, offset: i32) -> Self {
        Self { seconds, offset }
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Minutes east of UTC.
    pub fn offset(&self) -> i32 {
        self.offset
    }

    fn parse_offset(tz: &[u8]) -> Result<i32, ParseError> {
        let invalid = || ParseError::Offset(String::from_utf8_lossy(tz).into_owned());
        let (sign, digits) = match tz.split_first() {
            Some((b'+', digits)) => (1, digits),
            Some((b'-', digits)) => (-1, digits),
            _ => return Err(invalid()),
        };
        if digits.len() != 4 || !digits.iter().all(u8::is_ascii_digit) {
            return Err(invalid());
        }
        let hhmm = digits
            .iter()
            .fold(0, |acc, digit| acc * 10 + i32::from(digit - b'0'));
        Ok(sign * (hhmm / 100 * 60 + hhmm % 100))
    }
}

impl FromStr for Time {
    type Err = ParseError;

    /// `<seconds> <+|-><HHMM>`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (seconds, tz) = s.split_once(' ').ok_or(ParseError::Missing("offset"))?;
        if seconds.is_empty() {
            return Err(ParseError::Missing("time"));
        }
        let seconds = seconds.parse().map_err(ParseError::Time)?;
        Ok(Self::new(seconds, Self::parse_offset(tz.as_bytes())?))
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.offset < 0 { '-' } else { '+' };
        let minutes = self.offset.unsigned_abs();
        write!(
            f,
            "{} {sign}{:02}{:02}",
            self.seconds,
            minutes / 60,
            minutes % 60
        )
    }
}

impl Person {
    /// The tagger substituted for tags that were written without one.
    pub fn epoch() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            time: Time::EPOCH,
        }
    }

    /// Parse the value of a person header, i.e. everything after
    /// `author `, `committer ` or `tagger `, without the line terminator.
    ///
    /// The email is delimited by the first `<` and the first `>` after it.
    /// Whatever follows is the time.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        let open = bytes.find_byte(b'<').ok_or(ParseError::Missing("email"))?;
        let close = bytes[open..]
            .find_byte(b'>')
            .map(|i| open + i)
            .ok_or(ParseError::Missing("email"))?;
        let name = &bytes[..open];
        let name = name.strip_suffix(b" ").unwrap_or(name);
        let time = bytes[close + 1..].trim_start();
        if time.is_empty() {
            return Err(ParseError::Missing("time"));
        }
        Ok(Self {
            name: str::from_utf8(name)?.to_owned(),
            email: str::from_utf8(&bytes[open + 1..close])?.to_owned(),
            time: str::from_utf8(time)?.parse()?,
        })
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> {}", self.name, self.email, self.time)
    }
}

impl FromStr for Person {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}

#[cfg(feature = "git2")]
mod git2_impls {
    use super::*;

    impl From<Time> for git2::Time {
        fn from(t: Time) -> Self {
            Self::new(t.seconds, t.offset)
        }
    }

    impl From<git2::Time> for Time {
        fn from(t: git2::Time) -> Self {
            Self::new(t.seconds(), t.offset_minutes())
        }
    }

    impl<'a> TryFrom<&git2::Signature<'a>> for Person {
        type Error = str::Utf8Error;

        fn try_from(value: &git2::Signature<'a>) -> Result<Self, Self::Error> {
            Ok(Self {
                name: str::from_utf8(value.name_bytes())?.to_owned(),
                email: str::from_utf8(value.email_bytes())?.to_owned(),
                time: value.when().into(),
            })
        }
    }
}

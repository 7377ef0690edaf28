//! Identifier types used throughout gridboard.
//!
//! Two families exist:
//! - Generated identifiers wrap a time-sortable `i64` produced from a seed
//!   (usually Unix time in nanoseconds). The integer is the storage key.
//! - Designated identifiers are opaque strings chosen by the caller.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Crockford base32 alphabet. Ascending byte order, so encoded ids sort like
/// the integers they encode.
const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Length of the text form: 4 bits in the leading digit plus 12 × 5 bits.
const ENCODED_LEN: usize = 13;

const SIGN_BIT: u64 = 1 << 63;

/// A system-assigned, time-sortable identifier.
///
/// Generation is a pure function of the seed; there is no central allocator
/// and no collision detection. Two creations that share a seed share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GeneratedId(i64);

impl GeneratedId {
    /// Creates the identifier for a seed.
    #[must_use]
    pub const fn generate(seed: i64) -> Self {
        Self(seed)
    }

    /// Rebuilds an identifier from its stored integer form.
    #[must_use]
    pub const fn from_i64(value: i64) -> Self {
        Self(value)
    }

    /// Returns the sortable integer form used as the primary key.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }

    /// Parses the 13-character text form.
    pub fn parse(s: &str) -> Result<Self, Error> {
        if s.len() != ENCODED_LEN {
            return Err(Error::InvalidId(format!(
                "expected {ENCODED_LEN} characters, got {}",
                s.len()
            )));
        }

        let mut bits: u64 = 0;
        for (i, c) in s.bytes().enumerate() {
            let digit = decode_digit(c)
                .ok_or_else(|| Error::InvalidId(format!("invalid character {:?}", c as char)))?;
            if i == 0 && digit >= 16 {
                return Err(Error::InvalidId(format!("{s} is out of range")));
            }
            bits = (bits << 5) | u64::from(digit);
        }

        // Undo the sign flip applied by `Display`.
        Ok(Self((bits ^ SIGN_BIT) as i64))
    }
}

fn decode_digit(c: u8) -> Option<u8> {
    let upper = c.to_ascii_uppercase();
    ALPHABET.iter().position(|&a| a == upper).map(|p| p as u8)
}

impl fmt::Display for GeneratedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Flipping the sign bit maps i64 order onto u64 order.
        let bits = (self.0 as u64) ^ SIGN_BIT;
        let mut out = [0u8; ENCODED_LEN];
        for (i, slot) in out.iter_mut().rev().enumerate() {
            *slot = ALPHABET[((bits >> (5 * i)) & 0x1f) as usize];
        }
        // The alphabet is ASCII, so every byte is a valid char.
        for b in out {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

impl FromStr for GeneratedId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for GeneratedId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GeneratedId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

macro_rules! generated_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(GeneratedId);

        impl $name {
            /// Creates the identifier for a seed.
            #[must_use]
            pub const fn generate(seed: i64) -> Self {
                Self(GeneratedId::generate(seed))
            }

            /// Rebuilds an identifier from its stored integer form.
            #[must_use]
            pub const fn from_i64(value: i64) -> Self {
                Self(GeneratedId::from_i64(value))
            }

            /// Returns the sortable integer form used as the primary key.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0.as_i64()
            }

            /// Parses the text form.
            pub fn parse(s: &str) -> Result<Self, Error> {
                GeneratedId::parse(s).map(Self)
            }
        }

        impl From<GeneratedId> for $name {
            fn from(id: GeneratedId) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

macro_rules! designated_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

generated_id!(
    /// Identifier of a dashboard component.
    ComponentId
);

generated_id!(
    /// Identifier of a configured data source.
    DataSourceId
);

designated_id!(
    /// Identifier of a visualisation kind (e.g. `"table"`, `"line-chart"`).
    VisualisationId
);

designated_id!(
    /// Identifier of a data source class (e.g. `"postgres"`).
    DataSourceClassId
);

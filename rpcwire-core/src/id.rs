//! JSON-RPC message identifiers
//!
//! An `id` member can be absent, an integer, a floating-point number or a
//! string. `RpcId` models exactly those four states as a sum type, so an
//! identifier can never carry a payload that disagrees with its tag.
//!
//! # Absent vs Null
//!
//! `RpcId::Absent` means different things depending on the message:
//!
//! - On a request it marks a notification; the `id` member is never emitted.
//! - On a response it means the originating request could not be
//!   correlated; the codec always emits `"id": null` for it.
//!
//! # Ordering
//!
//! Identifiers order by variant first (`Absent < Integer < Float < String`)
//! and then by payload. Strings compare by ordinal byte order. Floats follow
//! a total order in which `NaN` equals itself and sorts first, and `-0.0`
//! equals `0.0`. `Eq` and `Hash` agree with that order, so ids can be used
//! as `HashMap`/`BTreeMap` keys.
//!
//! # Examples
//!
//! ```rust
//! use rpcwire_core::RpcId;
//!
//! let id: RpcId = 42.into();
//! assert_eq!(id.to_string(), "42");
//! assert_eq!(id.as_integer().unwrap(), 42);
//! assert!(id.as_str().is_err());
//!
//! assert_eq!(RpcId::from(1.5).to_string(), "1.5");
//! assert_eq!(RpcId::from(2.0).to_string(), "2.0");
//! assert_eq!(RpcId::Absent.to_string(), "");
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Most fractional digits rendered for a float identifier
const MAX_FRACTION_DIGITS: usize = 16;

/// The variant tag of an `RpcId`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdKind {
    Absent,
    Integer,
    Float,
    String,
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IdKind::Absent => "absent",
            IdKind::Integer => "integer",
            IdKind::Float => "float",
            IdKind::String => "string",
        })
    }
}

/// JSON-RPC 2.0 message identifier
///
/// Serializes untagged: `Absent` is written as `null` and read back from
/// `null`. Note that the codec itself never writes `null` for a request id;
/// the serde impls exist for storing ids in caller-side structures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcId {
    /// No identifier
    #[default]
    Absent,
    /// Integer identifier
    Integer(i64),
    /// Floating-point identifier
    Float(f64),
    /// String identifier
    String(String),
}

impl RpcId {
    pub fn kind(&self) -> IdKind {
        match self {
            RpcId::Absent => IdKind::Absent,
            RpcId::Integer(_) => IdKind::Integer,
            RpcId::Float(_) => IdKind::Float,
            RpcId::String(_) => IdKind::String,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, RpcId::Absent)
    }

    /// Read the identifier as an integer
    ///
    /// # Errors
    ///
    /// Returns `Error::IdTypeMismatch` unless the identifier is `Integer`.
    pub fn as_integer(&self) -> Result<i64> {
        match self {
            RpcId::Integer(value) => Ok(*value),
            other => Err(other.mismatch(IdKind::Integer)),
        }
    }

    /// Read the identifier as a float
    ///
    /// # Errors
    ///
    /// Returns `Error::IdTypeMismatch` unless the identifier is `Float`.
    pub fn as_float(&self) -> Result<f64> {
        match self {
            RpcId::Float(value) => Ok(*value),
            other => Err(other.mismatch(IdKind::Float)),
        }
    }

    /// Read the identifier as a string
    ///
    /// # Errors
    ///
    /// Returns `Error::IdTypeMismatch` unless the identifier is `String`.
    pub fn as_str(&self) -> Result<&str> {
        match self {
            RpcId::String(value) => Ok(value),
            other => Err(other.mismatch(IdKind::String)),
        }
    }

    fn mismatch(&self, expected: IdKind) -> Error {
        Error::IdTypeMismatch {
            expected,
            found: self.kind(),
        }
    }
}

fn compare_floats(a: f64, b: f64) -> Ordering {
    match a.partial_cmp(&b) {
        Some(ordering) => ordering,
        None => match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            _ => Ordering::Greater,
        },
    }
}

fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    // Display for f64 is the shortest round-trip form and never uses an exponent
    let text = value.to_string();
    match text.split_once('.') {
        None => format!("{}.0", text),
        Some((_, fraction)) if fraction.len() <= MAX_FRACTION_DIGITS => text,
        Some(_) => {
            let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, value);
            let trimmed = fixed.trim_end_matches('0');
            if trimmed.ends_with('.') {
                format!("{}0", trimmed)
            } else {
                trimmed.to_string()
            }
        }
    }
}

impl Ord for RpcId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.kind()
            .cmp(&other.kind())
            .then_with(|| match (self, other) {
                (RpcId::Integer(a), RpcId::Integer(b)) => a.cmp(b),
                (RpcId::Float(a), RpcId::Float(b)) => compare_floats(*a, *b),
                (RpcId::String(a), RpcId::String(b)) => a.as_bytes().cmp(b.as_bytes()),
                _ => Ordering::Equal,
            })
    }
}

impl PartialOrd for RpcId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for RpcId {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RpcId {}

impl Hash for RpcId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            RpcId::Absent => {}
            RpcId::Integer(value) => value.hash(state),
            RpcId::Float(value) => {
                // Must agree with compare_floats: one NaN, one zero
                let bits = if value.is_nan() {
                    f64::NAN.to_bits()
                } else if *value == 0.0 {
                    0
                } else {
                    value.to_bits()
                };
                bits.hash(state);
            }
            RpcId::String(value) => value.hash(state),
        }
    }
}

impl fmt::Display for RpcId {
    /// Canonical text form, used in diagnostics and error messages
    ///
    /// Integers are decimal, floats carry at least one and at most sixteen
    /// fractional digits, strings are written verbatim and `Absent` is empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcId::Absent => Ok(()),
            RpcId::Integer(value) => write!(f, "{}", value),
            RpcId::Float(value) => f.write_str(&format_float(*value)),
            RpcId::String(value) => f.write_str(value),
        }
    }
}

impl From<i64> for RpcId {
    fn from(value: i64) -> Self {
        RpcId::Integer(value)
    }
}

impl From<i32> for RpcId {
    fn from(value: i32) -> Self {
        RpcId::Integer(i64::from(value))
    }
}

impl From<f64> for RpcId {
    fn from(value: f64) -> Self {
        RpcId::Float(value)
    }
}

impl From<String> for RpcId {
    fn from(value: String) -> Self {
        RpcId::String(value)
    }
}

impl From<&str> for RpcId {
    fn from(value: &str) -> Self {
        RpcId::String(value.to_string())
    }
}

impl TryFrom<&RpcId> for i64 {
    type Error = Error;

    fn try_from(id: &RpcId) -> Result<Self> {
        id.as_integer()
    }
}

impl TryFrom<&RpcId> for f64 {
    type Error = Error;

    fn try_from(id: &RpcId) -> Result<Self> {
        id.as_float()
    }
}

impl TryFrom<&RpcId> for String {
    type Error = Error;

    fn try_from(id: &RpcId) -> Result<Self> {
        id.as_str().map(str::to_string)
    }
}

//! Typed hardened derivation path.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marker appended to every hardened component in the text form.
const HARDENED_MARKER: char = '\'';

/// Bit set on every component in the BIP32 binary encoding.
const HARDENED_BIT: u32 = 0x8000_0000;

/// Errors raised while parsing or combining paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// Path text was empty.
    #[error("path is empty")]
    Empty,

    /// A component is missing the trailing hardened marker.
    #[error("component '{0}' is not hardened (expected trailing ')")]
    NotHardened(String),

    /// A component is not a decimal integer.
    #[error("component '{0}' is not a number")]
    InvalidComponent(String),

    /// A component does not fit the hardened index space.
    #[error("component {0} is out of range")]
    OutOfRange(u64),

    /// Range endpoints have different depths.
    #[error("range endpoints have different lengths: {start} vs {end}")]
    LengthMismatch { start: usize, end: usize },
}

/// Result type for path operations.
pub type PathResult<T> = Result<T, PathError>;

/// A derivation path whose components are all hardened.
///
/// Text form is `44'/397'/0'/0'/1'`: components joined by `'/` with a
/// trailing `'`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HdPath(Vec<u32>);

impl HdPath {
    /// Largest index representable as a hardened component.
    pub const MAX_COMPONENT: u32 = HARDENED_BIT - 1;

    /// Build a path from raw component values.
    pub fn new(components: Vec<u32>) -> PathResult<Self> {
        if components.is_empty() {
            return Err(PathError::Empty);
        }
        if let Some(&bad) = components.iter().find(|&&c| c > Self::MAX_COMPONENT) {
            return Err(PathError::OutOfRange(bad as u64));
        }
        Ok(Self(components))
    }

    /// Wrap components already known to be in range.
    pub(crate) fn from_validated(components: Vec<u32>) -> Self {
        debug_assert!(!components.is_empty());
        Self(components)
    }

    /// Component values without the hardened bit.
    pub fn components(&self) -> &[u32] {
        &self.0
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed path; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Binary form sent to the device: each component with the hardened bit
    /// set, as concatenated big-endian u32.
    pub fn to_bip32_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.0.len() * 4);
        for component in &self.0 {
            out.extend_from_slice(&(component | HARDENED_BIT).to_be_bytes());
        }
        out
    }
}

impl fmt::Display for HdPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, component) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}{}", component, HARDENED_MARKER)?;
        }
        Ok(())
    }
}

impl FromStr for HdPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PathError::Empty);
        }

        let mut components = Vec::new();
        for part in trimmed.split('/') {
            let digits = part
                .strip_suffix(HARDENED_MARKER)
                .ok_or_else(|| PathError::NotHardened(part.to_string()))?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(PathError::InvalidComponent(part.to_string()));
            }
            let value: u64 = digits
                .parse()
                .map_err(|_| PathError::InvalidComponent(part.to_string()))?;
            if value > Self::MAX_COMPONENT as u64 {
                return Err(PathError::OutOfRange(value));
            }
            components.push(value as u32);
        }

        Self::new(components)
    }
}

impl TryFrom<String> for HdPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HdPath> for String {
    fn from(path: HdPath) -> Self {
        path.to_string()
    }
}

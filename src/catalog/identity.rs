//! Tile identities and the reserved EMPTY/CURSOR sentinels
//!
//! Identities are case-folded once, when they are constructed, so that every
//! later comparison is plain string equality.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved identity for a cell with no tile placed
pub const EMPTY_IDENTITY: &str = "empty";

/// Reserved identity for the editor cursor marker
pub const CURSOR_IDENTITY: &str = "cursor";

/// Content hash naming a tile image
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TileIdentity(String);

impl TileIdentity {
    /// Fold a raw identity string into its canonical form
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_ascii_lowercase())
    }

    /// The EMPTY sentinel
    pub fn empty() -> Self {
        Self(EMPTY_IDENTITY.to_string())
    }

    /// The CURSOR sentinel
    pub fn cursor() -> Self {
        Self(CURSOR_IDENTITY.to_string())
    }

    /// Whether this is the EMPTY sentinel
    pub fn is_empty_marker(&self) -> bool {
        self.0 == EMPTY_IDENTITY
    }

    /// Whether this is the CURSOR sentinel
    pub fn is_cursor(&self) -> bool {
        self.0 == CURSOR_IDENTITY
    }

    /// Whether this identity is one of the reserved sentinels
    pub fn is_reserved(&self) -> bool {
        self.is_empty_marker() || self.is_cursor()
    }

    /// Canonical string form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TileIdentity {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for TileIdentity {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<TileIdentity> for String {
    fn from(identity: TileIdentity) -> Self {
        identity.0
    }
}

impl AsRef<str> for TileIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TileIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//! Newtype identifiers for annotation records.
//!
//! Label Studio links the facets of one logical issue (span, subcategory,
//! severity, comment) by giving every record the same short string id.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The shared identifier of a Label Studio result record.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultId(pub String);

impl ResultId {
    /// Creates a new ResultId.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string value.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ResultId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ResultId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Debug for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResultId({})", self.0)
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

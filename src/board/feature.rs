//! Feature tags: the typed kinds a tile edge can carry.
//!
//! Every edge of a placed tile belongs to exactly one feature kind, and
//! only edges of the same kind can be wired together or merged. The kind
//! also fixes the region's scoring rate.
//!
//! Parsing from a single-character code goes through [`FeatureKind::from_code`],
//! which rejects unknown codes explicitly instead of producing nothing.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The kind of board feature an edge belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    /// A road segment; roads score 1 point per member edge.
    Road,
    /// A city segment; cities score 2 points per member edge.
    City,
}

impl FeatureKind {
    /// Every feature kind, in code order.
    pub const ALL: [FeatureKind; 2] = [FeatureKind::Road, FeatureKind::City];

    /// Parse a single-character tag code.
    ///
    /// ```
    /// use tilegraph::FeatureKind;
    ///
    /// assert_eq!(FeatureKind::from_code('R').unwrap(), FeatureKind::Road);
    /// assert_eq!(FeatureKind::from_code('C').unwrap(), FeatureKind::City);
    /// assert!(FeatureKind::from_code('X').is_err());
    /// ```
    pub fn from_code(code: char) -> Result<Self> {
        match code {
            'R' => Ok(FeatureKind::Road),
            'C' => Ok(FeatureKind::City),
            other => Err(Error::UnknownFeatureTag(other)),
        }
    }

    /// The single-character tag code used in textual edge labels.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            FeatureKind::Road => 'R',
            FeatureKind::City => 'C',
        }
    }

    /// Points awarded per member edge when a region of this kind is scored.
    #[must_use]
    pub const fn points_per_edge(self) -> u32 {
        match self {
            FeatureKind::Road => 1,
            FeatureKind::City => 2,
        }
    }
}

impl std::fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

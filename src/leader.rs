//! MARC 21 Classification leader inspection.
//!
//! The leader is a fixed-length field at the start of every MARC record.
//! Only two positions matter for classification records:
//!
//! - Position 5: Record status (`d`, `s` and `x` mark deleted numbers)
//! - Position 6: Type of record (`w` = classification data)
//!
//! MARCXML exports are frequently sloppy about the rest of the leader
//! (wrong lengths, padding), so nothing past position 6 is required.

use crate::error::{Result, SkosError};

/// Type-of-record code for MARC 21 Classification data (leader/06).
pub const CLASSIFICATION_RECORD_TYPE: char = 'w';

/// Minimum leader length needed to read leader/06.
pub const MIN_LEADER_LENGTH: usize = 7;

/// The leader positions of a classification record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationLeader {
    /// Record status (1 char) - position 5
    pub record_status: char,
    /// Type of record (1 char) - position 6
    pub record_type: char,
}

impl ClassificationLeader {
    /// Read positions 5 and 6 from a leader string.
    ///
    /// # Errors
    ///
    /// Returns [`SkosError::InvalidLeader`] if the leader is shorter than
    /// [`MIN_LEADER_LENGTH`] characters.
    pub fn parse(leader: &str) -> Result<Self> {
        let chars: Vec<char> = leader.chars().take(MIN_LEADER_LENGTH).collect();
        if chars.len() < MIN_LEADER_LENGTH {
            return Err(SkosError::InvalidLeader(format!(
                "Leader too short ({} characters): {leader:?}",
                chars.len()
            )));
        }
        Ok(Self {
            record_status: chars[5],
            record_type: chars[6],
        })
    }

    /// Read and validate the leader of a classification record.
    ///
    /// # Errors
    ///
    /// Returns [`SkosError::InvalidLeader`] if the leader is missing or too
    /// short, and [`SkosError::InvalidRecord`] if leader/06 is not `w`.
    pub fn from_record_leader(leader: Option<&str>) -> Result<Self> {
        let leader = leader
            .ok_or_else(|| SkosError::InvalidLeader("Record does not have a leader".into()))?;
        let parsed = Self::parse(leader)?;
        parsed.validate_classification()?;
        Ok(parsed)
    }

    /// Check that leader/06 marks a classification record.
    ///
    /// # Errors
    ///
    /// Returns [`SkosError::InvalidRecord`] for any other record type, for
    /// example `z` (authority) or `a` (bibliographic).
    pub fn validate_classification(&self) -> Result<()> {
        if self.record_type == CLASSIFICATION_RECORD_TYPE {
            Ok(())
        } else {
            Err(SkosError::InvalidRecord(format!(
                "Record is not a MARC 21 Classification record (leader/06 = '{}')",
                self.record_type
            )))
        }
    }

    /// Returns true if the record status marks the number as deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        matches!(self.record_status, 'd' | 's' | 'x')
    }
}

//! SMS repertoire, policy and analysis models.

use std::fmt;

use crate::conf::{N_LEN_GSM7_CONCAT, N_LEN_GSM7_SINGLE, N_LEN_UCS2_CONCAT, N_LEN_UCS2_SINGLE};

////////////////////////////////////////////////////////////////////////////////
// #region Repertoire

/// Character repertoire a text value is carried in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumSmsRepertoire {
    /// Restricted 7-bit alphabet (basic + extension table).
    Gsm7,
    /// General repertoire; every character costs a 16-bit unit.
    Ucs2,
}

impl EnumSmsRepertoire {
    /// Characters carried by a single, non-concatenated segment.
    pub fn capacity_single(self) -> usize {
        match self {
            Self::Gsm7 => N_LEN_GSM7_SINGLE,
            Self::Ucs2 => N_LEN_UCS2_SINGLE,
        }
    }

    /// Characters carried by each segment of a concatenated message.
    pub fn capacity_concat(self) -> usize {
        match self {
            Self::Gsm7 => N_LEN_GSM7_CONCAT,
            Self::Ucs2 => N_LEN_UCS2_CONCAT,
        }
    }

    /// Lowercase label used in reports and CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gsm7 => "gsm7",
            Self::Ucs2 => "ucs2",
        }
    }
}

impl fmt::Display for EnumSmsRepertoire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Policy

/// Cost charged for a GSM-7 extension-table character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumExtendedCharCost {
    /// One unit per character (reference behavior).
    #[default]
    Single,
    /// Two units per character (escape + code, as on the wire).
    Double,
}

/// Segment counting policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpecSmsSegmentPolicy {
    /// Extension-table character cost.
    pub rule_extended_cost: EnumExtendedCharCost,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Analysis

/// Full breakdown of one segment-count computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecSmsAnalysis {
    /// Detected repertoire.
    pub repertoire: EnumSmsRepertoire,
    /// Unicode code point count.
    pub n_chars: usize,
    /// Charged length after extension-table cost.
    pub n_units: usize,
    /// Capacity the unit count was divided by (single or concatenated).
    pub n_capacity: usize,
    /// Number of segments, always >= 1.
    pub n_segments: usize,
}

impl fmt::Display for SpecSmsAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[SMS] repertoire={} chars={} units={} capacity={} segments={}",
            self.repertoire, self.n_chars, self.n_units, self.n_capacity, self.n_segments
        )
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

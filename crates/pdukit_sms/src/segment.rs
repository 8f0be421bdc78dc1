//! Repertoire classification and segment counting.
//!
//! Length is measured in Unicode code points. A value is GSM-7 only when
//! every code point is in [`GSM7_BASIC`] or [`GSM7_EXTENDED`]; the empty
//! string is GSM-7 and fits in one segment.

use crate::conf::{GSM7_BASIC, GSM7_EXTENDED};
use crate::spec::{EnumExtendedCharCost, EnumSmsRepertoire, SpecSmsAnalysis, SpecSmsSegmentPolicy};

/// Return `true` for characters of the GSM-7 basic or extension table.
pub fn is_gsm7_char(chr: char) -> bool {
    GSM7_BASIC.contains(&chr) || GSM7_EXTENDED.contains(&chr)
}

/// Return `true` for characters of the GSM-7 extension table only.
pub fn is_gsm7_extended_char(chr: char) -> bool {
    GSM7_EXTENDED.contains(&chr)
}

/// Classify `text` as GSM-7 or UCS-2.
pub fn classify_repertoire(text: &str) -> EnumSmsRepertoire {
    if text.chars().all(is_gsm7_char) {
        EnumSmsRepertoire::Gsm7
    } else {
        EnumSmsRepertoire::Ucs2
    }
}

/// Number of segments needed for `text` under the default policy.
pub fn calculate_sms_parts(text: &str) -> usize {
    analyze_sms_text(text, &SpecSmsSegmentPolicy::default()).n_segments
}

/// Number of segments needed for `text` under `policy`.
pub fn calculate_sms_parts_with_policy(text: &str, policy: &SpecSmsSegmentPolicy) -> usize {
    analyze_sms_text(text, policy).n_segments
}

/// Classify and measure `text` in a single pass.
pub fn analyze_sms_text(text: &str, policy: &SpecSmsSegmentPolicy) -> SpecSmsAnalysis {
    let mut n_chars = 0usize;
    let mut n_chars_extended = 0usize;
    let mut if_all_gsm7 = true;

    for chr in text.chars() {
        n_chars += 1;
        if !if_all_gsm7 {
            continue;
        }
        if GSM7_BASIC.contains(&chr) {
            continue;
        }
        if is_gsm7_extended_char(chr) {
            n_chars_extended += 1;
        } else {
            if_all_gsm7 = false;
        }
    }

    let repertoire = if if_all_gsm7 {
        EnumSmsRepertoire::Gsm7
    } else {
        EnumSmsRepertoire::Ucs2
    };

    let n_units = match (repertoire, policy.rule_extended_cost) {
        (EnumSmsRepertoire::Gsm7, EnumExtendedCharCost::Double) => n_chars + n_chars_extended,
        _ => n_chars,
    };

    let n_capacity_single = repertoire.capacity_single();
    if n_units <= n_capacity_single {
        return SpecSmsAnalysis {
            repertoire,
            n_chars,
            n_units,
            n_capacity: n_capacity_single,
            n_segments: 1,
        };
    }

    let n_capacity = repertoire.capacity_concat();
    SpecSmsAnalysis {
        repertoire,
        n_chars,
        n_units,
        n_capacity,
        n_segments: n_units.div_ceil(n_capacity),
    }
}

//! `pdukit_sms` v1:
//! Per-cell SMS primitives: repertoire classification, segment counting and
//! URL-safe cell encoding.
//!
//! Module layout:
//! - `conf`    : GSM-7 character sets and capacity constants
//! - `spec`    : repertoire/policy/analysis models
//! - `segment` : classifier and segment-count kernel
//! - `encode`  : percent-encoding of cell text
pub mod conf;
pub mod encode;
pub mod segment;
pub mod spec;

pub use conf::{
    GSM7_BASIC, GSM7_EXTENDED, N_LEN_GSM7_CONCAT, N_LEN_GSM7_SINGLE, N_LEN_UCS2_CONCAT,
    N_LEN_UCS2_SINGLE,
};
pub use encode::encode_uri_component;
pub use segment::{
    analyze_sms_text, calculate_sms_parts, calculate_sms_parts_with_policy, classify_repertoire,
    is_gsm7_char, is_gsm7_extended_char,
};
pub use spec::{EnumExtendedCharCost, EnumSmsRepertoire, SpecSmsAnalysis, SpecSmsSegmentPolicy};

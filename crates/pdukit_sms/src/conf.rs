//! GSM-7 character sets and per-repertoire segment capacities.

use phf::phf_set;

/// Single-segment capacity for GSM-7 text.
pub const N_LEN_GSM7_SINGLE: usize = 160;
/// Per-segment capacity for concatenated GSM-7 text.
pub const N_LEN_GSM7_CONCAT: usize = 153;
/// Single-segment capacity for UCS-2 text.
pub const N_LEN_UCS2_SINGLE: usize = 70;
/// Per-segment capacity for concatenated UCS-2 text.
pub const N_LEN_UCS2_CONCAT: usize = 67;

/// GSM-7 basic character set.
///
/// Mirrors the reference table, which omits a few characters of the 3GPP
/// alphabet (`É`, `Æ`, `æ`, `ß`, ...). Text using them is treated as UCS-2.
pub static GSM7_BASIC: phf::Set<char> = phf_set! {
    '@', '£', '$', '¥', 'è', 'é', 'ù', 'ì', 'ò', 'Ç', '\n', 'Ø', 'ø', '\r', 'Å', 'å',
    'Δ', '_', 'Φ', 'Γ', 'Λ', 'Ω', 'Π', 'Ψ', 'Σ', 'Θ', 'Ξ', '¡', '¿',
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M',
    'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
    'Ä', 'Ö', 'Ñ', 'Ü', '§',
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm',
    'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
    'ä', 'ö', 'ñ', 'ü', 'à',
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
    ' ', '!', '"', '#', '¤', '%', '&', '\'', '(', ')', '*', '+', ',', '-', '.', '/',
    ':', ';', '<', '=', '>', '?',
};

/// GSM-7 extension table characters (escape-prefixed on the wire).
pub static GSM7_EXTENDED: phf::Set<char> = phf_set! {
    '^', '{', '}', '\\', '[', '~', ']', '|', '€',
};

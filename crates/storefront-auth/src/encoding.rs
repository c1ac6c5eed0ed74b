//! Password string encoder
//!
//! The external auth service expects passwords in a positional numeral
//! system over a fixed alphabet: every character is folded into one integer
//! (`acc * 256 + code unit`, left to right) and the integer is written out
//! most-significant digit first.
//!
//! This is a reversible encoding, not a hash. It keeps raw passwords off the
//! wire as plain text and nothing more; it must not be mistaken for password
//! protection.

use num_bigint::BigUint;
use num_traits::Zero;
use thiserror::Error;

/// Digit alphabet, lowest value first
pub const ALPHABET: &[u8] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ!@#$%^&*()-_=+{}[]|:;<>,.?/~`";

/// Weight of each folded character
const CHAR_WEIGHT: u32 = 256;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Symbol {0:?} is not part of the encoding alphabet")]
    UnknownSymbol(char),

    #[error("Encoded value is empty")]
    Empty,
}

/// Value accepted by [`encode`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeInput {
    Text(String),
    Number(BigUint),
}

impl EncodeInput {
    /// Integer magnitude that gets written out in the target base
    pub fn magnitude(&self) -> BigUint {
        match self {
            EncodeInput::Text(text) => fold_text(text),
            EncodeInput::Number(n) => n.clone(),
        }
    }
}

impl From<&str> for EncodeInput {
    fn from(value: &str) -> Self {
        EncodeInput::Text(value.to_string())
    }
}

impl From<String> for EncodeInput {
    fn from(value: String) -> Self {
        EncodeInput::Text(value)
    }
}

impl From<u64> for EncodeInput {
    fn from(value: u64) -> Self {
        EncodeInput::Number(BigUint::from(value))
    }
}

impl From<i64> for EncodeInput {
    /// Negative numbers have no digits and encode like zero
    fn from(value: i64) -> Self {
        EncodeInput::Number(BigUint::from(u64::try_from(value).unwrap_or(0)))
    }
}

impl From<BigUint> for EncodeInput {
    fn from(value: BigUint) -> Self {
        EncodeInput::Number(value)
    }
}

fn base() -> u32 {
    ALPHABET.len() as u32
}

/// Fold a string into a single integer.
///
/// Each character contributes its leading UTF-16 code unit, which is what the
/// browser client used to read per character.
fn fold_text(text: &str) -> BigUint {
    let mut units = [0u16; 2];
    text.chars().fold(BigUint::zero(), |acc, c| {
        let unit = c.encode_utf16(&mut units)[0];
        acc * CHAR_WEIGHT + u32::from(unit)
    })
}

/// Encode a string or number. `None` stays `None`.
pub fn encode<I: Into<EncodeInput>>(input: Option<I>) -> Option<String> {
    let magnitude = input?.into().magnitude();

    // to_radix_be yields a single zero digit for zero, i.e. the first symbol
    let encoded = magnitude
        .to_radix_be(base())
        .into_iter()
        .map(|digit| char::from(ALPHABET[usize::from(digit)]))
        .collect();

    Some(encoded)
}

/// Encode a password for submission to the auth service
pub fn encode_password(password: &str) -> String {
    encode(Some(password)).unwrap_or_else(|| char::from(ALPHABET[0]).to_string())
}

/// Recover the integer magnitude from an encoded string.
///
/// Only the numeral conversion is inverted; the original text is not
/// reconstructed.
pub fn decode_magnitude(encoded: &str) -> Result<BigUint, EncodingError> {
    if encoded.is_empty() {
        return Err(EncodingError::Empty);
    }

    let digits = encoded
        .chars()
        .map(|c| {
            u8::try_from(c)
                .ok()
                .and_then(|b| ALPHABET.iter().position(|&s| s == b))
                .map(|pos| pos as u8)
                .ok_or(EncodingError::UnknownSymbol(c))
        })
        .collect::<Result<Vec<u8>, _>>()?;

    BigUint::from_radix_be(&digits, base()).ok_or(EncodingError::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_alphabet_is_unique() {
        let mut seen = std::collections::HashSet::new();
        assert!(ALPHABET.iter().all(|b| seen.insert(*b)));
        assert_eq!(ALPHABET.len(), 91);
    }

    #[test]
    fn test_null_input() {
        assert_eq!(encode(None::<&str>), None);
        assert_eq!(encode(None::<u64>), None);
    }

    #[test]
    fn test_zero_is_first_symbol() {
        assert_eq!(encode(Some(0u64)).as_deref(), Some("0"));
        assert_eq!(encode(Some("")).as_deref(), Some("0"));
        assert_eq!(encode(Some(-5i64)).as_deref(), Some("0"));
    }

    #[test]
    fn test_known_numbers() {
        assert_eq!(encode(Some(9u64)).as_deref(), Some("9"));
        assert_eq!(encode(Some(90u64)).as_deref(), Some("`"));
        assert_eq!(encode(Some(91u64)).as_deref(), Some("10"));
    }

    #[test]
    fn test_known_strings() {
        // 'a' = 97 = 1 * 91 + 6
        assert_eq!(encode(Some("a")).as_deref(), Some("16"));
        // "ab" = 97 * 256 + 98 = 24930 = 3 * 91^2 + 0 * 91 + 87
        assert_eq!(encode(Some("ab")).as_deref(), Some("30?"));
        assert_eq!(encode_password("ab"), "30?");
    }

    #[test]
    fn test_deterministic() {
        let first = encode(Some("correct horse battery staple"));
        let second = encode(Some("correct horse battery staple"));
        assert_eq!(first, second);
        assert_ne!(first, encode(Some("correct horse battery stapler")));
    }

    #[test]
    fn test_long_input_exceeds_u64() {
        let password = "a much longer password than eight bytes";

        // A 64-bit accumulator overflows after eight characters
        let overflowed = password
            .chars()
            .try_fold(0u64, |acc, c| acc.checked_mul(256)?.checked_add(c as u64));
        assert!(overflowed.is_none());

        let encoded = encode(Some(password)).unwrap();
        let magnitude = decode_magnitude(&encoded).unwrap();
        assert!(magnitude > BigUint::from(u64::MAX));
        assert_eq!(magnitude, fold_text(password));
    }

    #[test]
    fn test_non_ascii_uses_leading_code_unit() {
        // U+1F600 encodes to the surrogate pair D83D DE00
        assert_eq!(fold_text("\u{1F600}"), BigUint::from(0xD83Du32));
        assert_eq!(fold_text("é"), BigUint::from(0xE9u32));
    }

    #[test]
    fn test_decode_rejects_unknown_symbols() {
        assert_eq!(decode_magnitude("ab c"), Err(EncodingError::UnknownSymbol(' ')));
        assert_eq!(decode_magnitude("\""), Err(EncodingError::UnknownSymbol('"')));
        assert_eq!(decode_magnitude(""), Err(EncodingError::Empty));
    }

    proptest! {
        #[test]
        fn test_numeral_round_trip_for_text(text in ".{0,64}") {
            let encoded = encode(Some(text.as_str())).unwrap();
            prop_assert_eq!(decode_magnitude(&encoded).unwrap(), fold_text(&text));
        }

        #[test]
        fn test_numeral_round_trip_for_numbers(n in any::<u64>()) {
            let encoded = encode(Some(n)).unwrap();
            prop_assert_eq!(decode_magnitude(&encoded).unwrap(), BigUint::from(n));
        }
    }
}

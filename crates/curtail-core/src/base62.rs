use crate::error::CodecError;
use smol_str::SmolStr;

/// The fixed code alphabet: digits, then lowercase, then uppercase.
///
/// The ordering is load-bearing: it defines the digit value of every symbol,
/// so it must never change once codes have been issued.
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const BASE: u64 = 62;

/// Encodes a non-negative integer as a base-62 string.
///
/// The output is the minimal-length representation; there is no zero-padding,
/// which keeps `decode(encode(n)) == n` unambiguous for every `n`.
pub fn encode(mut value: u64) -> SmolStr {
    if value == 0 {
        return SmolStr::new_static("0");
    }

    // u64::MAX needs 11 base-62 digits.
    let mut digits = Vec::with_capacity(11);
    while value > 0 {
        digits.push(ALPHABET[(value % BASE) as usize]);
        value /= BASE;
    }

    SmolStr::new(digits.iter().rev().map(|&b| b as char).collect::<String>())
}

/// Decodes a base-62 string back into the integer it encodes.
pub fn decode(code: &str) -> Result<u64, CodecError> {
    if code.is_empty() {
        return Err(CodecError::Empty);
    }

    let mut value: u64 = 0;
    for symbol in code.chars() {
        let digit = digit_value(symbol).ok_or(CodecError::InvalidSymbol { symbol })?;
        value = value
            .checked_mul(BASE)
            .and_then(|v| v.checked_add(digit))
            .ok_or(CodecError::Overflow)?;
    }

    Ok(value)
}

/// Returns whether a symbol belongs to the code alphabet.
pub fn contains(symbol: char) -> bool {
    digit_value(symbol).is_some()
}

fn digit_value(symbol: char) -> Option<u64> {
    match symbol {
        '0'..='9' => Some(symbol as u64 - '0' as u64),
        'a'..='z' => Some(symbol as u64 - 'a' as u64 + 10),
        'A'..='Z' => Some(symbol as u64 - 'A' as u64 + 36),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_zero_as_single_symbol() {
        assert_eq!(encode(0), "0");
    }

    #[test]
    fn encodes_alphabet_boundaries() {
        assert_eq!(encode(9), "9");
        assert_eq!(encode(10), "a");
        assert_eq!(encode(35), "z");
        assert_eq!(encode(36), "A");
        assert_eq!(encode(61), "Z");
        assert_eq!(encode(62), "10");
    }

    #[test]
    fn encodes_counter_seed() {
        assert_eq!(encode(100_000_000_000), "1L9zO9O");
    }

    #[test]
    fn decodes_counter_seed() {
        assert_eq!(decode("1L9zO9O").unwrap(), 100_000_000_000);
    }

    #[test]
    fn round_trips_small_values() {
        for n in 0..5_000 {
            assert_eq!(decode(&encode(n)).unwrap(), n);
        }
    }

    #[test]
    fn round_trips_large_values() {
        let values = [
            62_u64.pow(5),
            62_u64.pow(9),
            100_000_000_000,
            u64::MAX / 2,
            u64::MAX - 1,
            u64::MAX,
        ];
        for &n in &values {
            assert_eq!(decode(&encode(n)).unwrap(), n);
        }
    }

    #[test]
    fn decode_rejects_symbols_outside_alphabet() {
        let err = decode("abc-def").unwrap_err();
        assert_eq!(err, CodecError::InvalidSymbol { symbol: '-' });

        let err = decode("abc!").unwrap_err();
        assert_eq!(err, CodecError::InvalidSymbol { symbol: '!' });
    }

    #[test]
    fn decode_rejects_empty_input() {
        assert_eq!(decode("").unwrap_err(), CodecError::Empty);
    }

    #[test]
    fn decode_rejects_values_over_the_64_bit_ceiling() {
        // Eleven 'Z' symbols encode 62^11 - 1, which exceeds u64::MAX.
        assert_eq!(decode("ZZZZZZZZZZZ").unwrap_err(), CodecError::Overflow);
    }

    #[test]
    fn leading_zero_symbol_is_not_produced() {
        // decode accepts redundant leading zeros, but encode never emits them,
        // so the transform stays bijective over its own output.
        assert_eq!(decode("0001").unwrap(), 1);
        assert_eq!(encode(1), "1");
    }
}

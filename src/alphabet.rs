//! Repeat-count alphabet of the ASCII graphic field compression.
//!
//! `G`..`Y` weigh 1 to 19 and `g`..`z` weigh 20 to 400 in steps of 20. A run
//! of consecutive alphabet characters is read as a base-20 positional
//! numeral, most significant character first.

use crate::error::Error;

const BASE: u64 = 20;

/// Weight of a single alphabet character, `None` for anything else.
pub fn weight(c: u8) -> Option<u64> {
    match c {
        b'G'..=b'Y' => Some((c - b'G') as u64 + 1),
        b'g'..=b'z' => Some(((c - b'g') as u64 + 1) * 20),
        _ => None,
    }
}

pub fn is_code(c: u8) -> bool {
    weight(c).is_some()
}

/// Resolve a code string into its repeat count.
pub fn repeat_count(code: &[u8]) -> Result<u64, Error> {
    if code.is_empty() {
        return Err(Error::MalformedEncoding("empty repeat code".to_string()));
    }

    let mut count: u64 = 0;
    for &c in code {
        let w = weight(c).ok_or_else(|| {
            Error::MalformedEncoding(format!("{:?} is not a repeat code", c as char))
        })?;
        count = count
            .checked_mul(BASE)
            .and_then(|n| n.checked_add(w))
            .ok_or_else(|| {
                Error::MalformedEncoding(format!(
                    "repeat code {:?} overflows",
                    String::from_utf8_lossy(code)
                ))
            })?;
    }

    if count == 0 {
        return Err(Error::MalformedEncoding(format!(
            "repeat code {:?} resolves to zero",
            String::from_utf8_lossy(code)
        )));
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_character_weights() {
        assert_eq!(weight(b'G'), Some(1));
        assert_eq!(weight(b'Y'), Some(19));
        assert_eq!(weight(b'g'), Some(20));
        assert_eq!(weight(b'h'), Some(40));
        assert_eq!(weight(b'z'), Some(400));
    }

    #[test]
    fn hex_digits_and_shortcuts_are_not_codes() {
        for c in b"0123456789ABCDEFabcdef,!:Zf" {
            assert!(!is_code(*c), "{:?}", *c as char);
        }
    }

    #[test]
    fn codes_are_positional_base_20() {
        assert_eq!(repeat_count(b"G").unwrap(), 1);
        assert_eq!(repeat_count(b"H").unwrap(), 2);
        assert_eq!(repeat_count(b"g").unwrap(), 20);
        assert_eq!(repeat_count(b"gG").unwrap(), 20 * 20 + 1);
        assert_eq!(repeat_count(b"GG").unwrap(), 21);
        assert_eq!(repeat_count(b"GGG").unwrap(), 400 + 20 + 1);
    }

    #[test]
    fn rejects_empty_and_overflowing_codes() {
        assert!(matches!(repeat_count(b""), Err(Error::MalformedEncoding(_))));
        assert!(matches!(
            repeat_count(&[b'z'; 32]),
            Err(Error::MalformedEncoding(_))
        ));
    }
}

//! ASCII hex graphic data with run-length compression.
//!
//! The payload is expanded in three passes:
//!
//! 1. repeat codes (`alphabet`) are replaced by the repeated character,
//! 2. row shortcuts are replaced by the hex digits they stand for,
//! 3. the hex digits are packed two by two into bytes.
//!
//! Row shortcuts:
//!
//! | char | meaning                                  |
//! |------|------------------------------------------|
//! | `,`  | fill the rest of the row with `0`        |
//! | `!`  | fill the rest of the row with `F`        |
//! | `:`  | repeat the previous row                  |

use log::{debug, warn};

use crate::{alphabet, error::Error, options::DecodeOptions};

const FILL_BLANK: u8 = b',';
const FILL_BLACK: u8 = b'!';
const REPEAT_ROW: u8 = b':';

/// Decode an ASCII payload into exactly `size` bytes.
pub fn decode(
    payload: &str,
    size: usize,
    bytes_per_row: usize,
    options: &DecodeOptions,
) -> Result<Vec<u8>, Error> {
    let line_word_count = bytes_per_row
        .checked_mul(2)
        .ok_or_else(|| Error::MalformedHeader(format!("{} bytes per row", bytes_per_row)))?;
    let limit = size
        .checked_mul(2)
        .ok_or_else(|| Error::MalformedHeader(format!("{} bytes in total", size)))?;

    let data: Vec<u8> = if options.skips_line_breaks() {
        payload
            .bytes()
            .filter(|c| *c != b'\r' && *c != b'\n')
            .collect()
    } else {
        payload.as_bytes().to_vec()
    };

    let inflated = expand_runs(&data, limit)?;
    debug!("run-length expansion: {} -> {} chars", data.len(), inflated.len());

    let expanded = expand_rows(&inflated, line_word_count, limit)?;
    debug!("row expansion: {} -> {} chars", inflated.len(), expanded.len());

    pack_hex(&expanded, size, options.checks_length())
}

/// Pass 1: replace every repeat code by its repeated character.
///
/// Expansion stops once `limit` characters are produced, every later
/// character lands past the end of the bitmap.
pub fn expand_runs(data: &[u8], limit: usize) -> Result<Vec<u8>, Error> {
    let mut out: Vec<u8> = Vec::with_capacity(data.len().min(limit));
    let mut index = 0;

    while index < data.len() && out.len() < limit {
        let c = data[index];

        if alphabet::is_code(c) {
            let start = index;
            while index < data.len() && alphabet::is_code(data[index]) {
                index += 1;
            }
            let code = &data[start..index];

            let repeated = match data.get(index) {
                Some(c) => *c,
                None => {
                    return Err(Error::MalformedEncoding(format!(
                        "repeat code {:?} at offset {} has no character to repeat",
                        String::from_utf8_lossy(code),
                        start
                    )))
                }
            };
            index += 1;

            let count = alphabet::repeat_count(code)?;
            let room = (limit - out.len()) as u64;
            let n = count.min(room) as usize;
            fill(&mut out, n, repeated)?;
        } else {
            out.push(c);
            index += 1;
        }
    }

    Ok(out)
}

/// Pass 2: replace the row shortcuts, tracking the position in the current
/// row from the output produced so far.
pub fn expand_rows(data: &[u8], line_word_count: usize, limit: usize) -> Result<Vec<u8>, Error> {
    if line_word_count == 0 {
        return Err(Error::MalformedHeader("rows have no width".to_string()));
    }

    let mut out: Vec<u8> = Vec::with_capacity(data.len().min(limit));

    for (index, &c) in data.iter().enumerate() {
        if out.len() >= limit {
            break;
        }
        let remaining = line_word_count - (out.len() % line_word_count);

        match c {
            FILL_BLANK => fill(&mut out, remaining, b'0')?,
            FILL_BLACK => fill(&mut out, remaining, b'F')?,
            REPEAT_ROW => {
                if out.len() < line_word_count {
                    return Err(Error::MalformedEncoding(format!(
                        "row repeat at offset {} has no previous row",
                        index
                    )));
                }
                let start = out.len() - line_word_count;
                out.extend_from_within(start..);
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

/// Pass 3: pack hex digit pairs into `size` bytes.
///
/// Characters past `2 * size` are ignored. A shorter stream is an error when
/// `strict` is set, otherwise the missing bytes stay blank.
pub fn pack_hex(data: &[u8], size: usize, strict: bool) -> Result<Vec<u8>, Error> {
    let pairs = (data.len() / 2).min(size);

    if pairs < size {
        if strict {
            return Err(Error::ParseError(format!(
                "expanded data has {} hex digits, {} needed",
                data.len(),
                size * 2
            )));
        }
        warn!(
            "expanded data has {} hex digits, {} needed; padding with blank bytes",
            data.len(),
            size * 2
        );
    }

    let mut buffer: Vec<u8> = Vec::new();
    reserve(&mut buffer, size)?;
    for (n, pair) in data.chunks_exact(2).take(pairs).enumerate() {
        match (nibble(pair[0]), nibble(pair[1])) {
            (Some(high), Some(low)) => buffer.push(high << 4 | low),
            _ => {
                return Err(Error::ParseError(format!(
                    "invalid hex pair {:?} at offset {}",
                    String::from_utf8_lossy(pair),
                    n * 2
                )))
            }
        }
    }
    buffer.resize(size, 0x00);

    Ok(buffer)
}

/// Append `n` copies of `c`, reporting an impossible allocation as an error.
fn fill(out: &mut Vec<u8>, n: usize, c: u8) -> Result<(), Error> {
    reserve(out, n)?;
    out.resize(out.len() + n, c);
    Ok(())
}

fn reserve(out: &mut Vec<u8>, additional: usize) -> Result<(), Error> {
    out.try_reserve_exact(additional).map_err(|err| {
        Error::MalformedHeader(format!(
            "cannot allocate {} more bytes for the bitmap: {}",
            additional, err
        ))
    })
}

fn nibble(c: u8) -> Option<u8> {
    (c as char).to_digit(16).map(|d| d as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNLIMITED: usize = usize::MAX;

    #[test]
    fn repeat_codes_expand() {
        assert_eq!(expand_runs(b"G0", UNLIMITED).unwrap(), b"0");
        assert_eq!(expand_runs(b"H0", UNLIMITED).unwrap(), b"00");
        assert_eq!(expand_runs(b"gF", UNLIMITED).unwrap(), vec![b'F'; 20]);
        assert_eq!(expand_runs(b"gG0", UNLIMITED).unwrap(), vec![b'0'; 401]);
    }

    #[test]
    fn plain_characters_and_shortcuts_pass_through() {
        assert_eq!(expand_runs(b"A1,!:", UNLIMITED).unwrap(), b"A1,!:");
        assert_eq!(expand_runs(b"1I,F", UNLIMITED).unwrap(), b"1,,,F");
    }

    #[test]
    fn repeated_character_need_not_be_hex() {
        assert_eq!(expand_runs(b"H:", UNLIMITED).unwrap(), b"::");
    }

    #[test]
    fn dangling_repeat_code_is_malformed() {
        assert!(matches!(
            expand_runs(b"00gG", UNLIMITED),
            Err(Error::MalformedEncoding(_))
        ));
    }

    #[test]
    fn run_expansion_stops_at_limit() {
        let out = expand_runs(b"zzzzzz0", 8).unwrap();
        assert_eq!(out, b"00000000");
    }

    #[test]
    fn fill_shortcuts_complete_the_row() {
        assert_eq!(expand_rows(b",", 4, UNLIMITED).unwrap(), b"0000");
        assert_eq!(expand_rows(b"!", 4, UNLIMITED).unwrap(), b"FFFF");
        assert_eq!(expand_rows(b"F,", 4, UNLIMITED).unwrap(), b"F000");
        assert_eq!(expand_rows(b"1234!", 4, UNLIMITED).unwrap(), b"1234FFFF");
    }

    #[test]
    fn repeat_row_copies_previous_row() {
        assert_eq!(expand_rows(b"FF00:", 4, UNLIMITED).unwrap(), b"FF00FF00");
        assert_eq!(
            expand_rows(b"FF00::", 4, UNLIMITED).unwrap(),
            b"FF00FF00FF00"
        );
    }

    #[test]
    fn repeat_row_mid_row_takes_trailing_window() {
        assert_eq!(expand_rows(b"123456:", 4, UNLIMITED).unwrap(), b"1234563456");
    }

    #[test]
    fn repeat_row_without_previous_row_is_malformed() {
        assert!(matches!(
            expand_rows(b"FF:", 4, UNLIMITED),
            Err(Error::MalformedEncoding(_))
        ));
    }

    #[test]
    fn hex_pairs_pack_into_bytes() {
        assert_eq!(pack_hex(b"FF00a5", 3, true).unwrap(), vec![0xFF, 0x00, 0xA5]);
    }

    #[test]
    fn extra_and_odd_characters_are_ignored() {
        assert_eq!(pack_hex(b"FF00F", 2, true).unwrap(), vec![0xFF, 0x00]);
        assert_eq!(pack_hex(b"0102ZZ", 2, true).unwrap(), vec![0x01, 0x02]);
    }

    #[test]
    fn short_stream_is_padded_or_rejected() {
        assert_eq!(pack_hex(b"FF", 3, false).unwrap(), vec![0xFF, 0x00, 0x00]);
        assert!(matches!(pack_hex(b"FF", 3, true), Err(Error::ParseError(_))));
    }

    #[test]
    fn impossible_sizes_are_errors_not_aborts() {
        assert!(matches!(
            pack_hex(b"FF", usize::MAX / 4, false),
            Err(Error::MalformedHeader(_))
        ));
        assert!(matches!(
            expand_runs(b"zzzzzzzzzzzz0", usize::MAX / 2),
            Err(Error::MalformedHeader(_))
        ));
    }

    #[test]
    fn invalid_hex_pair_is_a_parse_error() {
        assert!(matches!(pack_hex(b"FG", 1, false), Err(Error::ParseError(_))));
        assert!(matches!(pack_hex(b"+1", 1, false), Err(Error::ParseError(_))));
    }

    #[test]
    fn full_payload_decodes() {
        let options = DecodeOptions::new();
        // 2 bytes per row, 3 rows: FF00 / FF00 / 0000
        let buffer = decode("FF00:,", 6, 2, &options).unwrap();
        assert_eq!(buffer, vec![0xFF, 0x00, 0xFF, 0x00, 0x00, 0x00]);

        // 20 x 'F' then ',' on a 16 byte row
        let buffer = decode("gF,", 16, 16, &options).unwrap();
        assert_eq!(&buffer[..10], &[0xFF; 10]);
        assert_eq!(&buffer[10..], &[0x00; 6]);
    }

    #[test]
    fn line_breaks_are_skipped_on_request() {
        let options = DecodeOptions::new().skip_line_breaks(true);
        let buffer = decode("FF\r\n00\n", 2, 1, &options).unwrap();
        assert_eq!(buffer, vec![0xFF, 0x00]);

        assert!(matches!(
            decode("FF\n00", 2, 1, &DecodeOptions::new()),
            Err(Error::ParseError(_))
        ));
    }
}

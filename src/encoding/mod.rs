//! Utilities for percent-encoding.

pub mod table;

pub use table::Table;

use crate::error::SyntaxError;

const fn gen_octet_table(hi: bool) -> [u8; 256] {
    let mut out = [0xFF; 256];
    let shift = (hi as u8) * 4;

    let mut i = 0;
    while i < 10 {
        out[(i + b'0') as usize] = i << shift;
        i += 1;
    }
    while i < 16 {
        out[(i - 10 + b'A') as usize] = i << shift;
        out[(i - 10 + b'a') as usize] = i << shift;
        i += 1;
    }
    out
}

static OCTET_TABLE_HI: &[u8; 256] = &gen_octet_table(true);
pub(crate) static OCTET_TABLE_LO: &[u8; 256] = &gen_octet_table(false);

/// Decodes a percent-encoded octet.
fn decode_octet(mut hi: u8, mut lo: u8) -> Option<u8> {
    hi = OCTET_TABLE_HI[hi as usize];
    lo = OCTET_TABLE_LO[lo as usize];
    if hi & 1 == 0 && lo & 0x80 == 0 {
        Some(hi | lo)
    } else {
        None
    }
}

/// Percent-encodes a byte sequence with the given table.
///
/// Bytes allowed by the table are copied verbatim; all others become
/// uppercase-hexadecimal percent triplets.
#[must_use]
pub fn encode<S: AsRef<[u8]> + ?Sized>(s: &S, table: &Table) -> String {
    let s = s.as_ref();
    let mut buf = String::with_capacity(s.len());
    encode_to(s, table, &mut buf);
    buf
}

/// Percent-encodes a byte sequence with the given table, appending to `buf`.
pub fn encode_to<S: AsRef<[u8]> + ?Sized>(s: &S, table: &Table, buf: &mut String) {
    for &x in s.as_ref() {
        table.encode_byte(x, buf);
    }
}

/// Decodes a percent-encoded string.
///
/// # Errors
///
/// Returns a [`SyntaxError`] when a percent triplet is incomplete
/// or non-hexadecimal.
pub fn decode(s: &str) -> Result<Vec<u8>, SyntaxError> {
    let bytes = s.as_bytes();
    // Everything before the first '%' passes through untouched.
    let first = match bytes.iter().position(|&x| x == b'%') {
        Some(i) => i,
        None => return Ok(bytes.to_vec()),
    };

    let mut buf = Vec::with_capacity(bytes.len());
    buf.extend_from_slice(&bytes[..first]);

    let mut i = first;
    while i < bytes.len() {
        let x = bytes[i];
        if x == b'%' {
            let octet = match bytes.get(i + 1).zip(bytes.get(i + 2)) {
                Some((&hi, &lo)) => decode_octet(hi, lo),
                None => None,
            };
            match octet {
                Some(o) => buf.push(o),
                None => {
                    return Err(SyntaxError::InvalidOctet {
                        input: s.to_owned(),
                        index: i,
                    })
                }
            }
            i += 3;
        } else {
            buf.push(x);
            i += 1;
        }
    }
    Ok(buf)
}

/// Decodes a percent-encoded string into UTF-8 text.
///
/// # Errors
///
/// Returns a [`SyntaxError`] when a percent triplet is malformed or
/// the decoded bytes are not valid UTF-8.
pub fn decode_str(s: &str) -> Result<String, SyntaxError> {
    String::from_utf8(decode(s)?).map_err(|_| SyntaxError::InvalidUtf8 {
        input: s.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::{table::*, *};

    const RAW: &str = "te😃a 测1`~!@试#$%st^&+=";
    const ENCODED: &str = "te%F0%9F%98%83a%20%E6%B5%8B1%60~!@%E8%AF%95%23$%25st%5E&+=";

    #[test]
    fn enc_dec_validate() {
        let s = encode(RAW, QUERY);
        assert_eq!(ENCODED, s);

        let mut buf = String::new();
        encode_to(RAW, QUERY, &mut buf);
        assert_eq!(ENCODED, buf);

        assert!(QUERY.validate(s.as_bytes()));

        assert_eq!(Ok(RAW.as_bytes()), decode(ENCODED).as_deref());
        assert_eq!(Ok(RAW), decode_str(ENCODED).as_deref());

        assert_eq!(Ok(b"\x2d\xe6\xb5" as _), decode("%2D%E6%B5").as_deref());

        // incomplete triplet
        assert_eq!(
            decode("%2d%"),
            Err(SyntaxError::InvalidOctet {
                input: "%2d%".to_owned(),
                index: 3,
            })
        );
        // non-hexadecimal triplet
        assert_eq!(
            decode("%2d%fg"),
            Err(SyntaxError::InvalidOctet {
                input: "%2d%fg".to_owned(),
                index: 3,
            })
        );

        // zero bytes are not allowed unencoded
        assert!(!QUERY.validate(b"\0"));
    }

    #[test]
    fn idempotent_round_trip() {
        for table in [USERINFO, REG_NAME, PATH, QUERY, FRAGMENT] {
            let encoded = encode(RAW, table);
            assert_eq!(Ok(RAW.as_bytes()), decode(&encoded).as_deref());
        }
    }
}

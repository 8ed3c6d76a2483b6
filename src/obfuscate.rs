//! Character-reference obfuscation for the contact address.
//!
//! The mail link is written as `mailto:` with every character replaced by an
//! HTML numeric character reference, mixing decimal (`&#109;`) and hex
//! (`&#x6c;`) forms. Browsers decode it transparently; naive scrapers that
//! grep for `@` or `mailto:` do not. This is not a security control.
//!
//! Decimal versus hex is chosen per character from the bits of a SHA-256 of
//! the plain `mailto:` string, so the same address always encodes to the same
//! bytes. Strings that are already encoded are carried through verbatim by
//! [`crate::metadata`], which keeps hand-made encodings bit-for-bit intact.

use sha2::{Digest, Sha256};
use thiserror::Error;

const MAILTO: &str = "mailto:";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unterminated character reference at byte {0}")]
    Unterminated(usize),
    #[error("invalid character reference: &#{0};")]
    InvalidReference(String),
}

/// Encode `address` as an obfuscated `mailto:` destination.
///
/// A leading `mailto:` on the input is accepted and not doubled.
pub fn encode(address: &str) -> String {
    let address = address.strip_prefix(MAILTO).unwrap_or(address);
    let plain = format!("{MAILTO}{address}");
    let digest = Sha256::digest(plain.as_bytes());

    plain
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let byte = digest[(i / 8) % digest.len()];
            if (byte >> (i % 8)) & 1 == 1 {
                format!("&#x{:x};", c as u32)
            } else {
                format!("&#{};", c as u32)
            }
        })
        .collect()
}

/// Decode numeric character references back to plain text.
///
/// Decimal and hex references are resolved; any other character passes
/// through unchanged, so partially encoded strings decode too.
pub fn decode(encoded: &str) -> Result<String, DecodeError> {
    let mut out = String::with_capacity(encoded.len() / 4);
    let mut rest = encoded;
    let mut offset = 0;

    while let Some(pos) = rest.find("&#") {
        out.push_str(&rest[..pos]);
        let body_start = pos + 2;
        let end = rest[body_start..]
            .find(';')
            .ok_or(DecodeError::Unterminated(offset + pos))?;
        let body = &rest[body_start..body_start + end];

        let code = match body.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => body.parse::<u32>(),
        }
        .map_err(|_| DecodeError::InvalidReference(body.to_string()))?;
        let c = char::from_u32(code)
            .ok_or_else(|| DecodeError::InvalidReference(body.to_string()))?;
        out.push(c);

        let consumed = body_start + end + 1;
        offset += consumed;
        rest = &rest[consumed..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Whether `s` looks like an obfuscated string rather than a plain address.
pub fn is_encoded(s: &str) -> bool {
    s.contains("&#")
}

/// Whether `s` is nothing but numeric character references.
///
/// Only such strings are safe to emit unescaped inside an attribute.
pub fn is_fully_encoded(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    s.split_terminator(';').all(|reference| {
        let Some(body) = reference.strip_prefix("&#") else {
            return false;
        };
        match body.strip_prefix(['x', 'X']) {
            Some(hex) => !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()),
            None => !body.is_empty() && body.chars().all(|c| c.is_ascii_digit()),
        }
    }) && s.ends_with(';')
}

/// Syntactic check of a decoded `mailto:` destination.
pub fn is_valid_mailto(decoded: &str) -> bool {
    decoded
        .strip_prefix(MAILTO)
        .is_some_and(is_valid_address)
}

/// Syntactic check of a bare address: `local@domain.tld`, no whitespace.
pub fn is_valid_address(address: &str) -> bool {
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    if address
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '<' | '>'))
    {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}

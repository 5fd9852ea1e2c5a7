//! Entity escaping for attribute values and text content.
//!
//! Two layers compose on output:
//! - the five predefined entities: `&lt;` `&gt;` `&amp;` `&quot;` `&apos;`
//! - numeric references `&#N;` for control characters 1-31, except tab,
//!   line feed and carriage return which stay literal
//!
//! Both directions return `Cow::Borrowed` when nothing has to change.

use memchr::memchr;
use std::borrow::Cow;

/// Longest reference worth looking at: `&#x10FFFF;` plus slack.
const MAX_REFERENCE_LEN: usize = 12;

/// Returns true for control characters that are written as `&#N;`.
#[inline]
fn is_encoded_control(code: u32) -> bool {
    (1..=31).contains(&code) && !matches!(code, 9 | 10 | 13)
}

#[inline]
fn needs_escape(b: u8) -> bool {
    matches!(b, b'&' | b'<' | b'>' | b'"' | b'\'') || is_encoded_control(b as u32)
}

/// Escapes `input` for use in an attribute value or element text.
pub fn escape(input: &str) -> Cow<'_, str> {
    if !input.bytes().any(needs_escape) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 16);
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if is_encoded_control(c as u32) => {
                out.push_str("&#");
                out.push_str(&(c as u32).to_string());
                out.push(';');
            }
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Decodes named and numeric character references.
///
/// Decoding is a single left-to-right pass, so the output of one reference
/// is never decoded again: `&amp;#1;` becomes the text `&#1;`. Unknown,
/// malformed or unterminated references are kept literally.
pub fn unescape(input: &str) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    if memchr(b'&', bytes).is_none() {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut pos = 0;
    while let Some(offset) = memchr(b'&', &bytes[pos..]) {
        let amp = pos + offset;
        out.push_str(&input[pos..amp]);
        match decode_reference(&input[amp..]) {
            Some((decoded, consumed)) => {
                out.push(decoded);
                pos = amp + consumed;
            }
            None => {
                out.push('&');
                pos = amp + 1;
            }
        }
    }
    out.push_str(&input[pos..]);
    Cow::Owned(out)
}

/// Decodes the reference at the start of `s` (which begins with `&`).
///
/// Returns the character and the number of bytes consumed, including `;`.
fn decode_reference(s: &str) -> Option<(char, usize)> {
    let window = &s.as_bytes()[..s.len().min(MAX_REFERENCE_LEN)];
    let semi = memchr(b';', window)?;
    let name = &s[1..semi];

    let ch = match name {
        "lt" => '<',
        "gt" => '>',
        "amp" => '&',
        "quot" => '"',
        "apos" => '\'',
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(|c: char| c == 'x' || c == 'X') {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse::<u32>().ok()?,
            };
            if code == 0 {
                return None;
            }
            char::from_u32(code)?
        }
    };
    Some((ch, semi + 1))
}

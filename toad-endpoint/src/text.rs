//! Text helpers for URIs and endpoint names
//!
//! CoAP strings are "Net-Unicode" ([RFC5198](https://datatracker.ietf.org/doc/html/rfc5198)):
//! Unicode in Normalization Form C, encoded as UTF-8.

use std::borrow::Cow;

use percent_encoding::{percent_decode_str, percent_encode, AsciiSet, NON_ALPHANUMERIC};
use unicode_normalization::UnicodeNormalization;

/// Characters that are percent-encoded by [`url_quote`] unless
/// a less strict set is used; everything except the
/// [RFC3986 unreserved characters](https://datatracker.ietf.org/doc/html/rfc3986#section-2.3).
pub const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-')
                                                   .remove(b'.')
                                                   .remove(b'_')
                                                   .remove(b'~');

/// Default set for [`url_quote`]; like [`UNRESERVED`] but `/` is kept.
pub const DEFAULT: &AsciiSet = &UNRESERVED.remove(b'/');

/// A registered host name; sub-delimiters are kept, `:` and `@` are encoded.
pub const HOST: &AsciiSet = &UNRESERVED.remove(b'!')
                                       .remove(b'$')
                                       .remove(b'\'')
                                       .remove(b'(')
                                       .remove(b')')
                                       .remove(b'*')
                                       .remove(b'+')
                                       .remove(b',')
                                       .remove(b';')
                                       .remove(b'=')
                                       .remove(b'&');

/// A single path segment; `/` is encoded so that it cannot split the segment.
pub const PATH_SEGMENT: &AsciiSet = &HOST.remove(b':').remove(b'@');

/// A single query clause; `&` is encoded so that it cannot split the clause.
pub const QUERY_CLAUSE: &AsciiSet = &PATH_SEGMENT.add(b'&').remove(b'/').remove(b'?');

/// Normalize `text` to NFC and encode it as UTF-8
///
/// ```
/// use toad_endpoint::text::to_net_unicode;
///
/// assert_eq!(to_net_unicode("e\u{301}"), "\u{e9}".as_bytes());
/// ```
pub fn to_net_unicode(text: &str) -> Vec<u8> {
  text.nfc().collect::<String>().into_bytes()
}

/// Percent-encode the Net-Unicode form of `text`, leaving characters
/// not in `set` alone.
///
/// ```
/// use toad_endpoint::text::{self, url_quote};
///
/// assert_eq!(url_quote("a b/c", text::DEFAULT), "a%20b/c");
/// assert_eq!(url_quote("a b/c", text::PATH_SEGMENT), "a%20b%2Fc");
/// assert_eq!(url_quote("\u{e9}", text::DEFAULT), "%C3%A9");
/// ```
pub fn url_quote(text: &str, set: &'static AsciiSet) -> String {
  percent_encode(&to_net_unicode(text), set).to_string()
}

/// Percent-decode `quoted`, requiring the result to be UTF-8
///
/// Yields `None` if the decoded bytes are not valid UTF-8.
///
/// ```
/// use toad_endpoint::text::url_unquote;
///
/// assert_eq!(url_unquote("a%2Fb").as_deref(), Some("a/b"));
/// assert_eq!(url_unquote("%FF"), None);
/// ```
pub fn url_unquote(quoted: &str) -> Option<String> {
  percent_decode_str(quoted).decode_utf8()
                            .ok()
                            .map(Cow::into_owned)
}

/// Render bytes for humans (e.g. in log lines)
///
/// Printable ASCII (including whitespace) is shown as text,
/// anything else as bracketed lowercase hex.
///
/// ```
/// use toad_endpoint::text::to_display_text;
///
/// assert_eq!(to_display_text(b"temp"), "temp");
/// assert_eq!(to_display_text(&[0x16, 0x3c]), "[163c]");
/// ```
pub fn to_display_text(bytes: &[u8]) -> String {
  let printable = |b: &u8| b.is_ascii_graphic() || b" \t\n\r\x0b\x0c".contains(b);

  if bytes.iter().all(printable) {
    bytes.iter().map(|b| *b as char).collect()
  } else {
    let hex = bytes.iter()
                   .map(|b| format!("{:02x}", b))
                   .collect::<String>();
    format!("[{}]", hex)
  }
}

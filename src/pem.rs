//!
//! Input normalization: turns raw or URL-escaped certificate text into PEM
//!
use std::borrow::Cow;

pub const BEGIN_MARKER: &str = "-----BEGIN CERTIFICATE-----";
pub const END_MARKER: &str = "-----END CERTIFICATE-----";

const ESCAPED_NEWLINE: &str = "%0A";

/// Convert a certificate string into PEM text.
///
/// Input which already carries a PEM header is returned untouched. Otherwise the body is treated
/// as bare base64: literal `%0A` sequences become newlines and the result is wrapped with
/// certificate begin/end markers.
pub fn normalize(input: &str) -> Cow<'_, str> {
    if input.contains("BEGIN CERTIFICATE") {
        return Cow::Borrowed(input);
    }

    let body = input.replace(ESCAPED_NEWLINE, "\n");
    let separator = if body.ends_with('\n') { "" } else { "\n" };

    Cow::Owned(format!("{BEGIN_MARKER}\n{body}{separator}{END_MARKER}"))
}

//! Response helpers.

/// Check whether a status code is in an accepted range.
///
/// Success (2xx) and client error (4xx) statuses are answers the driver
/// interprets; anything else is a failed exchange.
pub fn is_accepted_status_code(status: u16) -> bool {
    (200..=299).contains(&status) || (400..=499).contains(&status)
}

/// Check whether a content type matches one of the expected MIME types.
///
/// Parameters after `;` (such as the charset) are ignored.
pub fn is_accepted_content_type(content: &str, expected: &[&str]) -> bool {
    let mime = content.split(';').next().unwrap_or_default().trim();
    expected.iter().any(|candidate| *candidate == mime)
}

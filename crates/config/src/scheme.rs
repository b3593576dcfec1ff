//! Database URL scheme rewriting.
//!
//! Responsibilities:
//! - Rewrite bare database schemes (`sqlite`, `postgres`, `mysql`) to their
//!   async driver schemes.
//! - Mask credentials in URLs before they are logged.
//!
//! Invariants:
//! - The scheme table is consulted in order; the first match wins and is replaced once.
//! - A prefix only matches at a scheme boundary, so qualified URLs are left unchanged.

use std::borrow::Cow;

use url::Url;

use crate::constants::DRIVER_SCHEMES;

/// Rewrite the scheme of a database URL to its async driver variant.
///
/// Returns the input unchanged (borrowed) when no table entry matches.
/// Already-qualified schemes such as `sqlite+aiosqlite:` are left alone on
/// purpose: a table prefix only matches when the scheme's `:` follows it.
///
/// ```rust,ignore
/// assert_eq!(alchemize_url("sqlite:///db.sqlite3"), "sqlite+aiosqlite:///db.sqlite3");
/// assert_eq!(alchemize_url("oracle://x"), "oracle://x");
/// ```
pub fn alchemize_url(url: &str) -> Cow<'_, str> {
    for (bare, driver) in DRIVER_SCHEMES {
        if let Some(rest) = url.strip_prefix(bare)
            && rest.starts_with(':')
        {
            let rewritten = format!("{driver}{rest}");
            tracing::debug!(
                from = *bare,
                to = *driver,
                url = %redact_url(&rewritten),
                "Rewrote database URL scheme"
            );
            return Cow::Owned(rewritten);
        }
    }
    Cow::Borrowed(url)
}

/// Replace any password in `url` with `***`.
///
/// Input that does not parse as a URL is returned unchanged since it cannot
/// carry structured credentials.
pub fn redact_url(url: &str) -> Cow<'_, str> {
    match Url::parse(url) {
        Ok(mut parsed) if parsed.password().is_some() => {
            if parsed.set_password(Some("***")).is_ok() {
                Cow::Owned(parsed.to_string())
            } else {
                Cow::Borrowed(url)
            }
        }
        _ => Cow::Borrowed(url),
    }
}

use url::Url;

/// Origin the analysis backend serves report assets from. Relative
/// screenshot/report links resolve against this unless the caller supplies
/// its own origin.
pub const DEFAULT_ORIGIN: &str = "http://localhost:8090";

/// Resolve a possibly-relative URL against a known origin.
///
/// Every link the dashboard renders passes through here. Absolute http(s)
/// URLs pass through unchanged; `data:` URLs carry inline screenshots and
/// pass through untouched; anything unresolvable yields `None`, never a
/// panic. Inputs with whitespace are rejected rather than percent-encoded
/// into a link nobody intended.
pub fn to_absolute_url(maybe_url: Option<&str>, origin: &str) -> Option<String> {
    let raw = maybe_url?.trim();
    if raw.is_empty() || raw.contains(char::is_whitespace) {
        return None;
    }

    if let Ok(parsed) = Url::parse(raw) {
        return match parsed.scheme() {
            "http" | "https" | "data" => Some(parsed.to_string()),
            _ => None,
        };
    }

    let base = Url::parse(origin).ok()?;
    base.join(raw).ok().map(|u| u.to_string())
}

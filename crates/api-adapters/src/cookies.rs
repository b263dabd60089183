//! Minimal `Cookie` / `Set-Cookie` handling for the tracking cookie.

use std::fmt;

use chrono::{DateTime, Utc};

/// First value of cookie `name` across all `Cookie` header values.
pub fn find_cookie<'a, I>(headers: I, name: &str) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    headers
        .into_iter()
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| k.trim() == name)
        .map(|(_, v)| v.trim().trim_matches('"'))
}

/// A `Set-Cookie` header value with an absolute expiry.
#[derive(Debug, Clone, PartialEq)]
pub struct SetCookie<'a> {
    pub name: &'a str,
    pub value: String,
    pub expires: DateTime<Utc>,
}

impl fmt::Display for SetCookie<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}; Expires={}; Path=/; HttpOnly; SameSite=Lax",
            self.name,
            self.value,
            self.expires.format("%a, %d %b %Y %H:%M:%S GMT")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_find_cookie_among_many() {
        let headers = ["theme=dark; tracking_id=12_ab", "other=1"];
        assert_eq!(find_cookie(headers, "tracking_id"), Some("12_ab"));
        assert_eq!(find_cookie(headers, "other"), Some("1"));
        assert_eq!(find_cookie(headers, "missing"), None);
    }

    #[test]
    fn test_find_cookie_is_exact_on_name() {
        let headers = ["xtracking_id=1_aa; tracking_id = \"2_bb\""];
        assert_eq!(find_cookie(headers, "tracking_id"), Some("2_bb"));
    }

    #[test]
    fn test_find_cookie_tolerates_junk() {
        let headers = [";;novalue; =x; tracking_id="];
        assert_eq!(find_cookie(headers, "tracking_id"), Some(""));
    }

    #[test]
    fn test_set_cookie_format() {
        let cookie = SetCookie {
            name: "tracking_id",
            value: "5_beef".into(),
            expires: Utc.with_ymd_and_hms(2026, 10, 18, 9, 5, 0).unwrap(),
        };
        assert_eq!(
            cookie.to_string(),
            "tracking_id=5_beef; Expires=Sun, 18 Oct 2026 09:05:00 GMT; Path=/; HttpOnly; SameSite=Lax"
        );
    }
}

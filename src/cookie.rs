use std::collections::HashMap;

use crate::utils::time::{http_date, UtcTime};

/// Options of a `Set-Cookie` header written by `Response::set_cookie`.
#[derive(Debug, Clone, Default)]
pub struct CookieOptions {
    pub value: String,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub expires: Option<UtcTime>,
    pub max_age: Option<i64>,
    pub http_only: bool,
    pub secure: bool,
}

impl CookieOptions {
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            ..Default::default()
        }
    }
}

impl From<&str> for CookieOptions {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

fn decode(v: &str) -> String {
    match urlencoding::decode(v) {
        Ok(v) => v.into_owned(),
        Err(_) => v.to_string(),
    }
}

/// Parses a `Cookie` header value.
///
/// From RFC 2109: if multiple cookies satisfy the criteria, they are ordered
/// in the Cookie header such that those with more specific Path attributes
/// precede those with less specific ones. So the first value of a name is
/// the one that is kept.
pub fn parse_cookie(header: &str) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    for pair in header.split([';', ',']) {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }

        let (name, value) = match pair.split_once('=') {
            Some((k, v)) => (k.trim(), v.trim()),
            None => (pair, ""),
        };
        if name.is_empty() {
            continue;
        }

        let value = value.trim_matches('"');
        cookies.entry(decode(name)).or_insert_with(|| decode(value));
    }
    cookies
}

pub fn stringify_cookie(name: &str, options: &CookieOptions) -> String {
    let mut cookie = format!(
        "{}={}",
        urlencoding::encode(name),
        urlencoding::encode(&options.value)
    );

    if let Some(domain) = options.domain.as_ref() {
        cookie.push_str("; Domain=");
        cookie.push_str(domain);
    }
    if let Some(path) = options.path.as_ref() {
        cookie.push_str("; Path=");
        cookie.push_str(path);
    }
    if let Some(expires) = options.expires.as_ref() {
        cookie.push_str("; Expires=");
        cookie.push_str(http_date(expires).as_str());
    }
    if let Some(max_age) = options.max_age {
        cookie.push_str(format!("; Max-Age={}", max_age).as_str());
    }
    if options.http_only {
        cookie.push_str("; HttpOnly");
    }
    if options.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::{parse_cookie, stringify_cookie, CookieOptions};

    #[test]
    fn first_wins() {
        let cookies = parse_cookie("sid=specific; theme=dark; sid=general");
        assert_eq!(cookies.get("sid").map(|v| v.as_str()), Some("specific"));
        assert_eq!(cookies.get("theme").map(|v| v.as_str()), Some("dark"));
        assert_eq!(cookies.len(), 2);
    }

    #[test]
    fn decodes_and_tolerates_junk() {
        let cookies = parse_cookie(" a=hello%20world ;; =x; flag; q=\"quoted\"");
        assert_eq!(cookies.get("a").unwrap(), "hello world");
        assert_eq!(cookies.get("flag").unwrap(), "");
        assert_eq!(cookies.get("q").unwrap(), "quoted");
        assert!(!cookies.contains_key(""));
    }

    #[test]
    fn set_cookie_value() {
        let options = CookieOptions {
            value: "a b".to_string(),
            path: Some("/".to_string()),
            expires: Some(chrono::Utc.with_ymd_and_hms(2000, 10, 10, 13, 55, 36).unwrap()),
            http_only: true,
            ..Default::default()
        };
        assert_eq!(
            stringify_cookie("sid", &options),
            "sid=a%20b; Path=/; Expires=Tue, 10 Oct 2000 13:55:36 GMT; HttpOnly"
        );
        assert_eq!(stringify_cookie("x", &"1".into()), "x=1");
    }
}

use crate::utils::MultiValuesMap;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const SET_COOKIE: &str = "Set-Cookie";

/// Header map keyed by case-sensitive names. Reads return the first value of
/// a name; `append` keeps every value, which is what additive headers such as
/// `Set-Cookie` need.
#[derive(Debug, Clone)]
pub struct Headers {
    map: MultiValuesMap,
}

impl Default for Headers {
    fn default() -> Self {
        Self::new()
    }
}

impl Headers {
    pub fn new() -> Self {
        Self {
            map: MultiValuesMap::new(true),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn append(&mut self, k: &str, v: &str) {
        self.map.append(k, v);
    }

    pub fn set(&mut self, k: &str, v: &str) {
        self.map.set(k, v);
    }

    pub fn contains(&self, k: &str) -> bool {
        self.map.contains(k)
    }

    pub fn get(&self, k: &str) -> Option<&str> {
        self.map.get(k).map(|v| v.as_str())
    }

    /// The value of `k`, `None` when absent or empty.
    pub fn get_nonempty(&self, k: &str) -> Option<&str> {
        self.get(k).filter(|v| !v.is_empty())
    }

    pub fn get_all(&self, k: &str) -> Option<&Vec<String>> {
        self.map.get_all(k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.map.iter()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.append(k.as_ref(), v.as_ref());
        }
        headers
    }
}

/// Normalizes a header name to `Content-Type` style, with the usual
/// special cases for all-caps words.
pub fn canonical_name(name: &str) -> String {
    let lower = name.trim().to_ascii_lowercase();
    match lower.as_str() {
        "content-md5" => return "Content-MD5".to_string(),
        "dnt" => return "DNT".to_string(),
        "etag" => return "ETag".to_string(),
        "te" => return "TE".to_string(),
        "www-authenticate" => return "WWW-Authenticate".to_string(),
        "x-xss-protection" => return "X-XSS-Protection".to_string(),
        _ => {}
    }

    lower
        .split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            }
        })
        .collect::<Vec<String>>()
        .join("-")
}

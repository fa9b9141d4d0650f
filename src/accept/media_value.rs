use std::fmt::{Display, Formatter};

use smallvec::SmallVec;

pub type MediaValues = SmallVec<[MediaValue; 4]>;

/// One `type;param=value` entry of a negotiation header such as
/// `Accept-Encoding` or of a `Content-Type` value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaValue {
    pub type_: String,
    pub params: SmallVec<[(String, String); 2]>,
}

impl MediaValue {
    pub fn new(type_: &str) -> Self {
        Self {
            type_: type_.to_string(),
            params: SmallVec::new(),
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_wildcard(&self) -> bool {
        self.type_ == "*"
    }

    /// The `q` parameter, `1` when absent, `None` when it is not a number in
    /// the `[0, 1]` range.
    pub fn quality_factor(&self) -> Option<f32> {
        match self.param("q") {
            None => Some(1.0),
            Some(q) => match q.parse::<f32>() {
                Ok(v) if (0.0..=1.0).contains(&v) => Some(v),
                _ => None,
            },
        }
    }
}

impl Display for MediaValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.type_)?;
        for (k, v) in self.params.iter() {
            write!(f, ";{}={}", k, v)?;
        }
        Ok(())
    }
}

fn unquote(v: &str) -> &str {
    let v = v.trim();
    if v.len() >= 2 && v.starts_with('"') && v.ends_with('"') {
        return &v[1..v.len() - 1];
    }
    v
}

/// Parses a single `type;k=v;k2=v2` entry. The type is lower-cased, params
/// without `=` are dropped.
pub fn parse_media_value(txt: &str) -> MediaValue {
    let mut parts = txt.split(';');
    let mut value = MediaValue::new(parts.next().unwrap_or("").trim().to_ascii_lowercase().as_str());

    for part in parts {
        if let Some((k, v)) = part.split_once('=') {
            let k = k.trim();
            if k.is_empty() {
                continue;
            }
            value.params.push((k.to_ascii_lowercase(), unquote(v).to_string()));
        }
    }
    value
}

/// Parses a comma separated list of media values, skipping empty elements.
pub fn parse_media_values(txt: &str) -> MediaValues {
    txt.split(',')
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(parse_media_value)
        .filter(|v| !v.type_.is_empty())
        .collect()
}

pub fn stringify_media_values(values: &[MediaValue]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}

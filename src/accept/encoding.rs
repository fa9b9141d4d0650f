use std::fmt::{Display, Formatter};

use super::media_value::{parse_media_value, parse_media_values, stringify_media_values, MediaValue, MediaValues};

/// A parsed `Accept-Encoding` header.
///
/// See <https://www.rfc-editor.org/rfc/rfc2616#section-14.3>.
#[derive(Debug, Clone, Default)]
pub struct AcceptEncoding {
    values: MediaValues,
}

impl AcceptEncoding {
    /// An absent or empty header yields an empty list, under which only
    /// `identity` is acceptable.
    pub fn new(header: Option<&str>) -> Self {
        match header {
            Some(txt) if !txt.trim().is_empty() => Self {
                values: parse_media_values(txt),
            },
            _ => Self::default(),
        }
    }

    pub fn media_values(&self) -> &[MediaValue] {
        &self.values
    }

    /// The header value re-serialized from the parsed entries.
    pub fn value(&self) -> String {
        stringify_media_values(&self.values)
    }

    pub fn accepts(&self, encoding: &str) -> bool {
        self.quality_factor_for_encoding(encoding) != 0.0
    }

    pub fn quality_factor_for_encoding(&self, encoding: &str) -> f32 {
        let given = parse_media_value(encoding);

        let mut matches: Vec<(&MediaValue, f32)> = self
            .values
            .iter()
            .filter(|v| v.is_wildcard() || v.type_ == given.type_)
            .filter_map(|v| match v.quality_factor() {
                Some(q) => Some((v, q)),
                None => {
                    let entry = v.to_string();
                    log::warn!(entry = entry.as_str(); "ignoring malformed Accept-Encoding entry");
                    None
                }
            })
            .collect();

        // "*" has the least precedence, all others are equal. The sort is
        // stable so header order is kept among concrete entries.
        matches.sort_by_key(|(v, _)| v.is_wildcard());

        // The "identity" content-coding is always acceptable, unless
        // specifically refused with "identity;q=0".
        if given.type_ == "identity" {
            return match matches.first() {
                Some((v, q)) if !v.is_wildcard() => *q,
                _ => 1.0,
            };
        }

        match matches.first() {
            None => 0.0,
            Some((_, q)) => *q,
        }
    }
}

impl Display for AcceptEncoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Accept-Encoding: {}", self.value())
    }
}

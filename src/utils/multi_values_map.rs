use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct MultiValuesMap {
    pub(crate) _map: Option<HashMap<String, Vec<String>>>,
    pub(crate) case_sensitive: bool,
}

impl MultiValuesMap {
    pub fn new(case_sensitive: bool) -> Self {
        Self {
            _map: None,
            case_sensitive,
        }
    }

    pub fn len(&self) -> usize {
        match &self._map {
            Some(map) => map.len(),
            None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn key(&self, key: &str) -> String {
        if self.case_sensitive {
            return key.to_string();
        }
        key.to_ascii_lowercase()
    }

    pub fn append(&mut self, key: &str, val: &str) {
        let key = self.key(key);
        self._map
            .get_or_insert_with(HashMap::new)
            .entry(key)
            .or_default()
            .push(val.to_string());
    }

    pub fn set(&mut self, key: &str, val: &str) {
        let key = self.key(key);
        let vec = self
            ._map
            .get_or_insert_with(HashMap::new)
            .entry(key)
            .or_default();
        vec.clear();
        vec.push(val.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.get_all(key).and_then(|vec| vec.first())
    }

    pub fn get_last(&self, key: &str) -> Option<&String> {
        self.get_all(key).and_then(|vec| vec.last())
    }

    pub fn get_all(&self, key: &str) -> Option<&Vec<String>> {
        match &self._map {
            None => None,
            Some(map) => map.get(self.key(key).as_str()),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        match &self._map {
            None => false,
            Some(map) => map.contains_key(self.key(key).as_str()),
        }
    }

    /// Iterates `(key, values)` pairs ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        let mut pairs: Vec<(&String, &Vec<String>)> = match &self._map {
            None => vec![],
            Some(map) => map.iter().collect(),
        };
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        pairs.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::MultiValuesMap;

    #[test]
    fn case_sensitive_keys() {
        let mut map = MultiValuesMap::new(true);
        map.append("Content-Type", "text/plain");
        assert!(map.contains("Content-Type"));
        assert!(!map.contains("content-type"));

        let mut map = MultiValuesMap::new(false);
        map.append("Content-Type", "text/plain");
        assert_eq!(map.get("content-type").map(|v| v.as_str()), Some("text/plain"));
    }

    #[test]
    fn set_replaces_append_adds() {
        let mut map = MultiValuesMap::new(true);
        map.append("Set-Cookie", "a=1");
        map.append("Set-Cookie", "b=2");
        assert_eq!(map.get_all("Set-Cookie").unwrap().len(), 2);
        assert_eq!(map.get("Set-Cookie").unwrap(), "a=1");
        assert_eq!(map.get_last("Set-Cookie").unwrap(), "b=2");

        map.set("Set-Cookie", "c=3");
        assert_eq!(map.get_all("Set-Cookie").unwrap(), &vec!["c=3".to_string()]);
    }
}

use crate::utils::time::{self, LocalTime};

type Kvs = smallvec::SmallVec<[(String, String); 8]>;

/// A log record detached from the `log` macros' borrowed arguments.
pub struct Item {
    pub time: LocalTime,
    pub level: log::Level,
    pub target: String,
    pub msg: String,
    pub kvs: Kvs,
}

impl<'kvs> log::kv::VisitSource<'kvs> for Item {
    fn visit_pair(&mut self, key: log::kv::Key<'kvs>, value: log::kv::Value<'kvs>) -> Result<(), log::kv::Error> {
        self.kvs.push((
            key.as_str().to_string(),
            serde_json::to_string(&value).unwrap_or_default(),
        ));
        Ok(())
    }
}

impl From<&log::Record<'_>> for Item {
    fn from(value: &log::Record) -> Self {
        let mut item = Item {
            time: time::now(),
            level: value.level(),
            target: value.target().to_string(),
            msg: format!("{}", value.args()),
            kvs: smallvec::smallvec![],
        };
        _ = value.key_values().visit(&mut item);
        item
    }
}

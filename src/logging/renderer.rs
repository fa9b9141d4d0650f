use crate::utils::time::DEFAULT_TIME_LAYOUT;

use super::color::{Color, ColorScheme};
use super::item::Item;

pub trait Renderer: Send + Sync {
    fn render(&self, item: &Item, buf: &mut Vec<u8>);
}

fn with_color(buf: &mut Vec<u8>, txt: &str, color: &Option<Color>) {
    match color.as_ref() {
        Some(color) => {
            buf.push(b'\x1b');
            buf.extend(format!("[38;2;{};{};{}m", color.0, color.1, color.2).as_bytes());
            buf.extend(txt.as_bytes());
            buf.push(b'\x1b');
            buf.extend("[0m".as_bytes());
        }
        None => {
            buf.extend(txt.as_bytes());
        }
    }
}

/// `[LEVEL] time (target) message { key: value , ... }`, one record per line.
#[derive(Default)]
pub struct ColorfulLineRenderer {
    scheme: ColorScheme,
    timelayout: String,
}

impl ColorfulLineRenderer {
    pub fn new(scheme: ColorScheme) -> Self {
        Self {
            scheme,
            timelayout: String::new(),
        }
    }

    pub fn with_timelayout(mut self, layout: &str) -> Self {
        self.timelayout = layout.to_string();
        self
    }
}

impl Renderer for ColorfulLineRenderer {
    fn render(&self, item: &Item, buf: &mut Vec<u8>) {
        let level = match self.scheme.levels.as_ref() {
            Some(colors) => colors.get(item.level),
            None => None,
        };
        with_color(buf, format!("[{}]", item.level.as_str()).as_str(), &level);
        buf.push(b' ');

        let layout = if self.timelayout.is_empty() {
            DEFAULT_TIME_LAYOUT
        } else {
            self.timelayout.as_str()
        };
        with_color(buf, &item.time.format(layout).to_string(), &self.scheme.time);

        buf.extend(" (".as_bytes());
        with_color(buf, &item.target, &self.scheme.target);
        buf.extend(") ".as_bytes());

        with_color(buf, &item.msg, &level);

        if item.kvs.is_empty() {
            buf.push(b'\n');
            return;
        }

        buf.extend(" { ".as_bytes());
        let last = item.kvs.len() - 1;
        for (idx, pair) in item.kvs.iter().enumerate() {
            with_color(buf, pair.0.as_str(), &self.scheme.key);
            buf.extend(": ".as_bytes());
            with_color(buf, pair.1.as_str(), &self.scheme.value);
            if idx != last {
                buf.extend(" , ".as_bytes());
            }
        }
        buf.extend(" }\n".as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::super::color::ColorScheme;
    use super::super::item::Item;
    use super::{ColorfulLineRenderer, Renderer};

    fn item() -> Item {
        Item {
            time: chrono::Local.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
            level: log::Level::Warn,
            target: "httpipe::accept".to_string(),
            msg: "bad q".to_string(),
            kvs: smallvec::smallvec![],
        }
    }

    #[test]
    fn plain_line() {
        let renderer = ColorfulLineRenderer::new(ColorScheme::plain()).with_timelayout("%H:%M");
        let mut buf = vec![];
        renderer.render(&item(), &mut buf);
        assert_eq!(String::from_utf8(buf).unwrap(), "[WARN] 08:00 (httpipe::accept) bad q\n");

        let mut with_kvs = item();
        with_kvs.kvs.push(("entry".to_string(), "\"gzip;q=x\"".to_string()));
        with_kvs.kvs.push(("n".to_string(), "1".to_string()));
        let mut buf = vec![];
        renderer.render(&with_kvs, &mut buf);
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "[WARN] 08:00 (httpipe::accept) bad q { entry: \"gzip;q=x\" , n: 1 }\n"
        );
    }

    #[test]
    fn colored_line() {
        let renderer = ColorfulLineRenderer::default();
        let mut buf = vec![];
        renderer.render(&item(), &mut buf);
        let txt = String::from_utf8(buf).unwrap();
        assert!(txt.starts_with("\x1b[38;2;252;211;55m[WARN]\x1b[0m "));
        assert!(txt.ends_with("\n"));
    }
}

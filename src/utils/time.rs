pub type LocalTime = chrono::DateTime<chrono::Local>;
pub type UtcTime = chrono::DateTime<chrono::Utc>;

pub static DEFAULT_TIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.3f";
pub static HTTP_HEADER_TIME_LAYOUT: &str = "%a, %d %b %Y %H:%M:%S GMT";
pub static COMMON_LOG_TIME_LAYOUT: &str = "%d/%b/%Y %H:%M:%S";

#[inline]
pub fn now() -> LocalTime {
    chrono::Local::now()
}

/// Formats `t` the way `Expires`/`Date` header values are written.
#[inline]
pub fn http_date(t: &UtcTime) -> String {
    t.format(HTTP_HEADER_TIME_LAYOUT).to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::http_date;

    #[test]
    fn header_layout() {
        let t = chrono::Utc.with_ymd_and_hms(2000, 10, 10, 13, 55, 36).unwrap();
        assert_eq!(http_date(&t), "Tue, 10 Oct 2000 13:55:36 GMT");
    }
}

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::cookie::{stringify_cookie, CookieOptions};
use crate::error::{Error, Result};
use crate::headers::{Headers, SET_COOKIE};
use crate::message::{Content, Message};
use crate::utils::mime_type_for_path;

static STATUS_REASONS: Lazy<HashMap<u16, &'static str>> = Lazy::new(|| {
    let all: &[&str] = &[
        "100 Continue",
        "101 Switching Protocols",
        "103 Early Hints",
        "200 OK",
        "201 Created",
        "202 Accepted",
        "203 Non-Authoritative Information",
        "204 No Content",
        "205 Reset Content",
        "206 Partial Content",
        "300 Multiple Choices",
        "301 Moved Permanently",
        "302 Found",
        "303 See Other",
        "304 Not Modified",
        "307 Temporary Redirect",
        "308 Permanent Redirect",
        "400 Bad Request",
        "401 Unauthorized",
        "402 Payment Required",
        "403 Forbidden",
        "404 Not Found",
        "405 Method Not Allowed",
        "406 Not Acceptable",
        "407 Proxy Authentication Required",
        "408 Request Timeout",
        "409 Conflict",
        "410 Gone",
        "411 Length Required",
        "412 Precondition Failed",
        "413 Payload Too Large",
        "414 URI Too Long",
        "415 Unsupported Media Type",
        "416 Range Not Satisfiable",
        "417 Expectation Failed",
        "418 I'm a teapot",
        "422 Unprocessable Entity",
        "425 Too Early",
        "426 Upgrade Required",
        "428 Precondition Required",
        "429 Too Many Requests",
        "431 Request Header Fields Too Large",
        "451 Unavailable For Legal Reasons",
        "500 Internal Server Error",
        "501 Not Implemented",
        "502 Bad Gateway",
        "503 Service Unavailable",
        "504 Gateway Timeout",
        "505 HTTP Version Not Supported",
        "506 Variant Also Negotiates",
        "507 Insufficient Storage",
        "508 Loop Detected",
        "510 Not Extended",
        "511 Network Authentication Required",
    ];

    let mut map = HashMap::new();
    for &item in all.iter() {
        if let Some((code, reason)) = item.split_once(' ') {
            if let Ok(code) = code.parse::<u16>() {
                map.insert(code, reason);
            }
        }
    }
    map
});

pub fn status_reason(code: u16) -> &'static str {
    STATUS_REASONS.get(&code).copied().unwrap_or("Undefined")
}

/// Where `Response::send_file` takes its body from.
#[derive(Debug, Default)]
pub struct FileOptions {
    pub path: Option<PathBuf>,
    pub content: Option<Content>,
    pub content_type: Option<String>,
    pub length: Option<u64>,
}

impl From<&str> for FileOptions {
    fn from(path: &str) -> Self {
        Self {
            path: Some(PathBuf::from(path)),
            ..Default::default()
        }
    }
}

impl From<&Path> for FileOptions {
    fn from(path: &Path) -> Self {
        Self {
            path: Some(path.to_path_buf()),
            ..Default::default()
        }
    }
}

impl From<PathBuf> for FileOptions {
    fn from(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            ..Default::default()
        }
    }
}

/// The outbound result. Every handler of a chain mutates the same instance.
///
/// The `send*` helpers take an optional leading status, so both
/// `send(404, "Not Found")` and `send(None, "hello")` read naturally.
#[derive(Debug)]
pub struct Response {
    pub(crate) msg: Message,
    status: u16,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Response {
    type Target = Message;

    fn deref(&self) -> &Self::Target {
        &self.msg
    }
}

impl DerefMut for Response {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.msg
    }
}

impl Response {
    pub fn new() -> Self {
        Self {
            msg: Message::default(),
            status: 200,
        }
    }

    pub fn with_parts<C: Into<Content>>(status: u16, headers: Headers, content: C) -> Self {
        Self {
            msg: Message::new(content.into(), headers),
            status,
        }
    }

    #[inline(always)]
    pub fn status(&self) -> u16 {
        self.status
    }

    #[inline(always)]
    pub fn set_status(&mut self, code: u16) -> &mut Self {
        self.status = code;
        self
    }

    pub fn reason(&self) -> &'static str {
        status_reason(self.status)
    }

    fn apply_status(&mut self, status: Option<u16>) {
        if let Some(code) = status {
            self.status = code;
        }
    }

    /// Adds a `Set-Cookie` header; earlier cookies are kept.
    pub fn set_cookie<O: Into<CookieOptions>>(&mut self, name: &str, options: O) {
        let cookie = stringify_cookie(name, &options.into());
        self.msg.add_header(SET_COOKIE, cookie.as_str());
    }

    /// Redirects to `location`, with `302 Found` unless a status is given.
    pub fn redirect<S: Into<Option<u16>>>(&mut self, status: S, location: &str) {
        self.status = status.into().unwrap_or(302);
        self.msg.set_header("Location", location);
    }

    pub fn send<S: Into<Option<u16>>, C: Into<Content>>(&mut self, status: S, content: C) {
        self.apply_status(status.into());
        self.msg.set_content(content);
    }

    pub fn send_text<S: Into<Option<u16>>, C: Into<Content>>(&mut self, status: S, text: C) {
        self.msg.set_content_type("text/plain");
        self.send(status, text);
    }

    pub fn send_html<S: Into<Option<u16>>, C: Into<Content>>(&mut self, status: S, html: C) {
        self.msg.set_content_type("text/html");
        self.send(status, html);
    }

    pub fn send_json<S: Into<Option<u16>>, T: Serialize + ?Sized>(&mut self, status: S, json: &T) -> Result<()> {
        let body = serde_json::to_vec(json)?;
        self.msg.set_content_type("application/json");
        self.send(status, body);
        Ok(())
    }

    /// Sends a file, or inline content standing in for one. The length and
    /// type come from the file unless given explicitly.
    pub async fn send_file<S: Into<Option<u16>>, O: Into<FileOptions>>(&mut self, status: S, options: O) -> Result<()> {
        self.apply_status(status.into());
        let options = options.into();

        match (options.content, options.path.as_ref()) {
            (Some(content), _) => {
                self.msg.set_content(content);
            }
            (None, Some(path)) => {
                let meta = tokio::fs::metadata(path).await?;
                let file = tokio::fs::File::open(path).await?;
                self.msg.set_content_length(meta.len());
                self.msg.set_content(Content::stream(file));
            }
            (None, None) => return Err(Error::MissingContent),
        }

        match (options.content_type, options.path.as_ref()) {
            (Some(content_type), _) => self.msg.set_content_type(&content_type),
            (None, Some(path)) => self.msg.set_content_type(mime_type_for_path(path)),
            (None, None) => {}
        }

        if let Some(len) = options.length {
            self.msg.set_content_length(len);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::error::Error;
    use crate::message::Content;

    use super::{status_reason, FileOptions, Response};

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f)
    }

    #[test]
    fn reasons() {
        assert_eq!(status_reason(404), "Not Found");
        assert_eq!(status_reason(299), "Undefined");
        assert_eq!(Response::new().reason(), "OK");
    }

    #[test]
    fn cookies_are_additive() {
        let mut res = Response::new();
        res.set_cookie("a", "1");
        res.set_cookie("b", "2");
        assert_eq!(
            res.headers().get_all("Set-Cookie").unwrap(),
            &vec!["a=1".to_string(), "b=2".to_string()]
        );
    }

    #[test]
    fn redirect_defaults_to_found() {
        let mut res = Response::new();
        res.redirect(None, "/login");
        assert_eq!(res.status(), 302);
        assert_eq!(res.header("Location"), Some("/login"));

        res.redirect(301, "/moved");
        assert_eq!(res.status(), 301);
        assert_eq!(res.header("Location"), Some("/moved"));
    }

    #[test]
    fn send_shorthands() {
        let mut res = Response::new();
        res.send_text(404, "Not Found");
        assert_eq!(res.status(), 404);
        assert_eq!(res.content_type(), Some("text/plain"));
        assert_eq!(res.content().as_bytes(), Some(&b"Not Found"[..]));

        let mut res = Response::new();
        res.send_html(None, "<p>hi</p>");
        assert_eq!(res.status(), 200);
        assert_eq!(res.content_type(), Some("text/html"));

        let mut res = Response::new();
        res.send_json(201, &serde_json::json!({"ok": true})).unwrap();
        assert_eq!(res.status(), 201);
        assert_eq!(res.content_type(), Some("application/json"));
        assert_eq!(res.content().as_bytes(), Some(&b"{\"ok\":true}"[..]));
    }

    #[test]
    fn send_file_needs_content_or_path() {
        let mut res = Response::new();
        let err = block_on(res.send_file(None, FileOptions::default())).unwrap_err();
        assert!(matches!(err, Error::MissingContent));
    }

    #[test]
    fn send_file_inline_content() {
        let mut res = Response::new();
        let options = FileOptions {
            content: Some(Content::from("body")),
            content_type: Some("text/x-custom".to_string()),
            length: Some(4),
            ..Default::default()
        };
        block_on(res.send_file(203, options)).unwrap();
        assert_eq!(res.status(), 203);
        assert_eq!(res.content_type(), Some("text/x-custom"));
        assert_eq!(res.content_length(), Some(4));
    }

    #[test]
    fn send_file_from_disk() {
        let path = std::env::temp_dir().join(format!("httpipe-send-file-{}.html", std::process::id()));
        std::fs::File::create(&path).unwrap().write_all(b"<h1>hello</h1>").unwrap();

        let mut res = Response::new();
        block_on(async {
            res.send_file(None, path.as_path()).await.unwrap();
            assert_eq!(res.content_length(), Some(14));
            assert_eq!(res.content_type(), Some("text/html"));
            assert!(res.content().is_stream());
            assert_eq!(res.string_content().await.unwrap(), "<h1>hello</h1>");
        });
        std::fs::remove_file(&path).unwrap();

        let mut res = Response::new();
        assert!(matches!(
            block_on(res.send_file(None, "/definitely/not/here.txt")),
            Err(Error::Io(_))
        ));
    }
}

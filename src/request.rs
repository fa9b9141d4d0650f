use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;

use once_cell::sync::Lazy;
use once_cell::unsync::OnceCell;
use regex::Regex;

use crate::accept::AcceptEncoding;
use crate::cookie::parse_cookie;
use crate::error::{Error, Result};
use crate::headers::{canonical_name, Headers, CONTENT_TYPE};
use crate::message::{Content, Message};
use crate::response::Response;
use crate::sink::{self, CloseHandler, ErrorHandler};
use crate::utils::time::{self, LocalTime};
use crate::utils::MultiValuesMap;

pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

static PORT_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r":\d+$").unwrap());

fn default_port_for_protocol(protocol: &str) -> &'static str {
    match protocol {
        "https:" => "443",
        _ => "80",
    }
}

/// Whether the authority of `url` carries a `:port`, userinfo aside.
fn has_explicit_port(url: &str) -> bool {
    let rest = match url.find("://") {
        Some(i) => &url[i + 3..],
        None => return false,
    };
    let authority = match rest.find(|c| matches!(c, '/' | '?' | '#')) {
        Some(i) => &rest[..i],
        None => rest,
    };
    let authority = match authority.rfind('@') {
        Some(i) => &authority[i + 1..],
        None => authority,
    };
    PORT_SUFFIX.is_match(authority)
}

fn is_body_method(method: &str) -> bool {
    matches!(method, "POST" | "PUT" | "PATCH")
}

fn normalize_protocol(protocol: &str) -> String {
    let mut protocol = protocol.trim().to_ascii_lowercase();
    if !protocol.ends_with(':') {
        protocol.push(':');
    }
    protocol
}

pub fn stringify_query<K: AsRef<str>, V: AsRef<str>>(params: &[(K, V)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter().map(|(k, v)| (k.as_ref(), v.as_ref())))
        .finish()
}

pub fn parse_query(txt: &str) -> MultiValuesMap {
    let mut map = MultiValuesMap::new(true);
    for (k, v) in url::form_urlencoded::parse(txt.trim_start_matches('?').as_bytes()) {
        map.append(k.as_ref(), v.as_ref());
    }
    map
}

/// Everything a transport (or a test) knows about an inbound call.
#[derive(Default)]
pub struct RequestOptions {
    pub headers: Headers,
    pub content: Content,
    pub on_error: Option<ErrorHandler>,
    pub on_close: Option<CloseHandler>,
    pub protocol: Option<String>,
    pub protocol_version: Option<String>,
    pub method: Option<String>,
    pub remote_host: Option<String>,
    pub remote_port: Option<String>,
    pub server_name: Option<String>,
    pub server_port: Option<String>,
    pub query_string: Option<String>,
    pub script_name: Option<String>,
    pub path_info: Option<String>,
    /// Used when `path_info` is not given.
    pub path: Option<String>,
    /// Encoded into the query string, or into a form body for POST/PUT/PATCH.
    pub params: Option<Vec<(String, String)>>,
}

macro_rules! make_option_setter {
    ($name:ident) => {
        pub fn $name<S: Into<String>>(mut self, v: S) -> Self {
            self.$name = Some(v.into());
            self
        }
    };
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options pointing at `url`: scheme, host, port, path and query.
    pub fn from_url(url: &str) -> Result<Self> {
        let parsed = match url::Url::parse(url) {
            Ok(v) => v,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = url::Url::parse("http://localhost/").map_err(|_| Error::InvalidUrl(url.to_string()))?;
                let parsed = base.join(url).map_err(|_| Error::InvalidUrl(url.to_string()))?;
                return Ok(Self::new()
                    .path_info(parsed.path())
                    .query_string(parsed.query().unwrap_or("")));
            }
            Err(_) => return Err(Error::InvalidUrl(url.to_string())),
        };

        let protocol = normalize_protocol(parsed.scheme());
        // `Url::port` hides a port equal to the scheme's default, even when
        // it was written out.
        let port = match (parsed.port(), has_explicit_port(url)) {
            (Some(port), _) => port.to_string(),
            (None, true) => match parsed.port_or_known_default() {
                Some(port) => port.to_string(),
                None => default_port_for_protocol(&protocol).to_string(),
            },
            (None, false) => default_port_for_protocol(&protocol).to_string(),
        };

        Ok(Self::new()
            .server_name(parsed.host_str().unwrap_or(""))
            .server_port(port)
            .protocol(protocol)
            .path_info(parsed.path())
            .query_string(parsed.query().unwrap_or("")))
    }

    make_option_setter!(protocol);
    make_option_setter!(protocol_version);
    make_option_setter!(method);
    make_option_setter!(remote_host);
    make_option_setter!(remote_port);
    make_option_setter!(server_name);
    make_option_setter!(server_port);
    make_option_setter!(query_string);
    make_option_setter!(script_name);
    make_option_setter!(path_info);
    make_option_setter!(path);

    /// Appends a header, normalizing the name to `Content-Type` style.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.append(canonical_name(name).as_str(), value);
        self
    }

    pub fn param(mut self, name: &str, value: &str) -> Self {
        self.params
            .get_or_insert_with(Vec::new)
            .push((name.to_string(), value.to_string()));
        self
    }

    pub fn content<C: Into<Content>>(mut self, content: C) -> Self {
        self.content = content.into();
        self
    }

    pub fn on_error<F: Fn(&str) + Send + Sync + 'static>(mut self, f: F) -> Self {
        self.on_error = Some(Arc::new(f));
        self
    }

    pub fn on_close<F: Fn() + Send + Sync + 'static>(mut self, f: F) -> Self {
        self.on_close = Some(Arc::new(f));
        self
    }
}

/// One inbound call. Identity fields are fixed at construction; the
/// associated `Response` is created on first use and shared by every handler
/// of the chain.
pub struct Request {
    msg: Message,

    on_error: ErrorHandler,
    on_close: CloseHandler,

    protocol: String,
    protocol_version: String,
    method: String,
    remote_host: String,
    remote_port: String,
    server_name: String,
    server_port: String,
    query_string: String,
    script_name: String,
    path_info: String,
    date: LocalTime,

    pub remote_user: Option<String>,

    _cookies: OnceCell<HashMap<String, String>>,
    _query: OnceCell<MultiValuesMap>,
    _protocol: OnceCell<String>,
    _host: OnceCell<String>,
    _port: OnceCell<String>,

    pub(crate) _response: Option<Response>,
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("protocol", &self.protocol)
            .field("server_name", &self.server_name)
            .field("server_port", &self.server_port)
            .field("script_name", &self.script_name)
            .field("path_info", &self.path_info)
            .field("query_string", &self.query_string)
            .field("headers", &self.msg.headers)
            .finish()
    }
}

impl Deref for Request {
    type Target = Message;

    fn deref(&self) -> &Self::Target {
        &self.msg
    }
}

impl Request {
    pub fn new(options: RequestOptions) -> Result<Self> {
        let on_error = match options.on_error {
            Some(f) => f,
            None => sink::default_error_handler().ok_or(Error::MissingErrorHandler)?,
        };
        let on_close = options.on_close.unwrap_or_else(sink::default_close_handler);

        let protocol = normalize_protocol(options.protocol.as_deref().unwrap_or("http:"));
        let server_port = match options.server_port {
            Some(port) if !port.is_empty() => port,
            _ => default_port_for_protocol(&protocol).to_string(),
        };
        let script_name = options.script_name.unwrap_or_default();
        let mut path_info = options.path_info.or(options.path).unwrap_or_default();

        // Sub-mounted apps split the path between script_name and path_info;
        // only the root app gets a bare "/".
        if script_name.is_empty() && path_info.is_empty() {
            path_info = "/".to_string();
        }

        Ok(Self {
            msg: Message::new(options.content, options.headers),
            on_error,
            on_close,
            protocol,
            protocol_version: options.protocol_version.unwrap_or_else(|| "1.0".to_string()),
            method: options.method.unwrap_or_else(|| "GET".to_string()).to_ascii_uppercase(),
            remote_host: options.remote_host.unwrap_or_default(),
            remote_port: options.remote_port.filter(|v| !v.is_empty()).unwrap_or_else(|| "0".to_string()),
            server_name: options.server_name.unwrap_or_default(),
            server_port,
            query_string: options.query_string.unwrap_or_default(),
            script_name,
            path_info,
            date: time::now(),
            remote_user: None,
            _cookies: OnceCell::new(),
            _query: OnceCell::new(),
            _protocol: OnceCell::new(),
            _host: OnceCell::new(),
            _port: OnceCell::new(),
            _response: None,
        })
    }

    /// Like `new`, but `params` are first encoded into the query string, or
    /// into a form body for POST, PUT and PATCH.
    pub fn create(mut options: RequestOptions) -> Result<Self> {
        if let Some(params) = options.params.take() {
            let query = stringify_query(&params);
            let method = options.method.as_deref().unwrap_or("GET").to_ascii_uppercase();

            if is_body_method(&method) {
                options.headers.set(CONTENT_TYPE, FORM_URLENCODED);
                options.content = Content::from(query);
            } else {
                options.query_string = Some(query);
                options.content = Content::Empty;
            }
        }
        Self::new(options)
    }

    pub fn from_url(url: &str) -> Result<Self> {
        Self::new(RequestOptions::from_url(url)?)
    }

    #[inline(always)]
    pub fn method(&self) -> &str {
        self.method.as_str()
    }

    pub(crate) fn set_method(&mut self, method: &str) {
        self.method = method.to_ascii_uppercase();
    }

    #[inline(always)]
    pub fn protocol_version(&self) -> &str {
        self.protocol_version.as_str()
    }

    #[inline(always)]
    pub fn remote_host(&self) -> &str {
        self.remote_host.as_str()
    }

    #[inline(always)]
    pub fn remote_port(&self) -> &str {
        self.remote_port.as_str()
    }

    #[inline(always)]
    pub fn server_name(&self) -> &str {
        self.server_name.as_str()
    }

    #[inline(always)]
    pub fn server_port(&self) -> &str {
        self.server_port.as_str()
    }

    #[inline(always)]
    pub fn query_string(&self) -> &str {
        self.query_string.as_str()
    }

    #[inline(always)]
    pub fn script_name(&self) -> &str {
        self.script_name.as_str()
    }

    #[inline(always)]
    pub fn path_info(&self) -> &str {
        self.path_info.as_str()
    }

    /// When the request was created.
    pub fn date(&self) -> &LocalTime {
        &self.date
    }

    pub fn auth(&self) -> Option<&str> {
        self.msg.headers.get("Authorization")
    }

    /// Passes `msg` to the request's error callback.
    pub fn error(&self, msg: &str) {
        (self.on_error)(msg);
    }

    /// Tells the request its client went away. Handlers already running are
    /// not interrupted.
    pub fn close(&self) {
        (self.on_close)();
    }

    pub fn error_handler(&self) -> ErrorHandler {
        self.on_error.clone()
    }

    pub fn set_on_error<F: Fn(&str) + Send + Sync + 'static>(&mut self, f: F) {
        self.on_error = Arc::new(f);
    }

    pub fn set_on_close<F: Fn() + Send + Sync + 'static>(&mut self, f: F) {
        self.on_close = Arc::new(f);
    }

    /// Cookies of the `Cookie` header; the first value of a name wins.
    pub fn cookies(&self) -> &HashMap<String, String> {
        self._cookies.get_or_init(|| match self.msg.headers.get_nonempty("Cookie") {
            Some(header) => parse_cookie(header),
            None => HashMap::new(),
        })
    }

    pub fn query(&self) -> &MultiValuesMap {
        self._query.get_or_init(|| parse_query(&self.query_string))
    }

    /// `https:` or `http:`, honouring `X-Forwarded-Ssl` and the first value
    /// of `X-Forwarded-Proto`.
    pub fn protocol(&self) -> &str {
        self._protocol.get_or_init(|| {
            let headers = &self.msg.headers;
            if headers.get("X-Forwarded-Ssl") == Some("on") {
                return "https:".to_string();
            }

            if let Some(proto) = headers.get_nonempty("X-Forwarded-Proto") {
                let first = proto.split(',').next().unwrap_or("").trim();
                if !first.is_empty() {
                    return normalize_protocol(first);
                }
            }

            self.protocol.clone()
        })
    }

    pub fn is_ssl(&self) -> bool {
        self.protocol() == "https:"
    }

    /// `hostname[:port]` as the client addressed it. The last value of
    /// `X-Forwarded-Host` wins over `Host`.
    pub fn host(&self) -> &str {
        self._host.get_or_init(|| {
            let headers = &self.msg.headers;
            if let Some(forwarded) = headers.get_nonempty("X-Forwarded-Host") {
                if let Some(last) = forwarded.split(',').map(|v| v.trim()).last() {
                    return last.to_string();
                }
            }

            if let Some(host) = headers.get_nonempty("Host") {
                return host.to_string();
            }

            if !self.server_port.is_empty() {
                return format!("{}:{}", self.server_name, self.server_port);
            }
            self.server_name.clone()
        })
    }

    pub fn hostname(&self) -> &str {
        let host = self.host();
        match PORT_SUFFIX.find(host) {
            Some(m) => &host[..m.start()],
            None => host,
        }
    }

    pub fn port(&self) -> &str {
        self._port.get_or_init(|| {
            let host = self.host();
            if let Some(m) = PORT_SUFFIX.find(host) {
                return host[m.start() + 1..].to_string();
            }

            let headers = &self.msg.headers;
            if let Some(port) = headers.get_nonempty("X-Forwarded-Port") {
                return port.to_string();
            }

            if self.is_ssl() {
                return "443".to_string();
            }

            if headers.get_nonempty("X-Forwarded-Host").is_some() {
                return "80".to_string();
            }

            self.server_port.clone()
        })
    }

    /// The path without the query string.
    pub fn pathname(&self) -> String {
        format!("{}{}", self.script_name, self.path_info)
    }

    /// The query string with its leading `?`, or an empty string.
    pub fn search(&self) -> String {
        if self.query_string.is_empty() {
            return String::new();
        }
        format!("?{}", self.query_string)
    }

    pub fn path(&self) -> String {
        self.pathname() + self.search().as_str()
    }

    pub fn url(&self) -> String {
        format!("{}//{}{}", self.protocol(), self.host(), self.path())
    }

    pub fn accept_encoding(&self) -> AcceptEncoding {
        AcceptEncoding::new(self.msg.headers.get("Accept-Encoding"))
    }

    pub fn accepts_encoding(&self, encoding: &str) -> bool {
        self.accept_encoding().accepts(encoding)
    }

    pub async fn buffer_content(&mut self) -> std::io::Result<&[u8]> {
        self.msg.buffer_content().await
    }

    pub async fn string_content(&mut self) -> std::io::Result<String> {
        self.msg.string_content().await
    }

    pub fn take_content(&mut self) -> Content {
        self.msg.take_content()
    }

    /// The associated response, created on first use.
    pub fn response_mut(&mut self) -> &mut Response {
        self._response.get_or_insert_with(Response::new)
    }

    pub fn response(&self) -> Option<&Response> {
        self._response.as_ref()
    }

    /// Hands the associated response over, leaving none behind.
    pub fn take_response(&mut self) -> Response {
        self._response.take().unwrap_or_default()
    }
}

use std::fmt::Formatter;
use std::pin::Pin;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::accept::{parse_media_value, MediaValue};
use crate::headers::{Headers, CONTENT_LENGTH, CONTENT_TYPE};

pub type ContentStream = Pin<Box<dyn AsyncRead + Send>>;

/// The body of a message. A stream can be read once; `Message::buffer_content`
/// swaps it for its bytes.
#[derive(Default)]
pub enum Content {
    #[default]
    Empty,
    Bytes(Vec<u8>),
    Stream(ContentStream),
}

impl Content {
    pub fn stream<R: AsyncRead + Send + 'static>(reader: R) -> Self {
        Content::Stream(Box::pin(reader))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Content::Empty => true,
            Content::Bytes(v) => v.is_empty(),
            Content::Stream(_) => false,
        }
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, Content::Stream(_))
    }

    /// The bytes of already buffered content.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Content::Empty => Some(&[]),
            Content::Bytes(v) => Some(v.as_slice()),
            Content::Stream(_) => None,
        }
    }
}

impl std::fmt::Debug for Content {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Content::Empty => write!(f, "Content::Empty"),
            Content::Bytes(v) => write!(f, "Content::Bytes{{ len:{} }}", v.len()),
            Content::Stream(_) => write!(f, "Content::Stream"),
        }
    }
}

impl From<&str> for Content {
    fn from(v: &str) -> Self {
        Content::Bytes(v.as_bytes().to_vec())
    }
}

impl From<String> for Content {
    fn from(v: String) -> Self {
        Content::Bytes(v.into_bytes())
    }
}

impl From<&[u8]> for Content {
    fn from(v: &[u8]) -> Self {
        Content::Bytes(v.to_vec())
    }
}

impl From<Vec<u8>> for Content {
    fn from(v: Vec<u8>) -> Self {
        Content::Bytes(v)
    }
}

impl From<ContentStream> for Content {
    fn from(v: ContentStream) -> Self {
        Content::Stream(v)
    }
}

/// Headers plus content, shared by `Request` and `Response`.
#[derive(Debug, Default)]
pub struct Message {
    pub(crate) headers: Headers,
    pub(crate) content: Content,
}

impl Message {
    pub fn new(content: Content, headers: Headers) -> Self {
        Self { headers, content }
    }

    #[inline(always)]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    #[inline(always)]
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    pub fn set_headers(&mut self, headers: Headers) {
        self.headers = headers;
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.set(name, value);
    }

    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.append(name, value);
    }

    #[inline(always)]
    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn set_content<C: Into<Content>>(&mut self, content: C) {
        self.content = content.into();
    }

    pub fn take_content(&mut self) -> Content {
        std::mem::take(&mut self.content)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE)
    }

    pub fn set_content_type(&mut self, value: &str) {
        self.headers.set(CONTENT_TYPE, value);
    }

    /// The parsed `Content-Type`, e.g. `text/html` with its params.
    pub fn media_type(&self) -> Option<MediaValue> {
        self.content_type().map(parse_media_value)
    }

    pub fn charset(&self) -> Option<String> {
        self.media_type()
            .and_then(|v| v.param("charset").map(|v| v.to_string()))
    }

    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.trim().parse::<u64>().ok())
    }

    pub fn set_content_length(&mut self, len: u64) {
        self.headers.set(CONTENT_LENGTH, len.to_string().as_str());
    }

    /// Reads a streaming body to the end and keeps the bytes in its place.
    /// Calling it again returns the same bytes.
    pub async fn buffer_content(&mut self) -> std::io::Result<&[u8]> {
        if self.content.is_stream() {
            let mut buf = match self.content_length() {
                Some(len) => Vec::with_capacity(len.min(1 << 20) as usize),
                None => Vec::new(),
            };
            if let Content::Stream(stream) = &mut self.content {
                stream.read_to_end(&mut buf).await?;
            }
            self.content = Content::Bytes(buf);
        }

        match &self.content {
            Content::Bytes(v) => Ok(v.as_slice()),
            _ => Ok(&[]),
        }
    }

    /// The buffered content decoded as UTF-8, invalid sequences replaced.
    pub async fn string_content(&mut self) -> std::io::Result<String> {
        let bytes = self.buffer_content().await?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::BoxError;
use crate::headers::Headers;
use crate::message::{Content, ContentStream};
use crate::request::Request;
use crate::response::Response;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub type HandlerResult = Result<Reply, BoxError>;

/// A unit of request processing. The request's associated response is
/// reached through `Request::response_mut`; middleware passes the request on
/// with `req.call(&inner)`.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, req: &mut Request) -> HandlerResult;
}

#[async_trait]
impl<H: Handler + ?Sized> Handler for Arc<H> {
    async fn handle(&self, req: &mut Request) -> HandlerResult {
        (**self).handle(req).await
    }
}

#[async_trait]
impl<H: Handler + ?Sized> Handler for Box<H> {
    async fn handle(&self, req: &mut Request) -> HandlerResult {
        (**self).handle(req).await
    }
}

type FnType = Box<dyn for<'a> Fn(&'a mut Request) -> BoxFuture<'a, HandlerResult> + Send + Sync>;

pub struct FuncHandler(FnType);

impl FuncHandler {
    pub fn new(f: FnType) -> Self {
        Self(f)
    }
}

#[async_trait]
impl Handler for FuncHandler {
    async fn handle(&self, req: &mut Request) -> HandlerResult {
        (self.0)(req).await
    }
}

/// Wraps a closure returning a boxed future as a `Handler`.
///
/// ```ignore
/// let app = func(|req| Box::pin(async move { Ok(req.method().to_string().into()) }));
/// ```
pub fn func<F>(f: F) -> FuncHandler
where
    F: for<'a> Fn(&'a mut Request) -> BoxFuture<'a, HandlerResult> + Send + Sync + 'static,
{
    FuncHandler::new(Box::new(f))
}

#[macro_export]
macro_rules! func {
    ($req:ident, $content:expr) => {
        $crate::handler::func(move |$req| Box::pin(async move { $content }))
    };
    ($content:expr) => {
        $crate::handler::func(move |_| Box::pin(async move { $content }))
    };
}

/// Status, headers and content to merge into the current response. Fields
/// left `None` are not touched.
#[derive(Debug, Default)]
pub struct Partial {
    pub status: Option<u16>,
    pub headers: Option<Headers>,
    pub content: Option<Content>,
}

impl Partial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.get_or_insert_with(Headers::new).append(name, value);
        self
    }

    pub fn content<C: Into<Content>>(mut self, content: C) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// What a handler settled with.
///
/// The variant is chosen where the value is converted, in this order: no
/// value keeps the current response, a `Response` replaces it, a number is a
/// status, text/bytes/streams are content, anything else is a `Partial`.
#[derive(Debug, Default)]
pub enum Reply {
    #[default]
    Empty,
    Response(Response),
    Status(u16),
    Content(Content),
    Partial(Partial),
}

impl From<()> for Reply {
    fn from(_: ()) -> Self {
        Reply::Empty
    }
}

impl<T: Into<Reply>> From<Option<T>> for Reply {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Reply::Empty,
        }
    }
}

impl From<Response> for Reply {
    fn from(v: Response) -> Self {
        Reply::Response(v)
    }
}

impl From<u16> for Reply {
    fn from(v: u16) -> Self {
        Reply::Status(v)
    }
}

impl From<Content> for Reply {
    fn from(v: Content) -> Self {
        Reply::Content(v)
    }
}

impl From<&str> for Reply {
    fn from(v: &str) -> Self {
        Reply::Content(v.into())
    }
}

impl From<String> for Reply {
    fn from(v: String) -> Self {
        Reply::Content(v.into())
    }
}

impl From<Vec<u8>> for Reply {
    fn from(v: Vec<u8>) -> Self {
        Reply::Content(v.into())
    }
}

impl From<&[u8]> for Reply {
    fn from(v: &[u8]) -> Self {
        Reply::Content(v.into())
    }
}

impl From<ContentStream> for Reply {
    fn from(v: ContentStream) -> Self {
        Reply::Content(v.into())
    }
}

impl From<Partial> for Reply {
    fn from(v: Partial) -> Self {
        Reply::Partial(v)
    }
}

pub mod accept;
pub mod config;
pub mod cookie;
mod dispatch;
pub mod error;
pub mod handler;
pub mod headers;
pub mod logging;
pub mod message;
pub mod middleware;
pub mod request;
pub mod response;
pub mod sink;
pub mod utils;

pub use accept::AcceptEncoding;
pub use dispatch::call;
pub use error::{Error, HTTPError, Result, StatusCodeError};
pub use handler::{func, FuncHandler, Handler, HandlerResult, Partial, Reply};
pub use headers::Headers;
pub use message::{Content, Message};
pub use middleware::respond;
pub use request::{Request, RequestOptions};
pub use response::{status_reason, FileOptions, Response};
pub use sink::DefaultSink;

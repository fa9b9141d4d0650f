use std::any::Any;
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};

pub type BoxError = Box<dyn StdError + Send + Sync>;

pub type Result<T> = std::result::Result<T, Error>;

pub trait HTTPError: StdError {
    fn statuscode(&self) -> u16;
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct StatusCodeError(u16);

impl StatusCodeError {
    pub fn new(code: u16) -> Self {
        Self(code)
    }

    pub fn internal() -> Self {
        Self(500)
    }
}

impl StdError for StatusCodeError {}

impl Display for StatusCodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "StatusCodeError{{{}}}", self.0)
    }
}

impl HTTPError for StatusCodeError {
    fn statuscode(&self) -> u16 {
        self.0
    }
}

#[derive(Debug)]
pub enum Error {
    /// A handler returned `Err`.
    Handler(BoxError),
    /// A handler panicked, either while being invoked or while being polled.
    Panic(String),
    Status(StatusCodeError),
    MissingErrorHandler,
    MissingContent,
    InvalidUrl(String),
    Config(String),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl Error {
    pub fn handler<E: Into<BoxError>>(e: E) -> Self {
        Self::Handler(e.into())
    }

    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        Self::Panic(panic_message(&*payload))
    }
}

/// The message a panic was raised with, when it carries a string.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        return s.to_string();
    }
    match payload.downcast_ref::<String>() {
        Some(s) => s.clone(),
        None => "Box<dyn Any>".to_string(),
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Handler(e) => write!(f, "Error: {}", e),
            Error::Panic(msg) => write!(f, "Error: handler panicked: {}", msg),
            Error::Status(e) => write!(f, "Error: {}", e),
            Error::MissingErrorHandler => f.write_str("Error: Request needs an error handler"),
            Error::MissingContent => f.write_str("Error: Missing file content/path"),
            Error::InvalidUrl(url) => write!(f, "Error: invalid url `{}`", url),
            Error::Config(msg) => write!(f, "Error: bad config, {}", msg),
            Error::Io(e) => write!(f, "Error: {}", e),
            Error::Json(e) => write!(f, "Error: {}", e),
        }
    }
}

// Wrapping variants already print the inner error, so the chain continues
// from the inner error's own cause.
impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Handler(e) => e.source(),
            Error::Status(e) => e.source(),
            Error::Io(e) => e.source(),
            Error::Json(e) => e.source(),
            _ => None,
        }
    }
}

impl HTTPError for Error {
    fn statuscode(&self) -> u16 {
        match self {
            Error::Status(e) => e.statuscode(),
            Error::Handler(e) => match e.downcast_ref::<StatusCodeError>() {
                Some(e) => e.statuscode(),
                None => 500,
            },
            _ => 500,
        }
    }
}

impl From<StatusCodeError> for Error {
    fn from(e: StatusCodeError) -> Self {
        Error::Status(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

/// Renders an error for the request's error callback: the full chain of
/// causes when there is one, else the plain message.
pub fn stringify_error(err: &(dyn StdError + 'static)) -> String {
    let mut txt = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        txt.push_str("\n    caused by: ");
        txt.push_str(cause.to_string().as_str());
        source = cause.source();
    }
    txt
}

#[cfg(test)]
mod tests {
    use std::error::Error as StdError;
    use std::fmt::{Display, Formatter};

    use super::{stringify_error, Error, HTTPError, StatusCodeError};

    #[derive(Debug)]
    struct Upload(std::io::Error);

    impl Display for Upload {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str("upload failed")
        }
    }

    impl StdError for Upload {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn status_of_errors() {
        assert_eq!(Error::from(StatusCodeError::new(404)).statuscode(), 404);
        assert_eq!(Error::handler(StatusCodeError::new(403)).statuscode(), 403);
        assert_eq!(Error::handler("boom!").statuscode(), 500);
        assert_eq!(Error::Panic("boom!".to_string()).statuscode(), 500);
    }

    #[test]
    fn panic_payloads() {
        let e = Error::from_panic(Box::new("static"));
        assert_eq!(e.to_string(), "Error: handler panicked: static");
        let e = Error::from_panic(Box::new(String::from("owned")));
        assert_eq!(e.to_string(), "Error: handler panicked: owned");
        let e = Error::from_panic(Box::new(12));
        assert_eq!(e.to_string(), "Error: handler panicked: Box<dyn Any>");
        assert_eq!(super::panic_message(&"static"), "static");
    }

    #[test]
    fn stringify_walks_causes() {
        let e = Error::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert_eq!(stringify_error(&e), "Error: disk");

        let e = Error::handler(Upload(std::io::Error::new(std::io::ErrorKind::Other, "disk")));
        assert_eq!(stringify_error(&e), "Error: upload failed\n    caused by: disk");

        assert_eq!(stringify_error(&Error::handler("boom!")), "Error: boom!");
        assert_eq!(stringify_error(&Error::MissingContent), "Error: Missing file content/path");
    }
}

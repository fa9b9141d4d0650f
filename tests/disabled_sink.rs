use std::sync::Arc;

use httpipe::sink::{self, DefaultSink};
use httpipe::{Error, Request, RequestOptions};

// Runs in its own process: the default sink can be configured only once.
#[tokio::test]
async fn requests_need_their_own_error_handler() {
    assert!(sink::configure(DefaultSink::Disabled));
    assert!(!sink::configure(DefaultSink::Stderr));

    let err = Request::new(RequestOptions::new()).unwrap_err();
    assert!(matches!(err, Error::MissingErrorHandler));
    assert_eq!(err.to_string(), "Error: Request needs an error handler");

    let req = Request::new(RequestOptions {
        on_error: Some(Arc::new(|_: &str| {})),
        ..Default::default()
    })
    .unwrap();
    req.error("handled");
}

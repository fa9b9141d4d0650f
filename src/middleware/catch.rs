use async_trait::async_trait;

use crate::error::{stringify_error, Error, HTTPError};
use crate::handler::{Handler, HandlerResult, Reply};
use crate::request::Request;
use crate::response::{status_reason, Response};

/// Routes the description of `err` to the request's error callback and
/// builds the response the client gets instead.
fn recover(req: &Request, err: &Error) -> Response {
    req.error(&stringify_error(err));

    let code = err.statuscode();
    let mut res = Response::new();
    res.send_text(code, status_reason(code));
    res
}

/// Turns a failing app into an error response, `500 Internal Server Error`
/// unless the failure carries its own status.
pub struct Catch<H> {
    app: H,
}

impl<H: Handler> Catch<H> {
    pub fn new(app: H) -> Self {
        Self { app }
    }
}

#[async_trait]
impl<H: Handler> Handler for Catch<H> {
    async fn handle(&self, req: &mut Request) -> HandlerResult {
        match req.call(&self.app).await.map(|_| ()) {
            Ok(()) => Ok(Reply::Empty),
            Err(e) => Ok(recover(req, &e).into()),
        }
    }
}

/// Dispatches `req` to `app` and always yields a response. Failures are
/// reported through the request's error callback.
pub async fn respond<H: Handler + ?Sized>(app: &H, req: &mut Request) -> Response {
    if let Err(e) = req.call(app).await.map(|_| ()) {
        let res = recover(req, &e);
        req._response = Some(res);
    }
    req.take_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use crate::error::StatusCodeError;
    use crate::func;
    use crate::handler::Reply;
    use crate::request::{Request, RequestOptions};

    use super::{respond, Catch};

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f)
    }

    fn recording() -> (RequestOptions, Arc<Mutex<Vec<String>>>) {
        let errors = Arc::new(Mutex::new(vec![]));
        let e = errors.clone();
        let options = RequestOptions::new().on_error(move |msg| e.lock().unwrap().push(msg.to_string()));
        (options, errors)
    }

    #[test]
    fn rejection_becomes_internal_error() {
        let app = Catch::new(func!(req, {
            req.response_mut().set_header("X-Partial", "1");
            Err("boom!".into())
        }));
        let (options, errors) = recording();
        let mut res = block_on(crate::call(&app, options)).unwrap();

        assert_eq!(res.status(), 500);
        assert_eq!(res.header("X-Partial"), None);
        assert_eq!(res.content_type(), Some("text/plain"));
        assert_eq!(block_on(res.string_content()).unwrap(), "Internal Server Error");
        assert_eq!(*errors.lock().unwrap(), vec!["Error: boom!".to_string()]);
    }

    #[test]
    fn status_errors_keep_their_code() {
        let app = Catch::new(func!(Err(StatusCodeError::new(404).into())));
        let (options, _) = recording();
        let mut res = block_on(crate::call(&app, options)).unwrap();
        assert_eq!(res.status(), 404);
        assert_eq!(block_on(res.string_content()).unwrap(), "Not Found");
    }

    #[test]
    fn success_passes_through() {
        let app = Catch::new(func!(Ok(Reply::from("fine"))));
        let (options, errors) = recording();
        let mut res = block_on(crate::call(&app, options)).unwrap();
        assert_eq!(res.status(), 200);
        assert_eq!(block_on(res.string_content()).unwrap(), "fine");
        assert!(errors.lock().unwrap().is_empty());
    }

    #[test]
    fn respond_never_fails() {
        let app = crate::handler::func(|_| panic!("boom!"));
        let (options, errors) = recording();
        let mut req = Request::new(options).unwrap();
        let res = block_on(respond(&app, &mut req));
        assert_eq!(res.status(), 500);
        assert_eq!(*errors.lock().unwrap(), vec!["Error: handler panicked: boom!".to_string()]);
        assert!(req.response().is_none());
    }
}

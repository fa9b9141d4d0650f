//! `Request::call`: invoke a handler, wait for it to settle and fold what it
//! returned into the request's response.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::error::{BoxError, Error, Result};
use crate::handler::{Handler, Reply};
use crate::request::{Request, RequestOptions};
use crate::response::Response;

fn into_error(e: BoxError) -> Error {
    match e.downcast::<Error>() {
        Ok(e) => *e,
        Err(e) => match e.downcast::<crate::error::StatusCodeError>() {
            Ok(e) => Error::Status(*e),
            Err(e) => Error::Handler(e),
        },
    }
}

impl Request {
    /// Runs `app` with this request and resolves to the associated response.
    ///
    /// An `Err` from the handler and a panic, whether raised while the
    /// handler is invoked or while its future is polled, all come back as
    /// `Err` here. No response coercion happens in that case.
    pub async fn call<H: Handler + ?Sized>(&mut self, app: &H) -> Result<&mut Response> {
        self.response_mut();

        // The invocation itself runs inside the guarded future so a panic
        // before the first suspension lands in the same channel.
        let outcome = AssertUnwindSafe(async { app.handle(self).await })
            .catch_unwind()
            .await;

        let reply = match outcome {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => return Err(into_error(e)),
            Err(payload) => return Err(Error::from_panic(payload)),
        };

        self.apply(reply);
        Ok(self.response_mut())
    }

    fn apply(&mut self, reply: Reply) {
        match reply {
            Reply::Empty => {}
            Reply::Response(res) => {
                log::debug!(status = res.status(); "handler replaced the response");
                self._response = Some(res);
            }
            Reply::Status(code) => {
                self.response_mut().set_status(code);
            }
            Reply::Content(content) => {
                self.response_mut().set_content(content);
            }
            Reply::Partial(partial) => {
                let res = self.response_mut();
                if let Some(status) = partial.status {
                    res.set_status(status);
                }
                if let Some(headers) = partial.headers {
                    res.set_headers(headers);
                }
                if let Some(content) = partial.content {
                    res.set_content(content);
                }
            }
        }
    }
}

/// Builds a request from `options` and dispatches it to `app`.
pub async fn call<H: Handler + ?Sized>(app: &H, options: RequestOptions) -> Result<Response> {
    let mut req = Request::create(options)?;
    req.call(app).await?;
    Ok(req.take_response())
}

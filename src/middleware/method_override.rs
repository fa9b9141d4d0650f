use async_trait::async_trait;

use crate::handler::{Handler, HandlerResult, Reply};
use crate::request::{parse_query, Request, FORM_URLENCODED};

pub const METHOD_OVERRIDE_HEADER: &str = "X-Http-Method-Override";
pub const METHOD_OVERRIDE_PARAM: &str = "_method";

fn is_token(method: &str) -> bool {
    !method.is_empty() && method.bytes().all(|b| b.is_ascii_alphabetic() || b == b'-' || b == b'_')
}

/// Lets clients that can only send GET and POST ask for another method,
/// through the `X-Http-Method-Override` header or a `_method` parameter in the
/// query string or an url-encoded form body. The header wins; among several
/// parameters the last one does.
pub struct MethodOverride<H> {
    app: H,
}

impl<H: Handler> MethodOverride<H> {
    pub fn new(app: H) -> Self {
        Self { app }
    }
}

async fn param_override(req: &mut Request) -> Option<String> {
    let mut method = req.query().get_last(METHOD_OVERRIDE_PARAM).cloned();

    let is_form = req.media_type().map(|v| v.type_ == FORM_URLENCODED).unwrap_or(false);
    if is_form {
        match req.buffer_content().await {
            Ok(body) => {
                let body = String::from_utf8_lossy(body).into_owned();
                if let Some(v) = parse_query(&body).get_last(METHOD_OVERRIDE_PARAM) {
                    method = Some(v.clone());
                }
            }
            Err(e) => req.error(&format!("Error: cannot read form parameters: {}", e)),
        }
    }
    method
}

#[async_trait]
impl<H: Handler> Handler for MethodOverride<H> {
    async fn handle(&self, req: &mut Request) -> HandlerResult {
        let header = req
            .header(METHOD_OVERRIDE_HEADER)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let method = match header {
            Some(v) => Some(v),
            None => param_override(req).await,
        };

        if let Some(method) = method {
            if is_token(&method) {
                req.set_method(&method);
            } else {
                req.error(&format!("Error: invalid method override `{}`", method));
            }
        }

        req.call(&self.app).await?;
        Ok(Reply::Empty)
    }
}

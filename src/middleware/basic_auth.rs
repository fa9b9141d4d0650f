use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;

use crate::handler::{BoxFuture, Handler, HandlerResult, Reply};
use crate::request::Request;

/// Checks a username and password. Resolves to the name the request should
/// run as, or `None` to refuse the credentials.
pub type Validate = Arc<dyn Fn(String, String) -> BoxFuture<'static, Option<String>> + Send + Sync>;

const DEFAULT_REALM: &str = "Authorization Required";

/// Basic authentication in front of `app`. The validated user is stored in
/// `Request::remote_user`; a request that already has one is passed through.
pub struct BasicAuth<H> {
    app: H,
    validate: Validate,
    realm: Option<String>,
}

impl<H: Handler> BasicAuth<H> {
    pub fn new<F>(app: H, validate: F) -> Self
    where
        F: Fn(String, String) -> BoxFuture<'static, Option<String>> + Send + Sync + 'static,
    {
        Self {
            app,
            validate: Arc::new(validate),
            realm: None,
        }
    }

    /// Accepts the given username whenever `check` returns true.
    pub fn from_fn<F>(app: H, check: F) -> Self
    where
        F: Fn(&str, &str) -> bool + Send + Sync + 'static,
    {
        Self::new(app, move |user, pass| {
            let ok = check(&user, &pass);
            Box::pin(async move { if ok { Some(user) } else { None } })
        })
    }

    pub fn realm(mut self, realm: &str) -> Self {
        self.realm = Some(realm.to_string());
        self
    }

    fn unauthorized(&self, req: &mut Request) -> HandlerResult {
        let realm = self.realm.as_deref().unwrap_or(DEFAULT_REALM);
        let res = req.response_mut();
        res.set_header("WWW-Authenticate", &format!("Basic realm=\"{}\"", realm));
        res.send_text(401, "Not Authorized");
        Ok(Reply::Empty)
    }
}

fn bad_request(req: &mut Request) -> HandlerResult {
    req.response_mut().send_text(400, "Bad Request");
    Ok(Reply::Empty)
}

/// Splits `Basic dXNlcjpwYXNz` into its credentials. The outer `None` marks a
/// header that is not usable Basic authorization.
fn parse_credentials(auth: &str) -> Option<(String, String)> {
    let (scheme, params) = auth.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(params.trim())
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    match decoded.split_once(':') {
        Some((user, pass)) => Some((user.to_string(), pass.to_string())),
        None => Some((decoded, String::new())),
    }
}

#[async_trait]
impl<H: Handler> Handler for BasicAuth<H> {
    async fn handle(&self, req: &mut Request) -> HandlerResult {
        if req.remote_user.is_some() {
            req.call(&self.app).await?;
            return Ok(Reply::Empty);
        }

        let auth = req.auth().map(|v| v.trim().to_string()).unwrap_or_default();
        if auth.is_empty() {
            return self.unauthorized(req);
        }

        let (user, pass) = match parse_credentials(&auth) {
            Some(v) => v,
            None => return bad_request(req),
        };

        match (self.validate)(user, pass).await {
            Some(user) => {
                req.remote_user = Some(user);
                req.call(&self.app).await?;
                Ok(Reply::Empty)
            }
            None => self.unauthorized(req),
        }
    }
}

#[cfg(test)]
mod tests {
    use base64::Engine;

    use crate::func;
    use crate::request::RequestOptions;

    use super::{parse_credentials, BasicAuth};

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f)
    }

    fn basic(user_pass: &str) -> String {
        format!("Basic {}", base64::engine::general_purpose::STANDARD.encode(user_pass))
    }

    fn app() -> BasicAuth<crate::handler::FuncHandler> {
        BasicAuth::from_fn(
            func!(req, { Ok(req.remote_user.clone().unwrap_or_default().into()) }),
            |user, pass| user == "admin" && pass == "secret",
        )
    }

    #[test]
    fn credentials() {
        assert_eq!(
            parse_credentials(&basic("admin:se:cret")),
            Some(("admin".to_string(), "se:cret".to_string()))
        );
        assert_eq!(parse_credentials("Bearer abc"), None);
        assert_eq!(parse_credentials("Basic %%%"), None);
    }

    #[test]
    fn valid_credentials_set_remote_user() {
        let options = RequestOptions::new().on_error(|_| {}).header("Authorization", &basic("admin:secret"));
        let mut res = block_on(crate::call(&app(), options)).unwrap();
        assert_eq!(res.status(), 200);
        assert_eq!(block_on(res.string_content()).unwrap(), "admin");
    }

    #[test]
    fn missing_or_wrong_credentials_are_challenged() {
        for options in [
            RequestOptions::new(),
            RequestOptions::new().header("Authorization", &basic("admin:nope")),
        ] {
            let mut res = block_on(crate::call(&app().realm("demo"), options.on_error(|_| {}))).unwrap();
            assert_eq!(res.status(), 401);
            assert_eq!(res.header("WWW-Authenticate"), Some("Basic realm=\"demo\""));
            assert_eq!(block_on(res.string_content()).unwrap(), "Not Authorized");
        }

        let res = block_on(crate::call(&app(), RequestOptions::new().on_error(|_| {}))).unwrap();
        assert_eq!(
            res.header("WWW-Authenticate"),
            Some("Basic realm=\"Authorization Required\"")
        );
    }

    #[test]
    fn other_schemes_are_bad_requests() {
        let options = RequestOptions::new().on_error(|_| {}).header("Authorization", "Bearer token");
        let res = block_on(crate::call(&app(), options)).unwrap();
        assert_eq!(res.status(), 400);
    }

    #[test]
    fn async_validation_can_rename_the_user() {
        let app = BasicAuth::new(
            func!(req, { Ok(req.remote_user.clone().unwrap_or_default().into()) }),
            |user, _| Box::pin(async move {
                tokio::task::yield_now().await;
                Some(format!("user:{}", user))
            }),
        );
        let options = RequestOptions::new().on_error(|_| {}).header("Authorization", &basic("bob:x"));
        let mut res = block_on(crate::call(&app, options)).unwrap();
        assert_eq!(block_on(res.string_content()).unwrap(), "user:bob");
    }
}

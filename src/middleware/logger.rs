use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::handler::{Handler, HandlerResult, Reply};
use crate::headers::CONTENT_LENGTH;
use crate::request::Request;
use crate::response::Response;
use crate::utils::time::COMMON_LOG_TIME_LAYOUT;

pub type MessageHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// Writes a line per response in the Common Log Format:
///
/// `127.0.0.1 - frank [10/Oct/2000 13:55:36] "GET /a.gif HTTP/1.0" 200 2326 0.003`
pub struct Logger<H> {
    app: H,
    handler: MessageHandler,
}

impl<H: Handler> Logger<H> {
    /// Logs through `log::info!`.
    pub fn new(app: H) -> Self {
        Self::with_handler(app, |line: &str| log::info!("{}", line))
    }

    pub fn with_handler<F: Fn(&str) + Send + Sync + 'static>(app: H, f: F) -> Self {
        Self {
            app,
            handler: Arc::new(f),
        }
    }
}

fn format_line(req: &Request, res: &Response, elapsed: f64) -> String {
    let protocol = req.protocol().trim_end_matches(':').to_ascii_uppercase();
    let remote_host = if req.remote_host().is_empty() { "-" } else { req.remote_host() };

    format!(
        "{} - {} [{}] \"{} {} {}/{}\" {} {} {:.3}",
        remote_host,
        req.remote_user.as_deref().unwrap_or("-"),
        req.date().format(COMMON_LOG_TIME_LAYOUT),
        req.method(),
        req.path(),
        protocol,
        req.protocol_version(),
        res.status(),
        res.header(CONTENT_LENGTH).unwrap_or("-"),
        elapsed,
    )
}

#[async_trait]
impl<H: Handler> Handler for Logger<H> {
    async fn handle(&self, req: &mut Request) -> HandlerResult {
        let start = Instant::now();
        req.call(&self.app).await?;
        let elapsed = start.elapsed().as_secs_f64();

        if let Some(res) = req.response() {
            (self.handler)(&format_line(req, res, elapsed));
        }
        Ok(Reply::Empty)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use regex::Regex;

    use crate::func;
    use crate::request::RequestOptions;

    use super::Logger;

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f)
    }

    #[test]
    fn common_log_format() {
        let lines = Arc::new(Mutex::new(vec![]));
        let l = lines.clone();
        let app = Logger::with_handler(
            func!(req, {
                req.response_mut().set_content_length(5);
                req.remote_user = Some("frank".to_string());
                Ok(201u16.into())
            }),
            move |line| l.lock().unwrap().push(line.to_string()),
        );

        let options = RequestOptions::new()
            .on_error(|_| {})
            .remote_host("127.0.0.1")
            .method("POST")
            .path("/a.gif")
            .query_string("x=1");
        block_on(crate::call(&app, options)).unwrap();

        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        let re = Regex::new(
            r#"^127\.0\.0\.1 - frank \[\d{2}/\w{3}/\d{4} \d{2}:\d{2}:\d{2}\] "POST /a\.gif\?x=1 HTTP/1\.0" 201 5 \d+\.\d{3}$"#,
        )
        .unwrap();
        assert!(re.is_match(&lines[0]), "{}", lines[0]);
    }

    #[test]
    fn placeholders_for_missing_values() {
        let lines = Arc::new(Mutex::new(vec![]));
        let l = lines.clone();
        let app = Logger::with_handler(func!(Ok(().into())), move |line| l.lock().unwrap().push(line.to_string()));

        let options = RequestOptions::new().on_error(|_| {}).protocol("https");
        block_on(crate::call(&app, options)).unwrap();

        let lines = lines.lock().unwrap();
        assert!(lines[0].starts_with("- - - ["), "{}", lines[0]);
        assert!(lines[0].contains("\"GET / HTTPS/1.0\" 200 - "), "{}", lines[0]);
    }

    #[test]
    fn failures_are_not_logged() {
        let lines = Arc::new(Mutex::new(vec![]));
        let l = lines.clone();
        let app = Logger::with_handler(func!(Err("boom!".into())), move |line| {
            l.lock().unwrap().push(line.to_string())
        });

        assert!(block_on(crate::call(&app, RequestOptions::new().on_error(|_| {}))).is_err());
        assert!(lines.lock().unwrap().is_empty());
    }
}

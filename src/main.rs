use std::io::Write;

use clap::Parser;

use httpipe::config::{Args, Config};
use httpipe::middleware::{BasicAuth, Logger, MethodOverride};
use httpipe::{func, sink, Handler, Request};

fn echo() -> impl Handler {
    func!(req, {
        let body = req.string_content().await?;
        let headers: Vec<(String, String)> = req
            .headers()
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.clone(), v.clone())))
            .collect();
        let query: Vec<(String, String)> = req
            .query()
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.clone(), v.clone())))
            .collect();

        let description = serde_json::json!({
            "method": req.method(),
            "url": req.url(),
            "path": req.path(),
            "query": query,
            "headers": headers,
            "remote_user": req.remote_user,
            "body": body,
        });
        req.response_mut().send_json(None, &description)?;
        Ok(().into())
    })
}

fn build_app(config: &Config) -> Box<dyn Handler> {
    let mut app: Box<dyn Handler> = Box::new(MethodOverride::new(echo()));

    if let Some(auth) = config.auth.as_ref().filter(|v| v.enabled()) {
        let users = auth.users.clone();
        let guarded = BasicAuth::from_fn(app, move |user, pass| users.get(user).map(|v| v == pass).unwrap_or(false));
        app = Box::new(guarded.realm(&auth.realm));
    }

    if config.logger {
        app = Box::new(Logger::new(app));
    }
    app
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let mut config = match args.file.as_ref() {
        Some(fp) => Config::load(fp)?,
        None => Config::default(),
    };
    if let Some(level) = args.log_level.as_ref() {
        config.log_level = Some(level.clone());
        config.autofix()?;
    }

    httpipe::logging::init(config.level())?;
    httpipe::logging::route_panics();
    let default_sink = config.sink.sink();
    let disabled = matches!(default_sink, sink::DefaultSink::Disabled);
    sink::configure(default_sink);

    let mut options = args.request_options()?;
    if disabled {
        options = options.on_error(|msg| log::error!(target: "httpipe::request", "{}", msg));
    }

    let app = build_app(&config);
    let mut req = Request::create(options)?;
    let mut res = httpipe::respond(&app, &mut req).await;

    let body = res.buffer_content().await?.to_vec();
    if res.content_length().is_none() {
        res.set_content_length(body.len() as u64);
    }

    let mut out = std::io::stdout().lock();
    writeln!(out, "HTTP/1.1 {} {}", res.status(), res.reason())?;
    for (name, values) in res.headers().iter() {
        for value in values.iter() {
            writeln!(out, "{}: {}", name, value)?;
        }
    }
    writeln!(out)?;
    out.write_all(&body)?;
    writeln!(out)?;
    out.flush()?;

    log::logger().flush();
    Ok(())
}

use clap::Parser;

use crate::error::{Error, Result};
use crate::request::RequestOptions;

/// Dispatch one request through the demo middleware chain and print the
/// response.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// request url, absolute or just a path
    #[arg(default_value = "http://localhost/")]
    pub url: String,

    /// config toml file path
    #[arg(short = 'f', long = "file")]
    pub file: Option<String>,

    /// request method
    #[arg(short = 'X', long = "request", default_value = "GET")]
    pub method: String,

    /// request header, `Name: value`
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// request body
    #[arg(short = 'd', long = "data")]
    pub data: Option<String>,

    /// overrides the config's log level
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Args {
    pub fn request_options(&self) -> Result<RequestOptions> {
        let mut options = RequestOptions::from_url(&self.url)?
            .method(self.method.as_str())
            .remote_host("127.0.0.1");

        for header in self.headers.iter() {
            let (name, value) = header
                .split_once(':')
                .ok_or_else(|| Error::Config(format!("bad header `{}`, expected `Name: value`", header)))?;
            options = options.header(name.trim(), value.trim());
        }

        if let Some(data) = self.data.as_ref() {
            options = options.content(data.clone());
        }
        Ok(options)
    }
}

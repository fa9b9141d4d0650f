//! Handlers that wrap another handler. Each one passes the request on with
//! `req.call(&self.app)` and so shares the request's response with it.

mod basic_auth;
mod catch;
mod logger;
mod method_override;

pub use basic_auth::{BasicAuth, Validate};
pub use catch::{respond, Catch};
pub use logger::{Logger, MessageHandler};
pub use method_override::{MethodOverride, METHOD_OVERRIDE_HEADER, METHOD_OVERRIDE_PARAM};

mod encoding;
mod media_value;

pub use encoding::AcceptEncoding;
pub use media_value::{parse_media_value, parse_media_values, stringify_media_values, MediaValue, MediaValues};

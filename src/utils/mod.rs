mod mimes;
mod multi_values_map;
pub mod time;

pub use {
    mimes::{mime_type_for_path, DEFAULT_MIME_TYPE},
    multi_values_map::MultiValuesMap,
};

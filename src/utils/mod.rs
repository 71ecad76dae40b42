pub mod error;
pub mod formats;

pub use error::{ShrinkError, ShrinkResult};
pub use formats::{format_bytes, is_high_compression_source, shrink_output_name, staged_input_name};

pub mod file_format;
pub mod log_setup;
pub mod test_utils;

pub use file_format::{
    FileExtensionError, FileFormatResult, SerdeFormat, deserialize, get_file_extension,
    read_file, serialize, write_file,
};
pub use log_setup::setup_logging;

pub fn is_debug() -> bool {
    cfg!(debug_assertions)
}

mod json_file;
pub mod keys;
mod key_value;

pub use json_file::JsonFileStore;
pub use key_value::{InMemoryStore, KeyValueStore, read_or_default, write_value};

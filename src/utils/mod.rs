// Utils compartidos

pub mod constants;
pub mod format;
pub mod i18n;
pub mod storage;
pub mod timer;

pub use constants::*;
pub use format::{format_date_time, parse_timestamp};
pub use storage::{load_from_storage, save_to_storage, KeyValueStorage, MemoryStorage};
pub use timer::{sleep, with_timeout, TimeoutElapsed};

use std::time::Duration;

pub const DEFAULT_LOG_DIRECTIVE: &str = "image_resize_server=info";
pub const QUICKWIT_LOGGING_CHANNEL_CAPACITY: usize = 1024;
pub const DEFAULT_LOGGING_BATCH_SIZE: usize = 100;
/// Partially filled batches are shipped at least this often.
pub const QUICKWIT_FLUSH_INTERVAL: Duration = Duration::from_secs(5);

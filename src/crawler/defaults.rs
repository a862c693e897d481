//! Timeout and buffer-size constants shared by the Crawler runtime and
//! Supervisor.

use std::time::Duration;

pub const DEFAULT_START_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_INIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Bounded capacity of the article delivery channel; writers use
/// non-blocking `try_send` and drop-newest on overflow.
pub const ARTICLE_CHANNEL_BUFFER_SIZE: usize = 100;

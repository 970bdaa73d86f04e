// Worker loop timing

use std::time::Duration;

/// How long a worker idles when the queue comes up empty
pub const IDLE_SLEEP_DURATION: Duration = Duration::from_millis(100);

/// Back-off after a worker-loop error before polling again
pub const ERROR_RECOVERY_SLEEP_DURATION: Duration = Duration::from_secs(1);

//! Step timing.

use std::time::{Duration, Instant};

/// Measures how long one step takes.
pub struct Timer {
    name: String,
    start: Instant,
}

impl Timer {
    /// Start a new timer for the named step.
    pub fn start(name: &str) -> Self {
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }

    /// Finish the timer and print the elapsed time.
    pub fn finish(self) {
        println!("  [{}] {}", format_elapsed(self.start.elapsed()), self.name);
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs >= 60.0 {
        format!("{:.1}m", secs / 60.0)
    } else {
        format!("{:.1}s", secs)
    }
}

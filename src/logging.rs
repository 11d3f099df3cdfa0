//! Logging for cartoee.
//!
//! Structured `tracing` helpers shared by the plotting operations and the
//! binary. The library never installs a subscriber on its own.

use std::fmt::Display;
use std::time::Instant;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::error::CartoeeError;

/// Install a subscriber writing to stderr. `RUST_LOG` overrides `log_level`.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .try_init();
    if installed.is_err() {
        debug!("Tracing subscriber already installed, keeping it");
    }
}

/// A named unit of work, timed from `start` until its outcome is logged.
#[derive(Debug)]
pub struct Operation {
    name: &'static str,
    subject: String,
    started: Instant,
}

impl Operation {
    /// Log the start of `name` acting on `subject` (an image id, a path).
    pub fn start(name: &'static str, subject: impl Into<String>) -> Self {
        let subject = subject.into();
        info!(operation = name, subject = %subject, "Starting {}", name);
        Self {
            name,
            subject,
            started: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    /// Log how the operation ended; failures are logged as errors with their cause.
    pub fn finish<T, E: Display>(self, outcome: &std::result::Result<T, E>) {
        let duration_ms = self.elapsed_ms();
        match outcome {
            Ok(_) => info!(
                operation = self.name,
                subject = %self.subject,
                duration_ms = duration_ms,
                "{} finished",
                self.name
            ),
            Err(e) => error!(
                operation = self.name,
                subject = %self.subject,
                duration_ms = duration_ms,
                error = %e,
                "{} failed",
                self.name
            ),
        }
    }
}

/// Run a fallible step, logging its duration under a fresh request id.
pub fn log_timed_operation<T, E, F>(operation: &str, f: F) -> std::result::Result<T, E>
where
    F: FnOnce() -> std::result::Result<T, E>,
    E: Display,
{
    let start = Instant::now();
    let request_id = Uuid::new_v4();
    debug!(operation = operation, request_id = %request_id, "Step started");

    let result = f();

    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
    match &result {
        Ok(_) => debug!(
            operation = operation,
            request_id = %request_id,
            duration_ms = duration_ms,
            "Step done"
        ),
        Err(e) => error!(
            operation = operation,
            request_id = %request_id,
            duration_ms = duration_ms,
            error = %e,
            "Step failed"
        ),
    }
    result
}

/// Log a crate error with where it surfaced
pub fn log_error(error: &CartoeeError, context: &str) {
    error!(
        error = %error,
        context = context,
        error_type = std::any::type_name_of_val(error),
        "Error occurred"
    );
}

/// Log a failed imagery request
pub fn log_request_error(error: &CartoeeError, image: &str, request_id: &str) {
    error!(
        error = %error,
        image = image,
        request_id = request_id,
        "Imagery request failed"
    );
}

/// Identifier correlating the log lines of one imagery request
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

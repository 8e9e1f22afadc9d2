use std::path::Path;

use tracing::{error, info, warn};

use crate::errors::BallotError;

/// Log the start of one `ballot` invocation and the store it will use.
pub fn log_app_startup(command: &str, store_path: &Path) {
    info!(
        event = "core.app.startup_completed",
        version = env!("CARGO_PKG_VERSION"),
        command = command,
        store_path = %store_path.display()
    );
}

pub fn log_app_shutdown(command: &str, succeeded: bool) {
    info!(
        event = "core.app.shutdown_started",
        command = command,
        outcome = if succeeded { "ok" } else { "failed" }
    );
}

/// User errors (expired session, role restriction) log at warn.
pub fn log_app_error(error: &dyn BallotError) {
    if error.is_user_error() {
        warn!(
            event = "core.app.error_occurred",
            error = %error,
            error_code = error.error_code(),
            user_error = true
        );
    } else {
        error!(
            event = "core.app.error_occurred",
            error = %error,
            error_code = error.error_code(),
            user_error = false
        );
    }
}

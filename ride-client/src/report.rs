//! Last-resort error reporting.
//!
//! Anything that fails without being handled ends up here: it is logged and
//! turned into an error toast for the rider.

use std::error::Error;

use crate::api::ApiError;
use crate::notify::{Toast, ToastCenter};

/// Toast text when the backend could not be reached.
pub const CONNECTION_MESSAGE: &str =
    "Server connection error. Please ensure the backend is running.";

/// Fallback when an error has no message.
pub const FALLBACK_MESSAGE: &str = "Something went wrong";

/// Toast for an uncaught application error.
pub fn application_error_toast(error: &dyn Error) -> Toast {
    let message = error.to_string();
    let message = if message.is_empty() {
        FALLBACK_MESSAGE
    } else {
        message.as_str()
    };
    Toast::error(format!("Application Error: {message}"))
}

/// Toast for a failed request that nobody handled.
pub fn unhandled_request_toast() -> Toast {
    Toast::error(CONNECTION_MESSAGE)
}

/// How an unhandled error reached the reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// A backend request failed.
    UnhandledRejection,
    /// Anything else went wrong.
    GlobalError,
}

impl Failure {
    /// Classify `error` by its source chain.
    ///
    /// Any [`ApiError`] in the chain makes it a failed request.
    pub fn of(error: &(dyn Error + 'static)) -> Self {
        let from_request = std::iter::successors(Some(error), |&e| e.source())
            .any(|e| e.downcast_ref::<ApiError>().is_some());

        if from_request {
            Failure::UnhandledRejection
        } else {
            Failure::GlobalError
        }
    }
}

/// Pick the toast for an error.
///
/// Failed requests get the connection message; every other failure is
/// reported as an application error.
pub fn toast_for(error: &(dyn Error + 'static)) -> Toast {
    match Failure::of(error) {
        Failure::UnhandledRejection => unhandled_request_toast(),
        Failure::GlobalError => application_error_toast(error),
    }
}

/// Log an unhandled error and show it on `center`.
pub fn report(center: &mut ToastCenter, error: &(dyn Error + 'static)) -> Toast {
    let toast = match Failure::of(error) {
        Failure::UnhandledRejection => {
            tracing::error!(reason = %error, "Unhandled Rejection");
            unhandled_request_toast()
        }
        Failure::GlobalError => {
            tracing::error!(error = %error, "Global Error");
            application_error_toast(error)
        }
    };
    center.show(toast.clone());
    toast
}

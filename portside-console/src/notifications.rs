///! User-visible notifications
///!
///! Toasts are fire-and-forget: controllers report outcomes and move on.

use portside_common::Error;

/// Title used for every failure toast
pub const FAILURE_TITLE: &str = "Failure";

/// Toast sink
pub trait Notifier: Send + Sync {
    /// Report a completed action
    fn success(&self, title: &str, text: &str);

    /// Report a failed backend call with a contextual message
    fn error(&self, title: &str, err: &Error, message: &str);
}

/// Report a failed backend call under the standard failure title
pub(crate) fn notify_failure(notifier: &dyn Notifier, err: &Error, message: &str) {
    tracing::warn!(error = %err, "{}", message);
    notifier.error(FAILURE_TITLE, err, message);
}

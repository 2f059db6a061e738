//! Toast notifications.
//!
//! A toast is a short message with a kind. Only one toast is on screen at a
//! time: showing a new one removes the previous one. A toast stays visible
//! for [`TOAST_VISIBLE`], then fades out over [`TOAST_FADE`].

use std::fmt;
use std::time::{Duration, Instant};

use askama::Template;

/// How long a toast stays fully visible.
pub const TOAST_VISIBLE: Duration = Duration::from_millis(3000);

/// Fade-out time before a toast is removed.
pub const TOAST_FADE: Duration = Duration::from_millis(300);

/// Kind of toast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToastKind {
    #[default]
    Success,
    Error,
}

impl ToastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
        }
    }

    /// Check mark for success, cross for anything else.
    pub fn icon(&self) -> &'static str {
        match self {
            ToastKind::Success => "✓",
            ToastKind::Error => "✕",
        }
    }
}

/// A toast notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

impl Toast {
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Error)
    }

    /// HTML markup for the toast, with the message escaped.
    pub fn to_html(&self) -> Result<String, askama::Error> {
        ToastTemplate {
            kind: self.kind.as_str(),
            icon: self.kind.icon(),
            message: &self.message,
        }
        .render()
    }
}

/// Toast fragment.
#[derive(Template)]
#[template(
    source = r#"<div class="toast {{ kind }}"><span class="toast-icon">{{ icon }}</span><span class="toast-message">{{ message }}</span></div>"#,
    ext = "html"
)]
struct ToastTemplate<'a> {
    kind: &'a str,
    icon: &'a str,
    message: &'a str,
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.icon(), self.message)
    }
}

/// Where a toast is in its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Visible,
    Hiding,
}

/// Holds the single toast currently on screen.
#[derive(Debug, Default)]
pub struct ToastCenter {
    current: Option<(Toast, Instant)>,
}

impl ToastCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a toast, removing any existing one. Returns the replaced toast.
    pub fn show(&mut self, toast: Toast) -> Option<Toast> {
        self.show_at(toast, Instant::now())
    }

    /// Show a toast as of `now`.
    pub fn show_at(&mut self, toast: Toast, now: Instant) -> Option<Toast> {
        match toast.kind {
            ToastKind::Success => tracing::info!(message = %toast.message, "toast"),
            ToastKind::Error => tracing::warn!(message = %toast.message, "toast"),
        }
        self.current.replace((toast, now)).map(|(old, _)| old)
    }

    /// The toast on screen at `now` and its phase, if any.
    ///
    /// A toast past its fade-out is dropped.
    pub fn current_at(&mut self, now: Instant) -> Option<(&Toast, ToastPhase)> {
        let shown = self.current.as_ref()?.1;
        let age = now.saturating_duration_since(shown);

        if age >= TOAST_VISIBLE + TOAST_FADE {
            self.current = None;
            return None;
        }

        let phase = if age < TOAST_VISIBLE {
            ToastPhase::Visible
        } else {
            ToastPhase::Hiding
        };
        self.current.as_ref().map(|(toast, _)| (toast, phase))
    }

    /// The toast on screen right now.
    pub fn current(&mut self) -> Option<(&Toast, ToastPhase)> {
        self.current_at(Instant::now())
    }

    /// Remove the current toast immediately.
    pub fn dismiss(&mut self) -> Option<Toast> {
        self.current.take().map(|(toast, _)| toast)
    }
}

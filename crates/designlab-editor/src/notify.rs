//! User-facing notices.
//!
//! The editor never blocks on a problem; it raises a [`Notice`] through a
//! [`Notifier`] and carries on. Front ends render notices as toasts;
//! [`RecordingNotifier`] keeps them for inspection and [`TracingNotifier`]
//! forwards them to the log.

use serde::Serialize;
use tracing::{info, warn};

use designlab_core::id::EdgeId;

/// Something the user should be told about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// A connection was recorded but breaks the node type policy.
    ConnectionWarning { edge: EdgeId, message: String },
    /// The diagram was saved to the signed-in user's account.
    SavedToCloud,
    /// The diagram was saved to the local slot only.
    SavedLocally,
    SaveFailed { reason: String },
    LoadFailed { reason: String },
    TemplateLoaded { name: String, components: usize },
}

impl Notice {
    /// Short headline for the notice.
    pub fn title(&self) -> &'static str {
        match self {
            Notice::ConnectionWarning { .. } => "Connection Warning",
            Notice::SavedToCloud => "Saved to Cloud",
            Notice::SavedLocally => "Saved Locally",
            Notice::SaveFailed { .. } => "Save Failed",
            Notice::LoadFailed { .. } => "Load Failed",
            Notice::TemplateLoaded { .. } => "Template Loaded",
        }
    }

    /// Body text shown under the headline.
    pub fn description(&self) -> String {
        match self {
            Notice::ConnectionWarning { message, .. } => message.clone(),
            Notice::SavedToCloud => "Your diagram has been saved to your account".to_string(),
            Notice::SavedLocally => "Sign in to save to cloud".to_string(),
            Notice::SaveFailed { .. } => "Could not save diagram. Please try again.".to_string(),
            Notice::LoadFailed { reason } => format!("Could not open diagram: {}", reason),
            Notice::TemplateLoaded { name, components } => {
                format!("{} with {} components", name, components)
            }
        }
    }

    /// Warnings and failures are shown with destructive styling.
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            Notice::ConnectionWarning { .. } | Notice::SaveFailed { .. } | Notice::LoadFailed { .. }
        )
    }
}

/// Sink for notices.
pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

/// Collects notices in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notices: Vec<Notice>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        RecordingNotifier::default()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Removes and returns everything recorded so far.
    pub fn take(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

/// Writes notices to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, notice: Notice) {
        if notice.is_destructive() {
            warn!(title = notice.title(), description = %notice.description(), "notice");
        } else {
            info!(title = notice.title(), description = %notice.description(), "notice");
        }
    }
}

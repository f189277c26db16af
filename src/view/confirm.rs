//! Confirm-then-act control and its node-delete specialization.

use crate::error::ApiError;
use tracing::info;

/// Visual treatment of a confirm button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonStyle {
    #[default]
    Primary,
    Danger,
}

/// Source of a yes/no answer to a prompt.
pub trait Confirmer {
    fn confirm(&self, message: &str) -> Result<bool, ApiError>;
}

/// Blocking terminal prompt via `dialoguer`. Defaults to "no".
pub struct DialoguerConfirmer;

impl Confirmer for DialoguerConfirmer {
    fn confirm(&self, message: &str) -> Result<bool, ApiError> {
        dialoguer::Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
            .map_err(|e| ApiError::Terminal(format!("Failed to get user input: {}", e)))
    }
}

/// An answer already collected elsewhere (e.g. the in-app modal).
#[derive(Debug, Clone, Copy)]
pub struct Answer(pub bool);

impl Confirmer for Answer {
    fn confirm(&self, _message: &str) -> Result<bool, ApiError> {
        Ok(self.0)
    }
}

/// A button that asks before acting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmButton {
    pub message: String,
    pub label: String,
    pub style: ButtonStyle,
}

impl ConfirmButton {
    pub fn new(message: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            label: label.into(),
            style: ButtonStyle::default(),
        }
    }

    pub fn with_style(mut self, style: ButtonStyle) -> Self {
        self.style = style;
        self
    }

    /// Ask `confirmer`; run `on_confirm` only on a yes. Returns the answer.
    pub fn press<C, F>(&self, confirmer: &C, on_confirm: F) -> Result<bool, ApiError>
    where
        C: Confirmer + ?Sized,
        F: FnOnce(),
    {
        let confirmed = confirmer.confirm(&self.message)?;
        if confirmed {
            on_confirm();
        }
        Ok(confirmed)
    }
}

/// Delete button for a named node.
pub fn delete_button(name: &str) -> ConfirmButton {
    ConfirmButton::new(
        format!("Are you sure you want to delete '{}'?", name),
        "Delete",
    )
    .with_style(ButtonStyle::Danger)
}

/// Receiver of confirmed delete requests.
///
/// Deletion is a notification only: the displayed tree is left as is.
pub trait DeleteSink: Send + Sync {
    fn request_delete(&self, id: i64, name: &str);
}

/// Records delete requests as structured log events.
#[derive(Debug, Default)]
pub struct LoggingDeleteSink;

impl DeleteSink for LoggingDeleteSink {
    fn request_delete(&self, id: i64, name: &str) {
        info!(node_id = id, node_name = name, "Delete requested");
    }
}

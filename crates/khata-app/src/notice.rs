//! User-facing reports
//!
//! A [`Notice`] is what a host shows as a modal alert: a title, a message and
//! one or more labeled actions. Each action carries the [`NoticeEffect`] the
//! host should perform when it is chosen.

use crate::app::Navigation;

/// Notice severity level
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// What choosing an action does
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NoticeEffect {
    /// Close the notice
    Dismiss,
    /// Close the notice and navigate
    Navigate(Navigation),
    /// Revoke the session and return to login (lockout acknowledgement)
    EndSession,
    /// Remove the bank account at this index
    RemoveAccount(usize),
    /// Link the bank account at this index
    LinkAccount(usize),
}

/// A labeled action button
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoticeAction {
    pub label: String,
    pub effect: NoticeEffect,
}

impl NoticeAction {
    pub fn new(label: impl Into<String>, effect: NoticeEffect) -> Self {
        Self {
            label: label.into(),
            effect,
        }
    }

    /// The plain `OK` button
    pub fn ok() -> Self {
        Self::new("OK", NoticeEffect::Dismiss)
    }
}

/// Modal report
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub level: NoticeLevel,
    pub actions: Vec<NoticeAction>,
}

impl Notice {
    /// Create a notice with a single `OK` action
    pub fn new(title: impl Into<String>, message: impl Into<String>, level: NoticeLevel) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level,
            actions: vec![NoticeAction::ok()],
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, NoticeLevel::Info)
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, NoticeLevel::Success)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, NoticeLevel::Warning)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, NoticeLevel::Error)
    }

    /// A `No`/`Yes` question where `Yes` performs `effect`
    pub fn confirm(
        title: impl Into<String>,
        message: impl Into<String>,
        effect: NoticeEffect,
    ) -> Self {
        Self::new(title, message, NoticeLevel::Warning).with_actions(vec![
            NoticeAction::new("No", NoticeEffect::Dismiss),
            NoticeAction::new("Yes", effect),
        ])
    }

    /// Replace the action list
    pub fn with_actions(mut self, actions: Vec<NoticeAction>) -> Self {
        self.actions = actions;
        self
    }

    /// Replace the action list with a single `OK` carrying `effect`
    pub fn on_ok(self, effect: NoticeEffect) -> Self {
        self.with_actions(vec![NoticeAction::new("OK", effect)])
    }

    /// Get icon for level
    pub fn icon(&self) -> &'static str {
        match self.level {
            NoticeLevel::Info => "ℹ",
            NoticeLevel::Success => "✓",
            NoticeLevel::Warning => "⚠",
            NoticeLevel::Error => "✗",
        }
    }

    /// Effect of the action with this label
    pub fn effect_of(&self, label: &str) -> Option<&NoticeEffect> {
        self.actions
            .iter()
            .find(|a| a.label == label)
            .map(|a| &a.effect)
    }
}

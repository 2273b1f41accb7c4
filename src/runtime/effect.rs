use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub title: String,
    pub body: String,
    pub duration: Option<Duration>,
}

impl Notification {
    pub fn new(severity: Severity, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.into(),
            body: body.into(),
            duration: None,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

/// Title/body pair from configuration, turned into a [`Notification`] on use.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NotificationTemplate {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

impl NotificationTemplate {
    pub fn new(title: impl Into<String>, body: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            duration_ms: Some(duration_ms),
        }
    }

    pub fn render(&self, severity: Severity) -> Notification {
        let notification = Notification::new(severity, self.title.clone(), self.body.clone());
        match self.duration_ms {
            Some(ms) => notification.with_duration(Duration::from_millis(ms)),
            None => notification,
        }
    }
}

/// Shows toast-style messages. Rendering is up to the implementor.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// Performs the post-success navigation.
pub trait Redirector {
    fn redirect(&mut self, target: &str);
}

impl Notifier for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

impl Redirector for Vec<String> {
    fn redirect(&mut self, target: &str) {
        self.push(target.to_string());
    }
}

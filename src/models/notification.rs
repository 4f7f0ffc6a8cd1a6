use serde::Serialize;

/// The kind of event a notification carries.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Follow,
    Like,
    Comment,
}

/// An ephemeral notification event. Never persisted; delivered at most once
/// per connected session and dropped silently when the recipient has no
/// session subscribed at dispatch time.
#[derive(Serialize, Clone, Debug)]
pub struct NotificationEvent {
    /// The kind of event.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// The display name of the user who caused the event.
    pub from: String,
    /// The ID of the user who caused the event.
    #[serde(rename = "fromId")]
    pub from_id: String,
}

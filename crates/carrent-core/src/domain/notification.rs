use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::decode::{self, READ_FLAG_KEYS};

/// A notification addressed to the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Build from a backend record. Records without an id are rejected, since
    /// they cannot be marked read.
    pub fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            id: decode::pick_i64(value, &["id", "Id"])?,
            title: decode::pick_str(value, &["title"]).unwrap_or_default(),
            message: decode::pick_str(value, &["message"]).unwrap_or_default(),
            read: decode::pick_bool(value, READ_FLAG_KEYS).unwrap_or(false),
            created_at: decode::pick_datetime(value, &["createdAt"]),
        })
    }

    /// Title to display; untitled notifications get a generic one.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "Notification"
        } else {
            &self.title
        }
    }
}

/// Number of notifications not yet read.
pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.read).count()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_value_with_sparse_record() {
        let n = Notification::from_value(&json!({ "id": 1, "read": false })).unwrap();
        assert_eq!(n.id, 1);
        assert!(!n.read);
        assert_eq!(n.display_title(), "Notification");
        assert!(n.created_at.is_none());
    }

    #[test]
    fn test_is_read_alias_and_missing_id() {
        let n = Notification::from_value(&json!({
            "id": "9",
            "title": "Payment received",
            "message": "Reservation #4 is confirmed",
            "isRead": true,
            "createdAt": "2025-05-01T12:00:00Z"
        }))
        .unwrap();
        assert_eq!(n.id, 9);
        assert!(n.read);
        assert!(n.created_at.is_some());

        assert!(Notification::from_value(&json!({ "title": "no id" })).is_none());
    }

    #[test]
    fn test_unread_count() {
        let items: Vec<Notification> = [json!({"id": 1, "read": false}), json!({"id": 2, "read": true})]
            .iter()
            .filter_map(Notification::from_value)
            .collect();
        assert_eq!(unread_count(&items), 1);
    }
}

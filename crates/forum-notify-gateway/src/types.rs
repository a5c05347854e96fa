//! Notification records as the forum server emits them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Opaque notification identifier.
///
/// The forum stores ids as integers, but nothing on the client depends on
/// that. Ids are sent back to the server in the shape they arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NotificationId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationId::Numeric(n) => write!(f, "{}", n),
            NotificationId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for NotificationId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(n) => NotificationId::Numeric(n),
            Err(_) => NotificationId::Text(s.to_string()),
        })
    }
}

/// What the actor did.
///
/// Unknown kinds are kept verbatim instead of failing the whole list. A
/// missing or non-string `type` decodes as an empty `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum NotificationKind {
    Comment,
    Like,
    Dislike,
    Mention,
    Other(String),
}

impl NotificationKind {
    /// Verb phrase shown between the actor and the post title.
    pub fn label(&self) -> &'static str {
        match self {
            NotificationKind::Comment => "commented on",
            NotificationKind::Like => "liked",
            NotificationKind::Dislike => "disliked",
            NotificationKind::Mention => "mentioned you in",
            NotificationKind::Other(_) => "interacted with",
        }
    }
}

impl From<String> for NotificationKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "comment" => NotificationKind::Comment,
            "like" => NotificationKind::Like,
            "dislike" => NotificationKind::Dislike,
            "mention" => NotificationKind::Mention,
            _ => NotificationKind::Other(s),
        }
    }
}

impl Default for NotificationKind {
    fn default() -> Self {
        NotificationKind::Other(String::new())
    }
}

impl<'de> Deserialize<'de> for NotificationKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => NotificationKind::from(s),
            serde_json::Value::Null => NotificationKind::default(),
            other => NotificationKind::Other(other.to_string()),
        })
    }
}

impl From<NotificationKind> for String {
    fn from(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::Comment => "comment".to_string(),
            NotificationKind::Like => "like".to_string(),
            NotificationKind::Dislike => "dislike".to_string(),
            NotificationKind::Mention => "mention".to_string(),
            NotificationKind::Other(s) => s,
        }
    }
}

/// One event directed at the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: NotificationId,
    /// Display name of the user who triggered the notification.
    #[serde(alias = "actor_name")]
    pub actor: String,
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
    pub post_id: i64,
    #[serde(default)]
    pub post_title: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
}

impl NotificationRecord {
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }

    /// `alice commented on your post "Title"`
    pub fn headline(&self) -> String {
        format!(
            "{} {} your post \"{}\"",
            self.actor,
            self.kind.label(),
            self.post_title
        )
    }

    /// Hour and minute of creation.
    pub fn short_time(&self) -> String {
        self.created_at.format("%H:%M").to_string()
    }

    /// Path of the post this notification refers to.
    pub fn post_link(&self) -> String {
        format!("/post_page/{}", self.post_id)
    }
}

/// SQL timestamp layouts the forum database hands back unconverted.
const SQL_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// Accept RFC 3339 or a bare SQL timestamp (taken as UTC).
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    SQL_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use uuid::Uuid;

// -- Votes --

/// A resolved vote direction. "No vote" is `Option<Vote>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Up,
    Down,
}

impl Vote {
    /// Normalize a server-reported vote string. The legacy spellings
    /// `upvote`/`downvote` map onto `Up`/`Down`; anything else (including
    /// `none`) yields `None` so the caller can fall back to other signals.
    pub fn parse_explicit(raw: &str) -> Option<Vote> {
        match raw {
            "up" | "upvote" => Some(Vote::Up),
            "down" | "downvote" => Some(Vote::Down),
            _ => None,
        }
    }
}

/// Read-only vote projection of a post or reply, as delivered by the API.
///
/// `explicit_vote` is kept as the raw string so unknown values coming from
/// newer or older servers are tolerated instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteSnapshot {
    #[serde(default, alias = "userVote")]
    pub explicit_vote: Option<String>,
    #[serde(default)]
    pub upvoter_ids: Vec<i64>,
    #[serde(default)]
    pub downvoter_ids: Vec<i64>,
}

// -- Timestamps --

/// ISO-8601 instant that keeps the exact text it was built from.
///
/// The text is what gets serialized back out, so offsets and precision sent
/// by the server survive a round trip. Input without an offset is read as UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    raw: String,
    instant: DateTime<FixedOffset>,
}

impl Timestamp {
    pub fn parse(raw: impl Into<String>) -> Result<Self, chrono::ParseError> {
        let raw = raw.into();
        let instant = parse_instant(&raw)?;
        Ok(Self { raw, instant })
    }

    pub fn now() -> Self {
        let now = Utc::now().trunc_subsecs(3);
        Self {
            raw: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            instant: now.fixed_offset(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn to_utc(&self) -> DateTime<Utc> {
        self.instant.with_timezone(&Utc)
    }
}

fn parse_instant(raw: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).or_else(|_| {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|ndt| ndt.and_utc().fixed_offset())
    })
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(raw).map_err(serde::de::Error::custom)
    }
}

// -- Notifications --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    PostVote,
    ReplyCreated,
    ReplyVote,
    PostApproved,
    Mention,
    PostReported,
    ModerationDecisionReporter,
    ModerationDecisionOwner,
    Info,
}

/// A single entry of the notification feed. `id` is the dedup key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: Timestamp,
    #[serde(default)]
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Map<String, Value>>,
}

impl NotificationRecord {
    /// Build a locally generated notification with a fresh id, stamped now.
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            message: message.into(),
            kind,
            created_at: Timestamp::now(),
            read: false,
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: Map<String, Value>) -> Self {
        self.payload = Some(payload);
        self
    }
}

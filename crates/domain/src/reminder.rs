use crate::date::{format_dt, truncate_to_seconds};
use crate::shared::entity::ID;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use memento_utils::create_fingerprint;
use std::{fmt::Display, str::FromStr};

/// Number of hex characters kept from the content fingerprint
const REMINDER_ID_LEN: usize = 8;
const ALARM_EMOJI: &str = "\u{23F0}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnerKind {
    User,
    Channel,
}

impl OwnerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Channel => "channel",
        }
    }
}

impl FromStr for OwnerKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "channel" => Ok(Self::Channel),
            _ => Err(anyhow::Error::msg(format!("Unknown owner kind: {}", s))),
        }
    }
}

/// The entity a list of `Reminder`s belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Owner {
    User(ID),
    Channel(ID),
}

impl Owner {
    pub fn new(kind: OwnerKind, id: ID) -> Self {
        match kind {
            OwnerKind::User => Self::User(id),
            OwnerKind::Channel => Self::Channel(id),
        }
    }

    pub fn kind(&self) -> OwnerKind {
        match self {
            Self::User(_) => OwnerKind::User,
            Self::Channel(_) => OwnerKind::Channel,
        }
    }

    pub fn id(&self) -> &ID {
        match self {
            Self::User(id) | Self::Channel(id) => id,
        }
    }
}

impl Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind().as_str(), self.id())
    }
}

/// Who receives a `Reminder` once it fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// Direct message to a single user
    User { user_id: ID },
    /// Message in a channel, prefixed with a mention of `role_id`
    Channel { channel_id: ID, role_id: ID },
}

impl Recipient {
    pub fn owner(&self) -> Owner {
        match self {
            Self::User { user_id } => Owner::User(user_id.clone()),
            Self::Channel { channel_id, .. } => Owner::Channel(channel_id.clone()),
        }
    }
}

/// A one-shot `Reminder` for a user or for a role inside a channel.
///
/// `trigger_at` is always UTC with second precision. `timezone` is the owner
/// timezone at creation time and is only used for display, `trigger_at` is
/// never derived from it again.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    /// Fingerprint of the content, unique within the owner's list
    pub id: ID,
    pub recipient: Recipient,
    pub trigger_at: DateTime<Utc>,
    /// Free form message body, never reparsed
    pub text: String,
    pub timezone: Option<Tz>,
}

impl Reminder {
    pub fn new_user(user_id: ID, trigger_at: DateTime<Utc>, text: String, timezone: Tz) -> Self {
        Self::new(Recipient::User { user_id }, trigger_at, text, Some(timezone))
    }

    pub fn new_channel(
        channel_id: ID,
        role_id: ID,
        trigger_at: DateTime<Utc>,
        text: String,
        timezone: Tz,
    ) -> Self {
        Self::new(
            Recipient::Channel {
                channel_id,
                role_id,
            },
            trigger_at,
            text,
            Some(timezone),
        )
    }

    fn new(
        recipient: Recipient,
        trigger_at: DateTime<Utc>,
        text: String,
        timezone: Option<Tz>,
    ) -> Self {
        let trigger_at = truncate_to_seconds(trigger_at);
        let id = Self::fingerprint(&recipient, &text, &trigger_at);
        Self {
            id,
            recipient,
            trigger_at,
            text,
            timezone,
        }
    }

    /// Deterministic id over the content. Creating the same reminder twice
    /// yields the same id, which the store treats as a replace.
    pub fn fingerprint(recipient: &Recipient, text: &str, trigger_at: &DateTime<Utc>) -> ID {
        let dt = format_dt(trigger_at);
        let fingerprint = match recipient {
            Recipient::User { .. } => create_fingerprint(&[text, &dt], REMINDER_ID_LEN),
            Recipient::Channel { role_id, .. } => {
                create_fingerprint(&[text, &dt, role_id.as_str()], REMINDER_ID_LEN)
            }
        };
        ID(fingerprint)
    }

    pub fn owner(&self) -> Owner {
        self.recipient.owner()
    }

    pub fn role_id(&self) -> Option<&ID> {
        match &self.recipient {
            Recipient::Channel { role_id, .. } => Some(role_id),
            Recipient::User { .. } => None,
        }
    }

    /// Inclusive, a reminder triggering exactly at `now` is due
    pub fn is_due(&self, now: &DateTime<Utc>) -> bool {
        self.trigger_at <= *now
    }

    pub fn into_delivery(self) -> Delivery {
        Delivery {
            reminder_id: self.id,
            recipient: self.recipient,
            text: self.text,
        }
    }
}

/// Payload handed to the outbound transport for one fired `Reminder`
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub reminder_id: ID,
    pub recipient: Recipient,
    pub text: String,
}

impl Delivery {
    /// The final message body, with the role mention for channel deliveries
    pub fn content(&self) -> String {
        match &self.recipient {
            Recipient::User { .. } => format!("{} {}", ALARM_EMOJI, self.text),
            Recipient::Channel { role_id, .. } => {
                format!("<@&{}> {} {}", role_id, ALARM_EMOJI, self.text)
            }
        }
    }
}

/// A converted `Reminder` waiting for its owner to accept it.
/// Never persisted, expiry counts as a decline.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingReminder {
    pub token: String,
    pub reminder: Reminder,
    pub expires_at: DateTime<Utc>,
}

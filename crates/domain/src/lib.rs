mod date;
mod reminder;
mod shared;
mod time_converter;
mod time_parser;
mod timezone;
mod user;

pub use date::{
    format_dt, format_local_dt, parse_dt, truncate_to_seconds, CONFIRM_DT_FORMAT, DT_FORMAT,
};
pub use reminder::{Delivery, Owner, OwnerKind, PendingReminder, Recipient, Reminder};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use time_converter::{localize, TimeConverter, UnparseableTime};
pub use time_parser::{SimpleTimeParser, TimeExpressionParser};
pub use timezone::{TimezoneResolver, DEFAULT_TIMEZONE};
pub use user::UserSettings;

pub use chrono_tz::Tz;

use chrono::{DateTime, TimeZone, Utc};
use memento_sdk::ID;

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

pub fn id(s: &str) -> ID {
    s.parse().unwrap()
}

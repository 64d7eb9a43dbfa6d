use memento_domain::{Tz, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimezoneResponse {
    pub timezone: String,
    /// True when the user never set a preference
    pub is_default: bool,
}

impl TimezoneResponse {
    pub fn new(timezone: Tz, is_default: bool) -> Self {
        Self {
            timezone: timezone.name().to_string(),
            is_default,
        }
    }
}

pub mod set_timezone {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub timezone: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    pub type APIResponse = TimezoneResponse;
}

pub mod get_timezone {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    pub type APIResponse = TimezoneResponse;
}

pub mod get_timezones {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        /// Friendly aliases, sorted
        pub timezones: Vec<String>,
        pub default_timezone: String,
    }

    impl APIResponse {
        pub fn new(timezones: Vec<&str>, default_timezone: Tz) -> Self {
            Self {
                timezones: timezones.into_iter().map(String::from).collect(),
                default_timezone: default_timezone.name().to_string(),
            }
        }
    }
}

use chrono_tz::Tz;

/// Short names users are most likely to type, mapped to their tz database entry
const FRIENDLY_TIMEZONES: [(&str, Tz); 8] = [
    ("Hawaii", Tz::US__Hawaii),
    ("Alaska", Tz::US__Alaska),
    ("Pacific", Tz::US__Pacific),
    ("Mountain", Tz::US__Mountain),
    ("Central", Tz::US__Central),
    ("Eastern", Tz::US__Eastern),
    ("Atlantic", Tz::Canada__Atlantic),
    ("UTC", Tz::UTC),
];

pub const DEFAULT_TIMEZONE: Tz = Tz::US__Pacific;

/// Validates and normalizes user supplied timezone names
pub struct TimezoneResolver;

impl TimezoneResolver {
    /// Case insensitive match on the friendly aliases first, then an exact
    /// match against the full timezone database.
    pub fn resolve(name: &str) -> Option<Tz> {
        let name = name.trim();
        FRIENDLY_TIMEZONES
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
            .map(|(_, tz)| *tz)
            .or_else(|| name.parse::<Tz>().ok())
    }

    pub fn friendly_options() -> Vec<&'static str> {
        let mut options = FRIENDLY_TIMEZONES
            .iter()
            .map(|(alias, _)| *alias)
            .collect::<Vec<_>>();
        options.sort_unstable();
        options
    }

    pub fn default_timezone() -> Tz {
        DEFAULT_TIMEZONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_resolves_aliases_case_insensitively() {
        assert_eq!(TimezoneResolver::resolve("Pacific"), Some(Tz::US__Pacific));
        assert_eq!(TimezoneResolver::resolve("pacific"), Some(Tz::US__Pacific));
        assert_eq!(TimezoneResolver::resolve(" EASTERN "), Some(Tz::US__Eastern));
        assert_eq!(
            TimezoneResolver::resolve("atlantic"),
            Some(Tz::Canada__Atlantic)
        );
    }

    #[test]
    fn it_resolves_tz_database_names() {
        assert_eq!(
            TimezoneResolver::resolve("Europe/Oslo"),
            Some(Tz::Europe__Oslo)
        );
        assert_eq!(
            TimezoneResolver::resolve("US/Pacific"),
            Some(Tz::US__Pacific)
        );
    }

    #[test]
    fn it_rejects_unknown_names() {
        assert_eq!(TimezoneResolver::resolve("NotATimezone"), None);
        assert_eq!(TimezoneResolver::resolve(""), None);
    }

    #[test]
    fn friendly_options_are_sorted() {
        let options = TimezoneResolver::friendly_options();
        assert_eq!(
            options,
            vec![
                "Alaska", "Atlantic", "Central", "Eastern", "Hawaii", "Mountain", "Pacific", "UTC"
            ]
        );
    }

    #[test]
    fn default_is_pacific() {
        assert_eq!(TimezoneResolver::default_timezone().name(), "US/Pacific");
    }
}

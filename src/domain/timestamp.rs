use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

/// Date-time layouts the backend uses, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    FractionalWithOffset,
    WithOffset,
    FractionalUtc,
    Utc,
}

impl TimestampFormat {
    pub const ALL: [TimestampFormat; 4] = [
        TimestampFormat::FractionalWithOffset,
        TimestampFormat::WithOffset,
        TimestampFormat::FractionalUtc,
        TimestampFormat::Utc,
    ];

    fn parse_pattern(self) -> &'static str {
        match self {
            TimestampFormat::FractionalWithOffset => "%Y-%m-%dT%H:%M:%S%.f%z",
            TimestampFormat::WithOffset => "%Y-%m-%dT%H:%M:%S%z",
            TimestampFormat::FractionalUtc => "%Y-%m-%dT%H:%M:%S%.fZ",
            TimestampFormat::Utc => "%Y-%m-%dT%H:%M:%SZ",
        }
    }

    fn render_pattern(self) -> &'static str {
        match self {
            TimestampFormat::FractionalWithOffset => "%Y-%m-%dT%H:%M:%S%.6f%z",
            TimestampFormat::WithOffset => "%Y-%m-%dT%H:%M:%S%z",
            TimestampFormat::FractionalUtc => "%Y-%m-%dT%H:%M:%S%.6fZ",
            TimestampFormat::Utc => "%Y-%m-%dT%H:%M:%SZ",
        }
    }

    fn has_fraction(self) -> bool {
        matches!(
            self,
            TimestampFormat::FractionalWithOffset | TimestampFormat::FractionalUtc
        )
    }

    fn has_literal_utc_marker(self) -> bool {
        matches!(self, TimestampFormat::FractionalUtc | TimestampFormat::Utc)
    }

    /// Renders `value` in this layout. The `Z` layouts convert to UTC first.
    pub fn format(self, value: &DateTime<FixedOffset>) -> String {
        if self.has_literal_utc_marker() {
            value
                .with_timezone(&Utc)
                .format(self.render_pattern())
                .to_string()
        } else {
            value.format(self.render_pattern()).to_string()
        }
    }

    fn parse(self, raw: &str) -> Option<DateTime<FixedOffset>> {
        if self.has_fraction() && fraction_digits(raw) > MAX_FRACTION_DIGITS {
            return None;
        }

        if self.has_literal_utc_marker() {
            NaiveDateTime::parse_from_str(raw, self.parse_pattern())
                .ok()
                .map(|naive| naive.and_utc().fixed_offset())
        } else {
            DateTime::parse_from_str(raw, self.parse_pattern()).ok()
        }
    }
}

// The backend sends at most microsecond precision.
const MAX_FRACTION_DIGITS: usize = 6;

fn fraction_digits(raw: &str) -> usize {
    raw.split_once('.')
        .map(|(_, rest)| rest.chars().take_while(char::is_ascii_digit).count())
        .unwrap_or(0)
}

/// Parses a backend timestamp, trying every [`TimestampFormat`] in order.
///
/// Empty or unparseable input yields `None`; failures are logged, never raised.
pub fn parse_datetime(raw: &str) -> Option<DateTime<FixedOffset>> {
    if raw.is_empty() {
        return None;
    }

    let parsed = TimestampFormat::ALL
        .iter()
        .find_map(|format| format.parse(raw));

    if parsed.is_none() {
        tracing::warn!(value = raw, "unable to parse timestamp with any known format");
    }

    parsed
}

pub fn parse_optional_datetime(raw: Option<&str>) -> Option<DateTime<FixedOffset>> {
    raw.and_then(parse_datetime)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, FixedOffset, TimeZone, Utc};

    use super::{TimestampFormat, parse_datetime, parse_optional_datetime};

    fn at(offset_seconds: i32, micros: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(offset_seconds)
            .expect("offset should be valid")
            .with_ymd_and_hms(2021, 11, 14, 18, 32, 5)
            .single()
            .expect("instant should be unambiguous")
            + chrono::Duration::microseconds(i64::from(micros))
    }

    #[test]
    fn round_trips_all_formats() {
        let cases = [
            (TimestampFormat::FractionalWithOffset, at(3_600, 123_456)),
            (TimestampFormat::WithOffset, at(-5 * 3_600, 0)),
            (TimestampFormat::FractionalUtc, at(0, 500_000)),
            (TimestampFormat::Utc, at(7_200, 0)),
        ];

        for (format, instant) in cases {
            let rendered = format.format(&instant);
            assert_eq!(
                parse_datetime(&rendered),
                Some(instant),
                "round trip failed for {format:?} ({rendered})"
            );
        }
    }

    #[test]
    fn parses_literal_utc_marker_as_utc() {
        let parsed = parse_datetime("2021-11-14T18:32:05Z").expect("must parse");

        assert_eq!(parsed.offset().local_minus_utc(), 0);
        assert_eq!(
            parsed,
            Utc.with_ymd_and_hms(2021, 11, 14, 18, 32, 5).unwrap()
        );
    }

    #[test]
    fn parses_millisecond_fraction() {
        let parsed = parse_datetime("2021-11-14T18:32:05.250Z").expect("must parse");

        assert_eq!(parsed.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn rejects_fractions_beyond_microseconds() {
        assert_eq!(parse_datetime("2022-03-01T07:55:20.123456789Z"), None);
        assert_eq!(parse_datetime("2022-03-01T07:55:20.1234567+0100"), None);

        let micros = parse_datetime("2022-03-01T07:55:20.123456Z").expect("must parse");
        assert_eq!(micros.timestamp_subsec_micros(), 123_456);
    }

    #[test]
    fn keeps_explicit_offset() {
        let parsed = parse_datetime("2021-11-14T18:32:05+0100").expect("must parse");

        assert_eq!(parsed.offset().local_minus_utc(), 3_600);
        assert_eq!(
            parsed,
            Utc.with_ymd_and_hms(2021, 11, 14, 17, 32, 5).unwrap()
        );
    }

    #[test]
    fn empty_and_missing_input_yield_none() {
        assert_eq!(parse_datetime(""), None);
        assert_eq!(parse_optional_datetime(None), None);
        assert_eq!(parse_optional_datetime(Some("")), None);
    }

    #[test]
    fn unparseable_input_yields_none() {
        assert_eq!(parse_datetime("14.11.2021 18:32"), None);
        assert_eq!(parse_datetime("2021-11-14"), None);
    }
}

/// Trip timestamps as exported by the bike share operator, local wall clock time
/// eg. `2024-03-01 17:32:05.123`
pub mod timestamp_format {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{de, Deserializer};
    use std::fmt;

    const FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(TimestampVisitor)
    }

    /// Also takes RFC 3339 with an offset, keeping the local time and dropping the offset
    pub fn parse(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
            .or_else(|| {
                DateTime::parse_from_rfc3339(s)
                    .ok()
                    .map(|date_time| date_time.naive_local())
            })
    }

    struct TimestampVisitor;

    impl<'de> de::Visitor<'de> for TimestampVisitor {
        type Value = NaiveDateTime;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            write!(formatter, "timestamp formatted eg. \"2024-03-01 17:32:05.123\"")
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            parse(s).ok_or_else(|| de::Error::invalid_value(de::Unexpected::Str(s), &self))
        }
    }
}

/// Station short codes, surrounding whitespace is stripped so that both datasets join
pub mod station_id_format {
    use serde::{de, Deserializer};
    use station_traffic::traffic_data::StationId;
    use std::fmt;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<StationId, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(TrimmedStationId)
    }

    struct TrimmedStationId;

    impl<'de> de::Visitor<'de> for TrimmedStationId {
        type Value = StationId;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a station short code")
        }

        fn visit_str<E>(self, string: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(StationId::from(string.trim()))
        }
    }
}

use std::fmt;

use chrono::{NaiveTime, Timelike};
use serde::Serialize;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A minute within a day, 0 is midnight and 1439 is 23:59. Dates and
/// anything finer than a minute are dropped.
/// # Examples
/// ```rust
/// use station_traffic::time::MinuteOfDay;
/// assert_eq!(MinuteOfDay::from_hm(17, 30).minutes(), 1050);
/// assert_eq!(MinuteOfDay::from_hm(17, 30).to_string(), "5:30 PM");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize)]
pub struct MinuteOfDay(u16);

impl MinuteOfDay {
    pub const MIDNIGHT: MinuteOfDay = MinuteOfDay(0);

    /// `None` unless `minutes` is below 1440
    pub fn new(minutes: u16) -> Option<MinuteOfDay> {
        if minutes < MINUTES_PER_DAY {
            Some(MinuteOfDay(minutes))
        } else {
            None
        }
    }

    /// # Panics
    /// if the hour is over 23 or the minute over 59
    pub fn from_hm(hours: u16, minutes: u16) -> MinuteOfDay {
        assert!(hours < 24 && minutes < 60, "{}:{} is not a clock time", hours, minutes);
        MinuteOfDay(hours * 60 + minutes)
    }

    /// The clock minute of anything with a time of day, eg. a `NaiveDateTime`
    pub fn of<T: Timelike>(time: &T) -> MinuteOfDay {
        // hour() < 24 and minute() < 60 so this can't overflow the day
        MinuteOfDay((time.hour() * 60 + time.minute()) as u16)
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    /// Absolute difference in minutes, without wrapping around midnight
    pub fn distance(self, other: MinuteOfDay) -> u16 {
        if self.0 > other.0 {
            self.0 - other.0
        } else {
            other.0 - self.0
        }
    }

    fn hour(self) -> u32 {
        u32::from(self.0 / 60)
    }

    fn minute(self) -> u32 {
        u32::from(self.0 % 60)
    }
}

/// Short 12 hour clock time eg. "5:30 PM"
impl fmt::Display for MinuteOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match NaiveTime::from_hms_opt(self.hour(), self.minute(), 0) {
            Some(time) => write!(f, "{}", time.format("%-I:%M %p")),
            None => Err(fmt::Error),
        }
    }
}

/// Minutes since midnight of a timestamp, ignoring the date, seconds and below
pub fn minutes_since_midnight<T: Timelike>(timestamp: &T) -> MinuteOfDay {
    MinuteOfDay::of(timestamp)
}

/// Renders a minute of the day as a short clock time, independent of any date
pub fn format_time(minutes: MinuteOfDay) -> String {
    minutes.to_string()
}

/// Which trips count towards station traffic, set from the time slider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeFilter {
    /// every trip counts
    Any,
    /// only trips starting or ending near this time count
    Around(MinuteOfDay),
}

impl TimeFilter {
    /// The slider value which disables filtering
    pub const SLIDER_ANY: i32 = -1;

    pub fn is_active(&self) -> bool {
        matches!(self, TimeFilter::Around(_))
    }

    /// Text shown next to the slider
    pub fn label(&self) -> String {
        match self {
            TimeFilter::Any => "(any time)".to_owned(),
            TimeFilter::Around(minute) => format_time(*minute),
        }
    }

    /// Value to put the slider at to show this filter
    pub fn slider_value(&self) -> i32 {
        match self {
            TimeFilter::Any => Self::SLIDER_ANY,
            TimeFilter::Around(minute) => i32::from(minute.minutes()),
        }
    }
}

impl Default for TimeFilter {
    fn default() -> Self {
        TimeFilter::Any
    }
}

impl TryFrom<i32> for TimeFilter {
    type Error = TimeFilterError;

    /// Interprets a raw slider value
    fn try_from(value: i32) -> Result<Self, Self::Error> {
        if value == Self::SLIDER_ANY {
            return Ok(TimeFilter::Any);
        }
        u16::try_from(value)
            .ok()
            .and_then(MinuteOfDay::new)
            .map(TimeFilter::Around)
            .ok_or(TimeFilterError::OutOfRange(value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeFilterError {
    OutOfRange(i32),
}

impl fmt::Display for TimeFilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFilterError::OutOfRange(value) => write!(
                f,
                "slider value {} is neither {} nor a minute of the day",
                value,
                TimeFilter::SLIDER_ANY
            ),
        }
    }
}

impl std::error::Error for TimeFilterError {}

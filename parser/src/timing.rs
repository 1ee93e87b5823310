use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::reader::{Reader, ReaderError};

const ARROW: &str = "-->";

/// `HH:MM:SS,mmm`. Fields are not range checked; any digit width is accepted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Time {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub milliseconds: u32,
}

impl Time {
    #[must_use]
    pub const fn new(hours: u32, minutes: u32, seconds: u32, milliseconds: u32) -> Self {
        Self { hours, minutes, seconds, milliseconds }
    }

    #[must_use]
    pub fn as_duration(&self) -> Duration {
        let seconds = u64::from(self.hours) * 3_600 + u64::from(self.minutes) * 60 + u64::from(self.seconds);
        Duration::from_secs(seconds) + Duration::from_millis(u64::from(self.milliseconds))
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02},{:03}",
               self.hours,
               self.minutes,
               self.seconds,
               self.milliseconds,
        )
    }
}

impl FromStr for Time {
    type Err = ReaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut reader = Reader::new(s);
        let time = read_time(&mut reader)?;
        reader.expect_end()?;
        Ok(time)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timing {
    pub start: Time,
    pub end: Time,
}

impl Timing {
    #[must_use]
    pub const fn new(start: Time, end: Time) -> Self {
        Self { start, end }
    }

    /// Display duration; zero for inverted ranges.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end.as_duration().saturating_sub(self.start.as_duration())
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {ARROW} {}", self.start, self.end)
    }
}

impl FromStr for Timing {
    type Err = ReaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut reader = Reader::new(s);
        let timing = read_timing(&mut reader)?;
        reader.expect_end()?;
        Ok(timing)
    }
}

pub fn read_time(reader: &mut Reader) -> Result<Time, ReaderError> {
    let hours = reader.read_integer()?;
    reader.expect_str(":")?;
    let minutes = reader.read_integer()?;
    reader.expect_str(":")?;
    let seconds = reader.read_integer()?;
    reader.expect_str(",")?;
    let milliseconds = reader.read_integer()?;
    Ok(Time { hours, minutes, seconds, milliseconds })
}

pub fn read_timing(reader: &mut Reader) -> Result<Timing, ReaderError> {
    let start = read_time(reader)?;
    reader.expect_horizontal_whitespace()?;
    reader.expect_str(ARROW)?;
    reader.expect_horizontal_whitespace()?;
    let end = read_time(reader)?;
    Ok(Timing { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time() {
        let mut reader = Reader::new("12:34:56,789");
        assert_eq!(read_time(&mut reader), Ok(Time::new(12, 34, 56, 789)));
        assert!(reader.is_end());
    }

    #[test]
    fn time_accepts_any_width() {
        assert_eq!("1:2:3,4".parse::<Time>(), Ok(Time::new(1, 2, 3, 4)));
        assert_eq!("123:75:99,1000".parse::<Time>(), Ok(Time::new(123, 75, 99, 1000)));
    }

    #[test]
    fn time_is_printed_zero_padded() {
        assert_eq!(Time::new(1, 2, 3, 4).to_string(), "01:02:03,004");
        assert_eq!(Time::new(123, 75, 99, 1000).to_string(), "123:75:99,1000");
    }

    #[test]
    fn time_failure_stops_at_offending_char() {
        let mut reader = Reader::new("12:34;56.789");
        assert_eq!(read_time(&mut reader), Err(ReaderError::ExpectedToken { pos: 5, expected: ":" }));
        assert_eq!(reader.remaining(), ";56.789");
    }

    #[test]
    fn timing() {
        let mut reader = Reader::new("12:34:56,789 --> 23:45:67,890");
        let expected = Timing::new(Time::new(12, 34, 56, 789), Time::new(23, 45, 67, 890));
        assert_eq!(read_timing(&mut reader), Ok(expected));
        assert!(reader.is_end());
        assert_eq!(expected.to_string(), "12:34:56,789 --> 23:45:67,890");
    }

    #[test]
    fn timing_allows_wide_gaps() {
        assert_eq!(
            "0:0:1,0 \t-->  0:0:2,500".parse::<Timing>(),
            Ok(Timing::new(Time::new(0, 0, 1, 0), Time::new(0, 0, 2, 500)))
        );
    }

    #[test]
    fn timing_failure() {
        let mut reader = Reader::new("12:34:56,789 --> ");
        assert_eq!(read_timing(&mut reader), Err(ReaderError::InvalidInt { pos: 17 }));
        assert_eq!(reader.remaining(), "");

        let mut reader = Reader::new("12:34;56.789");
        assert!(read_timing(&mut reader).is_err());
        assert_eq!(reader.remaining(), ";56.789");
    }

    #[test]
    fn durations() {
        let timing = Timing::new(Time::new(0, 2, 17, 440), Time::new(0, 2, 20, 375));
        assert_eq!(timing.start.as_duration(), Duration::from_millis(137_440));
        assert_eq!(timing.duration(), Duration::from_millis(2_935));
        let inverted = Timing::new(timing.end, timing.start);
        assert_eq!(inverted.duration(), Duration::ZERO);
    }
}

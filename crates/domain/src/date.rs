use chrono::prelude::*;
use serde::{de::Visitor, Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// A calendar date with day granularity and no timezone, the unit at which
/// dose outcomes are recorded. Formats as zero-padded `YYYY-MM-DD`, parses
/// unpadded components as well.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Day {
    year: i32,
    month: u32,
    day: u32,
}

#[derive(Error, Debug)]
pub enum InvalidDayError {
    #[error("Day: {0} is malformed, expected YYYY-MM-DD")]
    Malformed(String),
}

impl Day {
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, InvalidDayError> {
        if !(1970..=2100).contains(&year) || !(1..=12).contains(&month) {
            return Err(InvalidDayError::Malformed(format!(
                "{}-{}-{}",
                year, month, day
            )));
        }
        if day < 1 || day > month_length(year, month) {
            return Err(InvalidDayError::Malformed(format!(
                "{}-{}-{}",
                year, month, day
            )));
        }
        Ok(Self { year, month, day })
    }

    /// The UTC calendar date containing the given unix timestamp.
    pub fn from_timestamp_millis(timestamp_millis: i64) -> Self {
        let date = Utc.timestamp_millis(timestamp_millis).date();
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }

    /// Weekday index with `0 = Sunday` up to `6 = Saturday`.
    pub fn weekday_index(&self) -> u32 {
        self.date().weekday().num_days_from_sunday()
    }

    /// Advances to the next calendar day.
    pub fn inc(&mut self) {
        if self.day == month_length(self.year, self.month) {
            self.day = 1;
            if self.month == 12 {
                self.month = 1;
                self.year += 1;
            } else {
                self.month += 1;
            }
        } else {
            self.day += 1;
        }
    }

    /// Whether `self` is exactly the calendar day after `other`.
    pub fn is_day_after(&self, other: &Day) -> bool {
        let mut next = other.clone();
        next.inc();
        *self == next
    }

    /// Unix timestamp in millis of the given time of day on this date (UTC).
    pub fn timestamp_millis_at(&self, time: &TimeOfDay) -> i64 {
        self.date()
            .and_hms(time.hours, time.minutes, 0)
            .timestamp_millis()
    }

    fn date(&self) -> Date<Utc> {
        Utc.ymd(self.year, self.month, self.day)
    }
}

impl FromStr for Day {
    type Err = InvalidDayError;

    fn from_str(datestr: &str) -> Result<Self, Self::Err> {
        let parts = datestr.split('-').collect::<Vec<_>>();
        if parts.len() != 3 {
            return Err(InvalidDayError::Malformed(datestr.to_string()));
        }
        let year = parts[0].parse::<i32>();
        let month = parts[1].parse::<u32>();
        let day = parts[2].parse::<u32>();
        match (year, month, day) {
            (Ok(year), Ok(month), Ok(day)) => Day::new(year, month, day)
                .map_err(|_| InvalidDayError::Malformed(datestr.to_string())),
            _ => Err(InvalidDayError::Malformed(datestr.to_string())),
        }
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl Serialize for Day {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Day {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct DayVisitor;

        impl<'de> Visitor<'de> for DayVisitor {
            type Value = Day;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("A date string in YYYY-MM-DD format")
            }

            fn visit_str<E>(self, value: &str) -> Result<Day, E>
            where
                E: serde::de::Error,
            {
                value.parse::<Day>().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(DayVisitor)
    }
}

fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 100 != 0 && year % 4 == 0)
}

// month: January -> 1
fn month_length(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => panic!("Invalid month"),
    }
}

/// A wall-clock time of day in 24 hour format, e.g. the `08:30` at which a
/// reminder fires.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay {
    hours: u32,
    minutes: u32,
}

#[derive(Error, Debug)]
pub enum InvalidTimeError {
    #[error("Time: {0} is malformed, expected HH:MM in 24 hour format")]
    Malformed(String),
}

impl TimeOfDay {
    pub fn new(hours: u32, minutes: u32) -> Result<Self, InvalidTimeError> {
        if hours > 23 || minutes > 59 {
            return Err(InvalidTimeError::Malformed(format!(
                "{}:{}",
                hours, minutes
            )));
        }
        Ok(Self { hours, minutes })
    }

    pub fn minutes_since_midnight(&self) -> i64 {
        (self.hours * 60 + self.minutes) as i64
    }
}

impl FromStr for TimeOfDay {
    type Err = InvalidTimeError;

    fn from_str(timestr: &str) -> Result<Self, Self::Err> {
        let parts = timestr.split(':').collect::<Vec<_>>();
        if parts.len() != 2 || parts[0].is_empty() || parts[0].len() > 2 || parts[1].len() != 2 {
            return Err(InvalidTimeError::Malformed(timestr.to_string()));
        }
        match (parts[0].parse::<u32>(), parts[1].parse::<u32>()) {
            (Ok(hours), Ok(minutes)) => TimeOfDay::new(hours, minutes)
                .map_err(|_| InvalidTimeError::Malformed(timestr.to_string())),
            _ => Err(InvalidTimeError::Malformed(timestr.to_string())),
        }
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct TimeOfDayVisitor;

        impl<'de> Visitor<'de> for TimeOfDayVisitor {
            type Value = TimeOfDay;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("A time string in HH:MM 24 hour format")
            }

            fn visit_str<E>(self, value: &str) -> Result<TimeOfDay, E>
            where
                E: serde::de::Error,
            {
                value.parse::<TimeOfDay>().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(TimeOfDayVisitor)
    }
}

/// Minutes elapsed since midnight (UTC) for the given unix timestamp.
pub fn minutes_since_midnight_of(timestamp_millis: i64) -> i64 {
    (timestamp_millis / (1000 * 60)) % (24 * 60)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_accepts_valid_dates() {
        let valid_dates = vec![
            "2018-1-1",
            "2025-12-31",
            "2020-1-12",
            "2020-2-29",
            "2020-02-2",
            "2020-02-02",
            "2020-2-09",
        ];

        for date in &valid_dates {
            assert!(date.parse::<Day>().is_ok());
        }
    }

    #[test]
    fn it_rejects_invalid_dates() {
        let invalid_dates = vec![
            "2018--1-1",
            "2020-1-32",
            "2020-2-30",
            "2021-2-29",
            "2020-0-1",
            "2020-1-0",
            "20201-1",
        ];

        for date in &invalid_dates {
            assert!(date.parse::<Day>().is_err());
        }
    }

    #[test]
    fn it_formats_days_zero_padded() {
        let day: Day = "2021-2-1".parse().unwrap();
        assert_eq!(day.to_string(), "2021-02-01");
    }

    #[test]
    fn day_sanity_tests() {
        let mut day = Day::new(2021, 1, 1).unwrap();
        day.inc();
        assert_eq!(day, Day::new(2021, 1, 2).unwrap());

        let mut day = Day::new(2021, 1, 31).unwrap();
        day.inc();
        assert_eq!(day, Day::new(2021, 2, 1).unwrap());

        let mut day = Day::new(2021, 12, 31).unwrap();
        day.inc();
        assert_eq!(day, Day::new(2022, 1, 1).unwrap());
        for _ in 0..365 {
            day.inc();
        }
        assert_eq!(day, Day::new(2023, 1, 1).unwrap());
    }

    #[test]
    fn it_computes_weekday_indices() {
        // 2021-02-21 was a Sunday
        let day = Day::new(2021, 2, 21).unwrap();
        assert_eq!(day.weekday_index(), 0);
        let day = Day::new(2021, 2, 22).unwrap();
        assert_eq!(day.weekday_index(), 1);
        let day = Day::new(2021, 2, 27).unwrap();
        assert_eq!(day.weekday_index(), 6);
    }

    #[test]
    fn it_detects_adjacent_days() {
        let first = Day::new(2021, 1, 31).unwrap();
        let second = Day::new(2021, 2, 1).unwrap();
        assert!(second.is_day_after(&first));
        assert!(!first.is_day_after(&second));
        assert!(!second.is_day_after(&second));
    }

    #[test]
    fn it_accepts_valid_times() {
        let valid_times = vec!["00:00", "0:00", "8:30", "08:30", "19:59", "23:59"];
        for time in &valid_times {
            assert!(time.parse::<TimeOfDay>().is_ok());
        }
    }

    #[test]
    fn it_rejects_invalid_times() {
        let invalid_times = vec!["24:00", "8:5", "8:60", "830", "08:300", ":30", "8:3a", ""];
        for time in &invalid_times {
            assert!(time.parse::<TimeOfDay>().is_err());
        }
    }

    #[test]
    fn it_computes_minutes_since_midnight() {
        let time: TimeOfDay = "08:30".parse().unwrap();
        assert_eq!(time.minutes_since_midnight(), 8 * 60 + 30);

        // 1613894430000 is 2021-02-21 08:00:30 UTC
        assert_eq!(minutes_since_midnight_of(1613894430000), 8 * 60);
        assert_eq!(minutes_since_midnight_of(0), 0);
    }

    #[test]
    fn it_converts_timestamps_to_days() {
        // 2021-02-21 08:00:30 UTC
        let day = Day::from_timestamp_millis(1613894430000);
        assert_eq!(day, Day::new(2021, 2, 21).unwrap());
        // one millisecond before midnight stays on the previous day
        let day = Day::from_timestamp_millis(1613951999999);
        assert_eq!(day, Day::new(2021, 2, 21).unwrap());
        let day = Day::from_timestamp_millis(1613952000000);
        assert_eq!(day, Day::new(2021, 2, 22).unwrap());
    }
}

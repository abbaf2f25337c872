//! Temporal constraint families.
//!
//! Every family is evaluated against [`Condition::Time`]. Date-time ranges
//! compare the full timestamp, time-of-day families compare only the
//! clock time, and date families only the calendar date.
//!
//! Decomposition divides the elapsed span into `n` contiguous parts of
//! equal length; the integer-division remainder is absorbed into the last
//! part's end, so the parts always cover the original range exactly.

use std::fmt;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::Constraint;
use crate::decompose::{split_even, Decomposer};
use crate::error::{ConstraintError, DecomposeError};
use crate::models::Condition;

fn parse_time(input: &str) -> Result<NaiveTime, ConstraintError> {
    NaiveTime::parse_from_str(input, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M"))
        .map_err(|e| ConstraintError::Parse {
            input: input.to_string(),
            reason: e.to_string(),
        })
}

fn parse_date(input: &str) -> Result<NaiveDate, ConstraintError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|e| ConstraintError::Parse {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

fn inverted(start: impl fmt::Display, end: impl fmt::Display) -> ConstraintError {
    ConstraintError::InvertedRange {
        start: start.to_string(),
        end: end.to_string(),
    }
}

/// Clock-time window test: `t == start` or `start < t < end`.
fn in_clock_window(t: NaiveTime, start: NaiveTime, end: NaiveTime) -> bool {
    t == start || (start < t && t < end)
}

/// Splits a clock-time window into `scale` second-aligned parts.
fn split_clock(
    start: NaiveTime,
    end: NaiveTime,
    scale: i32,
) -> Result<Vec<(NaiveTime, NaiveTime)>, DecomposeError> {
    let total = end.signed_duration_since(start).num_seconds();
    Ok(split_even(total, scale)?
        .into_iter()
        .map(|(offset, length)| {
            let from = start + Duration::seconds(offset);
            (from, from + Duration::seconds(length))
        })
        .collect())
}

/// A date-time range `[start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeRange")]
pub struct TimeRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

#[derive(Deserialize)]
struct RawTimeRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TryFrom<RawTimeRange> for TimeRange {
    type Error = ConstraintError;

    fn try_from(raw: RawTimeRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl TimeRange {
    /// Creates a range; `start` must be strictly before `end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, ConstraintError> {
        if start >= end {
            return Err(inverted(start, end));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn satisfy(&self, condition: &Condition) -> bool {
        condition
            .as_time()
            .is_some_and(|t| self.start <= *t && *t < self.end)
    }
}

impl Decomposer<Constraint> for TimeRange {
    fn trivial_decompose(&self) -> Vec<Constraint> {
        vec![Constraint::TimeRange(self.clone())]
    }

    /// Millisecond-aligned equal parts.
    fn scale_decompose(&self, scale: i32) -> Result<Vec<Constraint>, DecomposeError> {
        if scale == 1 {
            return Ok(self.trivial_decompose());
        }
        split_even(self.duration().num_milliseconds(), scale)?
            .into_iter()
            .map(|(offset, length)| {
                let from = self.start + Duration::milliseconds(offset);
                let to = from + Duration::milliseconds(length);
                Ok(Constraint::TimeRange(TimeRange::new(from, to)?))
            })
            .collect()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeRange[{} .. {})", self.start, self.end)
    }
}

/// A clock time with a tolerance of `shift` minutes on either side.
///
/// The window `[time - shift, time + shift]` must stay within one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTemporalPoint")]
pub struct TemporalPoint {
    start: NaiveTime,
    end: NaiveTime,
    shift_minutes: i64,
}

#[derive(Deserialize)]
struct RawTemporalPoint {
    start: NaiveTime,
    end: NaiveTime,
    shift_minutes: i64,
}

impl TryFrom<RawTemporalPoint> for TemporalPoint {
    type Error = ConstraintError;

    /// Rebuilds the window from its start and shift; `end` must agree.
    fn try_from(raw: RawTemporalPoint) -> Result<Self, Self::Error> {
        if raw.shift_minutes < 0 {
            return Err(inverted(raw.start, raw.end));
        }
        let (time, wrapped) = raw
            .start
            .overflowing_add_signed(Duration::minutes(raw.shift_minutes));
        let point = Self::new(time, raw.shift_minutes)?;
        if wrapped != 0 || point.end != raw.end {
            return Err(inverted(raw.start, raw.end));
        }
        Ok(point)
    }
}

impl TemporalPoint {
    pub fn new(time: NaiveTime, shift_minutes: i64) -> Result<Self, ConstraintError> {
        if shift_minutes < 0 {
            return Err(inverted(
                format!("{time} + {shift_minutes}min"),
                format!("{time} - {shift_minutes}min"),
            ));
        }
        let shift = Duration::minutes(shift_minutes);
        let (start, wrap_start) = time.overflowing_sub_signed(shift);
        let (end, wrap_end) = time.overflowing_add_signed(shift);
        if wrap_start != 0 || wrap_end != 0 {
            return Err(ConstraintError::WindowWrapsDay {
                time: time.to_string(),
                shift_minutes,
            });
        }
        Ok(Self {
            start,
            end,
            shift_minutes,
        })
    }

    /// Parses `"HH:MM"` or `"HH:MM:SS"`.
    pub fn parse(time: &str, shift_minutes: i64) -> Result<Self, ConstraintError> {
        Self::new(parse_time(time)?, shift_minutes)
    }

    fn from_window(
        start: NaiveTime,
        end: NaiveTime,
        shift_minutes: i64,
    ) -> Result<Self, ConstraintError> {
        if start > end {
            return Err(inverted(start, end));
        }
        Ok(Self {
            start,
            end,
            shift_minutes,
        })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn shift_minutes(&self) -> i64 {
        self.shift_minutes
    }

    pub fn satisfy(&self, condition: &Condition) -> bool {
        condition
            .as_time()
            .is_some_and(|t| in_clock_window(t.time(), self.start, self.end))
    }
}

impl Decomposer<Constraint> for TemporalPoint {
    fn trivial_decompose(&self) -> Vec<Constraint> {
        vec![Constraint::TemporalPoint(self.clone())]
    }

    fn scale_decompose(&self, scale: i32) -> Result<Vec<Constraint>, DecomposeError> {
        if scale == 1 {
            return Ok(self.trivial_decompose());
        }
        split_clock(self.start, self.end, scale)?
            .into_iter()
            .map(|(from, to)| {
                Ok(Constraint::TemporalPoint(TemporalPoint::from_window(
                    from,
                    to,
                    self.shift_minutes,
                )?))
            })
            .collect()
    }
}

impl fmt::Display for TemporalPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TemporalPoint[{} .. {}) shift={}min",
            self.start, self.end, self.shift_minutes
        )
    }
}

/// A clock-time interval within one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTemporalInterval")]
pub struct TemporalInterval {
    start: NaiveTime,
    end: NaiveTime,
}

#[derive(Deserialize)]
struct RawTemporalInterval {
    start: NaiveTime,
    end: NaiveTime,
}

impl TryFrom<RawTemporalInterval> for TemporalInterval {
    type Error = ConstraintError;

    fn try_from(raw: RawTemporalInterval) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl TemporalInterval {
    /// Creates an interval; `end` may equal but not precede `start`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, ConstraintError> {
        if end < start {
            return Err(inverted(start, end));
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, ConstraintError> {
        Self::new(parse_time(start)?, parse_time(end)?)
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn satisfy(&self, condition: &Condition) -> bool {
        condition
            .as_time()
            .is_some_and(|t| in_clock_window(t.time(), self.start, self.end))
    }
}

impl Decomposer<Constraint> for TemporalInterval {
    fn trivial_decompose(&self) -> Vec<Constraint> {
        vec![Constraint::TemporalInterval(self.clone())]
    }

    fn scale_decompose(&self, scale: i32) -> Result<Vec<Constraint>, DecomposeError> {
        if scale == 1 {
            return Ok(self.trivial_decompose());
        }
        split_clock(self.start, self.end, scale)?
            .into_iter()
            .map(|(from, to)| Ok(Constraint::TemporalInterval(TemporalInterval::new(from, to)?)))
            .collect()
    }
}

impl fmt::Display for TemporalInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TemporalInterval[{} .. {})", self.start, self.end)
    }
}

/// Splits `[start, end)` into `scale` day-aligned intervals.
fn split_dates(
    start: NaiveDate,
    end: NaiveDate,
    scale: i32,
) -> Result<Vec<Constraint>, DecomposeError> {
    split_even((end - start).num_days(), scale)?
        .into_iter()
        .map(|(offset, length)| {
            let from = start + Duration::days(offset);
            let to = from + Duration::days(length);
            Ok(Constraint::DateInterval(DateInterval::new(from, to)?))
        })
        .collect()
}

/// Work must happen before a deadline date.
///
/// The issue date is fixed at construction and starts the effective range
/// `[issued, end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDateDeadline")]
pub struct DateDeadline {
    issued: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateDeadline {
    issued: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateDeadline> for DateDeadline {
    type Error = ConstraintError;

    /// Keeps the stored issue date rather than today's.
    fn try_from(raw: RawDateDeadline) -> Result<Self, Self::Error> {
        Self::issued_on(raw.end, raw.issued)
    }
}

impl DateDeadline {
    /// Creates a deadline issued today (local time).
    pub fn new(end: NaiveDate) -> Result<Self, ConstraintError> {
        Self::issued_on(end, Local::now().date_naive())
    }

    /// Creates a deadline with an explicit issue date.
    pub fn issued_on(end: NaiveDate, today: NaiveDate) -> Result<Self, ConstraintError> {
        if end < today {
            return Err(ConstraintError::DeadlineInPast { end, today });
        }
        Ok(Self { issued: today, end })
    }

    /// Parses `"YYYY-MM-DD"`, issued today.
    pub fn parse(end: &str) -> Result<Self, ConstraintError> {
        Self::new(parse_date(end)?)
    }

    pub fn issued(&self) -> NaiveDate {
        self.issued
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn satisfy(&self, condition: &Condition) -> bool {
        condition.as_time().is_some_and(|t| {
            let d = t.date();
            self.issued <= d && d < self.end
        })
    }
}

impl Decomposer<Constraint> for DateDeadline {
    fn trivial_decompose(&self) -> Vec<Constraint> {
        vec![Constraint::DateDeadline(self.clone())]
    }

    /// Contiguous [`DateInterval`]s from the issue date to the deadline.
    fn scale_decompose(&self, scale: i32) -> Result<Vec<Constraint>, DecomposeError> {
        if scale == 1 {
            return Ok(self.trivial_decompose());
        }
        split_dates(self.issued, self.end, scale)
    }
}

impl fmt::Display for DateDeadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deadline({}, issued {})", self.end, self.issued)
    }
}

/// A date range `[start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDateInterval")]
pub struct DateInterval {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateInterval {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateInterval> for DateInterval {
    type Error = ConstraintError;

    fn try_from(raw: RawDateInterval) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl DateInterval {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ConstraintError> {
        if start > end {
            return Err(inverted(start, end));
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, ConstraintError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn satisfy(&self, condition: &Condition) -> bool {
        condition.as_time().is_some_and(|t| {
            let d = t.date();
            self.start <= d && d < self.end
        })
    }
}

impl Decomposer<Constraint> for DateInterval {
    fn trivial_decompose(&self) -> Vec<Constraint> {
        vec![Constraint::DateInterval(self.clone())]
    }

    fn scale_decompose(&self, scale: i32) -> Result<Vec<Constraint>, DecomposeError> {
        if scale == 1 {
            return Ok(self.trivial_decompose());
        }
        split_dates(self.start, self.end, scale)
    }
}

impl fmt::Display for DateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DateInterval[{} .. {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(d: NaiveDate, h: u32, min: u32) -> Condition {
        Condition::Time(d.and_hms_opt(h, min, 0).unwrap())
    }

    fn clock(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_time_range_half_open() {
        let day = date(2030, 5, 1);
        let range = TimeRange::new(
            day.and_hms_opt(8, 0, 0).unwrap(),
            day.and_hms_opt(12, 0, 0).unwrap(),
        )
        .unwrap();
        assert!(range.satisfy(&at(day, 8, 0)));
        assert!(range.satisfy(&at(day, 11, 59)));
        assert!(!range.satisfy(&at(day, 12, 0)));
        assert!(!range.satisfy(&Condition::Scalar(0.0)));
        assert!(TimeRange::new(range.end(), range.start()).is_err());
        assert!(TimeRange::new(range.start(), range.start()).is_err());
    }

    #[test]
    fn test_time_range_decompose_contiguous() {
        let day = date(2030, 5, 1);
        let range = TimeRange::new(
            day.and_hms_opt(0, 0, 0).unwrap(),
            day.and_hms_opt(0, 0, 10).unwrap(),
        )
        .unwrap();
        let parts = range.scale_decompose(3).unwrap();
        assert_eq!(parts.len(), 3);
        let mut cursor = range.start();
        let mut total = Duration::zero();
        for part in &parts {
            match part {
                Constraint::TimeRange(p) => {
                    assert_eq!(p.start(), cursor);
                    total = total + p.duration();
                    cursor = p.end();
                }
                _ => panic!("wrong variant"),
            }
        }
        assert_eq!(cursor, range.end());
        assert_eq!(total, range.duration());
        match &parts[2] {
            Constraint::TimeRange(last) => {
                assert_eq!(last.duration().num_milliseconds(), 3334)
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_scale_errors() {
        let day = date(2030, 5, 1);
        let range = TimeRange::new(
            day.and_hms_opt(0, 0, 0).unwrap(),
            day.and_hms_opt(1, 0, 0).unwrap(),
        )
        .unwrap();
        assert_eq!(range.scale_decompose(-1), Err(DecomposeError::InvalidScale(-1)));
        assert_eq!(range.scale_decompose(0), Err(DecomposeError::InvalidScale(0)));
        assert_eq!(range.scale_decompose(1).unwrap(), range.trivial_decompose());
    }

    #[test]
    fn test_temporal_point_window() {
        let tp = TemporalPoint::parse("12:00", 30).unwrap();
        assert_eq!(tp.start(), clock(11, 30));
        assert_eq!(tp.end(), clock(12, 30));
        let day = date(2030, 1, 1);
        assert!(tp.satisfy(&at(day, 11, 30)));
        assert!(tp.satisfy(&at(day, 12, 29)));
        assert!(!tp.satisfy(&at(day, 12, 30)));
        assert!(!tp.satisfy(&at(day, 11, 29)));
    }

    #[test]
    fn test_temporal_point_rejects_wrap() {
        match TemporalPoint::parse("00:10", 30) {
            Err(ConstraintError::WindowWrapsDay { shift_minutes, .. }) => {
                assert_eq!(shift_minutes, 30)
            }
            _ => panic!("expected wrap error"),
        }
        assert!(TemporalPoint::parse("23:50", 15).is_err());
        assert!(TemporalPoint::parse("noon", 15).is_err());
    }

    #[test]
    fn test_temporal_point_decompose() {
        let tp = TemporalPoint::parse("12:00", 30).unwrap();
        let parts = tp.scale_decompose(4).unwrap();
        assert_eq!(parts.len(), 4);
        match (&parts[0], &parts[3]) {
            (Constraint::TemporalPoint(first), Constraint::TemporalPoint(last)) => {
                assert_eq!(first.start(), clock(11, 30));
                assert_eq!(first.end(), clock(11, 45));
                assert_eq!(last.end(), clock(12, 30));
                assert_eq!(last.shift_minutes(), 30);
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_temporal_interval() {
        let ti = TemporalInterval::parse("08:00", "17:00").unwrap();
        let day = date(2030, 1, 1);
        assert!(ti.satisfy(&at(day, 8, 0)));
        assert!(ti.satisfy(&at(day, 16, 59)));
        assert!(!ti.satisfy(&at(day, 17, 0)));
        assert!(TemporalInterval::parse("17:00", "08:00").is_err());
        assert!(TemporalInterval::new(clock(9, 0), clock(9, 0)).is_ok());

        let parts = ti.scale_decompose(2).unwrap();
        match &parts[1] {
            Constraint::TemporalInterval(p) => {
                assert_eq!(p.start(), clock(12, 30));
                assert_eq!(p.end(), clock(17, 0));
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_empty_interval_cannot_split() {
        let ti = TemporalInterval::new(clock(9, 0), clock(9, 0)).unwrap();
        match ti.scale_decompose(2) {
            Err(DecomposeError::InvalidSubRange { scale, .. }) => assert_eq!(scale, 2),
            _ => panic!("expected sub-range error"),
        }
    }

    #[test]
    fn test_deadline_decompose_far_future() {
        let deadline = DateDeadline::parse("2099-01-01").unwrap();
        let parts = deadline.scale_decompose(4).unwrap();
        assert_eq!(parts.len(), 4);
        let mut cursor = deadline.issued();
        for part in &parts {
            match part {
                Constraint::DateInterval(iv) => {
                    assert_eq!(iv.start(), cursor);
                    assert!(iv.end() > iv.start());
                    cursor = iv.end();
                }
                _ => panic!("wrong variant"),
            }
        }
        assert_eq!(cursor, date(2099, 1, 1));
    }

    #[test]
    fn test_deadline_in_past() {
        let today = date(2030, 6, 1);
        match DateDeadline::issued_on(date(2030, 5, 31), today) {
            Err(ConstraintError::DeadlineInPast { end, .. }) => assert_eq!(end, date(2030, 5, 31)),
            _ => panic!("expected past deadline"),
        }
        let dl = DateDeadline::issued_on(date(2030, 6, 11), today).unwrap();
        assert!(dl.satisfy(&at(date(2030, 6, 1), 0, 0)));
        assert!(dl.satisfy(&at(date(2030, 6, 10), 23, 59)));
        assert!(!dl.satisfy(&at(date(2030, 6, 11), 0, 0)));
        assert!(!dl.satisfy(&at(date(2030, 5, 31), 12, 0)));
    }

    #[test]
    fn test_date_interval_remainder() {
        let iv = DateInterval::parse("2030-01-01", "2030-01-11").unwrap();
        assert_eq!(iv.days(), 10);
        let parts = iv.scale_decompose(3).unwrap();
        let days: Vec<i64> = parts
            .iter()
            .map(|p| match p {
                Constraint::DateInterval(d) => d.days(),
                _ => panic!("wrong variant"),
            })
            .collect();
        assert_eq!(days, vec![3, 3, 4]);
        assert!(DateInterval::parse("2030-01-11", "2030-01-01").is_err());
        assert!(iv.scale_decompose(11).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let inverted = r#"{"start":"2024-01-02T00:00:00","end":"2024-01-01T00:00:00"}"#;
        assert!(serde_json::from_str::<TimeRange>(inverted).is_err());
        let empty = r#"{"start":"2024-01-01T00:00:00","end":"2024-01-01T00:00:00"}"#;
        assert!(serde_json::from_str::<TimeRange>(empty).is_err());

        let clock = r#"{"start":"18:00:00","end":"09:00:00"}"#;
        assert!(serde_json::from_str::<TemporalInterval>(clock).is_err());
        let dates = r#"{"start":"2024-03-10","end":"2024-03-01"}"#;
        assert!(serde_json::from_str::<DateInterval>(dates).is_err());
        let deadline = r#"{"issued":"2024-03-10","end":"2024-03-01"}"#;
        assert!(serde_json::from_str::<DateDeadline>(deadline).is_err());

        // end disagrees with start + 2 * shift
        let point = r#"{"start":"11:30:00","end":"13:00:00","shift_minutes":30}"#;
        assert!(serde_json::from_str::<TemporalPoint>(point).is_err());
        let negative = r#"{"start":"12:30:00","end":"11:30:00","shift_minutes":-30}"#;
        assert!(serde_json::from_str::<TemporalPoint>(negative).is_err());
    }

    #[test]
    fn test_serde_keeps_valid_ranges() {
        let point = TemporalPoint::new(clock(12, 0), 30).unwrap();
        let back: TemporalPoint = serde_json::from_str(&serde_json::to_string(&point).unwrap()).unwrap();
        assert_eq!(back, point);

        let deadline = DateDeadline::issued_on(date(2024, 3, 20), date(2024, 3, 1)).unwrap();
        let back: DateDeadline =
            serde_json::from_str(&serde_json::to_string(&deadline).unwrap()).unwrap();
        assert_eq!(back.issued(), date(2024, 3, 1));
        assert_eq!(back, deadline);

        let range = TimeRange::new(
            date(2024, 1, 1).and_hms_opt(8, 0, 0).unwrap(),
            date(2024, 1, 1).and_hms_opt(9, 0, 0).unwrap(),
        )
        .unwrap();
        let back: TimeRange = serde_json::from_str(&serde_json::to_string(&range).unwrap()).unwrap();
        assert_eq!(back.duration(), Duration::hours(1));
    }
}

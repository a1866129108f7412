//! Working-day calendar for a single counselor.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use tracing::debug;

/// Which weekdays a counselor accepts appointments on.
///
/// An empty set means "no constraint". Names that do not denote a weekday are
/// dropped when the calendar is built, so a profile listing only unknown
/// names behaves like an empty one instead of making every date unworkable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingDayCalendar {
    working_days: Vec<Weekday>,
}

impl WorkingDayCalendar {
    /// Builds a calendar from weekday names ("Monday", "mon", "TUE", ...).
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut working_days = Vec::with_capacity(names.len());
        for name in names {
            match name.as_ref().trim().parse::<Weekday>() {
                Ok(day) if !working_days.contains(&day) => working_days.push(day),
                Ok(_) => {}
                Err(_) => debug!("Ignoring unrecognized working day name: {:?}", name.as_ref()),
            }
        }
        Self { working_days }
    }

    pub fn from_weekdays(days: &[Weekday]) -> Self {
        let mut working_days = Vec::with_capacity(days.len());
        for day in days {
            if !working_days.contains(day) {
                working_days.push(*day);
            }
        }
        Self { working_days }
    }

    /// True when every date counts as a working day.
    pub fn is_unconstrained(&self) -> bool {
        self.working_days.is_empty()
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        self.is_unconstrained() || self.working_days.contains(&date.weekday())
    }

    /// Collects the next `n` working dates starting at `base` (inclusive).
    ///
    /// Each found date costs at most seven steps since the set holds at least
    /// one real weekday, so the walk always terminates.
    pub fn next_n_working_dates(&self, base: NaiveDate, n: usize) -> Vec<NaiveDate> {
        let mut dates = Vec::with_capacity(n);
        let mut current = base;
        while dates.len() < n {
            if self.is_working_day(current) {
                dates.push(current);
            }
            current = match current.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        dates
    }

    /// `date` itself when it is a working day, otherwise the next one.
    pub fn first_working_from(&self, date: NaiveDate) -> NaiveDate {
        self.next_n_working_dates(date, 1)
            .into_iter()
            .next()
            .unwrap_or(date)
    }

    /// Working dates in `[from, until]`, in order.
    pub fn working_dates_between(&self, from: NaiveDate, until: NaiveDate) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        let mut current = from;
        while current <= until {
            if self.is_working_day(current) {
                dates.push(current);
            }
            current += Duration::days(1);
        }
        dates
    }
}

#[cfg(test)]
mod tests {
    use crate::models::CounselorProfile;
    use crate::slots::{generate_slots_for_date, DayPart, SlotGroups};
    use chrono::{Duration, NaiveDate, Timelike};
    use tracing::debug;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 6).unwrap()
    }

    #[test]
    fn test_midnight_crossing_window_stops_at_midnight() {
        let profile = CounselorProfile::new("night-owl").with_office_hours("22:00", "02:00");

        let slots = generate_slots_for_date(day(), &profile);
        debug!("  slots: {:?}", slots);

        let labels: Vec<_> = slots.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["22:00-22:30", "22:30-23:00", "23:00-23:30", "23:30-00:00"]
        );

        // The last slot ends exactly at the midnight closing the date
        let last = slots.last().unwrap();
        assert_eq!(last.end, (day() + Duration::days(1)).and_hms_opt(0, 0, 0).unwrap());
        assert!(slots.iter().all(|s| s.date == day() && s.start.date() == day()));
        assert!(SlotGroups::from_slots(&slots)
            .get(DayPart::Evening)
            .iter()
            .all(|s| s.start.hour() >= 22));
    }

    #[test]
    fn test_equal_start_and_end_is_a_full_day_window() {
        // end <= start means the end belongs to the next day
        let profile = CounselorProfile::new("c-24").with_office_hours("00:00", "00:00");
        let slots = generate_slots_for_date(day(), &profile);
        assert_eq!(slots.len(), 48);
        assert_eq!(slots[0].label, "00:00-00:30");
        assert_eq!(slots[47].label, "23:30-00:00");
    }

    #[test]
    fn test_window_ending_at_midnight() {
        let profile = CounselorProfile::new("c-late").with_office_hours("23:00", "00:00");
        let slots = generate_slots_for_date(day(), &profile);
        let labels: Vec<_> = slots.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["23:00-23:30", "23:30-00:00"]);
    }

    #[test]
    fn test_spill_over_hours_are_not_carried_to_the_next_date() {
        let profile = CounselorProfile::new("night-owl").with_office_hours("22:00", "02:00");
        let next_day = generate_slots_for_date(day() + Duration::days(1), &profile);
        assert_eq!(next_day[0].label, "22:00-22:30");
        assert_eq!(next_day.len(), 4);
    }
}

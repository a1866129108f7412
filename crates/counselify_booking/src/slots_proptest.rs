#[cfg(test)]
mod tests {
    use crate::models::CounselorProfile;
    use crate::slots::{generate_slots_for_date, generate_slots_with_length, OfficeDefaults};
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;

    fn profile(start_minutes: u32, end_minutes: u32) -> CounselorProfile {
        CounselorProfile::new("prop").with_office_hours(
            format!("{:02}:{:02}", start_minutes / 60, start_minutes % 60),
            format!("{:02}:{:02}", end_minutes / 60, end_minutes % 60),
        )
    }

    fn base_date(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset)
    }

    proptest! {
        // Slots tile [start, end) without gaps or overlaps when the window is a multiple of 30
        #[test]
        fn test_slots_tile_whole_window(
            start_half_hours in 0..40u32,
            count in 1..8u32,
            offset in 0..730i64,
        ) {
            let start = start_half_hours * 30;
            let end = start + count * 30;
            prop_assume!(end < 24 * 60);
            let date = base_date(offset);
            let slots = generate_slots_for_date(date, &profile(start, end));

            prop_assert_eq!(slots.len() as u32, count);
            prop_assert_eq!(slots[0].start, date.and_hms_opt(start / 60, start % 60, 0).unwrap());
            prop_assert_eq!(
                slots.last().unwrap().end,
                date.and_hms_opt(end / 60, end % 60, 0).unwrap()
            );
            for pair in slots.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
            }
        }

        // A trailing remainder shorter than one slot is dropped
        #[test]
        fn test_partial_tail_dropped(
            start_minutes in 0..(20 * 60u32),
            length_minutes in 1..(4 * 60u32),
        ) {
            let end = start_minutes + length_minutes;
            let slots = generate_slots_for_date(base_date(0), &profile(start_minutes, end));

            prop_assert_eq!(slots.len() as u32, length_minutes / 30);
            for slot in &slots {
                prop_assert_eq!(slot.end - slot.start, Duration::minutes(30));
                prop_assert!(slot.end <= base_date(0).and_hms_opt(end / 60, end % 60, 0).unwrap());
            }
        }

        // Every slot starts and ends within the generated date, whatever the window
        #[test]
        fn test_slots_never_leave_their_date(
            start_minutes in 0..(24 * 60u32),
            end_minutes in 0..(24 * 60u32),
            length in 5..120u32,
        ) {
            let date = base_date(10);
            let slots = generate_slots_with_length(
                date,
                &profile(start_minutes, end_minutes),
                length,
                OfficeDefaults::default(),
            );
            let midnight = (date + Duration::days(1)).and_hms_opt(0, 0, 0).unwrap();
            for slot in &slots {
                prop_assert_eq!(slot.start.date(), date);
                prop_assert!(slot.end <= midnight);
            }
            for pair in slots.windows(2) {
                prop_assert!(pair[0].start < pair[1].start);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::models::CounselorProfile;
    use crate::non_availability::{
        compute_fully_unavailable_dates, is_past, merge_non_availability, NonAvailability,
    };
    use crate::slots::{generate_slots_for_date, OfficeDefaults};
    use chrono::{NaiveDate, NaiveDateTime};
    use serde_json::json;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        date(d).and_hms_opt(h, m, 0).unwrap()
    }

    fn minutes(map: &NonAvailability, d: u32) -> Vec<u32> {
        map.blocked_minutes(date(d))
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    fn short_day() -> CounselorProfile {
        CounselorProfile::new("c-1").with_office_hours("09:00", "10:00")
    }

    fn fully_unavailable(map: &NonAvailability, now: NaiveDateTime) -> Vec<NaiveDate> {
        compute_fully_unavailable_dates(map, &short_day(), now, 30, OfficeDefaults::default())
            .into_iter()
            .collect()
    }

    #[test]
    fn test_array_of_records_with_mixed_field_names() {
        let raw = json!([
            { "date": "2025-06-02", "slots": ["10:00-10:30", "14:00"] },
            { "day": "2025-06-03", "times": ["9am", "1:30 PM"] },
            { "dateString": "2025-06-04T00:00:00.000Z", "nonAvailableSlots": [{ "startTime": "11:00" }] }
        ]);
        let map = merge_non_availability(&raw);
        assert_eq!(minutes(&map, 2), vec![600, 840]);
        assert_eq!(minutes(&map, 3), vec![540, 810]);
        assert_eq!(minutes(&map, 4), vec![660]);
    }

    #[test]
    fn test_map_of_arrays_and_nested_objects() {
        let raw = json!({
            "2025-06-02": ["10:00-10:30"],
            "2025-06-03": { "slots": ["16:00", "16:30"] },
            "2025-06-05": { "times": [] }
        });
        let map = merge_non_availability(&raw);
        assert_eq!(minutes(&map, 2), vec![600]);
        assert_eq!(minutes(&map, 3), vec![960, 990]);
        assert!(map.blocked_minutes(date(5)).is_none());
        assert_eq!(map.dates().count(), 2);
    }

    #[test]
    fn test_empty_list_means_available() {
        let map = merge_non_availability(&json!({ "2025-06-01": [] }));
        assert!(map.is_empty());
        assert!(fully_unavailable(&map, at(1, 8, 0)).is_empty());

        let map = merge_non_availability(&json!([{ "date": "2025-06-01", "slots": [] }]));
        assert!(map.is_empty());
    }

    #[test]
    fn test_missing_or_null_lists_and_payloads() {
        assert!(merge_non_availability(&json!(null)).is_empty());
        assert!(merge_non_availability(&json!("oops")).is_empty());
        let map = merge_non_availability(&json!([
            { "date": "2025-06-02" },
            { "date": "2025-06-03", "slots": null },
            { "slots": ["10:00"] },
            42
        ]));
        assert!(map.is_empty());
    }

    #[test]
    fn test_unparsable_tokens_are_skipped_not_fatal() {
        let map = merge_non_availability(&json!({
            "2025-06-02": ["lunch", "10:00", 17, { "note": "x" }],
            "not-a-date": ["10:00"],
            "2025-06-03": ["??"]
        }));
        assert_eq!(minutes(&map, 2), vec![600]);
        // nothing parsable for the 3rd: the date is not recorded at all
        assert!(map.blocked_minutes(date(3)).is_none());
        assert_eq!(map.dates().count(), 1);
    }

    #[test]
    fn test_records_for_same_date_are_unioned() {
        let map = merge_non_availability(&json!([
            { "date": "2025-06-02", "slots": ["09:00"] },
            { "date": "2025-06-02", "slots": ["09:30", "09:00"] }
        ]));
        assert_eq!(minutes(&map, 2), vec![540, 570]);
    }

    #[test]
    fn test_is_blocked_matches_slot_start() {
        let map = merge_non_availability(&json!({ "2025-06-02": ["09:30-10:00"] }));
        let slots = generate_slots_for_date(date(2), &short_day());
        assert!(!map.is_blocked(&slots[0]));
        assert!(map.is_blocked(&slots[1]));
        // same time on another date is free
        let other = generate_slots_for_date(date(3), &short_day());
        assert!(!map.is_blocked(&other[1]));
    }

    #[test]
    fn test_fully_unavailable_when_every_slot_blocked() {
        let map = merge_non_availability(&json!({
            "2025-06-10": ["09:00", "09:30"],
            "2025-06-11": ["09:00"]
        }));
        assert_eq!(fully_unavailable(&map, at(1, 8, 0)), vec![date(10)]);
    }

    #[test]
    fn test_fully_unavailable_counts_past_slots_only_today() {
        // 09:00 blocked, 09:30 still in the future at 09:10 -> bookable
        let map = merge_non_availability(&json!({ "2025-06-02": ["09:00"] }));
        assert!(fully_unavailable(&map, at(2, 9, 10)).is_empty());

        // at 09:40 the remaining 09:30 slot has started
        assert_eq!(fully_unavailable(&map, at(2, 9, 40)), vec![date(2)]);

        // the same clock time on an earlier day does not touch the 2nd
        assert!(fully_unavailable(&map, at(1, 9, 40)).is_empty());
    }

    #[test]
    fn test_fully_unavailable_when_generation_is_empty() {
        let profile = CounselorProfile::new("c-1").with_office_hours("bogus", "10:00");
        let map = merge_non_availability(&json!({ "2025-06-02": ["12:00"] }));
        let dates =
            compute_fully_unavailable_dates(&map, &profile, at(1, 0, 0), 30, OfficeDefaults::default());
        assert!(dates.contains(&date(2)));
    }

    #[test]
    fn test_is_past_only_applies_to_today() {
        let slots = generate_slots_for_date(date(2), &short_day());
        assert!(is_past(&slots[0], at(2, 9, 1)));
        assert!(!is_past(&slots[0], at(2, 9, 0)));
        assert!(!is_past(&slots[1], at(2, 9, 1)));
        assert!(!is_past(&slots[0], at(3, 12, 0)));
    }
}

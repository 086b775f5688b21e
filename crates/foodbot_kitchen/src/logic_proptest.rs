#[cfg(test)]
mod tests {
    use crate::logic::{apply_guest_delta, clamp_guest_count, is_registration_open};
    use chrono::{Duration, NaiveDate, NaiveTime};
    use foodbot_common::MenuOfDay;
    use proptest::prelude::*;

    // Helper function to build a single-menu day with a given deadline
    fn menu_with_deadline(date: NaiveDate, hour: u32, minute: u32, enabled: bool) -> MenuOfDay {
        MenuOfDay {
            id: 1,
            date,
            description: String::new(),
            two_menus: false,
            menu1_name: None,
            menu2_name: None,
            registration_deadline: format!("{:02}:{:02}", hour, minute),
            deadline_enabled: enabled,
        }
    }

    fn base_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    proptest! {
        // Repeated deltas never leave the [0, max] range
        #[test]
        fn test_guest_count_stays_in_range(
            max in 0..100i64,
            deltas in prop::collection::vec(-60..60i64, 0..40),
        ) {
            let mut count = 0;
            for delta in deltas {
                count = apply_guest_delta(count, delta, max);
                prop_assert!(count >= 0);
                prop_assert!(count <= max);
            }
        }

        // An ignored step leaves the count untouched, an applied one moves it by delta
        #[test]
        fn test_guest_step_applied_or_ignored(
            (max, current) in (0..100i64).prop_flat_map(|m| (Just(m), 0..=m)),
            delta in -120..120i64,
        ) {
            let next = apply_guest_delta(current, delta, max);
            let target = current + delta;
            if (0..=max).contains(&target) {
                prop_assert_eq!(next, target);
            } else {
                prop_assert_eq!(next, current);
            }
        }

        // Clamping is idempotent
        #[test]
        fn test_clamp_idempotent(value in any::<i64>(), max in 0..1000i64) {
            let once = clamp_guest_count(value, max);
            prop_assert_eq!(clamp_guest_count(once, max), once);
        }

        // On the menu's own day the gate is open exactly before the deadline
        #[test]
        fn test_gate_matches_deadline_on_same_day(
            deadline_hour in 0..24u32,
            deadline_minute in 0..60u32,
            now_hour in 0..24u32,
            now_minute in 0..60u32,
        ) {
            let date = base_date();
            let menu = menu_with_deadline(date, deadline_hour, deadline_minute, true);
            let now = date.and_hms_opt(now_hour, now_minute, 0).unwrap();
            let deadline = NaiveTime::from_hms_opt(deadline_hour, deadline_minute, 0).unwrap();

            prop_assert_eq!(is_registration_open(&menu, now), now.time() < deadline);
        }

        // Other days and disabled gates are always open
        #[test]
        fn test_gate_open_elsewhere(
            offset_days in 1..30i64,
            deadline_hour in 0..24u32,
            now_hour in 0..24u32,
        ) {
            let date = base_date();
            let gated = menu_with_deadline(date, deadline_hour, 0, true);
            let later = (date + Duration::days(offset_days)).and_hms_opt(now_hour, 0, 0).unwrap();
            prop_assert!(is_registration_open(&gated, later));

            let earlier = (date - Duration::days(offset_days)).and_hms_opt(now_hour, 0, 0).unwrap();
            prop_assert!(is_registration_open(&gated, earlier));

            let open = menu_with_deadline(date, deadline_hour, 0, false);
            let now = date.and_hms_opt(now_hour, 59, 0).unwrap();
            prop_assert!(is_registration_open(&open, now));
        }
    }
}

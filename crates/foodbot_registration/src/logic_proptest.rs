#[cfg(test)]
mod tests {
    use crate::logic::{Ledger, LedgerState, RegistrationOutcome, RequestedOption};
    use crate::notify::LoggingNotifier;
    use chrono::NaiveDate;
    use foodbot_common::MenuOption;
    use foodbot_db::{DbClientFactory, NewUser, UserRepository};
    use proptest::prelude::*;
    use std::sync::Arc;

    // Helper strategy for raw option values as they arrive in JSON bodies
    fn raw_option() -> impl Strategy<Value = Option<serde_json::Value>> {
        prop_oneof![
            Just(None),
            any::<i64>().prop_map(|n| Some(serde_json::json!(n))),
            "[a-z0-9]{0,4}".prop_map(|s| Some(serde_json::json!(s))),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        // A row exists exactly when the number of toggles is odd
        #[test]
        fn test_toggle_parity(toggles in 1..12usize, options in prop::collection::vec(raw_option(), 12)) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let repos = DbClientFactory::new().open("sqlite::memory:").await.unwrap();
                let user = repos
                    .users
                    .create(&NewUser {
                        name: "Bert Kunz".to_string(),
                        personal_number: "42".to_string(),
                        card_id: None,
                    })
                    .await
                    .unwrap();
                let ledger = Ledger::new(repos, Arc::new(LoggingNotifier));
                let date = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
                let now = date.and_hms_opt(8, 0, 0).unwrap();

                for raw in options.iter().take(toggles) {
                    let requested = RequestedOption::from_raw(raw.as_ref());
                    ledger.toggle_registration(&user, date, requested, now).await.unwrap();
                }

                let state = ledger.state(user.id, date).await.unwrap();
                if toggles % 2 == 1 {
                    assert_eq!(state, LedgerState::Registered(MenuOption::One));
                } else {
                    assert_eq!(state, LedgerState::Unregistered);
                }
            });
        }

        // Present values map to 1 or 2; only values reading as the number 2 map to 2
        #[test]
        fn test_option_coercion(raw in raw_option()) {
            let requested = RequestedOption::from_raw(raw.as_ref());
            match (&raw, requested) {
                (None, RequestedOption::Absent) => {}
                (Some(value), RequestedOption::Chosen(option)) => {
                    let parsed = value
                        .as_i64()
                        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<i64>().ok()));
                    let is_two = parsed == Some(2);
                    prop_assert_eq!(option == MenuOption::Two, is_two);
                }
                _ => prop_assert!(false, "unexpected mapping {:?} -> {:?}", raw, requested),
            }
            prop_assert_eq!(requested.resolve(false), Some(MenuOption::One));
        }

        // Registering on a two-menu day never happens without a choice
        #[test]
        fn test_absent_never_resolves_on_two_menu_days(two_menus in any::<bool>()) {
            prop_assert_eq!(RequestedOption::Absent.resolve(two_menus).is_none(), two_menus);
        }
    }

    #[test]
    fn test_outcome_state_mapping() {
        assert_eq!(
            RegistrationOutcome::Unregistered(None).state(),
            LedgerState::Unregistered
        );
        assert_eq!(
            RegistrationOutcome::Registered(MenuOption::Two).state(),
            LedgerState::Registered(MenuOption::Two)
        );
    }
}

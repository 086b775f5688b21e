use crate::repositories::*;
use crate::DbClientFactory;
use chrono::NaiveDate;
use foodbot_common::MenuOption;

async fn open() -> Repositories {
    DbClientFactory::new()
        .open("sqlite::memory:")
        .await
        .expect("in-memory database")
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

fn new_user(name: &str, pn: &str, card: Option<&str>) -> NewUser {
    NewUser {
        name: name.to_string(),
        personal_number: pn.to_string(),
        card_id: card.map(str::to_string),
    }
}

fn menu(date: NaiveDate, description: &str) -> MenuRecord {
    MenuRecord {
        date,
        description: description.to_string(),
        two_menus: false,
        menu1_name: None,
        menu2_name: None,
        registration_deadline: "19:45".to_string(),
        deadline_enabled: true,
    }
}

#[tokio::test]
async fn test_user_lookups_and_card_normalisation() {
    let repos = open().await;
    let user = repos
        .users
        .create(&new_user("Anna Berg", "FW-001", Some("ab12cd")))
        .await
        .unwrap();
    assert_eq!(user.card_id.as_deref(), Some("AB12CD"));

    let by_card = repos.users.find_by_card_id("aB12cD").await.unwrap();
    assert_eq!(by_card.map(|u| u.id), Some(user.id));

    let by_pn = repos.users.find_by_personal_number("FW-001").await.unwrap();
    assert_eq!(by_pn.map(|u| u.id), Some(user.id));

    assert!(repos.users.find_by_personal_number("fw-001").await.unwrap().is_none());
    assert!(repos.users.find_by_mobile_token("nope").await.unwrap().is_none());

    assert!(repos.users.set_mobile_token(user.id, "tok123").await.unwrap());
    let by_token = repos.users.find_by_mobile_token("tok123").await.unwrap();
    assert_eq!(by_token.map(|u| u.id), Some(user.id));
}

#[tokio::test]
async fn test_user_without_card_or_token_reads_back() {
    let repos = open().await;
    let created = repos.users.create(&new_user("Dora Lind", "FW-010", None)).await.unwrap();
    assert_eq!(created.card_id, None);
    assert_eq!(created.mobile_token, None);

    let found = repos
        .users
        .find_by_personal_number("FW-010")
        .await
        .unwrap()
        .expect("user by personal number");
    assert_eq!(found.id, created.id);
    assert_eq!(found.card_id, None);
    assert_eq!(found.mobile_token, None);

    let page = repos.users.list_page(0, 10).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].card_id, None);
}

#[tokio::test]
async fn test_single_menu_day_round_trip() {
    let repos = open().await;
    let saved = repos.menus.upsert(&menu(day(4), "Soup")).await.unwrap();
    assert_eq!(saved.menu1_name, None);
    assert_eq!(saved.menu2_name, None);

    let loaded = repos.menus.find_by_date(day(4)).await.unwrap().expect("menu row");
    assert_eq!(loaded.description, "Soup");
    assert!(!loaded.two_menus);
    assert_eq!(loaded.menu1_name, None);
    assert_eq!(loaded.menu2_name, None);

    let range = repos.menus.find_range(day(1), day(7)).await.unwrap();
    assert_eq!(range.len(), 1);
}

#[tokio::test]
async fn test_duplicate_personal_number_is_unique_violation() {
    let repos = open().await;
    repos.users.create(&new_user("Anna", "FW-001", None)).await.unwrap();

    let err = repos
        .users
        .create(&new_user("Bert", "FW-001", None))
        .await
        .unwrap_err();
    assert!(err.is_unique_violation());

    // Users without a card do not collide on NULL.
    repos.users.create(&new_user("Carl", "FW-002", None)).await.unwrap();
    assert_eq!(repos.users.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_delete_user_cascades_registrations() {
    let repos = open().await;
    let user = repos.users.create(&new_user("Anna", "FW-001", None)).await.unwrap();
    repos.registrations.insert(user.id, day(2), MenuOption::One).await.unwrap();
    repos.registrations.insert(user.id, day(3), MenuOption::Two).await.unwrap();

    assert!(repos.users.delete(user.id).await.unwrap());
    assert!(repos.registrations.find(user.id, day(2)).await.unwrap().is_none());
    assert!(repos.registrations.find(user.id, day(3)).await.unwrap().is_none());
    assert!(!repos.users.delete(user.id).await.unwrap());
}

#[tokio::test]
async fn test_second_registration_insert_is_unique_violation() {
    let repos = open().await;
    let user = repos.users.create(&new_user("Anna", "FW-001", None)).await.unwrap();

    repos.registrations.insert(user.id, day(2), MenuOption::Two).await.unwrap();
    let err = repos
        .registrations
        .insert(user.id, day(2), MenuOption::One)
        .await
        .unwrap_err();
    assert!(err.is_unique_violation());

    let row = repos.registrations.find(user.id, day(2)).await.unwrap().unwrap();
    assert_eq!(row.menu_choice, MenuOption::Two);

    assert!(repos.registrations.delete(user.id, day(2)).await.unwrap());
    assert!(!repos.registrations.delete(user.id, day(2)).await.unwrap());
}

#[tokio::test]
async fn test_menu_upsert_keeps_one_row_with_latest_fields() {
    let repos = open().await;
    repos.menus.upsert(&menu(day(2), "Soup")).await.unwrap();

    let mut second = menu(day(2), "Schnitzel / Salad");
    second.two_menus = true;
    second.menu1_name = Some("Schnitzel".to_string());
    second.menu2_name = Some("Salad".to_string());
    second.registration_deadline = "11:00".to_string();
    let saved = repos.menus.upsert(&second).await.unwrap();

    let all = repos.menus.find_range(day(1), day(31)).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], saved);
    assert!(saved.two_menus);
    assert_eq!(saved.menu2_name.as_deref(), Some("Salad"));
    assert_eq!(saved.registration_deadline, "11:00");
}

#[tokio::test]
async fn test_insert_if_absent_does_not_overwrite() {
    let repos = open().await;
    repos.menus.upsert(&menu(day(4), "Curry")).await.unwrap();

    assert!(!repos.menus.insert_if_absent(&menu(day(4), "")).await.unwrap());
    assert!(repos.menus.insert_if_absent(&menu(day(5), "")).await.unwrap());

    let kept = repos.menus.find_by_date(day(4)).await.unwrap().unwrap();
    assert_eq!(kept.description, "Curry");
}

#[tokio::test]
async fn test_delete_day_removes_menu_and_registrations_only() {
    let repos = open().await;
    let user = repos.users.create(&new_user("Anna", "FW-001", None)).await.unwrap();
    repos.menus.upsert(&menu(day(2), "Soup")).await.unwrap();
    repos.registrations.insert(user.id, day(2), MenuOption::One).await.unwrap();
    repos.registrations.insert(user.id, day(3), MenuOption::One).await.unwrap();
    repos.guests.adjust(day(2), MenuOption::One, 2, 50).await.unwrap();

    let deletion = repos.menus.delete_day(day(2)).await.unwrap();
    assert_eq!(
        deletion,
        DayDeletion {
            menu_deleted: true,
            registrations_deleted: 1
        }
    );
    assert!(repos.menus.find_by_date(day(2)).await.unwrap().is_none());
    assert!(repos.registrations.find(user.id, day(3)).await.unwrap().is_some());
    assert_eq!(repos.guests.find_for_date(day(2)).await.unwrap().len(), 1);

    // No menu, nothing happens.
    let nothing = repos.menus.delete_day(day(3)).await.unwrap();
    assert_eq!(nothing, DayDeletion::default());
    assert!(repos.registrations.find(user.id, day(3)).await.unwrap().is_some());
}

#[tokio::test]
async fn test_guest_adjust_clamps_at_both_ends() {
    let repos = open().await;

    let mut last = 0;
    for _ in 0..60 {
        last = repos.guests.adjust(day(2), MenuOption::One, 1, 50).await.unwrap().count;
    }
    assert_eq!(last, 50);

    for _ in 0..60 {
        last = repos.guests.adjust(day(2), MenuOption::One, -1, 50).await.unwrap().count;
    }
    assert_eq!(last, 0);

    let first = repos.guests.adjust(day(3), MenuOption::Two, -1, 50).await.unwrap();
    assert_eq!(first.count, 0);
    assert_eq!(first.menu_choice, MenuOption::Two);
}

#[tokio::test]
async fn test_guest_adjust_ignores_overshooting_steps() {
    let repos = open().await;
    repos.guests.adjust(day(2), MenuOption::One, 3, 50).await.unwrap();

    let entry = repos.guests.adjust(day(2), MenuOption::One, -5, 50).await.unwrap();
    assert_eq!(entry.count, 3);
    let entry = repos.guests.adjust(day(2), MenuOption::One, 48, 50).await.unwrap();
    assert_eq!(entry.count, 3);
    let entry = repos.guests.adjust(day(2), MenuOption::One, 47, 50).await.unwrap();
    assert_eq!(entry.count, 50);

    // Above a lowered max, decrements still apply.
    let entry = repos.guests.adjust(day(2), MenuOption::One, -1, 10).await.unwrap();
    assert_eq!(entry.count, 49);
}

#[tokio::test]
async fn test_guest_set_clamps() {
    let repos = open().await;
    assert_eq!(repos.guests.set(day(2), MenuOption::One, 75, 50).await.unwrap().count, 50);
    assert_eq!(repos.guests.set(day(2), MenuOption::One, -4, 50).await.unwrap().count, 0);
    assert_eq!(repos.guests.set(day(2), MenuOption::One, 7, 50).await.unwrap().count, 7);
    assert_eq!(repos.guests.find_for_date(day(2)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_admin_log_newest_first() {
    let repos = open().await;
    repos.admin_log.append("admin", "create_user", Some("FW-001")).await.unwrap();
    repos.admin_log.append("admin", "delete_day", None).await.unwrap();

    let entries = repos.admin_log.recent(10).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].action, "delete_day");
    assert_eq!(entries[0].details, None);
    assert_eq!(entries[1].details.as_deref(), Some("FW-001"));

    assert_eq!(repos.admin_log.recent(1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_grouped_counts() {
    let repos = open().await;
    let a = repos.users.create(&new_user("Anna", "1", None)).await.unwrap();
    let b = repos.users.create(&new_user("Bert", "2", None)).await.unwrap();
    let c = repos.users.create(&new_user("Carl", "3", None)).await.unwrap();
    repos.registrations.insert(a.id, day(2), MenuOption::One).await.unwrap();
    repos.registrations.insert(b.id, day(2), MenuOption::One).await.unwrap();
    repos.registrations.insert(c.id, day(2), MenuOption::Two).await.unwrap();
    repos.registrations.insert(a.id, day(3), MenuOption::One).await.unwrap();
    repos.guests.set(day(2), MenuOption::One, 3, 50).await.unwrap();
    repos.guests.set(day(2), MenuOption::Two, 1, 50).await.unwrap();

    let mut regs = repos.stats.registration_counts(day(1), day(2)).await.unwrap();
    regs.sort_by_key(|c| (c.date, c.option.as_i64()));
    assert_eq!(regs.len(), 2);
    assert_eq!((regs[0].option, regs[0].count), (MenuOption::One, 2));
    assert_eq!((regs[1].option, regs[1].count), (MenuOption::Two, 1));

    let guests = repos.stats.guest_counts(day(2), day(2)).await.unwrap();
    assert_eq!(guests.iter().map(|g| g.count).sum::<i64>(), 4);

    let users = repos.stats.registered_users(day(2)).await.unwrap();
    let names: Vec<_> = users.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, ["Anna", "Bert", "Carl"]);
}

#[tokio::test]
async fn test_user_history_includes_users_without_registrations() {
    let repos = open().await;
    let a = repos.users.create(&new_user("Anna", "1", None)).await.unwrap();
    repos.users.create(&new_user("Bert", "2", None)).await.unwrap();
    let today = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
    for date in [today, today - chrono::Days::new(10), today - chrono::Days::new(60)] {
        repos.registrations.insert(a.id, date, MenuOption::One).await.unwrap();
    }

    repos.client().reset_query_count();
    let rows = repos
        .stats
        .user_history(
            today - chrono::Days::new(7),
            today - chrono::Days::new(30),
            today - chrono::Days::new(90),
        )
        .await
        .unwrap();
    assert_eq!(repos.client().query_count(), 1);

    assert_eq!(rows.len(), 2);
    let anna = &rows[0];
    assert_eq!((anna.count_7, anna.count_30, anna.count_90), (1, 2, 3));
    assert_eq!(anna.last_date, Some(today));
    let bert = &rows[1];
    assert_eq!((bert.count_7, bert.count_30, bert.count_90), (0, 0, 0));
    assert_eq!(bert.last_date, None);
}

#[tokio::test]
async fn test_list_page_orders_by_name() {
    let repos = open().await;
    for (name, pn) in [("Carl", "3"), ("Anna", "1"), ("Bert", "2")] {
        repos.users.create(&new_user(name, pn, None)).await.unwrap();
    }
    let page = repos.users.list_page(1, 2).await.unwrap();
    let names: Vec<_> = page.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, ["Bert", "Carl"]);
}

#[tokio::test]
async fn test_presets_append_in_order_and_delete() {
    let repos = open().await;
    assert!(repos.presets.list().await.unwrap().is_empty());

    let soup = repos.presets.create("Linsensuppe").await.unwrap();
    let curry = repos.presets.create("Gemüsecurry").await.unwrap();
    assert_eq!(soup.sort_order, 1);
    assert_eq!(curry.sort_order, 2);

    let err = repos.presets.create("Linsensuppe").await.unwrap_err();
    assert!(err.is_unique_violation());

    let removed = repos.presets.delete(soup.id).await.unwrap();
    assert_eq!(removed.map(|p| p.name).as_deref(), Some("Linsensuppe"));
    assert!(repos.presets.delete(soup.id).await.unwrap().is_none());

    // Positions are never reused.
    let pasta = repos.presets.create("Pasta").await.unwrap();
    assert_eq!(pasta.sort_order, 3);
    let names: Vec<_> = repos
        .presets
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, ["Gemüsecurry", "Pasta"]);
}

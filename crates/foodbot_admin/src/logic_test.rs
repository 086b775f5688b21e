#[cfg(test)]
mod tests {
    use crate::logic::*;
    use foodbot_common::MenuOption;
    use foodbot_db::{DbClientFactory, RegistrationRepository, Repositories, UserRepository};
    use chrono::NaiveDate;

    async fn repos() -> Repositories {
        DbClientFactory::new().open("sqlite::memory:").await.unwrap()
    }

    fn form(name: &str, pn: &str, card: Option<&str>) -> UserForm {
        UserForm {
            name: name.to_string(),
            personal_number: pn.to_string(),
            card_id: card.map(str::to_string),
        }
    }

    #[test]
    fn test_validate_user_form_normalises() {
        let user = validate_user_form(&form("  Jörg Müller ", "FW-7", Some("0a1b"))).unwrap();
        assert_eq!(user.name, "Jörg Müller");
        assert_eq!(user.card_id.as_deref(), Some("0A1B"));

        let no_card = validate_user_form(&form("Anna", "1", Some("   "))).unwrap();
        assert_eq!(no_card.card_id, None);
    }

    #[test]
    fn test_validate_user_form_rejects() {
        assert!(matches!(
            validate_user_form(&form("A", "1", None)),
            Err(AdminError::Validation(_))
        ));
        assert!(matches!(
            validate_user_form(&form("Anna", "12 3", None)),
            Err(AdminError::Validation(_))
        ));
        assert!(matches!(
            validate_user_form(&form("Anna", "123", Some("not-hex"))),
            Err(AdminError::Validation(_))
        ));
        assert!(matches!(
            validate_user_form(&form("Robert'); DROP", "123", None)),
            Err(AdminError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_create_duplicate_is_conflict_and_logged_once() {
        let repos = repos().await;
        create_user(&repos, "chief", &form("Anna Berg", "FW-1", Some("aa")))
            .await
            .unwrap();

        let dup_pn = create_user(&repos, "chief", &form("Bert", "FW-1", None)).await;
        assert!(matches!(dup_pn, Err(AdminError::Conflict(_))));

        let dup_card = create_user(&repos, "chief", &form("Bert", "FW-2", Some("AA"))).await;
        assert!(matches!(dup_card, Err(AdminError::Conflict(_))));

        let log = list_admin_log(&repos, None).await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].admin_user, "chief");
        assert_eq!(log[0].action, "create_user");
    }

    #[tokio::test]
    async fn test_update_unknown_user_is_not_found() {
        let repos = repos().await;
        let result = update_user(&repos, "admin", 99, &form("Anna", "1", None)).await;
        assert!(matches!(result, Err(AdminError::NotFound(99))));
    }

    #[tokio::test]
    async fn test_delete_user_removes_registrations() {
        let repos = repos().await;
        let user = create_user(&repos, "admin", &form("Anna", "1", None)).await.unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        repos
            .registrations
            .insert(user.id, date, MenuOption::One)
            .await
            .unwrap();

        delete_user(&repos, "admin", user.id).await.unwrap();

        assert!(repos.users.find_by_id(user.id).await.unwrap().is_none());
        assert!(repos.registrations.find(user.id, date).await.unwrap().is_none());
        assert!(matches!(
            delete_user(&repos, "admin", user.id).await,
            Err(AdminError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_mobile_token_is_generated_once() {
        let repos = repos().await;
        let user = create_user(&repos, "admin", &form("Anna", "1", None)).await.unwrap();

        let first = ensure_mobile_token(&repos, "admin", user.id).await.unwrap();
        let second = ensure_mobile_token(&repos, "admin", user.id).await.unwrap();
        assert_eq!(first.token, second.token);
        assert_eq!(first.token.len(), 32);
        assert_eq!(first.path, format!("/api/m/{}", first.token));

        let found = repos.users.find_by_mobile_token(&first.token).await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));

        let actions: Vec<_> = list_admin_log(&repos, None)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.action)
            .collect();
        assert_eq!(actions, ["generate_token", "create_user"]);
    }

    #[tokio::test]
    async fn test_admin_log_limit_is_clamped() {
        let repos = repos().await;
        for i in 0..3 {
            record_action(&repos, "admin", "noop", &i.to_string()).await;
        }
        assert_eq!(list_admin_log(&repos, Some(0)).await.unwrap().len(), 1);
        assert_eq!(list_admin_log(&repos, Some(2)).await.unwrap().len(), 2);
        assert_eq!(list_admin_log(&repos, Some(10_000)).await.unwrap().len(), 3);
    }
}

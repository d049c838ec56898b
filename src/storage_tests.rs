// ABOUTME: Tests for the storage layer against a throwaway SQLite database
// ABOUTME: Covers owner isolation, case/client linkage, patches, deletes and document ownership

#[cfg(test)]
mod tests {
    use super::super::entities::case::{CaseStatus, Priority};
    use super::super::entities::case_document::DocumentKind;
    use super::super::entities::client::ClientStatus;
    use super::super::error::AppError;
    use super::super::storage::*;
    use super::super::types::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;
    use uuid::Uuid;

    async fn create_test_storage() -> (Storage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
        let storage = Storage::connect(&db_url).await.unwrap();
        (storage, temp_dir)
    }

    async fn create_test_user(storage: &Storage, email: &str) -> Uuid {
        storage
            .create_user("Test Lawyer", email, "$argon2id$placeholder")
            .await
            .unwrap()
            .id
    }

    fn new_client(name: &str, email: &str) -> NewClient {
        NewClient {
            name: name.to_string(),
            email: email.to_string(),
            phone: "555-0100".to_string(),
            ..Default::default()
        }
    }

    fn new_case(title: &str, client_name: &str) -> NewCase {
        NewCase {
            title: title.to_string(),
            client_name: client_name.to_string(),
            ..Default::default()
        }
    }

    fn invoice(name: &str) -> NewDocument {
        NewDocument {
            name: name.to_string(),
            kind: DocumentKind::Invoice,
            size: "1.2 KB".to_string(),
            url: None,
            public_id: None,
        }
    }

    #[tokio::test]
    async fn test_storage_initialization() {
        let (storage, _temp_dir) = create_test_storage().await;
        let owner = Uuid::new_v4();

        assert!(storage.list_clients(owner).await.unwrap().is_empty());
        assert!(storage.list_cases(owner).await.unwrap().is_empty());
        assert_eq!(storage.count_clients(owner).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_user_email_conflicts() {
        let (storage, _temp_dir) = create_test_storage().await;
        create_test_user(&storage, "ada@example.com").await;

        let result = storage
            .create_user("Other Ada", "ada@example.com", "$argon2id$placeholder")
            .await;
        assert!(matches!(result, Err(AppError::Conflict(msg)) if msg == "User already exists"));
    }

    #[tokio::test]
    async fn test_records_are_isolated_by_owner() {
        let (storage, _temp_dir) = create_test_storage().await;
        let ada = create_test_user(&storage, "ada@example.com").await;
        let bob = create_test_user(&storage, "bob@example.com").await;

        let client = storage
            .create_client(ada, new_client("Acme Corp", "legal@acme.test"))
            .await
            .unwrap();
        let case = storage
            .create_case(ada, new_case("Acme v. Widgets", "Acme Corp"))
            .await
            .unwrap();

        assert!(storage.list_clients(bob).await.unwrap().is_empty());
        assert!(storage.list_cases(bob).await.unwrap().is_empty());

        let foreign_read = storage.get_case_detail(bob, case.id).await;
        assert!(matches!(foreign_read, Err(AppError::NotFound(_))));

        let foreign_patch = storage
            .update_case(bob, case.id, CasePatch { title: Some("Hijacked".into()), ..Default::default() })
            .await;
        assert!(matches!(foreign_patch, Err(AppError::NotFound(_))));

        let foreign_note = storage.add_note(bob, case.id, "peek", "Bob").await;
        assert!(matches!(foreign_note, Err(AppError::NotFound(_))));

        let foreign_client_patch = storage
            .update_client(bob, client.id, ClientPatch { phone: Some("000".into()), ..Default::default() })
            .await;
        assert!(matches!(foreign_client_patch, Err(AppError::NotFound(_))));

        // Bob's delete is a no-op, Ada still has her client
        assert_eq!(storage.delete_client(bob, client.id).await.unwrap(), 0);
        assert_eq!(storage.list_clients(ada).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_same_email_allowed_across_owners_but_not_within() {
        let (storage, _temp_dir) = create_test_storage().await;
        let ada = create_test_user(&storage, "ada@example.com").await;
        let bob = create_test_user(&storage, "bob@example.com").await;

        storage
            .create_client(ada, new_client("Acme Corp", "legal@acme.test"))
            .await
            .unwrap();
        storage
            .create_client(bob, new_client("Acme Corp", "legal@acme.test"))
            .await
            .unwrap();

        let duplicate = storage
            .create_client(ada, new_client("Acme Again", "legal@acme.test"))
            .await;
        match duplicate {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "A client with this email already exists."),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_client_requires_contact_fields() {
        let (storage, _temp_dir) = create_test_storage().await;
        let ada = create_test_user(&storage, "ada@example.com").await;

        let mut missing_phone = new_client("Acme Corp", "legal@acme.test");
        missing_phone.phone = "  ".to_string();
        let result = storage.create_client(ada, missing_phone).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let created = storage
            .create_client(ada, new_client("Acme Corp", "legal@acme.test"))
            .await
            .unwrap();
        assert_eq!(created.status, ClientStatus::Active);
        assert_eq!(created.case_count, 0);
    }

    #[tokio::test]
    async fn test_create_case_links_matching_client() {
        let (storage, _temp_dir) = create_test_storage().await;
        let ada = create_test_user(&storage, "ada@example.com").await;

        let mut lead = new_client("Acme Corp", "legal@acme.test");
        lead.status = Some(ClientStatus::Lead);
        let client = storage.create_client(ada, lead).await.unwrap();

        let case = storage
            .create_case(ada, new_case("Acme v. Widgets", "Acme Corp"))
            .await
            .unwrap();
        assert_eq!(case.client_id, Some(client.id));
        assert_eq!(case.status, CaseStatus::Open);
        assert_eq!(case.priority, Priority::Medium);
        assert_eq!(case.value, 0.0);
        assert!(case.case_number.starts_with(&format!("CS-{}-", Utc::now().format("%Y"))));

        storage
            .create_case(ada, new_case("Acme appeal", "Acme Corp"))
            .await
            .unwrap();

        let clients = storage.list_clients(ada).await.unwrap();
        assert_eq!(clients[0].case_count, 2);
        assert_eq!(clients[0].status, ClientStatus::Active);
    }

    #[tokio::test]
    async fn test_create_case_without_matching_client() {
        let (storage, _temp_dir) = create_test_storage().await;
        let ada = create_test_user(&storage, "ada@example.com").await;
        let client = storage
            .create_client(ada, new_client("Acme Corp", "legal@acme.test"))
            .await
            .unwrap();

        // Matching is exact: a different spelling links nothing
        let case = storage
            .create_case(ada, new_case("Walk-in matter", "ACME corp"))
            .await
            .unwrap();
        assert_eq!(case.client_id, None);

        let untouched = storage.list_clients(ada).await.unwrap();
        assert_eq!(untouched[0].id, client.id);
        assert_eq!(untouched[0].case_count, 0);
    }

    #[tokio::test]
    async fn test_create_case_requires_title_and_client_name() {
        let (storage, _temp_dir) = create_test_storage().await;
        let ada = create_test_user(&storage, "ada@example.com").await;

        let result = storage.create_case(ada, new_case("", "Acme Corp")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        let result = storage.create_case(ada, new_case("Matter", " ")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(storage.list_cases(ada).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_case_changes_only_given_fields() {
        let (storage, _temp_dir) = create_test_storage().await;
        let ada = create_test_user(&storage, "ada@example.com").await;

        let hearing = Utc.with_ymd_and_hms(2030, 5, 1, 9, 30, 0).unwrap();
        let mut request = new_case("Acme v. Widgets", "Acme Corp");
        request.next_hearing = Some(hearing);
        request.value = Some(12000.0);
        let case = storage.create_case(ada, request).await.unwrap();

        let updated = storage
            .update_case(
                ada,
                case.id,
                CasePatch {
                    status: Some(CaseStatus::InProgress),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, CaseStatus::InProgress);
        assert_eq!(updated.title, case.title);
        assert_eq!(updated.case_number, case.case_number);
        assert_eq!(updated.next_hearing, Some(hearing));
        assert_eq!(updated.value, 12000.0);

        let cleared = storage
            .update_case(
                ada,
                case.id,
                CasePatch {
                    next_hearing: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.next_hearing, None);
        assert_eq!(cleared.status, CaseStatus::InProgress);

        let unchanged = storage
            .update_case(ada, case.id, CasePatch::default())
            .await
            .unwrap();
        assert_eq!(unchanged, cleared);
    }

    #[tokio::test]
    async fn test_update_client_patch() {
        let (storage, _temp_dir) = create_test_storage().await;
        let ada = create_test_user(&storage, "ada@example.com").await;
        let client = storage
            .create_client(ada, new_client("Acme Corp", "legal@acme.test"))
            .await
            .unwrap();

        let updated = storage
            .update_client(
                ada,
                client.id,
                ClientPatch {
                    status: Some(ClientStatus::Inactive),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, ClientStatus::Inactive);
        assert_eq!(updated.email, client.email);
        assert_eq!(updated.phone, client.phone);

        let missing = storage
            .update_client(ada, Uuid::new_v4(), ClientPatch::default())
            .await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_client_is_idempotent_and_keeps_cases() {
        let (storage, _temp_dir) = create_test_storage().await;
        let ada = create_test_user(&storage, "ada@example.com").await;
        let client = storage
            .create_client(ada, new_client("Acme Corp", "legal@acme.test"))
            .await
            .unwrap();
        let case = storage
            .create_case(ada, new_case("Acme v. Widgets", "Acme Corp"))
            .await
            .unwrap();

        assert_eq!(storage.delete_client(ada, client.id).await.unwrap(), 1);
        assert_eq!(storage.delete_client(ada, client.id).await.unwrap(), 0);
        assert_eq!(storage.delete_client(ada, Uuid::new_v4()).await.unwrap(), 0);

        assert!(storage.list_clients(ada).await.unwrap().is_empty());
        let cases = storage.list_cases(ada).await.unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].id, case.id);
        assert_eq!(cases[0].client_name, "Acme Corp");
    }

    #[tokio::test]
    async fn test_list_cases_newest_start_first() {
        let (storage, _temp_dir) = create_test_storage().await;
        let ada = create_test_user(&storage, "ada@example.com").await;

        for (title, month) in [("January", 1), ("March", 3), ("February", 2)] {
            let mut request = new_case(title, "Acme Corp");
            request.start_date = Some(Utc.with_ymd_and_hms(2025, month, 10, 0, 0, 0).unwrap());
            storage.create_case(ada, request).await.unwrap();
        }

        let titles: Vec<String> = storage
            .list_cases(ada)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(titles, ["March", "February", "January"]);
    }

    #[tokio::test]
    async fn test_notes_attach_to_case_detail() {
        let (storage, _temp_dir) = create_test_storage().await;
        let ada = create_test_user(&storage, "ada@example.com").await;
        let case = storage
            .create_case(ada, new_case("Acme v. Widgets", "Acme Corp"))
            .await
            .unwrap();

        let blank = storage.add_note(ada, case.id, "   ", "Ada").await;
        assert!(matches!(blank, Err(AppError::Validation(_))));

        let note = storage
            .add_note(ada, case.id, "Filed motion to dismiss", "Ada")
            .await
            .unwrap();
        assert_eq!(note.created_by, "Ada");

        let (_, notes, documents) = storage.get_case_detail(ada, case.id).await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].content, "Filed motion to dismiss");
        assert!(documents.is_empty());
    }

    #[tokio::test]
    async fn test_metadata_document_has_no_url() {
        let (storage, _temp_dir) = create_test_storage().await;
        let ada = create_test_user(&storage, "ada@example.com").await;
        let case = storage
            .create_case(ada, new_case("Acme v. Widgets", "Acme Corp"))
            .await
            .unwrap();

        let document = storage
            .record_document(case.id, invoice("Invoice-1001.pdf"), "Ada")
            .await
            .unwrap();
        assert_eq!(document.kind, DocumentKind::Invoice);
        assert!(document.url.is_none());
        assert!(document.public_id.is_none());

        let mut unnamed = invoice("");
        unnamed.size = String::new();
        let result = storage.record_document(case.id, unnamed, "Ada").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_document_checks_case_owner() {
        let (storage, _temp_dir) = create_test_storage().await;
        let ada = create_test_user(&storage, "ada@example.com").await;
        let bob = create_test_user(&storage, "bob@example.com").await;
        let case = storage
            .create_case(ada, new_case("Acme v. Widgets", "Acme Corp"))
            .await
            .unwrap();
        let document = storage
            .record_document(case.id, invoice("Invoice-1001.pdf"), "Ada")
            .await
            .unwrap();

        let foreign = storage.delete_document(bob, document.id).await;
        assert!(matches!(foreign, Err(AppError::NotFound(msg)) if msg == "Document not found"));

        let deleted = storage.delete_document(ada, document.id).await.unwrap();
        assert_eq!(deleted.id, document.id);

        let again = storage.delete_document(ada, document.id).await;
        assert!(matches!(again, Err(AppError::NotFound(_))));

        let (_, _, documents) = storage.get_case_detail(ada, case.id).await.unwrap();
        assert!(documents.is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_stats_reflect_owner_records() {
        let (storage, _temp_dir) = create_test_storage().await;
        let ada = create_test_user(&storage, "ada@example.com").await;
        storage
            .create_client(ada, new_client("Acme Corp", "legal@acme.test"))
            .await
            .unwrap();

        let mut urgent = new_case("Acme v. Widgets", "Acme Corp");
        urgent.priority = Some(Priority::High);
        urgent.value = Some(5000.0);
        storage.create_case(ada, urgent).await.unwrap();

        let mut closed = new_case("Old matter", "Acme Corp");
        closed.status = Some(CaseStatus::Closed);
        closed.priority = Some(Priority::High);
        closed.value = Some(250.0);
        storage.create_case(ada, closed).await.unwrap();

        let stats = storage
            .dashboard_stats(ada, Utc::now().date_naive())
            .await
            .unwrap();
        assert_eq!(stats.active_cases, 1);
        assert_eq!(stats.total_clients, 1);
        assert_eq!(stats.pending_actions, 1);
        assert_eq!(stats.revenue_ytd, 5250.0);
        assert_eq!(stats.monthly_data.last().map(|p| p.value), Some(2));
    }

    #[tokio::test]
    async fn test_profile_and_password_updates() {
        let (storage, _temp_dir) = create_test_storage().await;
        let ada = create_test_user(&storage, "ada@example.com").await;

        let blank = storage.update_user_name(ada, "  ").await;
        assert!(matches!(blank, Err(AppError::Validation(_))));

        let renamed = storage.update_user_name(ada, "Ada Lovelace").await.unwrap();
        assert_eq!(renamed.name, "Ada Lovelace");

        storage.set_password_hash(ada, "$argon2id$other").await.unwrap();
        let user = storage.get_user(ada).await.unwrap();
        assert_eq!(user.password_hash, "$argon2id$other");

        let found = storage.find_user_by_email(" ada@example.com ").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(ada));
    }

    #[tokio::test]
    async fn test_failed_counter_bump_leaves_no_case_behind() {
        use sea_orm::ConnectionTrait;

        let (storage, _temp_dir) = create_test_storage().await;
        let ada = create_test_user(&storage, "ada@example.com").await;
        let client = storage
            .create_client(ada, new_client("Acme Corp", "legal@acme.test"))
            .await
            .unwrap();

        storage
            .db
            .execute_unprepared(
                "CREATE TRIGGER block_client_updates BEFORE UPDATE ON clients \
                 BEGIN SELECT RAISE(ABORT, 'client updates blocked'); END;",
            )
            .await
            .unwrap();

        let result = storage
            .create_case(ada, new_case("Acme v. Widgets", "Acme Corp"))
            .await;
        assert!(matches!(result, Err(AppError::Database(_))));
        assert!(storage.list_cases(ada).await.unwrap().is_empty());

        storage
            .db
            .execute_unprepared("DROP TRIGGER block_client_updates;")
            .await
            .unwrap();

        let case = storage
            .create_case(ada, new_case("Acme v. Widgets", "Acme Corp"))
            .await
            .unwrap();
        assert_eq!(case.client_id, Some(client.id));
        assert_eq!(storage.list_cases(ada).await.unwrap().len(), 1);
        assert_eq!(storage.list_clients(ada).await.unwrap()[0].case_count, 1);
    }

    #[tokio::test]
    async fn test_list_clients_most_recent_contact_first() {
        let (storage, _temp_dir) = create_test_storage().await;
        let ada = create_test_user(&storage, "ada@example.com").await;

        for (name, email, day) in [
            ("Older", "older@test", 3),
            ("Newest", "newest@test", 20),
            ("Middle", "middle@test", 11),
        ] {
            let mut request = new_client(name, email);
            request.last_contact = Some(Utc.with_ymd_and_hms(2025, 2, day, 12, 0, 0).unwrap());
            storage.create_client(ada, request).await.unwrap();
        }

        let names: Vec<String> = storage
            .list_clients(ada)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Newest", "Middle", "Older"]);
    }

    #[tokio::test]
    async fn test_case_detail_lists_newest_notes_and_documents_first() {
        let (storage, _temp_dir) = create_test_storage().await;
        let ada = create_test_user(&storage, "ada@example.com").await;
        let case = storage
            .create_case(ada, new_case("Acme v. Widgets", "Acme Corp"))
            .await
            .unwrap();

        for content in ["First note", "Second note", "Third note"] {
            storage.add_note(ada, case.id, content, "Ada").await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        for name in ["Invoice-1.pdf", "Invoice-2.pdf"] {
            storage
                .record_document(case.id, invoice(name), "Ada")
                .await
                .unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        let (_, notes, documents) = storage.get_case_detail(ada, case.id).await.unwrap();
        let contents: Vec<&str> = notes.iter().map(|n| n.content.as_str()).collect();
        assert_eq!(contents, ["Third note", "Second note", "First note"]);
        let names: Vec<&str> = documents.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["Invoice-2.pdf", "Invoice-1.pdf"]);
    }
}

#[cfg(test)]
mod integration_tests {
    use crate::handlers::users::CreateUserRequest;
    use crate::schemas::ApiResponse;
    use crate::test_utils::test_utils::setup_test_app;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    /// Creates a one-off payment through the API and returns its id.
    async fn create_once_payment(
        server: &TestServer,
        owner_id: i64,
        title: &str,
        due_date: &str,
    ) -> i64 {
        let response = server
            .post("/api/v1/payments")
            .json(&json!({
                "title": title,
                "amount": "50.00",
                "start_date": due_date,
                "frequency": "Once",
                "owner_id": owner_id,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        body.data["created"][0]["id"].as_i64().unwrap()
    }

    /// Changes a payment's canonical status through the API.
    async fn set_payment_status(server: &TestServer, payment_id: i64, status: &str) {
        let response = server
            .put(&format!("/api/v1/payments/{}/status", payment_id))
            .json(&json!({ "status": status }))
            .await;
        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_user() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let create_request = CreateUserRequest {
            username: "testuser".to_string(),
        };

        let response = server.post("/api/v1/users").json(&create_request).await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        assert_eq!(body.message, "User created successfully");
        assert_eq!(body.data["username"], "testuser");
        assert!(body.data["id"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_get_users() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/users").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert!(body.success);
        // The two seeded test users are always present.
        assert!(body.data.len() >= 2);
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/users/99999").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_and_delete_user() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let create_response = server
            .post("/api/v1/users")
            .json(&CreateUserRequest {
                username: "renameme".to_string(),
            })
            .await;
        create_response.assert_status(StatusCode::CREATED);
        let create_body: ApiResponse<serde_json::Value> = create_response.json();
        let user_id = create_body.data["id"].as_i64().unwrap();

        let update_response = server
            .put(&format!("/api/v1/users/{}", user_id))
            .json(&json!({ "username": "renamed" }))
            .await;
        update_response.assert_status(StatusCode::OK);
        let update_body: ApiResponse<serde_json::Value> = update_response.json();
        assert_eq!(update_body.data["username"], "renamed");

        let delete_response = server.delete(&format!("/api/v1/users/{}", user_id)).await;
        delete_response.assert_status(StatusCode::OK);

        let get_response = server.get(&format!("/api/v1/users/{}", user_id)).await;
        get_response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_once_payment_creates_single_occurrence() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/payments")
            .json(&json!({
                "title": "Car insurance",
                "amount": "320.00",
                "start_date": "2025-05-01",
                "frequency": "Once",
                // An end date on a one-off template must not add occurrences.
                "end_date": "2025-12-31",
                "owner_id": 1,
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        assert_eq!(body.data["requested"], 1);
        assert_eq!(body.data["failed"], 0);

        let created = body.data["created"].as_array().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0]["dueDate"], "2025-05-01");
        assert_eq!(created[0]["endDate"], serde_json::Value::Null);
        assert_eq!(created[0]["status"], "Pending");
        assert_eq!(created[0]["active"], false);
        assert!(!created[0]["seriesId"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_monthly_series_expansion() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/payments")
            .json(&json!({
                "title": "Rent",
                "amount": "1000",
                "start_date": "2025-01-01",
                "frequency": "Monthly",
                "end_date": "2025-03-01",
                "owner_id": 1,
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        let created = body.data["created"].as_array().unwrap();
        assert_eq!(created.len(), 3);

        let due_dates: Vec<&str> = created
            .iter()
            .map(|p| p["dueDate"].as_str().unwrap())
            .collect();
        assert_eq!(due_dates, vec!["2025-01-01", "2025-02-01", "2025-03-01"]);

        // All occurrences share one series id.
        let series_id = created[0]["seriesId"].as_str().unwrap();
        assert!(created.iter().all(|p| p["seriesId"] == series_id));
    }

    #[tokio::test]
    async fn test_invalid_template_is_rejected_with_field_errors() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/payments")
            .json(&json!({
                "title": "",
                "amount": "0",
                "start_date": "2025-05-01",
                "frequency": "Weekly",
                "end_date": "2025-04-01",
                "owner_id": 1,
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        let details = body["details"].as_object().unwrap();
        assert!(details.contains_key("title"));
        assert!(details.contains_key("amount"));
        assert!(details.contains_key("end_date"));

        // Nothing was persisted.
        let list: ApiResponse<Vec<serde_json::Value>> =
            server.get("/api/v1/payments").await.json();
        assert!(list.data.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_frequency_is_rejected() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/payments")
            .json(&json!({
                "title": "Gym",
                "amount": "30",
                "start_date": "2025-05-01",
                "frequency": "Fortnightly",
                "owner_id": 1,
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "INVALID_FREQUENCY");
    }

    #[tokio::test]
    async fn test_unknown_owner_is_rejected() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/payments")
            .json(&json!({
                "title": "Gym",
                "amount": "30",
                "start_date": "2025-05-01",
                "frequency": "Once",
                "owner_id": 4242,
            }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "OWNER_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_list_payments_pagination_and_filters() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        // Five daily occurrences.
        let response = server
            .post("/api/v1/payments")
            .json(&json!({
                "title": "Coffee budget",
                "amount": "3.50",
                "start_date": "2025-05-01",
                "frequency": "Daily",
                "end_date": "2025-05-05",
                "owner_id": 1,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let page1: ApiResponse<Vec<serde_json::Value>> =
            server.get("/api/v1/payments?limit=2&page=1").await.json();
        assert_eq!(page1.data.len(), 2);
        assert_eq!(page1.data[0]["dueDate"], "2025-05-01");

        let page3: ApiResponse<Vec<serde_json::Value>> =
            server.get("/api/v1/payments?limit=2&page=3").await.json();
        assert_eq!(page3.data.len(), 1);
        assert_eq!(page3.data[0]["dueDate"], "2025-05-05");

        // Owner filter: user 2 has no payments.
        let other_owner: ApiResponse<Vec<serde_json::Value>> =
            server.get("/api/v1/payments?owner_id=2").await.json();
        assert!(other_owner.data.is_empty());

        // Status filter.
        let pending: ApiResponse<Vec<serde_json::Value>> =
            server.get("/api/v1/payments?status=Pending").await.json();
        assert_eq!(pending.data.len(), 5);
    }

    #[tokio::test]
    async fn test_status_change_derives_active_flag() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let payment_id = create_once_payment(&server, 1, "Water bill", "2025-05-01").await;

        // Status names are accepted case-insensitively.
        let response = server
            .put(&format!("/api/v1/payments/{}/status", payment_id))
            .json(&json!({ "status": "paid" }))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["status"], "Paid");
        assert_eq!(body.data["active"], true);

        let response = server
            .put(&format!("/api/v1/payments/{}/status", payment_id))
            .json(&json!({ "status": "siuuu" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_full_edit_revalidates_template() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let payment_id = create_once_payment(&server, 1, "Phone", "2025-05-01").await;

        let response = server
            .put(&format!("/api/v1/payments/{}", payment_id))
            .json(&json!({ "title": "Phone plan", "amount": "45.00", "due_date": "2025-05-10" }))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["title"], "Phone plan");
        assert_eq!(body.data["dueDate"], "2025-05-10");

        // An edit violating the template constraints is rejected inline.
        let response = server
            .put(&format!("/api/v1/payments/{}", payment_id))
            .json(&json!({ "amount": "0" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert!(body["details"].as_object().unwrap().contains_key("amount"));
    }

    #[tokio::test]
    async fn test_delete_single_occurrence_and_whole_series() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/payments")
            .json(&json!({
                "title": "Rent",
                "amount": "1000",
                "start_date": "2025-01-01",
                "frequency": "Monthly",
                "end_date": "2025-03-01",
                "owner_id": 1,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        let created = body.data["created"].as_array().unwrap();
        let series_id = created[0]["seriesId"].as_str().unwrap().to_string();
        let first_id = created[0]["id"].as_i64().unwrap();
        let second_id = created[1]["id"].as_i64().unwrap();

        // Deleting one occurrence leaves its siblings alone.
        let response = server.delete(&format!("/api/v1/payments/{}", first_id)).await;
        response.assert_status(StatusCode::OK);

        let remaining: ApiResponse<Vec<serde_json::Value>> = server
            .get(&format!("/api/v1/payments?series_id={}", series_id))
            .await
            .json();
        assert_eq!(remaining.data.len(), 2);

        // Opting into series deletion removes the rest.
        let response = server
            .delete(&format!("/api/v1/payments/{}?series=true", second_id))
            .await;
        response.assert_status(StatusCode::OK);

        let remaining: ApiResponse<Vec<serde_json::Value>> = server
            .get(&format!("/api/v1/payments?series_id={}", series_id))
            .await
            .json();
        assert!(remaining.data.is_empty());
    }

    #[tokio::test]
    async fn test_buckets_membership() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        // Reference date for the whole scenario: 2025-06-15.
        let past = create_once_payment(&server, 1, "past-pending", "2025-06-14").await;
        let today = create_once_payment(&server, 1, "due-today", "2025-06-15").await;
        let day30 = create_once_payment(&server, 1, "window-edge", "2025-07-15").await;
        let day31 = create_once_payment(&server, 1, "past-window", "2025-07-16").await;
        let paid_old = create_once_payment(&server, 1, "paid-old", "2025-01-01").await;
        set_payment_status(&server, paid_old, "Paid").await;
        // Inconsistent backend data: marked overdue although dated in the future.
        let marked = create_once_payment(&server, 1, "marked-overdue", "2025-06-20").await;
        set_payment_status(&server, marked, "Overdue").await;

        let response = server
            .get("/api/v1/payments/buckets?reference_date=2025-06-15")
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();

        let ids = |bucket: &str| -> Vec<i64> {
            body.data[bucket]
                .as_array()
                .unwrap()
                .iter()
                .map(|p| p["id"].as_i64().unwrap())
                .collect()
        };

        // Nothing is ever dropped from `all`.
        assert_eq!(ids("all").len(), 6);

        let upcoming = ids("upcoming");
        assert!(upcoming.contains(&today));
        assert!(upcoming.contains(&day30));
        assert!(!upcoming.contains(&day31));
        assert!(!upcoming.contains(&past));
        assert!(!upcoming.contains(&paid_old));
        assert!(!upcoming.contains(&marked));

        let overdue = ids("overdue");
        assert!(overdue.contains(&past));
        // The explicit status is honored regardless of date arithmetic.
        assert!(overdue.contains(&marked));
        assert!(!overdue.contains(&paid_old));
        assert!(!overdue.contains(&today));
    }

    #[tokio::test]
    async fn test_calendar_events() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let paid = create_once_payment(&server, 1, "paid-one", "2025-06-01").await;
        set_payment_status(&server, paid, "Paid").await;
        let pending_future = create_once_payment(&server, 1, "pending-soon", "2025-06-20").await;
        let pending_past = create_once_payment(&server, 1, "late-one", "2025-06-01").await;

        let response = server
            .get("/api/v1/payments/calendar?reference_date=2025-06-15")
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = response.json();
        assert_eq!(body.data.len(), 3);

        let event = |id: i64| {
            body.data
                .iter()
                .find(|e| e["id"].as_i64() == Some(id))
                .unwrap()
        };

        let paid_event = event(paid);
        assert_eq!(paid_event["color"], "green");
        assert_eq!(paid_event["overdue"], false);
        assert_eq!(paid_event["inactive"], false);

        let future_event = event(pending_future);
        assert_eq!(future_event["color"], "amber");
        assert_eq!(future_event["inactive"], true);

        let late_event = event(pending_past);
        assert_eq!(late_event["color"], "red");
        assert_eq!(late_event["overdue"], true);
        assert!(late_event["tooltip"].as_str().unwrap().contains("late-one"));
        assert!(late_event["tooltip"].as_str().unwrap().contains("Pending"));
    }
}

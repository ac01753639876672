#[cfg(test)]
mod integration_tests {
    use crate::handlers::admin::{AdminConfigResponse, ChangeListResponse};
    use crate::handlers::users::{CreateUserRequest, UpdateUserRequest, UserResponse};
    use crate::schemas::{ApiResponse, ErrorResponse, HealthResponse};
    use crate::test_utils::test_utils::{init_test_tracing, setup_test_app};
    use axum::http::StatusCode;
    use axum_test::TestServer;

    async fn test_server() -> TestServer {
        let app = setup_test_app().await;
        TestServer::new(app).unwrap()
    }

    async fn create(server: &TestServer, request: &CreateUserRequest) -> UserResponse {
        let response = server.post("/api/v1/users").json(request).await;
        if response.status_code() != StatusCode::CREATED {
            println!("Error response: {}", response.text());
            panic!("Expected 201 Created, got {}", response.status_code());
        }
        let body: ApiResponse<UserResponse> = response.json();
        body.data
    }

    fn request(email: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: email.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_tracing_outlives_app_setup() {
        let _server = test_server().await;

        assert!(tracing::dispatcher::has_been_set());
        assert!(tracing::enabled!(tracing::Level::WARN));
        assert!(init_test_tracing());
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = test_server().await;

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let body: HealthResponse = response.json();
        assert_eq!(body.status, "healthy");
        assert_eq!(body.database, "connected");
    }

    #[tokio::test]
    async fn test_create_user() {
        let server = test_server().await;

        let create_request = CreateUserRequest {
            email: "New.User@EXAMPLE.COM".to_string(),
            password: Some("pa55word".to_string()),
            username: Some("newuser".to_string()),
            first_name: Some("New".to_string()),
            last_name: Some("User".to_string()),
            ..Default::default()
        };

        let response = server.post("/api/v1/users").json(&create_request).await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        assert_eq!(body.message, "User created successfully");

        let user_data = &body.data;
        assert_eq!(user_data["email"], "New.User@example.com");
        assert_eq!(user_data["username"], "newuser");
        assert_eq!(user_data["full_name"], "New User");
        assert_eq!(user_data["is_active"], true);
        assert_eq!(user_data["is_staff"], false);
        assert_eq!(user_data["is_superuser"], false);
        assert_eq!(user_data["has_usable_password"], true);
        assert!(user_data["id"].as_i64().unwrap() > 0);
        assert!(user_data.get("password").is_none());
    }

    #[tokio::test]
    async fn test_create_user_round_trip() {
        let server = test_server().await;

        let created = create(
            &server,
            &CreateUserRequest {
                email: "roundtrip@Example.org".to_string(),
                username: Some("rt".to_string()),
                first_name: Some("Round".to_string()),
                last_name: Some("Trip".to_string()),
                ..Default::default()
            },
        )
        .await;

        let response = server.get(&format!("/api/v1/users/{}", created.id)).await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<UserResponse> = response.json();
        assert_eq!(body.data.email, "roundtrip@example.org");
        assert_eq!(body.data.username.as_deref(), Some("rt"));
        assert_eq!(body.data.first_name, "Round");
        assert_eq!(body.data.last_name, "Trip");
        assert!(!body.data.has_usable_password);
    }

    #[tokio::test]
    async fn test_create_user_missing_email() {
        let server = test_server().await;

        let response = server
            .post("/api/v1/users")
            .json(&serde_json::json!({ "password": "secret" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert!(!body.success);
        assert_eq!(body.code, "MISSING_REQUIRED_FIELD");

        let response = server.post("/api/v1/users").json(&request("   ")).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_user_overlong_email() {
        let server = test_server().await;
        let email = format!("{}@example.com", "a".repeat(400));

        let response = server.post("/api/v1/users").json(&request(&email)).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "INVALID_EMAIL");
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email() {
        let server = test_server().await;

        // Seeded account differs only in domain case
        let response = server
            .post("/api/v1/users")
            .json(&request("member@EXAMPLE.com"))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "EMAIL_ALREADY_EXISTS");

        let users: ApiResponse<Vec<UserResponse>> = server.get("/api/v1/users").await.json();
        let matching = users
            .data
            .iter()
            .filter(|u| u.email == "member@example.com")
            .count();
        assert_eq!(matching, 1);
    }

    #[tokio::test]
    async fn test_create_user_invalid_username() {
        let server = test_server().await;

        let response = server
            .post("/api/v1/users")
            .json(&CreateUserRequest {
                email: "bad@example.com".to_string(),
                username: Some("bad name!".to_string()),
                ..Default::default()
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "INVALID_USERNAME");
    }

    #[tokio::test]
    async fn test_create_superuser() {
        let server = test_server().await;

        let response = server
            .post("/api/v1/users/superuser")
            .json(&request("boss@example.com"))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<UserResponse> = response.json();
        assert_eq!(body.message, "Superuser created successfully");
        assert!(body.data.is_staff);
        assert!(body.data.is_superuser);
    }

    #[tokio::test]
    async fn test_create_superuser_with_staff_false() {
        let server = test_server().await;

        let response = server
            .post("/api/v1/users/superuser")
            .json(&CreateUserRequest {
                email: "notboss@example.com".to_string(),
                is_staff: Some(false),
                ..Default::default()
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "INVALID_ELEVATION");

        let users: ApiResponse<Vec<UserResponse>> = server.get("/api/v1/users").await.json();
        assert!(users.data.iter().all(|u| u.email != "notboss@example.com"));
    }

    #[tokio::test]
    async fn test_get_users_sorted_by_email() {
        let server = test_server().await;

        let response = server.get("/api/v1/users").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<UserResponse>> = response.json();
        assert!(body.success);
        assert_eq!(body.message, "Users retrieved successfully");
        let emails: Vec<&str> = body.data.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails, vec!["admin@example.com", "member@example.com"]);
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let server = test_server().await;

        let response = server.get("/api/v1/users/99999").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_user() {
        let server = test_server().await;
        let created = create(&server, &request("before@example.com")).await;

        let update_request = UpdateUserRequest {
            email: Some("After@EXAMPLE.com".to_string()),
            first_name: Some("Updated".to_string()),
            password: Some("fresh-password".to_string()),
            ..Default::default()
        };

        let response = server
            .put(&format!("/api/v1/users/{}", created.id))
            .json(&update_request)
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<UserResponse> = response.json();
        assert_eq!(body.message, "User updated successfully");
        assert_eq!(body.data.email, "After@example.com");
        assert_eq!(body.data.first_name, "Updated");
        assert!(body.data.has_usable_password);
        assert_eq!(body.data.id, created.id);
    }

    #[tokio::test]
    async fn test_update_user_email_conflict() {
        let server = test_server().await;
        let created = create(&server, &request("mover@example.com")).await;

        let response = server
            .put(&format!("/api/v1/users/{}", created.id))
            .json(&UpdateUserRequest {
                email: Some("admin@example.com".to_string()),
                ..Default::default()
            })
            .await;

        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_update_user_blank_email_rejected() {
        let server = test_server().await;
        let created = create(&server, &request("keep@example.com")).await;

        let response = server
            .put(&format!("/api/v1/users/{}", created.id))
            .json(&UpdateUserRequest {
                email: Some("".to_string()),
                ..Default::default()
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "MISSING_REQUIRED_FIELD");
    }

    #[tokio::test]
    async fn test_update_user_overlong_email_rejected() {
        let server = test_server().await;
        let created = create(&server, &request("short@example.com")).await;

        let response = server
            .put(&format!("/api/v1/users/{}", created.id))
            .json(&UpdateUserRequest {
                email: Some(format!("{}@example.com", "b".repeat(300))),
                ..Default::default()
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "INVALID_EMAIL");

        let stored: ApiResponse<UserResponse> =
            server.get(&format!("/api/v1/users/{}", created.id)).await.json();
        assert_eq!(stored.data.email, "short@example.com");
    }

    #[tokio::test]
    async fn test_update_user_not_found() {
        let server = test_server().await;

        let response = server
            .put("/api/v1/users/99999")
            .json(&UpdateUserRequest {
                first_name: Some("Nobody".to_string()),
                ..Default::default()
            })
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_user() {
        let server = test_server().await;
        let created = create(&server, &request("gone@example.com")).await;

        let response = server.delete(&format!("/api/v1/users/{}", created.id)).await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<String> = response.json();
        assert_eq!(body.message, "User deleted successfully");

        let response = server.get(&format!("/api/v1/users/{}", created.id)).await;
        response.assert_status(StatusCode::NOT_FOUND);

        let response = server.delete(&format!("/api/v1/users/{}", created.id)).await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_admin_config() {
        let server = test_server().await;

        let response = server.get("/api/v1/admin/users/config").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<AdminConfigResponse> = response.json();
        let config = body.data;
        assert_eq!(
            config.list_display,
            vec!["email", "username", "first_name", "last_name", "is_staff", "is_active", "date_joined"]
        );
        assert_eq!(config.list_filter, vec!["is_staff", "is_superuser", "is_active", "date_joined"]);
        assert_eq!(config.search_fields, vec!["email", "username", "first_name", "last_name"]);
        assert_eq!(config.ordering, vec!["email"]);
        assert_eq!(config.fieldsets.len(), 4);
        assert_eq!(config.fieldsets[1].name.as_deref(), Some("Personal info"));
        assert_eq!(config.add_fieldsets[0].fields, vec!["email", "password1", "password2"]);
    }

    #[tokio::test]
    async fn test_change_list_search_and_filter() {
        let server = test_server().await;
        create(
            &server,
            &CreateUserRequest {
                email: "zed@example.net".to_string(),
                last_name: Some("Member".to_string()),
                ..Default::default()
            },
        )
        .await;

        let response = server.get("/api/v1/admin/users?q=member").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<ChangeListResponse> = response.json();
        assert_eq!(body.data.count, 2);
        let emails: Vec<&str> = body.data.results.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails, vec!["member@example.com", "zed@example.net"]);

        let response = server.get("/api/v1/admin/users?is_superuser=true").await;
        let body: ApiResponse<ChangeListResponse> = response.json();
        assert_eq!(body.data.count, 1);
        assert_eq!(body.data.results[0].email, "admin@example.com");

        let response = server.get("/api/v1/admin/users?date_joined=past_7_days&o=-email").await;
        let body: ApiResponse<ChangeListResponse> = response.json();
        assert_eq!(body.data.count, 3);
        assert_eq!(body.data.results[0].email, "zed@example.net");
    }

    #[tokio::test]
    async fn test_change_list_pagination() {
        let server = test_server().await;

        let response = server.get("/api/v1/admin/users?per_page=1&page=2").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<ChangeListResponse> = response.json();
        assert_eq!(body.data.count, 2);
        assert_eq!(body.data.num_pages, 2);
        assert_eq!(body.data.page, 2);
        assert_eq!(body.data.results.len(), 1);
        assert_eq!(body.data.results[0].email, "member@example.com");
    }

    #[tokio::test]
    async fn test_change_list_rejects_bad_parameters() {
        let server = test_server().await;

        let response = server.get("/api/v1/admin/users?o=password").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "INVALID_ORDERING");

        let response = server.get("/api/v1/admin/users?date_joined=someday").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "INVALID_FILTER");

        let response = server.get("/api/v1/admin/users?page=0").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Environment variables: DATABASE_URL (JWT_SECRET optional)
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;

/// Register, confirm the emailed token and log in
async fn verified_session(server: &TestServer) -> (RegisterRequest, AuthResponse) {
    let request = RegisterRequest::unique();
    let response = server.post("/api/v1/auth/register", &request).await.unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let token = server
        .emailed_token(&request.email, "verify-email")
        .await
        .unwrap();
    let response = server
        .get(&format!("/api/v1/auth/verify-email/{token}"))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .post("/api/v1/auth/login", &LoginRequest::from_register(&request))
        .await
        .unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    (request, auth)
}

async fn create_post(server: &TestServer, token: &str, caption: Option<&str>) -> PostResponse {
    let response = server
        .post_multipart("/api/v1/post/create", token, image_form(caption))
        .await
        .unwrap();
    let created: PostMutationResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    created.post
}

async fn feed_entry(server: &TestServer, post_id: &str) -> FeedPostResponse {
    let response = server.get(&format!("/api/v1/post/{post_id}")).await.unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["database"], "healthy");
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_queues_verification_email() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    let response = server.post("/api/v1/auth/register", &request).await.unwrap();
    let body: MessageResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert!(body.message.contains("verify"));
    assert_eq!(server.email_count(&request.email).await.unwrap(), 1);
    assert!(server
        .emailed_token(&request.email, "verify-email")
        .await
        .is_ok());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    server.post("/api/v1/auth/register", &request).await.unwrap();

    let response = server.post("/api/v1/auth/register", &request).await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(body.error.code, "EMAIL_ALREADY_EXISTS");
    assert!(body.error.details.unwrap()["email"].is_array());
}

#[tokio::test]
async fn test_register_password_mismatch() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let mut request = RegisterRequest::unique();
    request.confirm_password = "different".to_string();

    let response = server.post("/api/v1/auth/register", &request).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(server.email_count(&request.email).await.unwrap(), 0);
}

#[tokio::test]
async fn test_register_rejects_blank_padded_name() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let mut request = RegisterRequest::unique();
    request.name = "   A  ".to_string();

    let response = server.post("/api/v1/auth/register", &request).await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "VALIDATION_ERROR");
    assert!(body.error.details.unwrap()["name"].is_array());
    assert_eq!(server.email_count(&request.email).await.unwrap(), 0);
}

#[tokio::test]
async fn test_login_requires_verified_email() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    server.post("/api/v1/auth/register", &request).await.unwrap();

    let response = server
        .post("/api/v1/auth/login", &LoginRequest::from_register(&request))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body.error.code, "ACCOUNT_NOT_VERIFIED");
}

#[tokio::test]
async fn test_verify_then_login() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, auth) = verified_session(&server).await;

    assert_eq!(auth.token_type, "Bearer");
    assert!(auth.expires_in > 0);
    assert!(!auth.access_token.is_empty());
    assert_eq!(auth.user.email, request.email);
    assert_eq!(auth.user.name, request.name);
}

#[tokio::test]
async fn test_verification_token_is_single_use() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    server.post("/api/v1/auth/register", &request).await.unwrap();
    let token = server
        .emailed_token(&request.email, "verify-email")
        .await
        .unwrap();

    let path = format!("/api/v1/auth/verify-email/{token}");
    assert_status(server.get(&path).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_status(server.get(&path).await.unwrap(), StatusCode::BAD_REQUEST)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unknown_verification_token() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .get("/api/v1/auth/verify-email/definitely-not-issued")
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(body.error.code, "UNKNOWN_TOKEN");
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, _) = verified_session(&server).await;

    let wrong_password = LoginRequest {
        email: request.email.clone(),
        password: "wrongpass".to_string(),
    };
    let unknown_user = LoginRequest {
        email: format!("nobody-{}@example.com", unique_suffix()),
        password: TEST_PASSWORD.to_string(),
    };

    let mut bodies = Vec::new();
    for login in [wrong_password, unknown_user] {
        let response = server.post("/api/v1/auth/login", &login).await.unwrap();
        let body: ErrorBody = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
        bodies.push((body.error.code, body.error.message));
    }

    // Unknown email and wrong password are indistinguishable
    assert_eq!(bodies[0], bodies[1]);
}

#[tokio::test]
async fn test_forgot_password_response_is_uniform() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, _) = verified_session(&server).await;

    let known = server
        .post(
            "/api/v1/auth/forgot-password",
            &ForgotPasswordRequest {
                email: request.email.clone(),
            },
        )
        .await
        .unwrap();
    let known: MessageResponse = assert_json(known, StatusCode::OK).await.unwrap();

    let unknown_email = format!("nobody-{}@example.com", unique_suffix());
    let unknown = server
        .post(
            "/api/v1/auth/forgot-password",
            &ForgotPasswordRequest {
                email: unknown_email.clone(),
            },
        )
        .await
        .unwrap();
    let unknown: MessageResponse = assert_json(unknown, StatusCode::OK).await.unwrap();

    assert_eq!(known.message, unknown.message);
    assert_eq!(server.email_count(&unknown_email).await.unwrap(), 0);
    assert!(server
        .emailed_token(&request.email, "reset-password")
        .await
        .is_ok());
}

#[tokio::test]
async fn test_password_reset_flow() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, _) = verified_session(&server).await;

    server
        .post(
            "/api/v1/auth/forgot-password",
            &ForgotPasswordRequest {
                email: request.email.clone(),
            },
        )
        .await
        .unwrap();
    let token = server
        .emailed_token(&request.email, "reset-password")
        .await
        .unwrap();

    let path = format!("/api/v1/auth/reset-password/{token}");
    let response = server
        .post(&path, &ResetPasswordRequest::matching("newsecret1"))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    // Old password no longer works, new one does
    let old = server
        .post("/api/v1/auth/login", &LoginRequest::from_register(&request))
        .await
        .unwrap();
    assert_status(old, StatusCode::UNAUTHORIZED).await.unwrap();

    let new = server
        .post(
            "/api/v1/auth/login",
            &LoginRequest {
                email: request.email.clone(),
                password: "newsecret1".to_string(),
            },
        )
        .await
        .unwrap();
    assert_status(new, StatusCode::OK).await.unwrap();

    // Reset tokens are single use
    let again = server
        .post(&path, &ResetPasswordRequest::matching("another1"))
        .await
        .unwrap();
    assert_status(again, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Post Tests
// ============================================================================

#[tokio::test]
async fn test_create_post_requires_session() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .client
        .post(format!("{}/api/v1/post/create", server.base_url()))
        .multipart(image_form(Some("hello")))
        .send()
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server
        .post_multipart("/api/v1/post/create", "not-a-jwt", image_form(None))
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

#[tokio::test]
async fn test_create_post_and_read_it_back() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, auth) = verified_session(&server).await;

    let post = create_post(&server, &auth.access_token, Some("  Golden hour ")).await;
    assert_eq!(post.caption.as_deref(), Some("Golden hour"));
    assert_eq!(post.author_id, auth.user.id);
    assert!(post.image.ends_with("photo.png"));

    let entry = feed_entry(&server, &post.id).await;
    assert_eq!(entry.author.as_deref(), Some(request.name.as_str()));
    assert!(entry.likes.is_empty());
    assert!(entry.image_url.starts_with("memory://"));

    let response = server.get("/api/v1/post").await.unwrap();
    let feed: Vec<FeedPostResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(feed.iter().any(|p| p.id == post.id));
}

#[tokio::test]
async fn test_create_post_rejects_non_images() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = verified_session(&server).await;

    let response = server
        .post_multipart(
            "/api/v1/post/create",
            &auth.access_token,
            file_form("notes.pdf", "application/pdf", Some("hello")),
        )
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "INVALID_IMAGE_TYPE");
}

#[tokio::test]
async fn test_create_post_requires_image() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = verified_session(&server).await;

    let form = reqwest::multipart::Form::new().text("caption", "no picture");
    let response = server
        .post_multipart("/api/v1/post/create", &auth.access_token, form)
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "MISSING_IMAGE");
}

#[tokio::test]
async fn test_only_author_can_edit_or_delete() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, author) = verified_session(&server).await;
    let (_, stranger) = verified_session(&server).await;
    let post = create_post(&server, &author.access_token, Some("mine")).await;
    let path = format!("/api/v1/post/{}", post.id);

    let edit = UpdatePostRequest {
        caption: "hijacked".to_string(),
    };
    let response = server
        .patch_auth(&path, &stranger.access_token, &edit)
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body.error.code, "NOT_POST_AUTHOR");

    let response = server.delete_auth(&path, &stranger.access_token).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let edit = UpdatePostRequest {
        caption: "still mine".to_string(),
    };
    let response = server
        .patch_auth(&path, &author.access_token, &edit)
        .await
        .unwrap();
    let updated: PostMutationResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated.post.caption.as_deref(), Some("still mine"));

    let response = server.delete_auth(&path, &author.access_token).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get(&path).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_update_rejects_short_caption() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = verified_session(&server).await;
    let post = create_post(&server, &auth.access_token, None).await;

    let response = server
        .patch_auth(
            &format!("/api/v1/post/{}", post.id),
            &auth.access_token,
            &UpdatePostRequest {
                caption: "x".to_string(),
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_like_and_unlike() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, author) = verified_session(&server).await;
    let (fan_request, fan) = verified_session(&server).await;
    let post = create_post(&server, &author.access_token, Some("like me")).await;
    let like_path = format!("/api/v1/post/{}/like", post.id);

    let response = server.post_auth(&like_path, &fan.access_token).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.post_auth(&like_path, &fan.access_token).await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(body.error.code, "POST_ALREADY_LIKED");

    let entry = feed_entry(&server, &post.id).await;
    assert_eq!(entry.likes.len(), 1);
    assert_eq!(entry.likes[0].user_id, fan.user.id);
    assert_eq!(
        entry.likes[0].name.as_deref(),
        Some(fan_request.name.as_str())
    );

    let response = server.delete_auth(&like_path, &fan.access_token).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.delete_auth(&like_path, &fan.access_token).await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(body.error.code, "POST_NOT_LIKED");

    assert!(feed_entry(&server, &post.id).await.likes.is_empty());
}

#[tokio::test]
async fn test_missing_post_is_not_found() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = verified_session(&server).await;
    let missing = uuid::Uuid::new_v4();

    let response = server.get(&format!("/api/v1/post/{missing}")).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server
        .post_auth(&format!("/api/v1/post/{missing}/like"), &auth.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_malformed_post_id() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/v1/post/12345").await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "INVALID_PATH_PARAMETER");
}

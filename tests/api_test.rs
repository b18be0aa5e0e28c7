//! HTTP flows against the in-memory store

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use guzei::api::create_router;
use guzei::{create_app_state_with_config, AppConfig};

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl TestResponse {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }
}

async fn create_test_app() -> Router {
    let mut config = AppConfig::default();
    config.password.memory_kib = 8;
    config.password.iterations = 1;
    config.password.parallelism = 1;
    config.auth.jwt_secret = "integration-test-secret".to_string();

    let state = create_app_state_with_config(&config).await.unwrap();
    create_router(state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<&str>,
    token: Option<&str>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();

    TestResponse {
        status,
        headers,
        body,
    }
}

async fn create_user(app: &Router, email: &str, password: &str, admin: bool) -> Value {
    let body = json!({"email": email, "password": password, "admin": admin}).to_string();
    let response = send(app, Method::POST, "/users", Some(&body), None).await;

    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
    response.json()["Data"].clone()
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let body = json!({"email": email, "password": password}).to_string();
    let response = send(app, Method::POST, "/authentication-tokens", Some(&body), None).await;

    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
    response.json()["AuthenticationToken"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_status() {
    let app = create_test_app().await;

    let response = send(&app, Method::GET, "/status", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({"Status": "OK"}));
    assert!(response.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_create_user() {
    let app = create_test_app().await;

    let data = create_user(&app, "msyt@gmail.com", "qweqweqwe", true).await;

    assert_eq!(data["email"], "msyt@gmail.com");
    assert_eq!(data["admin"], true);
    assert!(data["id"].as_str().is_some());
    assert!(data["created"].as_str().is_some());
    assert!(data.get("hashed_password").is_none());
    assert!(!data.to_string().contains("qweqweqwe"));
}

#[tokio::test]
async fn test_create_user_validation() {
    let app = create_test_app().await;

    let cases = [
        (
            json!({"email": "msyt", "password": "qweqweqwe"}),
            json!({"email": "Must be a valid email address"}),
        ),
        (
            json!({"email": "msyt@gmail.com", "password": "qwe"}),
            json!({"password": "Password is too short"}),
        ),
        (
            json!({"email": "msyt@gmail.com", "password": "a".repeat(73)}),
            json!({"password": "Password is too long"}),
        ),
        (
            json!({"email": "msyt@gmail.com", "password": "password"}),
            json!({"password": "Password is too common"}),
        ),
        (
            json!({}),
            json!({"email": "Email is required", "password": "Password is required"}),
        ),
    ];

    for (body, field_errors) in cases {
        let response = send(&app, Method::POST, "/users", Some(&body.to_string()), None).await;

        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json(), json!({"FieldErrors": field_errors}));
    }

    let response = send(&app, Method::GET, "/users", None, None).await;
    assert_eq!(response.json()["total"], 0);
}

#[tokio::test]
async fn test_create_user_duplicate_email() {
    let app = create_test_app().await;
    create_user(&app, "msyt@gmail.com", "qweqweqwe", false).await;

    let body = json!({"email": "msyt@gmail.com", "password": "asdasdasd"}).to_string();
    let response = send(&app, Method::POST, "/users", Some(&body), None).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.json(),
        json!({"FieldErrors": {"email": "Email is already in use"}})
    );

    let response = send(&app, Method::GET, "/users", None, None).await;
    assert_eq!(response.json()["total"], 1);
}

#[tokio::test]
async fn test_malformed_bodies() {
    let app = create_test_app().await;

    let cases = [
        ("", "Body must not be empty"),
        ("{\"email\": \"msyt@gmail.com\",", "Body contains badly-formed JSON"),
        ("{\"email\": 5}", "Body contains incorrect JSON type"),
        ("{\"role\": \"root\"}", "Body contains unknown key \"role\""),
        ("{} {}", "Body must only contain a single JSON value"),
    ];

    for (body, message) in cases {
        let response = send(&app, Method::POST, "/users", Some(body), None).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(response.json(), json!({"Error": message}));
    }
}

#[tokio::test]
async fn test_body_too_large() {
    let app = create_test_app().await;
    let body = format!("{{\"email\": \"{}\"}}", "a".repeat(1_048_576));

    let response = send(&app, Method::POST, "/users", Some(&body), None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json(),
        json!({"Error": "Body must not be larger than 1048576 bytes"})
    );
}

#[tokio::test]
async fn test_list_users_paging() {
    let app = create_test_app().await;

    for n in 0..34 {
        create_user(&app, &format!("msyt_{}@gmail.com", n), "qweqweqwe", false).await;
    }

    let response = send(&app, Method::GET, "/users", None, None).await;
    assert_eq!(response.status, StatusCode::OK);

    let json = response.json();
    assert_eq!(json["data"].as_array().unwrap().len(), 20);
    assert_eq!(json["total"], 34);
    assert_eq!(json["pages"], 2);
    assert_eq!(json["page"], 1);
    assert_eq!(json["pageSize"], 20);
    assert_eq!(json["data"][0]["email"], "msyt_0@gmail.com");

    let json = send(&app, Method::GET, "/users?pageNumber=2", None, None)
        .await
        .json();
    assert_eq!(json["data"].as_array().unwrap().len(), 14);
    assert_eq!(json["data"][0]["email"], "msyt_20@gmail.com");

    let json = send(&app, Method::GET, "/users?pageNumber=3&pageSize=15", None, None)
        .await
        .json();
    assert_eq!(json["data"].as_array().unwrap().len(), 4);
    assert_eq!(json["pages"], 3);
    assert_eq!(json["pageSize"], 15);

    let response = send(&app, Method::GET, "/users?pageNumber=9", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.json()["data"].as_array().unwrap().is_empty());
    assert_eq!(response.json()["total"], 34);
}

#[tokio::test]
async fn test_list_users_bad_params() {
    let app = create_test_app().await;

    let cases = [
        ("/users?pageSize=0", "pageSize"),
        ("/users?pageSize=-3", "pageSize"),
        ("/users?pageSize=qwe", "pageSize"),
        ("/users?pageNumber=-123", "pageNumber"),
        ("/users?pageNumber=1.5", "pageNumber"),
    ];

    for (uri, field) in cases {
        let response = send(&app, Method::GET, uri, None, None).await;

        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
        assert_eq!(
            response.json(),
            json!({"FieldErrors": {field: format!("{} must be a positive integer", field)}})
        );
    }
}

#[tokio::test]
async fn test_list_users_repeated_params_use_first_value() {
    let app = create_test_app().await;

    for n in 0..7 {
        create_user(&app, &format!("msyt_{}@gmail.com", n), "qweqweqwe", false).await;
    }

    let response = send(&app, Method::GET, "/users?pageSize=5&pageSize=abc", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["pageSize"], 5);
    assert_eq!(response.json()["data"].as_array().unwrap().len(), 5);

    let response = send(&app, Method::GET, "/users?pageNumber=abc&pageNumber=2", None, None).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.json(),
        json!({"FieldErrors": {"pageNumber": "pageNumber must be a positive integer"}})
    );
}

#[tokio::test]
async fn test_authentication_tokens() {
    let app = create_test_app().await;
    let user = create_user(&app, "msyt@gmail.com", "qweqweqwe", false).await;

    let body = json!({"Email": "msyt@gmail.com", "Password": "qweqweqwe"}).to_string();
    let response = send(&app, Method::POST, "/authentication-tokens", Some(&body), None).await;

    assert_eq!(response.status, StatusCode::CREATED);
    let json = response.json();
    assert!(!json["AuthenticationToken"].as_str().unwrap().is_empty());
    assert!(json["AuthenticationTokenExpiry"].as_str().is_some());

    let token = json["AuthenticationToken"].as_str().unwrap();
    let response = send(
        &app,
        Method::GET,
        &format!("/users/{}", user["id"].as_str().unwrap()),
        None,
        Some(token),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["Data"]["email"], "msyt@gmail.com");
}

#[tokio::test]
async fn test_authentication_failures() {
    let app = create_test_app().await;
    create_user(&app, "msyt@gmail.com", "qweqweqwe", false).await;

    let cases = [
        (
            json!({"email": "msyt@gmail.com", "password": "asdasdasd"}),
            json!({"password": "Password is incorrect"}),
        ),
        (
            json!({"email": "msyt@gmail.com", "password": ""}),
            json!({"password": "Password is required"}),
        ),
        (
            json!({"email": "nobody@gmail.com", "password": "qweqweqwe"}),
            json!({"email": "Email address could not be found"}),
        ),
        (json!({}), json!({"email": "Email is required"})),
    ];

    for (body, field_errors) in cases {
        let response = send(
            &app,
            Method::POST,
            "/authentication-tokens",
            Some(&body.to_string()),
            None,
        )
        .await;

        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json(), json!({"FieldErrors": field_errors}));
    }
}

#[tokio::test]
async fn test_protected_route() {
    let app = create_test_app().await;
    create_user(&app, "msyt@gmail.com", "qweqweqwe", false).await;

    let response = send(&app, Method::GET, "/protected", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json(),
        json!({"Error": "You must be authenticated to access this resource"})
    );
    assert_eq!(response.headers[header::VARY], "Authorization");

    let response = send(&app, Method::GET, "/protected", None, Some("not-a-jwt")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json(), json!({"Error": "Invalid authentication token"}));
    assert_eq!(response.headers[header::WWW_AUTHENTICATE], "Bearer");

    let token = login(&app, "msyt@gmail.com", "qweqweqwe").await;
    let response = send(&app, Method::GET, "/protected", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "This is a protected handler");
}

#[tokio::test]
async fn test_token_for_deleted_user_is_rejected() {
    let app = create_test_app().await;
    create_user(&app, "root@gmail.com", "qweqweqwe", true).await;
    let user = create_user(&app, "msyt@gmail.com", "qweqweqwe", false).await;

    let admin_token = login(&app, "root@gmail.com", "qweqweqwe").await;
    let user_token = login(&app, "msyt@gmail.com", "qweqweqwe").await;

    let uri = format!("/users/{}", user["id"].as_str().unwrap());
    let response = send(&app, Method::DELETE, &uri, None, Some(&admin_token)).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = send(&app, Method::GET, "/protected", None, Some(&user_token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json(), json!({"Error": "Invalid authentication token"}));
}

#[tokio::test]
async fn test_admin_operations() {
    let app = create_test_app().await;
    create_user(&app, "root@gmail.com", "qweqweqwe", true).await;
    let user = create_user(&app, "msyt@gmail.com", "qweqweqwe", false).await;
    let user_uri = format!("/users/{}", user["id"].as_str().unwrap());

    let admin_token = login(&app, "root@gmail.com", "qweqweqwe").await;
    let user_token = login(&app, "msyt@gmail.com", "qweqweqwe").await;

    let response = send(&app, Method::DELETE, &user_uri, None, Some(&user_token)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = send(&app, Method::DELETE, &user_uri, None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let admin_uri = format!("{}/admin", user_uri);
    let response = send(
        &app,
        Method::PUT,
        &admin_uri,
        Some(r#"{"admin": true}"#),
        Some(&admin_token),
    )
    .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = send(&app, Method::GET, &user_uri, None, None).await;
    assert_eq!(response.json()["Data"]["admin"], true);

    let response = send(&app, Method::DELETE, &user_uri, None, Some(&admin_token)).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = send(&app, Method::GET, &user_uri, None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.json(),
        json!({"Error": "The requested resource could not be found"})
    );

    let response = send(&app, Method::DELETE, &user_uri, None, Some(&admin_token)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_password() {
    let app = create_test_app().await;
    let user = create_user(&app, "msyt@gmail.com", "qweqweqwe", false).await;
    let other = create_user(&app, "other@gmail.com", "qweqweqwe", false).await;

    let token = login(&app, "msyt@gmail.com", "qweqweqwe").await;
    let uri = format!("/users/{}/password", user["id"].as_str().unwrap());

    let response = send(&app, Method::PUT, &uri, Some(r#"{"password": "qwe"}"#), Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.json(),
        json!({"FieldErrors": {"password": "Password is too short"}})
    );

    let response = send(
        &app,
        Method::PUT,
        &uri,
        Some(r#"{"password": "asdasdasd"}"#),
        Some(&token),
    )
    .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    login(&app, "msyt@gmail.com", "asdasdasd").await;

    let other_uri = format!("/users/{}/password", other["id"].as_str().unwrap());
    let response = send(
        &app,
        Method::PUT,
        &other_uri,
        Some(r#"{"password": "asdasdasd"}"#),
        Some(&token),
    )
    .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_route_and_method() {
    let app = create_test_app().await;

    let response = send(&app, Method::GET, "/nowhere", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.json(),
        json!({"Error": "The requested resource could not be found"})
    );

    let response = send(&app, Method::DELETE, "/status", None, None).await;
    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        response.json(),
        json!({"Error": "The DELETE method is not supported for this resource"})
    );

    let response = send(&app, Method::GET, "/users/not-a-uuid", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

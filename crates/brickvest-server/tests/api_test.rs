//! End-to-end API tests driving the full router against the
//! in-memory backend.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use brickvest_auth::AuthConfig;
use brickvest_core::models::user::{AdminUpdateUser, Role};
use brickvest_core::storage::{PropertyStore, UserStore};
use brickvest_memstore::MemStorage;
use brickvest_server::routes;
use brickvest_server::state::AppState;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> (Router, MemStorage) {
    let storage = MemStorage::new();
    storage.initialize_properties().await.unwrap();
    let state = AppState::new(storage.clone(), AuthConfig::default());
    (routes::router(state), storage)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder
        .body(match body {
            Some(value) => Body::from(value.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Register a user and return their bearer token.
async fn register(app: &Router, username: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/register",
        None,
        Some(json!({ "username": username, "password": "correct-horse-battery" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["token"].as_str().unwrap().to_string()
}

async fn deposit(app: &Router, token: &str, amount: i64) {
    let (status, _) = send(
        app,
        "POST",
        "/api/wallet/deposit",
        Some(token),
        Some(json!({ "amount": amount })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn register_returns_session_and_user_without_hash() {
    let (app, _) = app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({ "username": "alice", "password": "long-enough-pw" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["token"].as_str().unwrap().len() >= 43);
    assert_eq!(body["user"]["username"], "alice");
    assert!(body["user"].get("password_hash").is_none());
    assert_eq!(body["user"]["wallet_balance"], "0");
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let (app, _) = app().await;
    register(&app, "bob").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({ "username": "bob", "password": "another-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Username already exists");
}

#[tokio::test]
async fn short_password_is_rejected() {
    let (app, _) = app().await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({ "username": "carol", "password": "short" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_and_logout_lifecycle() {
    let (app, _) = app().await;
    register(&app, "dave").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "username": "dave", "password": "correct-horse-battery" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", "/api/user", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "dave");

    let (status, _) = send(&app, "POST", "/api/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    // The token is dead after logout.
    let (status, _) = send(&app, "GET", "/api/user", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let (app, _) = app().await;
    register(&app, "erin").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "username": "erin", "password": "wrong-password-here" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let (app, _) = app().await;
    for uri in ["/api/wallet", "/api/portfolio", "/api/cards", "/api/user"] {
        let (status, _) = send(&app, "GET", uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn property_listing_defaults_to_available() {
    let (app, _) = app().await;
    let (status, body) = send(&app, "GET", "/api/properties", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let properties = body.as_array().unwrap();
    assert!(!properties.is_empty());
    assert!(properties.iter().all(|p| p["filter"] == "Available"));

    let (status, _) = send(&app, "GET", "/api/properties?filter=Funded", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/api/properties?filter=bogus", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid filter");
}

#[tokio::test]
async fn property_detail_handles_bad_ids() {
    let (app, _) = app().await;

    let (status, body) = send(&app, "GET", "/api/properties/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid property ID");

    let missing = uuid::Uuid::new_v4();
    let (status, _) = send(&app, "GET", &format!("/api/properties/{missing}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deposit_withdraw_sequence_keeps_ledger_consistent() {
    let (app, _) = app().await;
    let token = register(&app, "frank").await;

    deposit(&app, &token, 100_000).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/wallet/withdraw",
        Some(&token),
        Some(json!({ "amount": 20_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], "80000");

    deposit(&app, &token, 5_000).await;

    let (_, body) = send(&app, "GET", "/api/wallet", Some(&token), None).await;
    assert_eq!(body["balance"], "85000");

    // Ledger sums to the balance.
    let (_, txns) = send(&app, "GET", "/api/wallet/transactions", Some(&token), None).await;
    let sum: i64 = txns
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["amount"].as_str().unwrap().parse::<i64>().unwrap())
        .sum();
    assert_eq!(sum, 85_000);
}

#[tokio::test]
async fn overdraw_fails_and_leaves_state_unchanged() {
    let (app, _) = app().await;
    let token = register(&app, "grace").await;
    deposit(&app, &token, 50_000).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/wallet/withdraw",
        Some(&token),
        Some(json!({ "amount": 80_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Insufficient funds");

    let (_, body) = send(&app, "GET", "/api/wallet", Some(&token), None).await;
    assert_eq!(body["balance"], "50000");

    let (_, txns) = send(&app, "GET", "/api/wallet/transactions", Some(&token), None).await;
    assert_eq!(txns.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn negative_amounts_are_rejected() {
    let (app, _) = app().await;
    let token = register(&app, "heidi").await;

    for uri in ["/api/wallet/deposit", "/api/wallet/withdraw"] {
        let (status, body) = send(&app, "POST", uri, Some(&token), Some(json!({ "amount": -5 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["message"], "Invalid amount");
    }
}

#[tokio::test]
async fn deposit_accepts_fractional_amounts() {
    let (app, _) = app().await;
    let token = register(&app, "sybil").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/wallet/deposit",
        Some(&token),
        Some(json!({ "amount": 1000.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], "1000.5");
}

#[tokio::test]
async fn malformed_json_is_rejected_with_json_message() {
    let (app, _) = app().await;
    let token = register(&app, "rupert").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/wallet/deposit")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from("{\"amount\": }"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("application/json"));
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["message"].is_string());

    // Type mismatches take the same shape.
    let (status, body) = send(
        &app,
        "POST",
        "/api/wallet/deposit",
        Some(&token),
        Some(json!({ "amount": "not-a-number" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn bank_withdrawal_masks_the_account() {
    let (app, _) = app().await;
    let token = register(&app, "ivan").await;
    deposit(&app, &token, 10_000).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/wallet/withdraw",
        Some(&token),
        Some(json!({
            "amount": 2_000,
            "method": "bank",
            "bank_name": "Emirates NBD",
            "account_number": "1234567890",
            "branch": "Downtown",
            "swift_code": "EBILAEAD",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, txns) = send(&app, "GET", "/api/wallet/transactions", Some(&token), None).await;
    let entry = &txns.as_array().unwrap()[0];
    assert_eq!(entry["method"], "bank");
    assert_eq!(entry["organization"], "Emirates NBD");
    assert_eq!(entry["account"], "****7890");
    let description = entry["description"].as_str().unwrap();
    assert!(description.contains("Emirates NBD"));
    assert!(description.contains("Downtown"));
    assert!(description.contains("EBILAEAD"));
}

#[tokio::test]
async fn invest_flow_end_to_end() {
    let (app, _) = app().await;
    let token = register(&app, "judy").await;
    deposit(&app, &token, 50_000).await;

    let (_, properties) = send(&app, "GET", "/api/properties", None, None).await;
    let property = &properties.as_array().unwrap()[0];
    let property_id = property["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/properties/{property_id}/invest"),
        Some(&token),
        Some(json!({ "amount": 30_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Investment successful");
    assert_eq!(body["investment"]["shares"], "30000");
    assert_eq!(body["investment"]["status"], "active");

    let (_, wallet) = send(&app, "GET", "/api/wallet", Some(&token), None).await;
    assert_eq!(wallet["balance"], "20000");

    let (_, portfolio) = send(&app, "GET", "/api/portfolio", Some(&token), None).await;
    let rows = portfolio.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["property"]["id"].as_str().unwrap(), property_id);

    let (_, txns) = send(&app, "GET", "/api/wallet/transactions", Some(&token), None).await;
    let latest = &txns.as_array().unwrap()[0];
    assert_eq!(latest["kind"], "investment");
    assert_eq!(latest["amount"], "-30000");
    assert_eq!(latest["related_property_id"].as_str().unwrap(), property_id);
}

#[tokio::test]
async fn invest_with_insufficient_balance_fails_cleanly() {
    let (app, _) = app().await;
    let token = register(&app, "kate").await;
    deposit(&app, &token, 100).await;

    let (_, properties) = send(&app, "GET", "/api/properties", None, None).await;
    let property_id = properties.as_array().unwrap()[0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/properties/{property_id}/invest"),
        Some(&token),
        Some(json!({ "amount": 5_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Insufficient wallet balance");

    let (_, wallet) = send(&app, "GET", "/api/wallet", Some(&token), None).await;
    assert_eq!(wallet["balance"], "100");
    let (_, portfolio) = send(&app, "GET", "/api/portfolio", Some(&token), None).await;
    assert!(portfolio.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn invest_in_funded_property_is_rejected() {
    let (app, _) = app().await;
    let token = register(&app, "leo").await;
    deposit(&app, &token, 100_000).await;

    let (_, funded) = send(&app, "GET", "/api/properties?filter=Funded", None, None).await;
    let property_id = funded.as_array().unwrap()[0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/properties/{property_id}/invest"),
        Some(&token),
        Some(json!({ "amount": 10_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Property is not available for investment");
}

#[tokio::test]
async fn card_responses_are_always_masked() {
    let (app, _) = app().await;
    let token = register(&app, "mallory").await;

    let (status, card) = send(
        &app,
        "POST",
        "/api/cards",
        Some(&token),
        Some(json!({
            "card_number": "4242424242424242",
            "cardholder_name": "Mallory",
            "expiry_date": "12/27",
            "card_type": "Visa",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(card["card_number"], "**** **** **** 4242");
    assert_eq!(card["is_default"], true);
    assert!(!card.to_string().contains("4242424242424242"));

    let (_, cards) = send(&app, "GET", "/api/cards", Some(&token), None).await;
    assert!(!cards.to_string().contains("4242424242424242"));
    for card in cards.as_array().unwrap() {
        let masked = card["card_number"].as_str().unwrap();
        let last4 = card["last_four_digits"].as_str().unwrap();
        assert_eq!(masked, format!("**** **** **** {last4}"));
    }
}

#[tokio::test]
async fn deleting_default_card_promotes_another() {
    let (app, _) = app().await;
    let token = register(&app, "nina").await;

    let (_, first) = send(
        &app,
        "POST",
        "/api/cards",
        Some(&token),
        Some(json!({
            "card_number": "4242424242424242",
            "cardholder_name": "Nina",
            "expiry_date": "12/27",
            "card_type": "Visa",
        })),
    )
    .await;
    let (_, second) = send(
        &app,
        "POST",
        "/api/cards",
        Some(&token),
        Some(json!({
            "card_number": "5555444433331111",
            "cardholder_name": "Nina",
            "expiry_date": "01/29",
            "card_type": "Mastercard",
        })),
    )
    .await;
    assert_eq!(second["is_default"], false);

    let first_id = first["id"].as_str().unwrap();
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/cards/{first_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, cards) = send(&app, "GET", "/api/cards", Some(&token), None).await;
    let cards = cards.as_array().unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["is_default"], true);
}

#[tokio::test]
async fn card_deposit_records_card_metadata() {
    let (app, _) = app().await;
    let token = register(&app, "oscar").await;

    let (_, card) = send(
        &app,
        "POST",
        "/api/cards",
        Some(&token),
        Some(json!({
            "card_number": "4242424242424242",
            "cardholder_name": "Oscar",
            "expiry_date": "12/27",
            "card_type": "Visa",
        })),
    )
    .await;
    let card_id = card["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        "/api/wallet/deposit",
        Some(&token),
        Some(json!({ "amount": 1_000, "method": "card", "card_id": card_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, txns) = send(&app, "GET", "/api/wallet/transactions", Some(&token), None).await;
    let entry = &txns.as_array().unwrap()[0];
    assert_eq!(entry["method"], "card");
    assert_eq!(entry["organization"], "Visa");
    assert_eq!(entry["account"], "**** **** **** 4242");
}

#[tokio::test]
async fn wallet_bodies_accept_camel_case_keys() {
    let (app, _) = app().await;
    let token = register(&app, "trent").await;

    let (_, card) = send(
        &app,
        "POST",
        "/api/cards",
        Some(&token),
        Some(json!({
            "card_number": "4242424242424242",
            "cardholder_name": "Trent",
            "expiry_date": "12/27",
            "card_type": "Visa",
        })),
    )
    .await;
    let card_id = card["id"].as_str().unwrap();

    // `cardId` is honored and `cvv` is tolerated.
    let (status, _) = send(
        &app,
        "POST",
        "/api/wallet/deposit",
        Some(&token),
        Some(json!({ "amount": 10_000, "method": "card", "cardId": card_id, "cvv": "123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        "/api/wallet/withdraw",
        Some(&token),
        Some(json!({
            "amount": 2_000,
            "method": "bank",
            "bankName": "Emirates NBD",
            "accountNumber": "1234567890",
            "swiftCode": "EBILAEAD",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, txns) = send(&app, "GET", "/api/wallet/transactions", Some(&token), None).await;
    let entry = &txns.as_array().unwrap()[0];
    assert_eq!(entry["method"], "bank");
    assert_eq!(entry["organization"], "Emirates NBD");
    assert_eq!(entry["account"], "****7890");
}

#[tokio::test]
async fn profile_update_merges_fields() {
    let (app, _) = app().await;
    let token = register(&app, "peggy").await;

    let (status, body) = send(
        &app,
        "PATCH",
        "/api/profile",
        Some(&token),
        Some(json!({ "full_name": "Peggy Stone", "email": "peggy@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["full_name"], "Peggy Stone");
    assert_eq!(body["email"], "peggy@example.com");
    // Untouched field stays untouched.
    assert!(body["phone_number"].is_null());
}

#[tokio::test]
async fn admin_routes_reject_regular_users() {
    let (app, _) = app().await;
    let token = register(&app, "quentin").await;

    let (status, _) = send(&app, "GET", "/api/admin/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_mutations_append_audit_entries() {
    let (app, storage) = app().await;
    let admin_token = register(&app, "root-admin").await;
    let user_token = register(&app, "victim").await;
    let _ = user_token;

    // Promote via storage; there is no self-service path to admin.
    let admin = storage.get_user_by_username("root-admin").await.unwrap();
    storage
        .update_user_by_admin(
            admin.id,
            AdminUpdateUser {
                role: Some(Role::Admin),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let target = storage.get_user_by_username("victim").await.unwrap();
    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/admin/users/{}", target.id),
        Some(&admin_token),
        Some(json!({ "is_verified": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_verified"], true);

    let (status, logs) = send(&app, "GET", "/api/admin/audit-logs", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let logs = logs.as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["action"], "update_user");
    assert_eq!(logs[0]["entity_id"].as_str().unwrap(), target.id.to_string());

    let (status, users) = send(&app, "GET", "/api/admin/users", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(users.as_array().unwrap().len() >= 2);
}

#[tokio::test]
async fn admin_media_lifecycle_with_audit() {
    let (app, storage) = app().await;
    let admin_token = register(&app, "media-admin").await;
    let admin = storage.get_user_by_username("media-admin").await.unwrap();
    storage
        .update_user_by_admin(
            admin.id,
            AdminUpdateUser {
                role: Some(Role::Admin),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let (_, properties) = send(&app, "GET", "/api/properties", None, None).await;
    let property_id = properties.as_array().unwrap()[0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, image) = send(
        &app,
        "POST",
        &format!("/api/admin/properties/{property_id}/images"),
        Some(&admin_token),
        Some(json!({ "image_url": "https://img.example/1.jpg", "display_order": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, images) = send(
        &app,
        "GET",
        &format!("/api/properties/{property_id}/images"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(images.as_array().unwrap().len(), 1);

    let image_id = image["id"].as_str().unwrap();
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/admin/images/{image_id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, logs) = send(&app, "GET", "/api/admin/audit-logs", Some(&admin_token), None).await;
    let actions: Vec<&str> = logs
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["action"].as_str().unwrap())
        .collect();
    assert!(actions.contains(&"add_property_image"));
    assert!(actions.contains(&"delete_property_image"));
}

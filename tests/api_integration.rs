//! End-to-end API integration tests
//!
//! These tests drive the complete router over the in-memory store:
//! - Catalogue management and pagination rules
//! - Cart mutation, ownership and duplicate handling
//! - Checkout and order lifecycle
//! - Bearer authentication and the login callback

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for oneshot
use uuid::Uuid;

use storefront_api::api::middleware::login_session_layer;
use storefront_api::api::{self, AppState, Channels, Repositories};
use storefront_api::auth::{jwt, AuthError, Claims, IdentityProvider, TokenSet};
use storefront_api::domain::repositories::UserRepository;
use storefront_api::domain::user::{Email, User, UserRole};
use storefront_api::infrastructure::repositories::InMemoryStore;
use storefront_api::notifications::LogSender;

const SECRET: &[u8] = b"integration-test-secret";
const ISSUER: &str = "https://id.example.test/";
const AUDIENCE: &str = "storefront-tests";
const GOOD_CODE: &str = "good-code";

fn mint_token(sub: &str, email: &str) -> String {
    let claims = json!({
        "sub": sub,
        "email": email,
        "name": "Test Shopper",
        "iss": ISSUER,
        "aud": AUDIENCE,
        "exp": (Utc::now() + Duration::hours(1)).timestamp(),
    });
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap()
}

/// Identity provider that signs with a shared secret
struct TestIdentity;

#[async_trait]
impl IdentityProvider for TestIdentity {
    async fn authorization_url(&self, state: &str) -> Result<String, AuthError> {
        Ok(format!("{}authorize?response_type=code&state={}", ISSUER, state))
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenSet, AuthError> {
        if code != GOOD_CODE {
            return Err(AuthError::Exchange("invalid_grant".to_string()));
        }
        Ok(TokenSet {
            id_token: mint_token("oidc|newcomer", "Newcomer@Shop.test"),
        })
    }

    async fn verify(&self, id_token: &str) -> Result<Claims, AuthError> {
        jwt::verify_token(
            id_token,
            &DecodingKey::from_secret(SECRET),
            &jwt::validation_for(Algorithm::HS256, ISSUER, AUDIENCE),
        )
    }
}

struct TestApp {
    router: Router,
    store: Arc<InMemoryStore>,
}

impl TestApp {
    fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let state = AppState::new(
            Repositories::in_memory(store.clone()),
            Arc::new(TestIdentity),
            Channels {
                email: Arc::new(LogSender),
                sms: Arc::new(LogSender),
                admin_address: Some("admin@shop.test".to_string()),
            },
        );

        Self {
            router: api::router(state, login_session_layer(false)),
            store,
        }
    }

    /// Creates a local account and returns a bearer token for it
    async fn user(&self, name: &str, role: UserRole) -> String {
        let sub = format!("oidc|{}", name);
        let email = format!("{}@shop.test", name);
        let mut user = User::provision(sub.clone(), name, Email::new(email.clone()).unwrap());
        user.role = role;
        UserRepository::create(self.store.as_ref(), &user)
            .await
            .unwrap();
        mint_token(&sub, &email)
    }

    async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.send(request.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    /// Starts a login and returns the session cookie and the issued state
    async fn start_login(&self) -> (String, String) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/auth/login")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);

        let cookie = response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();
        let state = response.headers()[header::LOCATION]
            .to_str()
            .unwrap()
            .split("state=")
            .nth(1)
            .unwrap()
            .to_string();
        (cookie, state)
    }

    async fn callback(&self, query: &str, cookie: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::builder().uri(format!("/api/auth/callback?{}", query));
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::empty()).unwrap()).await
    }

    async fn sign_in(&self) -> Value {
        let (cookie, state) = self.start_login().await;
        let (status, body) = self
            .callback(&format!("code={}&state={}", GOOD_CODE, state), Some(&cookie))
            .await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    async fn category(&self, name: &str) -> String {
        let (status, body) = self
            .call(
                "POST",
                "/api/products/categories/create",
                None,
                Some(json!({ "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    async fn product(&self, category_id: &str, name: &str, price: i64) -> String {
        let (status, body) = self
            .call(
                "POST",
                "/api/products/create",
                None,
                Some(json!({
                    "categoryId": category_id,
                    "name": name,
                    "description": "test product",
                    "price": price,
                    "stock": 10,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    async fn add_to_cart(&self, token: &str, product_id: &str, quantity: i32) -> (StatusCode, Value) {
        self.call(
            "POST",
            "/api/cart/create",
            Some(token),
            Some(json!({ "productId": product_id, "quantity": quantity })),
        )
        .await
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_end_to_end_checkout() {
    let app = TestApp::new();
    let token = app.user("ada", UserRole::Customer).await;

    let books = app.category("Books").await;
    let atlas = app.product(&books, "Atlas", 500).await;

    let (status, body) = app.add_to_cart(&token, &atlas, 2).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["price"], 500);

    let (status, body) = app.call("POST", "/api/orders/create", Some(&token), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["total"], 1000);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["paid"], false);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["items"][0]["quantity"], 2);

    let (status, body) = app.call("GET", "/api/cart", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["cartId"].is_string());
    assert!(body["data"]["items"].as_array().unwrap().is_empty());

    let (_, body) = app.call("GET", "/api/orders", None, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = app.call("GET", "/api/orders/mine", Some(&token), None).await;
    assert_eq!(body["data"][0]["total"], 1000);
}

#[tokio::test]
async fn test_protected_routes_require_bearer_token() {
    let app = TestApp::new();

    let (status, body) = app.call("GET", "/api/cart", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    for header_value in ["Basic abc", "Bearer ", "Token abc"] {
        let response = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/orders/create")
                    .header(header::AUTHORIZATION, header_value)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let (status, _) = app
        .call("GET", "/api/cart", Some("not.a.token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.store.order_count().await, 0);
}

#[tokio::test]
async fn test_unknown_local_user_is_unauthorized() {
    let app = TestApp::new();
    let token = mint_token("oidc|stranger", "stranger@shop.test");

    let (status, _) = app.call("GET", "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_is_checked_before_body_parsing() {
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/cart/create")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_duplicate_cart_item_conflicts() {
    let app = TestApp::new();
    let token = app.user("ada", UserRole::Customer).await;
    let books = app.category("books").await;
    let atlas = app.product(&books, "atlas", 500).await;

    let (first, _) = app.add_to_cart(&token, &atlas, 1).await;
    let (second, body) = app.add_to_cart(&token, &atlas, 3).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    let (_, cart) = app.call("GET", "/api/cart", Some(&token), None).await;
    let items = cart["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 1);
}

#[tokio::test]
async fn test_non_positive_quantity_is_rejected() {
    let app = TestApp::new();
    let token = app.user("ada", UserRole::Customer).await;
    let books = app.category("books").await;
    let atlas = app.product(&books, "atlas", 500).await;

    for quantity in [0, -2] {
        let (status, _) = app.add_to_cart(&token, &atlas, quantity).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (_, cart) = app.call("GET", "/api/cart", Some(&token), None).await;
    assert!(cart["data"]["cartId"].is_null());
    assert!(cart["data"]["items"].as_array().unwrap().is_empty());

    let (_, item) = app.add_to_cart(&token, &atlas, 1).await;
    let item_id = item["data"]["id"].as_str().unwrap();
    let (status, _) = app
        .call(
            "PATCH",
            &format!("/api/cart/update/quantity/{}", item_id),
            Some(&token),
            Some(json!({ "quantity": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, cart) = app.call("GET", "/api/cart", Some(&token), None).await;
    assert_eq!(cart["data"]["items"][0]["quantity"], 1);
}

#[tokio::test]
async fn test_pagination_bounds() {
    let app = TestApp::new();
    for name in ["a", "b", "c"] {
        app.category(name).await;
    }

    for query in ["limit=0", "limit=-1", "offset=-1", "limit=abc"] {
        let (status, body) = app
            .call("GET", &format!("/api/products/categories?{}", query), None, None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "query {}", query);
        assert_eq!(body["success"], false);
    }

    let (status, body) = app
        .call("GET", "/api/products/categories?limit=2&offset=1", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = app.call("GET", "/api/products/categories", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_soft_deleted_product_is_hidden_but_stored() {
    let app = TestApp::new();
    let books = app.category("books").await;
    let atlas = app.product(&books, "atlas", 500).await;

    let (status, _) = app
        .call("DELETE", &format!("/api/products/{}", atlas), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call("GET", &format!("/api/products/{}", atlas), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = app.call("GET", "/api/products", None, None).await;
    assert!(list["data"].as_array().unwrap().is_empty());

    let id = Uuid::parse_str(&atlas).unwrap();
    let row = app.store.product_row(id).await.expect("row retained");
    assert!(row.deleted_at.is_some());

    let (status, _) = app
        .call("DELETE", &format!("/api/products/{}", atlas), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_soft_deleted_category_is_hidden_but_stored() {
    let app = TestApp::new();
    let books = app.category("books").await;
    let uri = format!("/api/products/categories/{}", books);

    let (status, body) = app.call("GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "books");

    let (status, _) = app.call("DELETE", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.call("GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = app.call("GET", "/api/products/categories", None, None).await;
    assert!(list["data"].as_array().unwrap().is_empty());

    let id = Uuid::parse_str(&books).unwrap();
    let row = app.store.category_row(id).await.expect("row retained");
    assert!(row.deleted_at.is_some());

    let (status, _) = app.call("DELETE", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cart_items_of_other_users_are_not_found() {
    let app = TestApp::new();
    let owner = app.user("owner", UserRole::Customer).await;
    let intruder = app.user("intruder", UserRole::Customer).await;
    let books = app.category("books").await;
    let atlas = app.product(&books, "atlas", 500).await;

    let (_, item) = app.add_to_cart(&owner, &atlas, 1).await;
    let item_id = item["data"]["id"].as_str().unwrap();

    let (status, _) = app
        .call(
            "PATCH",
            &format!("/api/cart/update/quantity/{}", item_id),
            Some(&intruder),
            Some(json!({ "quantity": 9 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .call("DELETE", &format!("/api/cart/remove/{}", item_id), Some(&intruder), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .call("DELETE", &format!("/api/cart/remove/{}", item_id), Some(&owner), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_checkout_without_items_creates_nothing() {
    let app = TestApp::new();
    let token = app.user("ada", UserRole::Customer).await;

    let (status, body) = app.call("POST", "/api/orders/create", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let books = app.category("books").await;
    let atlas = app.product(&books, "atlas", 500).await;
    let (_, item) = app.add_to_cart(&token, &atlas, 1).await;
    let item_id = item["data"]["id"].as_str().unwrap();
    app.call("DELETE", &format!("/api/cart/remove/{}", item_id), Some(&token), None)
        .await;

    let (status, _) = app.call("POST", "/api/orders/create", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.store.order_count().await, 0);
    assert_eq!(app.store.order_item_count().await, 0);
}

#[tokio::test]
async fn test_order_status_requires_admin() {
    let app = TestApp::new();
    let customer = app.user("ada", UserRole::Customer).await;
    let admin = app.user("boss", UserRole::Admin).await;
    let books = app.category("books").await;
    let atlas = app.product(&books, "atlas", 500).await;
    app.add_to_cart(&customer, &atlas, 1).await;
    let (_, order) = app.call("POST", "/api/orders/create", Some(&customer), None).await;
    let order_id = order["data"]["id"].as_str().unwrap().to_string();

    let status_uri = format!("/api/orders/{}/status", order_id);
    let (status, _) = app
        .call("PATCH", &status_uri, Some(&customer), Some(json!({ "status": "shipped" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .call("PATCH", &status_uri, Some(&admin), Some(json!({ "status": "shipped" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "shipped");

    let (status, _) = app
        .call("PATCH", &status_uri, Some(&admin), Some(json!({ "status": "pending" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .call(
            "PATCH",
            &format!("/api/orders/{}/paid", order_id),
            Some(&admin),
            Some(json!({ "paid": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["paid"], true);

    let (status, body) = app
        .call("GET", &format!("/api/orders/{}", order_id), Some(&customer), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "shipped");
}

#[tokio::test]
async fn test_invalid_path_id_is_bad_request() {
    let app = TestApp::new();

    let (status, body) = app.call("GET", "/api/products/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_login_redirects_to_provider() {
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/login")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("https://id.example.test/authorize"));
    assert!(location.contains("state="));

    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("storefront_login="));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn test_callback_requires_matching_login_state() {
    let app = TestApp::new();
    let good = format!("code={}", GOOD_CODE);

    // No state at all
    let (cookie, _) = app.start_login().await;
    let (status, _) = app.callback(&good, Some(&cookie)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // State without a pending login
    let (status, _) = app.callback(&format!("{}&state=forged", good), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // State from a different login
    let (cookie, _) = app.start_login().await;
    let (_, other_state) = app.start_login().await;
    let (status, _) = app
        .callback(&format!("{}&state={}", good, other_state), Some(&cookie))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(app
        .store
        .find_by_external_id("oidc|newcomer")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_login_state_is_single_use() {
    let app = TestApp::new();
    let (cookie, state) = app.start_login().await;
    let query = format!("code={}&state={}", GOOD_CODE, state);

    let (status, _) = app.callback(&query, Some(&cookie)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.callback(&query, Some(&cookie)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_callback_provisions_user() {
    let app = TestApp::new();

    let (status, _) = app.callback("", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (cookie, state) = app.start_login().await;
    let (status, _) = app
        .callback(&format!("code=wrong&state={}", state), Some(&cookie))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let body = app.sign_in().await;
    assert_eq!(body["data"]["user"]["email"], "newcomer@shop.test");
    assert_eq!(body["data"]["user"]["role"], "customer");

    let token = body["data"]["token"].as_str().unwrap().to_string();
    let again = app.sign_in().await;
    assert_eq!(again["data"]["user"]["id"], body["data"]["user"]["id"]);

    let (status, me) = app.call("GET", "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["data"]["externalId"], "oidc|newcomer");

    let (status, me) = app
        .call(
            "PATCH",
            "/api/users/me",
            Some(&token),
            Some(json!({ "phone": "+254700000000" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["data"]["phone"], "+254700000000");
}

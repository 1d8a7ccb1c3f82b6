#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

pub struct TestApp {
    pub router: Router,
    pub db: SqlitePool,
}

impl TestApp {
    pub async fn new() -> Self {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("Failed to create in-memory SQLite pool");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        let router = wedding_desk::build_app(pool.clone());

        Self { router, db: pool }
    }

    /// Send a request through the app and return the response.
    pub async fn request(&self, req: Request<Body>) -> Response {
        tower::ServiceExt::oneshot(self.router.clone(), req)
            .await
            .unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.request(req).await
    }

    /// Send a JSON body with the given method.
    pub async fn send_json(&self, method: &str, uri: &str, body: Value) -> Response {
        let req = Request::builder()
            .uri(uri)
            .method(method)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(req).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Response {
        self.send_json("POST", uri, body).await
    }

    pub async fn patch_json(&self, uri: &str, body: Value) -> Response {
        self.send_json("PATCH", uri, body).await
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> Response {
        self.send_json("PUT", uri, body).await
    }

    pub async fn delete(&self, uri: &str) -> Response {
        let req = Request::builder()
            .uri(uri)
            .method("DELETE")
            .body(Body::empty())
            .unwrap();
        self.request(req).await
    }

    /// Create a party through the API and return its JSON.
    pub async fn create_wedding(&self, wedding_date: &str, suit_color: &str) -> Value {
        let resp = self
            .post_json(
                "/weddings",
                json!({
                    "groomInfo": { "name": "James Carter", "email": "james@example.com" },
                    "brideInfo": { "name": "Olivia Reed", "email": "olivia@example.com" },
                    "weddingDate": wedding_date,
                    "stylePreferences": { "suitColor": suit_color },
                    "attireType": "suit",
                    "accessories": ["tie", "pocket square"],
                    "estimatedPartySize": 6
                }),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        body_json(resp).await
    }

    /// Add a member through the API and return its JSON.
    pub async fn add_member(&self, party_id: &str, name: &str, role: &str) -> Value {
        let resp = self
            .post_json(
                &format!("/weddings/{}/members", party_id),
                json!({ "name": name, "role": role }),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        body_json(resp).await
    }
}

/// Read the full response body as a String.
pub async fn body_string(resp: Response) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Read the full response body as JSON.
pub async fn body_json(resp: Response) -> Value {
    serde_json::from_str(&body_string(resp).await).expect("Response body should be JSON")
}

pub fn sample_address() -> Value {
    json!({
        "recipient": "Sam Carter",
        "street": "12 Elm St",
        "city": "Portland",
        "state": "OR",
        "postalCode": "97201",
        "country": "US",
        "deliveryInstructions": "Leave with concierge"
    })
}

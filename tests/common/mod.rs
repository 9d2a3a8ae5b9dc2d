#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use referral_recruitment::{
    auth::MemoryAuthProvider,
    config::Config,
    models::reference::{Reference, REFERENCE_KIND},
    routes,
    store::MemoryDocumentStore,
    AppState,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "manaclgs@gmail.com";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub auth: MemoryAuthProvider,
    pub store: MemoryDocumentStore,
}

pub fn test_config() -> Config {
    Config {
        server_address: "127.0.0.1:0".into(),
        database_url: None,
        jwt_secret: "test_secret_key".into(),
        admin_email: ADMIN_EMAIL.into(),
        session_ttl_hours: 24,
        organization_name: "ManaCLG LevelUp".into(),
        whatsapp_country_code: "91".into(),
        log_format: None,
    }
}

pub fn spawn_app() -> TestApp {
    let auth = MemoryAuthProvider::new();
    let store = MemoryDocumentStore::new();
    let state = AppState::new(
        &test_config(),
        Arc::new(store.clone()),
        Arc::new(auth.clone()),
        "memory",
    );
    TestApp {
        router: routes::router(state.clone()),
        state,
        auth,
        store,
    }
}

impl TestApp {
    /// Provisions a reference partner the way the helper binary does.
    pub async fn seed_reference(&self, uid: &str, name: &str, email: &str, target: Option<f64>) {
        self.auth
            .insert_account(uid, email, "partner-pass")
            .await
            .expect("insert account");
        self.state
            .reference_service
            .put_reference(&Reference {
                id: uid.into(),
                name: name.into(),
                email: email.into(),
                phone: "9000000000".into(),
                target,
                kind: REFERENCE_KIND.into(),
            })
            .await
            .expect("put reference");
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<JsonValue>,
    ) -> (StatusCode, JsonValue) {
        let (status, bytes) = self.send_raw(method, uri, token, body).await;
        let json = if bytes.is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }

    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<JsonValue>,
    ) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        (status, bytes.to_vec())
    }

    pub async fn reference_token(&self, email: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/reference/login",
                None,
                Some(json!({ "email": email, "password": "partner-pass" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["token"].as_str().expect("token").to_string()
    }

    pub async fn admin_token(&self) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/admin/create",
                None,
                Some(json!({ "email": ADMIN_EMAIL, "password": "admin-pass" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["token"].as_str().expect("token").to_string()
    }

    pub async fn submit(&self, full_name: &str, city: &str, reference: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/public/applications",
                None,
                Some(application(full_name, city, reference)),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_str().expect("id").to_string()
    }
}

pub fn application(full_name: &str, city: &str, reference: &str) -> JsonValue {
    json!({
        "fullName": full_name,
        "email": format!("{}@example.com", full_name.to_lowercase().replace(' ', ".")),
        "phone": "98765 43210",
        "age": "24",
        "gender": "Female",
        "education": "B.Com",
        "city": city,
        "currentPosition": "Student",
        "workingHours": "Full-time",
        "whyThisRole": "I enjoy talking to people",
        "reference": reference,
    })
}

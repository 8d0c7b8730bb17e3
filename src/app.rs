use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{admin, auth, cart, catalog, reviews, state::AppState, verification};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .merge(auth::router())
                .merge(catalog::handlers::router())
                .merge(cart::router())
                .merge(reviews::router())
                .merge(verification::router())
                .merge(admin::router())
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use bytes::Bytes;
    use futures::{Stream, StreamExt};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        notify::Notice,
        state::{Fakes, ADMIN_TOKEN},
    };

    const BOUNDARY: &str = "imperius-test-boundary";

    struct TestApp {
        router: Router,
        fakes: Fakes,
    }

    impl TestApp {
        fn new() -> Self {
            let (state, fakes) = AppState::fake();
            Self {
                router: build_app(state),
                fakes,
            }
        }

        async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
            let res = self.router.clone().oneshot(req).await.unwrap();
            let status = res.status();
            let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
                .await
                .unwrap();
            let body = serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
            (status, body)
        }

        async fn call(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut req = Request::builder().method(method).uri(format!("/api/v1{uri}"));
            if let Some(t) = token {
                req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
            }
            let req = match body {
                Some(b) => req
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(b.to_string())),
                None => req.body(Body::empty()),
            };
            self.send(req.unwrap()).await
        }

        async fn admin(&self, method: Method, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
            let mut req = Request::builder().method(method).uri(format!("/api/v1{uri}"));
            if let Some(t) = token {
                req = req.header("x-admin-token", t);
            }
            self.send(req.body(Body::empty()).unwrap()).await
        }

        async fn register(&self, email: &str, document: &str) -> (String, String) {
            let (status, body) = self
                .call(
                    Method::POST,
                    "/auth/register",
                    None,
                    Some(json!({
                        "name": "Laura",
                        "last_name": "Martínez",
                        "document_type": "CC",
                        "document_number": document,
                        "email": email,
                        "password": "secreto1"
                    })),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "{body}");
            (
                body["access_token"].as_str().unwrap().to_string(),
                body["user"]["id"].as_str().unwrap().to_string(),
            )
        }

        async fn submit_verification(&self, token: &str, kind: &str) -> (StatusCode, Value) {
            let mut body = Vec::new();
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"kind\"\r\n\r\n{kind}\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files[]\"; filename=\"carnet.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(&[0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3]);
            body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

            let req = Request::builder()
                .method(Method::POST)
                .uri("/api/v1/verification")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .unwrap();
            self.send(req).await
        }
    }

    #[tokio::test]
    async fn health() {
        let app = TestApp::new();
        let (status, body) = app.call(Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::String("ok".into()));
    }

    #[tokio::test]
    async fn register_login_and_me() {
        let app = TestApp::new();
        let (token, user_id) = app.register("Laura@Correo.co ", "10203040").await;

        let (status, me) = app.call(Method::GET, "/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["id"], user_id.as_str());
        assert_eq!(me["email"], "laura@correo.co");
        assert_eq!(me["verification_status"], "unverified");
        assert_eq!(me["is_student"], false);
        assert!(me.get("password_hash").is_none());

        let (status, _) = app
            .call(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({ "email": "LAURA@correo.co", "password": "secreto1" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = app
            .call(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({ "email": "laura@correo.co", "password": "nope123" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, Value::String("Invalid credentials".into()));

        let (status, _) = app.call(Method::GET, "/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn register_validation_and_duplicates() {
        let app = TestApp::new();
        app.register("a@b.co", "12345678").await;

        let base = json!({
            "name": "Otro",
            "last_name": "Usuario",
            "document_type": "CE",
            "document_number": "99999999",
            "email": "A@B.CO",
            "password": "secreto1"
        });
        let (status, _) = app
            .call(Method::POST, "/auth/register", None, Some(base.clone()))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let mut short = base.clone();
        short["email"] = json!("new@b.co");
        short["password"] = json!("12345");
        let (status, _) = app.call(Method::POST, "/auth/register", None, Some(short)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut doc = base.clone();
        doc["email"] = json!("new@b.co");
        doc["document_number"] = json!("123");
        let (status, _) = app.call(Method::POST, "/auth/register", None, Some(doc)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut dup_doc = base;
        dup_doc["email"] = json!("new@b.co");
        dup_doc["document_number"] = json!("12345678");
        let (status, _) = app.call(Method::POST, "/auth/register", None, Some(dup_doc)).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn refresh_rejects_access_token() {
        let app = TestApp::new();
        let (status, body) = app
            .call(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({
                    "name": "Laura",
                    "last_name": "Martínez",
                    "document_type": "TI",
                    "document_number": "55555555",
                    "email": "r@x.co",
                    "password": "secreto1"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let access = body["access_token"].as_str().unwrap();
        let refresh = body["refresh_token"].as_str().unwrap();

        let (status, _) = app
            .call(Method::POST, "/auth/refresh", None, Some(json!({ "refresh_token": access })))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = app
            .call(Method::POST, "/auth/refresh", None, Some(json!({ "refresh_token": refresh })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["email"], "r@x.co");
    }

    #[tokio::test]
    async fn password_change_and_recovery() {
        let app = TestApp::new();
        let (token, _) = app.register("pw@x.co", "11112222").await;

        let (status, _) = app
            .call(
                Method::POST,
                "/auth/password",
                Some(&token),
                Some(json!({ "current_password": "wrong1", "new_password": "nuevo123" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = app
            .call(
                Method::POST,
                "/auth/password",
                Some(&token),
                Some(json!({ "current_password": "secreto1", "new_password": "nuevo123" })),
            )
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = app
            .call(Method::POST, "/auth/recovery", None, Some(json!({ "email": "ghost@x.co" })))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = app
            .call(Method::POST, "/auth/recovery", None, Some(json!({ "email": "PW@x.co" })))
            .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["expires_in_minutes"], 15);
        let code = app.fakes.notifier.last_recovery_code("pw@x.co").unwrap();

        let (status, _) = app
            .call(
                Method::POST,
                "/auth/recovery/confirm",
                None,
                Some(json!({ "email": "pw@x.co", "code": "000000x", "new_password": "otra123" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .call(
                Method::POST,
                "/auth/recovery/confirm",
                None,
                Some(json!({ "email": "pw@x.co", "code": code, "new_password": "otra123" })),
            )
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = app
            .call(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({ "email": "pw@x.co", "password": "otra123" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        // codes are single use
        let (status, _) = app
            .call(
                Method::POST,
                "/auth/recovery/confirm",
                None,
                Some(json!({ "email": "pw@x.co", "code": code, "new_password": "tercera1" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn catalog_browsing() {
        let app = TestApp::new();
        let (status, all) = app.call(Method::GET, "/catalog/products", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all.as_array().unwrap().len(), 15);
        assert_eq!(all[0]["rating"]["total"], 0);

        let (_, todos) = app
            .call(Method::GET, "/catalog/products?category=Todos", None, None)
            .await;
        assert_eq!(todos.as_array().unwrap().len(), 15);

        let (_, ropa) = app
            .call(Method::GET, "/catalog/products?category=Ropa", None, None)
            .await;
        assert!(ropa.as_array().unwrap().iter().all(|p| p["category"] == "Ropa"));
        assert!(!ropa.as_array().unwrap().is_empty());

        let (status, p) = app.call(Method::GET, "/catalog/products/product-1", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(p["id"], "product-1");

        let (status, _) = app.call(Method::GET, "/catalog/products/nope", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, students) = app
            .call(Method::GET, "/catalog/memberships?tier=student", None, None)
            .await;
        assert_eq!(students.as_array().unwrap().len(), 2);

        let (status, free) = app
            .call(Method::GET, "/catalog/memberships/membership-gratis", None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(free["purchasable"], false);
    }

    #[tokio::test]
    async fn cart_and_checkout() {
        let app = TestApp::new();
        let (token, _) = app.register("cart@x.co", "20203030").await;

        let (status, _) = app.call(Method::GET, "/cart", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, cart) = app
            .call(Method::POST, "/cart/items", Some(&token), Some(json!({ "id": "product-9" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cart["item_count"], 1);

        for quantity in [-1i64, 0, 5_000_000_000] {
            let (status, _) = app
                .call(
                    Method::POST,
                    "/cart/items",
                    Some(&token),
                    Some(json!({ "id": "product-9", "quantity": quantity })),
                )
                .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "quantity {quantity}");
        }

        let (_, cart) = app
            .call(
                Method::PUT,
                "/cart/items/product-9",
                Some(&token),
                Some(json!({ "quantity": 2 })),
            )
            .await;
        assert_eq!(cart["total"], 120_000);

        let (status, order) = app
            .call(
                Method::POST,
                "/cart/checkout",
                Some(&token),
                Some(json!({ "payment_method": "cash_on_delivery" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(order["subtotal"], 120_000);
        assert_eq!(order["shipping"], 15_000);
        assert_eq!(order["total"], 135_000);

        let (_, cart) = app.call(Method::GET, "/cart", Some(&token), None).await;
        assert_eq!(cart["items"].as_array().unwrap().len(), 0);

        let (status, _) = app
            .call(
                Method::POST,
                "/cart/checkout",
                Some(&token),
                Some(json!({ "payment_method": "bank_transfer" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, orders) = app.call(Method::GET, "/orders", Some(&token), None).await;
        assert_eq!(orders.as_array().unwrap().len(), 1);

        let (status, _) = app
            .call(
                Method::POST,
                "/cart/items",
                Some(&token),
                Some(json!({ "id": "membership-gratis" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn student_verification_flow() {
        let app = TestApp::new();
        let (token, user_id) = app.register("est@uni.edu.co", "30304040").await;
        let plan = json!({ "id": "membership-estudiante-mensual" });

        let (status, _) = app
            .call(Method::POST, "/cart/items", Some(&token), Some(plan.clone()))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, user) = app.submit_verification(&token, "carnet").await;
        assert_eq!(status, StatusCode::ACCEPTED, "{user}");
        assert_eq!(user["verification_status"], "pending");
        assert_eq!(app.fakes.documents.keys().len(), 1);
        assert!(app.fakes.documents.keys()[0].starts_with(&format!("verification/{user_id}/")));

        let (status, body) = app
            .call(Method::POST, "/cart/items", Some(&token), Some(plan.clone()))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.as_str().unwrap().contains("under review"));

        let (_, stats) = app.admin(Method::GET, "/admin/stats", Some(ADMIN_TOKEN)).await;
        assert_eq!(stats["pending_verifications"], 1);

        let docs_uri = format!("/admin/verification/{user_id}/documents");
        let (status, docs) = app.admin(Method::GET, &docs_uri, Some(ADMIN_TOKEN)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(docs[0]["file_name"], "carnet.jpg");
        assert!(docs[0]["url"].as_str().unwrap().starts_with("https://fake.local/"));

        let approve_uri = format!("/admin/verification/{user_id}/approve");
        let (status, _) = app.admin(Method::POST, &approve_uri, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = app.admin(Method::POST, &approve_uri, Some("wrong")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, user) = app.admin(Method::POST, &approve_uri, Some(ADMIN_TOKEN)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["is_student"], true);

        // only pending submissions can be decided
        let (status, _) = app.admin(Method::POST, &approve_uri, Some(ADMIN_TOKEN)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = app.submit_verification(&token, "boletin").await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, cart) = app
            .call(Method::POST, "/cart/items", Some(&token), Some(plan))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cart["total"], 60_000);

        let (_, me) = app.call(Method::GET, "/me", Some(&token), None).await;
        assert_eq!(me["verification_status"], "approved");
        assert!(me["verified_at"].is_string());

        let id = uuid::Uuid::parse_str(&user_id).unwrap();
        let sent = app.fakes.notifier.sent();
        assert!(sent.contains(&Notice::VerificationRequested {
            user_id: id,
            documents: 1
        }));
        assert!(sent.contains(&Notice::VerificationDecided {
            user_id: id,
            status: crate::verification::model::VerificationStatus::Approved
        }));
    }

    #[tokio::test]
    async fn rejection_drops_documents() {
        let app = TestApp::new();
        let (token, user_id) = app.register("rej@uni.edu.co", "40405050").await;

        let (status, _) = app.submit_verification(&token, "portal-edu").await;
        assert_eq!(status, StatusCode::ACCEPTED);
        // resubmitting while pending replaces the files
        let (status, _) = app.submit_verification(&token, "carnet").await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(app.fakes.documents.keys().len(), 1);

        let req = Request::builder()
            .method(Method::POST)
            .uri(format!("/api/v1/admin/verification/{user_id}/reject"))
            .header("x-admin-token", ADMIN_TOKEN)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "reason": "Carnet vencido" }).to_string()))
            .unwrap();
        let (status, user) = app.send(req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["verification_status"], "rejected");
        assert!(app.fakes.documents.keys().is_empty());

        let (_, status_body) = app.call(Method::GET, "/verification", Some(&token), None).await;
        assert_eq!(status_body["status"], "rejected");
        assert_eq!(status_body["reason"], "Carnet vencido");

        let (status, _) = app.submit_verification(&token, "boletin").await;
        assert_eq!(status, StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn verification_rejects_bad_submissions() {
        let app = TestApp::new();
        let (token, _) = app.register("bad@uni.edu.co", "50506060").await;

        let (status, _) = app.submit_verification(&token, "diploma").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"kind\"\r\n\r\ncarnet\r\n--{BOUNDARY}--\r\n"
        );
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/verification")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        let (status, _) = app.send(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(app.fakes.documents.keys().is_empty());
    }

    /// Reads SSE chunks until `needle` shows up; returns everything read.
    async fn read_until<S>(frames: &mut S, needle: &str) -> String
    where
        S: Stream<Item = Result<Bytes, axum::Error>> + Unpin,
    {
        let mut seen = String::new();
        while !seen.contains(needle) {
            let chunk = tokio::time::timeout(Duration::from_secs(2), frames.next())
                .await
                .unwrap_or_else(|_| panic!("no {needle} within 2s, got {seen:?}"))
                .expect("event stream ended")
                .unwrap();
            seen.push_str(&String::from_utf8_lossy(&chunk));
        }
        seen
    }

    #[tokio::test]
    async fn verification_events_stream_status_changes() {
        let app = TestApp::new();
        let (token, user_id) = app.register("sse@uni.edu.co", "60607070").await;
        let (status, _) = app.submit_verification(&token, "carnet").await;
        assert_eq!(status, StatusCode::ACCEPTED);

        let req = Request::builder()
            .uri("/api/v1/verification/events")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let res = app.router.clone().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers()[header::CONTENT_TYPE].to_str().unwrap(),
            "text/event-stream"
        );
        let mut frames = Box::pin(res.into_body().into_data_stream());

        let first = read_until(&mut frames, "\n\n").await;
        assert!(first.starts_with("event: verification\n"), "{first}");
        assert!(first.contains("\"status\":\"pending\""), "{first}");
        assert!(first.contains(&user_id));

        let approve_uri = format!("/admin/verification/{user_id}/approve");
        let (status, _) = app.admin(Method::POST, &approve_uri, Some(ADMIN_TOKEN)).await;
        assert_eq!(status, StatusCode::OK);

        let next = read_until(&mut frames, "\"status\":\"approved\"").await;
        assert!(next.contains("event: verification"), "{next}");
        assert!(!next.contains("\"status\":\"pending\""), "{next}");
    }

    #[tokio::test]
    async fn verification_events_need_a_token() {
        let (status, _) = TestApp::new()
            .call(Method::GET, "/verification/events", None, None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn reviews_over_http() {
        let app = TestApp::new();
        let (ana, _) = app.register("ana@x.co", "70708080").await;
        let (luis, _) = app.register("luis@x.co", "80809090").await;

        let (status, _) = app
            .call(
                Method::POST,
                "/products/product-404/reviews",
                Some(&ana),
                Some(json!({ "rating": 5, "comment": "hola" })),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        for rating in [300, -1, 0] {
            let (status, body) = app
                .call(
                    Method::POST,
                    "/products/product-2/reviews",
                    Some(&ana),
                    Some(json!({ "rating": rating, "comment": "hola" })),
                )
                .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "rating {rating}");
            assert!(body.as_str().unwrap().contains("between 1 and 5"));
        }

        let (status, review) = app
            .call(
                Method::POST,
                "/products/product-2/reviews",
                Some(&ana),
                Some(json!({ "rating": 4, "comment": "Muy buena" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(review["author_name"], "Laura");
        let review_id = review["id"].as_str().unwrap().to_string();

        let (status, _) = app
            .call(
                Method::PUT,
                &format!("/reviews/{review_id}"),
                Some(&luis),
                Some(json!({ "rating": 1, "comment": "mala" })),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app
            .call(
                Method::POST,
                &format!("/reviews/{review_id}/replies"),
                Some(&luis),
                Some(json!({ "comment": "Coincido" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, list) = app.call(Method::GET, "/products/product-2/reviews", None, None).await;
        assert_eq!(list[0]["replies"].as_array().unwrap().len(), 1);

        let (_, rating) = app.call(Method::GET, "/products/product-2/rating", None, None).await;
        assert_eq!(rating["average"], 4.0);
        assert_eq!(rating["distribution"]["4"], 1);

        let (status, _) = app
            .call(Method::DELETE, &format!("/reviews/{review_id}"), Some(&ana), None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn admin_clear_wipes_everything() {
        let app = TestApp::new();
        let (token, _) = app.register("wipe@x.co", "90901010").await;
        app.call(Method::POST, "/cart/items", Some(&token), Some(json!({ "id": "product-1" })))
            .await;
        app.submit_verification(&token, "carnet").await;

        let (status, body) = app.admin(Method::POST, "/admin/clear", Some(ADMIN_TOKEN)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["carts_removed"], 1);
        assert!(app.fakes.documents.keys().is_empty());

        let (_, users) = app.admin(Method::GET, "/admin/users", Some(ADMIN_TOKEN)).await;
        assert_eq!(users.as_array().unwrap().len(), 0);

        let (status, _) = app.call(Method::GET, "/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

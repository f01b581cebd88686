// Copyright 2018-2020 Cargill Incorporated
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

mod auth;
mod notifications;
mod users;

use actix_web_4::{http::StatusCode, web, HttpResponse};

use crate::rest_api::resources::error::ErrorResponse;

/// Registers every herald route on an actix `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/register", web::post().to(auth::register))
        .route("/auth/login", web::post().to(auth::login))
        .route("/auth/session", web::post().to(auth::restore_session))
        .route("/auth/logout", web::post().to(auth::logout))
        .route("/auth/push_token", web::put().to(auth::update_push_token))
        .route("/users", web::get().to(users::list_users))
        .route(
            "/notifications",
            web::get().to(notifications::list_notifications),
        )
        .route(
            "/notifications",
            web::post().to(notifications::send_notification),
        )
        .route(
            "/notifications/watch",
            web::get().to(notifications::watch_notifications),
        )
        .route(
            "/notifications/read_all",
            web::post().to(notifications::mark_all_as_read),
        )
        .route(
            "/notifications/{id}/read",
            web::post().to(notifications::mark_as_read),
        );
}

fn error_response(err: ErrorResponse) -> HttpResponse {
    HttpResponse::build(
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
    )
    .json(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    use actix_web_4::{test, web::Data, App};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    use crate::auth::{AuthConfigBuilder, AuthService};
    use crate::credentials::PasswordEncryptionCost;
    use crate::notifications::NotificationService;
    use crate::rest_api::actix_web_4::AppState;
    use crate::store::{MemoryStoreFactory, StoreFactory};

    fn app_state() -> AppState {
        let factory = MemoryStoreFactory::new();
        let config = AuthConfigBuilder::new()
            .with_token_secret("test-secret")
            .with_password_encryption_cost(PasswordEncryptionCost::Low)
            .build()
            .expect("Unable to build auth config");

        AppState::new(
            AuthService::new(
                factory.get_user_store(),
                factory.get_credentials_store(),
                config,
            ),
            NotificationService::new(factory.get_user_store(), factory.get_notification_store()),
        )
    }

    fn register_request(email: &str, is_admin: bool) -> test::TestRequest {
        test::TestRequest::post().uri("/auth/register").set_json(&json!({
            "name": email,
            "email": email,
            "password": "hunter2",
            "is_admin": is_admin,
            "master_password": "Admin123!",
        }))
    }

    fn session_token(session: &Value) -> String {
        session["token"].as_str().expect("no token").to_string()
    }

    fn bearer(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", token))
    }

    #[actix_rt::test]
    async fn test_requires_bearer_token() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(app_state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/notifications").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/notifications")
            .insert_header(bearer("garbage"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_login_with_wrong_password() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(app_state()))
                .configure(configure),
        )
        .await;
        test::call_service(&app, register_request("alice@example.com", false).to_request())
            .await;

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(&json!({"email": "alice@example.com", "password": "wrong"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status_code"], json!(401));
    }

    #[actix_rt::test]
    async fn test_non_admin_cannot_send_or_list_users() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(app_state()))
                .configure(configure),
        )
        .await;
        let token = session_token(
            &test::call_and_read_body_json(
                &app,
                register_request("alice@example.com", false).to_request(),
            )
            .await,
        );

        let req = test::TestRequest::post()
            .uri("/notifications")
            .insert_header(bearer(&token))
            .set_json(&json!({"title": "hi", "message": "there"}))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );

        let req = test::TestRequest::get()
            .uri("/users")
            .insert_header(bearer(&token))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );
    }

    /// An admin broadcasts, one user reads it, and only that user's feed changes.
    #[actix_rt::test]
    async fn test_broadcast_read_flow() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(app_state()))
                .configure(configure),
        )
        .await;
        let admin_token = session_token(
            &test::call_and_read_body_json(
                &app,
                register_request("admin@example.com", true).to_request(),
            )
            .await,
        );
        let alice_token = session_token(
            &test::call_and_read_body_json(
                &app,
                register_request("alice@example.com", false).to_request(),
            )
            .await,
        );
        let bob_token = session_token(
            &test::call_and_read_body_json(
                &app,
                register_request("bob@example.com", false).to_request(),
            )
            .await,
        );

        let req = test::TestRequest::post()
            .uri("/notifications")
            .insert_header(bearer(&admin_token))
            .set_json(&json!({"title": "Maintenance", "message": "Tonight", "type": "ALERT"}))
            .to_request();
        let notification: Value = test::call_and_read_body_json(&app, req).await;
        let id = notification["id"].as_str().expect("no id").to_string();
        assert_eq!(notification["type"], json!("ALERT"));

        let req = test::TestRequest::post()
            .uri(&format!("/notifications/{}/read", id))
            .insert_header(bearer(&alice_token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/notifications")
            .insert_header(bearer(&alice_token))
            .to_request();
        let alice_feed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(alice_feed["unread_count"], json!(0));
        assert_eq!(alice_feed["data"][0]["read"], json!(true));

        let req = test::TestRequest::post()
            .uri("/notifications/read_all")
            .insert_header(bearer(&bob_token))
            .to_request();
        let res: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(res, json!({"updated": 1}));
    }

    #[actix_rt::test]
    async fn test_mark_unknown_notification() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(app_state()))
                .configure(configure),
        )
        .await;
        let token = session_token(
            &test::call_and_read_body_json(
                &app,
                register_request("alice@example.com", false).to_request(),
            )
            .await,
        );

        let req = test::TestRequest::post()
            .uri("/notifications/missing/read")
            .insert_header(bearer(&token))
            .to_request();

        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[actix_rt::test]
    async fn test_watch_times_out_with_no_content() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(app_state()))
                .configure(configure),
        )
        .await;
        let token = session_token(
            &test::call_and_read_body_json(
                &app,
                register_request("alice@example.com", false).to_request(),
            )
            .await,
        );

        let req = test::TestRequest::get()
            .uri("/notifications/watch?timeout_secs=0")
            .insert_header(bearer(&token))
            .to_request();

        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NO_CONTENT
        );
    }

    #[actix_rt::test]
    async fn test_logout_and_push_token() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(app_state()))
                .configure(configure),
        )
        .await;
        let token = session_token(
            &test::call_and_read_body_json(
                &app,
                register_request("alice@example.com", false).to_request(),
            )
            .await,
        );

        let req = test::TestRequest::put()
            .uri("/auth/push_token")
            .insert_header(bearer(&token))
            .set_json(&json!({"push_token": "device-9"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/auth/session")
            .insert_header(bearer(&token))
            .to_request();
        let session: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(session["user"]["push_token"], json!("device-9"));

        let req = test::TestRequest::post()
            .uri("/auth/logout")
            .insert_header(bearer(&token))
            .to_request();
        let res: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(res, json!({"message": "Logged out"}));
    }
}

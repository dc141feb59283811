mod auth;
mod calendar;
mod context;
mod docs;
mod dungeons;
mod errors;
mod guild;
mod logging;
mod logs;
mod loot;
mod members;
mod raids;
mod schemas;
mod serialized;
mod session;
mod setup;

pub use context::ServerContext;
pub use logging::init_logger;

use std::{
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
};

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
};
use guildhall_core::Guildhall;
use log::info;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

pub type Router = axum::Router<ServerContext>;

/// Builds the full application router around the shared state.
pub fn app(context: ServerContext) -> axum::Router {
    let frontend_origin = context
        .guildhall
        .config
        .frontend_url
        .parse::<HeaderValue>()
        .expect("frontend url is a valid origin");

    // The session rides a cookie, so the browser needs credentials and an
    // exact origin rather than a wildcard
    let cors = CorsLayer::new()
        .allow_origin(frontend_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    let api_router = Router::new()
        .nest("/auth", auth::router())
        .nest("/config", setup::router())
        .nest("/guild", guild::router())
        .nest("/members", members::router())
        .nest("/calendar", calendar::router())
        .nest("/raids", raids::router())
        .nest("/dungeons", dungeons::router())
        .nest("/loot", loot::router())
        .nest("/logs", logs::router());

    Router::new()
        .nest("/api", api_router)
        .route("/api.json", get(docs::docs))
        .layer(cors)
        .with_state(context)
}

/// Starts the guildhall server
pub async fn run_server(guildhall: Guildhall) {
    let port = guildhall.config.port;
    let addr: SocketAddr = (Ipv4Addr::UNSPECIFIED, port).into();

    let context = ServerContext {
        guildhall: Arc::new(guildhall),
    };

    let listener = TcpListener::bind(&addr).await.expect("listens on address");

    info!("Serving the guild API on http://localhost:{port}");

    axum::serve(listener, app(context).into_make_service())
        .await
        .expect("server runs until shutdown");
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use guildhall_core::{Config, DiscordConfig, Guildhall, Identity};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tempfile::{tempdir, TempDir};
    use tower::ServiceExt;

    use super::*;
    use crate::session::SESSION_COOKIE;

    struct TestServer {
        app: axum::Router,
        context: ServerContext,
        _dir: TempDir,
    }

    fn server() -> TestServer {
        let dir = tempdir().unwrap();

        let config = Config {
            port: 0,
            data_dir: dir.path().to_string_lossy().into_owned(),
            frontend_url: "http://localhost:3000".to_string(),
            production: false,
            discord: DiscordConfig::default(),
        };

        let context = ServerContext {
            guildhall: Arc::new(Guildhall::new(config)),
        };

        TestServer {
            app: app(context.clone()),
            context,
            _dir: dir,
        }
    }

    impl TestServer {
        fn login(&self, username: &str, is_admin: bool) -> String {
            let token = self.context.guildhall.sessions.start(Identity {
                id: "1".to_string(),
                username: username.to_string(),
                is_admin,
            });

            format!("{SESSION_COOKIE}={token}")
        }

        async fn request(
            &self,
            method: &str,
            uri: &str,
            cookie: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);

            if let Some(cookie) = cookie {
                builder = builder.header(header::COOKIE, cookie);
            }

            let request = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let response = self.app.clone().oneshot(request).await.unwrap();
            let status = response.status();

            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

            (status, value)
        }
    }

    fn member_body(name: &str, class: &str, role: &str) -> Value {
        json!({
            "name": name,
            "class": class,
            "race": "Human",
            "faction": "Alliance",
            "role": role,
        })
    }

    #[tokio::test]
    async fn mutating_routes_require_a_session() {
        let server = server();

        let (status, body) = server
            .request("POST", "/api/members", None, Some(member_body("Jaina", "Mage", "DPS")))
            .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized - Discord login required");
    }

    #[tokio::test]
    async fn mutating_routes_require_the_admin_flag() {
        let server = server();
        let cookie = server.login("grunt", false);

        let (status, _) = server
            .request("PUT", "/api/members/123", Some(&cookie), Some(json!({})))
            .await;

        assert_eq!(status, StatusCode::FORBIDDEN);

        // the roster was never touched
        let (_, roster) = server.request("GET", "/api/members", None, None).await;
        assert_eq!(roster, json!([]));
    }

    #[tokio::test]
    async fn creating_a_raid_mirrors_a_calendar_entry() {
        let server = server();
        let cookie = server.login("warchief", true);

        let (status, raid) = server
            .request(
                "POST",
                "/api/raids",
                Some(&cookie),
                Some(json!({
                    "name": "Naxx25",
                    "instance": "Naxxramas",
                    "date": "2024-01-01",
                    "time": "20:00",
                    "version": "WotLK",
                    "size": 25,
                    "status": "planned",
                })),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert!(raid["id"].is_string());
        assert_eq!(raid["participants"], json!([]));
        assert_eq!(
            raid["composition"],
            json!({ "tanks": [], "healers": [], "dps": [] })
        );

        let raid_id = raid["id"].as_str().unwrap();
        let (_, events) = server.request("GET", "/api/calendar", None, None).await;

        assert_eq!(events.as_array().unwrap().len(), 1);
        assert_eq!(events[0]["id"], format!("cal-{raid_id}"));
        assert_eq!(events[0]["title"], "Naxx25");
        assert_eq!(events[0]["type"], "Raid");
        assert_eq!(events[0]["raidId"], raid_id);
    }

    #[tokio::test]
    async fn deleting_a_raid_removes_its_mirror() {
        let server = server();
        let cookie = server.login("warchief", true);

        let (_, raid) = server
            .request(
                "POST",
                "/api/raids",
                Some(&cookie),
                Some(json!({
                    "name": "Karazhan",
                    "instance": "Karazhan",
                    "date": "2024-02-01",
                    "time": "19:30",
                    "version": "TBC",
                    "size": 10,
                    "status": "planned",
                })),
            )
            .await;

        let raid_id = raid["id"].as_str().unwrap();
        let (status, body) = server
            .request("DELETE", &format!("/api/raids/{raid_id}"), Some(&cookie), None)
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (_, raids) = server.request("GET", "/api/raids", None, None).await;
        let (_, events) = server.request("GET", "/api/calendar", None, None).await;

        assert_eq!(raids, json!([]));
        assert_eq!(events, json!([]));
    }

    #[tokio::test]
    async fn guild_overview_counts_the_roster() {
        let server = server();
        let cookie = server.login("warchief", true);

        for (name, class, role) in [
            ("Jaina", "Mage", "DPS"),
            ("Khadgar", "Mage", "DPS"),
            ("Varian", "Warrior", "Tank"),
        ] {
            let (status, _) = server
                .request("POST", "/api/members", Some(&cookie), Some(member_body(name, class, role)))
                .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, overview) = server.request("GET", "/api/guild", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(overview["memberCount"], 3);
        assert_eq!(overview["classDistribution"], json!({ "Mage": 2, "Warrior": 1 }));
        assert_eq!(overview["roleDistribution"], json!({ "Tank": 1, "DPS": 2 }));
    }

    #[tokio::test]
    async fn updating_an_unknown_member_is_not_found() {
        let server = server();
        let cookie = server.login("warchief", true);

        let (status, body) = server
            .request(
                "PUT",
                "/api/members/does-not-exist",
                Some(&cookie),
                Some(json!({ "name": "Renamed" })),
            )
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Member not found");
    }

    #[tokio::test]
    async fn logout_succeeds_without_a_session() {
        let server = server();

        let (status, body) = server.request("POST", "/api/auth/logout", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn me_reflects_the_session() {
        let server = server();

        let (_, anonymous) = server.request("GET", "/api/auth/me", None, None).await;
        assert_eq!(anonymous["user"], Value::Null);

        let cookie = server.login("sylvanas", true);
        let (_, authenticated) = server.request("GET", "/api/auth/me", Some(&cookie), None).await;

        assert_eq!(authenticated["user"]["username"], "sylvanas");
        assert_eq!(authenticated["user"]["isAdmin"], true);
    }

    #[tokio::test]
    async fn login_url_is_unavailable_when_unconfigured() {
        let server = server();

        let (status_response, status_body) =
            server.request("GET", "/api/auth/status", None, None).await;
        assert_eq!(status_response, StatusCode::OK);
        assert_eq!(status_body["configured"], false);

        let (status, _) = server.request("GET", "/api/auth/discord", None, None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn loot_filters_by_assigned_member() {
        let server = server();
        let cookie = server.login("warchief", true);

        for (item, member) in [("Ashbringer", "77"), ("Thunderfury", "88")] {
            let (status, _) = server
                .request(
                    "POST",
                    "/api/loot",
                    Some(&cookie),
                    Some(json!({
                        "itemName": item,
                        "quality": "Legendary",
                        "raidId": "1",
                        "boss": "Kel'Thuzad",
                        "assignedTo": member,
                    })),
                )
                .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, loot) = server.request("GET", "/api/loot/member/77", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(loot.as_array().unwrap().len(), 1);
        assert_eq!(loot[0]["itemName"], "Ashbringer");
    }

    #[tokio::test]
    async fn logs_are_admin_only_and_newest_first() {
        let server = server();
        let admin = server.login("warchief", true);
        let grunt = server.login("grunt", false);

        let (forbidden, _) = server.request("GET", "/api/logs", Some(&grunt), None).await;
        assert_eq!(forbidden, StatusCode::FORBIDDEN);

        server
            .request("POST", "/api/members", Some(&admin), Some(member_body("Jaina", "Mage", "DPS")))
            .await;
        server
            .request("POST", "/api/members", Some(&admin), Some(member_body("Varian", "Warrior", "Tank")))
            .await;

        let (status, logs) = server.request("GET", "/api/logs", Some(&admin), None).await;
        let entries = logs.as_array().unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(entries.len(), 2);
        assert!(entries
            .iter()
            .all(|entry| entry["action"] == "MEMBER_CREATED"));
        assert!(entries[0]["timestamp"].as_str() >= entries[1]["timestamp"].as_str());
    }

    #[tokio::test]
    async fn saving_the_setup_seeds_the_guild_profile() {
        let server = server();
        let cookie = server.login("warchief", true);

        let (_, initial) = server.request("GET", "/api/config", None, None).await;
        assert_eq!(initial["setupComplete"], false);

        let (status, saved) = server
            .request(
                "POST",
                "/api/config",
                Some(&cookie),
                Some(json!({
                    "name": "Ashes of Lordaeron",
                    "faction": "Horde",
                    "version": "WotLK",
                })),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(saved["setupComplete"], true);

        let (_, overview) = server.request("GET", "/api/guild", None, None).await;
        assert_eq!(overview["name"], "Ashes of Lordaeron");
    }
}

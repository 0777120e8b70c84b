use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tempfile::TempDir;
use tokio::task::JoinHandle;

use exambuddy::auth::CredentialHasher;
use exambuddy::config::ServerConfig;
use exambuddy::server::{AppState, create_router};
use exambuddy::store::{SqliteStore, Store};
use exambuddy::types::AdminCredential;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "integration-pass";

pub struct TestServer {
    pub temp_dir: TempDir,
    pub base_url: String,
    pub client: reqwest::Client,
    server_task: Option<JoinHandle<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let config = ServerConfig {
            data_dir: temp_dir.path().to_path_buf(),
            ..ServerConfig::default()
        };

        let store = SqliteStore::new(config.db_path()).expect("open store");
        store.initialize().expect("initialize schema");
        store
            .set_admin_credential(&AdminCredential {
                username: ADMIN_USERNAME.to_string(),
                password_hash: CredentialHasher::new()
                    .hash(ADMIN_PASSWORD)
                    .expect("hash password"),
                created_at: Utc::now(),
            })
            .expect("store admin credential");

        let state = Arc::new(AppState::new(Arc::new(store), &config));
        let app = create_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let server_task = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        Self::wait_for_ready(&base_url).await;

        Self {
            temp_dir,
            base_url,
            client: reqwest::Client::new(),
            server_task: Some(server_task),
        }
    }

    async fn wait_for_ready(base_url: &str) {
        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client
                .get(format!("{}/health", base_url))
                .send()
                .await
                .is_ok()
            {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }
        panic!("Server did not become ready");
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn data_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Opens a session and returns its id.
    pub async fn new_session(&self) -> String {
        let resp: Value = self
            .client
            .post(self.url("/api/v1/sessions"))
            .send()
            .await
            .expect("create session")
            .json()
            .await
            .expect("parse session");
        resp["data"]["id"].as_str().expect("session id").to_string()
    }

    /// Opens a session and logs it in as the admin.
    pub async fn admin_session(&self) -> String {
        let id = self.new_session().await;
        let resp = self
            .client
            .post(self.url(&format!("/api/v1/sessions/{id}/login")))
            .json(&serde_json::json!({
                "username": ADMIN_USERNAME,
                "password": ADMIN_PASSWORD,
            }))
            .send()
            .await
            .expect("login");
        assert!(resp.status().is_success(), "admin login failed");
        id
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(task) = self.server_task.take() {
            task.abort();
        }
    }
}

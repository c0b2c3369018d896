use std::collections::HashMap;
use std::sync::Arc;

use account_service::account::errors::AuthError;
use account_service::account::models::User;
use account_service::account::models::Username;
use account_service::account::ports::UserRepository;
use account_service::account::service::AuthService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::token_store::InMemoryTokenStore;
use async_trait::async_trait;
use auth::TokenCodec;
use chrono::Duration;
use tokio::sync::RwLock;

// "0123456789abcdef0123456789abcdef" in base64
pub const TEST_SECRET: &str = "MDEyMzQ1Njc4OWFiY2RlZjAxMjM0NTY3ODlhYmNkZWY=";

/// Test application that spawns the real axum app on a random port,
/// wired to in-memory adapters so no external services are needed.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub codec: Arc<TokenCodec>,
}

/// Identity store double with the same uniqueness semantics as Postgres.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn exists_by_username(&self, username: &Username) -> Result<bool, AuthError> {
        Ok(self.users.read().await.contains_key(username.as_str()))
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AuthError> {
        Ok(self.users.read().await.get(username.as_str()).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, AuthError> {
        let mut users = self.users.write().await;
        if users.contains_key(user.username.as_str()) {
            return Err(AuthError::DuplicateUsername(user.username.to_string()));
        }
        users.insert(user.username.as_str().to_string(), user.clone());
        Ok(user)
    }
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let codec = Arc::new(
            TokenCodec::from_base64_secret(TEST_SECRET, Duration::minutes(60), Duration::hours(24))
                .expect("Failed to build codec"),
        );

        let repository = Arc::new(InMemoryUserRepository::default());
        let token_store = Arc::new(InMemoryTokenStore::new());
        let auth_service = Arc::new(AuthService::new(
            repository,
            token_store,
            Arc::clone(&codec),
        ));

        let app = create_router(auth_service);
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server failed");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            codec,
        }
    }

    pub async fn signup(
        &self,
        username: &str,
        password: &str,
        nickname: &str,
    ) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/auth/signup", self.address))
            .json(&serde_json::json!({
                "username": username,
                "password": password,
                "nickname": nickname,
            }))
            .send()
            .await
            .expect("Signup request failed")
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/auth/login", self.address))
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await
            .expect("Login request failed")
    }

    pub async fn get_me(&self, token: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}/api/users/me", self.address))
            .header("Authorization", token)
            .send()
            .await
            .expect("Me request failed")
    }

    /// Login and return the issued access token string.
    pub async fn login_token(&self, username: &str, password: &str) -> String {
        let response = self.login(username, password).await;
        assert_eq!(response.status(), 200);
        let body: serde_json::Value = response.json().await.expect("Invalid login body");
        body["data"]["token"]
            .as_str()
            .expect("Missing token in login response")
            .to_string()
    }
}

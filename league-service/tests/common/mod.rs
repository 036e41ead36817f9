use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::HashingCost;
use auth::PasswordHasher;
use auth::PasswordPolicy;
use auth::Role;
use chrono::DateTime;
use chrono::Utc;
use league_service::config::CookieConfig;
use league_service::config::CorsConfig;
use league_service::domain::auth::errors::AuthError;
use league_service::domain::auth::errors::NotificationError;
use league_service::domain::auth::models::PasswordResetToken;
use league_service::domain::auth::ports::PasswordResetRepository;
use league_service::domain::auth::ports::ResetTokenNotifier;
use league_service::domain::auth::service::AuthService;
use league_service::domain::user::models::EmailAddress;
use league_service::domain::user::models::NewUser;
use league_service::domain::user::models::User;
use league_service::domain::user::models::UserId;
use league_service::domain::user::service::UserService;
use league_service::inbound::http::router::create_router;
use league_service::inbound::http::router::AppState;
use league_service::user::errors::UserError;
use league_service::user::ports::UserRepository;
use serde_json::json;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server over in-memory storage
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub users: Arc<InMemoryUserRepository>,
    pub reset_tokens: Arc<InMemoryPasswordResetRepository>,
    pub notifier: Arc<CapturingNotifier>,
    pub authenticator: Arc<Authenticator>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let users = Arc::new(InMemoryUserRepository::default());
        let reset_tokens = Arc::new(InMemoryPasswordResetRepository::default());
        let notifier = Arc::new(CapturingNotifier::default());

        // Cheap work factor keeps the suite fast
        let password_hasher = PasswordHasher::with_settings(
            HashingCost {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            },
            PasswordPolicy::default(),
        )
        .expect("Failed to build password hasher");
        let authenticator =
            Arc::new(Authenticator::new(JWT_SECRET, 24).with_password_hasher(password_hasher));

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&users),
            Arc::clone(&reset_tokens),
            Arc::clone(&notifier),
            Arc::clone(&authenticator),
            chrono::Duration::minutes(30),
        ));
        let user_service = Arc::new(UserService::new(Arc::clone(&users)));

        let state = AppState {
            auth_service,
            user_service,
            authenticator: Arc::clone(&authenticator),
            cookie: CookieConfig::default(),
        };
        let router = create_router(state, &CorsConfig::default());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: Self::client(),
            users,
            reset_tokens,
            notifier,
            authenticator,
        }
    }

    /// A client with its own empty cookie store
    pub fn client() -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create reqwest client")
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(self.url(path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(self.url(path))
    }

    /// Helper to make PATCH request
    pub fn patch(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.patch(self.url(path))
    }

    /// Helper to make DELETE request
    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(self.url(path))
    }

    /// Register an account through the API; the session cookie lands in the client store
    pub async fn register(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/register")
            .json(&json!({
                "firstName": "Alice",
                "lastName": "Liddell",
                "email": email,
                "phoneNumber": "+1 555-0100",
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register an account and promote it to admin in storage, then log in
    pub async fn admin_session(&self, email: &str, password: &str) {
        self.register(email, password).await;
        self.users.set_role(email, Role::Admin);
        self.login(email, password).await;
    }
}

/// User repository backed by a map
#[derive(Default)]
pub struct InMemoryUserRepository {
    inner: Mutex<UserTable>,
}

#[derive(Default)]
struct UserTable {
    next_id: i64,
    users: HashMap<i64, User>,
}

impl InMemoryUserRepository {
    pub fn set_role(&self, email: &str, role: Role) {
        let mut table = self.inner.lock().unwrap();
        if let Some(user) = table
            .users
            .values_mut()
            .find(|user| user.email.as_str() == email)
        {
            user.role = role;
        }
    }

    pub fn password_hash(&self, email: &str) -> Option<String> {
        let table = self.inner.lock().unwrap();
        table
            .users
            .values()
            .find(|user| user.email.as_str() == email)
            .map(|user| user.password_hash.clone())
    }

    pub fn id_of(&self, email: &str) -> Option<i64> {
        let table = self.inner.lock().unwrap();
        table
            .users
            .values()
            .find(|user| user.email.as_str() == email)
            .map(|user| user.id.0)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut table = self.inner.lock().unwrap();

        if table.users.values().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        table.next_id += 1;
        let now = Utc::now();
        let created = User {
            id: UserId(table.next_id),
            email: user.email,
            phone_number: user.phone_number,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        table.users.insert(created.id.0, created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.inner.lock().unwrap().users.get(&id.0).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .users
            .values()
            .find(|user| &user.email == email)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let mut users: Vec<User> = self.inner.lock().unwrap().users.values().cloned().collect();
        users.sort_by(|a, b| b.id.0.cmp(&a.id.0));
        Ok(users)
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut table = self.inner.lock().unwrap();

        if table
            .users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        match table.users.get_mut(&user.id.0) {
            Some(stored) => {
                *stored = user.clone();
                Ok(user)
            }
            None => Err(UserError::NotFound(user.id.to_string())),
        }
    }

    async fn update_password_hash(
        &self,
        id: &UserId,
        password_hash: &str,
    ) -> Result<(), UserError> {
        let mut table = self.inner.lock().unwrap();
        match table.users.get_mut(&id.0) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                Ok(())
            }
            None => Err(UserError::NotFound(id.to_string())),
        }
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let mut table = self.inner.lock().unwrap();
        table
            .users
            .remove(&id.0)
            .map(|_| ())
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }
}

/// Reset record repository backed by a map keyed by digest
#[derive(Default)]
pub struct InMemoryPasswordResetRepository {
    records: Mutex<HashMap<String, PasswordResetToken>>,
}

impl InMemoryPasswordResetRepository {
    pub fn stored_digests(&self) -> Vec<String> {
        self.records.lock().unwrap().keys().cloned().collect()
    }

    pub fn expire_all(&self) {
        let mut records = self.records.lock().unwrap();
        for record in records.values_mut() {
            record.expires_at = Utc::now() - chrono::Duration::minutes(1);
        }
    }
}

#[async_trait]
impl PasswordResetRepository for InMemoryPasswordResetRepository {
    async fn create(&self, token: &PasswordResetToken) -> Result<(), AuthError> {
        self.records
            .lock()
            .unwrap()
            .insert(token.token_hash.clone(), token.clone());
        Ok(())
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<PasswordResetToken>, AuthError> {
        Ok(self.records.lock().unwrap().get(token_hash).cloned())
    }

    async fn mark_used(&self, token_hash: &str, now: DateTime<Utc>) -> Result<bool, AuthError> {
        let mut records = self.records.lock().unwrap();
        match records.get_mut(token_hash) {
            Some(record) if !record.used && record.expires_at > now => {
                record.used = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// Notifier that keeps delivered tokens for the test to read
#[derive(Default)]
pub struct CapturingNotifier {
    delivered: Mutex<Vec<(String, String)>>,
}

impl CapturingNotifier {
    /// Most recent token delivered to `email`
    pub fn last_token_for(&self, email: &str) -> Option<String> {
        self.delivered
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(recipient, _)| recipient == email)
            .map(|(_, token)| token.clone())
    }

    pub fn delivery_count(&self) -> usize {
        self.delivered.lock().unwrap().len()
    }
}

#[async_trait]
impl ResetTokenNotifier for CapturingNotifier {
    async fn send_reset_token(
        &self,
        user: &User,
        token: &str,
        _expires_at: DateTime<Utc>,
    ) -> Result<(), NotificationError> {
        self.delivered
            .lock()
            .unwrap()
            .push((user.email.to_string(), token.to_string()));
        Ok(())
    }
}

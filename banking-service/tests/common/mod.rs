use banking_service::config::{
    AccountNumberPolicy, BankDataConfig, Config, DatabaseConfig, JwtConfig, RateLimitConfig,
    ServerConfig,
};
use banking_service::Application;
use mongodb::bson::{doc, Document};
use secrecy::Secret;
use serde_json::{json, Value};

pub const ADMIN_PASSWORD: &str = "admin-bootstrap-pass";

pub struct TestApp {
    pub address: String,
    pub db: mongodb::Database,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn with a config tweak (bank-data URL, account policy, ...).
    pub async fn spawn_with(customize: impl FnOnce(&mut Config)) -> Self {
        let db_name = format!("banking_test_{}", uuid::Uuid::new_v4());

        let mut config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Random port
            },
            database: DatabaseConfig {
                url: Secret::new(
                    std::env::var("TEST_MONGODB_URI")
                        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
                ),
                db_name,
            },
            jwt: JwtConfig {
                secret: Secret::new("test-jwt-signing-secret".to_string()),
                token_expiry_minutes: 60,
            },
            bank_data: BankDataConfig {
                // Unroutable unless a test points this at a mock server
                base_url: "http://127.0.0.1:9".to_string(),
                api_key: Secret::new("test-api-key".to_string()),
            },
            // Generous burst so suites never trip the limiter
            rate_limit: RateLimitConfig {
                attempts: 50,
                window_seconds: 3600,
            },
            account_policy: AccountNumberPolicy::Iban,
            admin_password: Some(Secret::new(ADMIN_PASSWORD.to_string())),
            service_name: "banking-service-test".to_string(),
        };
        customize(&mut config);

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let address = format!("http://127.0.0.1:{}", app.port());
        let db = app.db().clone();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to come up
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            db,
            client,
        }
    }

    /// Cleanup test database after test completes.
    pub async fn cleanup(&self) {
        self.db
            .drop(None)
            .await
            .expect("Failed to drop test database");
    }

    pub async fn signup(&self, username: &str, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/user/signup", self.address))
            .json(&json!({
                "firstName": "Test",
                "lastName": "User",
                "email": email,
                "username": username,
                "password": password,
                "accountNumber": "12345678",
                "idNumber": "9001015800081"
            }))
            .send()
            .await
            .expect("signup request failed")
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .client
            .post(format!("{}/user/login", self.address))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("login request failed");
        assert_eq!(response.status(), 200, "login should succeed");

        let body: Value = response.json().await.expect("login response body");
        body["token"]
            .as_str()
            .expect("token in login response")
            .to_string()
    }

    pub async fn register_and_login(&self, username: &str) -> String {
        let email = format!("{username}@example.com");
        let response = self.signup(username, &email, "a-strong-password").await;
        assert_eq!(response.status(), 201, "signup should succeed");
        self.login(username, "a-strong-password").await
    }

    pub async fn admin_token(&self) -> String {
        self.login("admin", ADMIN_PASSWORD).await
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .bearer_auth(token)
            .send()
            .await
            .expect("request failed")
    }

    pub async fn post_auth(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .bearer_auth(token)
            .send()
            .await
            .expect("request failed")
    }

    pub async fn patch_auth(&self, path: &str, token: &str, body: &Value) -> reqwest::Response {
        self.client
            .patch(format!("{}{}", self.address, path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("request failed")
    }

    pub async fn deposit(&self, token: &str, amount: f64) -> reqwest::Response {
        self.patch_auth("/dashboard/deposit", token, &json!({ "amount": amount }))
            .await
    }

    /// Submit a payment with defaults matching the wiremock fixtures used
    /// by the verification tests.
    pub async fn submit_payment(&self, token: &str, amount: f64) -> reqwest::Response {
        self.submit_payment_with(
            token,
            &json!({
                "recipientName": "Grace Hopper",
                "recipientBank": "Deutsche Bank",
                "recipientAccountNo": "GB82WEST12345698765432",
                "amountTransfer": amount,
                "swiftCode": "DEUTDEFF",
                "currency": "EUR"
            }),
        )
        .await
    }

    pub async fn submit_payment_with(&self, token: &str, body: &Value) -> reqwest::Response {
        self.patch_auth("/payments", token, body).await
    }

    pub async fn balance_of(&self, username: &str) -> f64 {
        let user = self
            .db
            .collection::<Document>("users")
            .find_one(doc! { "username": username }, None)
            .await
            .expect("user query failed")
            .expect("user exists");
        user.get_f64("balance").expect("balance is a double")
    }

    pub async fn payments_count(&self) -> u64 {
        self.db
            .collection::<Document>("payments")
            .count_documents(None, None)
            .await
            .expect("count query failed")
    }

    pub async fn payment_doc(&self, transaction_id: &str) -> Document {
        self.db
            .collection::<Document>("payments")
            .find_one(doc! { "_id": transaction_id }, None)
            .await
            .expect("payment query failed")
            .expect("payment exists")
    }
}

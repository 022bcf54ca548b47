use anyhow::{Context, Result};
use dotenvy::dotenv;
use secrecy::Secret;
use std::env;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub bank_data: BankDataConfig,
    pub rate_limit: RateLimitConfig,
    pub account_policy: AccountNumberPolicy,
    pub admin_password: Option<Secret<String>>,
    pub service_name: String,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    pub db_name: String,
}

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: Secret<String>,
    pub token_expiry_minutes: i64,
}

#[derive(Clone, Debug)]
pub struct BankDataConfig {
    pub base_url: String,
    pub api_key: Secret<String>,
}

#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    pub attempts: u32,
    pub window_seconds: u64,
}

/// Validation policy for recipient account numbers on payment submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccountNumberPolicy {
    /// 8 to 12 ASCII digits.
    Numeric,
    /// IBAN shape: two letters, two check digits, then alphanumerics.
    Iban,
}

impl AccountNumberPolicy {
    pub fn matches(&self, account_no: &str) -> bool {
        match self {
            AccountNumberPolicy::Numeric => {
                (8..=12).contains(&account_no.len())
                    && account_no.bytes().all(|b| b.is_ascii_digit())
            }
            AccountNumberPolicy::Iban => {
                let compact: String = account_no.chars().filter(|c| *c != ' ').collect();
                if !(9..=34).contains(&compact.len()) {
                    return false;
                }
                let bytes = compact.as_bytes();
                bytes[..2].iter().all(|b| b.is_ascii_uppercase())
                    && bytes[2..4].iter().all(|b| b.is_ascii_digit())
                    && bytes[4..]
                        .iter()
                        .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
            }
        }
    }

    pub fn rejection_message(&self) -> &'static str {
        match self {
            AccountNumberPolicy::Numeric => {
                "Recipient account number must be between 8 and 12 digits."
            }
            AccountNumberPolicy::Iban => "Recipient account number must be a valid IBAN.",
        }
    }
}

impl FromStr for AccountNumberPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "numeric" => Ok(AccountNumberPolicy::Numeric),
            "iban" => Ok(AccountNumberPolicy::Iban),
            other => anyhow::bail!("unknown account policy: {other}"),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let host = env::var("BANKING_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("BANKING_SERVICE_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        let db_url = env::var("BANKING_DATABASE_URL").context("BANKING_DATABASE_URL must be set")?;
        let db_name =
            env::var("BANKING_DATABASE_NAME").unwrap_or_else(|_| "banking_db".to_string());

        // No fallback secret: refusing to start beats signing tokens with a
        // well-known default.
        let jwt_secret =
            env::var("BANKING_JWT_SECRET").context("BANKING_JWT_SECRET must be set")?;
        let token_expiry_minutes = env::var("BANKING_TOKEN_EXPIRY_MINUTES")
            .unwrap_or_else(|_| "60".to_string())
            .parse()?;

        let bank_api_url = env::var("BANKING_BANK_DATA_API_URL")
            .unwrap_or_else(|_| "https://api.apilayer.com/bank_data".to_string());
        let bank_api_key =
            env::var("BANKING_BANK_DATA_API_KEY").context("BANKING_BANK_DATA_API_KEY must be set")?;

        let attempts = env::var("BANKING_RATE_LIMIT_ATTEMPTS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()?;
        let window_seconds = env::var("BANKING_RATE_LIMIT_WINDOW_SECONDS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()?;

        let account_policy = env::var("BANKING_ACCOUNT_POLICY")
            .unwrap_or_else(|_| "iban".to_string())
            .parse()?;

        let admin_password = env::var("BANKING_ADMIN_PASSWORD").ok().map(Secret::new);

        Ok(Self {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url: Secret::new(db_url),
                db_name,
            },
            jwt: JwtConfig {
                secret: Secret::new(jwt_secret),
                token_expiry_minutes,
            },
            bank_data: BankDataConfig {
                base_url: bank_api_url,
                api_key: Secret::new(bank_api_key),
            },
            rate_limit: RateLimitConfig {
                attempts,
                window_seconds,
            },
            account_policy,
            admin_password,
            service_name: "banking-service".to_string(),
        })
    }
}

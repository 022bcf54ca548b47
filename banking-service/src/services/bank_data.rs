//! External bank-data lookup client (SWIFT and IBAN validation).

use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::config::BankDataConfig;

/// Client for the bank-data validation API.
#[derive(Clone)]
pub struct BankDataClient {
    client: Client,
    base_url: String,
    api_key: Secret<String>,
}

/// Outcome of an external lookup. A transport or decode failure folds into
/// `valid: false`: the verification workflow treats an unreachable
/// validator the same as invalid data (known weakness, see DESIGN.md).
#[derive(Debug)]
pub struct BankLookup {
    pub valid: bool,
    pub bank_name: Option<String>,
}

impl BankLookup {
    fn not_valid() -> Self {
        Self {
            valid: false,
            bank_name: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    valid: bool,
    bank_data: Option<BankData>,
}

#[derive(Debug, Deserialize)]
struct BankData {
    name: Option<String>,
}

impl BankDataClient {
    pub fn new(config: &BankDataConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Validate a SWIFT/BIC code and report the bank it belongs to.
    pub async fn check_swift(&self, swift_code: &str) -> BankLookup {
        let url = format!("{}/swift_check", self.base_url);
        self.lookup(&url, &[("swift_code", swift_code)]).await
    }

    /// Look up the bank holding an account number (IBAN).
    pub async fn check_account(&self, account_no: &str) -> BankLookup {
        let url = format!("{}/iban_validate", self.base_url);
        self.lookup(&url, &[("iban_number", account_no)]).await
    }

    async fn lookup(&self, url: &str, query: &[(&str, &str)]) -> BankLookup {
        match self.fetch(url, query).await {
            Ok(lookup) => lookup,
            Err(e) => {
                tracing::warn!(error = %e, url, "bank data lookup failed, treating as not valid");
                BankLookup::not_valid()
            }
        }
    }

    async fn fetch(&self, url: &str, query: &[(&str, &str)]) -> anyhow::Result<BankLookup> {
        let response = self
            .client
            .get(url)
            .query(query)
            .header("apikey", self.api_key.expose_secret())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, body = %body, "bank data response");

        if !status.is_success() {
            anyhow::bail!("bank data API returned {}", status);
        }

        let parsed: LookupResponse = serde_json::from_str(&body)?;

        Ok(BankLookup {
            valid: parsed.valid,
            bank_name: parsed.bank_data.and_then(|b| b.name),
        })
    }
}

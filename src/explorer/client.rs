//! Etherscan HTTP API client.
//!
//! # Responsibilities
//! - Ask whether an address already has verified source (`getsourcecode`)
//! - Submit standard-JSON source for verification (`verifysourcecode`)
//! - Poll the verdict of a submission (`checkverifystatus`)

use std::time::Duration;

use alloy::primitives::Address;
use tokio::time::{interval, timeout};

use crate::config::ResolvedExplorer;
use crate::explorer::types::{
    is_already_verified, is_missing_bytecode, ApiResponse, ExplorerError, ExplorerResult,
    SourceSubmission, Submission, VerificationStatus,
};

/// Client for one explorer endpoint with an API key.
#[derive(Clone)]
pub struct EtherscanClient {
    http: reqwest::Client,
    api_url: url::Url,
    browser_url: String,
    api_key: String,
    poll_interval: Duration,
    verification_timeout: Duration,
}

impl EtherscanClient {
    /// Create a client for the resolved explorer settings.
    ///
    /// Fails when the API key variable was not set or the network has no
    /// explorer endpoint.
    pub fn new(explorer: &ResolvedExplorer) -> ExplorerResult<Self> {
        let api_key = explorer.api_key.clone().ok_or_else(|| ExplorerError::MissingApiKey {
            network: explorer.network.clone(),
            variable: explorer
                .api_key_env
                .clone()
                .unwrap_or_else(|| "<unmapped>".to_string()),
        })?;

        let endpoint = explorer
            .endpoint
            .as_ref()
            .ok_or_else(|| ExplorerError::UnsupportedNetwork(explorer.network.clone()))?;

        let api_url: url::Url = endpoint.api_url.parse().map_err(|e: url::ParseError| {
            ExplorerError::InvalidUrl {
                url: endpoint.api_url.clone(),
                reason: e.to_string(),
            }
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(explorer.settings.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_url,
            browser_url: endpoint.browser_url.trim_end_matches('/').to_string(),
            api_key,
            poll_interval: Duration::from_millis(explorer.settings.poll_interval_ms.max(1)),
            verification_timeout: Duration::from_secs(explorer.settings.verification_timeout_secs),
        })
    }

    /// Browser link to the verified source of an address.
    pub fn contract_url(&self, address: Address) -> String {
        format!("{}/address/{}#code", self.browser_url, address)
    }

    /// Whether the explorer already has source code for the address.
    pub async fn is_verified(&self, address: Address) -> ExplorerResult<bool> {
        let address = address.to_string();
        let response: ApiResponse = self
            .http
            .get(self.api_url.clone())
            .query(&[
                ("module", "contract"),
                ("action", "getsourcecode"),
                ("address", address.as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !response.is_ok() {
            return Err(api_error("getsourcecode", &response));
        }

        let verified = response
            .result
            .get(0)
            .and_then(|entry| entry.get("SourceCode"))
            .and_then(|source| source.as_str())
            .is_some_and(|source| !source.is_empty());

        Ok(verified)
    }

    /// Submit source code for verification.
    pub async fn submit(&self, submission: &SourceSubmission) -> ExplorerResult<Submission> {
        let address = submission.address.to_string();
        let form = [
            ("apikey", self.api_key.as_str()),
            ("module", "contract"),
            ("action", "verifysourcecode"),
            ("contractaddress", address.as_str()),
            ("sourceCode", submission.source_code.as_str()),
            ("codeformat", "solidity-standard-json-input"),
            ("contractname", submission.contract_name.as_str()),
            ("compilerversion", submission.compiler_version.as_str()),
            // Misspelling is part of the Etherscan API.
            ("constructorArguements", submission.constructor_arguments.as_str()),
        ];

        let response: ApiResponse = self
            .http
            .post(self.api_url.clone())
            .form(&form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.is_ok() {
            let guid = response.result_str().to_string();
            tracing::info!(
                address = %submission.address,
                contract = %submission.contract_name,
                guid = %guid,
                "Source code submitted for verification"
            );
            return Ok(Submission::Accepted(guid));
        }

        let result = response.result_str();
        if is_already_verified(result) {
            Ok(Submission::AlreadyVerified)
        } else if is_missing_bytecode(result) {
            Err(ExplorerError::NotIndexed(submission.address))
        } else {
            Err(api_error("verifysourcecode", &response))
        }
    }

    /// Query the state of a submission once.
    pub async fn check_status(&self, guid: &str) -> ExplorerResult<VerificationStatus> {
        let response: ApiResponse = self
            .http
            .get(self.api_url.clone())
            .query(&[
                ("module", "contract"),
                ("action", "checkverifystatus"),
                ("guid", guid),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        VerificationStatus::from_response(&response)
            .ok_or_else(|| api_error("checkverifystatus", &response))
    }

    /// Poll a submission until the explorer reaches a verdict.
    ///
    /// Returns `Verified` or `AlreadyVerified`; a rejection is an error.
    pub async fn wait_for_verdict(
        &self,
        guid: &str,
        address: Address,
    ) -> ExplorerResult<VerificationStatus> {
        let result = timeout(self.verification_timeout, async {
            let mut ticker = interval(self.poll_interval);
            // The first tick completes immediately; give the queue one interval.
            ticker.tick().await;

            loop {
                ticker.tick().await;

                match self.check_status(guid).await? {
                    VerificationStatus::Pending => {
                        tracing::debug!(guid = %guid, "Verification pending");
                    }
                    VerificationStatus::Failed(reason) => {
                        return Err(ExplorerError::VerificationFailed { address, reason });
                    }
                    verdict => return Ok(verdict),
                }
            }
        })
        .await;

        match result {
            Ok(verdict) => verdict,
            Err(_) => Err(ExplorerError::Timeout {
                guid: guid.to_string(),
                waited_secs: self.verification_timeout.as_secs(),
            }),
        }
    }
}

impl std::fmt::Debug for EtherscanClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EtherscanClient")
            .field("api_url", &self.api_url.as_str())
            .field("browser_url", &self.browser_url)
            .finish()
    }
}

fn api_error(action: &'static str, response: &ApiResponse) -> ExplorerError {
    let result = match &response.result {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    ExplorerError::Api {
        action,
        message: response.message.clone(),
        result,
    }
}

//! FundOps API client.
//!
//! The typed boundary between the client core and the back-office REST
//! API. [`FundOpsApi`] is the narrow trait the session layer depends on;
//! [`RestClient`] implements it over HTTP and additionally exposes the
//! organization-scoped collection reads pages use.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fundops_org::{Identity, Membership, Organization};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::retry::{with_retry_if, RetryConfig};
use crate::types::{Fund, Investor, InvestorFund, OrganizationUser, Property, RoleRecord};

/// Operations the session layer needs from the API.
///
/// Tokens are opaque bearer strings: obtained from `authenticate`,
/// presented to everything else, never inspected client-side.
#[async_trait]
pub trait FundOpsApi: Send + Sync {
    /// Exchange credentials for an access token.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidCredentials`] when the credentials are
    /// rejected, [`ApiError::Network`] when the service is unreachable.
    async fn authenticate(&self, username: &str, password: &str) -> ApiResult<String>;

    /// Fetch the identity the token belongs to.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unauthorized`] when the token is expired or revoked.
    async fn current_identity(&self, token: &str) -> ApiResult<Identity>;

    /// Fetch the organizations a user belongs to.
    async fn memberships_for(&self, token: &str, user_id: &str) -> ApiResult<Vec<Membership>>;

    /// Change the authenticated user's password.
    ///
    /// # Errors
    ///
    /// [`ApiError::Api`] with status 400 when the current password does
    /// not match.
    async fn change_password(&self, token: &str, current: &str, new: &str) -> ApiResult<()>;
}

/// HTTP client for the FundOps API.
#[derive(Clone)]
pub struct RestClient {
    /// HTTP client instance.
    client: Client,

    /// Endpoint configuration.
    config: ApiConfig,

    /// Retry policy for idempotent reads.
    retry: RetryConfig,
}

impl RestClient {
    /// Create a new client from configuration.
    pub fn new(config: ApiConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .expect("Failed to build HTTP client");
        let retry = RetryConfig::for_attempts(config.max_retries);

        Self {
            client,
            config,
            retry,
        }
    }

    /// Create a client configured from environment variables.
    pub fn from_env() -> Self {
        Self::new(ApiConfig::from_env())
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Issue a bearer-authenticated GET and parse the JSON body.
    async fn get_json<T>(&self, path: &str, token: &str) -> ApiResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = self.config.url(path);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// GET with retries for transient failures.
    ///
    /// Only used for idempotent reads; auth failures and client errors
    /// return immediately.
    async fn get_with_retry<T>(&self, path: &str, token: &str) -> ApiResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        with_retry_if(
            &self.retry,
            || self.get_json(path, token),
            ApiError::is_transient,
        )
        .await
    }

    /// Handle an API response and parse JSON.
    async fn handle_response<T>(&self, response: reqwest::Response) -> ApiResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            warn!("Request rejected: token missing or expired");
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = detail_message(&body);
            warn!("API error ({}): {}", status.as_u16(), message);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    // ==================== Organization-scoped reads ====================

    /// Funds belonging to an organization.
    #[instrument(skip(self, token), fields(organization_id = %organization_id))]
    pub async fn list_funds(&self, token: &str, organization_id: &str) -> ApiResult<Vec<Fund>> {
        debug!("Fetching funds for organization");
        self.get_with_retry(
            &format!("/api/v1/funds/organization/{}", organization_id),
            token,
        )
        .await
    }

    /// Investors belonging to an organization.
    #[instrument(skip(self, token), fields(organization_id = %organization_id))]
    pub async fn list_investors(
        &self,
        token: &str,
        organization_id: &str,
    ) -> ApiResult<Vec<Investor>> {
        debug!("Fetching investors for organization");
        self.get_with_retry(
            &format!("/api/v1/investors/organization/{}", organization_id),
            token,
        )
        .await
    }

    /// Properties belonging to an organization.
    #[instrument(skip(self, token), fields(organization_id = %organization_id))]
    pub async fn list_properties(
        &self,
        token: &str,
        organization_id: &str,
    ) -> ApiResult<Vec<Property>> {
        debug!("Fetching properties for organization");
        self.get_with_retry(
            &format!("/api/v1/properties/organization/{}", organization_id),
            token,
        )
        .await
    }

    /// Investor-to-fund allocations within an organization.
    #[instrument(skip(self, token), fields(organization_id = %organization_id))]
    pub async fn list_allocations(
        &self,
        token: &str,
        organization_id: &str,
    ) -> ApiResult<Vec<InvestorFund>> {
        debug!("Fetching allocations for organization");
        self.get_with_retry(
            &format!("/api/v1/investor-funds/organization/{}", organization_id),
            token,
        )
        .await
    }

    /// Investors committed to a fund.
    #[instrument(skip(self, token), fields(fund_id = %fund_id))]
    pub async fn fund_investors(&self, token: &str, fund_id: &str) -> ApiResult<Vec<Investor>> {
        debug!("Fetching investors for fund");
        self.get_with_retry(&format!("/api/v1/investors/fund/{}", fund_id), token)
            .await
    }

    /// Users of an organization, with their roles there.
    #[instrument(skip(self, token), fields(organization_id = %organization_id))]
    pub async fn list_organization_users(
        &self,
        token: &str,
        organization_id: &str,
    ) -> ApiResult<Vec<OrganizationUser>> {
        debug!("Fetching users for organization");
        self.get_with_retry(
            &format!("/api/v1/users/organization/{}", organization_id),
            token,
        )
        .await
    }

    /// All organizations. Platform-operator screens only.
    #[instrument(skip(self, token))]
    pub async fn list_organizations(&self, token: &str) -> ApiResult<Vec<Organization>> {
        debug!("Fetching all organizations");
        self.get_with_retry("/api/v1/organizations/", token).await
    }

    /// The role catalog.
    #[instrument(skip(self, token))]
    pub async fn list_roles(&self, token: &str, active_only: bool) -> ApiResult<Vec<RoleRecord>> {
        debug!("Fetching role catalog");
        self.get_with_retry(
            &format!("/api/v1/roles/?active_only={}", active_only),
            token,
        )
        .await
    }
}

#[async_trait]
impl FundOpsApi for RestClient {
    #[instrument(skip(self, password), fields(username = %username))]
    async fn authenticate(&self, username: &str, password: &str) -> ApiResult<String> {
        debug!("Requesting access token");

        let url = self.config.url("/api/v1/auth/login");
        let response = self
            .client
            .post(&url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        // The login endpoint is the one place a 401 means bad
        // credentials rather than a bad token.
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            warn!("Login rejected for {}", username);
            return Err(ApiError::InvalidCredentials);
        }

        let token: TokenResponse = self.handle_response(response).await?;
        Ok(token.access_token)
    }

    #[instrument(skip(self, token))]
    async fn current_identity(&self, token: &str) -> ApiResult<Identity> {
        debug!("Fetching current identity");
        self.get_with_retry("/api/v1/auth/me", token).await
    }

    #[instrument(skip(self, token), fields(user_id = %user_id))]
    async fn memberships_for(&self, token: &str, user_id: &str) -> ApiResult<Vec<Membership>> {
        debug!("Fetching memberships");

        let response: UserOrganizationsResponse = self
            .get_with_retry(&format!("/api/v1/users/{}/organizations", user_id), token)
            .await?;

        Ok(response
            .organizations
            .into_iter()
            .map(MembershipEntry::into_membership)
            .collect())
    }

    #[instrument(skip(self, token, current, new))]
    async fn change_password(&self, token: &str, current: &str, new: &str) -> ApiResult<()> {
        debug!("Changing password");

        let url = self.config.url("/api/v1/auth/change-password");
        let body = ChangePasswordRequest {
            current_password: current.to_string(),
            new_password: new.to_string(),
        };
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", token))
            .json(&body)
            .send()
            .await?;

        let _: MessageResponse = self.handle_response(response).await?;
        Ok(())
    }
}

/// Extract the API's error detail from a response body.
///
/// Error bodies are `{"detail": "..."}"`; anything else is passed
/// through verbatim.
fn detail_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from))
        .unwrap_or_else(|| body.to_string())
}

/// Response from the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenResponse {
    /// The bearer token.
    access_token: String,

    /// Token type, always "bearer".
    #[serde(default = "default_token_type")]
    token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Response from the user-organizations endpoint.
///
/// The user fields ride along but the client only consumes the
/// organization entries.
#[derive(Debug, Clone, Deserialize)]
struct UserOrganizationsResponse {
    #[serde(default)]
    organizations: Vec<MembershipEntry>,
}

/// One organization entry as the API lists it for a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipEntry {
    /// Organization id.
    pub id: String,

    /// Organization name.
    pub name: Option<String>,

    /// Organization code.
    pub code: Option<String>,

    /// Role within the organization.
    pub role: Option<String>,

    /// Role catalog record id.
    pub role_id: Option<String>,

    /// Whether this is the user's primary organization.
    pub is_primary: Option<bool>,

    /// When the user joined.
    pub joined_at: Option<DateTime<Utc>>,
}

impl MembershipEntry {
    /// Convert the wire entry into the domain membership.
    ///
    /// Null roles map to an empty role name, which carries no admin
    /// rights and matches no role check.
    pub fn into_membership(self) -> Membership {
        Membership {
            organization_id: self.id,
            organization_name: self.name.unwrap_or_default(),
            organization_code: self.code,
            role: self.role.unwrap_or_default(),
            role_id: self.role_id,
            is_primary: self.is_primary.unwrap_or(false),
            joined_at: self.joined_at,
        }
    }
}

/// Request body for the change-password endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChangePasswordRequest {
    current_password: String,
    new_password: String,
}

/// Generic message acknowledgement.
#[derive(Debug, Clone, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    #[allow(dead_code)]
    message: String,
}

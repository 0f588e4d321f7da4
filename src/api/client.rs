//! Authenticated request gateway for the case-note management API.
//!
//! Every domain call goes through `ApiClient::send`, which attaches the
//! bearer credential when a live access token exists and performs a single
//! silent refresh-and-retry when the server answers 401. The retry is
//! bounded by an explicit attempt counter, never by state hidden on the
//! request itself.
//!
//! Two concurrent requests that both hit 401 will each run their own
//! refresh; refreshes are not deduplicated into a single flight.

use std::sync::Arc;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::auth::{token, SessionStore};
use crate::models::{
    CaseNote, CaseNoteCreateRequest, CaseNoteCreated, CaseNotesListResponse, ClientSearchPage,
    UserIdentity,
};

use super::transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
use super::ApiError;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
    refresh_token: String,
    user: UserIdentity,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
}

/// API client for the case-note service.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Arc<SessionStore>,
}

impl ApiClient {
    /// Create a client talking HTTP to the given base URL.
    pub fn new(base_url: &str, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        Ok(Self {
            transport: Arc::new(HttpTransport::new(base_url)?),
            session,
        })
    }

    /// Create a client over an arbitrary transport (tests, instrumentation).
    pub fn with_transport(transport: Arc<dyn Transport>, session: Arc<SessionStore>) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    // ===== Session operations =====

    /// Authenticate and persist the returned token pair and identity.
    /// Never retries: a 401 here means the credentials themselves are wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<UserIdentity, ApiError> {
        let request = ApiRequest::post(
            "/auth/login",
            json!({"username": username, "password": password}),
        );
        let response = self.transport.execute(request).await?;

        if response.status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::InvalidCredentials);
        }
        if !response.status.is_success() {
            return Err(ApiError::from_status(response.status, &response.body));
        }

        let parsed: LoginResponse = response.json()?;
        self.session
            .set_tokens(&parsed.access_token, &parsed.refresh_token);
        self.session.set_user_identity(&parsed.user);
        debug!(username, "Login successful");
        Ok(parsed.user)
    }

    /// Best-effort server-side logout, then clear the local session.
    /// Cannot fail from the caller's perspective.
    pub async fn logout(&self) {
        if let Some(refresh) = self.session.refresh_token() {
            let request = ApiRequest::post("/auth/logout", json!({"refresh_token": refresh}));
            match self.transport.execute(request).await {
                Ok(response) if !response.status.is_success() => {
                    debug!(status = %response.status, "Server logout rejected, clearing local session anyway");
                }
                Err(error) => {
                    debug!(%error, "Server logout failed, clearing local session anyway");
                }
                Ok(_) => {}
            }
        }
        self.session.clear();
    }

    /// True iff an access token is present and unexpired. No network call,
    /// no refresh attempt.
    pub fn is_authenticated(&self) -> bool {
        self.session
            .access_token()
            .map(|t| !token::is_expired(&t))
            .unwrap_or(false)
    }

    /// Proactively refresh the access token (e.g. on startup).
    ///
    /// Returns true and persists the new access token on success. A
    /// rejected refresh clears the session; an absent refresh token just
    /// returns false.
    pub async fn refresh_token(&self) -> bool {
        let refresh = match self.session.refresh_token() {
            Some(t) if !token::is_expired(&t) => t,
            Some(_) => {
                // Present but expired: the record is dead, destroy it
                self.session.clear();
                return false;
            }
            None => return false,
        };

        match self.call_refresh_endpoint(&refresh).await {
            Ok(access) => {
                self.session.set_tokens(&access, &refresh);
                true
            }
            Err(error) => {
                warn!(%error, "Proactive token refresh failed, clearing session");
                self.session.clear();
                false
            }
        }
    }

    // ===== Domain calls =====

    /// Search clients assigned to the caseworker, paginated.
    pub async fn search_clients(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<ClientSearchPage, ApiError> {
        let request = ApiRequest::get("/clients/search")
            .query("q", query)
            .query("page", page.to_string())
            .query("page_size", page_size.to_string());
        let response = self.send(request).await?;
        response.json()
    }

    /// Fetch all case notes for a client, newest first (server ordering).
    pub async fn client_case_notes(&self, client_id: &str) -> Result<Vec<CaseNote>, ApiError> {
        let request = ApiRequest::get(format!("/case-notes/client/{}", client_id));
        let response = self.send(request).await?;
        let parsed: CaseNotesListResponse = response.json()?;
        Ok(parsed.case_notes)
    }

    /// Create a new case note for a client.
    pub async fn create_case_note(
        &self,
        note: &CaseNoteCreateRequest,
    ) -> Result<CaseNoteCreated, ApiError> {
        let body = serde_json::to_value(note)
            .map_err(|error| ApiError::InvalidResponse(format!("Failed to encode note: {}", error)))?;
        let request = ApiRequest::post("/case-notes/", body);
        let response = self.send(request).await?;
        response.json()
    }

    // ===== Request plumbing =====

    fn attach_bearer(&self, mut request: ApiRequest) -> ApiRequest {
        if let Some(access) = self.session.access_token() {
            if !token::is_expired(&access) {
                request.bearer = Some(access);
            }
        }
        request
    }

    /// Send an authenticated request with a single-shot refresh on 401.
    ///
    /// The first 401 triggers the recovery protocol and one resend; the
    /// resend's outcome is returned as-is, so a second 401 surfaces to the
    /// caller without another refresh.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut attempt: u8 = 0;
        loop {
            let outbound = self.attach_bearer(request.clone());
            let response = self.transport.execute(outbound).await?;

            if response.status == StatusCode::UNAUTHORIZED && attempt == 0 {
                debug!(path = %request.path, "Got 401, attempting token refresh");
                attempt += 1;
                self.refresh_or_expire().await?;
                continue;
            }

            if response.status.is_success() {
                return Ok(response);
            }
            return Err(ApiError::from_status(response.status, &response.body));
        }
    }

    /// Reactive half of the recovery protocol: obtain a fresh access token
    /// or clear the session and report it expired.
    async fn refresh_or_expire(&self) -> Result<(), ApiError> {
        let refresh = match self.session.refresh_token() {
            Some(t) if !token::is_expired(&t) => t,
            _ => {
                warn!("No usable refresh token, session is over");
                self.session.clear();
                return Err(ApiError::SessionExpired);
            }
        };

        match self.call_refresh_endpoint(&refresh).await {
            Ok(access) => {
                // The backend rotates the access token only; rewrite the
                // pair so both slots stay in step.
                self.session.set_tokens(&access, &refresh);
                Ok(())
            }
            Err(error) => {
                warn!(%error, "Token refresh rejected, clearing session");
                self.session.clear();
                Err(ApiError::SessionExpired)
            }
        }
    }

    async fn call_refresh_endpoint(&self, refresh: &str) -> Result<String, ApiError> {
        let request = ApiRequest::post("/auth/refresh", json!({"refresh_token": refresh}));
        let response = self.transport.execute(request).await?;
        if !response.status.is_success() {
            return Err(ApiError::from_status(response.status, &response.body));
        }
        let parsed: RefreshResponse = response.json()?;
        Ok(parsed.access_token)
    }
}

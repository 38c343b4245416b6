//! HTTP client for the Shepherd REST API

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shepherd_shared::models::{
    AttendanceRecord, Community, Contribution, CreateUserRequest, Event, ForgotPasswordRequest,
    LoginRequest, LoginResponse, Member, MessageResponse, ResetPasswordRequest,
    UpdateCommunityRequest, UpdateContributionRequest, UpdateEventRequest, UpdateMemberRequest,
    UpdateUserRequest, User,
};

use crate::{ClientConfig, ClientError, ClientResult};

/// Success envelope returned by every API route.
#[derive(Deserialize)]
struct ApiEnvelope<T> {
    success: bool,
    data: Option<T>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// HTTP client for making requests to the Shepherd backend
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(config.base_url.clone()));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base,
            token: config.token.clone(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Set the session token
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Forget the session token
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// The base URL followed by `segments`, each percent-encoded as a single
    /// path segment so ids containing `/`, `?`, `#` or `%` stay intact.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Resolve a literal route such as `/api/members`.
    fn url(&self, path: &str) -> Url {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        self.endpoint(&segments)
    }

    /// Attach the bearer token, send, and unwrap the envelope.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> ClientResult<T> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.execute(self.client.get(self.url(path))).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.execute(self.client.post(self.url(path)).json(body)).await
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.execute(self.client.put(self.url(path)).json(body)).await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.execute(self.client.delete(self.url(path))).await
    }

    async fn put_item<T: DeserializeOwned, B: Serialize>(
        &self,
        collection: &str,
        id: &str,
        body: &B,
    ) -> ClientResult<T> {
        let url = self.endpoint(&["api", collection, id]);
        self.execute(self.client.put(url).json(body)).await
    }

    async fn delete_item<T: DeserializeOwned>(&self, collection: &str, id: &str) -> ClientResult<T> {
        let url = self.endpoint(&["api", collection, id]);
        self.execute(self.client.delete(url)).await
    }

    /// GET /health; true when the server answers.
    pub async fn health(&self) -> ClientResult<bool> {
        let response = self.client.get(self.url("/health")).send().await?;
        Ok(response.status().is_success())
    }

    /// Unwrap the success envelope or map the error body onto [`ClientError`].
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(match status {
                StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
                StatusCode::FORBIDDEN => ClientError::Forbidden(message),
                StatusCode::NOT_FOUND => ClientError::NotFound(message),
                StatusCode::BAD_REQUEST => ClientError::Validation(message),
                StatusCode::CONFLICT => ClientError::Conflict(message),
                _ => ClientError::Internal(message),
            });
        }

        let body = response.bytes().await?;
        let envelope: ApiEnvelope<T> = serde_json::from_slice(&body)?;
        if !envelope.success {
            return Err(ClientError::InvalidResponse(
                "Envelope reported failure".to_string(),
            ));
        }
        envelope
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing data".to_string()))
    }

    // ========== Auth API ==========

    /// Log in and keep the issued token for subsequent calls
    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response: LoginResponse = self.post("/api/auth/login", &request).await?;
        self.token = Some(response.token.clone());
        Ok(response)
    }

    /// Get the account behind the current token
    pub async fn me(&self) -> ClientResult<User> {
        self.get("/api/auth/me").await
    }

    /// Request a password reset for `email`
    pub async fn forgot_password(&self, email: &str) -> ClientResult<MessageResponse> {
        let request = ForgotPasswordRequest {
            email: email.to_string(),
        };
        self.post("/api/auth/forgot-password", &request).await
    }

    /// Complete a password reset with the issued token
    pub async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> ClientResult<MessageResponse> {
        self.post("/api/auth/reset-password", request).await
    }

    // ========== Members API ==========

    pub async fn list_members(&self) -> ClientResult<Vec<Member>> {
        self.get("/api/members").await
    }

    pub async fn create_member(&self, member: &Member) -> ClientResult<Member> {
        self.post("/api/members", member).await
    }

    pub async fn update_member(
        &self,
        id: &str,
        changes: &UpdateMemberRequest,
    ) -> ClientResult<Member> {
        self.put_item("members", id, changes).await
    }

    pub async fn delete_member(&self, id: &str) -> ClientResult<MessageResponse> {
        self.delete_item("members", id).await
    }

    // ========== Communities API ==========

    pub async fn list_communities(&self) -> ClientResult<Vec<Community>> {
        self.get("/api/communities").await
    }

    pub async fn create_community(&self, community: &Community) -> ClientResult<Community> {
        self.post("/api/communities", community).await
    }

    pub async fn update_community(
        &self,
        id: &str,
        changes: &UpdateCommunityRequest,
    ) -> ClientResult<Community> {
        self.put_item("communities", id, changes).await
    }

    pub async fn delete_community(&self, id: &str) -> ClientResult<MessageResponse> {
        self.delete_item("communities", id).await
    }

    // ========== Events API ==========

    pub async fn list_events(&self) -> ClientResult<Vec<Event>> {
        self.get("/api/events").await
    }

    pub async fn create_event(&self, event: &Event) -> ClientResult<Event> {
        self.post("/api/events", event).await
    }

    pub async fn update_event(&self, id: &str, changes: &UpdateEventRequest) -> ClientResult<Event> {
        self.put_item("events", id, changes).await
    }

    pub async fn delete_event(&self, id: &str) -> ClientResult<MessageResponse> {
        self.delete_item("events", id).await
    }

    // ========== Attendance API ==========

    pub async fn list_attendance(&self) -> ClientResult<Vec<AttendanceRecord>> {
        self.get("/api/attendance").await
    }

    pub async fn create_attendance(
        &self,
        record: &AttendanceRecord,
    ) -> ClientResult<AttendanceRecord> {
        self.post("/api/attendance", record).await
    }

    // ========== Contributions API ==========

    pub async fn list_contributions(&self) -> ClientResult<Vec<Contribution>> {
        self.get("/api/contributions").await
    }

    pub async fn create_contribution(
        &self,
        contribution: &Contribution,
    ) -> ClientResult<Contribution> {
        self.post("/api/contributions", contribution).await
    }

    pub async fn update_contribution(
        &self,
        id: &str,
        changes: &UpdateContributionRequest,
    ) -> ClientResult<Contribution> {
        self.put_item("contributions", id, changes).await
    }

    // ========== Users API (admin) ==========

    pub async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.get("/api/users").await
    }

    pub async fn create_user(&self, request: &CreateUserRequest) -> ClientResult<User> {
        self.post("/api/users", request).await
    }

    pub async fn update_user(&self, id: i64, changes: &UpdateUserRequest) -> ClientResult<User> {
        self.put_item("users", &id.to_string(), changes).await
    }

    pub async fn delete_user(&self, id: i64) -> ClientResult<MessageResponse> {
        self.delete_item("users", &id.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> HttpClient {
        HttpClient::new(&ClientConfig::new(base_url)).unwrap()
    }

    #[test]
    fn test_ids_are_escaped_as_one_segment() {
        let client = client("http://127.0.0.1:3002");

        for (id, expected) in [
            ("M/7", "/api/members/M%2F7"),
            ("M?7", "/api/members/M%3F7"),
            ("M#7", "/api/members/M%237"),
            ("M%2F7", "/api/members/M%252F7"),
        ] {
            let url = client.endpoint(&["api", "members", id]);
            assert_eq!(url.path(), expected);
            assert!(url.query().is_none());
            assert!(url.fragment().is_none());
        }
    }

    #[test]
    fn test_routes_keep_base_path() {
        let client = client("http://example.org/shepherd/");
        assert_eq!(client.base_url(), "http://example.org/shepherd");
        assert_eq!(
            client.url("/api/members").as_str(),
            "http://example.org/shepherd/api/members"
        );
    }

    #[test]
    fn test_rejects_unusable_base() {
        assert!(matches!(
            HttpClient::new(&ClientConfig::new("not a url")),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpClient::new(&ClientConfig::new("mailto:pastor@example.org")),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}

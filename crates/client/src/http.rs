//! Authenticated HTTP client.
//!
//! Every request goes through one choke point: the bearer header is attached
//! from the [`SessionStore`], and every response passes `handle_response`,
//! which enforces the cross-cutting 401 contract -- on the first 401 the
//! session is cleared and the optional `on_unauthorized` callback fires
//! exactly once; concurrent or subsequent 401s only map to
//! [`ClientError::Unauthorized`] without firing again.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::ClientError;
use crate::session::{Session, SessionStore};
use crate::types::{
    LoginResponse, MonthlyPointsEnvelope, MonthlySetting, MonthlySettingEnvelope, Notification,
    NotificationsEnvelope, ProfileEnvelope, ReviewRequest, SaveMonthlySettings, SubmitTaskRequest,
    Submission, SubmissionEnvelope, SubmissionsEnvelope, Task, TaskEnvelope, TasksEnvelope,
    UnreadCountEnvelope, UserProfile,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

type UnauthorizedCallback = Box<dyn Fn() + Send + Sync>;

/// Typed client for the task & points API.
///
/// Cheap to clone via the inner `Arc`s; all clones share the same session
/// and fire the same unauthorized callback.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
    on_unauthorized: Option<Arc<UnauthorizedCallback>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Arc<SessionStore>) -> Self {
        Self::with_timeout(base_url, session, DEFAULT_TIMEOUT)
    }

    /// Construct with an explicit request timeout.
    ///
    /// Panics if the underlying HTTP client cannot be built (no TLS backend);
    /// a client without its transport timeout must never be handed out.
    pub fn with_timeout(
        base_url: impl Into<String>,
        session: Arc<SessionStore>,
        timeout: Duration,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to construct HTTP client");
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            on_unauthorized: None,
        }
    }

    /// Register a hook invoked once when a 401 invalidates the session,
    /// typically to redirect to the login screen.
    pub fn on_unauthorized(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_unauthorized = Some(Arc::new(Box::new(callback)));
        self
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method, self.url(path));
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// The single status-mapping path every response goes through.
    ///
    /// Returns the response only on 2xx. A 401 clears the session; only the
    /// call that actually removes it fires the `on_unauthorized` hook. Other
    /// non-2xx statuses surface the body's `error` field verbatim.
    async fn check_status(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ClientError> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            if self.session.clear() {
                tracing::info!("Session invalidated by server, resetting auth state");
                if let Some(callback) = &self.on_unauthorized {
                    callback();
                }
            }
            return Err(ClientError::Unauthorized);
        }

        if !status.is_success() {
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| {
                    body.get("error")
                        .and_then(|e| e.as_str())
                        .map(str::to_string)
                })
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    /// Map a response to a typed value via [`check_status`](Self::check_status).
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = self.check_status(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Like [`handle_response`](Self::handle_response) for endpoints whose
    /// success body carries nothing the caller needs (e.g. 204).
    async fn handle_empty(&self, response: reqwest::Response) -> Result<(), ClientError> {
        self.check_status(response).await?;
        Ok(())
    }

    // -- auth ---------------------------------------------------------------

    /// Authenticate and install the resulting session. `username` also
    /// accepts an email address.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserProfile, ClientError> {
        let response = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;
        let body: LoginResponse = self.handle_response(response).await?;
        self.session.set(Session {
            token: body.access_token,
            user: body.user.clone(),
        });
        Ok(body.user)
    }

    /// Tell the server goodbye and drop the session. The local session is
    /// cleared even if the server call fails.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let result = self.request(reqwest::Method::POST, "/api/auth/logout").send().await;
        self.session.clear();
        match result {
            Ok(response) => self.handle_empty(response).await.or_else(|e| match e {
                // The session is gone either way.
                ClientError::Unauthorized => Ok(()),
                other => Err(other),
            }),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn profile(&self) -> Result<UserProfile, ClientError> {
        let response = self.request(reqwest::Method::GET, "/api/auth/profile").send().await?;
        let body: ProfileEnvelope = self.handle_response(response).await?;
        Ok(body.user)
    }

    // -- tasks --------------------------------------------------------------

    /// List tasks. The server scopes the result by role; `assigned_to_me`
    /// narrows a non-admin listing to the caller's claimed tasks.
    pub async fn list_tasks(&self, assigned_to_me: bool) -> Result<Vec<Task>, ClientError> {
        let path = if assigned_to_me {
            "/api/tasks?assigned_to_me=true"
        } else {
            "/api/tasks"
        };
        let response = self.request(reqwest::Method::GET, path).send().await?;
        let body: TasksEnvelope = self.handle_response(response).await?;
        Ok(body.tasks)
    }

    pub async fn get_task(&self, id: i64) -> Result<Task, ClientError> {
        let response = self
            .request(reqwest::Method::GET, &format!("/api/tasks/{id}"))
            .send()
            .await?;
        let body: TaskEnvelope = self.handle_response(response).await?;
        Ok(body.task)
    }

    /// Claim an open task for the current user.
    pub async fn assign_task(&self, id: i64) -> Result<Task, ClientError> {
        let response = self
            .request(reqwest::Method::POST, &format!("/api/tasks/{id}/assign"))
            .send()
            .await?;
        let body: TaskEnvelope = self.handle_response(response).await?;
        Ok(body.task)
    }

    pub async fn submit_task(
        &self,
        id: i64,
        submission: &SubmitTaskRequest,
    ) -> Result<Submission, ClientError> {
        let response = self
            .request(reqwest::Method::POST, &format!("/api/tasks/{id}/submit"))
            .json(submission)
            .send()
            .await?;
        let body: SubmissionEnvelope = self.handle_response(response).await?;
        Ok(body.submission)
    }

    // -- submissions --------------------------------------------------------

    pub async fn list_submissions(
        &self,
        status: Option<&str>,
    ) -> Result<Vec<Submission>, ClientError> {
        let path = match status {
            Some(s) => format!("/api/submissions?status={s}"),
            None => "/api/submissions".to_string(),
        };
        let response = self.request(reqwest::Method::GET, &path).send().await?;
        let body: SubmissionsEnvelope = self.handle_response(response).await?;
        Ok(body.submissions)
    }

    pub async fn my_submissions(&self) -> Result<Vec<Submission>, ClientError> {
        let response = self
            .request(reqwest::Method::GET, "/api/submissions/my")
            .send()
            .await?;
        let body: SubmissionsEnvelope = self.handle_response(response).await?;
        Ok(body.submissions)
    }

    pub async fn review_submission(
        &self,
        id: i64,
        review: &ReviewRequest,
    ) -> Result<Submission, ClientError> {
        let response = self
            .request(reqwest::Method::POST, &format!("/api/submissions/{id}/review"))
            .json(review)
            .send()
            .await?;
        let body: SubmissionEnvelope = self.handle_response(response).await?;
        Ok(body.submission)
    }

    // -- monthly settings & points ------------------------------------------

    /// Fetch the persisted setting for a period, `None` if never saved.
    pub async fn monthly_settings(
        &self,
        year: i32,
        month: u32,
    ) -> Result<Option<MonthlySetting>, ClientError> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/api/monthly/settings?year={year}&month={month}"),
            )
            .send()
            .await?;
        let body: MonthlySettingEnvelope = self.handle_response(response).await?;
        Ok(body.monthly_setting)
    }

    pub async fn save_monthly_settings(
        &self,
        input: &SaveMonthlySettings,
    ) -> Result<MonthlySetting, ClientError> {
        let response = self
            .request(reqwest::Method::POST, "/api/monthly/settings")
            .json(input)
            .send()
            .await?;
        #[derive(serde::Deserialize)]
        struct Envelope {
            monthly_setting: MonthlySetting,
        }
        let body: Envelope = self.handle_response(response).await?;
        Ok(body.monthly_setting)
    }

    /// Total earned points across users for a period.
    pub async fn monthly_total_points(&self, year: i32, month: u32) -> Result<i64, ClientError> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/api/points/monthly?year={year}&month={month}"),
            )
            .send()
            .await?;
        let body: MonthlyPointsEnvelope = self.handle_response(response).await?;
        Ok(body.total_points)
    }

    // -- notifications ------------------------------------------------------

    pub async fn notifications(&self, limit: Option<u32>) -> Result<Vec<Notification>, ClientError> {
        let path = match limit {
            Some(n) => format!("/api/notifications?limit={n}"),
            None => "/api/notifications".to_string(),
        };
        let response = self.request(reqwest::Method::GET, &path).send().await?;
        let body: NotificationsEnvelope = self.handle_response(response).await?;
        Ok(body.notifications)
    }

    pub async fn unread_count(&self) -> Result<i64, ClientError> {
        let response = self
            .request(reqwest::Method::GET, "/api/notifications/count")
            .send()
            .await?;
        let body: UnreadCountEnvelope = self.handle_response(response).await?;
        Ok(body.unread_count)
    }

    pub async fn mark_notification_read(&self, id: i64) -> Result<(), ClientError> {
        let response = self
            .request(reqwest::Method::POST, &format!("/api/notifications/{id}/read"))
            .send()
            .await?;
        self.handle_empty(response).await
    }

    pub async fn mark_all_notifications_read(&self) -> Result<(), ClientError> {
        let response = self
            .request(reqwest::Method::POST, "/api/notifications/read-all")
            .send()
            .await?;
        self.handle_empty(response).await
    }
}

//! REST client for the snapshot server.
//!
//! Implements [`SnapshotStore`] and [`IdentityProvider`] over HTTP with
//! `reqwest`, which runs natively and in the browser. Requests carry the
//! session token as a bearer credential; the server scopes every call to
//! that session's user.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures become [`StoreError::Unreachable`], non-success
//! statuses go through [`status_error`], and undecodable bodies become
//! [`StoreError::Decode`]. A `401` from `/api/auth/me` is not an error: it
//! means the session is anonymous.

#[cfg(test)]
#[path = "rest_test.rs"]
mod rest_test;

use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::persist::{
    BoardSnapshot, CurrentUser, IdentityProvider, NewSnapshot, OwnerId, SnapshotId, SnapshotStore, StoreError,
};
use crate::scene::Scene;

fn me_endpoint(base: &str) -> String {
    format!("{base}/api/auth/me")
}

fn boards_endpoint(base: &str) -> String {
    format!("{base}/api/tactical-boards")
}

fn board_endpoint(base: &str, id: SnapshotId) -> String {
    format!("{base}/api/tactical-boards/{id}")
}

fn owner_query(owner_id: OwnerId) -> [(&'static str, String); 1] {
    [("owner_id", owner_id.to_string())]
}

/// Map a non-success HTTP status to a store error.
fn status_error(status: u16) -> StoreError {
    match status {
        401 => StoreError::Unauthorized,
        status => StoreError::Rejected { status },
    }
}

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    id: SnapshotId,
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    scene: &'a Scene,
}

/// HTTP client for one server and one session.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl RestClient {
    /// `base_url` is the server origin without a trailing slash, e.g.
    /// `https://board.example.com`; pass `""` for same-origin requests in the
    /// browser.
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { http: Client::new(), base_url, token }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Unreachable(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), url = %response.url(), "request rejected");
            return Err(status_error(status.as_u16()));
        }
        Ok(response)
    }
}

#[async_trait::async_trait(?Send)]
impl SnapshotStore for RestClient {
    async fn list(&self, owner_id: OwnerId) -> Result<Vec<BoardSnapshot>, StoreError> {
        let request = self
            .http
            .get(boards_endpoint(&self.base_url))
            .query(&owner_query(owner_id));
        let response = self.send(request).await?;
        response
            .json::<Vec<BoardSnapshot>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn insert(&self, snapshot: NewSnapshot) -> Result<SnapshotId, StoreError> {
        let request = self.http.post(boards_endpoint(&self.base_url)).json(&snapshot);
        let response = self.send(request).await?;
        let body: CreatedResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(body.id)
    }

    /// The owner is implied by the session token; the server rejects
    /// updates to snapshots the session does not own.
    async fn update(&self, _owner_id: OwnerId, id: SnapshotId, scene: &Scene) -> Result<(), StoreError> {
        let request = self
            .http
            .patch(board_endpoint(&self.base_url, id))
            .json(&UpdateRequest { scene });
        self.send(request).await?;
        Ok(())
    }
}

#[async_trait::async_trait(?Send)]
impl IdentityProvider for RestClient {
    async fn current_user(&self) -> Result<Option<CurrentUser>, StoreError> {
        let request = self.http.get(me_endpoint(&self.base_url));
        let response = match self.send(request).await {
            Ok(response) => response,
            Err(StoreError::Unauthorized) => return Ok(None),
            Err(e) => return Err(e),
        };
        let user: CurrentUser = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(Some(user))
    }
}

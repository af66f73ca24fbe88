//! HTTP client for the HackMD REST API v1.
//!
//! Routes:
//! - `GET    /teams`
//! - `POST   /notes`                        create personal note
//! - `POST   /teams/{path}/notes`           create team note
//! - `PATCH  /notes/{id}`                   replace content
//! - `PATCH  /teams/{path}/notes/{id}`
//! - `DELETE /notes/{id}`
//! - `DELETE /teams/{path}/notes/{id}`
//!
//! Failures map onto `RemoteError` and surface to the user verbatim; there
//! are no retries.

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::Serialize;
use tracing::debug;
use url::Url;

use share_core::remote::{CreatedNote, NotePayload, RemoteError, RemoteNotes, Result, Team};

use crate::config::ApiConfig;

pub struct HackmdClient {
    http: reqwest::Client,
    endpoint: Url,
    token: String,
}

impl HackmdClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let endpoint = parse_endpoint(&config.endpoint)?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| RemoteError::Transport(err.to_string()))?;
        Ok(Self {
            http,
            endpoint,
            token: config.token.clone(),
        })
    }

    /// Endpoint URL with extra path segments appended. Segments are pushed
    /// through the URL parser so ids and team slugs are escaped properly.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.endpoint.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| RemoteError::Transport("endpoint cannot carry paths".to_string()))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Response> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|err| RemoteError::Transport(err.to_string()))?;
        check_status(response).await
    }
}

/// Body of a content-replacing PATCH.
#[derive(Debug, Serialize)]
struct UpdateContent<'a> {
    content: &'a str,
}

#[async_trait]
impl RemoteNotes for HackmdClient {
    async fn create_note(&self, payload: &NotePayload) -> Result<CreatedNote> {
        let url = self.url(&["notes"])?;
        debug!(%url, title = %payload.title, "creating personal note");
        let response = self.execute(self.http.post(url).json(payload)).await?;
        parse_created(response).await
    }

    async fn create_team_note(
        &self,
        team_path: &str,
        payload: &NotePayload,
    ) -> Result<CreatedNote> {
        let url = self.url(&["teams", team_path, "notes"])?;
        debug!(%url, title = %payload.title, "creating team note");
        let response = self.execute(self.http.post(url).json(payload)).await?;
        parse_created(response).await
    }

    async fn update_note_content(&self, note_id: &str, content: &str) -> Result<()> {
        let url = self.url(&["notes", note_id])?;
        debug!(%url, "updating personal note");
        self.execute(self.http.patch(url).json(&UpdateContent { content }))
            .await?;
        Ok(())
    }

    async fn update_team_note_content(
        &self,
        team_path: &str,
        note_id: &str,
        content: &str,
    ) -> Result<()> {
        let url = self.url(&["teams", team_path, "notes", note_id])?;
        debug!(%url, "updating team note");
        self.execute(self.http.patch(url).json(&UpdateContent { content }))
            .await?;
        Ok(())
    }

    async fn delete_note(&self, note_id: &str) -> Result<()> {
        let url = self.url(&["notes", note_id])?;
        debug!(%url, "deleting personal note");
        self.execute(self.http.delete(url)).await?;
        Ok(())
    }

    async fn delete_team_note(&self, team_path: &str, note_id: &str) -> Result<()> {
        let url = self.url(&["teams", team_path, "notes", note_id])?;
        debug!(%url, "deleting team note");
        self.execute(self.http.delete(url)).await?;
        Ok(())
    }

    async fn teams(&self) -> Result<Vec<Team>> {
        let url = self.url(&["teams"])?;
        debug!(%url, "fetching team list");
        let response = self.execute(self.http.get(url)).await?;
        response
            .json()
            .await
            .map_err(|err| RemoteError::InvalidResponse(err.to_string()))
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint)
        .map_err(|err| RemoteError::Transport(format!("invalid endpoint {endpoint}: {err}")))?;
    if url.cannot_be_a_base() {
        return Err(RemoteError::Transport(format!(
            "endpoint is not a base URL: {endpoint}"
        )));
    }
    Ok(url)
}

async fn parse_created(response: Response) -> Result<CreatedNote> {
    response
        .json()
        .await
        .map_err(|err| RemoteError::InvalidResponse(err.to_string()))
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(status_error(status, message))
}

fn status_error(status: StatusCode, message: String) -> RemoteError {
    match status.as_u16() {
        401 | 403 => RemoteError::Unauthorized(message),
        404 => RemoteError::NotFound(message),
        status => RemoteError::Service { status, message },
    }
}

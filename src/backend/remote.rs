//! Hosted backend: a PostgREST-style `tasks` table over HTTP.
//!
//! The server owns ids, timestamps, and the per-owner access policy; this
//! client only shapes requests and maps HTTP failures onto the error
//! taxonomy. Mutations ask for `return=representation` so a zero-row result
//! (target already gone) is distinguishable from success.
//!
//! There is no automatic retry: the user re-triggers the action.

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::task::{Task, TaskDraft};

use super::TaskBackend;

const TABLE: &str = "tasks";

pub struct RemoteBackend {
    base_url: String,
    api_key: String,
    token: Option<String>,
}

impl RemoteBackend {
    pub fn new(base_url: String, api_key: String, token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            token,
        }
    }

    fn table_url(&self) -> String {
        format!("{}/{}", self.base_url, TABLE)
    }

    fn bearer(&self) -> String {
        let token = self.token.as_deref().unwrap_or(&self.api_key);
        format!("Bearer {token}")
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        ureq::request(method, url)
            .set("apikey", &self.api_key)
            .set("Authorization", &self.bearer())
            .set("Content-Type", "application/json")
    }

    fn send(&self, request: ureq::Request, body: Option<&Value>) -> Result<Value> {
        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };
        let response = result.map_err(map_http_error)?;
        let value: Value = response
            .into_json()
            .map_err(|err| Error::Connection(format!("malformed response: {err}")))?;
        Ok(value)
    }

    /// Run a mutation and require at least one affected row.
    fn send_expecting_row(&self, request: ureq::Request, body: Option<&Value>, id: &str) -> Result<Value> {
        let value = self.send(request, body)?;
        match value.as_array().and_then(|rows| rows.first()) {
            Some(row) => Ok(row.clone()),
            None => Err(Error::NotFound(id.to_string())),
        }
    }
}

impl TaskBackend for RemoteBackend {
    fn load_all(&self, owner: &str) -> Result<Vec<Task>> {
        let url = format!(
            "{}?user_id=eq.{owner}&order=created_at.desc",
            self.table_url()
        );
        debug!(owner, "loading tasks from remote backend");
        let value = self.send(self.request("GET", &url), None)?;
        let tasks: Vec<Task> = serde_json::from_value(value)?;
        Ok(tasks)
    }

    fn create(&self, draft: &TaskDraft, owner: &str) -> Result<Task> {
        let body = serde_json::json!({
            "title": draft.title,
            "description": draft.description,
            "completed": false,
            "priority": draft.priority,
            "due_date": draft.due_date,
            "user_id": owner,
        });
        let request = self
            .request("POST", &self.table_url())
            .set("Prefer", "return=representation");
        let row = self.send_expecting_row(request, Some(&body), "<new>")?;
        let task: Task = serde_json::from_value(row)?;
        Ok(task)
    }

    fn update_completed(&self, id: &str, completed: bool) -> Result<()> {
        let url = format!("{}?id=eq.{id}", self.table_url());
        let body = serde_json::json!({ "completed": completed });
        let request = self
            .request("PATCH", &url)
            .set("Prefer", "return=representation");
        self.send_expecting_row(request, Some(&body), id)?;
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<()> {
        let url = format!("{}?id=eq.{id}", self.table_url());
        let request = self
            .request("DELETE", &url)
            .set("Prefer", "return=representation");
        self.send_expecting_row(request, None, id)?;
        Ok(())
    }
}

fn map_http_error(err: ureq::Error) -> Error {
    match err {
        ureq::Error::Status(401, _) | ureq::Error::Status(403, _) => {
            Error::Auth("backend rejected credentials".to_string())
        }
        ureq::Error::Status(404, response) => {
            Error::NotFound(response.get_url().to_string())
        }
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            Error::Connection(format!("HTTP {code}: {}", body.trim()))
        }
        ureq::Error::Transport(transport) => Error::Connection(transport.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let backend = RemoteBackend::new(
            "https://example.test/rest/v1/".to_string(),
            "anon".to_string(),
            None,
        );
        assert_eq!(backend.table_url(), "https://example.test/rest/v1/tasks");
    }

    #[test]
    fn bearer_falls_back_to_api_key() {
        let anon = RemoteBackend::new("https://e".to_string(), "anon".to_string(), None);
        assert_eq!(anon.bearer(), "Bearer anon");

        let signed = RemoteBackend::new(
            "https://e".to_string(),
            "anon".to_string(),
            Some("jwt".to_string()),
        );
        assert_eq!(signed.bearer(), "Bearer jwt");
    }
}

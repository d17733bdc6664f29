use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use rc_core::ports::{KeyValueStorePort, StoreError, StoredEntry};

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct GetRequest<'a> {
    keys: &'a [&'a str],
}

#[derive(Deserialize)]
struct GetResponse {
    #[serde(default)]
    keys: Vec<StoredEntry>,
}

#[derive(Serialize)]
struct SetRequest<'a> {
    key: &'a str,
    value: &'a str,
}

/// Remote key-value store reached over JSON-over-HTTP.
///
/// `POST {base}/storage.get` with `{"keys": [...]}` answers
/// `{"keys": [{"key": .., "value": ..}]}`; `POST {base}/storage.set` takes
/// `{"key": .., "value": ..}`.
pub struct HttpKeyValueStore {
    client: Client,
    base_url: String,
}

impl HttpKeyValueStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Transport(format!("build http client failed: {}", e)))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }
}

#[async_trait]
impl KeyValueStorePort for HttpKeyValueStore {
    async fn get(&self, keys: &[&str]) -> Result<Vec<StoredEntry>, StoreError> {
        let response = self
            .client
            .post(self.endpoint("storage.get"))
            .json(&GetRequest { keys })
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "storage.get rejected");
            return Err(map_status_code(status));
        }

        let body: GetResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Corrupt(format!("decode storage.get response: {}", e)))?;
        debug!(count = body.keys.len(), "storage.get answered");
        Ok(body.keys)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .post(self.endpoint("storage.set"))
            .json(&SetRequest { key, value })
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, key, "storage.set rejected");
            return Err(map_status_code(status));
        }
        Ok(())
    }
}

fn map_reqwest_error(error: reqwest::Error) -> StoreError {
    if error.is_timeout() {
        StoreError::Transport("request timed out".to_string())
    } else if let Some(status) = error.status() {
        map_status_code(status)
    } else {
        StoreError::Transport(error.to_string())
    }
}

fn map_status_code(code: StatusCode) -> StoreError {
    StoreError::Transport(format!("unexpected status: {}", code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn build_store(url: String) -> HttpKeyValueStore {
        HttpKeyValueStore::new(url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn get_posts_keys_and_decodes_entries() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/storage.get")
            .match_body(Matcher::Json(
                serde_json::json!({"keys": ["state", "viewStatus"]}),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"keys":[{"key":"state","value":"{\"rollsCount\":2}"},{"key":"viewStatus","value":""}]}"#,
            )
            .create_async()
            .await;

        let store = build_store(format!("{}/", server.url()));
        let entries = store.get(&["state", "viewStatus"]).await.unwrap();

        mock.assert_async().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text(), Some(r#"{"rollsCount":2}"#));
        assert_eq!(entries[1].text(), None);
    }

    #[tokio::test]
    async fn set_posts_key_and_value() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/storage.set")
            .match_body(Matcher::Json(
                serde_json::json!({"key": "viewStatus", "value": "{\"hasSeenIntro\":true}"}),
            ))
            .with_status(200)
            .create_async()
            .await;

        let store = build_store(server.url());
        store
            .set("viewStatus", r#"{"hasSeenIntro":true}"#)
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_maps_to_transport() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/storage.set")
            .with_status(503)
            .create_async()
            .await;

        let err = build_store(server.url())
            .set("state", "{}")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Transport(_)));
    }

    #[tokio::test]
    async fn forbidden_maps_to_transport_with_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/storage.get")
            .with_status(403)
            .create_async()
            .await;

        let err = build_store(server.url())
            .get(&["state"])
            .await
            .unwrap_err();
        match err {
            StoreError::Transport(message) => assert!(message.contains("403"), "{message}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_response_is_corrupt() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/storage.get")
            .with_status(200)
            .with_body("<html>")
            .create_async()
            .await;

        let err = build_store(server.url())
            .get(&["state"])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }
}

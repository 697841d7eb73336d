//! HTTP client for the dial-plan REST backend
//!
//! Every request carries the bearer token and the tenant header configured in
//! `ApiConfig`. Bodies are plain JSON. There are no retries: a failed call is
//! reported once and left to the caller.

use crate::api::DialplanApi;
use crate::config::ApiConfig;
use crate::dialplan::types::{
    decode_node_types, Capabilities, ConnectionUpdate, ContextUpdate, DialplanConnection,
    DialplanContext, DialplanNode, DialplanProject, GeneratedDialplan, Id, NewConnection,
    NewContext, NewNode, NewProject, NodeType, NodeUpdate, ProjectDetails, ProjectUpdate,
    ValidationResult,
};
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

/// reqwest-backed `DialplanApi`
///
/// Every request goes through one `reqwest::Client` whose default headers carry
/// the bearer token and the tenant id. Non-2xx answers become `ApiError::Status`
/// with the backend's own message when it sent one.
#[derive(Debug, Clone)]
pub struct HttpDialplanApi {
    /// Base URL without trailing slash
    /// Format: "https://pbx.example.com/api" - paths are appended verbatim
    base_url: String,

    /// Shared connection pool with auth and tenant headers as defaults
    http_client: reqwest::Client,
}

impl HttpDialplanApi {
    /// Build a client with auth and tenant headers baked in as defaults
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ApiError::Header(AUTHORIZATION.as_str().to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        if let Some(tenant_id) = &config.tenant_id {
            let name = HeaderName::from_bytes(config.tenant_header.as_bytes())
                .map_err(|_| ApiError::Header(config.tenant_header.clone()))?;
            let value = HeaderValue::from_str(tenant_id)
                .map_err(|_| ApiError::Header(config.tenant_header.clone()))?;
            headers.insert(name, value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build().map_err(|e| ApiError::Transport {
            url: config.base_url.clone(),
            source: e,
        })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and return the raw body of a successful response
    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<String, ApiError> {
        let url = self.url(path);
        tracing::debug!("➡️ {} {}", method, url);

        let mut request = self.http_client.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| ApiError::Transport {
            url: url.clone(),
            source: e,
        })?;
        let status = response.status();
        let text = response.text().await.map_err(|e| ApiError::Transport {
            url: url.clone(),
            source: e,
        })?;

        if status.is_success() {
            tracing::debug!("⬅️ {} {} -> {}", method, url, status);
            Ok(text)
        } else {
            tracing::warn!("❌ {} {} -> {}", method, url, status);
            Err(ApiError::Status {
                url,
                status: status.as_u16(),
                message: error_message(&text, status.canonical_reason()),
            })
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let text = self.send(Method::GET, path, None).await?;
        decode(&self.url(path), &text)
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Decode {
            url: self.url(path),
            source: e,
        })?;
        let text = self.send(method, path, Some(body)).await?;
        decode(&self.url(path), &text)
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(Method::DELETE, path, None).await.map(|_| ())
    }
}

fn decode<T: DeserializeOwned>(url: &str, text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| ApiError::Decode {
        url: url.to_string(),
        source: e,
    })
}

/// Pull a readable message out of an error body
fn error_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error", "detail"] {
            if let Some(message) = value.get(key).and_then(|m| m.as_str()) {
                return message.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        reason.unwrap_or("Unknown error").to_string()
    } else {
        trimmed.to_string()
    }
}

/// The generator answers with either `{"dialplan": "..."}` or the raw text
fn extract_dialplan(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(text)) => text,
        Ok(Value::Object(map)) => ["dialplan", "content", "config"]
            .into_iter()
            .find_map(|key| map.get(key).and_then(|v| v.as_str()).map(str::to_string))
            .unwrap_or_else(|| body.to_string()),
        _ => body.to_string(),
    }
}

#[async_trait]
impl DialplanApi for HttpDialplanApi {
    async fn get_projects(&self) -> Result<Vec<DialplanProject>, ApiError> {
        self.get_json("/dialplan/projects").await
    }

    async fn get_project_details(&self, id: &Id) -> Result<ProjectDetails, ApiError> {
        self.get_json(&format!("/dialplan/projects/{}", id)).await
    }

    async fn create_project(&self, data: &NewProject) -> Result<DialplanProject, ApiError> {
        self.send_json(Method::POST, "/dialplan/projects", data).await
    }

    async fn update_project(&self, id: &Id, data: &ProjectUpdate) -> Result<DialplanProject, ApiError> {
        self.send_json(Method::PUT, &format!("/dialplan/projects/{}", id), data).await
    }

    async fn delete_project(&self, id: &Id) -> Result<(), ApiError> {
        self.delete(&format!("/dialplan/projects/{}", id)).await
    }

    async fn clone_project(&self, id: &Id, new_name: &str) -> Result<DialplanProject, ApiError> {
        self.send_json(
            Method::POST,
            &format!("/dialplan/projects/{}/clone", id),
            &json!({ "name": new_name }),
        )
        .await
    }

    async fn deploy_project(&self, id: &Id) -> Result<DialplanProject, ApiError> {
        self.send_json(Method::POST, &format!("/dialplan/projects/{}/deploy", id), &json!({}))
            .await
    }

    async fn get_contexts_for_project(&self, project_id: &Id) -> Result<Vec<DialplanContext>, ApiError> {
        self.get_json(&format!("/dialplan/projects/{}/contexts", project_id)).await
    }

    async fn create_context(&self, project_id: &Id, data: &NewContext) -> Result<DialplanContext, ApiError> {
        self.send_json(Method::POST, &format!("/dialplan/projects/{}/contexts", project_id), data)
            .await
    }

    async fn update_context(&self, id: &Id, data: &ContextUpdate) -> Result<DialplanContext, ApiError> {
        self.send_json(Method::PUT, &format!("/dialplan/contexts/{}", id), data).await
    }

    async fn delete_context(&self, id: &Id) -> Result<(), ApiError> {
        self.delete(&format!("/dialplan/contexts/{}", id)).await
    }

    async fn get_nodes_for_context(&self, context_id: &Id) -> Result<Vec<DialplanNode>, ApiError> {
        self.get_json(&format!("/dialplan/contexts/{}/nodes", context_id)).await
    }

    async fn get_node(&self, id: &Id) -> Result<DialplanNode, ApiError> {
        self.get_json(&format!("/dialplan/nodes/{}", id)).await
    }

    async fn create_node(&self, context_id: &Id, data: &NewNode) -> Result<DialplanNode, ApiError> {
        self.send_json(Method::POST, &format!("/dialplan/contexts/{}/nodes", context_id), data)
            .await
    }

    async fn update_node(&self, id: &Id, data: &NodeUpdate) -> Result<DialplanNode, ApiError> {
        self.send_json(Method::PUT, &format!("/dialplan/nodes/{}", id), data).await
    }

    async fn delete_node(&self, id: &Id) -> Result<(), ApiError> {
        self.delete(&format!("/dialplan/nodes/{}", id)).await
    }

    async fn get_connections_for_context(&self, context_id: &Id) -> Result<Vec<DialplanConnection>, ApiError> {
        self.get_json(&format!("/dialplan/contexts/{}/connections", context_id)).await
    }

    async fn create_connection(&self, data: &NewConnection) -> Result<DialplanConnection, ApiError> {
        self.send_json(
            Method::POST,
            &format!("/dialplan/contexts/{}/connections", data.context_id),
            data,
        )
        .await
    }

    async fn update_connection(&self, id: &Id, data: &ConnectionUpdate) -> Result<DialplanConnection, ApiError> {
        self.send_json(Method::PUT, &format!("/dialplan/connections/{}", id), data).await
    }

    async fn delete_connection(&self, id: &Id) -> Result<(), ApiError> {
        self.delete(&format!("/dialplan/connections/{}", id)).await
    }

    async fn get_node_types(&self) -> Result<Vec<NodeType>, ApiError> {
        let raw: Vec<Value> = self.get_json("/dialplan/node-types").await?;
        Ok(decode_node_types(raw))
    }

    async fn validate_project(&self, id: &Id) -> Result<ValidationResult, ApiError> {
        self.get_json(&format!("/dialplan/projects/{}/validate", id)).await
    }

    async fn generate_dialplan(&self, id: &Id) -> Result<GeneratedDialplan, ApiError> {
        let body = self
            .send(Method::GET, &format!("/dialplan/projects/{}/generate", id), None)
            .await?;
        Ok(GeneratedDialplan {
            project_id: id.clone(),
            content: extract_dialplan(&body),
        })
    }

    async fn check_dialplan_capabilities(&self) -> Result<Capabilities, ApiError> {
        self.get_json("/system/dialplan-capabilities").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_json_fields() {
        assert_eq!(error_message(r#"{"message":"Project not found"}"#, Some("Not Found")), "Project not found");
        assert_eq!(error_message(r#"{"error":"Forbidden tenant"}"#, None), "Forbidden tenant");
        assert_eq!(error_message("", Some("Bad Gateway")), "Bad Gateway");
        assert_eq!(error_message(" upstream timeout \n", None), "upstream timeout");
    }

    #[test]
    fn dialplan_body_shapes() {
        assert_eq!(extract_dialplan(r#"{"dialplan":"[default]\n"}"#), "[default]\n");
        assert_eq!(extract_dialplan(r#""[default]""#), "[default]");
        assert_eq!(extract_dialplan("[default]\nexten => 100,1,Answer()"), "[default]\nexten => 100,1,Answer()");
    }

    #[test]
    fn rejects_unprintable_tenant() {
        let config = ApiConfig::new("http://localhost").with_tenant("bad\ntenant");
        assert!(matches!(HttpDialplanApi::new(&config), Err(ApiError::Header(_))));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let api = HttpDialplanApi::new(&ApiConfig::new("http://localhost:8000/api/")).unwrap();
        assert_eq!(api.base_url(), "http://localhost:8000/api");
    }
}

//! `reqwest` implementation of [`PipelineApi`].

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use super::error::{ApiError, ApiResult};
use super::types::{
    ComponentList, CreatedModel, ExportArtifacts, GeneratedCode, ModelVersion, NewVersion,
    SavedModel, TemplateList, ValidationResponse,
};
use super::PipelineApi;
use crate::catalog::{Component, Template};
use crate::config::ApiSettings;
use crate::export::ExportFormat;
use crate::graph::PipelineDocument;

const API_PREFIX: &str = "/api";

/// JSON-over-HTTP client with a cookie jar for the session login.
#[derive(Debug, Clone)]
pub struct HttpApi {
    http: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(settings: &ApiSettings) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(settings.timeout())
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<String> {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method, &url)
            .header("Accept", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!("Request to {} failed: {}", url, e);
            ApiError::Network(e.to_string())
        })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let final_url = response.url().to_string();
        let text = response.text().await.map_err(ApiError::from)?;

        classify_response(status, content_type.as_deref(), &final_url, &text)?;
        Ok(text)
    }

    async fn json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<T> {
        let text = self.send(method, path, body).await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.json::<T, Value>(Method::GET, path, None).await
    }
}

/// Map a raw HTTP response onto the error taxonomy.
///
/// An HTML body means the session expired and the server redirected to its
/// login page, or something other than the API answered.
pub fn classify_response(
    status: u16,
    content_type: Option<&str>,
    url: &str,
    body: &str,
) -> ApiResult<()> {
    if content_type.is_some_and(|ct| ct.contains("text/html")) {
        if status == 401 || url.contains("/login") {
            return Err(ApiError::AuthRequired);
        }
        return Err(ApiError::UnexpectedHtml);
    }

    if (200..300).contains(&status) {
        return Ok(());
    }
    if status == 401 {
        return Err(ApiError::AuthRequired);
    }

    let message = match serde_json::from_str::<Value>(body) {
        Ok(value) => value
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("HTTP {status}")),
        Err(_) => format!("Request failed with status {status}"),
    };
    Err(ApiError::Server { status, message })
}

#[async_trait]
impl PipelineApi for HttpApi {
    async fn list_models(&self) -> ApiResult<Vec<SavedModel>> {
        self.get("/models").await
    }

    async fn get_model(&self, id: &str) -> ApiResult<SavedModel> {
        self.get(&format!("/models/{id}")).await
    }

    async fn create_model(&self, pipeline: &PipelineDocument) -> ApiResult<CreatedModel> {
        self.json(Method::POST, "/models", Some(pipeline)).await
    }

    async fn update_model(&self, id: &str, pipeline: &PipelineDocument) -> ApiResult<()> {
        self.send(Method::PUT, &format!("/models/{id}"), Some(pipeline))
            .await
            .map(|_| ())
    }

    async fn delete_model(&self, id: &str) -> ApiResult<()> {
        self.send::<Value>(Method::DELETE, &format!("/models/{id}"), None)
            .await
            .map(|_| ())
    }

    async fn templates(&self) -> ApiResult<Vec<Template>> {
        self.get::<TemplateList>("/templates")
            .await
            .map(|list| list.templates)
    }

    async fn components(&self) -> ApiResult<Vec<Component>> {
        self.get::<ComponentList>("/components")
            .await
            .map(|list| list.components)
    }

    async fn generate_code(&self, pipeline: &PipelineDocument) -> ApiResult<GeneratedCode> {
        self.json(Method::POST, "/generate-code", Some(pipeline)).await
    }

    async fn validate(&self, pipeline: &PipelineDocument) -> ApiResult<ValidationResponse> {
        let body = json!({ "nodes": pipeline.nodes, "edges": pipeline.edges });
        self.json(Method::POST, "/validate", Some(&body)).await
    }

    async fn create_version(&self, model_id: &str, version: &NewVersion) -> ApiResult<ModelVersion> {
        self.json(Method::POST, &format!("/models/{model_id}/versions"), Some(version))
            .await
    }

    async fn list_versions(&self, model_id: &str) -> ApiResult<Vec<ModelVersion>> {
        self.get(&format!("/models/{model_id}/versions")).await
    }

    async fn get_version(&self, version_id: &str) -> ApiResult<ModelVersion> {
        self.get(&format!("/versions/{version_id}")).await
    }

    async fn activate_version(&self, version_id: &str) -> ApiResult<()> {
        self.send::<Value>(Method::POST, &format!("/versions/{version_id}/activate"), None)
            .await
            .map(|_| ())
    }

    async fn delete_version(&self, version_id: &str) -> ApiResult<()> {
        self.send::<Value>(Method::DELETE, &format!("/versions/{version_id}"), None)
            .await
            .map(|_| ())
    }

    async fn compare_versions(&self, first: &str, second: &str) -> ApiResult<Value> {
        let body = json!({ "version1_id": first, "version2_id": second });
        self.json(Method::POST, "/versions/compare", Some(&body)).await
    }

    async fn export(&self, model_id: &str, format: ExportFormat) -> ApiResult<ExportArtifacts> {
        let Some(endpoint) = format.endpoint() else {
            return Err(ApiError::Client(format!(
                "{} export is produced locally",
                format.display_name()
            )));
        };
        let path = format!("/models/{model_id}/export/{endpoint}");
        match format {
            ExportFormat::Docker => {
                let body = json!({ "python_version": "3.10" });
                self.json(Method::POST, &path, Some(&body)).await
            }
            _ => self.json::<ExportArtifacts, Value>(Method::POST, &path, None).await,
        }
    }
}

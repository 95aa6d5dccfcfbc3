//! Backend REST API.
//!
//! The editor talks to the server only through [`PipelineApi`], so the GUI
//! worker and tests can swap the HTTP client for a mock.

mod error;
mod http;
mod types;

pub use error::{ApiError, ApiResult};
pub use http::{classify_response, HttpApi};
pub use types::{
    ComponentList, CreatedModel, ExportArtifacts, GeneratedCode, ModelVersion, NewVersion,
    SavedModel, TemplateList, ValidationResponse,
};

use async_trait::async_trait;
use serde_json::Value;

use crate::catalog::{Component, Template};
use crate::export::ExportFormat;
use crate::graph::PipelineDocument;

/// Every backend operation the editor uses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PipelineApi: Send + Sync {
    async fn list_models(&self) -> ApiResult<Vec<SavedModel>>;
    async fn get_model(&self, id: &str) -> ApiResult<SavedModel>;
    async fn create_model(&self, pipeline: &PipelineDocument) -> ApiResult<CreatedModel>;
    async fn update_model(&self, id: &str, pipeline: &PipelineDocument) -> ApiResult<()>;
    async fn delete_model(&self, id: &str) -> ApiResult<()>;

    async fn templates(&self) -> ApiResult<Vec<Template>>;
    async fn components(&self) -> ApiResult<Vec<Component>>;

    async fn generate_code(&self, pipeline: &PipelineDocument) -> ApiResult<GeneratedCode>;
    async fn validate(&self, pipeline: &PipelineDocument) -> ApiResult<ValidationResponse>;

    async fn create_version(&self, model_id: &str, version: &NewVersion) -> ApiResult<ModelVersion>;
    async fn list_versions(&self, model_id: &str) -> ApiResult<Vec<ModelVersion>>;
    async fn get_version(&self, version_id: &str) -> ApiResult<ModelVersion>;
    async fn activate_version(&self, version_id: &str) -> ApiResult<()>;
    async fn delete_version(&self, version_id: &str) -> ApiResult<()>;
    async fn compare_versions(&self, first: &str, second: &str) -> ApiResult<Value>;

    /// Server-side export of a saved model. JSON export never reaches here.
    async fn export(&self, model_id: &str, format: ExportFormat) -> ApiResult<ExportArtifacts>;
}

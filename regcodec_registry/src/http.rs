//! HTTP registry client
//!
//! Talks to a Confluent-compatible schema registry over its REST API.

use crate::client::SchemaRegistry;
use crate::context::RequestContext;
use crate::error::{RegistryError, Result};
use crate::schema::{RegisteredSchema, SchemaType};
use async_trait::async_trait;
use regcodec_config::RegistryConfig;
use regcodec_schema::TypeDescriptor;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Registry media type
pub const REGISTRY_CONTENT_TYPE: &str = "application/vnd.schemaregistry.v1+json";

/// Header carrying the caller's correlation id
pub const CORRELATION_HEADER: &str = "X-Correlation-Id";

// Registry error codes
const SUBJECT_NOT_FOUND: u32 = 40401;
const VERSION_NOT_FOUND: u32 = 40402;
const SCHEMA_NOT_FOUND: u32 = 40403;

#[derive(Serialize)]
struct RegisterRequest<'a> {
    schema: &'a str,
    #[serde(rename = "schemaType")]
    schema_type: SchemaType,
}

#[derive(Deserialize)]
struct RegisterResponse {
    id: u32,
}

#[derive(Deserialize)]
struct SchemaResponse {
    schema: String,
    #[serde(rename = "schemaType", default)]
    schema_type: SchemaType,
}

#[derive(Deserialize)]
struct SubjectVersionResponse {
    subject: String,
    version: u32,
    id: u32,
    schema: String,
    #[serde(rename = "schemaType", default)]
    schema_type: SchemaType,
}

#[derive(Deserialize)]
struct ErrorBody {
    error_code: u32,
    #[serde(default)]
    message: String,
}

/// What a request was about, used to build not-found errors
#[derive(Clone, Copy)]
enum Target<'a> {
    Subject(&'a str),
    Schema(u32),
    Registry,
}

/// HTTP schema registry client
#[derive(Debug, Clone)]
pub struct HttpRegistryClient {
    http: reqwest::Client,
    base: Url,
    config: RegistryConfig,
}

impl HttpRegistryClient {
    /// Create a client from validated configuration
    pub fn new(config: RegistryConfig) -> Result<Self> {
        config.validate()?;

        let base = Url::parse(config.base_url())
            .map_err(|e| RegistryError::InvalidConfig(format!("invalid registry url: {}", e)))?;
        if base.cannot_be_a_base() {
            return Err(RegistryError::InvalidConfig(format!(
                "registry url cannot be a base: {}",
                config.url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| RegistryError::InvalidConfig(e.to_string()))?;

        Ok(Self { http, base, config })
    }

    /// Client configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| RegistryError::InvalidConfig("registry url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, ctx: &RequestContext) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, url)
            .header(ACCEPT, format!("{}, application/json", REGISTRY_CONTENT_TYPE));

        if let Some(username) = &self.config.username {
            builder = builder.basic_auth(username, self.config.password.as_ref());
        }
        if let Some(id) = ctx.correlation_id() {
            builder = builder.header(CORRELATION_HEADER, id);
        }
        builder
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        target: Target<'_>,
        ctx: &RequestContext,
    ) -> Result<T> {
        ctx.run(async {
            let response = builder.send().await?;
            let status = response.status();

            if status.is_success() {
                return response
                    .json::<T>()
                    .await
                    .map_err(|e| RegistryError::InvalidResponse(e.to_string()));
            }

            let body = response.bytes().await.unwrap_or_default();
            let error = serde_json::from_slice::<ErrorBody>(&body).ok();
            Err(map_error(status, error, target))
        })
        .await
    }
}

fn map_error(status: StatusCode, body: Option<ErrorBody>, target: Target<'_>) -> RegistryError {
    let code = body.as_ref().map(|b| b.error_code);
    let message = body
        .map(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status.to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RegistryError::Unauthorized(message),
        StatusCode::NOT_FOUND => match (code, target) {
            (Some(SCHEMA_NOT_FOUND), Target::Schema(id)) | (None, Target::Schema(id)) => {
                RegistryError::SchemaNotFound(id)
            }
            (Some(SUBJECT_NOT_FOUND | VERSION_NOT_FOUND), Target::Subject(subject))
            | (None, Target::Subject(subject)) => {
                RegistryError::SubjectNotFound(subject.to_string())
            }
            _ => RegistryError::Server {
                status: status.as_u16(),
                message,
            },
        },
        StatusCode::CONFLICT => RegistryError::Incompatible {
            subject: match target {
                Target::Subject(subject) => subject.to_string(),
                _ => String::new(),
            },
            message,
        },
        StatusCode::UNPROCESSABLE_ENTITY => RegistryError::InvalidSchema(message),
        _ => RegistryError::Server {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl SchemaRegistry for HttpRegistryClient {
    async fn register(
        &self,
        subject: &str,
        descriptor: &TypeDescriptor,
        ctx: &RequestContext,
    ) -> Result<u32> {
        let schema = descriptor.to_proto();
        let url = self.endpoint(&["subjects", subject, "versions"])?;
        let builder = self
            .request(Method::POST, url, ctx)
            .header(CONTENT_TYPE, REGISTRY_CONTENT_TYPE)
            .json(&RegisterRequest {
                schema: &schema,
                schema_type: SchemaType::Protobuf,
            });

        let response: RegisterResponse = self.send(builder, Target::Subject(subject), ctx).await?;
        tracing::debug!(
            subject,
            schema_id = response.id,
            correlation_id = ctx.correlation_id(),
            "registered schema"
        );
        Ok(response.id)
    }

    async fn fetch_schema(&self, id: u32, ctx: &RequestContext) -> Result<RegisteredSchema> {
        let url = self.endpoint(&["schemas", "ids", &id.to_string()])?;
        let builder = self.request(Method::GET, url, ctx);
        let response: SchemaResponse = self.send(builder, Target::Schema(id), ctx).await?;
        tracing::debug!(schema_id = id, correlation_id = ctx.correlation_id(), "fetched schema");

        Ok(RegisteredSchema {
            id,
            subject: None,
            version: None,
            schema_type: response.schema_type,
            schema: response.schema,
        })
    }

    async fn delete_subject(&self, subject: &str, ctx: &RequestContext) -> Result<Vec<u32>> {
        let url = self.endpoint(&["subjects", subject])?;
        let builder = self.request(Method::DELETE, url.clone(), ctx);
        let versions: Vec<u32> = self.send(builder, Target::Subject(subject), ctx).await?;

        // The registry only accepts a permanent delete after a soft delete
        if self.config.permanent_delete {
            let mut permanent = url;
            permanent.query_pairs_mut().append_pair("permanent", "true");
            let builder = self.request(Method::DELETE, permanent, ctx);
            let _: Vec<u32> = self.send(builder, Target::Subject(subject), ctx).await?;
        }

        tracing::debug!(
            subject,
            versions = versions.len(),
            permanent = self.config.permanent_delete,
            correlation_id = ctx.correlation_id(),
            "deleted subject"
        );
        Ok(versions)
    }

    async fn latest_schema(&self, subject: &str, ctx: &RequestContext) -> Result<RegisteredSchema> {
        let url = self.endpoint(&["subjects", subject, "versions", "latest"])?;
        let builder = self.request(Method::GET, url, ctx);
        let response: SubjectVersionResponse =
            self.send(builder, Target::Subject(subject), ctx).await?;

        Ok(RegisteredSchema {
            id: response.id,
            subject: Some(response.subject),
            version: Some(response.version),
            schema_type: response.schema_type,
            schema: response.schema,
        })
    }

    async fn subjects(&self, ctx: &RequestContext) -> Result<Vec<String>> {
        let url = self.endpoint(&["subjects"])?;
        let builder = self.request(Method::GET, url, ctx);
        self.send(builder, Target::Registry, ctx).await
    }
}

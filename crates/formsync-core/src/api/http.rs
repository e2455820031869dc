//! reqwest-backed [`FormApi`] implementation.

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use super::FormApi;
use super::errors::ApiError;
use super::types::{ContainerPage, CreatedContainer, ListFilter, Mutation, NewContainer};
use crate::config::ApiConfig;
use crate::snapshots::{ContainerDetail, TimelineEntry};

/// Client for the form-container REST API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpFormApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

/// Method, path, query and body of a mutation request.
#[derive(Debug, PartialEq)]
pub(crate) struct MutationRoute {
    pub method: Method,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub body: serde_json::Value,
}

impl HttpFormApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = config.base_url().trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url).map_err(|e| ApiError::InvalidBaseUrl {
            url: base_url.clone(),
            message: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url,
                message: "URL cannot carry a path".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::Request {
                url: base_url.clone(),
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Base URL extended by `segments`, each percent-encoded as one path
    /// segment.
    fn segment_url(&self, segments: &[&str]) -> Result<String, ApiError> {
        let invalid = |message: String| ApiError::InvalidBaseUrl {
            url: self.base_url.clone(),
            message,
        };
        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url.to_string())
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(
        &self,
        builder: RequestBuilder,
        url: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(url, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(
            event = "core.api.request_rejected",
            url = url,
            status = status.as_u16(),
        );
        Err(ApiError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            message: error_message(&body),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: String,
        query: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        debug!(event = "core.api.get_started", url = %url);

        let response = self
            .send(self.request(Method::GET, &url).query(query), &url)
            .await?;
        decode(response, &url).await
    }
}

async fn decode<T: DeserializeOwned>(
    response: reqwest::Response,
    url: &str,
) -> Result<T, ApiError> {
    response.json::<T>().await.map_err(|e| ApiError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

impl FormApi for HttpFormApi {
    async fn fetch_list(&self, filter: &ListFilter) -> Result<ContainerPage, ApiError> {
        self.get_json(self.url("/form-containers"), &filter.query_pairs())
            .await
    }

    async fn fetch_detail(&self, access_token: &str) -> Result<ContainerDetail, ApiError> {
        let url = self.segment_url(&["form-containers", access_token])?;
        self.get_json(url, &[]).await
    }

    async fn fetch_timeline(&self, container_id: u64) -> Result<Vec<TimelineEntry>, ApiError> {
        let url = self.url(&format!("/form-containers/{}/timeline", container_id));
        match self.get_json(url, &[]).await {
            // The server answers 404 until the first event is logged
            Err(ApiError::Status { status: 404, .. }) => Ok(Vec::new()),
            result => result,
        }
    }

    async fn create_container(
        &self,
        container: &NewContainer,
    ) -> Result<CreatedContainer, ApiError> {
        let url = self.url("/form-containers");
        debug!(
            event = "core.api.create_started",
            app_id = %container.app_id,
            url = %url,
        );

        let builder = self
            .request(Method::POST, &url)
            .json(&create_container_body(container));
        let response = self.send(builder, &url).await?;
        decode(response, &url).await
    }

    async fn mutate(&self, mutation: Mutation) -> Result<(), ApiError> {
        let route = mutation_route(&mutation);
        let url = self.url(&route.path);
        debug!(
            event = "core.api.mutation_started",
            mutation = mutation.name(),
            url = %url,
        );

        let builder = self
            .request(route.method, &url)
            .query(&route.query)
            .json(&route.body);
        self.send(builder, &url).await?;
        Ok(())
    }
}

pub(crate) fn mutation_route(mutation: &Mutation) -> MutationRoute {
    match mutation {
        Mutation::Validate {
            container_id,
            form_id,
            archive,
        } => MutationRoute {
            method: Method::POST,
            path: format!("/form-containers/{}/forms/{}/validate", container_id, form_id),
            query: vec![],
            body: json!({ "archive": archive }),
        },
        Mutation::Cancel {
            container_id,
            form_id,
            comment,
        } => MutationRoute {
            method: Method::POST,
            path: format!("/form-containers/{}/forms/{}/cancel", container_id, form_id),
            query: vec![],
            body: json!({ "comment": comment }),
        },
        Mutation::AddForm {
            container_id,
            app_id,
            questions,
        } => MutationRoute {
            method: Method::POST,
            path: format!("/form-containers/{}/forms", container_id),
            query: vec![("app_id", app_id.clone())],
            body: json!({ "questions": questions }),
        },
        Mutation::SubmitResponse {
            access_token,
            app_id,
            form_id,
            answers,
        } => MutationRoute {
            method: Method::POST,
            path: format!("/forms/{}/submit-response", form_id),
            query: vec![],
            body: json!({
                "access_token": access_token,
                "app_id": app_id,
                "questions": answers,
            }),
        },
    }
}

pub(crate) fn create_container_body(container: &NewContainer) -> serde_json::Value {
    let mut body = json!({
        "app_id": container.app_id,
        "title": container.title,
        "description": container.description,
        "user_email": container.user_email,
        "escalate": container.escalate,
        "forms": [{ "questions": container.questions }],
    });
    if let Some(reference) = &container.reference {
        body["reference"] = json!(reference);
    }
    if let Some(campaign_id) = container.campaign_id {
        body["campaign_id"] = json!(campaign_id);
    }
    body
}

/// Pull the human-readable message out of an error body.
///
/// The server answers errors as `{"error": "..."}`; anything else is
/// returned as-is, shortened.
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body)
        && let Some(msg) = value
            .get("error")
            .or_else(|| value.get("message"))
            .and_then(|v| v.as_str())
    {
        return msg.to_string();
    }

    let trimmed = body.trim();
    if trimmed.chars().count() > 200 {
        let short: String = trimmed.chars().take(197).collect();
        format!("{}...", short)
    } else {
        trimmed.to_string()
    }
}

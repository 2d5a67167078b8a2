//! Optional rewriting of descriptive text by an external service.
//!
//! A [`TextEnhancer`] receives a descriptor serialized as JSON and returns a
//! value of the same shape. Only summary and description strings are taken
//! from the reply; names, paths, types and codes always come from the source.
//! Without an enhancer, or when it fails, the descriptor is returned as is.

use crate::error::{Error, Result};
use crate::extractor::{ControllerInfo, EndpointInfo};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Which kind of service a [`TextEnhancer`] talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[serde(rename = "openai")]
    OpenAi,
    CustomHttp,
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "custom_http" => Ok(ProviderKind::CustomHttp),
            other => Err(Error::InvalidArgument(format!(
                "unknown enhancement provider '{}'",
                other
            ))),
        }
    }
}

/// Settings an enhancer is constructed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancerConfig {
    pub provider: ProviderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub model: String,
    /// Overrides the provider's default endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl EnhancerConfig {
    pub const DEFAULT_MODEL: &'static str = "gpt-4-turbo";

    pub fn new(provider: ProviderKind) -> Self {
        Self {
            provider,
            api_key: None,
            model: Self::DEFAULT_MODEL.to_string(),
            base_url: None,
        }
    }

    /// Builds a configuration from `APIDOC_AI_*` variables read through `lookup`.
    ///
    /// Returns `Ok(None)` when neither a provider nor a key is configured.
    /// Pass `|key| std::env::var(key).ok()` to read the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let provider = read("APIDOC_AI_PROVIDER");
        let api_key = read("APIDOC_AI_API_KEY");
        if provider.is_none() && api_key.is_none() {
            return Ok(None);
        }

        let config = Self {
            provider: provider.as_deref().unwrap_or("openai").parse()?,
            api_key,
            model: read("APIDOC_AI_MODEL").unwrap_or_else(|| Self::DEFAULT_MODEL.to_string()),
            base_url: read("APIDOC_AI_BASE_URL"),
        };
        config.validate()?;
        Ok(Some(config))
    }

    /// Checks that the settings the provider needs are present.
    pub fn validate(&self) -> Result<()> {
        match self.provider {
            ProviderKind::OpenAi if self.api_key.is_none() => Err(Error::InvalidArgument(
                "the openai provider requires an API key".to_string(),
            )),
            ProviderKind::CustomHttp if self.base_url.is_none() => Err(Error::InvalidArgument(
                "the custom_http provider requires a base URL".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// What kind of descriptor is being enhanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentMode {
    Controller,
    Endpoint,
}

/// A service that rewrites or completes descriptive text.
pub trait TextEnhancer {
    /// Returns a same-shaped replacement for `payload`.
    fn enhance(&self, payload: Value, mode: DocumentMode) -> Result<Value>;
}

/// Returns `controller` with enhanced summaries and descriptions merged in.
pub fn enhance_controller(
    controller: &ControllerInfo,
    enhancer: Option<&dyn TextEnhancer>,
) -> ControllerInfo {
    let mut enhanced = controller.clone();
    let Some(enhancer) = enhancer else { return enhanced };

    match request(enhancer, controller, DocumentMode::Controller) {
        Ok(reply) => {
            merge_controller(&mut enhanced, &reply);
            debug!("Merged enhanced text into controller {}", controller.name);
        }
        Err(e) => warn!("Enhancement of controller {} failed: {}", controller.name, e),
    }
    enhanced
}

/// Returns `endpoint` with enhanced summary and descriptions merged in.
pub fn enhance_endpoint(endpoint: &EndpointInfo, enhancer: Option<&dyn TextEnhancer>) -> EndpointInfo {
    let mut enhanced = endpoint.clone();
    let Some(enhancer) = enhancer else { return enhanced };

    match request(enhancer, endpoint, DocumentMode::Endpoint) {
        Ok(reply) => merge_endpoint(&mut enhanced, &reply),
        Err(e) => warn!("Enhancement of endpoint {} failed: {}", endpoint.method_name, e),
    }
    enhanced
}

fn request<T: Serialize>(enhancer: &dyn TextEnhancer, descriptor: &T, mode: DocumentMode) -> Result<Value> {
    let reply = enhancer.enhance(serde_json::to_value(descriptor)?, mode)?;
    if !reply.is_object() {
        return Err(Error::EnhancementError("reply is not a JSON object".to_string()));
    }
    Ok(reply)
}

fn text(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn merge_controller(controller: &mut ControllerInfo, reply: &Value) {
    if let Some(description) = text(reply, "description") {
        controller.description = Some(description);
    }
    let Some(endpoints) = reply.get("endpoints").and_then(Value::as_array) else { return };
    for (endpoint, reply) in controller.endpoints.iter_mut().zip(endpoints) {
        let same_method = text(reply, "methodName").map_or(true, |name| name == endpoint.method_name);
        if same_method {
            merge_endpoint(endpoint, reply);
        }
    }
}

fn merge_endpoint(endpoint: &mut EndpointInfo, reply: &Value) {
    if let Some(summary) = text(reply, "summary") {
        endpoint.summary = Some(summary);
    }
    if let Some(description) = text(reply, "description") {
        endpoint.description = Some(description);
    }

    for reply in reply.get("parameters").and_then(Value::as_array).into_iter().flatten() {
        let (Some(name), Some(description)) = (text(reply, "name"), text(reply, "description")) else {
            continue;
        };
        if let Some(parameter) = endpoint.parameters.iter_mut().find(|p| p.name == name) {
            parameter.description = Some(description);
        }
    }

    for reply in reply.get("responses").and_then(Value::as_array).into_iter().flatten() {
        let (Some(code), Some(description)) = (text(reply, "responseCode"), text(reply, "description")) else {
            continue;
        };
        if let Some(response) = endpoint.responses.iter_mut().find(|r| r.response_code == code) {
            response.description = description;
        }
    }
}

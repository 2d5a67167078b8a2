//! Controller extraction for annotated Spring REST controllers.
//!
//! This module holds the descriptor model produced by extraction and the
//! [`ControllerExtractor`] seam. The only implementation today is
//! [`SpringExtractor`], which recognizes a fixed vocabulary of Spring Web and
//! springdoc annotations by pattern matching over the raw source text. No
//! Java grammar is involved: unrecognized constructs are skipped, never
//! rejected.
//!
//! # Example
//!
//! ```
//! use apidoc_from_source::extractor::{ControllerExtractor, SpringExtractor};
//!
//! let code = r#"
//!     @RestController
//!     @RequestMapping("/api/items")
//!     public class ItemController {
//!         @GetMapping("/{id}")
//!         public ItemDto find(@PathVariable Long id) { return null; }
//!     }
//! "#;
//! let controller = SpringExtractor.parse_controller(code).unwrap();
//! assert_eq!(controller.base_path, "/api/items");
//! assert_eq!(controller.endpoints.len(), 1);
//! ```

pub mod class;
pub mod delimiter;
pub mod endpoint;
pub mod params;

use log::debug;
use serde::{Deserialize, Serialize};

/// Trait for turning the source text of one compilation unit into a controller descriptor.
///
/// Implementations must be pure: the same input always yields a structurally
/// equal result, and nothing is retained between calls.
pub trait ControllerExtractor {
    /// Extracts the controller declared in `code`.
    ///
    /// Returns `None` when the source is not a controller. Every other
    /// shortcoming of the input degrades to documented defaults.
    fn parse_controller(&self, code: &str) -> Option<ControllerInfo>;
}

/// Extractor for Spring Web `@RestController` classes.
pub struct SpringExtractor;

impl ControllerExtractor for SpringExtractor {
    fn parse_controller(&self, code: &str) -> Option<ControllerInfo> {
        if !class::is_rest_controller(code) {
            debug!("Source has no @RestController marker, skipping");
            return None;
        }

        let header = class::ClassHeader::locate(code);
        let name = header.class_name();
        let endpoints = endpoint::extract_endpoints(header.body(code));
        debug!("Extracted controller {} with {} endpoints", name, endpoints.len());

        Some(ControllerInfo {
            package_name: class::extract_package(code),
            base_path: class::extract_base_path(header.preamble(code)),
            description: class::extract_description(header.preamble(code)),
            security_requirements: class::extract_security_requirements(header.preamble(code)),
            name,
            endpoints,
        })
    }
}

/// Everything extracted from one controller class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerInfo {
    /// Simple class name, `UnknownController` when no class declaration is found
    pub name: String,
    /// Declared package, empty when absent
    pub package_name: String,
    /// Class-level request mapping, `/` when absent
    pub base_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub security_requirements: Vec<SecurityRequirement>,
    /// Endpoints in source declaration order
    pub endpoints: Vec<EndpointInfo>,
}

impl ControllerInfo {
    /// Returns every endpoint bound to the given Java method name (overloads included).
    pub fn endpoints_named<'a>(&'a self, method_name: &'a str) -> impl Iterator<Item = &'a EndpointInfo> + 'a {
        self.endpoints
            .iter()
            .filter(move |endpoint| endpoint.method_name == method_name)
    }
}

/// One mapped handler method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointInfo {
    pub method_name: String,
    pub http_method: HttpMethod,
    /// Path relative to the controller base path
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    pub parameters: Vec<ParameterInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBodyInfo>,
    pub responses: Vec<ApiResponseInfo>,
    /// Return type exactly as written in the signature
    pub return_type: String,
    #[serde(default)]
    pub security_requirements: Vec<SecurityRequirement>,
}

/// HTTP verbs a mapping annotation can bind to.
///
/// `All` stands for a `@RequestMapping` that does not name a verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    All,
}

impl HttpMethod {
    /// Maps an annotation or `RequestMethod` keyword (`Get`, `POST`, ...) to a verb.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "DELETE" => Some(HttpMethod::Delete),
            "PATCH" => Some(HttpMethod::Patch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::All => "ALL",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-body handler parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterInfo {
    pub name: String,
    /// Declared type as written, not resolved
    #[serde(rename = "type")]
    pub type_name: String,
    pub location: ParameterLocation,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Where a parameter value is bound from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

/// The `@RequestBody` parameter of a handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBodyInfo {
    /// Bound DTO type as written
    #[serde(rename = "type")]
    pub type_name: String,
    pub required: bool,
    pub content: Vec<MediaTypeInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaTypeInfo {
    pub media_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
}

impl MediaTypeInfo {
    pub fn json() -> Self {
        Self {
            media_type: "application/json".to_string(),
            schema_type: None,
        }
    }
}

/// One documented response of an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponseInfo {
    /// Status code as written, e.g. `"200"`
    pub response_code: String,
    pub description: String,
}

/// A named security scheme an endpoint or controller requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityRequirement {
    pub name: String,
    #[serde(default)]
    pub scopes: Vec<String>,
}

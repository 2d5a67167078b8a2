//! Endpoint extraction from the body of a controller class.
//!
//! Each verb-mapping annotation is paired with the next public method
//! signature. The annotations between the previous declaration and that
//! signature form the endpoint's annotation block, which supplies operation
//! docs, responses and method-level security.

use super::class::extract_security_requirements;
use super::delimiter::{annotation_block, arguments_after, CodeMask};
use super::params::{extract_request_body, parse_parameters};
use super::{ApiResponseInfo, EndpointInfo, HttpMethod};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static VERB_MAPPING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(Get|Post|Put|Delete|Patch|Request)Mapping\b").unwrap());

static METHOD_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\bpublic\s+(?:(?:static|final|synchronized|abstract|default)\s+)*([\w<>\[\],.?@\s]+?)\s+(\w+)\s*\(",
    )
    .unwrap()
});

static REQUEST_METHOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"RequestMethod\s*\.\s*(GET|POST|PUT|DELETE|PATCH)\b").unwrap());

static KEYED_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\b(?:value|path)\s*=\s*\{?\s*"([^"]*)""#).unwrap());

static LEADING_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*\{?\s*"([^"]*)""#).unwrap());

static OPERATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@Operation\b").unwrap());

static API_RESPONSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@ApiResponse\b").unwrap());

static SUMMARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bsummary\s*=\s*"([^"]*)""#).unwrap());

static DESCRIPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bdescription\s*=\s*"([^"]*)""#).unwrap());

static OPERATION_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\boperationId\s*=\s*"([^"]*)""#).unwrap());

static RESPONSE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bresponseCode\s*=\s*"([^"]+)""#).unwrap());

/// Extracts every mapped endpoint from `body`, in source order.
///
/// `body` should start at the class declaration so the class-level
/// `@RequestMapping` is not mistaken for an endpoint.
pub fn extract_endpoints(body: &str) -> Vec<EndpointInfo> {
    let mut endpoints = Vec::new();
    let mask = CodeMask::new(body);

    for caps in VERB_MAPPING.captures_iter(body) {
        let Some(annotation) = caps.get(0) else { continue };
        if !mask.is_code(annotation.start()) {
            debug!("Ignoring {} inside a comment or literal", annotation.as_str());
            continue;
        }
        let (args, annotation_end) =
            arguments_after(body, annotation.end()).unwrap_or(("", annotation.end()));
        let http_method = resolve_http_method(&caps[1], args);
        let path = mapping_path(args);

        let Some(signature) = next_signature(body, annotation_end, &mask) else {
            debug!("No method follows {} at offset {}, skipping", annotation.as_str(), annotation.start());
            continue;
        };
        let (Some(whole), Some(name)) = (signature.get(0), signature.get(2)) else { continue };
        let params = arguments_after(body, name.end())
            .map(|(params, _)| params)
            .unwrap_or("");

        let block = annotation_block(body, whole.start());
        let operation = Operation::extract(block);

        let endpoint = EndpointInfo {
            method_name: name.as_str().to_string(),
            http_method,
            path,
            summary: Some(operation.summary),
            description: Some(operation.description),
            operation_id: operation.operation_id,
            parameters: parse_parameters(params),
            request_body: extract_request_body(params),
            responses: extract_responses(block),
            return_type: normalize_whitespace(&signature[1]),
            security_requirements: extract_security_requirements(block),
        };
        debug!(
            "Found endpoint {} {} -> {}",
            endpoint.http_method, endpoint.path, endpoint.method_name
        );
        endpoints.push(endpoint);
    }

    endpoints
}

/// Finds the first method signature at or after `from` that is not commented out.
fn next_signature<'t>(body: &'t str, from: usize, mask: &CodeMask) -> Option<regex::Captures<'t>> {
    let mut start = from;
    loop {
        let caps = METHOD_SIGNATURE.captures_at(body, start)?;
        let whole = caps.get(0)?;
        if mask.is_code(whole.start()) {
            return Some(caps);
        }
        start = whole.end();
    }
}

/// Picks the path out of mapping arguments.
///
/// A `value =` or `path =` literal wins, then a leading positional literal.
/// The first element of an array literal is used. Empty when neither exists.
pub fn mapping_path(args: &str) -> String {
    KEYED_PATH
        .captures(args)
        .or_else(|| LEADING_PATH.captures(args))
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}

fn resolve_http_method(keyword: &str, args: &str) -> HttpMethod {
    HttpMethod::from_keyword(keyword)
        .or_else(|| {
            REQUEST_METHOD
                .captures(args)
                .and_then(|caps| HttpMethod::from_keyword(&caps[1]))
        })
        .unwrap_or(HttpMethod::All)
}

/// Documentation fields of an `@Operation` annotation, empty when absent.
#[derive(Debug, Default, PartialEq, Eq)]
struct Operation {
    summary: String,
    description: String,
    operation_id: Option<String>,
}

impl Operation {
    fn extract(block: &str) -> Self {
        let mask = CodeMask::new(block);
        let Some((args, _)) = OPERATION
            .find_iter(block)
            .find(|m| mask.is_code(m.start()))
            .and_then(|m| arguments_after(block, m.end()))
        else {
            return Self::default();
        };
        let capture = |pattern: &Regex| pattern.captures(args).map(|caps| caps[1].to_string());

        Self {
            summary: capture(&SUMMARY).unwrap_or_default(),
            description: capture(&DESCRIPTION).unwrap_or_default(),
            operation_id: capture(&OPERATION_ID),
        }
    }
}

/// Collects `@ApiResponse` entries carrying a `responseCode`, bare or grouped.
fn extract_responses(block: &str) -> Vec<ApiResponseInfo> {
    let mask = CodeMask::new(block);
    API_RESPONSE
        .find_iter(block)
        .filter(|m| mask.is_code(m.start()))
        .filter_map(|m| arguments_after(block, m.end()))
        .filter_map(|(args, _)| {
            let response_code = RESPONSE_CODE.captures(args)?[1].to_string();
            let description = DESCRIPTION
                .captures(args)
                .map(|caps| caps[1].to_string())
                .unwrap_or_default();
            Some(ApiResponseInfo {
                response_code,
                description,
            })
        })
        .collect()
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{ParameterLocation, SecurityRequirement};
    use pretty_assertions::assert_eq;

    const BODY: &str = r#"public class NominationController {

    private final NominationService service;

    @Schema(name = "findDetailNom", description = "Detalles", example = "1,2,3")
    @PostMapping("/nom-detail")
    public ResponseEntity<NominationDetailsResponseDTO> findDetailNom(@RequestBody NominationIdsRequestDTO request) {
        return ResponseEntity.ok(service.details(request));
    }

    @Operation(summary = "Search (filtered)", description = "Finds summaries", operationId = "searchSummaries")
    @ApiResponses(value = {
            @ApiResponse(responseCode = "200", description = "Found", content = {
                    @Content(mediaType = "application/json", schema = @Schema(implementation = SummaryDTO.class)) }),
            @ApiResponse(responseCode = "401", description = "Unauthorized", content = @Content),
            @ApiResponse(description = "no code") })
    @SecurityRequirement(name = "token", scopes = "read")
    @PostMapping(value = "/search", produces = "application/json")
    public ResponseEntity<List<SummaryDTO>> search(
            @RequestBody FiltersDTO filters,
            @RequestParam(value = "page", required = false) Integer page) {
        return ResponseEntity.ok(service.search(filters, page));
    }

    @RequestMapping(value = "/legacy/{code}", method = RequestMethod.DELETE)
    @ApiResponse(responseCode = "204")
    public void removeLegacy(@PathVariable("code") String code) {
        service.remove(code);
    }

    @RequestMapping("/any")
    public String any() { return "x"; }

    @GetMapping
    public Map<String, List<Long>> index() { return Map.of(); }
}
"#;

    #[test]
    fn test_extract_endpoints_in_source_order() {
        let endpoints = extract_endpoints(BODY);
        let summary: Vec<_> = endpoints
            .iter()
            .map(|e| (e.http_method, e.path.as_str(), e.method_name.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (HttpMethod::Post, "/nom-detail", "findDetailNom"),
                (HttpMethod::Post, "/search", "search"),
                (HttpMethod::Delete, "/legacy/{code}", "removeLegacy"),
                (HttpMethod::All, "/any", "any"),
                (HttpMethod::Get, "", "index"),
            ]
        );
    }

    #[test]
    fn test_extract_endpoint_without_operation() {
        let endpoint = &extract_endpoints(BODY)[0];
        assert_eq!(endpoint.summary.as_deref(), Some(""));
        assert_eq!(endpoint.description.as_deref(), Some(""));
        assert_eq!(endpoint.operation_id, None);
        assert!(endpoint.responses.is_empty());
        assert!(endpoint.parameters.is_empty());
        assert_eq!(endpoint.return_type, "ResponseEntity<NominationDetailsResponseDTO>");
        assert_eq!(
            endpoint.request_body.as_ref().map(|b| b.type_name.as_str()),
            Some("NominationIdsRequestDTO")
        );
    }

    #[test]
    fn test_extract_endpoint_operation_and_grouped_responses() {
        let endpoint = &extract_endpoints(BODY)[1];
        assert_eq!(endpoint.summary.as_deref(), Some("Search (filtered)"));
        assert_eq!(endpoint.description.as_deref(), Some("Finds summaries"));
        assert_eq!(endpoint.operation_id.as_deref(), Some("searchSummaries"));
        assert_eq!(
            endpoint.responses,
            vec![
                ApiResponseInfo {
                    response_code: "200".to_string(),
                    description: "Found".to_string(),
                },
                ApiResponseInfo {
                    response_code: "401".to_string(),
                    description: "Unauthorized".to_string(),
                },
            ]
        );
        assert_eq!(
            endpoint.security_requirements,
            vec![SecurityRequirement {
                name: "token".to_string(),
                scopes: vec!["read".to_string()],
            }]
        );
        assert_eq!(endpoint.return_type, "ResponseEntity<List<SummaryDTO>>");
        assert_eq!(endpoint.request_body.as_ref().unwrap().type_name, "FiltersDTO");
        assert_eq!(endpoint.parameters.len(), 1);
        assert_eq!(endpoint.parameters[0].name, "page");
        assert_eq!(endpoint.parameters[0].location, ParameterLocation::Query);
        assert!(!endpoint.parameters[0].required);
    }

    #[test]
    fn test_extract_endpoint_bare_response_without_description() {
        let endpoint = &extract_endpoints(BODY)[2];
        assert_eq!(
            endpoint.responses,
            vec![ApiResponseInfo {
                response_code: "204".to_string(),
                description: String::new(),
            }]
        );
        assert_eq!(endpoint.return_type, "void");
        assert_eq!(endpoint.parameters[0].name, "code");
        assert_eq!(endpoint.parameters[0].location, ParameterLocation::Path);
        assert!(endpoint.security_requirements.is_empty());
    }

    #[test]
    fn test_extract_endpoint_generic_return_type() {
        let endpoint = &extract_endpoints(BODY)[4];
        assert_eq!(endpoint.return_type, "Map<String, List<Long>>");
        assert!(endpoint.parameters.is_empty());
        assert!(endpoint.request_body.is_none());
    }

    #[test]
    fn test_mapping_without_method_is_discarded() {
        let body = "public class A {\n  @GetMapping(\"/orphan\")\n  private int field;\n}";
        assert!(extract_endpoints(body).is_empty());
    }

    #[test]
    fn test_unbalanced_parameter_list_degrades() {
        let body = "public class A {\n  @GetMapping(\"/x\")\n  public X broken(@PathVariable Long id";
        let endpoints = extract_endpoints(body);
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].parameters[0].name, "id");
    }

    #[test]
    fn test_mapping_path() {
        assert_eq!(mapping_path(r#""/a""#), "/a");
        assert_eq!(mapping_path(r#"produces = "x", value = "/b""#), "/b");
        assert_eq!(mapping_path(r#"path = { "/c", "/d" }"#), "/c");
        assert_eq!(mapping_path(r#"{"/e", "/f"}"#), "/e");
        assert_eq!(mapping_path(r#"produces = "application/json""#), "");
        assert_eq!(mapping_path(""), "");
    }

    #[test]
    fn test_commented_out_mappings_are_ignored() {
        let body = r#"public class LegacyController {
    // @GetMapping("/old")
    /* @PostMapping("/older")
       public String older() { return ""; } */
    @GetMapping("/new")
    public String get() { return "ok"; }

    @Operation(summary = "Uses the \"@GetMapping\" keyword")
    @DeleteMapping("/{id}")
    // public String draft(
    public void remove(@PathVariable Long id) {}
}
"#;
        let summary: Vec<_> = extract_endpoints(body)
            .iter()
            .map(|e| (e.path.clone(), e.method_name.clone()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("/new".to_string(), "get".to_string()),
                ("/{id}".to_string(), "remove".to_string()),
            ]
        );
    }

    #[test]
    fn test_commented_out_block_annotations_are_ignored() {
        let body = r#"public class A {
    // @Operation(summary = "stale")
    // @ApiResponse(responseCode = "500", description = "stale")
    // @SecurityRequirement(name = "stale")
    @Operation(summary = "live")
    @ApiResponse(responseCode = "200", description = "live")
    @GetMapping("/x")
    public String x() { return ""; }
}
"#;
        let endpoint = &extract_endpoints(body)[0];
        assert_eq!(endpoint.summary.as_deref(), Some("live"));
        assert_eq!(endpoint.responses.len(), 1);
        assert_eq!(endpoint.responses[0].response_code, "200");
        assert!(endpoint.security_requirements.is_empty());
    }
}

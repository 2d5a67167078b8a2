//! Data-transfer object extraction.
//!
//! DTO sources are scanned line by line. A field is a trimmed line of the form
//! `private Type name;` and its documentation comes from the nearest
//! `@Schema(...)` annotation found in a short lookback window above it.

use crate::extractor::class::extract_package;
use crate::extractor::delimiter::{arguments_after, LiteralState};
use crate::extractor::ControllerInfo;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// How many non-empty lines above a field are searched for its `@Schema`.
pub const SCHEMA_LOOKBACK_LINES: usize = 5;

static FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^private\s+((?:(?:static|final|transient|volatile)\s+)*)([\w<>?\[\],.\s]+?)\s+(\w+)\s*(?:=.*)?;$",
    )
    .unwrap()
});

static CLASS_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:(?:public|protected|abstract|final|static)\s+)*(?:class|record|enum)\s+\w+")
        .unwrap()
});

static SCHEMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@Schema\b").unwrap());

static DESCRIPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bdescription\s*=\s*"([^"]*)""#).unwrap());

static EXAMPLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bexample\s*=\s*"([^"]*)""#).unwrap());

static TYPE_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z_][\w.]*").unwrap());

/// Type names that never denote a project DTO.
const WELL_KNOWN_TYPES: &[&str] = &[
    "ResponseEntity", "HttpEntity", "List", "ArrayList", "LinkedList", "Set", "HashSet",
    "Collection", "Iterable", "Map", "HashMap", "Optional", "Page", "Slice", "Mono", "Flux",
    "CompletableFuture", "Callable", "DeferredResult", "String", "Long", "Integer", "Short",
    "Byte", "Double", "Float", "Boolean", "Character", "Number", "BigDecimal", "BigInteger",
    "Object", "Void", "UUID", "Date", "LocalDate", "LocalDateTime", "LocalTime",
    "OffsetDateTime", "ZonedDateTime", "Instant", "Duration", "Resource", "MultipartFile",
    "JsonNode",
];

/// A DTO class and its documented fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DtoInfo {
    pub name: String,
    pub package_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<DtoField>,
}

/// One instance field of a DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DtoField {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub description: String,
    pub example: String,
    /// Not derived from the source yet; always false
    pub required: bool,
}

/// Parses the source of the DTO `class_name`.
pub fn parse_dto(code: &str, class_name: &str) -> DtoInfo {
    let fields = extract_fields(code);
    debug!("Parsed DTO {} with {} fields", class_name, fields.len());

    DtoInfo {
        name: class_name.to_string(),
        package_name: extract_package(code),
        description: extract_schema_description(code),
        fields,
    }
}

/// Reads the `@Schema(description = ...)` placed above the type declaration.
fn extract_schema_description(code: &str) -> Option<String> {
    let header_end = CLASS_DECLARATION
        .find(code)
        .map(|m| m.start())
        .unwrap_or(code.len());
    let header = &code[..header_end];

    SCHEMA
        .find_iter(header)
        .filter_map(|m| arguments_after(header, m.end()))
        .find_map(|(args, _)| DESCRIPTION.captures(args).map(|caps| caps[1].to_string()))
}

fn extract_fields(code: &str) -> Vec<DtoField> {
    let lines: Vec<&str> = code.lines().collect();

    lines
        .iter()
        .enumerate()
        .filter_map(|(index, line)| {
            let line = line.trim();
            if !line.starts_with("private") || !line.ends_with(';') {
                return None;
            }
            let caps = FIELD.captures(line)?;
            if caps[1].split_whitespace().any(|modifier| modifier == "static") {
                return None;
            }

            let (description, example) = schema_above(&lines, index).unwrap_or_default();
            Some(DtoField {
                name: caps[3].to_string(),
                type_name: caps[2].split_whitespace().collect::<Vec<_>>().join(" "),
                description,
                example,
                required: false,
            })
        })
        .collect()
}

/// Looks up to [`SCHEMA_LOOKBACK_LINES`] non-empty lines above `field_index` for `@Schema`.
///
/// The search stops at the first `@Schema` line or at the end of the
/// previous statement. Arguments may continue onto the following lines, and a
/// line inside an unclosed argument list never counts as a statement end.
fn schema_above(lines: &[&str], field_index: usize) -> Option<(String, String)> {
    let mut seen = 0;
    let mut index = field_index;
    // `)` seen below minus `(` seen below
    let mut open_arguments = 0isize;

    while index > 0 && seen < SCHEMA_LOOKBACK_LINES {
        index -= 1;
        let line = lines[index].trim();
        if line.is_empty() {
            continue;
        }
        seen += 1;

        if SCHEMA.is_match(line) {
            let annotation = lines[index..field_index].join("\n");
            let schema = SCHEMA.find(&annotation)?;
            let (args, _) = arguments_after(&annotation, schema.end())?;
            let capture = |pattern: &Regex| {
                pattern
                    .captures(args)
                    .map(|caps| caps[1].to_string())
                    .unwrap_or_default()
            };
            return Some((capture(&DESCRIPTION), capture(&EXAMPLE)));
        }
        let ends_statement = line.ends_with(';') || line.ends_with('{') || line.ends_with('}');
        if ends_statement && open_arguments <= 0 {
            return None;
        }
        open_arguments += paren_balance(line);
    }
    None
}

/// Count of `)` minus count of `(` outside literals and comments.
fn paren_balance(line: &str) -> isize {
    let mut literal = LiteralState::default();
    line.bytes()
        .filter(|&byte| !literal.consume(byte))
        .map(|byte| match byte {
            b')' => 1,
            b'(' => -1,
            _ => 0,
        })
        .sum()
}

/// Returns the project type names mentioned in a type expression.
///
/// Generic wrappers, JDK value types, primitives and single-letter type
/// variables are dropped; package qualifiers are stripped.
pub fn referenced_type_names(type_text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for m in TYPE_IDENTIFIER.find_iter(type_text) {
        let simple = m.as_str().rsplit('.').next().unwrap_or_default();
        let is_project_type = simple.starts_with(|c: char| c.is_ascii_uppercase())
            && simple.len() > 1
            && !WELL_KNOWN_TYPES.contains(&simple);
        if is_project_type && !names.iter().any(|n| n == simple) {
            names.push(simple.to_string());
        }
    }
    names
}

/// Returns the DTO names referenced by request bodies and return types, in first-seen order.
pub fn referenced_types(controller: &ControllerInfo) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for endpoint in &controller.endpoints {
        let body = endpoint.request_body.as_ref().map(|b| b.type_name.as_str());
        for type_text in body.into_iter().chain([endpoint.return_type.as_str()]) {
            for name in referenced_type_names(type_text) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
    }
    names
}

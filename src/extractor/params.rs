//! Handler parameter list parsing.
//!
//! Input is the raw text between a method's parentheses. Parameters are split
//! on top-level commas, so `Map<String, Integer>` or
//! `@RequestParam(value = "q", required = false)` stay in one piece.

use super::delimiter::{find_matching, LiteralState};
use super::{MediaTypeInfo, ParameterInfo, ParameterLocation, RequestBodyInfo};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

/// Type reported for a parameter whose declaration names no type.
pub const DEFAULT_PARAMETER_TYPE: &str = "string";

static REQUEST_BODY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@RequestBody\b").unwrap());

static NOT_REQUIRED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\brequired\s*=\s*false\b").unwrap());

static PARAMETER_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@Parameter\s*\([^)]*?\bdescription\s*=\s*"([^"]*)""#).unwrap()
});

/// Binding annotations that move a parameter out of the query string.
static LOCATION_MARKERS: LazyLock<Vec<(Regex, ParameterLocation)>> = LazyLock::new(|| {
    vec![
        (Regex::new(r"@PathVariable\b").unwrap(), ParameterLocation::Path),
        (Regex::new(r"@RequestHeader\b").unwrap(), ParameterLocation::Header),
        (Regex::new(r"@CookieValue\b").unwrap(), ParameterLocation::Cookie),
    ]
});

/// Parses a parameter list into descriptors, leaving out the `@RequestBody` parameter.
pub fn parse_parameters(params: &str) -> Vec<ParameterInfo> {
    split_top_level(params)
        .into_iter()
        .filter(|raw| !REQUEST_BODY.is_match(raw))
        .filter_map(|raw| {
            let declaration = Declaration::parse(raw)?;
            let location = LOCATION_MARKERS
                .iter()
                .find(|(marker, _)| marker.is_match(declaration.annotations))
                .map(|(_, location)| *location)
                .unwrap_or(ParameterLocation::Query);
            let description = PARAMETER_DESCRIPTION
                .captures(declaration.annotations)
                .map(|caps| caps[1].to_string());

            Some(ParameterInfo {
                name: declaration.name,
                type_name: declaration.type_name,
                location,
                required: !NOT_REQUIRED.is_match(raw),
                description,
            })
        })
        .collect()
}

/// Builds the request body descriptor from the `@RequestBody` parameter, if any.
pub fn extract_request_body(params: &str) -> Option<RequestBodyInfo> {
    let raw = split_top_level(params)
        .into_iter()
        .find(|raw| REQUEST_BODY.is_match(raw))?;
    let declaration = Declaration::parse(raw)?;
    if !declaration.has_type {
        debug!("@RequestBody parameter without a type: {}", raw.trim());
        return None;
    }

    Some(RequestBodyInfo {
        type_name: declaration.type_name,
        required: true,
        content: vec![MediaTypeInfo::json()],
    })
}

/// Splits on commas outside `<>`, `()`, `[]` and `{}` groups and outside literals.
pub fn split_top_level(params: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut literal = LiteralState::default();

    for (i, &byte) in params.as_bytes().iter().enumerate() {
        if literal.consume(byte) {
            continue;
        }
        match byte {
            b'<' | b'(' | b'[' | b'{' => depth += 1,
            b'>' | b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push(&params[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&params[start..]);

    parts.retain(|part| !part.trim().is_empty());
    parts
}

/// One parameter declaration split into its annotation prefix, type and name.
struct Declaration<'a> {
    annotations: &'a str,
    type_name: String,
    name: String,
    has_type: bool,
}

impl<'a> Declaration<'a> {
    fn parse(raw: &'a str) -> Option<Self> {
        let raw = raw.trim();
        let rest_start = skip_modifiers(raw);
        let mut words: Vec<&str> = raw[rest_start..].split_whitespace().collect();
        let name = words.pop()?.to_string();
        let has_type = !words.is_empty();
        let type_name = if has_type {
            words.join(" ")
        } else {
            DEFAULT_PARAMETER_TYPE.to_string()
        };

        Some(Self {
            annotations: &raw[..rest_start],
            type_name,
            name,
            has_type,
        })
    }
}

/// Returns the offset just past leading annotations and `final`.
fn skip_modifiers(raw: &str) -> usize {
    let bytes = raw.as_bytes();
    let mut pos = 0;

    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if bytes.get(pos) == Some(&b'@') {
            pos += 1;
            while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || matches!(bytes[pos], b'_' | b'.')) {
                pos += 1;
            }
            let mut lookahead = pos;
            while lookahead < bytes.len() && bytes[lookahead].is_ascii_whitespace() {
                lookahead += 1;
            }
            if bytes.get(lookahead) == Some(&b'(') {
                pos = find_matching(raw, lookahead, b'(', b')');
            }
        } else if raw[pos..].starts_with("final") && raw[pos + 5..].starts_with(char::is_whitespace) {
            pos += 5;
        } else {
            return pos;
        }
    }
}

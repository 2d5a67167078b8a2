//! Class-level extraction: package, class name, base path, description and security.

use super::delimiter::{arguments_after, CodeMask};
use super::endpoint::mapping_path;
use super::SecurityRequirement;
use regex::Regex;
use std::sync::LazyLock;

/// Name reported when no public class declaration is found.
pub const UNKNOWN_CONTROLLER: &str = "UnknownController";

static REST_CONTROLLER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(?:\w+\.)*RestController\b").unwrap());

static PACKAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*package\s+([\w.]+)\s*;").unwrap());

static CLASS_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bpublic\s+(?:(?:abstract|final|static)\s+)*class\s+(\w+)").unwrap()
});

static REQUEST_MAPPING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@RequestMapping\b").unwrap());

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@Tag\b").unwrap());

static DESCRIPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bdescription\s*=\s*"([^"]*)""#).unwrap());

static JAVADOC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*\*(.*?)\*/").unwrap());

static SECURITY_REQUIREMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@SecurityRequirement\b").unwrap());

static SECURITY_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bname\s*=\s*"([^"]+)""#).unwrap());

static SECURITY_SCOPES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bscopes\s*=\s*(\{[^}]*\}|"[^"]*")"#).unwrap());

static STRING_LITERAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]*)""#).unwrap());

/// Returns true when the source carries the `@RestController` marker.
///
/// `@RestControllerAdvice` does not count.
pub fn is_rest_controller(code: &str) -> bool {
    let mask = CodeMask::new(code);
    REST_CONTROLLER
        .find_iter(code)
        .any(|m| mask.is_code(m.start()))
}

/// Returns the declared package, or an empty string.
pub fn extract_package(code: &str) -> String {
    PACKAGE
        .captures(code)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}

/// Location of the first public class declaration in a source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassHeader {
    declaration: Option<(usize, String)>,
}

impl ClassHeader {
    pub fn locate(code: &str) -> Self {
        let declaration = CLASS_DECLARATION
            .captures(code)
            .and_then(|caps| Some((caps.get(0)?.start(), caps[1].to_string())));
        Self { declaration }
    }

    /// The declared class name, or [`UNKNOWN_CONTROLLER`].
    pub fn class_name(&self) -> String {
        self.declaration
            .as_ref()
            .map(|(_, name)| name.clone())
            .unwrap_or_else(|| UNKNOWN_CONTROLLER.to_string())
    }

    /// Text before the class declaration; the whole text when there is none.
    pub fn preamble<'a>(&self, code: &'a str) -> &'a str {
        match self.declaration {
            Some((start, _)) => &code[..start],
            None => code,
        }
    }

    /// Text from the class declaration onwards; the whole text when there is none.
    pub fn body<'a>(&self, code: &'a str) -> &'a str {
        match self.declaration {
            Some((start, _)) => &code[start..],
            None => code,
        }
    }
}

/// Reads the class-level `@RequestMapping` path from the class preamble, defaulting to `/`.
pub fn extract_base_path(preamble: &str) -> String {
    let mask = CodeMask::new(preamble);
    REQUEST_MAPPING
        .find_iter(preamble)
        .filter(|m| mask.is_code(m.start()))
        .filter_map(|m| arguments_after(preamble, m.end()))
        .map(|(args, _)| mapping_path(args))
        .find(|path| !path.is_empty())
        .unwrap_or_else(|| "/".to_string())
}

/// Class description from `@Tag(description = ...)`, else from the class Javadoc.
pub fn extract_description(preamble: &str) -> Option<String> {
    let mask = CodeMask::new(preamble);
    let tag_description = TAG
        .find_iter(preamble)
        .filter(|m| mask.is_code(m.start()))
        .filter_map(|m| arguments_after(preamble, m.end()))
        .find_map(|(args, _)| DESCRIPTION.captures(args).map(|caps| caps[1].to_string()));
    if tag_description.is_some() {
        return tag_description;
    }

    let javadoc = JAVADOC.captures_iter(preamble).last()?;
    let text = javadoc[1]
        .lines()
        .map(|line| line.trim().trim_start_matches('*').trim())
        .filter(|line| !line.is_empty() && !line.starts_with('@'))
        .collect::<Vec<_>>()
        .join(" ");
    (!text.is_empty()).then_some(text)
}

/// Collects every `@SecurityRequirement(name = ...)` in `block`, duplicates included.
///
/// Occurrences inside comments or string literals are skipped.
pub fn extract_security_requirements(block: &str) -> Vec<SecurityRequirement> {
    let mask = CodeMask::new(block);
    SECURITY_REQUIREMENT
        .find_iter(block)
        .filter(|m| mask.is_code(m.start()))
        .filter_map(|m| arguments_after(block, m.end()))
        .filter_map(|(args, _)| {
            let name = SECURITY_NAME.captures(args)?[1].to_string();
            let mut scopes: Vec<String> = Vec::new();
            if let Some(caps) = SECURITY_SCOPES.captures(args) {
                for scope in STRING_LITERAL.captures_iter(&caps[1]) {
                    if !scopes.iter().any(|s| s == &scope[1]) {
                        scopes.push(scope[1].to_string());
                    }
                }
            }
            Some(SecurityRequirement { name, scopes })
        })
        .collect()
}

//! Assembly of extracted controllers and their DTO models into one report.

use crate::dto::{parse_dto, referenced_type_names, referenced_types, DtoInfo};
use crate::error::{Error, Result};
use crate::extractor::ControllerInfo;
use crate::locator::ModelLocator;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

/// Everything documented for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiReport {
    pub controllers: Vec<ControllerInfo>,
    /// DTOs keyed by simple type name
    #[serde(default)]
    pub models: BTreeMap<String, DtoInfo>,
    /// Referenced types whose source could not be found or read
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub missing_models: BTreeSet<String>,
}

impl ApiReport {
    pub fn endpoint_count(&self) -> usize {
        self.controllers.iter().map(|c| c.endpoints.len()).sum()
    }
}

/// Collects controllers and resolves the models they reference.
///
/// # Example
///
/// ```
/// use apidoc_from_source::extractor::{ControllerExtractor, SpringExtractor};
/// use apidoc_from_source::locator::MapModelLocator;
/// use apidoc_from_source::report::ReportBuilder;
///
/// let controller = SpringExtractor
///     .parse_controller(r#"
///         @RestController
///         public class PingController {
///             @GetMapping("/ping")
///             public PongDto ping() { return null; }
///         }"#)
///     .unwrap();
/// let locator: MapModelLocator = [("PongDto", "public class PongDto {\n    private String text;\n}")]
///     .into_iter()
///     .collect();
///
/// let mut builder = ReportBuilder::new();
/// builder.add_controller(controller);
/// let report = builder.build(Some(&locator));
///
/// assert_eq!(report.models["PongDto"].fields[0].name, "text");
/// ```
#[derive(Debug, Default)]
pub struct ReportBuilder {
    controllers: Vec<ControllerInfo>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_controller(&mut self, controller: ControllerInfo) {
        debug!(
            "Adding controller {} with {} endpoints",
            controller.name,
            controller.endpoints.len()
        );
        self.controllers.push(controller);
    }

    pub fn controller_count(&self) -> usize {
        self.controllers.len()
    }

    /// Keeps only endpoints whose method name is `method_name`.
    ///
    /// Controllers left without endpoints are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EndpointNotFound`] when no controller has such an
    /// endpoint; the builder is left unchanged in that case.
    pub fn retain_endpoint(&mut self, method_name: &str) -> Result<()> {
        let found = self
            .controllers
            .iter()
            .any(|c| c.endpoints_named(method_name).next().is_some());
        if !found {
            return Err(Error::EndpointNotFound(method_name.to_string()));
        }

        for controller in &mut self.controllers {
            controller.endpoints.retain(|e| e.method_name == method_name);
        }
        self.controllers.retain(|c| !c.endpoints.is_empty());
        Ok(())
    }

    /// Builds the report, resolving models through `locator` when given.
    ///
    /// Types referenced by request bodies and return types are looked up, then
    /// the types of their fields, until no new names appear. Lookup failures
    /// are logged and recorded in [`ApiReport::missing_models`].
    pub fn build(self, locator: Option<&dyn ModelLocator>) -> ApiReport {
        let mut report = ApiReport {
            controllers: self.controllers,
            ..ApiReport::default()
        };
        let Some(locator) = locator else { return report };

        let mut seen: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<String> = VecDeque::new();
        for controller in &report.controllers {
            for name in referenced_types(controller) {
                if seen.insert(name.clone()) {
                    queue.push_back(name);
                }
            }
        }

        while let Some(name) = queue.pop_front() {
            let source = match locator.locate(&name) {
                Ok(Some(source)) => source,
                Ok(None) => {
                    warn!("No source found for referenced type {}", name);
                    report.missing_models.insert(name);
                    continue;
                }
                Err(e) => {
                    warn!("Failed to load referenced type {}: {:#}", name, e);
                    report.missing_models.insert(name);
                    continue;
                }
            };

            let dto = parse_dto(&source, &name);
            for field in &dto.fields {
                for nested in referenced_type_names(&field.type_name) {
                    if seen.insert(nested.clone()) {
                        queue.push_back(nested);
                    }
                }
            }
            report.models.insert(name, dto);
        }

        debug!(
            "Resolved {} models, {} missing",
            report.models.len(),
            report.missing_models.len()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{ControllerExtractor, SpringExtractor};
    use crate::locator::MapModelLocator;
    use pretty_assertions::assert_eq;

    const ORDER_CONTROLLER: &str = r#"
@RestController
@RequestMapping("/orders")
public class OrderController {
    @GetMapping("/{id}")
    public ResponseEntity<OrderDto> find(@PathVariable Long id) { return null; }

    @PostMapping
    public OrderDto create(@RequestBody CreateOrderDto body) { return null; }

    @DeleteMapping("/{id}")
    public void delete(@PathVariable Long id) {}
}
"#;

    const STATUS_CONTROLLER: &str = r#"
@RestController
public class StatusController {
    @GetMapping("/status")
    public String status() { return "up"; }

    @DeleteMapping("/cache")
    public void delete() {}
}
"#;

    fn builder() -> ReportBuilder {
        let mut builder = ReportBuilder::new();
        builder.add_controller(SpringExtractor.parse_controller(ORDER_CONTROLLER).unwrap());
        builder.add_controller(SpringExtractor.parse_controller(STATUS_CONTROLLER).unwrap());
        builder
    }

    fn locator() -> MapModelLocator {
        [
            (
                "OrderDto",
                "public class OrderDto {\n    private Long id;\n    private List<OrderLineDto> lines;\n}",
            ),
            ("OrderLineDto", "public class OrderLineDto {\n    private String sku;\n    private OrderDto order;\n}"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_build_without_locator() {
        let report = builder().build(None);

        assert_eq!(report.controllers.len(), 2);
        assert_eq!(report.endpoint_count(), 5);
        assert!(report.models.is_empty());
        assert!(report.missing_models.is_empty());
    }

    #[test]
    fn test_build_resolves_models_transitively() {
        let locator = locator();
        let report = builder().build(Some(&locator));

        let names: Vec<_> = report.models.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["OrderDto", "OrderLineDto"]);
        assert_eq!(report.models["OrderLineDto"].fields[0].name, "sku");

        let missing: Vec<_> = report.missing_models.iter().map(String::as_str).collect();
        assert_eq!(missing, vec!["CreateOrderDto"]);
    }

    #[test]
    fn test_retain_endpoint_across_controllers() {
        let mut builder = builder();
        builder.retain_endpoint("delete").unwrap();
        let report = builder.build(None);

        assert_eq!(report.controllers.len(), 2);
        for controller in &report.controllers {
            assert_eq!(controller.endpoints.len(), 1);
            assert_eq!(controller.endpoints[0].method_name, "delete");
        }
    }

    #[test]
    fn test_retain_endpoint_drops_empty_controllers() {
        let mut builder = builder();
        builder.retain_endpoint("status").unwrap();

        assert_eq!(builder.controller_count(), 1);
        let report = builder.build(Some(&locator()));
        assert_eq!(report.controllers[0].name, "StatusController");
        assert!(report.models.is_empty());
    }

    #[test]
    fn test_retain_unknown_endpoint_is_an_error() {
        let mut builder = builder();
        let err = builder.retain_endpoint("archive").unwrap_err();

        assert!(matches!(err, Error::EndpointNotFound(ref name) if name == "archive"));
        assert_eq!(builder.controller_count(), 2);
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = builder().build(Some(&locator()));
        let json = serde_json::to_value(&report).unwrap();

        assert!(json["models"]["OrderDto"].is_object());
        assert_eq!(json["missingModels"][0], "CreateOrderDto");
        assert_eq!(json["controllers"][0]["basePath"], "/orders");
    }
}

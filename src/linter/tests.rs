#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Unit tests for the model linter

use crate::config::{GeneratorConfig, ManagerEntry};
use crate::linter::{fail_if_errors, has_errors, lint_graph, lint_namespace, LintIssue, LintSeverity};
use crate::registry::{FieldNode, GraphBuilder, MethodNode, QualifiedName, TypeKind, TypeNode, TypeRegistry};

const NS: &str = "example.com/app/models";
const BASE: &str = "example.com/app/db.SStandaloneResourceBase";
const CTX: &str = "context.Context";
const OBJECT: &str = "example.com/x/jsonutils.JSONObject";

fn model(name: &str) -> TypeNode {
    TypeNode::new(QualifiedName::new(NS, name), TypeKind::Struct)
        .with_member(FieldNode::embedded(BASE))
}

fn manager(model: &str) -> TypeNode {
    TypeNode::new(QualifiedName::new(NS, format!("{}Manager", model)), TypeKind::Struct)
}

fn entry(model: &str, keyword: &str) -> ManagerEntry {
    ManagerEntry {
        ty: QualifiedName::new(NS, format!("{}Manager", model)),
        keyword: keyword.to_string(),
        keyword_plural: format!("{}s", keyword),
        service: None,
    }
}

fn base_graph() -> GraphBuilder {
    GraphBuilder::new()
        .insert(TypeNode::new(BASE, TypeKind::Struct))
        .insert(TypeNode::new(CTX, TypeKind::Interface))
        .insert(TypeNode::new(OBJECT, TypeKind::Interface))
}

fn lint(registry: &TypeRegistry, config: &GeneratorConfig) -> Vec<LintIssue> {
    lint_namespace(registry, config, NS)
}

fn kinds(issues: &[LintIssue]) -> Vec<&str> {
    issues.iter().map(|i| i.kind.as_str()).collect()
}

#[test]
fn test_lint_clean_namespace() {
    let registry = base_graph()
        .insert(model("SWidget").with_method(MethodNode::new(
            "GetExtraDetails",
            [CTX, OBJECT, OBJECT],
            [OBJECT, "error"],
        )))
        .insert(manager("SWidget"))
        .build()
        .unwrap();
    let config = GeneratorConfig {
        managers: vec![entry("SWidget", "widget")],
        ..GeneratorConfig::default()
    };

    let issues = lint(&registry, &config);
    assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
    assert!(fail_if_errors(&issues).is_ok());
}

#[test]
fn test_lint_missing_and_unregistered_managers() {
    let registry = base_graph()
        .insert(model("SOrphan"))
        .insert(model("SWidget"))
        .insert(manager("SWidget"))
        .build()
        .unwrap();

    let issues = lint(&registry, &GeneratorConfig::default());
    assert_eq!(kinds(&issues), vec!["missing_manager", "unregistered_manager"]);
    assert_eq!(issues[0].severity, LintSeverity::Info);
    assert_eq!(issues[0].location, format!("{}.SOrphan", NS));
    assert_eq!(issues[1].severity, LintSeverity::Warning);
    assert!(issues[1]
        .suggestion
        .as_deref()
        .unwrap()
        .contains("SWidgetManager"));
    assert!(!has_errors(&issues));
}

#[test]
fn test_lint_arity_and_ambiguity() {
    let registry = base_graph()
        .insert(
            model("SWidget")
                .with_method(MethodNode::new(
                    "GetExtraDetails",
                    [CTX, OBJECT, OBJECT],
                    [OBJECT, "error"],
                ))
                .with_method(MethodNode::new(
                    "GetExtraDetailsCompat",
                    [CTX, OBJECT, OBJECT],
                    [OBJECT, "error"],
                ))
                .with_method(MethodNode::new("PerformReset", [CTX], ["error"])),
        )
        .insert(manager("SWidget"))
        .build()
        .unwrap();
    let config = GeneratorConfig {
        managers: vec![entry("SWidget", "widget")],
        ..GeneratorConfig::default()
    };

    let issues = lint(&registry, &config);
    assert_eq!(kinds(&issues), vec!["ambiguous_method", "arity_mismatch"]);

    let ambiguous = &issues[0];
    assert_eq!(ambiguous.severity, LintSeverity::Warning);
    assert!(ambiguous.message.contains("GetExtraDetailsCompat"));
    assert!(ambiguous.message.contains("only GetExtraDetails is used"));

    let arity = &issues[1];
    assert_eq!(arity.location, format!("{}.SWidget.PerformReset", NS));
    assert!(arity.message.contains("expected 4 and 2"));
}

#[test]
fn test_lint_shape_warnings_and_list_without_get() {
    let registry = base_graph()
        .insert(model("SWidget").with_method(MethodNode::new(
            "PerformReset",
            [CTX, OBJECT, OBJECT, OBJECT],
            [OBJECT, "error"],
        )))
        .insert(manager("SWidget").with_method(MethodNode::new(
            "ListItemFilter",
            [CTX, OBJECT, OBJECT, OBJECT],
            [OBJECT, "error"],
        )))
        .build()
        .unwrap();
    let config = GeneratorConfig {
        managers: vec![entry("SWidget", "widget")],
        ..GeneratorConfig::default()
    };

    let issues = lint(&registry, &config);
    assert_eq!(
        kinds(&issues),
        vec!["list_without_get", "non_struct_body", "non_struct_response"]
    );
}

#[test]
fn test_lint_reports_projection_failures_as_errors() {
    let registry = base_graph()
        .insert(
            model("SWidget")
                .with_member(FieldNode::new("Name", "string").with_tags(r#"json:"label""#))
                .with_member(FieldNode::new("Label", "string")),
        )
        .build()
        .unwrap();

    let issues = lint(&registry, &GeneratorConfig::default());
    let error = issues
        .iter()
        .find(|i| i.severity == LintSeverity::Error)
        .unwrap();
    assert_eq!(error.kind, "duplicate_serialization_name");
    assert_eq!(error.location, NS);
    assert!(has_errors(&issues));
    assert!(fail_if_errors(&issues).is_err());
}

#[test]
fn test_lint_graph_covers_every_model_namespace() {
    let registry = base_graph()
        .insert(model("SWidget"))
        .insert(TypeNode::new(
            "example.com/app/other.SGadget",
            TypeKind::Struct,
        ).with_member(FieldNode::embedded(BASE)))
        .build()
        .unwrap();

    let issues = lint_graph(&registry, &GeneratorConfig::default());
    let locations: Vec<_> = issues.iter().map(|i| i.location.as_str()).collect();
    assert_eq!(
        locations,
        vec!["example.com/app/models.SWidget", "example.com/app/other.SGadget"]
    );
}

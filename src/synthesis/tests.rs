#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::classify::{ManagerBinding, ManagerInstance};
use crate::projection::ProjectionSettings;
use crate::registry::{GraphBuilder, MethodNode, QualifiedName, TypeKind, TypeNode, TypeRegistry};
use http::Method;

const MODELS: &str = "example.com/cloud/compute/models";
const APIS: &str = "example.com/cloud/apis";

const CTX: &str = "context.Context";
const CRED: &str = "example.com/cloud/mcclient.TokenCredential";
const OBJECT: &str = "example.com/x/jsonutils.JSONObject";
const DICT: &str = "*example.com/x/jsonutils.JSONDict";

fn qn(ns: &str, name: &str) -> QualifiedName {
    QualifiedName::new(ns, name)
}

fn api(name: &str) -> String {
    format!("{}.{}", APIS, name)
}

fn model(name: &str) -> String {
    format!("{}.{}", MODELS, name)
}

fn graph() -> TypeRegistry {
    let mut builder = GraphBuilder::new()
        .insert(TypeNode::new(CTX, TypeKind::Interface))
        .insert(TypeNode::new(CRED, TypeKind::Interface))
        .insert(TypeNode::new(OBJECT, TypeKind::Interface))
        .insert(TypeNode::new("example.com/x/jsonutils.JSONDict", TypeKind::Struct));
    for name in [
        "ServerCreateInput",
        "ServerListInput",
        "ServerUpdateInput",
        "ServerMigrateInput",
        "ServerMigrateOutput",
        "ServerRebuildInput",
        "ServerDetails",
    ] {
        builder = builder.insert(TypeNode::new(api(name), TypeKind::Struct));
    }

    let server = TypeNode::new(model("SServer"), TypeKind::Struct)
        .with_method(MethodNode::new(
            "GetExtraDetails",
            [CTX, CRED, OBJECT],
            [OBJECT, "error"],
        ))
        .with_method(MethodNode::new(
            "GetExtraDetailsV2",
            [CTX.to_string(), CRED.to_string(), OBJECT.to_string()],
            [api("ServerDetails"), "error".to_string()],
        ))
        .with_method(MethodNode::new(
            "ValidateUpdateData",
            [CTX.to_string(), CRED.to_string(), OBJECT.to_string(), api("ServerUpdateInput")],
            [api("ServerUpdateInput"), "error".to_string()],
        ))
        .with_method(MethodNode::new(
            "CustomizeDelete",
            [CTX, CRED, OBJECT, OBJECT],
            ["error"],
        ))
        .with_method(MethodNode::new("GetDetails", [CTX, CRED, OBJECT], [OBJECT, "error"]))
        .with_method(MethodNode::new("GetDetailsVnc", [CTX, CRED, OBJECT], [OBJECT, "error"]))
        .with_method(MethodNode::new(
            "PerformMigrate",
            [
                CTX.to_string(),
                CRED.to_string(),
                OBJECT.to_string(),
                format!("*{}", api("ServerMigrateInput")),
            ],
            [format!("*{}", api("ServerMigrateOutput")), "error".to_string()],
        ))
        .with_method(MethodNode::new(
            "PerformStart",
            [CTX, CRED, OBJECT, DICT],
            [OBJECT, "error"],
        ))
        .with_method(MethodNode::new("PerformBroken", [CTX, CRED], ["error"]))
        .with_method(
            MethodNode::new(
                "Rebuild",
                [CTX.to_string(), CRED.to_string(), format!("*{}", api("ServerRebuildInput"))],
                ["error".to_string()],
            )
            .with_comment("// +modelgen:swagger-gen-route-method=POST")
            .with_comment("// +modelgen:swagger-gen-route-path=/servers/{id}/rebuild")
            .with_comment("// +modelgen:swagger-gen-route-tag=servers"),
        );

    let server_manager = TypeNode::new(model("SServerManager"), TypeKind::Struct)
        .with_method(MethodNode::new(
            "ValidateCreateData",
            [
                CTX.to_string(),
                CRED.to_string(),
                OBJECT.to_string(),
                OBJECT.to_string(),
                api("ServerCreateInput"),
            ],
            [api("ServerCreateInput"), "error".to_string()],
        ))
        .with_method(MethodNode::new(
            "ListItemFilter",
            [CTX.to_string(), OBJECT.to_string(), CRED.to_string(), api("ServerListInput")],
            [OBJECT.to_string(), "error".to_string()],
        ));

    let disk = TypeNode::new(model("SDisk"), TypeKind::Struct);
    let disk_manager = TypeNode::new(model("SDiskManager"), TypeKind::Struct).with_method(
        MethodNode::new("ListItemFilter", [CTX, OBJECT, CRED, OBJECT], [OBJECT, "error"]),
    );

    builder
        .insert(server)
        .insert(server_manager)
        .insert(disk)
        .insert(disk_manager)
        .build()
        .unwrap()
}

fn bind<'a>(registry: &'a TypeRegistry, name: &str, instance: &'a ManagerInstance) -> ManagerBinding<'a> {
    ManagerBinding {
        model: registry.get(&qn(MODELS, name)).unwrap(),
        manager: registry
            .get(&qn(MODELS, &format!("{}Manager", name)))
            .unwrap(),
        instance,
    }
}

fn server_routes(settings: &SynthesisSettings) -> ModelRoutes {
    let registry = graph();
    let projection = ProjectionSettings::default();
    let instance = ManagerInstance::new("server", "servers").with_service("compute");
    let synthesizer = RouteSynthesizer::new(&registry, settings, &projection);
    synthesizer
        .synthesize(&bind(&registry, "SServer", &instance))
        .unwrap()
}

#[test]
fn test_verb_table() {
    assert_eq!(Verb::Create.arity(), (5, 2));
    assert_eq!(Verb::Delete.arity(), (4, 1));
    assert_eq!(Verb::List.target(), Target::Manager);
    assert_eq!(Verb::PerformAction.target(), Target::Model);
    assert_eq!(Verb::Update.http_method(), Method::PUT);
    assert_eq!(Verb::GetSpec.cardinality(), Cardinality::Many);
    assert_eq!(Verb::Get.cardinality(), Cardinality::One);
    assert_eq!(Verb::PerformAction.suffix("PerformSyncStatus"), Some("SyncStatus"));
    assert_eq!(Verb::Create.body_index(), Some(4));
    assert_eq!(Verb::List.query_index(), 3);
}

#[test]
fn test_empty_suffix_does_not_match_one_to_many_verbs() {
    let exact = MethodNode::new("GetDetails", [CTX, CRED, OBJECT], [OBJECT, "error"]);
    assert!(!Verb::GetSpec.matches_name(&exact));
    let get = MethodNode::new("GetExtraDetails", [CTX, CRED, OBJECT], [OBJECT, "error"]);
    assert!(Verb::Get.matches_name(&get));
    assert!(Verb::Get.accepts(&get));
    assert!(!Verb::Update.accepts(&get));
}

#[test]
fn test_routes_follow_verb_order() {
    let routes = server_routes(&SynthesisSettings::default());
    let kinds: Vec<_> = routes.routes.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            RouteKind::Create,
            RouteKind::Get,
            RouteKind::List,
            RouteKind::Update,
            RouteKind::Delete,
            RouteKind::GetSpec,
            RouteKind::PerformAction,
            RouteKind::PerformAction,
            RouteKind::Annotated,
        ]
    );
    assert_eq!(routes.keyword, "server");
    assert_eq!(routes.keyword_plural, "servers");
    assert_eq!(routes.service.as_deref(), Some("compute"));
}

#[test]
fn test_create_route() {
    let routes = server_routes(&SynthesisSettings::default());
    let create = routes.route(RouteKind::Create).unwrap();
    assert_eq!(create.method, Method::POST);
    assert_eq!(create.path, "/servers");
    assert_eq!(create.operation_id, "servers_create");
    assert_eq!(create.tags, vec!["servers".to_string()]);
    assert!(create.parameters.path.is_empty());
    assert_eq!(create.parameters.query, None);
    assert_eq!(
        create.parameters.body,
        Some(BodyDescriptor {
            wrapper: Some("server".to_string()),
            schema: Some(qn(APIS, "ServerCreateInput")),
        })
    );
    assert_eq!(
        create.response,
        ResponseDescriptor::Single {
            wrapper: None,
            schema: qn(APIS, "ServerCreateInput"),
        }
    );
    assert_eq!(create.handler, format!("{}.ValidateCreateData", model("SServerManager")));
}

#[test]
fn test_get_takes_first_match_and_defaults_to_the_projected_model() {
    let routes = server_routes(&SynthesisSettings::default());
    let get = routes.route(RouteKind::Get).unwrap();
    assert_eq!(get.path, "/servers/{id}");
    assert_eq!(get.parameters.path, vec!["id".to_string()]);
    assert_eq!(get.handler, format!("{}.GetExtraDetails", model("SServer")));
    assert_eq!(
        get.response,
        ResponseDescriptor::Single {
            wrapper: Some("server".to_string()),
            schema: qn("apis", "SServer"),
        }
    );
    assert_eq!(routes.routes_of(RouteKind::Get).count(), 1);
}

#[test]
fn test_list_uses_the_get_response_as_item() {
    let routes = server_routes(&SynthesisSettings::default());
    let list = routes.route(RouteKind::List).unwrap();
    assert_eq!(list.method, Method::GET);
    assert_eq!(list.path, "/servers");
    assert_eq!(list.operation_id, "servers_list");
    assert_eq!(list.parameters.query, Some(qn(APIS, "ServerListInput")));
    assert_eq!(
        list.response,
        ResponseDescriptor::List {
            wrapper: "servers".to_string(),
            item: qn("apis", "SServer"),
        }
    );
}

#[test]
fn test_list_without_get_is_skipped() {
    let registry = graph();
    let projection = ProjectionSettings::default();
    let settings = SynthesisSettings::default();
    let instance = ManagerInstance::new("disk", "disks");
    let synthesizer = RouteSynthesizer::new(&registry, &settings, &projection);
    let binding = bind(&registry, "SDisk", &instance);

    let scan = synthesizer.scan(&binding, Verb::List).unwrap();
    assert_eq!(scan.accepted.len(), 1);
    let routes = synthesizer.synthesize(&binding).unwrap();
    assert!(routes.routes.is_empty());
}

#[test]
fn test_update_and_delete_routes() {
    let routes = server_routes(&SynthesisSettings::default());
    let update = routes.route(RouteKind::Update).unwrap();
    assert_eq!(update.method, Method::PUT);
    assert_eq!(update.path, "/servers/{id}");
    assert_eq!(
        update.parameters.body,
        Some(BodyDescriptor {
            wrapper: Some("server".to_string()),
            schema: Some(qn(APIS, "ServerUpdateInput")),
        })
    );

    let delete = routes.route(RouteKind::Delete).unwrap();
    assert_eq!(delete.method, Method::DELETE);
    assert_eq!(delete.operation_id, "servers_delete");
    assert_eq!(
        delete.parameters.body,
        Some(BodyDescriptor {
            wrapper: None,
            schema: None,
        })
    );
    assert_eq!(delete.response.schema(), &qn("apis", "SServer"));
}

#[test]
fn test_get_spec_and_perform_paths_come_from_the_suffix() {
    let routes = server_routes(&SynthesisSettings::default());
    let vnc = routes.route(RouteKind::GetSpec).unwrap();
    assert_eq!(vnc.path, "/servers/{id}/vnc");
    assert_eq!(vnc.operation_id, "servers_get_vnc");
    assert_eq!(vnc.method, Method::GET);

    let actions: Vec<_> = routes
        .routes_of(RouteKind::PerformAction)
        .map(|r| (r.path.as_str(), r.operation_id.as_str()))
        .collect();
    assert_eq!(
        actions,
        vec![
            ("/servers/{id}/migrate", "servers_perform_migrate"),
            ("/servers/{id}/start", "servers_perform_start"),
        ]
    );

    let migrate = routes.routes_of(RouteKind::PerformAction).next().unwrap();
    assert_eq!(
        migrate.parameters.body,
        Some(BodyDescriptor {
            wrapper: None,
            schema: Some(qn(APIS, "ServerMigrateInput")),
        })
    );
    assert_eq!(
        migrate.response,
        ResponseDescriptor::Single {
            wrapper: None,
            schema: qn(APIS, "ServerMigrateOutput"),
        }
    );
}

#[test]
fn test_shape_warnings_do_not_drop_routes_by_default() {
    let routes = server_routes(&SynthesisSettings::default());
    let warnings: Vec<_> = routes
        .warnings
        .iter()
        .map(|w| (w.verb, w.position, w.ty.to_string()))
        .collect();
    assert_eq!(
        warnings,
        vec![
            (Verb::GetSpec, ShapePosition::Response, OBJECT.to_string()),
            (Verb::PerformAction, ShapePosition::Body, DICT.to_string()),
            (Verb::PerformAction, ShapePosition::Response, OBJECT.to_string()),
        ]
    );
    assert_eq!(
        routes.warnings[0].to_string(),
        format!("{}.GetDetailsVnc output {} is not a struct pointer", model("SServer"), OBJECT)
    );
}

#[test]
fn test_strict_shapes_disqualifies_methods() {
    let settings = SynthesisSettings {
        strict_shapes: true,
        ..SynthesisSettings::default()
    };
    let routes = server_routes(&settings);
    assert!(routes.route(RouteKind::GetSpec).is_none());
    let actions: Vec<_> = routes
        .routes_of(RouteKind::PerformAction)
        .map(|r| r.operation_id.as_str())
        .collect();
    assert_eq!(actions, vec!["servers_perform_migrate"]);
    assert_eq!(routes.warnings.len(), 3);
}

#[test]
fn test_scan_separates_arity_mismatches() {
    let registry = graph();
    let projection = ProjectionSettings::default();
    let settings = SynthesisSettings::default();
    let instance = ManagerInstance::new("server", "servers");
    let synthesizer = RouteSynthesizer::new(&registry, &settings, &projection);
    let binding = bind(&registry, "SServer", &instance);

    let scan = synthesizer.scan(&binding, Verb::PerformAction).unwrap();
    let accepted: Vec<_> = scan.accepted.iter().map(|m| m.name.as_str()).collect();
    let mismatched: Vec<_> = scan.mismatched.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(accepted, vec!["PerformMigrate", "PerformStart"]);
    assert_eq!(mismatched, vec!["PerformBroken"]);

    let get = synthesizer.scan(&binding, Verb::Get).unwrap();
    assert_eq!(get.accepted.len(), 2);

    let spec = synthesizer.scan(&binding, Verb::GetSpec).unwrap();
    let names: Vec<_> = spec.accepted.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["GetDetailsVnc"]);
}

#[test]
fn test_opaque_namespaces_carry_no_schema() {
    let registry = graph();
    let projection = ProjectionSettings::default();
    let settings = SynthesisSettings::default();
    let synthesizer = RouteSynthesizer::new(&registry, &settings, &projection);

    assert_eq!(synthesizer.structured_schema(&DICT.into()).unwrap(), None);
    assert!(!synthesizer.is_struct_pointer(&DICT.into()).unwrap());
    assert_eq!(synthesizer.structured_schema(&OBJECT.into()).unwrap(), None);
    assert_eq!(
        synthesizer
            .structured_schema(&format!("*{}", api("ServerMigrateInput")).into())
            .unwrap(),
        Some(qn(APIS, "ServerMigrateInput"))
    );

    let open = SynthesisSettings {
        opaque_namespaces: Vec::new(),
        ..SynthesisSettings::default()
    };
    let synthesizer = RouteSynthesizer::new(&registry, &open, &projection);
    assert!(synthesizer.is_struct_pointer(&DICT.into()).unwrap());
}

#[test]
fn test_annotated_route() {
    let routes = server_routes(&SynthesisSettings::default());
    let rebuild = routes.route(RouteKind::Annotated).unwrap();
    assert_eq!(rebuild.method, Method::POST);
    assert_eq!(rebuild.path, "/servers/{id}/rebuild");
    assert_eq!(rebuild.operation_id, "servers_rebuild");
    assert_eq!(rebuild.tags, vec!["servers".to_string()]);
    assert_eq!(rebuild.parameters.path, vec!["id".to_string()]);
    assert_eq!(
        rebuild.parameters.body,
        Some(BodyDescriptor {
            wrapper: None,
            schema: Some(qn(APIS, "ServerRebuildInput")),
        })
    );
}

#[test]
fn test_route_annotation_requires_method_path_and_tag() {
    let prefix = "modelgen:swagger-gen-route";
    let lines = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    let full = lines(&[
        "// +modelgen:swagger-gen-route-method=get",
        "// +modelgen:swagger-gen-route-path=/servers/{id}/{name}/logs",
        "// +modelgen:swagger-gen-route-tag=servers",
        "// +modelgen:swagger-gen-route-tag=logs",
    ]);
    let annotation = extract_route_annotation(prefix, &full).unwrap();
    assert_eq!(annotation.method, Method::GET);
    assert_eq!(annotation.tags, vec!["servers".to_string(), "logs".to_string()]);
    assert_eq!(annotation.path_params(), vec!["id".to_string(), "name".to_string()]);

    let missing_tag = lines(&[
        "// +modelgen:swagger-gen-route-method=POST",
        "// +modelgen:swagger-gen-route-path=/servers",
    ]);
    assert!(extract_route_annotation(prefix, &missing_tag).is_none());

    let bad_method = lines(&[
        "// +modelgen:swagger-gen-route-method=NOT A METHOD",
        "// +modelgen:swagger-gen-route-path=/servers",
        "// +modelgen:swagger-gen-route-tag=servers",
    ]);
    assert!(extract_route_annotation(prefix, &bad_method).is_none());
}

#[test]
fn test_routes_serialize_with_method_strings() {
    let routes = server_routes(&SynthesisSettings::default());
    let json = serde_json::to_value(&routes).unwrap();
    assert_eq!(json["routes"][0]["method"], "POST");
    assert_eq!(json["routes"][0]["kind"], "create");
    assert_eq!(json["routes"][2]["response"]["kind"], "list");
    assert_eq!(json["routes"][5]["kind"], "get_spec");
}

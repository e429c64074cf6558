use super::annotations::extract_route_annotation;
use super::descriptors::{
    BodyDescriptor, ModelRoutes, ParameterDescriptor, ResponseDescriptor, RouteDescriptor, RouteKind,
    ShapePosition, ShapeWarning,
};
use super::verbs::{Cardinality, Target, Verb};
use crate::classify::ManagerBinding;
use crate::error::GenerateError;
use crate::projection::ProjectionSettings;
use crate::registry::tags::{to_kebab_case, to_snake_case};
use crate::registry::{MethodNode, QualifiedName, TypeKind, TypeNode, TypeRegistry};
use http::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisSettings {
    /// Namespaces (matched as substrings) whose types are never treated as
    /// structured request or response objects
    pub opaque_namespaces: Vec<String>,
    /// Drop get-spec and perform-action methods whose signature fails the
    /// struct-pointer shape check instead of only warning
    pub strict_shapes: bool,
    /// Comment tag prefix of explicit route annotations
    pub route_tag_prefix: String,
    /// Name of the resource identifier placeholder in item paths
    pub id_param: String,
}

impl Default for SynthesisSettings {
    fn default() -> Self {
        SynthesisSettings {
            opaque_namespaces: vec!["jsonutils".to_string()],
            strict_shapes: false,
            route_tag_prefix: "modelgen:swagger-gen-route".to_string(),
            id_param: "id".to_string(),
        }
    }
}

/// Result of matching one verb against the methods of its target
#[derive(Debug, Clone, Default)]
pub struct VerbScan<'a> {
    /// Methods passing both filters, in declaration order
    pub accepted: Vec<&'a MethodNode>,
    /// Prefix matches with the wrong parameter or result count
    pub mismatched: Vec<&'a MethodNode>,
    pub warnings: Vec<ShapeWarning>,
}

pub struct RouteSynthesizer<'a> {
    registry: &'a TypeRegistry,
    settings: &'a SynthesisSettings,
    projection: &'a ProjectionSettings,
}

impl<'a> RouteSynthesizer<'a> {
    pub fn new(
        registry: &'a TypeRegistry,
        settings: &'a SynthesisSettings,
        projection: &'a ProjectionSettings,
    ) -> Self {
        RouteSynthesizer {
            registry,
            settings,
            projection,
        }
    }

    /// Declaration whose methods `verb` is matched against
    pub fn target_of(binding: &ManagerBinding<'a>, verb: Verb) -> &'a TypeNode {
        match verb.target() {
            Target::Manager => binding.manager,
            Target::Model => binding.model,
        }
    }

    /// Apply the prefix and arity filters for `verb`
    pub fn scan(&self, binding: &ManagerBinding<'a>, verb: Verb) -> Result<VerbScan<'a>, GenerateError> {
        let target = Self::target_of(binding, verb);
        let mut scan = VerbScan::default();
        for method in self
            .registry
            .methods_with_prefix(target, verb.prefix())
            .filter(|m| verb.matches_name(m))
        {
            if !verb.accepts(method) {
                debug!(
                    method = %method.display_name(),
                    verb = %verb,
                    params = method.params.len(),
                    results = method.results.len(),
                    "prefix matched but signature arity differs"
                );
                scan.mismatched.push(method);
                continue;
            }
            let warnings = self.shape_warnings(verb, method)?;
            let disqualified = self.settings.strict_shapes && !warnings.is_empty();
            scan.warnings.extend(warnings);
            if disqualified {
                continue;
            }
            scan.accepted.push(method);
        }
        Ok(scan)
    }

    /// Every route of one bound model
    ///
    /// Routes come out in verb order: create, get, list, update, delete,
    /// then one per get-spec method and one per perform-action method, then
    /// annotated routes. List needs a get route to take its item type from.
    pub fn synthesize(&self, binding: &ManagerBinding<'a>) -> Result<ModelRoutes, GenerateError> {
        let mut routes = Vec::new();
        let mut warnings = Vec::new();
        let mut get_schema: Option<QualifiedName> = None;

        for verb in Verb::ALL {
            let scan = self.scan(binding, verb)?;
            warnings.extend(scan.warnings);
            match verb.cardinality() {
                Cardinality::One => {
                    let Some(method) = scan.accepted.first() else {
                        continue;
                    };
                    let list_item = if verb == Verb::List {
                        match &get_schema {
                            Some(schema) => Some(schema.clone()),
                            None => {
                                debug!(
                                    model = %binding.model.name,
                                    "list filter present without a get route; list skipped"
                                );
                                continue;
                            }
                        }
                    } else {
                        None
                    };
                    let route = self.convention_route(binding, verb, method, list_item)?;
                    if verb == Verb::Get {
                        get_schema = Some(route.response.schema().clone());
                    }
                    routes.push(route);
                }
                Cardinality::Many => {
                    for method in scan.accepted {
                        routes.push(self.convention_route(binding, verb, method, None)?);
                    }
                }
            }
        }
        routes.extend(self.annotated_routes(binding)?);

        for warning in &warnings {
            warn!(model = %binding.model.name, verb = %warning.verb, "{}", warning);
        }
        info!(
            model = %binding.model.name,
            keyword = binding.singular(),
            routes = routes.len(),
            "routes synthesized"
        );
        Ok(ModelRoutes {
            model: binding.model.name.clone(),
            keyword: binding.singular().to_string(),
            keyword_plural: binding.plural().to_string(),
            service: binding.instance.service.clone(),
            routes,
            warnings,
        })
    }

    /// Whether `name` is a pointer to a struct outside the opaque namespaces
    pub fn is_struct_pointer(&self, name: &QualifiedName) -> Result<bool, GenerateError> {
        let node = self.registry.resolve(name)?;
        if node.kind != TypeKind::Pointer {
            return Ok(false);
        }
        let elem = self.registry.elem_of(node)?;
        let underlying = self.registry.underlying_of(elem)?;
        Ok(underlying.kind == TypeKind::Struct && !self.is_opaque(&elem.name))
    }

    /// Structured object named by a parameter or result type
    ///
    /// One level of pointer is looked through. Interfaces, builtins and
    /// types from opaque namespaces carry no schema.
    pub fn structured_schema(&self, name: &QualifiedName) -> Result<Option<QualifiedName>, GenerateError> {
        let mut node = self.registry.resolve(name)?;
        if node.kind == TypeKind::Pointer {
            node = self.registry.elem_of(node)?;
        }
        let underlying = self.registry.underlying_of(node)?;
        if underlying.kind != TypeKind::Struct
            || self.is_opaque(&node.name)
            || self.is_opaque(&underlying.name)
        {
            return Ok(None);
        }
        Ok(Some(node.name.clone()))
    }

    /// The model's projected declaration, the default response schema
    pub fn model_schema(&self, model: &TypeNode) -> QualifiedName {
        QualifiedName::new(
            self.projection.output_for(&model.name.namespace),
            model.name.public_name(),
        )
    }

    fn is_opaque(&self, name: &QualifiedName) -> bool {
        self.settings
            .opaque_namespaces
            .iter()
            .any(|ns| !ns.is_empty() && name.namespace.contains(ns.as_str()))
    }

    fn shape_warnings(&self, verb: Verb, method: &MethodNode) -> Result<Vec<ShapeWarning>, GenerateError> {
        let mut checks: Vec<(ShapePosition, &QualifiedName)> = Vec::new();
        if verb == Verb::PerformAction {
            if let Some(body) = method.params.get(3) {
                checks.push((ShapePosition::Body, body));
            }
        }
        if matches!(verb, Verb::PerformAction | Verb::GetSpec) {
            if let Some(output) = method.results.first() {
                checks.push((ShapePosition::Response, output));
            }
        }

        let mut out = Vec::new();
        for (position, ty) in checks {
            if !self.is_struct_pointer(ty)? {
                out.push(ShapeWarning {
                    verb,
                    method: method.display_name(),
                    position,
                    ty: ty.clone(),
                });
            }
        }
        Ok(out)
    }

    fn param_schema(&self, method: &MethodNode, index: usize) -> Result<Option<QualifiedName>, GenerateError> {
        match method.params.get(index) {
            Some(ty) => self.structured_schema(ty),
            None => Ok(None),
        }
    }

    /// The handler's own output when structured, else the wrapped model
    fn single_response(&self, binding: &ManagerBinding<'a>, method: &MethodNode) -> Result<ResponseDescriptor, GenerateError> {
        if let Some(first) = method.results.first() {
            if let Some(schema) = self.structured_schema(first)? {
                return Ok(ResponseDescriptor::Single {
                    wrapper: None,
                    schema,
                });
            }
        }
        Ok(ResponseDescriptor::Single {
            wrapper: Some(binding.singular().to_string()),
            schema: self.model_schema(binding.model),
        })
    }

    fn item_path(&self, binding: &ManagerBinding<'a>) -> String {
        format!("/{}/{{{}}}", binding.plural(), self.settings.id_param)
    }

    fn convention_route(
        &self,
        binding: &ManagerBinding<'a>,
        verb: Verb,
        method: &MethodNode,
        list_item: Option<QualifiedName>,
    ) -> Result<RouteDescriptor, GenerateError> {
        let plural = binding.plural();
        let suffix = verb.suffix(&method.name).unwrap_or_default();
        let (path, operation_id) = match verb {
            Verb::Create | Verb::List => (format!("/{}", plural), format!("{}_{}", plural, verb)),
            Verb::Get | Verb::Update | Verb::Delete => {
                (self.item_path(binding), format!("{}_{}", plural, verb))
            }
            Verb::GetSpec => (
                format!("{}/{}", self.item_path(binding), to_kebab_case(suffix)),
                format!("{}_get_{}", plural, to_snake_case(suffix)),
            ),
            Verb::PerformAction => (
                format!("{}/{}", self.item_path(binding), to_kebab_case(suffix)),
                format!("{}_perform_{}", plural, to_snake_case(suffix)),
            ),
        };

        let mut parameters = ParameterDescriptor::default();
        if verb.is_item_route() {
            parameters.path.push(self.settings.id_param.clone());
        }
        parameters.query = self.param_schema(method, verb.query_index())?;
        if let Some(index) = verb.body_index() {
            parameters.body = Some(BodyDescriptor {
                wrapper: verb.wraps_body().then(|| binding.singular().to_string()),
                schema: self.param_schema(method, index)?,
            });
        }

        let response = match list_item {
            Some(item) => ResponseDescriptor::List {
                wrapper: plural.to_string(),
                item,
            },
            None => self.single_response(binding, method)?,
        };

        Ok(RouteDescriptor {
            kind: verb.into(),
            method: verb.http_method(),
            path,
            operation_id,
            tags: vec![plural.to_string()],
            parameters,
            response,
            handler: method.display_name(),
        })
    }

    /// Routes declared through comment annotations on the model and manager
    fn annotated_routes(&self, binding: &ManagerBinding<'a>) -> Result<Vec<RouteDescriptor>, GenerateError> {
        let mut routes = Vec::new();
        for method in binding.model.methods.iter().chain(&binding.manager.methods) {
            let Some(annotation) =
                extract_route_annotation(&self.settings.route_tag_prefix, &method.comment_lines)
            else {
                continue;
            };

            let mut parameters = ParameterDescriptor {
                path: annotation.path_params(),
                ..ParameterDescriptor::default()
            };
            if let Some(last) = method.params.last() {
                let schema = self.structured_schema(last)?;
                if matches!(annotation.method, Method::POST | Method::PUT | Method::PATCH) {
                    parameters.body = Some(BodyDescriptor {
                        wrapper: None,
                        schema,
                    });
                } else {
                    parameters.query = schema;
                }
            }

            routes.push(RouteDescriptor {
                kind: RouteKind::Annotated,
                method: annotation.method,
                path: annotation.path,
                operation_id: format!("{}_{}", binding.plural(), to_snake_case(&method.name)),
                tags: annotation.tags,
                parameters,
                response: self.single_response(binding, method)?,
                handler: method.display_name(),
            });
        }
        Ok(routes)
    }
}

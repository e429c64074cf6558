//! Resource summary of synthesized routes

use crate::synthesis::{ModelRoutes, RouteKind};
use serde::Serialize;

/// One bound model as exposed by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    /// Route kinds synthesized for the model, in route order without repeats
    pub kinds: Vec<RouteKind>,
    pub keyword: String,
    pub keyword_plural: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

impl From<&ModelRoutes> for Resource {
    fn from(routes: &ModelRoutes) -> Self {
        let mut kinds: Vec<RouteKind> = Vec::new();
        for route in &routes.routes {
            if !kinds.contains(&route.kind) {
                kinds.push(route.kind);
            }
        }
        Resource {
            kinds,
            keyword: routes.keyword.clone(),
            keyword_plural: routes.keyword_plural.clone(),
            service: routes.service.clone(),
        }
    }
}

pub fn build_report<'r>(routes: impl IntoIterator<Item = &'r ModelRoutes>) -> Vec<Resource> {
    routes.into_iter().map(Resource::from).collect()
}

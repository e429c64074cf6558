use crate::registry::extract_comment_tags;
use http::Method;

/// Explicit route declared in a method's comments
///
/// ```text
/// // +modelgen:swagger-gen-route-method=POST
/// // +modelgen:swagger-gen-route-path=/servers/{id}/migrate
/// // +modelgen:swagger-gen-route-tag=servers
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteAnnotation {
    pub method: Method,
    pub path: String,
    pub tags: Vec<String>,
}

impl RouteAnnotation {
    /// Placeholder names of the path template, in order
    pub fn path_params(&self) -> Vec<String> {
        path_params(&self.path)
    }
}

/// Read a route annotation under `prefix`
///
/// All three of method, path and at least one tag must be present;
/// anything less, or an unknown HTTP method, yields `None`.
pub fn extract_route_annotation(prefix: &str, comment_lines: &[String]) -> Option<RouteAnnotation> {
    let tags = extract_comment_tags(comment_lines);
    let first = |key: String| {
        tags.get(&key)
            .and_then(|values| values.first())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let method = first(format!("{}-method", prefix))?;
    let path = first(format!("{}-path", prefix))?;
    let route_tags: Vec<String> = tags
        .get(&format!("{}-tag", prefix))
        .map(|values| {
            values
                .iter()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .collect()
        })
        .unwrap_or_default();
    if route_tags.is_empty() {
        return None;
    }

    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes()).ok()?;
    Some(RouteAnnotation {
        method,
        path,
        tags: route_tags,
    })
}

/// `{name}` placeholders of a path template
pub fn path_params(path: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            break;
        };
        let name = after[..end].trim();
        if !name.is_empty() {
            out.push(name.to_string());
        }
        rest = &after[end + 1..];
    }
    out
}

use crate::registry::MethodNode;
use http::Method;
use serde::Serialize;
use std::fmt;

/// The closed vocabulary of route conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    Create,
    Get,
    List,
    Update,
    Delete,
    GetSpec,
    PerformAction,
}

/// Which declaration carries a verb's methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Manager,
    Model,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// At most one route per model; first match in declaration order wins
    One,
    /// One route per matching method
    Many,
}

impl Verb {
    /// Synthesis order
    pub const ALL: [Verb; 7] = [
        Verb::Create,
        Verb::Get,
        Verb::List,
        Verb::Update,
        Verb::Delete,
        Verb::GetSpec,
        Verb::PerformAction,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            Verb::Create => "ValidateCreateData",
            Verb::Get => "GetExtraDetails",
            Verb::List => "ListItemFilter",
            Verb::Update => "ValidateUpdateData",
            Verb::Delete => "CustomizeDelete",
            Verb::GetSpec => "GetDetails",
            Verb::PerformAction => "Perform",
        }
    }

    pub fn target(self) -> Target {
        match self {
            Verb::Create | Verb::List => Target::Manager,
            _ => Target::Model,
        }
    }

    /// Exact (parameter count, result count)
    pub fn arity(self) -> (usize, usize) {
        match self {
            Verb::Create => (5, 2),
            Verb::List => (4, 2),
            Verb::Get => (3, 2),
            Verb::Update => (4, 2),
            Verb::Delete => (4, 1),
            Verb::GetSpec => (3, 2),
            Verb::PerformAction => (4, 2),
        }
    }

    pub fn cardinality(self) -> Cardinality {
        match self {
            Verb::GetSpec | Verb::PerformAction => Cardinality::Many,
            _ => Cardinality::One,
        }
    }

    pub fn http_method(self) -> Method {
        match self {
            Verb::Create | Verb::PerformAction => Method::POST,
            Verb::Get | Verb::List | Verb::GetSpec => Method::GET,
            Verb::Update => Method::PUT,
            Verb::Delete => Method::DELETE,
        }
    }

    /// Whether the route addresses a single resource (`/{plural}/{id}`)
    pub fn is_item_route(self) -> bool {
        !matches!(self, Verb::Create | Verb::List)
    }

    /// Parameter position of the query object
    pub fn query_index(self) -> usize {
        match self {
            Verb::Create | Verb::List => 3,
            _ => 2,
        }
    }

    /// Parameter position of the request body, for verbs that take one
    pub fn body_index(self) -> Option<usize> {
        match self {
            Verb::Create => Some(4),
            Verb::Update | Verb::Delete | Verb::PerformAction => Some(3),
            Verb::Get | Verb::List | Verb::GetSpec => None,
        }
    }

    /// Whether the request body is wrapped under the singular keyword
    pub fn wraps_body(self) -> bool {
        matches!(self, Verb::Create | Verb::Update)
    }

    /// Name remainder after the prefix, for verbs that route on it
    ///
    /// `PerformSyncStatus` yields `SyncStatus`. Verbs with a fixed path
    /// yield an empty string.
    pub fn suffix(self, method_name: &str) -> Option<&str> {
        method_name.strip_prefix(self.prefix())
    }

    /// Name-prefix match, the first of the two filters
    ///
    /// One-to-many verbs also need a non-empty suffix to route on.
    pub fn matches_name(self, method: &MethodNode) -> bool {
        match self.suffix(&method.name) {
            Some(rest) => self.cardinality() == Cardinality::One || !rest.is_empty(),
            None => false,
        }
    }

    /// Exact signature-shape match, the second filter
    pub fn accepts(self, method: &MethodNode) -> bool {
        let (params, results) = self.arity();
        method.params.len() == params && method.results.len() == results
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verb::Create => "create",
            Verb::Get => "get",
            Verb::List => "list",
            Verb::Update => "update",
            Verb::Delete => "delete",
            Verb::GetSpec => "get_spec",
            Verb::PerformAction => "perform_action",
        };
        write!(f, "{}", s)
    }
}

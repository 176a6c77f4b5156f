//! Query identity: resource kind plus a normalized parameter set

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Coarse resource family used for invalidation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Items,
    FeaturedItems,
    Item,
    UserItems,
    Swaps,
    Swap,
    UserStats,
    UserActivity,
    AdminDashboard,
    AdminItems,
    AdminUsers,
    AdminReports,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Items => "items",
            ResourceKind::FeaturedItems => "featuredItems",
            ResourceKind::Item => "item",
            ResourceKind::UserItems => "userItems",
            ResourceKind::Swaps => "swaps",
            ResourceKind::Swap => "swap",
            ResourceKind::UserStats => "userStats",
            ResourceKind::UserActivity => "userActivity",
            ResourceKind::AdminDashboard => "adminDashboard",
            ResourceKind::AdminItems => "adminItems",
            ResourceKind::AdminUsers => "adminUsers",
            ResourceKind::AdminReports => "adminReports",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cache key
///
/// Parameters are kept sorted and empty values are dropped, so two filter sets
/// that differ only by an unset field map to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    pub kind: ResourceKind,
    pub params: BTreeMap<String, String>,
}

impl QueryKey {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            params: BTreeMap::new(),
        }
    }

    /// Key for a single entity
    pub fn id(kind: ResourceKind, id: &str) -> Self {
        Self::new(kind).with_param("id", id)
    }

    pub fn with_param(mut self, name: &str, value: impl ToString) -> Self {
        let value = value.to_string();
        if !value.is_empty() {
            self.params.insert(name.to_string(), value);
        }
        self
    }

    /// Build a key from any serializable filter struct
    pub fn from_params<P: Serialize + ?Sized>(kind: ResourceKind, params: &P) -> Self {
        let mut key = Self::new(kind);
        match serde_json::to_value(params) {
            Ok(Value::Object(map)) => {
                for (name, value) in map {
                    if let Some(value) = param_value(value) {
                        key.params.insert(name, value);
                    }
                }
            }
            Ok(Value::Null) => {}
            Ok(other) => {
                if let Some(value) = param_value(other) {
                    key.params.insert("value".to_string(), value);
                }
            }
            Err(e) => {
                tracing::warn!(kind = %kind, error = %e, "Query parameters not serializable");
            }
        }
        key
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

fn param_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        Value::Array(ref a) if a.is_empty() => None,
        other => Some(other.to_string()),
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.params.is_empty() {
            let params: Vec<String> = self
                .params
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            write!(f, "{{{}}}", params.join(","))?;
        }
        Ok(())
    }
}

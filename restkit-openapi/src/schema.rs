use serde_json::Value;
use std::collections::BTreeMap;

/// Collects extra JSON Schema definitions for the `components/schemas`
/// section, beyond what the routes themselves carry.
///
/// Useful for event payloads or error shapes that never appear as a request
/// or response body but should still be documented.
#[derive(Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, Value>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema definition under the given name.
    pub fn register(&mut self, name: &str, schema: Value) {
        self.schemas.insert(name.to_string(), schema);
    }

    /// Register a type's `schemars` schema under its short type name.
    pub fn register_type<T: schemars::JsonSchema>(&mut self) {
        let name = std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or("unknown")
            .to_string();
        if let Ok(schema) = serde_json::to_value(schemars::schema_for!(T)) {
            self.schemas.insert(name, schema);
        }
    }

    /// Check whether a schema is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Consume the registry and return the schemas map.
    pub fn into_schemas(self) -> BTreeMap<String, Value> {
        self.schemas
    }
}

/// Trait for types that provide their own JSON Schema by hand.
///
/// Most types should derive `schemars::JsonSchema` instead; this seam exists
/// for schemas that schemars cannot express.
pub trait SchemaProvider {
    /// The schema name, typically the short type name.
    fn schema_name() -> &'static str;

    /// A JSON Schema representation of this type.
    fn json_schema() -> Value;

    fn register_schema(registry: &mut SchemaRegistry) {
        registry.register(Self::schema_name(), Self::json_schema());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(schemars::JsonSchema)]
    #[allow(dead_code)]
    struct Sample {
        id: u64,
    }

    #[test]
    fn registers_types_under_their_short_name() {
        let mut registry = SchemaRegistry::new();
        registry.register_type::<Sample>();
        assert!(registry.contains("Sample"));

        let schemas = registry.into_schemas();
        assert!(schemas["Sample"].get("properties").is_some());
    }
}

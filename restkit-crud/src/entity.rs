use restkit_core::EntityBinding;

/// Trait representing a database entity with a table name, id column, and
/// column list.
///
/// # Example
///
/// ```ignore
/// impl Entity for Task {
///     type Id = u64;
///     fn table_name() -> &'static str { "tasks" }
///     fn id_column() -> &'static str { "id" }
///     fn columns() -> &'static [&'static str] { &["id", "title", "done"] }
///     fn id(&self) -> &u64 { &self.id }
/// }
/// ```
pub trait Entity: Send + Sync + 'static {
    type Id: Send + Sync + ToString + 'static;

    fn table_name() -> &'static str;
    fn id_column() -> &'static str;
    fn columns() -> &'static [&'static str];
    fn id(&self) -> &Self::Id;
}

/// Produce the declarative persistence binding for an entity type, for a
/// feature module to register via
/// [`ModuleContext::bind_entity`](restkit_core::ModuleContext::bind_entity).
pub fn entity_binding<T: Entity>() -> EntityBinding {
    EntityBinding::new(T::table_name(), T::id_column(), T::columns())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        id: u64,
    }

    impl Entity for Row {
        type Id = u64;
        fn table_name() -> &'static str {
            "rows"
        }
        fn id_column() -> &'static str {
            "id"
        }
        fn columns() -> &'static [&'static str] {
            &["id", "value"]
        }
        fn id(&self) -> &u64 {
            &self.id
        }
    }

    #[test]
    fn binding_captures_table_shape() {
        let binding = entity_binding::<Row>();
        assert_eq!(binding.name, "rows");
        assert_eq!(binding.id_column, "id");
        assert_eq!(binding.columns, &["id", "value"]);
    }
}

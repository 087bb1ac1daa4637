//! Field filter metadata
//!
//! Entities declare their filterable attributes with
//! `#[derive(FilterableEntity)]`. The declared list is resolved once per
//! entity type and cached for the lifetime of the process.

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

/// Semantic type of a filterable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterCategory {
    Text,
    Number,
    Boolean,
    Date,
    Token,
    Enum,
    Identifier,
}

impl FilterCategory {
    /// Name used in error reports
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterCategory::Text => "text",
            FilterCategory::Number => "number",
            FilterCategory::Boolean => "boolean",
            FilterCategory::Date => "date",
            FilterCategory::Token => "token",
            FilterCategory::Enum => "enum",
            FilterCategory::Identifier => "identifier",
        }
    }
}

impl fmt::Display for FilterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared Rust type of an attribute's value.
#[derive(Debug, Clone, Copy)]
pub struct ValueType {
    id: TypeId,
    name: &'static str,
}

impl ValueType {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ValueType {}

/// One filterable attribute of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterField {
    /// Key expected in the filters map
    pub name: &'static str,
    /// Column the predicate is bound to
    pub column: &'static str,
    pub category: FilterCategory,
    pub value_type: ValueType,
}

impl FilterField {
    pub fn new(
        name: &'static str,
        column: &'static str,
        category: FilterCategory,
        value_type: ValueType,
    ) -> Self {
        Self {
            name,
            column,
            category,
            value_type,
        }
    }
}

/// Entity exposing filter metadata.
///
/// Implemented by `#[derive(FilterableEntity)]` macro.
pub trait FilterableEntity: 'static {
    /// Rust type name of the entity, used in logs
    const ENTITY_NAME: &'static str;

    /// Filterable fields in declaration order, flattened entities spliced in place
    fn declared_fields() -> Vec<FilterField>;

    /// Every mapped column, filterable or not
    fn declared_columns() -> Vec<&'static str>;
}

/// Resolved filter metadata of one entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    pub entity: &'static str,
    fields: Vec<FilterField>,
}

impl EntityDescriptor {
    /// Build a descriptor, keeping the first declaration of each field name
    pub fn new(entity: &'static str, declared: impl IntoIterator<Item = FilterField>) -> Self {
        let mut fields: Vec<FilterField> = Vec::new();
        for field in declared {
            if fields.iter().any(|existing| existing.name == field.name) {
                continue;
            }
            fields.push(field);
        }
        Self { entity, fields }
    }

    pub fn fields(&self) -> &[FilterField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FilterField> {
        self.fields.iter().find(|field| field.name == name)
    }
}

static DESCRIPTORS: Lazy<RwLock<HashMap<TypeId, Arc<EntityDescriptor>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Filter metadata of `E`, computed on first use and cached.
pub fn discover<E: FilterableEntity>() -> Arc<EntityDescriptor> {
    let key = TypeId::of::<E>();
    if let Some(descriptor) = DESCRIPTORS.read().get(&key) {
        return descriptor.clone();
    }

    let descriptor = Arc::new(EntityDescriptor::new(E::ENTITY_NAME, E::declared_fields()));
    tracing::debug!(
        entity = E::ENTITY_NAME,
        fields = descriptor.fields().len(),
        "Discovered filterable fields"
    );

    DESCRIPTORS
        .write()
        .entry(key)
        .or_insert(descriptor)
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Base;

    impl FilterableEntity for Base {
        const ENTITY_NAME: &'static str = "Base";

        fn declared_fields() -> Vec<FilterField> {
            vec![
                FilterField::new("insertDate", "insert_date", FilterCategory::Date, ValueType::of::<String>()),
                FilterField::new("name", "base_name", FilterCategory::Token, ValueType::of::<String>()),
            ]
        }

        fn declared_columns() -> Vec<&'static str> {
            vec!["insert_date", "base_name"]
        }
    }

    struct Child;

    impl FilterableEntity for Child {
        const ENTITY_NAME: &'static str = "Child";

        fn declared_fields() -> Vec<FilterField> {
            let mut fields = vec![FilterField::new(
                "name",
                "name",
                FilterCategory::Text,
                ValueType::of::<String>(),
            )];
            fields.extend(Base::declared_fields());
            fields
        }

        fn declared_columns() -> Vec<&'static str> {
            let mut columns = vec!["name"];
            columns.extend(Base::declared_columns());
            columns
        }
    }

    #[test]
    fn test_descriptor_deduplicates_by_name() {
        let descriptor = discover::<Child>();
        let names: Vec<_> = descriptor.fields().iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["name", "insertDate"]);
        assert_eq!(descriptor.field("name").map(|f| f.category), Some(FilterCategory::Text));
        assert_eq!(descriptor.field("missing"), None);
    }

    #[test]
    fn test_discover_is_cached() {
        let first = discover::<Base>();
        let second = discover::<Base>();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.entity, "Base");
    }

    #[test]
    fn test_value_type_identity() {
        let value_type = ValueType::of::<uuid::Uuid>();
        assert!(value_type.is::<uuid::Uuid>());
        assert!(!value_type.is::<String>());
        assert_eq!(value_type, ValueType::of::<uuid::Uuid>());
        assert!(value_type.name().ends_with("Uuid"));
    }
}

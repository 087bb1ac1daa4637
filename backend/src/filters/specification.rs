//! Filter compiler
//!
//! Turns a flat `field -> encoded value` map into one [`Predicate`] for an
//! entity type: every filterable field present in the map contributes one
//! fragment and the fragments are AND-ed in declaration order.

use std::collections::HashMap;

use super::error::FilterError;
use super::field::{EntityDescriptor, FilterField, FilterableEntity, discover};
use super::overrides::EnumRegistry;
use super::predicate::Predicate;
use super::units::{self, FieldFilter};
use crate::models::domain_registry;

/// Field filter bound to the column it applies to
#[derive(Debug)]
pub struct BoundFilter {
    pub field: FilterField,
    pub filter: Box<dyn FieldFilter>,
}

impl BoundFilter {
    pub fn predicate(&self) -> Result<Predicate, FilterError> {
        self.filter.predicate(self.field.column)
    }
}

/// Compiles filter maps into predicates.
///
/// Holds no per-call state; one builder can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct SpecificationBuilder {
    registry: EnumRegistry,
}

impl Default for SpecificationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecificationBuilder {
    /// Builder with the access-control enumerations registered
    pub fn new() -> Self {
        Self::with_registry(domain_registry().clone())
    }

    pub fn with_registry(registry: EnumRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &EnumRegistry {
        &self.registry
    }

    /// Compile `filters` for entity `E`.
    ///
    /// Unknown keys are ignored and an empty map yields [`Predicate::True`].
    /// The first invalid value aborts the whole call.
    pub fn compile<E: FilterableEntity>(
        &self,
        filters: &HashMap<String, String>,
    ) -> Result<Predicate, FilterError> {
        let descriptor = discover::<E>();
        self.compile_descriptor(&descriptor, filters)
    }

    pub fn compile_descriptor(
        &self,
        descriptor: &EntityDescriptor,
        filters: &HashMap<String, String>,
    ) -> Result<Predicate, FilterError> {
        let fragments = self
            .field_filters(descriptor, filters)?
            .iter()
            .map(BoundFilter::predicate)
            .collect::<Result<Vec<_>, _>>()?;

        let predicate = Predicate::and(fragments);
        tracing::debug!(
            entity = descriptor.entity,
            predicate = %predicate,
            "Compiled filter"
        );
        Ok(predicate)
    }

    /// Extracted units for every present, filterable field, in declaration order
    pub fn field_filters(
        &self,
        descriptor: &EntityDescriptor,
        filters: &HashMap<String, String>,
    ) -> Result<Vec<BoundFilter>, FilterError> {
        let mut bound = Vec::new();
        for field in descriptor.fields() {
            let Some(raw) = filters.get(field.name) else {
                continue;
            };

            let filter = self.extract(field, raw)?;
            match filter {
                Some(filter) => {
                    tracing::debug!(
                        entity = descriptor.entity,
                        field = field.name,
                        category = %filter.category(),
                        alternatives = filter.len(),
                        "Extracted field filter"
                    );
                    bound.push(BoundFilter {
                        field: field.clone(),
                        filter,
                    });
                }
                None => {
                    tracing::debug!(
                        entity = descriptor.entity,
                        field = field.name,
                        "Skipping empty filter value"
                    );
                }
            }
        }
        Ok(bound)
    }

    fn extract(
        &self,
        field: &FilterField,
        raw: &str,
    ) -> Result<Option<Box<dyn FieldFilter>>, FilterError> {
        if let Some(strict) = self.registry.resolve(&field.value_type, field.name, Some(raw)) {
            return Ok(strict?.map(|filter| Box::new(filter) as Box<dyn FieldFilter>));
        }
        units::extract(field.category, field.name, Some(raw))
    }
}

//! Process-wide memoization of built schemas.
//!
//! Each type gets one slot, created on first request. The slot is a
//! [`OnceCell`], so concurrent first requests for the same type run the
//! build once: one caller builds, the others block on the cell and then share
//! the published `Arc`. Lookups for other types are not blocked, since the
//! map lock is released before building starts.
//!
//! Failed builds are not cached. The error is returned to the caller that
//! ran the build and the next request tries again.

use std::any::{Any, TypeId};
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::{Lazy, OnceCell};

use super::{Describe, Schema, build_schema};
use crate::error::Error;

type Slot = Arc<OnceCell<Arc<dyn Any + Send + Sync>>>;

static GLOBAL: Lazy<SchemaRegistry> = Lazy::new(SchemaRegistry::new);

/// Concurrent map from type identity to its published schema.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    slots: DashMap<TypeId, Slot>,
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    /// Returns the schema of `T`, building and publishing it on first use.
    ///
    /// # Errors
    ///
    /// Whatever [`build_schema`] returns for `T`.
    pub fn get_or_build<T: Describe>(&self) -> Result<Arc<Schema<T>>, Error> {
        // Clone the slot out so the shard lock is not held while building.
        let slot: Slot = self.slots.entry(TypeId::of::<T>()).or_default().clone();

        let mut built = false;
        let erased = slot.get_or_try_init(|| {
            built = true;
            build_schema::<T>().map(|schema| Arc::new(schema) as Arc<dyn Any + Send + Sync>)
        })?;
        if !built {
            tracing::trace!(
                target: "jsoncodec::schema",
                type_name = std::any::type_name::<T>(),
                "schema cache hit"
            );
        }

        Arc::clone(erased)
            .downcast::<Schema<T>>()
            .map_err(|_| Error::UnsupportedType {
                type_name: std::any::type_name::<T>(),
                reason: "schema slot holds a different type".to_owned(),
            })
    }

    /// Whether a schema for `T` has been published.
    #[must_use]
    pub fn contains<T: 'static>(&self) -> bool {
        self.slots
            .get(&TypeId::of::<T>())
            .is_some_and(|slot| slot.value().get().is_some())
    }

    /// Number of published schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.value().get().is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The schema of `T` from the process-wide registry.
///
/// # Errors
///
/// Whatever [`build_schema`] returns for `T`.
pub fn schema_for<T: Describe>() -> Result<Arc<Schema<T>>, Error> {
    GLOBAL.get_or_build::<T>()
}

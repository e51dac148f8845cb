//! Asset type → version store table

use std::sync::Arc;

use crate::errors::{ExError, ExErrorKind, Result, VersioningError};
use crate::model::AssetVersionType;
use crate::ops::store::VersionStore;

type StoreTable = [Option<Arc<dyn VersionStore>>; AssetVersionType::COUNT];

/// Immutable table of version stores indexed by asset type
///
/// Built once at startup and shared behind `Arc`; lookups take no lock.
#[derive(Clone)]
pub struct TypeRouter {
    stores: StoreTable,
}

impl TypeRouter {
    pub fn builder() -> TypeRouterBuilder {
        TypeRouterBuilder::default()
    }

    /// One store per asset type, produced by `factory`
    pub fn uniform<F>(mut factory: F) -> Self
    where
        F: FnMut(AssetVersionType) -> Arc<dyn VersionStore>,
    {
        Self {
            stores: std::array::from_fn(|i| Some(factory(AssetVersionType::ALL[i]))),
        }
    }

    /// Store registered for `asset_type`
    ///
    /// # Errors
    ///
    /// `UnsupportedType` if nothing is registered for it.
    pub fn resolve(&self, asset_type: AssetVersionType) -> Result<&dyn VersionStore> {
        self.stores[asset_type.index()]
            .as_deref()
            .ok_or_else(|| VersioningError::UnsupportedType { asset_type }.into())
    }

    pub fn registered_types(&self) -> Vec<AssetVersionType> {
        AssetVersionType::ALL
            .into_iter()
            .filter(|t| self.stores[t.index()].is_some())
            .collect()
    }
}

impl std::fmt::Debug for TypeRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRouter")
            .field("registered", &self.registered_types())
            .finish()
    }
}

/// Collects store registrations before the router is frozen
pub struct TypeRouterBuilder {
    stores: StoreTable,
}

impl Default for TypeRouterBuilder {
    fn default() -> Self {
        Self {
            stores: std::array::from_fn(|_| None),
        }
    }
}

impl TypeRouterBuilder {
    /// Register `store` for `asset_type`, replacing any earlier registration
    pub fn register(mut self, asset_type: AssetVersionType, store: Arc<dyn VersionStore>) -> Self {
        self.stores[asset_type.index()] = Some(store);
        self
    }

    /// Freeze the table, requiring a store for every asset type
    ///
    /// # Errors
    ///
    /// `UnsupportedType` listing the missing types, or `InvalidConfig` if a
    /// store was registered under a type it does not serve.
    pub fn build(self) -> Result<TypeRouter> {
        let missing: Vec<AssetVersionType> = AssetVersionType::ALL
            .into_iter()
            .filter(|t| self.stores[t.index()].is_none())
            .collect();
        if let Some(&first) = missing.first() {
            let names: Vec<&str> = missing.iter().map(|t| t.as_str()).collect();
            return Err(ExError::from(VersioningError::UnsupportedType { asset_type: first })
                .with_op("build_router")
                .with_message(format!("No version store registered for: {}", names.join(", "))));
        }
        self.build_partial()
    }

    /// Freeze the table as is; unregistered types fail at `resolve`
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if a store was registered under a type it does not serve.
    pub fn build_partial(self) -> Result<TypeRouter> {
        for asset_type in AssetVersionType::ALL {
            if let Some(store) = &self.stores[asset_type.index()] {
                if store.asset_type() != asset_type {
                    return Err(ExError::new(ExErrorKind::InvalidConfig)
                        .with_op("build_router")
                        .with_asset_type(asset_type)
                        .with_message(format!(
                            "Store for {} registered under {}",
                            store.asset_type(),
                            asset_type
                        )));
                }
            }
        }
        Ok(TypeRouter {
            stores: self.stores,
        })
    }
}

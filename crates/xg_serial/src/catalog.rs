//! The contract catalog.
//!
//! A catalog holds the contracts available to a serialization run,
//! in insertion order, plus the factory map that annotation-driven
//! contracts materialize from. A process-wide catalog is available
//! through [`ContractCatalog::global`]; with the `auto_register`
//! feature it collects every contract submitted through
//! [`register_contract!`] and [`register_contract_factory!`].

use std::sync::{Arc, OnceLock};

use crate::contract::{
    Contract, DecoratorContract, ListContract, MapContract, NullContract, ObjectContract,
    ScalarContract,
};
use crate::hash::HashMap;

/// Builder signature for factory-map entries.
pub type ContractFactoryFn = fn() -> Box<dyn Contract>;

static GLOBAL_CATALOG: OnceLock<ContractCatalog> = OnceLock::new();

// -----------------------------------------------------------------------------
// ContractCatalog

/// An ordered collection of contracts and the contract factory map.
///
/// # Example
///
/// ```
/// use xg_serial::catalog::ContractCatalog;
/// use xg_serial::contract::{Contract, NullContract};
///
/// let mut catalog = ContractCatalog::new();
/// assert!(catalog.register_factory("Null", || Box::new(NullContract::new())));
/// // Keys are unique; a second registration is rejected.
/// assert!(!catalog.register_factory("Null", || Box::new(NullContract::new())));
///
/// let contract = catalog.factory("Null").map(|build| build()).unwrap();
/// assert_eq!(contract.kind(), "Null");
/// ```
pub struct ContractCatalog {
    contracts: Vec<Arc<dyn Contract>>,
    factories: HashMap<&'static str, ContractFactoryFn>,
}

impl Default for ContractCatalog {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ContractCatalog {
    /// Create an empty catalog with no contracts at all.
    pub fn empty() -> Self {
        Self {
            contracts: Vec::new(),
            factories: HashMap::default(),
        }
    }

    /// Create a catalog pre-loaded with the built-in contracts:
    /// null, scalars, list, map, annotation decorator, and the
    /// object fallback.
    pub fn new() -> Self {
        let mut catalog = Self::empty();
        catalog.register(Arc::new(NullContract::new()));

        macro_rules! register_scalars {
            ($($ty:ty),* $(,)?) => {
                $(catalog.register(Arc::new(ScalarContract::<$ty>::new()));)*
            };
        }
        register_scalars!(
            u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char,
            String,
        );

        catalog.register(Arc::new(ListContract::new()));
        catalog.register(Arc::new(MapContract::new()));
        catalog.register(Arc::new(DecoratorContract::new()));
        catalog.register(Arc::new(ObjectContract::new()));
        catalog
    }

    /// The process-wide catalog: built-ins plus, with the
    /// `auto_register` feature, everything submitted through
    /// [`register_contract!`] and [`register_contract_factory!`].
    pub fn global() -> &'static Self {
        GLOBAL_CATALOG.get_or_init(|| {
            let mut catalog = Self::new();
            catalog.auto_register();
            catalog
        })
    }

    /// Append a contract. Insertion order is resolution order for
    /// ties, so earlier registrations win over later ones.
    pub fn register(&mut self, contract: Arc<dyn Contract>) {
        self.contracts.push(contract);
    }

    /// Install a factory under a unique key. Returns `false` without
    /// replacing anything when the key is already taken.
    pub fn register_factory(&mut self, key: &'static str, build: ContractFactoryFn) -> bool {
        use hashbrown::hash_map::Entry;
        match self.factories.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(build);
                true
            }
        }
    }

    /// The registered contracts, in insertion order.
    #[inline]
    pub fn contracts(&self) -> &[Arc<dyn Contract>] {
        &self.contracts
    }

    /// Look up a factory by key.
    #[inline]
    pub fn factory(&self, key: &str) -> Option<ContractFactoryFn> {
        self.factories.get(key).copied()
    }

    /// Pull in every contract and factory submitted through the
    /// registration macros.
    #[cfg(feature = "auto_register")]
    pub fn auto_register(&mut self) {
        for registration in inventory::iter::<ContractRegistration> {
            self.register(Arc::from((registration.build)()));
        }
        for registration in inventory::iter::<FactoryRegistration> {
            self.register_factory(registration.key, registration.build);
        }
    }

    #[cfg(not(feature = "auto_register"))]
    pub fn auto_register(&mut self) {}
}

// -----------------------------------------------------------------------------
// Auto registration

/// A contract submitted for automatic catalog membership.
#[cfg(feature = "auto_register")]
pub struct ContractRegistration {
    #[doc(hidden)]
    pub build: ContractFactoryFn,
}

/// A factory submitted for the automatic factory map.
#[cfg(feature = "auto_register")]
pub struct FactoryRegistration {
    #[doc(hidden)]
    pub key: &'static str,
    #[doc(hidden)]
    pub build: ContractFactoryFn,
}

#[cfg(feature = "auto_register")]
inventory::collect!(ContractRegistration);

#[cfg(feature = "auto_register")]
inventory::collect!(FactoryRegistration);

/// Submit a contract to the global catalog.
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! register_contract {
    ($contract:expr) => {
        $crate::__private::inventory::submit! {
            $crate::catalog::ContractRegistration {
                build: || ::std::boxed::Box::new($contract),
            }
        }
    };
}

/// Submit a contract to the global catalog.
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! register_contract {
    ($contract:expr) => {};
}

/// Submit a factory to the global catalog under a unique key.
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! register_contract_factory {
    ($key:expr, $build:expr) => {
        $crate::__private::inventory::submit! {
            $crate::catalog::FactoryRegistration {
                key: $key,
                build: $build,
            }
        }
    };
}

/// Submit a factory to the global catalog under a unique key.
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! register_contract_factory {
    ($key:expr, $build:expr) => {};
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::ContractCatalog;
    use crate::contract::NullContract;

    #[test]
    fn built_ins_are_ordered() {
        let catalog = ContractCatalog::new();
        let kinds: Vec<_> = catalog.contracts().iter().map(|c| c.kind()).collect();
        assert_eq!(kinds.first(), Some(&"Null"));
        assert_eq!(kinds.last(), Some(&"Object"));
        assert!(kinds.contains(&"List"));
        assert!(kinds.contains(&"Map"));
        assert!(kinds.contains(&"Decorator"));
    }

    #[test]
    fn factory_keys_are_unique() {
        let mut catalog = ContractCatalog::empty();
        assert!(catalog.register_factory("Custom", || Box::new(NullContract::new())));
        assert!(!catalog.register_factory("Custom", || Box::new(NullContract::new())));
        assert!(catalog.factory("Custom").is_some());
        assert!(catalog.factory("Missing").is_none());
    }

    #[test]
    fn registration_order_is_preserved() {
        let mut catalog = ContractCatalog::empty();
        catalog.register(Arc::new(NullContract::new()));
        assert_eq!(catalog.contracts().len(), 1);
    }
}

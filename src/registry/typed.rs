//! Generic typed registry
//!
//! A fixed map populated once at bootstrap and read many times afterwards.

use crate::error::{Error, Result};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::{self, Debug, Display};
use std::hash::Hash;
use std::sync::Arc;
use tracing::debug;

/// Bound satisfied by every registry key type
pub trait RegistryKey: Eq + Hash + Clone + Display + Debug + Send + Sync + 'static {}

impl<T> RegistryKey for T where T: Eq + Hash + Clone + Display + Debug + Send + Sync + 'static {}

/// Exactly-one-binding map from `K` to a shared `V`
///
/// Several keys may share one `Arc<V>`; only rebinding the same key fails.
pub struct TypedRegistry<K, V: ?Sized> {
    /// Axis name, used in errors and logs
    axis: &'static str,
    /// Key → implementation
    bindings: HashMap<K, Arc<V>>,
    /// Keys in registration order
    order: Vec<K>,
}

impl<K: RegistryKey, V: ?Sized> TypedRegistry<K, V> {
    /// Create an empty registry for the named axis
    pub fn new(axis: &'static str) -> Self {
        Self {
            axis,
            bindings: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Axis name
    pub fn axis(&self) -> &'static str {
        self.axis
    }

    /// Bind `key` to `implementation`
    ///
    /// Fails with `DuplicateKey` if the key is already bound.
    pub fn register(&mut self, key: K, implementation: Arc<V>) -> Result<()> {
        if self.bindings.contains_key(&key) {
            return Err(Error::duplicate_key(self.axis, &key));
        }

        debug!(axis = self.axis, key = %key, "Registered binding");
        self.order.push(key.clone());
        self.bindings.insert(key, implementation);
        Ok(())
    }

    /// Look up the implementation bound to `key`
    ///
    /// Fails with `UnboundKey` rather than returning a default.
    pub fn resolve<Q>(&self, key: &Q) -> Result<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Display + ?Sized,
    {
        self.bindings
            .get(key)
            .cloned()
            .ok_or_else(|| Error::unbound_key(self.axis, key))
    }

    /// Whether `key` is bound
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.bindings.contains_key(key)
    }

    /// All bound keys, in registration order
    pub fn keys(&self) -> &[K] {
        &self.order
    }

    /// Bindings in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Arc<V>)> {
        self.order
            .iter()
            .filter_map(move |key| self.bindings.get_key_value(key))
    }

    /// Number of bound keys
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing is bound
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<K: RegistryKey, V: ?Sized> Debug for TypedRegistry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedRegistry")
            .field("axis", &self.axis)
            .field("keys", &self.order)
            .finish()
    }
}

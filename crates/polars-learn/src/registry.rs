use std::any::{type_name, Any};
use std::ffi::c_void;
use std::sync::Arc;

use parking_lot::Mutex;
use polars_utils::aliases::PlHashMap;

use crate::config::verbose;
use crate::error::LearnResult;
use crate::{learn_bail, learn_err};

type Owned = Arc<dyn Any + Send + Sync>;

/// Owns objects that were handed out across the foreign-call boundary.
///
/// The caller only ever sees the address of an adopted object. That address
/// stays valid until it is passed to [`ObjectRegistry::release`]; the caller
/// never frees it by other means.
pub struct ObjectRegistry {
    objects: Mutex<PlHashMap<usize, Owned>>,
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(PlHashMap::default()),
        }
    }

    /// Take ownership of `object` and return its address as handle.
    pub fn adopt<T: Any + Send + Sync>(&self, object: T) -> *const T {
        let object = Arc::new(object);
        let handle = Arc::as_ptr(&object);
        self.objects.lock().insert(handle as usize, object);
        if verbose() {
            eprintln!("registry: adopted {} at {:p}", type_name::<T>(), handle);
        }
        handle
    }

    /// Look up a registered object of type `T`.
    ///
    /// The returned `Arc` keeps the object alive even if the handle is
    /// released while it is in use.
    pub fn get<T: Any + Send + Sync>(&self, handle: *const T) -> LearnResult<Arc<T>> {
        let key = handle as usize;
        let object = self
            .objects
            .lock()
            .get(&key)
            .cloned()
            .ok_or_else(|| learn_err!(UnknownHandle: key))?;
        object.downcast::<T>().map_err(|_| {
            learn_err!(
                UnsupportedType: "handle {:#x} does not refer to a {}",
                key,
                type_name::<T>()
            )
        })
    }

    /// Drop the object behind `handle`. Releasing an unknown handle is
    /// reported, never fatal.
    pub fn release(&self, handle: *const c_void) -> LearnResult<()> {
        let key = handle as usize;
        // Drop outside of the lock.
        let removed = self.objects.lock().remove(&key);
        match removed {
            Some(_) => {
                if verbose() {
                    eprintln!("registry: released {handle:p}");
                }
                Ok(())
            },
            None => learn_bail!(UnknownHandle: key),
        }
    }

    pub fn contains(&self, handle: *const c_void) -> bool {
        self.objects.lock().contains_key(&(handle as usize))
    }

    pub fn len(&self) -> usize {
        self.objects.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

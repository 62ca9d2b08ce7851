//! Weak handles to host-owned catalog objects
//!
//! Catalog entries are owned by the catalog and can be dropped between
//! calls. Nothing outside the catalog holds a strong reference; every use
//! site upgrades through [`Handle::get`] and treats `None` as "the entry is
//! gone", never as a bug.

use std::sync::{Arc, Weak};

/// A weak reference that must be revalidated before every dereference
#[derive(Debug)]
pub struct Handle<T> {
    inner: Weak<T>,
}

impl<T> Handle<T> {
    /// Creates a handle from a strong reference without taking ownership
    pub fn from_arc(strong: &Arc<T>) -> Self {
        Self {
            inner: Arc::downgrade(strong),
        }
    }

    /// Creates a handle that was never valid
    pub fn dangling() -> Self {
        Self { inner: Weak::new() }
    }

    /// Upgrades to a strong reference if the backing object is still alive
    pub fn get(&self) -> Option<Arc<T>> {
        self.inner.upgrade()
    }

    /// True when the backing object is still alive
    pub fn is_valid(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_tracks_backing_lifetime() {
        let strong = Arc::new(42u32);
        let handle = Handle::from_arc(&strong);
        assert!(handle.is_valid());
        assert_eq!(*handle.get().unwrap(), 42);

        drop(strong);
        assert!(!handle.is_valid());
        assert!(handle.get().is_none());
    }

    #[test]
    fn test_dangling_handle() {
        let handle: Handle<u32> = Handle::dangling();
        assert!(!handle.is_valid());
    }
}

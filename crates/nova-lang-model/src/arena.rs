//! Append-only node storage and the handles that point into it.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            pub(crate) fn from_index(index: usize) -> Self {
                Self(u32::try_from(index).unwrap_or(u32::MAX))
            }

            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

define_id!(
    /// Handle to a module node.
    ModuleId
);
define_id!(
    /// Handle to a package node.
    PackageId
);
define_id!(
    /// Handle to a type element (resolved or missing).
    ClassId
);
define_id!(
    /// Handle to a method, constructor or initializer.
    ExecutableId
);
define_id!(
    /// Handle to a field, parameter or missing variable.
    VariableId
);
define_id!(
    /// Handle to a declared, fresh or capture type variable.
    TypeParamId
);

/// Append-only, index-stable node storage.
///
/// Handles are only meaningful for the arena (and so the [`crate::Universe`]) that issued them.
pub(crate) struct Arena<T> {
    items: RwLock<Vec<Arc<T>>>,
}

impl<T> Arena<T> {
    pub(crate) fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }

    pub(crate) fn alloc(&self, value: T) -> usize {
        let mut items = self.items.write();
        items.push(Arc::new(value));
        items.len() - 1
    }

    pub(crate) fn get(&self, index: usize) -> Arc<T> {
        Arc::clone(&self.items.read()[index])
    }

    pub(crate) fn len(&self) -> usize {
        self.items.read().len()
    }
}

impl<T> fmt::Debug for Arena<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena").field("len", &self.len()).finish()
    }
}

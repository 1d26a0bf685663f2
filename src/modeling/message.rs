use std::any::{Any, TypeId};
use std::fmt;

/// Bound for values that may travel through ports.
///
/// Blanket-implemented: any clonable, thread-safe, `'static` type qualifies,
/// so model payload structs need no manual opt-in.
pub trait MessageData: Any + Send + Sync + Clone {}

impl<T: Any + Send + Sync + Clone> MessageData for T {}

/// Type-erased but type-safe container for one port message.
///
/// The dynamic type is captured at construction and checked on every read,
/// so a bag of `Message`s stays homogeneous as long as insertions are
/// validated against the same `TypeId`.
pub struct Message {
    data: Box<dyn Any + Send + Sync>,
    clone_fn: fn(&dyn Any) -> Box<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl Message {
    /// Wrap a value, capturing its dynamic type.
    pub fn new<T: MessageData>(value: T) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            data: Box::new(value),
            clone_fn: |any| {
                let typed = any.downcast_ref::<T>().expect("type mismatch in clone_fn");
                Box::new(typed.clone())
            },
        }
    }

    /// Get a reference to the contained value, or `None` on a type mismatch.
    pub fn downcast_ref<T: MessageData>(&self) -> Option<&T> {
        self.data.downcast_ref::<T>()
    }

    /// Get the type ID of the contained value.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Get the type name of the contained value.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Check if the contained value is of type T.
    pub fn is_type<T: 'static>(&self) -> bool {
        TypeId::of::<T>() == self.type_id
    }
}

impl Clone for Message {
    fn clone(&self) -> Self {
        Self {
            data: (self.clone_fn)(self.data.as_ref()),
            clone_fn: self.clone_fn,
            type_id: self.type_id,
            type_name: self.type_name,
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("type", &self.type_name)
            .finish()
    }
}

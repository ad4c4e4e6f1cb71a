//! Specialized collection types

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable handle to an instance stored in a container.
    ///
    /// Keys stay valid while the instance is live or pending deletion. Once the
    /// instance is flushed (recycled or dropped) the key resolves to nothing,
    /// so code holding a stale key never observes a recycled instance.
    pub struct InstanceKey;
}

/// Arena holding every instance owned by a container
pub type InstanceArena<T> = SlotMap<InstanceKey, T>;

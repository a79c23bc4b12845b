//! Typed handles for pooled simulation objects
//!
//! Targets and popups live in slot maps so stale handles held by the
//! renderer or the orchestrator can never alias a newer object.

pub use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Stable handle to a target in the target pool
    pub struct TargetId;

    /// Stable handle to a feedback popup
    pub struct PopupId;
}

/// Handle-based map keyed by target handles
pub type TargetMap<T> = SlotMap<TargetId, T>;

/// Handle-based map keyed by popup handles
pub type PopupMap<T> = SlotMap<PopupId, T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removed_handle_is_stale() {
        let mut map: TargetMap<u32> = TargetMap::with_key();
        let a = map.insert(1);
        map.remove(a);
        let b = map.insert(2);
        assert_ne!(a, b);
        assert!(map.get(a).is_none());
        assert_eq!(map.get(b), Some(&2));
    }
}

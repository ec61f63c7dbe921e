use std::collections::BTreeSet;

use super::{ContainerError, Handle};

/// Default number of slots in a container.
pub const MAX_CONTAINER_OBJECTS: u32 = 100;

type Allocator<T, S> = Box<dyn FnMut(S) -> T>;
type Deallocator<T> = Box<dyn FnMut(T)>;

/// Fixed-capacity arena that owns objects of type `T` and addresses them by [`Handle`].
///
/// Objects are built by a caller-supplied allocator seeded with a value of type `S`
/// and disposed of by a caller-supplied deallocator. The container never grows past
/// the capacity it was constructed with.
///
/// Invariant: every slot index below `largest_assigned` is either occupied or listed
/// in `free`, never both.
pub struct HandleContainer<T, S = ()> {
    allocate: Allocator<T, S>,
    deallocate: Deallocator<T>,

    slots: Vec<Option<T>>,

    /// High-water mark: the next never-used slot index.
    largest_assigned: usize,

    /// Freed slot indices, reissued lowest-first.
    free: BTreeSet<usize>,
}

impl<T, S> HandleContainer<T, S> {
    /// Creates a container with [`MAX_CONTAINER_OBJECTS`] slots.
    pub fn new(
        allocate: impl FnMut(S) -> T + 'static,
        deallocate: impl FnMut(T) + 'static,
    ) -> Self {
        Self::with_capacity(MAX_CONTAINER_OBJECTS, allocate, deallocate)
    }

    pub fn with_capacity(
        capacity: u32,
        allocate: impl FnMut(S) -> T + 'static,
        deallocate: impl FnMut(T) + 'static,
    ) -> Self {
        let mut slots = Vec::with_capacity(capacity as usize);
        slots.resize_with(capacity as usize, || None);

        Self {
            allocate: Box::new(allocate),
            deallocate: Box::new(deallocate),
            slots,
            largest_assigned: 0,
            free: BTreeSet::new(),
        }
    }

    /// Allocates a new object from `seed` and returns its handle.
    ///
    /// The lowest freed slot is reused before the high-water mark advances.
    /// Returns `None` when every slot is occupied; the allocator is not invoked
    /// in that case.
    pub fn create(&mut self, seed: S) -> Option<Handle> {
        let index = if let Some(index) = self.free.pop_first() {
            index
        } else if self.largest_assigned < self.slots.len() {
            self.largest_assigned += 1;
            self.largest_assigned - 1
        } else {
            return None;
        };

        self.slots[index] = Some((self.allocate)(seed));
        Some(Handle::from_raw(index as u32))
    }

    /// Deallocates the object at `id` and frees its slot for reuse.
    pub fn destroy(&mut self, id: Handle) -> Result<(), ContainerError> {
        let object = self
            .slots
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(ContainerError::OutOfRange { id })?;

        (self.deallocate)(object);
        self.free.insert(id.index());
        Ok(())
    }

    #[inline]
    pub fn get(&self, id: Handle) -> Option<&T> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    #[inline]
    pub fn get_mut(&mut self, id: Handle) -> Option<&mut T> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Returns `true` iff `id` currently references a live object.
    #[inline]
    pub fn is_valid_id(&self, id: Handle) -> bool {
        self.get(id).is_some()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.largest_assigned - self.free.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates live objects in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.slots[..self.largest_assigned]
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|obj| (Handle::from_raw(i as u32), obj)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle, &mut T)> {
        self.slots[..self.largest_assigned]
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|obj| (Handle::from_raw(i as u32), obj)))
    }
}

impl<T, S> Drop for HandleContainer<T, S> {
    fn drop(&mut self) {
        for slot in &mut self.slots[..self.largest_assigned] {
            if let Some(object) = slot.take() {
                (self.deallocate)(object);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;

    struct TestObject {
        value: u32,
    }

    /// Builds a container whose allocator/deallocator pair maintains `live`.
    fn tracked(capacity: u32) -> (HandleContainer<TestObject, Option<u32>>, Rc<Cell<u32>>) {
        let live = Rc::new(Cell::new(0u32));
        let on_alloc = Rc::clone(&live);
        let on_free = Rc::clone(&live);

        let container = HandleContainer::with_capacity(
            capacity,
            move |seed: Option<u32>| {
                on_alloc.set(on_alloc.get() + 1);
                TestObject { value: seed.unwrap_or(3) }
            },
            move |_obj: TestObject| on_free.set(on_free.get() - 1),
        );

        (container, live)
    }

    // ── lifetime accounting ───────────────────────────────────────────────

    #[test]
    fn drop_deallocates_every_created_object() {
        let (mut container, live) = tracked(MAX_CONTAINER_OBJECTS);
        container.create(None);
        assert_eq!(live.get(), 1);

        drop(container);
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn create_multiple_objects() {
        let (mut container, live) = tracked(MAX_CONTAINER_OBJECTS);
        container.create(None);
        container.create(None);
        container.create(None);
        assert_eq!(live.get(), 3);
        assert_eq!(container.len(), 3);

        drop(container);
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn destroy_releases_one_object() {
        let (mut container, live) = tracked(MAX_CONTAINER_OBJECTS);
        container.create(None);
        let id = container.create(None).unwrap();
        container.create(None);

        container.destroy(id).unwrap();
        assert_eq!(live.get(), 2);
        assert_eq!(container.len(), 2);

        drop(container);
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn live_count_tracks_mixed_sequences() {
        let (mut container, live) = tracked(8);
        let mut ids = Vec::new();
        for round in 0..5 {
            for _ in 0..3 {
                if let Some(id) = container.create(None) {
                    ids.push(id);
                }
            }
            if round % 2 == 0 {
                let id = ids.remove(0);
                container.destroy(id).unwrap();
            }
            assert_eq!(live.get() as usize, ids.len());
            assert_eq!(container.len(), ids.len());
        }

        drop(container);
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn drop_deallocates_in_slot_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&order);
        let mut container: HandleContainer<u32, u32> =
            HandleContainer::new(|v| v, move |v| seen.borrow_mut().push(v));

        for v in [10, 11, 12, 13] {
            container.create(v);
        }
        container.destroy(Handle::from_raw(1)).unwrap();
        order.borrow_mut().clear();

        drop(container);
        assert_eq!(*order.borrow(), vec![10, 12, 13]);
    }

    // ── destroy errors ────────────────────────────────────────────────────

    #[test]
    fn destroy_unknown_id_is_out_of_range() {
        let (mut container, live) = tracked(MAX_CONTAINER_OBJECTS);
        container.create(None);
        container.create(None);
        container.create(None);

        let err = container.destroy(Handle::from_raw(100)).unwrap_err();
        assert_eq!(err, ContainerError::OutOfRange { id: Handle::from_raw(100) });
        assert_eq!(live.get(), 3);
    }

    #[test]
    fn double_destroy_is_out_of_range() {
        let (mut container, live) = tracked(4);
        let id = container.create(None).unwrap();
        container.destroy(id).unwrap();

        assert!(container.destroy(id).is_err());
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn error_message_names_the_id() {
        let err = ContainerError::OutOfRange { id: Handle::from_raw(7) };
        assert_eq!(err.to_string(), "invalid object id: 7");
    }

    // ── is_valid_id ───────────────────────────────────────────────────────

    #[test]
    fn valid_ids_for_live_objects() {
        let (mut container, _live) = tracked(MAX_CONTAINER_OBJECTS);
        let a = container.create(None).unwrap();
        let b = container.create(None).unwrap();
        let c = container.create(None).unwrap();

        assert!(container.is_valid_id(a));
        assert!(container.is_valid_id(b));
        assert!(container.is_valid_id(c));
    }

    #[test]
    fn invalid_ids() {
        let (mut container, _live) = tracked(MAX_CONTAINER_OBJECTS);
        let a = container.create(None).unwrap();
        let b = container.create(None).unwrap();
        container.destroy(b).unwrap();

        assert!(container.is_valid_id(a));
        assert!(!container.is_valid_id(b)); // destroyed
        assert!(!container.is_valid_id(Handle::from_raw(5))); // above high-water mark
        assert!(!container.is_valid_id(Handle::from_raw(100))); // beyond capacity
    }

    // ── id reuse ──────────────────────────────────────────────────────────

    #[test]
    fn create_reuses_destroyed_id() {
        let (mut container, _live) = tracked(MAX_CONTAINER_OBJECTS);
        let first = container.create(None).unwrap();
        container.destroy(first).unwrap();

        assert_eq!(container.create(None), Some(first));
    }

    #[test]
    fn reuse_is_lowest_free_first() {
        let (mut container, _live) = tracked(MAX_CONTAINER_OBJECTS);
        let a = container.create(None).unwrap();
        let _b = container.create(None).unwrap();
        let c = container.create(None).unwrap();
        let _d = container.create(None).unwrap();

        container.destroy(c).unwrap();
        container.destroy(a).unwrap();

        assert_eq!(container.create(None), Some(Handle::from_raw(0)));
        assert_eq!(container.create(None), Some(Handle::from_raw(2)));
        assert_eq!(container.create(None), Some(Handle::from_raw(4)));
    }

    // ── payload / access ──────────────────────────────────────────────────

    #[test]
    fn create_passes_seed_to_allocator() {
        let (mut container, _live) = tracked(MAX_CONTAINER_OBJECTS);
        let id = container.create(Some(42)).unwrap();
        let default = container.create(None).unwrap();

        assert_eq!(container.get(id).map(|o| o.value), Some(42));
        assert_eq!(container.get(default).map(|o| o.value), Some(3));
    }

    #[test]
    fn get_mut_mutates_in_place() {
        let (mut container, _live) = tracked(2);
        let id = container.create(None).unwrap();
        if let Some(obj) = container.get_mut(id) {
            obj.value = 9;
        }
        assert_eq!(container.get(id).map(|o| o.value), Some(9));
    }

    #[test]
    fn iter_skips_free_slots() {
        let (mut container, _live) = tracked(5);
        for v in 0..4 {
            container.create(Some(v));
        }
        container.destroy(Handle::from_raw(2)).unwrap();

        let values: Vec<_> = container.iter().map(|(id, o)| (id.raw(), o.value)).collect();
        assert_eq!(values, vec![(0, 0), (1, 1), (3, 3)]);
    }

    // ── capacity ──────────────────────────────────────────────────────────

    #[test]
    fn create_past_capacity_returns_none() {
        let (mut container, live) = tracked(MAX_CONTAINER_OBJECTS);
        for _ in 0..MAX_CONTAINER_OBJECTS {
            assert!(container.create(None).is_some());
        }

        assert_eq!(container.create(None), None);
        assert_eq!(live.get(), MAX_CONTAINER_OBJECTS);

        drop(container);
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn full_container_accepts_after_destroy() {
        let (mut container, live) = tracked(2);
        let a = container.create(None).unwrap();
        container.create(None).unwrap();
        assert_eq!(container.create(None), None);

        container.destroy(a).unwrap();
        assert_eq!(container.create(None), Some(a));
        assert_eq!(live.get(), 2);
    }
}

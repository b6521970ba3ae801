//! Fixed-slot ring buffer for frame snapshot handoff
//!
//! A producer (the main thread) deep-copies a transient frame snapshot
//! into a reusable slot, marks it busy, and hands the slot to a render
//! command; the render thread reads the payload and marks the slot free
//! again. The two threads never touch the same buffer simultaneously and
//! nothing is allocated per frame once the ring exists.
//!
//! Slot state transitions are strictly `Free -> Busy` (producer, on
//! acquisition) and `Busy -> Free` (consumer, after its last read); any
//! other transition is a bug and trips an assertion.
//!
//! A blocked acquisition waits on a condition variable rather than
//! spinning over the slot indices; while blocked it periodically logs and
//! counts starvation so a stalled render thread is visible instead of a
//! silent hang.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

struct SlotInner<T> {
    payload: T,
    busy: bool,
    /// Consumers that still have to release this frame's payload.
    /// 1 for the single-consumer path; `expect_consumers` arms fan-out.
    pending_consumers: u32,
}

/// One reusable snapshot storage location
pub struct FrameSlot<T> {
    index: usize,
    inner: Mutex<SlotInner<T>>,
    freed: Condvar,
}

impl<T> FrameSlot<T> {
    fn new(index: usize, payload: T) -> Self {
        Self {
            index,
            inner: Mutex::new(SlotInner {
                payload,
                busy: false,
                pending_consumers: 0,
            }),
            freed: Condvar::new(),
        }
    }
}

/// Producer-side handle to an acquired (busy) slot
///
/// Clonable so the fan-out path can give every consumer its own handle;
/// each consumer must call [`SlotHandle::consume_and_release`] exactly
/// once. The slot returns to free only after the last release.
///
/// Dropping every handle without releasing leaves the slot busy forever;
/// an acquired slot must always reach a consumer.
pub struct SlotHandle<T> {
    slot: Arc<FrameSlot<T>>,
}

impl<T> Clone for SlotHandle<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> SlotHandle<T> {
    /// Index of the underlying slot, for diagnostics and tests
    #[must_use]
    pub fn index(&self) -> usize {
        self.slot.index
    }

    /// Deep-copy `source` into the slot payload
    ///
    /// Uses `clone_from`, so payload allocations from earlier frames are
    /// reused where the type supports it. The copy is mandatory: the
    /// source is transient and may be mutated or freed as soon as the next
    /// tick begins, long before the render thread consumes the slot.
    pub fn fill(&self, source: &T)
    where
        T: Clone,
    {
        let mut inner = self.slot.inner.lock().expect("frame slot lock poisoned");
        assert!(inner.busy, "fill on a slot that is not acquired");
        inner.payload.clone_from(source);
    }

    /// Capture the snapshot in place through a closure
    pub fn write(&self, f: impl FnOnce(&mut T)) {
        let mut inner = self.slot.inner.lock().expect("frame slot lock poisoned");
        assert!(inner.busy, "write on a slot that is not acquired");
        f(&mut inner.payload);
    }

    /// Arm the fan-out path: the slot stays busy until `consumers`
    /// releases have happened
    ///
    /// Must be called before any handle reaches a consumer, while the
    /// producer still has sole access to the acquired slot.
    pub fn expect_consumers(&self, consumers: u32) {
        assert!(consumers >= 1, "a busy slot needs at least one consumer");
        let mut inner = self.slot.inner.lock().expect("frame slot lock poisoned");
        assert!(inner.busy, "expect_consumers on a slot that is not acquired");
        inner.pending_consumers = consumers;
    }

    /// Read the payload, then release this consumer's claim
    ///
    /// Render-thread side, called inside an executing command. The slot
    /// transitions to free (and waiting producers wake) only once every
    /// expected consumer has released.
    pub fn consume_and_release(self, f: impl FnOnce(&T)) {
        let mut inner = self.slot.inner.lock().expect("frame slot lock poisoned");
        assert!(inner.busy, "release of a slot that is not busy");
        assert!(inner.pending_consumers > 0, "more releases than expected consumers");
        f(&inner.payload);
        inner.pending_consumers -= 1;
        if inner.pending_consumers == 0 {
            inner.busy = false;
            drop(inner);
            self.slot.freed.notify_all();
        }
    }
}

/// Fixed pool of N reusable snapshot slots with a round-robin cursor
///
/// All slots are created once at construction and live for the ring's
/// full lifetime. At most N snapshots are ever in flight simultaneously.
pub struct SnapshotRing<T> {
    slots: Vec<Arc<FrameSlot<T>>>,
    cursor: usize,
    starvation_warn: Duration,
    starvations: AtomicU64,
}

impl<T: Default> SnapshotRing<T> {
    /// Create a ring of `count` slots with default-constructed payloads
    ///
    /// # Panics
    ///
    /// Panics if `count < 2`; a single slot stalls the producer every
    /// frame and gives no pipelining.
    #[must_use]
    pub fn new(count: usize, starvation_warn: Duration) -> Self {
        assert!(count >= 2, "snapshot ring needs at least 2 slots, got {count}");
        let slots = (0..count)
            .map(|index| Arc::new(FrameSlot::new(index, T::default())))
            .collect();
        Self {
            slots,
            // First acquisition advances onto slot 0.
            cursor: count - 1,
            starvation_warn,
            starvations: AtomicU64::new(0),
        }
    }
}

impl<T> SnapshotRing<T> {
    /// Advance the cursor by exactly one slot and acquire it
    ///
    /// Blocks while that slot is still busy from a previous frame. The
    /// wait is a genuine suspension on a condition variable; every
    /// `starvation_warn` interval spent blocked logs a warning and bumps
    /// the starvation counter so a stalled render thread is observable.
    pub fn acquire_next(&mut self) -> SlotHandle<T> {
        self.cursor = (self.cursor + 1) % self.slots.len();
        let slot = &self.slots[self.cursor];

        let mut inner = slot.inner.lock().expect("frame slot lock poisoned");
        while inner.busy {
            let (guard, timeout) = slot
                .freed
                .wait_timeout(inner, self.starvation_warn)
                .expect("frame slot lock poisoned");
            inner = guard;
            if timeout.timed_out() && inner.busy {
                self.starvations.fetch_add(1, Ordering::Relaxed);
                log::warn!(
                    "snapshot ring starving: slot {} busy for over {:?} (render thread stalled?)",
                    slot.index,
                    self.starvation_warn
                );
            }
        }

        inner.busy = true;
        inner.pending_consumers = 1;
        drop(inner);

        SlotHandle {
            slot: Arc::clone(slot),
        }
    }

    /// Number of slots in the ring
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Whether the slot at `index` is currently free; diagnostics only,
    /// the answer can be stale by the time the caller acts on it
    #[must_use]
    pub fn slot_is_free(&self, index: usize) -> bool {
        !self.slots[index]
            .inner
            .lock()
            .expect("frame slot lock poisoned")
            .busy
    }

    /// How many times an acquisition has waited past the warn interval
    #[must_use]
    pub fn starvation_count(&self) -> u64 {
        self.starvations.load(Ordering::Relaxed)
    }
}

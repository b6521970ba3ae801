//! Concurrency properties of the command pipeline and snapshot ring
//!
//! These tests pin down the cross-thread contract: strict FIFO execution,
//! flush completeness, full drain on shutdown, ring slot bounds, and slot
//! state-transition discipline under randomized timing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rand::Rng;

use super::ring::SnapshotRing;
use super::RenderPipeline;
use crate::config::PipelineConfig;
use crate::rhi::HeadlessContext;

fn test_pipeline() -> RenderPipeline {
    crate::foundation::logging::init_for_tests();
    RenderPipeline::init(PipelineConfig::default(), Box::new(HeadlessContext::new()))
        .expect("pipeline init")
}

#[test]
fn test_fifo_execution_order() {
    let pipeline = test_pipeline();
    let order = Arc::new(Mutex::new(Vec::new()));

    for i in 0..100u64 {
        let order = Arc::clone(&order);
        pipeline.enqueue("record_order", move |_ctx| {
            order.lock().expect("order lock").push(i);
        });
    }
    pipeline.flush();

    let recorded = order.lock().expect("order lock");
    assert_eq!(*recorded, (0..100).collect::<Vec<_>>());
    pipeline.shutdown().expect("clean shutdown");
}

#[test]
fn test_flush_with_empty_queue_returns() {
    let pipeline = test_pipeline();
    // Zero commands enqueued; the barrier alone must come back.
    pipeline.flush();
    pipeline.flush();
    pipeline.shutdown().expect("clean shutdown");
}

#[test]
fn test_flush_completeness() {
    let pipeline = test_pipeline();
    let counter = Arc::new(AtomicU64::new(0));

    const K: u64 = 50;
    for _ in 0..K {
        let counter = Arc::clone(&counter);
        pipeline.enqueue("increment", move |_ctx| {
            // Small stagger so the queue is genuinely still draining when
            // flush is called.
            std::thread::sleep(Duration::from_micros(200));
            counter.fetch_add(1, Ordering::SeqCst);
        });
    }

    pipeline.flush();
    assert_eq!(counter.load(Ordering::SeqCst), K);
    pipeline.shutdown().expect("clean shutdown");
}

#[test]
fn test_flush_covers_only_prior_commands() {
    let pipeline = test_pipeline();
    let before = Arc::new(AtomicU64::new(0));
    let concurrent = Arc::new(AtomicU64::new(0));

    const K: u64 = 25;
    for _ in 0..K {
        let before = Arc::clone(&before);
        pipeline.enqueue("pre_flush", move |_ctx| {
            before.fetch_add(1, Ordering::SeqCst);
        });
    }

    // A second producer keeps enqueueing while the first flushes. The
    // barrier must still guarantee the first producer's K commands, no
    // matter what the other producer adds around it.
    let queue = pipeline.queue_handle();
    let other_counter = Arc::clone(&concurrent);
    let producer = std::thread::spawn(move || {
        for _ in 0..200 {
            let other = Arc::clone(&other_counter);
            queue.enqueue("concurrent", move |_ctx| {
                other.fetch_add(1, Ordering::SeqCst);
            });
        }
    });

    pipeline.flush();
    assert_eq!(before.load(Ordering::SeqCst), K);

    producer.join().expect("producer join");
    pipeline.shutdown().expect("clean shutdown");
    assert_eq!(concurrent.load(Ordering::SeqCst), 200);
}

#[test]
fn test_shutdown_drains_fully() {
    let pipeline = test_pipeline();
    let order = Arc::new(Mutex::new(Vec::new()));

    const K: u64 = 40;
    for i in 0..K {
        let order = Arc::clone(&order);
        pipeline.enqueue("drain_me", move |_ctx| {
            std::thread::sleep(Duration::from_micros(100));
            order.lock().expect("order lock").push(i);
        });
    }

    let queue = pipeline.queue_handle();
    pipeline.shutdown().expect("clean shutdown");

    let recorded = order.lock().expect("order lock");
    assert_eq!(*recorded, (0..K).collect::<Vec<_>>());
    assert_eq!(queue.executed_count(), K);
}

#[test]
fn test_drop_without_shutdown_still_drains() {
    let pipeline = test_pipeline();
    let counter = Arc::new(AtomicU64::new(0));

    for _ in 0..10 {
        let counter = Arc::clone(&counter);
        pipeline.enqueue("increment", move |_ctx| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
    }

    drop(pipeline);
    assert_eq!(counter.load(Ordering::SeqCst), 10);
}

#[test]
fn test_diagnostic_counters() {
    let pipeline = test_pipeline();
    assert_eq!(pipeline.queue().enqueued_count(), 0);

    for _ in 0..5 {
        pipeline.enqueue("noop", |_ctx| {});
    }
    assert_eq!(pipeline.queue().enqueued_count(), 5);

    pipeline.flush();
    assert_eq!(pipeline.queue().executed_count(), 5);
    pipeline.shutdown().expect("clean shutdown");
}

#[test]
fn test_ring_bound_blocks_until_release() {
    let mut ring: SnapshotRing<Vec<u64>> = SnapshotRing::new(2, Duration::from_millis(500));

    // Both slots acquired: the ring is at its bound.
    let first = ring.acquire_next();
    let second = ring.acquire_next();
    assert_eq!(first.index(), 0);
    assert_eq!(second.index(), 1);

    let releaser = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(100));
        first.consume_and_release(|_| {});
    });

    // The third acquisition targets slot 0 again and must wait for the
    // release, then deterministically reuse the freed index.
    let start = Instant::now();
    let third = ring.acquire_next();
    let waited = start.elapsed();

    assert_eq!(third.index(), 0);
    assert!(waited >= Duration::from_millis(50), "acquire returned too early: {waited:?}");

    releaser.join().expect("releaser join");
    third.consume_and_release(|_| {});
    second.consume_and_release(|_| {});
}

#[test]
fn test_ring_starvation_is_counted() {
    let mut ring: SnapshotRing<Vec<u64>> = SnapshotRing::new(2, Duration::from_millis(10));

    let first = ring.acquire_next();
    let _second = ring.acquire_next();

    let releaser = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(60));
        first.consume_and_release(|_| {});
    });

    let third = ring.acquire_next();
    releaser.join().expect("releaser join");

    assert!(ring.starvation_count() >= 1);
    third.consume_and_release(|_| {});
}

#[test]
fn test_deep_copy_isolation_through_pipeline() {
    let pipeline = test_pipeline();
    let mut ring: SnapshotRing<Vec<u64>> = pipeline.new_snapshot_ring();

    let mut source = vec![10, 20, 30];
    let handle = ring.acquire_next();
    handle.fill(&source);

    // The source is transient: overwrite it before the consumer runs.
    source.clear();
    source.extend_from_slice(&[777; 16]);

    let observed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&observed);
    pipeline.enqueue("consume_snapshot", move |_ctx| {
        handle.consume_and_release(|payload| {
            sink.lock().expect("sink lock").clone_from(payload);
        });
    });
    pipeline.flush();

    assert_eq!(*observed.lock().expect("sink lock"), vec![10, 20, 30]);
    pipeline.shutdown().expect("clean shutdown");
}

/// Slot state transitions under randomized producer/consumer timing
///
/// Records an `A` (acquire) / `R` (release) event per slot and checks that
/// every slot's history strictly alternates, i.e. no slot is ever marked
/// busy twice without an intervening free or freed without being busy.
#[test]
fn test_slot_transitions_under_stress() {
    let pipeline = test_pipeline();
    let mut ring: SnapshotRing<Vec<u64>> = pipeline.new_snapshot_ring();
    let slot_count = ring.slot_count();

    let log: Arc<Mutex<Vec<(usize, char)>>> = Arc::new(Mutex::new(Vec::new()));
    let mut rng = rand::thread_rng();

    const FRAMES: u64 = 300;
    for frame in 0..FRAMES {
        let handle = ring.acquire_next();
        let index = handle.index();
        log.lock().expect("log lock").push((index, 'A'));
        handle.write(|payload| {
            payload.clear();
            payload.push(frame);
        });

        let log = Arc::clone(&log);
        let jitter = rng.gen_range(0..400);
        pipeline.enqueue("stress_consume", move |_ctx| {
            std::thread::sleep(Duration::from_micros(jitter));
            handle.consume_and_release(|payload| {
                assert_eq!(payload, &vec![frame]);
                log.lock().expect("log lock").push((index, 'R'));
            });
        });

        if rng.gen_range(0..10) == 0 {
            std::thread::sleep(Duration::from_micros(rng.gen_range(0..300)));
        }
    }

    pipeline.shutdown().expect("clean shutdown");

    let events = log.lock().expect("log lock");
    assert_eq!(events.len(), (FRAMES as usize) * 2);
    for slot in 0..slot_count {
        let history: Vec<char> = events
            .iter()
            .filter(|(index, _)| *index == slot)
            .map(|(_, event)| *event)
            .collect();
        for pair in history.chunks(2) {
            assert_eq!(pair, ['A', 'R'], "slot {slot} transitions out of order: {history:?}");
        }
        assert_eq!(history.len() % 2, 0, "slot {slot} left busy: {history:?}");
    }
}

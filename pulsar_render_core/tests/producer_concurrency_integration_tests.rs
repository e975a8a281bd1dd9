//! Integration tests for multi-threaded batch producers
//!
//! A pool of worker threads records and pushes batches for one frame while
//! the coordinator thread drives begin/submit. Verifies the queue loses
//! nothing, per-producer order survives, and producers acquiring the same
//! views agree on slot assignments.
//!
//! Run with: cargo test --test producer_concurrency_integration_tests

mod gpu_test_utils;

use std::sync::Arc;
use std::thread;

use gpu_test_utils::create_test_context;
use pulsar_render_core::{
    ProducerKey, RenderCommand, RenderContext, ResourceHandle, SlotIndex, ViewIdentity, ViewKind,
};

const PRODUCERS: usize = 4;
const BATCHES_PER_PRODUCER: u32 = 25;

fn draw_tags(commands: &[RenderCommand]) -> Vec<u32> {
    commands
        .iter()
        .filter_map(|command| match command {
            RenderCommand::Draw { vertex_count, .. } => Some(*vertex_count),
            _ => None,
        })
        .collect()
}

fn spawn_producer(
    context: &Arc<RenderContext>,
    key: ProducerKey,
    batches: u32,
) -> thread::JoinHandle<()> {
    let context = Arc::clone(context);
    thread::spawn(move || {
        for tag in 0..batches {
            let mut recorder = context.record_batch(key);
            recorder.draw(tag, 0);
            context.push_batch(recorder.finish()).unwrap();
        }
    })
}

// ============================================================================
// CONCURRENT PRODUCER TESTS
// ============================================================================

#[test]
fn test_integration_concurrent_producers_nothing_lost() {
    let (device, context) = create_test_context(2, 64, PRODUCERS as u32);
    let context = Arc::new(context);

    let keys: Vec<ProducerKey> = (0..PRODUCERS)
        .map(|i| context.register_producer(&format!("worker-{}", i)))
        .collect();

    let handle = context.begin_frame().unwrap();
    let workers: Vec<_> = keys
        .iter()
        .map(|&key| spawn_producer(&context, key, BATCHES_PER_PRODUCER))
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
    let report = context.submit_frame(handle).unwrap();

    assert_eq!(report.batches as usize, PRODUCERS * BATCHES_PER_PRODUCER as usize);
    assert_eq!(report.commands as usize, PRODUCERS * BATCHES_PER_PRODUCER as usize);

    // One stream reached the device with every draw present
    let submissions = device.recorded_submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(
        submissions[0].commands.len(),
        PRODUCERS * BATCHES_PER_PRODUCER as usize
    );
}

#[test]
fn test_integration_stream_groups_producers_by_registration_order() {
    // Every producer's draws appear as one contiguous, in-order run in the
    // submitted stream, and the runs follow registration order.
    let (device, context) = create_test_context(2, 64, PRODUCERS as u32);
    let context = Arc::new(context);

    let keys: Vec<ProducerKey> = (0..PRODUCERS)
        .map(|i| context.register_producer(&format!("pass-{}", i)))
        .collect();

    let handle = context.begin_frame().unwrap();
    let workers: Vec<_> = keys
        .iter()
        .map(|&key| spawn_producer(&context, key, BATCHES_PER_PRODUCER))
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
    context.submit_frame(handle).unwrap();

    let stream = draw_tags(&device.recorded_submissions()[0].commands);
    let per_producer: Vec<u32> = (0..BATCHES_PER_PRODUCER).collect();
    let expected: Vec<u32> = (0..PRODUCERS).flat_map(|_| per_producer.clone()).collect();
    assert_eq!(stream, expected);
}

#[test]
fn test_integration_producers_share_descriptor_slots() {
    // All workers bind the same few views; the table must hand every thread
    // the same slot for the same view, within capacity.
    const VIEWS: u64 = 8;

    let (_device, context) = create_test_context(2, VIEWS as u32, PRODUCERS as u32);
    let context = Arc::new(context);
    let key = context.register_producer("shared-views");

    let handle = context.begin_frame().unwrap();

    let workers: Vec<_> = (0..PRODUCERS)
        .map(|_| {
            let context = Arc::clone(&context);
            thread::spawn(move || {
                (0..VIEWS)
                    .map(|id| {
                        let identity =
                            ViewIdentity::new(ResourceHandle(id), ViewKind::SampledTexture);
                        context.acquire_descriptor(identity).unwrap()
                    })
                    .collect::<Vec<SlotIndex>>()
            })
        })
        .collect();

    let mappings: Vec<Vec<SlotIndex>> =
        workers.into_iter().map(|w| w.join().unwrap()).collect();

    // Every thread observed the identical view -> slot mapping
    for mapping in &mappings[1..] {
        assert_eq!(mapping, &mappings[0]);
    }

    let mut recorder = context.record_batch(key);
    recorder.bind_descriptor_table(mappings[0][0]);
    recorder.draw(3, 0);
    context.push_batch(recorder.finish()).unwrap();
    context.submit_frame(handle).unwrap();

    // Exactly VIEWS allocations happened despite PRODUCERS * VIEWS acquires
    let stats = context.stats();
    assert_eq!(stats.descriptors.allocations, VIEWS);
    assert_eq!(
        stats.descriptors.cache_hits,
        (PRODUCERS as u64 - 1) * VIEWS
    );
}

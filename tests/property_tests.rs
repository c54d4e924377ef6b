//! Property-based tests for the Forge core.
//!
//! Uses proptest to generate random allocation patterns and process mixes
//! and verify the heap and scheduler invariants hold.

use forge_core::mm::{Heap, HeapHandle};
use forge_core::sched::ProcessState;
use forge_core::{Jiffies, KernelConfig, KernelCore, ProcessHandle};
use proptest::prelude::*;

fn noop() {}

/// Strategy for payload sizes (unaligned on purpose)
fn payload_size() -> impl Strategy<Value = usize> {
    1usize..=2048
}

#[derive(Debug, Clone)]
enum HeapOp {
    Alloc(usize),
    /// Free the live allocation at this index (modulo live count)
    Free(usize),
}

fn heap_op() -> impl Strategy<Value = HeapOp> {
    prop_oneof![
        payload_size().prop_map(HeapOp::Alloc),
        any::<usize>().prop_map(HeapOp::Free),
    ]
}

/// Chain tiles [0, hwm) and no two neighbours are both free.
fn chain_is_sound(heap: &Heap) -> bool {
    let mut expected = 0;
    for block in heap.blocks() {
        if block.offset != expected || block.size == 0 {
            return false;
        }
        expected = block.end();
    }
    let no_free_pair = heap
        .blocks()
        .windows(2)
        .all(|w| !(w[0].is_free() && w[1].is_free()));
    expected == heap.high_water_mark() && no_free_pair
}

proptest! {
    /// Freeing everything in FIFO order leaves exactly one free block
    #[test]
    fn fifo_free_coalesces_to_one_block(sizes in prop::collection::vec(payload_size(), 1..40)) {
        let mut heap = Heap::with_arena_size(256 * 1024).unwrap();
        let handles: Vec<HeapHandle> = sizes
            .iter()
            .map(|&s| heap.allocate(s).unwrap())
            .collect();

        for h in handles {
            prop_assert!(heap.free(h).is_ok());
        }

        let blocks = heap.blocks();
        prop_assert_eq!(blocks.len(), 1);
        prop_assert!(blocks[0].is_free());
        prop_assert_eq!(blocks[0].offset, 0);
        prop_assert_eq!(blocks[0].end(), heap.high_water_mark());
    }

    /// A payload survives unrelated allocate/free churn byte for byte
    #[test]
    fn payload_survives_churn(
        keep_size in payload_size(),
        ops in prop::collection::vec(heap_op(), 0..80),
    ) {
        let mut heap = Heap::with_arena_size(512 * 1024).unwrap();
        let keep = heap.allocate(keep_size).unwrap();
        let pattern: Vec<u8> = (0..keep_size).map(|i| (i * 31 % 251) as u8).collect();
        heap.payload_mut(keep).unwrap()[..keep_size].copy_from_slice(&pattern);

        let mut live: Vec<HeapHandle> = Vec::new();
        for op in ops {
            match op {
                HeapOp::Alloc(size) => {
                    if let Ok(h) = heap.allocate(size) {
                        heap.payload_mut(h).unwrap().fill(0xEE);
                        live.push(h);
                    }
                }
                HeapOp::Free(i) if !live.is_empty() => {
                    let h = live.swap_remove(i % live.len());
                    prop_assert!(heap.free(h).is_ok());
                }
                HeapOp::Free(_) => {}
            }
            prop_assert!(chain_is_sound(&heap));
        }

        prop_assert_eq!(&heap.payload(keep).unwrap()[..keep_size], &pattern[..]);
        prop_assert_eq!(heap.check_integrity(), 0);
    }

    /// Only the best priority level ever runs while it has ready work
    #[test]
    fn strict_priority(priorities in prop::collection::vec(0u8..4, 1..12), ticks in 1u64..120) {
        let clock = Jiffies::new();
        let mut k = KernelCore::new(KernelConfig::with_arena_size(256 * 1024), &clock).unwrap();
        for &p in &priorities {
            k.create_process_with(noop, p, "p").unwrap();
        }
        let best = *priorities.iter().min().unwrap();

        for _ in 0..ticks {
            clock.inc();
            let h = k.tick().unwrap();
            prop_assert_eq!(k.process(h).unwrap().priority(), best);
        }
    }

    /// Same operations on two cores give the same selections
    #[test]
    fn deterministic_replay(
        priorities in prop::collection::vec(0u8..8, 1..10),
        sleeps in prop::collection::vec((0u64..200, 1u64..30), 0..10),
    ) {
        let run = || -> Vec<Option<ProcessHandle>> {
            let clock = Jiffies::new();
            let mut k = KernelCore::new(KernelConfig::with_arena_size(256 * 1024), &clock).unwrap();
            for &p in &priorities {
                k.create_process_with(noop, p, "p").unwrap();
            }
            let mut picks = Vec::new();
            for t in 0..200u64 {
                clock.inc();
                let pick = k.tick();
                for &(at, d) in &sleeps {
                    if at == t {
                        if let Some(h) = pick {
                            k.sleep(h, d).unwrap();
                        }
                    }
                }
                picks.push(pick);
            }
            picks
        };
        prop_assert_eq!(run(), run());
    }

    /// A process slept at T for D is never selected before T+D and is
    /// back in the game on the first tick >= T+D
    #[test]
    fn deadline_respected(d in 1u64..50, others in 0usize..3) {
        let clock = Jiffies::new();
        let mut k = KernelCore::new(KernelConfig::with_arena_size(256 * 1024), &clock).unwrap();
        let p = k.create_process_with(noop, 0, "sleeper").unwrap();
        for _ in 0..others {
            k.create_process_with(noop, 1, "bg").unwrap();
        }

        clock.inc();
        prop_assert_eq!(k.tick(), Some(p));
        let t = clock.get();
        prop_assert_eq!(k.sleep(p, d).unwrap(), t + d);

        while clock.get() < t + d - 1 {
            clock.inc();
            prop_assert_ne!(k.tick(), Some(p));
            prop_assert_eq!(k.process(p).unwrap().state(), ProcessState::Waiting);
        }

        clock.inc();
        prop_assert_eq!(k.wake_waiting(), 1);
        prop_assert_eq!(k.process(p).unwrap().state(), ProcessState::Ready);
        prop_assert_eq!(k.process(p).unwrap().wake_deadline(), None);
    }
}

use super::*;

#[test]
fn fresh_allocator_starts_at_zero() {
    let mut ids = IdAllocator::new();
    assert_eq!(ids.next_image_id(), 0);
    assert_eq!(ids.next_image_id(), 1);
    assert_eq!(ids.next_frame_id(), FrameId::from_counter(0));
}

#[test]
fn namespaces_are_independent() {
    let mut ids = IdAllocator::new();
    ids.next(Namespace::Image);
    ids.next(Namespace::Image);
    assert_eq!(ids.peek(Namespace::Image), 2);
    assert_eq!(ids.peek(Namespace::Frame), 0);
}

#[test]
fn observed_ids_push_next_allocation_past_the_maximum() {
    let mut ids = IdAllocator::new();
    ids.next_image_id();
    for seen in [5, 5, 9, 3] {
        ids.observe_image(seen);
        ids.next_image_id();
    }
    assert!(ids.next_image_id() > 9);
}

#[test]
fn observe_never_moves_the_counter_backwards() {
    let mut ids = IdAllocator::new();
    ids.observe_image(20);
    ids.observe_image(3);
    assert_eq!(ids.peek(Namespace::Image), 21);
}

#[test]
fn observe_frame_reads_the_embedded_counter() {
    let mut ids = IdAllocator::new();
    ids.observe_frame(&FrameId::from_counter(7));
    assert_eq!(ids.next_frame_id(), FrameId::from_counter(8));
}

#[test]
fn observe_frame_ignores_foreign_ids() {
    let mut ids = IdAllocator::new();
    ids.observe_frame(&FrameId::from("puzzle-board"));
    assert_eq!(ids.peek(Namespace::Frame), 0);
}

#[test]
fn observe_saturates_at_the_top_of_the_range() {
    let mut ids = IdAllocator::new();
    ids.observe_image(u64::MAX);
    assert_eq!(ids.next_image_id(), u64::MAX);
    assert_eq!(ids.next_image_id(), u64::MAX);
}

#[test]
fn reset_returns_both_counters_to_initial_values() {
    let mut ids = IdAllocator::new();
    ids.observe_image(4);
    ids.observe_frame(&FrameId::from_counter(4));
    ids.reset();
    assert_eq!(ids.next_image_id(), 0);
    assert_eq!(ids.next_frame_id().as_str(), "game-0");
}

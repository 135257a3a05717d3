// src/trace/tests/overflow.rs

use super::*;
use crate::trace::config::{HeaderFlags, QUEUE_LEN};

fn sequence_only() -> TraceConfig {
    TraceConfig {
        header: HeaderFlags::SEQUENCE,
        ..TraceConfig::bare()
    }
}

#[test]
fn test_queue_full_drops_and_counts() {
    let trace = make_trace(TraceConfig::bare(), Some(Level::Chatty));

    // 传输从不完成，第一条一直占用着槽位
    for i in 0..QUEUE_LEN - 1 {
        assert!(test_trace!(trace, Level::Info, Source::MAIN, "msg {}", i) > 0);
    }
    let before = trace.stats();
    assert_eq!(before.available, QUEUE_LEN - 1);
    assert_eq!(before.free, 0);

    assert_eq!(test_trace!(trace, Level::Info, Source::MAIN, "one too many"), 0);
    assert_eq!(trace.print(b"raw too"), 0);

    let after = trace.stats();
    assert_eq!(after.available, QUEUE_LEN - 1);
    assert_eq!(after.sequence, before.sequence.wrapping_add(2));
    assert_eq!(trace.transport().started().len(), 1);
}

#[test]
fn test_room_again_after_completion() {
    let trace = make_trace(TraceConfig::bare(), Some(Level::Chatty));
    for _ in 0..QUEUE_LEN - 1 {
        test_trace!(trace, Level::Info, Source::MAIN, "fill");
    }
    assert_eq!(test_trace!(trace, Level::Info, Source::MAIN, "dropped"), 0);

    trace.on_write_complete();
    assert_eq!(trace.stats().free, 1);
    assert!(test_trace!(trace, Level::Info, Source::MAIN, "fits") > 0);
    assert_eq!(trace.stats().free, 0);
}

#[test]
fn test_interrupt_context_rejected() {
    let trace = make_trace(TraceConfig::bare(), Some(Level::Chatty));
    trace.platform().set_context(17);
    assert!(trace.is_interrupt_context());

    assert_eq!(test_trace!(trace, Level::Error, Source::MAIN, "from isr"), 0);
    assert_eq!(trace.print(b"from isr"), 0);
    assert_eq!(trace.printf(format_args!("from isr")), 0);

    let stats = trace.stats();
    assert_eq!(stats.sequence, 3);
    assert_eq!(stats.available, 0);
    assert!(trace.transport().started().is_empty());

    trace.platform().set_context(0);
    assert!(test_trace!(trace, Level::Error, Source::MAIN, "from task") > 0);
}

#[test]
fn test_interrupt_context_filtered_not_counted() {
    let trace = make_trace(TraceConfig::bare(), Some(Level::Error));
    trace.platform().set_context(3);
    assert_eq!(test_trace!(trace, Level::Info, Source::MAIN, "filtered"), 0);
    assert_eq!(trace.stats().sequence, 0);
}

#[test]
fn test_gap_visible_in_sequence() {
    let trace = make_trace(sequence_only(), Some(Level::Chatty));
    test_trace!(trace, Level::Info, Source::MAIN, "a");
    trace.platform().set_context(1);
    test_trace!(trace, Level::Info, Source::MAIN, "lost");
    trace.platform().set_context(0);
    test_trace!(trace, Level::Info, Source::MAIN, "b");
    drain_all(&trace);

    assert_eq!(trace.transport().started_text(), [":00 I a", ":02 I b"]);
}

#[test]
fn test_sequence_wraps() {
    // 8 位计数器：丢失 256 条与没有丢失无法区分
    let trace = make_trace(sequence_only(), Some(Level::Chatty));
    trace.platform().set_context(1);
    for _ in 0..256 {
        test_trace!(trace, Level::Info, Source::MAIN, "lost");
    }
    trace.platform().set_context(0);
    assert_eq!(trace.stats().sequence, 0);
    test_trace!(trace, Level::Info, Source::MAIN, "next");
    assert_eq!(trace.transport().started_text(), [":00 I next"]);
}

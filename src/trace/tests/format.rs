// src/trace/tests/format.rs

use super::*;
use crate::trace::config::{HeaderFlags, SLOT_CAPACITY};

fn last_text(trace: &TestTrace) -> String {
    trace.transport().started_text().pop().unwrap_or_default()
}

#[test]
fn test_full_header() {
    let config = TraceConfig {
        header: HeaderFlags::all(),
        ..TraceConfig::bare()
    };
    let trace = make_trace(config, Some(Level::Chatty));
    trace.platform().set_ticks(0xbeef);
    let site = CallSite::new("radio", 88, Some("scan"));
    trace.printf_leveled(Level::Info, Source::BLE, Some(&site), format_args!("ch {}\n", 37));
    // 任务上下文的上下文标记总是 00
    assert_eq!(last_text(&trace), "^0000beef :00 {00} radio[88] scan() I ch 37\n");
}

#[test]
fn test_default_header() {
    let trace = make_trace(TraceConfig::DEFAULT, Some(Level::Chatty));
    drain_all(&trace);
    trace.platform().set_ticks(0x10);
    let site = CallSite::new("main", 5, Some("run"));
    trace.printf_leveled(Level::Error, Source::MAIN, Some(&site), format_args!("x\n"));
    // 序号 01：横幅已经用掉了 00
    assert_eq!(last_text(&trace), "^00000010 :01 main[5] run() E x\n");
}

#[test]
fn test_short_message_has_no_location() {
    let trace = make_trace(
        TraceConfig {
            header: HeaderFlags::TIMESTAMP | HeaderFlags::LOCATION,
            ..TraceConfig::bare()
        },
        Some(Level::Chatty),
    );
    test_trace!(trace, Level::Debug, Source::MAIN, "short\n");
    assert_eq!(last_text(&trace), "^00000000 D short\n");
}

#[test]
fn test_func_message() {
    let trace = make_trace(
        TraceConfig {
            header: HeaderFlags::LOCATION | HeaderFlags::FUNCTION,
            ..TraceConfig::bare()
        },
        Some(Level::Chatty),
    );
    let site = CallSite::new("gatt", 12, Some("notify"));
    let n = trace.printf_leveled(Level::Func, Source::MAIN, Some(&site), format_args!("> \n"));
    assert_eq!(last_text(&trace), "gatt[12] notify() > \n");
    assert_eq!(n, "gatt[12] notify() > \n".len());
}

#[test]
fn test_truncated_message() {
    let trace = make_trace(TraceConfig::DEFAULT, Some(Level::Chatty));
    drain_all(&trace);
    let site = CallSite::new("main", 1, Some("dump"));
    let long = "0123456789".repeat(20);
    let n = trace.printf_leveled(Level::Warn, Source::MAIN, Some(&site), format_args!("{}\n", long));
    assert_eq!(n, SLOT_CAPACITY);

    let sent = trace.transport().started().pop().unwrap();
    assert_eq!(sent.len(), SLOT_CAPACITY);
    assert!(sent.ends_with(TRUNCATION_MARKER));
    assert!(sent.starts_with(b"^00000000 :01 main[1] dump() W 0123"));
}

#[test]
fn test_truncated_raw_printf() {
    let trace = make_trace(TraceConfig::bare(), None);
    let n = trace.printf(format_args!("{:>200}", "end"));
    assert_eq!(n, SLOT_CAPACITY);
    assert!(trace.transport().started()[0].ends_with(b"...\n\0"));
}

#[test]
fn test_exactly_full_is_not_truncated() {
    let trace = make_trace(TraceConfig::bare(), Some(Level::Chatty));
    // "I " + 125 字节正好占满一个槽位
    let body = "y".repeat(SLOT_CAPACITY - 2);
    let n = test_trace!(trace, Level::Info, Source::MAIN, "{}", body);
    assert_eq!(n, SLOT_CAPACITY);
    let sent = trace.transport().started().pop().unwrap();
    assert!(sent.ends_with(b"yyy"));
}

#[test]
fn test_hex_dump_lines() {
    let trace = make_trace(TraceConfig::bare(), Some(Level::Debug));
    let data: Vec<u8> = (0u8..20).collect();
    let total = trace.trace_hex(Level::Debug, Source::SYS, &data);
    drain_all(&trace);

    let lines = trace.transport().started_text();
    assert_eq!(
        lines,
        [
            "D 00 01 02 03 04 05 06 07 08 09 0a 0b 0c 0d 0e 0f\n",
            "D 10 11 12 13\n",
        ]
    );
    assert_eq!(total, lines.iter().map(String::len).sum::<usize>());

    assert_eq!(trace.trace_hex(Level::Chatty, Source::SYS, &data), 0);
}

// src/trace/tests/mod.rs

use std::sync::Mutex;

use super::*;
use crate::arch::HostPlatform;

// ========== 测试替身 ==========

/// 记录型传输：保存每次启动的异步写入和阻塞写入，
/// 并可预设接下来若干次写入失败
#[derive(Default)]
pub(super) struct RecordingTransport {
    started: Mutex<Vec<Vec<u8>>>,
    blocking: Mutex<Vec<Vec<u8>>>,
    refuse_next: Mutex<usize>,
}

impl RecordingTransport {
    /// 接下来 `count` 次 start_write 返回错误
    pub(super) fn refuse(&self, count: usize) {
        *self.refuse_next.lock().unwrap() = count;
    }

    pub(super) fn started(&self) -> Vec<Vec<u8>> {
        self.started.lock().unwrap().clone()
    }

    pub(super) fn started_text(&self) -> Vec<String> {
        self.started()
            .into_iter()
            .map(|m| String::from_utf8(m).unwrap())
            .collect()
    }

    pub(super) fn blocking(&self) -> Vec<Vec<u8>> {
        self.blocking.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    fn start_write(&self, data: &[u8]) -> Result<(), TxError> {
        let mut refuse = self.refuse_next.lock().unwrap();
        if *refuse > 0 {
            *refuse -= 1;
            return Err(TxError::Hardware);
        }
        self.started.lock().unwrap().push(data.to_vec());
        Ok(())
    }

    fn write_blocking(&self, data: &[u8]) {
        self.blocking.lock().unwrap().push(data.to_vec());
    }
}

pub(super) type TestTrace = TraceSubsystem<HostPlatform, RecordingTransport>;

/// 已初始化的独立实例，所有源都处于 `level`
pub(super) fn make_trace(config: TraceConfig, level: Option<Level>) -> Box<TestTrace> {
    let trace = Box::new(TraceSubsystem::new(
        config,
        HostPlatform::new(),
        RecordingTransport::default(),
    ));
    trace.init();
    if let Some(level) = level {
        for source in Source::all() {
            trace.set_level(source, level);
        }
    }
    trace
}

/// 完成所有正在进行的传输，直到引擎空闲
pub(super) fn drain_all(trace: &TestTrace) {
    while trace.stats().drain.is_active() {
        trace.on_write_complete();
    }
}

// ========== 测试辅助宏 ==========

/// 测试专用追踪宏
///
/// 模拟生产宏的行为，但操作独立的 TraceSubsystem 实例
macro_rules! test_trace {
    ($trace:expr, $level:expr, $source:expr, $($arg:tt)*) => {
        $trace.printf_leveled($level, $source, None, format_args!($($arg)*))
    };
}

mod format;
mod overflow;

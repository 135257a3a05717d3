//! 串口传输接口
//!
//! 排空引擎通过 [`Transport`] 把槽位交给外部串口驱动（通常是 DMA）。
//! 驱动在传输结束后（可能在中断上下文中）调用
//! [`TraceSubsystem::on_write_complete`](super::TraceSubsystem::on_write_complete)。

use core::fmt;

/// 异步写入被同步拒绝的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxError {
    /// 传输通道已被占用
    Busy,
    /// 缓冲区不可用于 DMA（长度或对齐）
    InvalidBuffer,
    /// 外设故障
    Hardware,
}

impl fmt::Display for TxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            TxError::Busy => "transport busy",
            TxError::InvalidBuffer => "buffer rejected by transport",
            TxError::Hardware => "transport hardware fault",
        };
        f.write_str(msg)
    }
}

/// 外部串口传输
pub trait Transport {
    /// 启动一次异步写入，不得阻塞
    ///
    /// 返回 `Ok` 后 `data` 在完成通知到达之前保持有效且不被修改；
    /// 返回 `Err` 表示传输根本没有开始，不会有完成通知。
    fn start_write(&self, data: &[u8]) -> Result<(), TxError>;

    /// 同步写入，直到数据全部发出才返回。只用于致命错误路径。
    fn write_blocking(&self, data: &[u8]);
}

impl<T: Transport + ?Sized> Transport for &T {
    fn start_write(&self, data: &[u8]) -> Result<(), TxError> {
        (**self).start_write(data)
    }

    fn write_blocking(&self, data: &[u8]) {
        (**self).write_blocking(data)
    }
}

//! 固定槽位的环形消息队列
//!
//! 单生产者单消费者 (SPSC) 设计：
//! - 生产者（任务上下文）只写 `write` 游标
//! - 消费者（传输完成回调，可能在中断上下文）只写 `read` 游标
//!
//! 两个游标各自只被一方修改，但双方都会读取，因此比较游标的
//! 那一小段代码在关闭中断的临界区内执行。始终保留一个槽位不用，
//! 以便仅凭两个游标区分"满"与"空"。

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};

use super::slot::MessageSlot;
use crate::arch::Platform;
use crate::sync::IntrGuard;

/// 队列已满时 [`CircularQueue::produce`] 返回的错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFull;

/// 由 `N` 个消息槽位组成的环形队列，`N` 必须是 2 的幂
pub struct CircularQueue<const N: usize> {
    /// 下一条待发送消息所在的槽位
    read: AtomicUsize,
    /// 下一条消息将写入的槽位
    write: AtomicUsize,
    /// 固定大小的槽位数组
    slots: [UnsafeCell<MessageSlot>; N],
}

// SAFETY: 槽位 `write` 只被生产者访问，[read, write) 之间的槽位只被消费者访问，
// 游标的发布使用 Release/Acquire 内存序。
unsafe impl<const N: usize> Sync for CircularQueue<N> {}

impl<const N: usize> CircularQueue<N> {
    const MASK: usize = {
        assert!(N.is_power_of_two() && N >= 2);
        N - 1
    };

    /// 创建一个空队列
    pub const fn new() -> Self {
        Self {
            read: AtomicUsize::new(0),
            write: AtomicUsize::new(0),
            slots: [const { UnsafeCell::new(MessageSlot::empty()) }; N],
        }
    }

    /// 槽位总数
    pub const fn capacity(&self) -> usize {
        N
    }

    /// 将两个游标归零，丢弃所有消息（仅在初始化时使用）
    pub fn reset(&self) {
        self.write.store(0, Ordering::SeqCst);
        self.read.store(0, Ordering::SeqCst);
    }

    /// 空闲槽位数（不含保留槽位）
    pub fn free_count(&self) -> usize {
        Self::free_between(self.read.load(Ordering::Acquire), self.write.load(Ordering::Acquire))
    }

    /// 等待发送的消息数
    pub fn available_count(&self) -> usize {
        let write = self.write.load(Ordering::Acquire);
        let read = self.read.load(Ordering::Acquire);
        write.wrapping_sub(read) & Self::MASK
    }

    /// 队列是否为空
    pub fn is_empty(&self) -> bool {
        self.read.load(Ordering::Acquire) == self.write.load(Ordering::Acquire)
    }

    /// 队列是否已满
    pub fn is_full(&self) -> bool {
        self.free_count() == 0
    }

    /// 在写游标处的槽位中构造一条消息并提交
    ///
    /// 队列已满时不调用 `build`，直接返回 [`QueueFull`]。
    /// 游标比较在临界区内完成；`build` 本身在临界区外运行，
    /// 因为消费者永远不会触碰写游标处的槽位。
    pub fn produce<P, F>(&self, platform: &P, build: F) -> Result<usize, QueueFull>
    where
        P: Platform + ?Sized,
        F: FnOnce(&mut MessageSlot) -> usize,
    {
        let write = {
            let _guard = IntrGuard::new(platform);
            let write = self.write.load(Ordering::Relaxed);
            if Self::free_between(self.read.load(Ordering::Acquire), write) == 0 {
                return Err(QueueFull);
            }
            write
        };

        // SAFETY: 单生产者；槽位 `write` 不在 [read, write) 内，消费者不会访问它
        let slot = unsafe { &mut *self.slots[write].get() };
        let length = build(slot);

        // 发布：Release 保证槽位内容先于游标对消费者可见
        self.write.store((write + 1) & Self::MASK, Ordering::Release);
        Ok(length)
    }

    /// 复制 `data`（最多一个槽位的容量）并提交
    pub fn push(&self, platform: &(impl Platform + ?Sized), data: &[u8]) -> bool {
        self.produce(platform, |slot| slot.fill(data)).is_ok()
    }

    /// 返回读游标处的槽位索引及其内容，不移动游标
    ///
    /// # Safety
    ///
    /// 调用者必须是唯一的消费者，并且在返回的切片仍被使用期间
    /// 不得调用 [`pop_advance`](Self::pop_advance)、[`flush`](Self::flush)
    /// 或 [`reset`](Self::reset)：读游标一旦越过该槽位，生产者就可能覆盖它。
    /// 只需要内容时使用 [`front`](Self::front)。
    pub unsafe fn pop_peek(&self, platform: &(impl Platform + ?Sized)) -> Option<(usize, &[u8])> {
        let read = self.read_position(platform)?;
        // SAFETY: 槽位 `read` 已发布，调用者保证在切片存活期间不移动读游标
        let slot = unsafe { &*self.slots[read].get() };
        Some((read, slot.as_bytes()))
    }

    /// 读游标处消息的副本及其槽位索引，不移动游标
    ///
    /// 复制在临界区内完成，完成回调无法在复制途中释放该槽位。
    pub fn front(&self, platform: &(impl Platform + ?Sized)) -> Option<(usize, MessageSlot)> {
        let _guard = IntrGuard::new(platform);
        let read = self.read_position(platform)?;
        // SAFETY: 槽位 `read` 已发布；临界区内读游标不会越过它
        let slot = unsafe { &*self.slots[read].get() };
        Some((read, slot.clone()))
    }

    /// 释放读游标处的槽位
    ///
    /// 只能在该槽位的传输完成后调用。对空队列调用无效果。
    pub fn pop_advance(&self, platform: &(impl Platform + ?Sized)) {
        let _guard = IntrGuard::new(platform);
        let read = self.read.load(Ordering::Relaxed);
        if read != self.write.load(Ordering::Acquire) {
            self.read.store((read + 1) & Self::MASK, Ordering::Release);
        }
    }

    /// 丢弃所有已排队但未发送的消息
    pub fn flush(&self, platform: &(impl Platform + ?Sized)) {
        let _guard = IntrGuard::new(platform);
        self.read
            .store(self.write.load(Ordering::Acquire), Ordering::Release);
    }

    /// 生产者一侧的丢弃：只保留最旧的 `keep` 条消息
    ///
    /// 后退的是写游标，因此正在传输的槽位（读游标处）不会被触碰。
    pub fn truncate(&self, platform: &(impl Platform + ?Sized), keep: usize) {
        let _guard = IntrGuard::new(platform);
        let read = self.read.load(Ordering::Acquire);
        let write = self.write.load(Ordering::Relaxed);
        let keep = keep.min(write.wrapping_sub(read) & Self::MASK);
        self.write.store((read + keep) & Self::MASK, Ordering::Release);
    }

    /// 当前读游标
    pub fn read_index(&self) -> usize {
        self.read.load(Ordering::Acquire)
    }

    /// 当前写游标
    pub fn write_index(&self) -> usize {
        self.write.load(Ordering::Acquire)
    }

    /// 非空时返回读游标
    fn read_position(&self, platform: &(impl Platform + ?Sized)) -> Option<usize> {
        let _guard = IntrGuard::new(platform);
        let read = self.read.load(Ordering::Relaxed);
        (read != self.write.load(Ordering::Acquire)).then_some(read)
    }

    #[inline]
    fn free_between(read: usize, write: usize) -> usize {
        // (read - write) mod N，0 表示空队列，此时全部 N 个槽位都空闲
        let mut free = read.wrapping_sub(write) & Self::MASK;
        if free == 0 {
            free = N;
        }
        free - 1
    }
}

impl<const N: usize> Default for CircularQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

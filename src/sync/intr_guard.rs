use crate::arch::{IrqState, Platform};
use core::ops::Drop;

/// 中断保护器，基于 RAII 实现中断保护。
/// 在创建时禁用可能重入追踪核心的中断并保存之前的状态；
/// 在销毁时自动恢复之前的中断状态。
/// 可以嵌套，内层守卫恢复的是外层守卫建立的状态。
pub struct IntrGuard<'a, P: Platform + ?Sized> {
    platform: &'a P,
    state: IrqState,
}

impl<'a, P: Platform + ?Sized> IntrGuard<'a, P> {
    /// 禁用中断并返回一个 IntrGuard 实例。
    /// 该实例在离开作用域时会自动恢复中断状态。
    #[inline]
    pub fn new(platform: &'a P) -> Self {
        let state = platform.disable_interrupts();
        IntrGuard { platform, state }
    }

    /// 进入临界区前保存的中断状态。
    pub fn saved_state(&self) -> IrqState {
        self.state
    }
}

/// 当 IntrGuard 离开作用域时，自动恢复中断状态。
impl<P: Platform + ?Sized> Drop for IntrGuard<'_, P> {
    #[inline]
    fn drop(&mut self) {
        self.platform.restore_interrupts(self.state);
    }
}

/// 在临界区内执行 `f`。
#[inline]
pub fn without_interrupts<P: Platform + ?Sized, R>(platform: &P, f: impl FnOnce() -> R) -> R {
    let _guard = IntrGuard::new(platform);
    f()
}

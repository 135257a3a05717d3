//! 同步原语
//!
//! 向追踪核心提供基于 [`Platform`](crate::arch::Platform) 的中断保护
mod intr_guard;

pub use intr_guard::*;

//! 确认闸门
//!
//! 单槽位：同一时刻最多一个待确认请求，新请求直接替换旧请求（后来者胜出）。
//! 取出（确认）或取消后闸门回到空闲。

use parking_lot::Mutex;

pub struct ConfirmGate<T> {
    pending: Mutex<Option<T>>,
}

impl<T> ConfirmGate<T> {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(None),
        }
    }

    /// Show a new prompt, returning the one it replaced.
    pub fn open(&self, item: T) -> Option<T> {
        self.pending.lock().replace(item)
    }

    /// Take the pending item for execution; the gate is idle afterwards.
    pub fn take(&self) -> Option<T> {
        self.pending.lock().take()
    }

    /// Drop the pending item. Returns `false` when nothing was pending.
    pub fn cancel(&self) -> bool {
        self.take().is_some()
    }

    pub fn is_open(&self) -> bool {
        self.pending.lock().is_some()
    }

    pub fn peek<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.pending.lock().as_ref().map(f)
    }
}

impl<T> Default for ConfirmGate<T> {
    fn default() -> Self {
        Self::new()
    }
}

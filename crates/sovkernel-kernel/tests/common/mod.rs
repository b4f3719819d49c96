use async_trait::async_trait;
use serde_json::{json, Value};
use sovkernel_kernel::ToolExecutor;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Records how many times it was invoked, for assertions like "the
/// executor must never run" on a scope violation. Wrapped in `Arc` so a
/// test can hold a handle after the kernel owns a boxed copy.
#[derive(Default)]
pub struct CountingExecutor {
    calls: AtomicUsize,
}

impl CountingExecutor {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ToolExecutor for CountingExecutor {
    async fn execute(&self, action: &str, args: &Value) -> Result<Value, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({"action": action, "args": args, "status": "ok"}))
    }
}

//! The out-of-scope collaborator this kernel wraps: whatever actually
//! performs a tool/action execution (file system, payment rail, model
//! provider). The kernel consumes it only through this interface.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Executes `action` with `args`, returning the tool's output or a
    /// human-readable failure message. A `Err` here is what the kernel
    /// records as `EXECUTION_FAILED`.
    async fn execute(&self, action: &str, args: &Value) -> Result<Value, String>;
}

#[async_trait]
impl<T: ToolExecutor + ?Sized> ToolExecutor for Arc<T> {
    async fn execute(&self, action: &str, args: &Value) -> Result<Value, String> {
        (**self).execute(action, args).await
    }
}

//! Deferred render command representation
//!
//! A command captures everything it needs at enqueue time and executes
//! exactly once on the render thread. Captured state crosses the thread
//! boundary only by value or through `Arc` handles; the `Send + 'static`
//! bound rejects borrows of main-thread data that may be gone by the time
//! the command runs.

use crate::rhi::GraphicsContext;

/// Boxed unit of deferred work executed against the graphics context
pub type CommandJob = Box<dyn FnOnce(&mut dyn GraphicsContext) + Send + 'static>;

/// A single deferred render command
///
/// The ordinal is a monotonically increasing sequence number assigned at
/// enqueue time, used for diagnostics and ordering assertions in tests.
pub struct RenderCommand {
    ordinal: u64,
    name: &'static str,
    job: CommandJob,
}

impl RenderCommand {
    pub(crate) fn new(ordinal: u64, name: &'static str, job: CommandJob) -> Self {
        Self { ordinal, name, job }
    }

    /// Sequence number assigned at enqueue time
    #[must_use]
    pub fn ordinal(&self) -> u64 {
        self.ordinal
    }

    /// Human-readable command name for diagnostics
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run the command body; render thread only
    pub(crate) fn execute(self, context: &mut dyn GraphicsContext) {
        (self.job)(context);
    }
}

impl std::fmt::Debug for RenderCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderCommand")
            .field("ordinal", &self.ordinal)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rhi::HeadlessContext;

    #[test]
    fn test_command_executes_once_with_captured_state() {
        let mut context = HeadlessContext::new();
        let captured: Vec<u8> = vec![1, 2, 3];
        let executed = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = std::sync::Arc::clone(&executed);

        let command = RenderCommand::new(
            7,
            "test_command",
            Box::new(move |_ctx| {
                assert_eq!(captured, [1u8, 2, 3]);
                flag.store(true, std::sync::atomic::Ordering::SeqCst);
            }),
        );

        assert_eq!(command.ordinal(), 7);
        assert_eq!(command.name(), "test_command");
        command.execute(&mut context);
        assert!(executed.load(std::sync::atomic::Ordering::SeqCst));
    }
}

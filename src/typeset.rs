//! Math-typesetting collaborator boundary.
//!
//! Rendering a math chunk is this crate's only asynchronous edge. Each math
//! chunk owns one slot in the rendered view; a typesetting task computes the
//! markup for exactly that slot and delivers it over a channel drained on
//! the caller's scheduling tick. Tasks may finish out of order, but a result
//! can only ever land in the slot that requested it, so the established
//! group/message order is never disturbed. Cancelling a task (or dropping
//! the session that owns it) keeps its result out of the channel, and stale
//! results addressed to slots a view no longer contains are discarded when
//! applied.

use std::future::Future;
use std::sync::Arc;

use crossbeam_channel::Sender;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

/// Identity of the view slot owned by one math chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotId(pub u64);

/// One typesetting job: the math source plus the slot that owns the result.
#[derive(Clone, Debug)]
pub struct TypesetRequest {
    pub slot: SlotId,
    pub source: String,
}

/// Result of one typesetting job, addressed to its owning slot.
#[derive(Clone, Debug)]
pub struct TypesetOutcome {
    pub slot: SlotId,
    pub result: Result<String, String>,
}

/// Cancellable handle for one scheduled typesetting task.
pub struct TypesetTask {
    abort: Option<AbortHandle>,
}

impl TypesetTask {
    /// Handle for a task that already completed (synchronous typesetters).
    pub fn completed() -> Self {
        Self { abort: None }
    }

    pub fn from_abort_handle(abort: AbortHandle) -> Self {
        Self { abort: Some(abort) }
    }

    /// Cancel the task if it is still pending. Safe to call after
    /// completion.
    pub fn cancel(&self) {
        if let Some(abort) = &self.abort {
            abort.abort();
        }
    }
}

/// External collaborator that renders math sources into display markup.
pub trait MathTypesetter {
    /// Schedule typesetting of one chunk; invoked once per math chunk
    /// encountered during a render pass.
    fn render(&self, request: TypesetRequest) -> TypesetTask;
}

/// Tokio-backed typesetter: schedules `render_fn` on a runtime and delivers
/// the outcome over the channel it was built with.
pub struct AsyncTypesetter<F> {
    runtime: Handle,
    outcome_tx: Sender<TypesetOutcome>,
    render_fn: Arc<F>,
}

impl<F, Fut> AsyncTypesetter<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, String>> + Send + 'static,
{
    pub fn new(runtime: Handle, outcome_tx: Sender<TypesetOutcome>, render_fn: F) -> Self {
        Self {
            runtime,
            outcome_tx,
            render_fn: Arc::new(render_fn),
        }
    }
}

impl<F, Fut> MathTypesetter for AsyncTypesetter<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, String>> + Send + 'static,
{
    fn render(&self, request: TypesetRequest) -> TypesetTask {
        let outcome_tx = self.outcome_tx.clone();
        let render_fn = Arc::clone(&self.render_fn);
        let slot = request.slot;
        let handle = self.runtime.spawn(async move {
            let result = render_fn(request.source).await;
            // The receiver may be gone if the session was torn down
            let _ = outcome_tx.send(TypesetOutcome { slot, result });
        });
        TypesetTask::from_abort_handle(handle.abort_handle())
    }
}

//! Request/response logging around controller calls.
//!
//! Every intercepted call logs a start line with a fresh request id, the
//! request path, the client host and the rendered arguments. Calls that
//! return successfully log a matching end line with the elapsed time;
//! failed calls log nothing further and their error is passed back untouched.

use std::{future::Future, time::Instant};

use uuid::Uuid;

pub mod args;
pub mod context;
pub mod handler;
pub mod record;

pub use args::{render_params, Arguments};
pub use context::RequestContext;
pub use handler::{Handler, LoggingHandler};
pub use record::RequestLogRecord;

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLogger;

impl RequestLogger {
    pub fn new() -> Self {
        Self
    }

    /// Emits the start line and begins timing.
    ///
    /// The clock starts before the arguments are rendered, so rendering counts
    /// towards the reported cost.
    pub fn begin<A: Arguments + ?Sized>(&self, ctx: &RequestContext, args: &A) -> RequestLogRecord {
        let request_id = Uuid::new_v4();
        let started_at = Instant::now();
        let params = render_params(args);
        RequestLogRecord::start(
            request_id,
            started_at,
            ctx.path.clone(),
            ctx.client_host.clone(),
            params,
        )
    }

    /// Runs `call` with `args` between the start and end lines.
    ///
    /// The end line is only written when `call` returns `Ok`.
    pub async fn intercept<A, F, Fut, T, E>(
        &self,
        ctx: &RequestContext,
        args: A,
        call: F,
    ) -> Result<T, E>
    where
        A: Arguments,
        F: FnOnce(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let record = self.begin(ctx, &args);
        let output = call(args).await?;
        record.finish();
        Ok(output)
    }
}

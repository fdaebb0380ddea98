use std::future::Future;

use super::{Arguments, RequestContext, RequestLogger};

/// A request-handling capability that can be wrapped by [`LoggingHandler`].
///
/// Any `Fn(RequestContext, A) -> impl Future<Output = Result<T, E>>` is a handler.
pub trait Handler<A>: Send + Sync {
    type Output;
    type Error;

    fn call(
        &self,
        ctx: RequestContext,
        args: A,
    ) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send;
}

impl<F, Fut, A, T, E> Handler<A> for F
where
    F: Fn(RequestContext, A) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, E>> + Send,
{
    type Output = T;
    type Error = E;

    fn call(&self, ctx: RequestContext, args: A) -> impl Future<Output = Result<T, E>> + Send {
        self(ctx, args)
    }
}

/// Decorates a [`Handler`] with start/end request logging.
///
/// Results and errors from the inner handler are returned unchanged.
///
/// ```rust
/// use request_log_gateway::interceptor::{Handler, LoggingHandler, RequestContext};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let show = LoggingHandler::new(|_ctx: RequestContext, (id,): (u64,)| async move {
///     Ok::<_, std::convert::Infallible>(format!("item {id}"))
/// });
///
/// let ctx = RequestContext::new("/items/1", "127.0.0.1");
/// assert_eq!(show.call(ctx, (1u64,)).await.unwrap(), "item 1");
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LoggingHandler<H> {
    inner: H,
    logger: RequestLogger,
}

impl<H> LoggingHandler<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            logger: RequestLogger::new(),
        }
    }

    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<H, A> Handler<A> for LoggingHandler<H>
where
    H: Handler<A>,
    A: Arguments + Send,
{
    type Output = H::Output;
    type Error = H::Error;

    fn call(
        &self,
        ctx: RequestContext,
        args: A,
    ) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send {
        async move {
            let record = self.logger.begin(&ctx, &args);
            let output = self.inner.call(ctx, args).await?;
            record.finish();
            Ok(output)
        }
    }
}

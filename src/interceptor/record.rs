use std::time::Instant;

use tracing::info;
use uuid::Uuid;

/// Per-call state between the start line and the end line.
///
/// Dropping a record without calling [`RequestLogRecord::finish`] emits nothing,
/// which is how failed calls end up with only a start line.
#[derive(Debug)]
#[must_use = "call `finish` once the delegated call has returned"]
pub struct RequestLogRecord {
    pub request_id: Uuid,
    pub path: String,
    pub client_host: String,
    pub params: String,
    pub started_at: Instant,
}

impl RequestLogRecord {
    pub(crate) fn start(
        request_id: Uuid,
        started_at: Instant,
        path: String,
        client_host: String,
        params: String,
    ) -> Self {
        let record = Self {
            request_id,
            started_at,
            path,
            client_host,
            params,
        };

        info!(
            "request start, id: {}, path: {}, ip: {}, params: {}",
            record.request_id, record.path, record.client_host, record.params
        );

        record
    }

    pub fn elapsed_millis(&self) -> u128 {
        self.started_at.elapsed().as_millis()
    }

    /// Emits the end line and returns the elapsed time in milliseconds.
    pub fn finish(self) -> u128 {
        let cost = self.elapsed_millis();
        info!("request end, id: {}, cost: {}ms", self.request_id, cost);
        cost
    }
}

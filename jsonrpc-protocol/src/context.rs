// jsonrpc-protocol/src/context.rs
use crate::request::Request;
use crate::response::Response;

/// Per-dispatch state: the requests still to be resolved and the responses
/// already settled, for one payload (single or batch).
///
/// A context is created open by the specification validator and transitions
/// to done exactly once. The transition consumes the value and returns a new
/// one, so a done context is never mutated; the dispatch phase works against
/// an immutable snapshot of the pending requests.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcContext {
    requests: Vec<Request>,
    responses: Vec<Response>,
    batch: bool,
    done: bool,
}

impl RpcContext {
    /// An open context holding pending requests plus any responses already
    /// settled during validation.
    pub fn of(batch: bool, requests: Vec<Request>, responses: Vec<Response>) -> Self {
        Self {
            requests,
            responses,
            batch,
            done: false,
        }
    }

    /// An open context holding a single settled failure and no requests.
    /// Callers that cannot continue chain [`RpcContext::done`].
    pub fn failed(batch: bool, response: Response) -> Self {
        Self::of(batch, Vec::new(), vec![response])
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    /// True when the payload's top-level value was a non-empty array.
    pub fn is_batch(&self) -> bool {
        self.batch
    }

    /// True once the response list is final.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Terminal transition with the responses gathered so far.
    #[must_use]
    pub fn done(self) -> Self {
        Self { done: true, ..self }
    }

    /// Terminal transition appending the dispatch-phase responses after the
    /// ones settled during validation.
    #[must_use]
    pub fn done_with(mut self, responses: Vec<Response>) -> Self {
        self.responses.extend(responses);
        self.done()
    }
}

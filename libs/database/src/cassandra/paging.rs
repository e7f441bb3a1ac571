use scylla::response::{PagingState, PagingStateResponse};
use std::ops::ControlFlow;

/// Opaque position in a paged result
///
/// Wraps the driver's raw paging state so callers can hold on to it (or hand
/// it to a client) without depending on driver types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageToken(Vec<u8>);

impl PageToken {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_paging_state(self) -> PagingState {
        PagingState::new_from_raw_bytes(self.0)
    }

    /// Token for the next page, `None` when there are no more pages
    pub fn from_response(response: PagingStateResponse) -> Option<Self> {
        match response.into_paging_control_flow() {
            ControlFlow::Continue(state) => Self::from_paging_state(&state),
            ControlFlow::Break(()) => None,
        }
    }

    fn from_paging_state(state: &PagingState) -> Option<Self> {
        state
            .as_bytes_slice()
            .map(|bytes| Self(bytes.to_vec()))
    }
}

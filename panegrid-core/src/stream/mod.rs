//! Streaming response routing
//!
//! - `types` - Stream identifiers and routes (`StreamId`, `StreamRoute`)
//! - `frame` - Wire record reassembly and payload parsing (`FrameDecoder`, `Frame`)
//! - `router` - Demultiplexing events onto chat messages (`StreamRouter`)
//! - `transport` - The collaborator that opens and cancels streams (`Transport`)

mod frame;
mod router;
mod transport;
mod types;

pub use frame::{
    ContentDelta, DONE_MARKER, Frame, FrameDecoder, FrameError, FrameResult, parse_payload,
};
pub use router::StreamRouter;
pub use transport::{RecordingTransport, StreamRequest, Transport, TransportError};
pub use types::{StreamId, StreamOutcome, StreamRoute};

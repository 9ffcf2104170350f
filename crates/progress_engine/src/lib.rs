//! Progress engine: stream decoding, transport, and the session driver.
mod frame;
mod reassemble;
mod session;
mod sink;
mod transport;
mod types;

pub use frame::{FrameDecoder, FrameFormat};
pub use reassemble::LineReassembler;
pub use session::{SessionDriver, SessionHandle};
pub use sink::{render, Sink};
pub use transport::{ByteStream, Opened, ReqwestTransport, Transport, TransportSettings};
pub use types::{SessionError, SessionReport, TransportError};

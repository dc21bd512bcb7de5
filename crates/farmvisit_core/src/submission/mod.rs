//! Survey submission: payload assembly and transport.

pub mod assembler;
pub mod transport;

pub use assembler::{assemble, AttachmentPart, SubmissionPayload};
pub use transport::{HttpTransport, SubmitReceipt, Transport, TransportError};

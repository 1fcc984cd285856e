//! Core A2A task protocol types and definitions

pub mod envelope;
pub mod error;
pub mod frame;
pub mod manifest;
pub mod operation;
pub mod status;

pub use envelope::{Content, Envelope, TaskData};
pub use error::{A2AError, A2AResult, ErrorKind};
pub use frame::{FrameData, StreamFrame};
pub use manifest::{Capabilities, Manifest, Pricing};
pub use operation::A2AOperation;
pub use status::{needs_user_input, RunStatus, Stage, StatusCode};

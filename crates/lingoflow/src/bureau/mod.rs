pub mod error;
pub mod submit;
pub mod transport;
pub mod types;

pub use error::{RenderError, SubmitError, TransportError};
pub use submit::{SubmissionOutcome, SubmissionService};
pub use transport::{BureauTransport, PayloadRenderer};
pub use types::{BatchItem, BatchRequest, BureauResponse, OrderAction};

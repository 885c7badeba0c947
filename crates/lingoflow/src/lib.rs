pub mod bureau;
pub mod checkout;
pub mod config;
pub mod db;
pub mod error;
pub mod request;

pub use bureau::{
    BatchRequest, BureauResponse, BureauTransport, OrderAction, PayloadRenderer,
    SubmissionOutcome, SubmissionService, SubmitError, TransportError,
};
pub use checkout::{CheckoutQueue, JobState, TranslationJob};
pub use config::{load_config, Config};
pub use db::Database;
pub use error::{ConfigError, LingoflowError, Result};
pub use request::{
    AllocationError, IdentifierSource, MissingHistoryPolicy, RequestId, RequestIdAllocator,
};

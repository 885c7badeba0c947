pub mod allocator;
pub mod id;
pub mod sequence;

pub use allocator::{
    AllocationError, IdentifierSource, MissingHistoryPolicy, RequestIdAllocator,
};
pub use id::{RequestId, MAX_PART};
pub use sequence::{ConfiguredSequence, NumberSequence};

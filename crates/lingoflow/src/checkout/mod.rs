pub mod job;
pub mod queue;

pub use job::{JobState, TranslationJob};
pub use queue::CheckoutQueue;

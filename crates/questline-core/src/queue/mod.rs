//! Queue module: session state and the directive processor.

mod processor;
mod state;

pub use processor::{ProcessReport, QueueProcessor};
pub use state::SessionState;

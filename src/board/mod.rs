pub mod host;
pub mod search;
pub mod store;
pub mod sync;

pub use host::{HostEvent, HostPort};
pub use store::TargetStore;
pub use sync::{MoveDecision, MoveOutcome, StatusSync};

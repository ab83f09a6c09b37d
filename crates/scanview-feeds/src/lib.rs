//! scanview-feeds: getting findings text from wherever it is published.
//!
//! - [`transport`]: one GET per location, over HTTP or from a local directory.
//! - [`fetch`]: walks the candidate list in order until one succeeds.
//! - [`scheduler`]: the periodic reload timer.

pub mod error;
pub mod fetch;
pub mod scheduler;
pub mod transport;

pub use error::FeedError;
pub use fetch::{FetchCoordinator, FetchProgress, Loaded};
pub use scheduler::RefreshScheduler;
pub use transport::{HostingBase, HttpTransport, Transport};

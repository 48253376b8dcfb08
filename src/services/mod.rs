//! Services for fetching, sequencing and shaping report data

pub mod aggregator;
pub mod client;
pub mod desensitize;
pub mod page_loader;
pub mod poller;
pub mod sequence;

#[cfg(test)]
mod test_server;

pub use aggregator::Aggregator;
pub use client::{ChargebackFilter, ReportClient};
pub use desensitize::Desensitizer;
pub use page_loader::{PageRequest, PageView};
pub use poller::{PollHandle, Poller};
pub use sequence::{Completion, RequestSequence, RequestToken, ViewState};

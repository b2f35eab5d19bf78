//! Adapters implementing the application ports.

mod file_download;
mod reqwest_transport;
mod system_clock;

pub use file_download::FileDownloadSink;
pub use reqwest_transport::ReqwestVehicleTransport;
pub use system_clock::SystemClock;

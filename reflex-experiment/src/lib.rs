pub mod config;
pub mod error;
pub mod export;
pub mod state;
pub mod store;
pub mod trial;

pub use config::ControllerConfig;
pub use error::{ConfigError, ExportError, IgnoreError};
pub use export::{
    DEFAULT_EXPORT_FILE, Destination, ExportOptions, ExportReport, FileDestination,
    MemoryDestination, export_to_destination, parse, serialize,
};
pub use state::{ControllerEvent, TrialController};
pub use store::{RecordId, ResultStore, Summary};
pub use trial::{Trial, TrialTimestamps};

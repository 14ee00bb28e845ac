//! Observability for the gateway
//!
//! Structured one-line JSON logs for every workflow. Every event carries the
//! hostname of the instance that handled it, since the directory is local to
//! each instance.
//!
//! ```ignore
//! use storify::observability::{Event, Logger};
//!
//! Logger::event(Event::FilesListed, &[("hostname", "vm-1"), ("matches", "2")]);
//! ```

mod events;
mod hostname;
mod logger;

pub use events::Event;
pub use hostname::resolve_hostname;
pub use logger::{Logger, Severity};

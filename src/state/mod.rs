pub mod controller;
pub mod dispatcher;
pub mod job;
pub mod theme;

pub use controller::{Availability, JobController, JobUpdate, TriggerAction};
pub use dispatcher::{dispatch_event, Dispatch};
pub use job::{clamp_lookback, Job, JobStatus, ResultSet, TokenCounter};
pub use theme::{Theme, ThemeStore};

//! # Focusplan Core Library
//!
//! Calendar-aware chunked scheduling: given a task with a total duration
//! and a due date, split it into bounded chunks and place each chunk in
//! free time inside working hours on the user's calendar.
//!
//! ## Architecture
//!
//! - **Interval/Hours**: half-open time intervals and the per-day
//!   working-hours window
//! - **Chunk Planner**: automatic (greedy one-hour) or manual chunk plans
//! - **Slot Finder**: pure earliest-fit search under busy-interval,
//!   working-hours, and due-date constraints
//! - **Scheduler**: sequential per-chunk orchestration with
//!   partial-failure tolerance
//! - **Gateway**: Google Calendar freeBusy/insert calls with
//!   refresh-on-expiry credentials
//!
//! ## Key Components
//!
//! - [`Scheduler`]: orchestrates one scheduling run
//! - [`SlotFinder`]: earliest-fit free-slot search
//! - [`CalendarGateway`]: abstraction over the calendar provider
//! - [`WorkingHours`]: daily scheduling window

pub mod chunk;
pub mod error;
pub mod gateway;
pub mod hours;
pub mod interval;
pub mod scheduler;
pub mod slot;
pub mod task;

pub use chunk::{plan_chunks, Chunk, DEFAULT_CHUNK_MINUTES, MAX_TOTAL_MINUTES};
pub use error::{CoreError, GatewayError, ValidationError};
pub use gateway::{CalendarGateway, CredentialProvider, GoogleCalendarGateway, StaticCredentials};
pub use hours::WorkingHours;
pub use interval::Interval;
pub use scheduler::{PlacedSlot, ScheduleResult, Scheduler, CHUNK_GAP_MINUTES};
pub use slot::SlotFinder;
pub use task::{parse_due_date, Task};

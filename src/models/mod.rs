//! Project scheduling domain models.
//!
//! Provides the problem instance consumed read-only by the encoding core
//! and the schedule it produces.
//!
//! # Domain Mappings
//!
//! | u-rcpsp | Software Project | Construction | Maintenance |
//! |---------|------------------|--------------|-------------|
//! | Task | Work Item | Build Step | Work Order |
//! | Element | Developer | Crew | Technician |
//! | Skill | Discipline | Trade | Certification |
//! | Schedule | Sprint Plan | Site Plan | Shift Plan |

mod element;
mod problem;
mod schedule;
mod task;

pub use element::{Element, SkillPerformance};
pub use problem::Problem;
pub use schedule::{Assignment, Schedule, Violation, ViolationType};
pub use task::Task;

//! Crowdsourcing domain models.
//!
//! Provides the core data types for matching crowd work to crowd members.
//!
//! # Domain Mappings
//!
//! | u-crowd | Crowdsensing | Delivery | Field Survey |
//! |---------|--------------|----------|--------------|
//! | Task | Sensing job | Parcel drop | Site visit |
//! | Participant | Phone owner | Courier | Surveyor |
//! | Condition | GPS fix / timestamp | Position | Position / shift |
//! | Constraint | Coverage area | Delivery window | Survey corridor |

mod condition;
mod participant;
mod task;

pub use condition::{Condition, ConditionKind, Coordinate, EncryptedCoordinate};
pub use participant::{Participant, ParticipantStatus};
pub use task::{DistributionType, Task, TaskHandle, TaskId, TaskStatus};

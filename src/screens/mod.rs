//! Full-screen compositions for the two display states.
//!
//! - **Idle** ([`idle`]): logo with pushed content, or the bouncing logo (Sleep)
//! - **Status** ([`status`]): per-GPU utilization gauges and total power (Status)
//!
//! Screens draw onto an already cleared target and never clear or flip it
//! themselves; that is the render loop's job.

mod idle;
mod status;

pub use idle::IdleScreen;
pub use status::{Dashboard, StatusScreen};

//! Status panel library: everything that can be exercised without hardware.
//!
//! The binary (`main.rs`) parses the command line, sets up logging and the
//! async runtime, and wires these modules together:
//!
//! - [`control`] accepts command lines on a Unix socket and decodes them
//!   ([`command`]) onto a queue
//! - [`render`] drains the queue once per frame, drives the display
//!   [`state`] machine and draws the [`screens`] onto a [`panel`]
//! - [`sensors`] reads GPU utilization and power from sysfs
//!
//! Drawing is built on `embedded-graphics`; see [`widgets`] for the drawable
//! catalog and [`animations`] for the motion math behind it.

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

// Configuration and look
pub mod colors;
pub mod config;
pub mod styles;

// Drawing
pub mod animations;
pub mod panel;
pub mod screens;
pub mod widgets;

// Inputs
pub mod command;
pub mod control;
pub mod sensors;

// Core loop
pub mod profiling;
pub mod render;
pub mod state;

pub mod error;

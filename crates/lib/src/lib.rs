//! DevKit library: host envelopes, height sync, and the channel message webhook
//! for apps embedded in the Weekday host platform.

pub mod action;
pub mod channel_message;
pub mod config;
pub mod devkit;
pub mod error;
pub mod height_sync;
pub mod host;
pub mod message;
pub mod query;
pub mod token;
pub mod webhook;

pub use devkit::{DevKit, DevKitBuilder};
pub use error::{DevKitError, Result};

//! Common test utilities and helpers
#![allow(dead_code, unused_imports)]

pub mod fakes;
pub mod fixtures;

pub use self::fakes::{
    Event, InterruptingProber, RecordingFetcher, RecordingReporter, ScriptedProber,
};
pub use self::fixtures::TestWorkspace;

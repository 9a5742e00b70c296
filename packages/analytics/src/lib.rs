#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Whole-batch analytical transforms over incident sets.
//!
//! Both transforms here are functions of the complete batch — frequency
//! ranks depend on the batch's distribution and the EMSSTAT flag
//! propagates across groups — so they run only after extraction finishes.
//! Neither has a meaningful streaming form.

pub mod emsstat;
pub mod rank;

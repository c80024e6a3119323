//! Language frontends for Quickbeam
//!
//! This module contains implementations of the `LanguageFrontend` trait.

pub mod quickbeam;

pub use quickbeam::QuickbeamFrontend;

//! Exposure notification handlers

pub mod file;

pub use file::FileExposureNotification;

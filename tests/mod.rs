//! Test suite for TaskSync
//!
//! This module organizes all tests

pub mod property;

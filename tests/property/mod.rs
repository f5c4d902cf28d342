//! Property-based tests

pub mod normalization_proptest;

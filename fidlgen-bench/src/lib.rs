//! # fidlgen Bench
//!
//! Benchmarking utilities for fidlgen compilation.

pub mod library;

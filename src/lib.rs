//! Boxplot rendering for distribution samples, plus a codec between
//! rendered boxplot geometry and compact percentile tuples.
//!
//! The pieces are independent: [`core::sampler`] generates samples,
//! [`report::svg`] draws them, and [`core::codec`] converts percentile
//! tuples to and from [`core::artifact::BoxplotArtifact`] geometry without
//! ever touching raw samples.

pub mod cli;
pub mod core;
pub mod report;

//! Cribar - statistical analysis for pull-request datasets
//!
//! This library provides descriptive statistics, conditional acceptance
//! rates, contingency-table hypothesis tests (Fisher's exact, chi-squared
//! with Cramér's V), and top-N% outlier filtering over an in-memory
//! column-oriented PR dataset.

pub mod chi_squared;
pub mod contingency;
pub mod dataset;
pub mod describe;
pub mod error;
pub mod filter;
pub mod fisher;
pub mod rates;

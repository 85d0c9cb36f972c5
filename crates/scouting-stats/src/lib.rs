//! Numeric helpers for the scouting workspace.
//!
//! This crate provides the small set of statistics the aggregation and
//! reporting code needs:
//!
//! - **Running means**: Accumulate fixed-width vectors and take their per-component mean
//! - **Descriptive statistics**: Summarize a set of scores (min, max, mean, median, spread)
//!
//! # Modules
//!
//! - [`mean`]: Running mean accumulators over fixed-width `f64` vectors
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//!
//! # Examples
//!
//! ## Averaging vectors component-wise
//!
//! ```
//! use scouting_stats::mean::MeanAccumulator;
//!
//! let mut acc = MeanAccumulator::<2>::new();
//! acc.push(&[12.0, 1.0]);
//! acc.push(&[0.0, 0.0]);
//! assert_eq!(acc.mean(), Some([6.0, 0.5]));
//! ```
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use scouting_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```

pub mod descriptive;
pub mod mean;

//! Small statistics helpers used to summarize fitness across a population.
//!
//! ```
//! use flapnet_stats::descriptive::DescriptiveStats;
//!
//! let scores = [3.0, 0.0, 12.0, 5.0];
//! let stats = DescriptiveStats::new(scores).unwrap();
//! assert_eq!(stats.count, 4);
//! assert_eq!(stats.max, 12.0);
//! assert_eq!(stats.mean, 5.0);
//! assert_eq!(stats.median, 4.0);
//! ```

pub mod descriptive;

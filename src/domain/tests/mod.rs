//! Unit tests for domain values and aggregates.

//! Unit tests for load projection.

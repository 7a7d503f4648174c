//! Unit tests for leave recording and conflict detection.

mod service_tests;

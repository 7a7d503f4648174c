//! Unit tests for the handover workflow.

mod service_tests;

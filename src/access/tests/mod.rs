//! Unit tests for identity parsing and authorization policy.

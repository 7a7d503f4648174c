//! Unit tests for recurring templates.

//! Unit tests for configuration parsing and the settings service.

//! Unit tests for working-day arithmetic and holiday management.

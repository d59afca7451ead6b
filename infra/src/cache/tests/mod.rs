//! Unit tests for the verification caches

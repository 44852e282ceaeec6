//! Test utilities for building a backend outside a real client connection.

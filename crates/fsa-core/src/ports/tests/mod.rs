//! Test doubles for the host ports.

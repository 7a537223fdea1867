//! Application layer orchestrating the ledger operations.
//!
//! This module defines the `RentEngine`, the primary entry point for
//! linking tenants, estimating fines and processing rent payments. It owns
//! the storage ports and the per-tenant mutual-exclusion scope.

pub mod engine;

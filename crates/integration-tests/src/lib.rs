//! Integration tests for Shelfline.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shelfline-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `stock_lifecycle` - import, dating, reconcile, and undo end to end
//! - `reminder_sweep` - sweep scheduling idempotence over a real document
//! - `document_compat` - round-tripping documents written by earlier
//!   versions of the system
//!
//! Tests run against a [`shelfline_store::JsonStore`] in a temp directory;
//! no network or external services are involved.

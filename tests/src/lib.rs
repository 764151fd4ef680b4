//! # Skill Gateway Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── webhook_flows.rs    # signed requests through the full router
//!     └── server.rs           # real listener, graceful shutdown
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p skill-tests
//! cargo test -p skill-tests integration::webhook_flows
//! ```

pub mod integration;

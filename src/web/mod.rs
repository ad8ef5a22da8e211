//! Web server for browser-based lab file inspection.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 8080
//! lab-peek serve
//!
//! # Custom port and auto-open browser
//! lab-peek serve --port 3000 --open
//!
//! # Bind to all interfaces
//! lab-peek serve --address 0.0.0.0
//! ```
//!
//! ## API Endpoints
//!
//! - `GET /` - Upload page
//! - `GET /api/health` - Liveness check
//! - `POST /api/lab-file` - Inspect an uploaded lab file (multipart field `file`)

pub mod server;

//! # CLI Module
//!
//! The `httpmediator` binary.
//!
//! ```bash
//! # Print the compiled routing table
//! httpmediator routes --file demos/product_store/routes.yaml
//!
//! # Serve it, answering every route with an echo of the request
//! httpmediator serve --file demos/product_store/routes.yaml --addr 127.0.0.1:8080
//! ```
//!
//! `--file` and `--addr` may also come from `HTTPMED_ROUTES` and `HTTPMED_ADDR`.

mod commands;


pub use commands::{echo_dispatcher, run, run_cli, Cli, Commands};

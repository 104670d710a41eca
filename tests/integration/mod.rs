//! Integration tests for the fleet CLI
//!
//! Each test builds a throwaway workspace (registries + fake repository
//! checkouts) and drives the compiled binary against it.

mod helpers;

mod test_release;
mod test_surface;
mod test_sync;

//! Integration test crate for the ProcAmp pipeline.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It runs the full processor against the software executor to verify
//! the crates work together.

#[cfg(test)]
mod pipeline;

#[cfg(test)]
mod composite;

#[cfg(test)]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

//! Request executor backends

#[cfg(feature = "reqwest")]
mod reqwest_backend;

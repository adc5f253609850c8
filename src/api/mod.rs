/// Feed API module
///
/// This module handles:
/// - The HTTP client and its page cursor (client.rs)
/// - Decoding the backend's response envelope
/// - Resolving image links against the object-storage endpoint

pub mod client;

/// Middleware modules for the API server
///
/// - `session`: session resolution and cookie helpers

pub mod session;

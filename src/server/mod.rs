// Server module entry
// Listener creation, accept loop, connection handling, and signals

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the file maps to the server_loop module
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used entry points
pub use listener::bind_listener;
pub use server_loop::run_server_loop;
pub use signal::start_signal_handler;

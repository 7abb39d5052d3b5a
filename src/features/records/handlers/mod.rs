pub mod record_handler;

pub use record_handler::*;

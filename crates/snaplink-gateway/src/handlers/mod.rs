mod health;
mod url;

pub use health::health_handler;
pub use url::{missing_code_handler, redirect_handler, shorten_handler};

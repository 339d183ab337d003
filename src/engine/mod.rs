mod executor;
mod retry_state;

pub use executor::{execute, execute_with_config};
pub use retry_state::RetryState;

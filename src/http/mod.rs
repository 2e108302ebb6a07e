mod error;
mod handlers;
mod router;

pub use error::{ApiError, AppError};
pub use router::create_router;

use std::sync::Arc;

use crate::engine::Scheduler;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub scheduler: Arc<Scheduler>,
}

impl AppState {
    pub fn new(scheduler: Arc<Scheduler>) -> Self {
        Self { scheduler }
    }
}

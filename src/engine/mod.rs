mod availability;
mod error;
#[cfg(test)]
mod tests;

pub use availability::{availability, busy_lookup, open_slots, parse_window};
pub use error::EngineError;

use std::io;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::catalog;
use crate::model::*;
use crate::store::Store;

/// Request-level operations over the persisted appointment collection.
///
/// Holds no appointment state of its own: every call re-reads the whole
/// collection from the store. Bookings in this process are serialized so
/// that concurrent load-append-save cycles cannot drop each other's writes;
/// writers in other processes still race with last-write-wins.
pub struct Scheduler {
    store: Arc<dyn Store>,
    booking: Mutex<()>,
}

impl Scheduler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            booking: Mutex::new(()),
        }
    }

    /// Load and decode the full collection.
    pub async fn load_collection(&self) -> Result<Collection, EngineError> {
        let data = self.store.load().await?;
        let collection = catalog::decode_collection(&data)?;
        debug!("loaded {} appointments", collection.len());
        Ok(collection)
    }

    /// Every appointment booked with `trainer_id`, in booking order.
    pub async fn scheduled_appointments(&self, trainer_id: i64) -> Result<Vec<Appointment>, EngineError> {
        let collection = self.load_collection().await?;
        Ok(catalog::filter_by_trainer(&collection, trainer_id))
    }

    /// Open slot starts for `trainer_id` in `[starts_at, ends_at]`.
    ///
    /// The window is validated before the store is touched.
    pub async fn available_slots(
        &self,
        trainer_id: i64,
        starts_at: &str,
        ends_at: &str,
    ) -> Result<Vec<String>, EngineError> {
        let (start, end) = parse_window(starts_at, ends_at)?;
        let collection = self.load_collection().await?;
        let trainer_appointments = catalog::filter_by_trainer(&collection, trainer_id);
        let busy = busy_lookup(&trainer_appointments);
        let slots = open_slots(start, end, &busy);
        metrics::histogram!(crate::observability::SLOTS_RETURNED).record(slots.len() as f64);
        Ok(slots)
    }

    /// Append `appointment` to the collection and persist the whole thing.
    ///
    /// No conflict check: booking the same slot twice records it twice.
    pub async fn book(&self, appointment: Appointment) -> Result<(), EngineError> {
        let _guard = self.booking.lock().await;
        let collection = self.load_collection().await?;
        let trainer_id = appointment.trainer_id;
        let collection = catalog::append(collection, appointment);
        let data = catalog::encode_collection(&collection)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.store.save(data).await?;
        metrics::counter!(crate::observability::BOOKINGS_TOTAL).increment(1);
        debug!("booked trainer {trainer_id}, collection now {}", collection.len());
        Ok(())
    }
}

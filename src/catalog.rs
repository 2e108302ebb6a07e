use bytes::Bytes;

use crate::model::{Appointment, Collection};

/// All appointments for `trainer_id`, in collection order.
pub fn filter_by_trainer(collection: &[Appointment], trainer_id: i64) -> Vec<Appointment> {
    collection
        .iter()
        .filter(|a| a.trainer_id == trainer_id)
        .cloned()
        .collect()
}

/// The collection with `appointment` appended. No conflict or field checks.
pub fn append(mut collection: Collection, appointment: Appointment) -> Collection {
    collection.push(appointment);
    collection
}

pub fn decode_collection(data: &[u8]) -> Result<Collection, serde_json::Error> {
    serde_json::from_slice(data)
}

pub fn encode_collection(collection: &[Appointment]) -> Result<Bytes, serde_json::Error> {
    serde_json::to_vec(collection).map(Bytes::from)
}

pub fn decode_appointment(data: &[u8]) -> Result<Appointment, serde_json::Error> {
    serde_json::from_slice(data)
}

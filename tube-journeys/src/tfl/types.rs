//! TfL unified API response types.
//!
//! Only the fields the graph builder reads are modelled; serde ignores the
//! rest of each (large) payload.

use serde::Deserialize;

/// An entry from `Line/Mode/{mode}`.
#[derive(Debug, Clone, Deserialize)]
pub struct LineDto {
    pub id: String,
    pub name: String,
}

/// An entry from `Line/{id}/StopPoints`, in running order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopPointDto {
    pub naptan_id: String,
}

/// The body of `StopPoint/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopPointDetailDto {
    pub common_name: String,
}

pub mod client;
pub mod worker;

pub use client::{ApiClient, ApiError, Backend};
pub use worker::{ApiReply, ApiRequest, ApiWorker};

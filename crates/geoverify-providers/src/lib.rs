//! Geocoding provider clients.
//!
//! Two independent providers share the same two-operation contract
//! (reverse-geocode a coordinate, search for a place by text):
//!
//! - [`NominatimClient`] wraps the free OpenStreetMap Nominatim service.
//!   Its usage policy demands an identifying `User-Agent` and at most one
//!   request per interval per client, which the client enforces with a
//!   process-wide rate gate shared across both call types.
//! - [`RadarClient`] wraps the paid Radar API, authenticated with a private
//!   key. No client-side rate limit.
//!
//! Response shapes differ between the providers and stay typed separately;
//! reconciling them is the engine's job, not this crate's.

pub mod error;
pub mod nominatim;
pub mod radar;
pub mod types;

pub use error::ProviderError;
pub use nominatim::NominatimClient;
pub use radar::RadarClient;
pub use types::{NominatimPlace, RadarAddress, RadarPlace};

pub mod client;
pub mod models;

pub use client::{BackendApi, BackendClient};
pub use models::{ConversionRequest, ConversionResult, MatchedTrack, Platform, Summary, Track, TrackSide};

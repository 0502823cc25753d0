use serde::{Deserialize, Serialize};

use crate::auth::Session;
use crate::error::{AppError, Result};

/// Body of a conversion submission. Built fresh per run; the constructor
/// enforces the trimmed-input and session-token invariants, so a request
/// without a usable credential cannot exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    pub url: String,
    pub name: String,
    pub access_token: String,
}

impl ConversionRequest {
    pub fn new(url: &str, name: &str, session: Option<&Session>) -> Result<Self> {
        let session = session.ok_or(AppError::LoginRequired)?;
        if session.access_token.is_empty() {
            return Err(AppError::LoginRequired);
        }

        let url = url.trim();
        let name = name.trim();
        if url.is_empty() || name.is_empty() {
            return Err(AppError::Validation(
                "Please enter a playlist URL and name".to_string(),
            ));
        }

        Ok(Self {
            url: url.to_string(),
            name: name.to_string(),
            access_token: session.access_token.clone(),
        })
    }
}

/// Which platform the created playlist lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Source,
    Destination,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Source => write!(f, "source"),
            Platform::Destination => write!(f, "destination"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: u32,
    pub matched: u32,
}

impl Summary {
    pub fn is_consistent(&self) -> bool {
        self.matched <= self.total
    }
}

/// Source-side metadata of one playlist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSide {
    pub title: String,
    pub artist: String,
}

/// Destination-side metadata, present only for matched tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedTrack {
    pub title: String,
    pub artist: String,
    /// Matcher confidence in [0, 1].
    pub match_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub source: TrackSide,
    pub matched: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<MatchedTrack>,
}

/// The matching report returned by `POST /convert`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub summary: Summary,
    pub platform: Platform,
    pub playlist_url: String,
    pub tracks: Vec<Track>,
}

#[cfg(test)]
impl Track {
    pub fn mock_matched(title: &str, artist: &str, score: f64) -> Self {
        Self {
            source: TrackSide {
                title: title.to_string(),
                artist: artist.to_string(),
            },
            matched: true,
            destination: Some(MatchedTrack {
                title: title.to_string(),
                artist: artist.to_string(),
                match_score: score,
            }),
        }
    }

    pub fn mock_unmatched(title: &str, artist: &str) -> Self {
        Self {
            source: TrackSide {
                title: title.to_string(),
                artist: artist.to_string(),
            },
            matched: false,
            destination: None,
        }
    }
}

#[cfg(test)]
impl ConversionResult {
    pub fn mock(total: u32, matched: u32) -> Self {
        let mut tracks = Vec::new();
        for i in 0..total {
            if i < matched {
                tracks.push(Track::mock_matched(
                    &format!("Song {}", i),
                    "Mock Artist",
                    0.95,
                ));
            } else {
                tracks.push(Track::mock_unmatched(&format!("Song {}", i), "Mock Artist"));
            }
        }

        Self {
            summary: Summary { total, matched },
            platform: Platform::Destination,
            playlist_url: "https://destination.example/playlist/abc".to_string(),
            tracks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_requires_a_session() {
        let err = ConversionRequest::new("https://x", "My List", None).unwrap_err();
        assert!(matches!(err, AppError::LoginRequired));
        assert_eq!(err.to_string(), "Please login first");
    }

    #[test]
    fn request_rejects_empty_access_token() {
        let mut session = Session::mock();
        session.access_token.clear();

        let err = ConversionRequest::new("https://x", "My List", Some(&session)).unwrap_err();
        assert!(matches!(err, AppError::LoginRequired));
    }

    #[test]
    fn request_rejects_blank_inputs() {
        let session = Session::mock();

        for (url, name) in [("", "My List"), ("https://x", ""), ("   ", "\t")] {
            let err = ConversionRequest::new(url, name, Some(&session)).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
            assert_eq!(err.to_string(), "Please enter a playlist URL and name");
        }
    }

    #[test]
    fn request_trims_inputs() {
        let session = Session::mock();
        let request =
            ConversionRequest::new("  https://x  ", " My List ", Some(&session)).expect("request");

        assert_eq!(request.url, "https://x");
        assert_eq!(request.name, "My List");
        assert_eq!(request.access_token, "mock_access_token");
    }

    #[test]
    fn request_serializes_camel_case() {
        let session = Session::mock();
        let request = ConversionRequest::new("https://x", "My List", Some(&session)).expect("request");
        let json = serde_json::to_value(&request).expect("json");

        assert_eq!(json["url"], "https://x");
        assert_eq!(json["name"], "My List");
        assert_eq!(json["accessToken"], "mock_access_token");
    }

    #[test]
    fn result_deserializes_backend_report() {
        let body = r#"{
            "summary": {"total": 10, "matched": 7},
            "platform": "destination",
            "playlistUrl": "https://y",
            "tracks": [
                {
                    "source": {"title": "Song A", "artist": "Artist A"},
                    "matched": true,
                    "destination": {"title": "Song A", "artist": "Artist A", "matchScore": 0.97}
                },
                {
                    "source": {"title": "Song B", "artist": "Artist B"},
                    "matched": false
                }
            ]
        }"#;

        let result: ConversionResult = serde_json::from_str(body).expect("deserialize");

        assert!(result.summary.is_consistent());
        assert_eq!(result.summary.matched, 7);
        assert_eq!(result.platform, Platform::Destination);
        assert_eq!(result.playlist_url, "https://y");
        assert_eq!(result.tracks.len(), 2);

        let matched = &result.tracks[0];
        assert!(matched.matched);
        let destination = matched.destination.as_ref().expect("destination side");
        assert!((destination.match_score - 0.97).abs() < f64::EPSILON);

        let unmatched = &result.tracks[1];
        assert!(!unmatched.matched);
        assert!(unmatched.destination.is_none());
    }

    #[test]
    fn inconsistent_summary_is_detectable() {
        let summary = Summary { total: 3, matched: 5 };
        assert!(!summary.is_consistent());
    }
}

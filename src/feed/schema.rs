//! Typed shapes of the two upstream feeds, limited to the fields we use.
//!
//! Records arrive as loose JSON; each one is decoded on its own so a single
//! bad record can be skipped without losing the batch.

use serde::Deserialize;

/// A Discogs master release with its tracklist.
#[derive(Debug, Deserialize)]
pub struct MasterRelease {
    pub title: String,
    /// Discogs uses 0 for "unknown year"
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub tracklist: Vec<TracklistEntry>,
}

/// One tracklist line. Headings ("Side A") share the list with real tracks.
#[derive(Debug, Deserialize)]
pub struct TracklistEntry {
    pub title: Option<String>,
    #[serde(rename = "type_")]
    pub kind: Option<String>,
}

impl TracklistEntry {
    pub fn is_heading(&self) -> bool {
        self.kind.as_deref() == Some("heading")
    }
}

/// A setlist.fm setlist.
#[derive(Debug, Deserialize)]
pub struct SetlistRecord {
    pub id: String,
    /// `dd-mm-yyyy`
    #[serde(rename = "eventDate")]
    pub event_date: String,
    pub artist: ArtistRef,
    pub tour: Option<TourRef>,
    pub venue: Option<VenueRef>,
    #[serde(default)]
    pub sets: Sets,
}

#[derive(Debug, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TourRef {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VenueRef {
    pub id: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub city: Option<CityRef>,
}

#[derive(Debug, Deserialize)]
pub struct CityRef {
    pub name: Option<String>,
    pub coords: Option<CoordsRef>,
    pub country: Option<CountryRef>,
}

#[derive(Debug, Deserialize)]
pub struct CoordsRef {
    pub lat: Option<f64>,
    pub long: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CountryRef {
    pub code: Option<String>,
    pub name: Option<String>,
}

/// `sets` wrapper: `{"set": [main, encore 1, ...]}`
#[derive(Debug, Default, Deserialize)]
pub struct Sets {
    #[serde(default)]
    pub set: Vec<SetSection>,
}

/// Main set or an encore.
#[derive(Debug, Deserialize)]
pub struct SetSection {
    pub name: Option<String>,
    pub encore: Option<u32>,
    #[serde(default)]
    pub song: Vec<SongEntry>,
}

/// One performed song. `tape` marks intros played back from a recording.
#[derive(Debug, Deserialize)]
pub struct SongEntry {
    pub name: Option<String>,
    #[serde(default)]
    pub tape: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_release_deserialize() {
        let json = r#"{
            "title": "Album A", "year": 2000,
            "tracklist": [
                {"position": "A1", "type_": "track", "title": "Song X", "duration": "3:10"},
                {"position": "", "type_": "heading", "title": "Side B"}
            ]
        }"#;
        let m: MasterRelease = serde_json::from_str(json).unwrap();
        assert_eq!(m.title, "Album A");
        assert_eq!(m.year, Some(2000));
        assert_eq!(m.tracklist.len(), 2);
        assert!(!m.tracklist[0].is_heading());
        assert!(m.tracklist[1].is_heading());
    }

    #[test]
    fn test_setlist_minimal() {
        let json = r#"{"id": "abc", "eventDate": "23-08-1999", "artist": {"name": "Band"}}"#;
        let s: SetlistRecord = serde_json::from_str(json).unwrap();
        assert_eq!(s.id, "abc");
        assert!(s.sets.set.is_empty());
        assert!(s.venue.is_none());
    }

    #[test]
    fn test_song_entry_tape_default() {
        let s: SongEntry = serde_json::from_str(r#"{"name": "Intro"}"#).unwrap();
        assert!(!s.tape);
        let s: SongEntry = serde_json::from_str(r#"{"name": "Intro", "tape": true}"#).unwrap();
        assert!(s.tape);
    }

    #[test]
    fn test_song_list_must_be_list() {
        let json = r#"{"set": [{"song": {"name": "oops"}}]}"#;
        assert!(serde_json::from_str::<Sets>(json).is_err());
    }
}

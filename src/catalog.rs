//! Declared shapes of the Spotify Web API objects.
//!
//! Transcribed from the public API reference. Cross-object references go
//! through `Ref` so e.g. `Track -> SimplifiedAlbum -> SimplifiedArtist`
//! stays a flat, acyclic table.
pub mod endpoints;

use once_cell::sync::Lazy;

use crate::model::{Record, Registry, TypeDescription};

static CATALOG: Lazy<Registry> = Lazy::new(|| {
    let registry = build().expect("built-in catalog declares each name once");
    registry.validate().expect("built-in catalog references resolve");
    registry
});

/// Process-wide registry of every declared object and response shape.
pub fn registry() -> &'static Registry {
    &CATALOG
}

// ------------------------------- Helpers ---------------------------------- //

fn string() -> TypeDescription { TypeDescription::string() }
fn integer() -> TypeDescription { TypeDescription::integer() }
fn float() -> TypeDescription { TypeDescription::float() }
fn boolean() -> TypeDescription { TypeDescription::boolean() }
fn named(name: &str) -> TypeDescription { TypeDescription::named(name) }
fn list(element: TypeDescription) -> TypeDescription { TypeDescription::list_of(element) }
fn nullable(inner: TypeDescription) -> TypeDescription { TypeDescription::nullable(inner) }
fn page(item: &str) -> TypeDescription { TypeDescription::page(named(item)) }

type Fields = Vec<(&'static str, TypeDescription)>;

struct Builder {
    registry: Registry,
}

impl Builder {
    fn object(&mut self, name: &str, required: Fields, optional: Fields) -> Result<(), crate::ModelError> {
        let mut record = Record::builder(name);
        for (field, ty) in required {
            record = record.required(field, ty);
        }
        for (field, ty) in optional {
            record = record.optional(field, ty);
        }
        self.registry.register(name, TypeDescription::Record(record.build()?))
    }
}

// ------------------------------- Catalog ---------------------------------- //

fn build() -> Result<Registry, crate::ModelError> {
    let mut b = Builder { registry: Registry::new() };

    b.object("TokenInfo", vec![
        ("access_token", string()),
        ("token_type", string()),
        ("expires_in", integer()),
        ("expires_at", integer()),
    ], vec![
        ("scope", string()),
        ("refresh_token", string()),
    ])?;

    // paging helpers
    b.object("Cursor", vec![
        ("after", string()),
        ("before", string()),
    ], vec![])?;

    // response wrappers
    b.object("TracksResponse", vec![("tracks", list(named("Track")))], vec![])?;
    b.object("ArtistsResponse", vec![("artists", list(named("Artist")))], vec![])?;
    b.object("AlbumsResponse", vec![("albums", list(named("Album")))], vec![])?;
    b.object("ShowsResponse", vec![("shows", list(named("SimplifiedShow")))], vec![])?;
    b.object("EpisodesResponse", vec![("episodes", list(named("Episode")))], vec![])?;
    b.object("SnapshotId", vec![("snapshot_id", string())], vec![])?;
    b.object("FollowedArtistsResponse", vec![
        ("artists", TypeDescription::cursor_page(named("Artist"))),
    ], vec![])?;
    b.object("FeaturedPlaylistsResponse", vec![
        ("message", string()),
        ("playlists", page("SimplifiedPlaylist")),
    ], vec![])?;
    b.object("NewReleasesResponse", vec![
        ("message", string()),
        ("albums", page("SimplifiedAlbum")),
    ], vec![])?;
    b.object("RecommendationGenresResponse", vec![("genres", list(string()))], vec![])?;
    b.object("DevicesResponse", vec![("devices", list(named("Device")))], vec![])?;
    b.object("AudioFeaturesResponse", vec![
        ("audio_features", list(nullable(named("AudioFeatures")))),
    ], vec![])?;
    b.object("AvailableMarketsResponse", vec![("markets", list(string()))], vec![])?;
    b.object("CategoriesResponse", vec![("categories", page("Category"))], vec![])?;
    b.object("CategoriesPlaylistsResponse", vec![("playlists", page("SimplifiedPlaylist"))], vec![])?;
    b.object("SearchResponse", vec![], vec![
        ("artists", page("Artist")),
        ("albums", page("SimplifiedAlbum")),
        ("tracks", page("Track")),
        ("playlists", page("SimplifiedPlaylist")),
        ("shows", page("SimplifiedShow")),
        ("episodes", page("SimplifiedEpisode")),
    ])?;

    // objects
    b.object("Album", vec![
        ("album_type", string()),
        ("artists", list(named("SimplifiedArtist"))),
        ("copyrights", list(named("Copyright"))),
        ("external_ids", named("ExternalId")),
        ("external_urls", named("ExternalUrl")),
        ("genres", list(string())),
        ("href", string()),
        ("id", string()),
        ("images", list(named("Image"))),
        ("label", string()),
        ("name", string()),
        ("popularity", integer()),
        ("release_date", string()),
        ("release_date_precision", string()),
        ("total_tracks", integer()),
        ("tracks", page("SimplifiedTrack")),
        ("type", string()),
        ("uri", string()),
    ], vec![
        ("restrictions", named("AlbumRestriction")),
        ("available_markets", list(string())),
    ])?;

    b.object("AlbumRestriction", vec![("reason", string())], vec![])?;

    b.object("Artist", vec![
        ("external_urls", named("ExternalUrl")),
        ("followers", named("Followers")),
        ("genres", list(string())),
        ("href", string()),
        ("id", string()),
        ("images", list(named("Image"))),
        ("name", string()),
        ("popularity", integer()),
        ("type", string()),
        ("uri", string()),
    ], vec![])?;

    b.object("AudioFeatures", vec![
        ("acousticness", float()),
        ("analysis_url", string()),
        ("danceability", float()),
        ("duration_ms", integer()),
        ("energy", float()),
        ("id", string()),
        ("instrumentalness", float()),
        ("key", integer()),
        ("liveness", float()),
        ("loudness", float()),
        ("mode", integer()),
        ("speechiness", float()),
        ("tempo", float()),
        ("time_signature", integer()),
        ("track_href", string()),
        ("type", string()),
        ("uri", string()),
        ("valence", float()),
    ], vec![])?;

    b.object("Category", vec![
        ("href", string()),
        ("icons", list(named("Image"))),
        ("id", string()),
        ("name", string()),
    ], vec![])?;

    b.object("Context", vec![
        ("external_urls", named("ExternalUrl")),
        ("href", string()),
        ("type", string()),
        ("uri", string()),
    ], vec![])?;

    b.object("Copyright", vec![
        ("text", string()),
        ("type", string()),
    ], vec![])?;

    b.object("CurrentlyPlayingContext", vec![
        ("actions", named("Disallows")),
        ("context", named("Context")),
        ("currently_playing_type", string()),
        ("device", named("Device")),
        ("is_playing", boolean()),
        ("item", named("Track")),
        ("progress_ms", integer()),
        ("repeat_state", string()),
        ("shuffle_state", string()),
        ("timestamp", integer()),
    ], vec![])?;

    b.object("CurrentlyPlaying", vec![
        ("context", named("Context")),
        ("currently_playing_type", string()),
        ("is_playing", boolean()),
        ("item", named("Track")),
        ("progress_ms", integer()),
        ("timestamp", integer()),
    ], vec![])?;

    b.object("Device", vec![
        ("id", string()),
        ("is_active", boolean()),
        ("is_private_session", boolean()),
        ("is_restricted", boolean()),
        ("name", string()),
        ("type", string()),
        ("volume_percent", integer()),
    ], vec![])?;

    b.object("Devices", vec![("devices", list(named("Device")))], vec![])?;

    b.object("Disallows", vec![
        ("interrupting_playback", boolean()),
        ("pausing", boolean()),
        ("resuming", boolean()),
        ("seeking", boolean()),
        ("skipping_next", boolean()),
        ("skipping_prev", boolean()),
        ("toggling_repeat_context", boolean()),
        ("toggling_repeat_track", boolean()),
        ("toggling_shuffle", boolean()),
        ("transferring_playback", boolean()),
    ], vec![])?;

    b.object("Episode", vec![
        ("audio_preview_url", string()),
        ("description", string()),
        ("duration_ms", integer()),
        ("explicit", boolean()),
        ("external_urls", named("ExternalUrl")),
        ("href", string()),
        ("html_description", string()),
        ("id", string()),
        ("images", list(named("Image"))),
        ("is_externally_hosted", boolean()),
        ("language", string()),
        ("languages", list(string())),
        ("name", string()),
        ("release_date", string()),
        ("release_date_precision", string()),
        ("resume_point", named("ResumePoint")),
        ("show", named("SimplifiedShow")),
        ("type", string()),
        ("uri", string()),
    ], vec![
        ("restrictions", named("EpisodeRestriction")),
        ("is_playable", boolean()),
    ])?;

    b.object("EpisodeRestriction", vec![("reason", string())], vec![])?;

    b.object("Error", vec![
        ("message", string()),
        ("status", integer()),
    ], vec![])?;

    b.object("ExplicitContentSettings", vec![
        ("filter_enabled", boolean()),
        ("filter_locked", boolean()),
    ], vec![])?;

    b.object("ExternalId", vec![], vec![
        ("ean", string()),
        ("isrc", string()),
        ("upc", string()),
    ])?;

    b.object("ExternalUrl", vec![("spotify", string())], vec![])?;

    b.object("Followers", vec![
        ("href", nullable(string())),
        ("total", integer()),
    ], vec![])?;

    b.object("Image", vec![
        ("height", nullable(integer())),
        ("url", string()),
        ("width", nullable(integer())),
    ], vec![])?;

    b.object("LinkedTrack", vec![
        ("external_urls", named("ExternalUrl")),
        ("href", string()),
        ("id", string()),
        ("type", string()),
        ("uri", string()),
    ], vec![])?;

    b.object("PlayHistory", vec![
        ("context", named("Context")),
        ("played_at", string()),
        ("track", named("SimplifiedTrack")),
    ], vec![])?;

    b.object("PlayerError", vec![
        ("message", string()),
        ("reason", string()),
        ("status", integer()),
    ], vec![])?;

    b.object("Playlist", vec![
        ("collaborative", boolean()),
        ("description", string()),
        ("external_urls", named("ExternalUrl")),
        ("followers", named("Followers")),
        ("href", string()),
        ("id", string()),
        ("images", list(named("Image"))),
        ("name", string()),
        ("owner", named("PublicUser")),
        ("public", boolean()),
        ("snapshot_id", string()),
        ("tracks", page("PlaylistTrack")),
        ("type", string()),
        ("uri", string()),
    ], vec![])?;

    b.object("PlaylistTrack", vec![
        ("added_at", string()),
        ("added_by", named("PublicUser")),
        ("is_local", boolean()),
        ("track", named("Track")),
    ], vec![])?;

    b.object("PlaylistTracksRef", vec![
        ("href", string()),
        ("total", integer()),
    ], vec![])?;

    b.object("PrivateUser", vec![
        ("country", string()),
        ("display_name", string()),
        ("email", string()),
        ("explicit_content", named("ExplicitContentSettings")),
        ("external_urls", named("ExternalUrl")),
        ("followers", named("Followers")),
        ("href", string()),
        ("id", string()),
        ("images", list(named("Image"))),
        ("product", string()),
        ("type", string()),
        ("uri", string()),
    ], vec![])?;

    b.object("PublicUser", vec![
        ("display_name", string()),
        ("external_urls", named("ExternalUrl")),
        ("followers", named("Followers")),
        ("href", string()),
        ("id", string()),
        ("images", list(named("Image"))),
        ("type", string()),
        ("uri", string()),
    ], vec![])?;

    b.object("RecommendationSeed", vec![
        ("afterFilteringSize", integer()),
        ("afterRelinkingSize", integer()),
        ("href", string()),
        ("id", string()),
        ("initialPoolSize", integer()),
        ("type", string()),
    ], vec![])?;

    b.object("Recommendations", vec![
        ("seeds", list(named("RecommendationSeed"))),
        ("tracks", list(named("SimplifiedTrack"))),
    ], vec![])?;

    b.object("ResumePoint", vec![
        ("fully_played", boolean()),
        ("resume_position_ms", integer()),
    ], vec![])?;

    b.object("SavedAlbum", vec![("added_at", string()), ("album", named("Album"))], vec![])?;
    b.object("SavedEpisode", vec![("added_at", string()), ("episode", named("Episode"))], vec![])?;
    b.object("SavedShow", vec![("added_at", string()), ("show", named("SimplifiedShow"))], vec![])?;
    b.object("SavedTrack", vec![("added_at", string()), ("track", named("Track"))], vec![])?;

    b.object("Show", vec![
        ("copyrights", list(named("Copyright"))),
        ("description", string()),
        ("episodes", page("SimplifiedEpisode")),
        ("explicit", boolean()),
        ("external_urls", named("ExternalUrl")),
        ("href", string()),
        ("html_description", string()),
        ("id", string()),
        ("images", list(named("Image"))),
        ("is_externally_hosted", boolean()),
        ("languages", list(string())),
        ("media_type", string()),
        ("name", string()),
        ("publisher", string()),
        ("type", string()),
        ("uri", string()),
    ], vec![
        ("available_markets", list(string())),
    ])?;

    b.object("SimplifiedAlbum", vec![
        ("album_type", string()),
        ("artists", list(named("SimplifiedArtist"))),
        ("external_urls", named("ExternalUrl")),
        ("href", string()),
        ("id", string()),
        ("images", list(named("Image"))),
        ("name", string()),
        ("release_date", string()),
        ("release_date_precision", string()),
        ("total_tracks", integer()),
        ("type", string()),
        ("uri", string()),
    ], vec![
        ("album_group", string()),
        ("restrictions", named("AlbumRestriction")),
        ("available_markets", list(string())),
    ])?;

    b.object("SimplifiedArtist", vec![
        ("external_urls", named("ExternalUrl")),
        ("href", string()),
        ("id", string()),
        ("name", string()),
        ("type", string()),
        ("uri", string()),
    ], vec![])?;

    b.object("SimplifiedEpisode", vec![
        ("audio_preview_url", string()),
        ("description", string()),
        ("duration_ms", integer()),
        ("explicit", boolean()),
        ("external_urls", named("ExternalUrl")),
        ("href", string()),
        ("html_description", string()),
        ("id", string()),
        ("images", list(named("Image"))),
        ("is_externally_hosted", boolean()),
        ("language", string()),
        ("languages", list(string())),
        ("name", string()),
        ("release_date", string()),
        ("release_date_precision", string()),
        ("resume_point", named("ResumePoint")),
        ("type", string()),
        ("uri", string()),
    ], vec![
        ("restrictions", named("EpisodeRestriction")),
        ("is_playable", boolean()),
    ])?;

    b.object("SimplifiedPlaylist", vec![
        ("collaborative", boolean()),
        ("description", string()),
        ("external_urls", named("ExternalUrl")),
        ("href", string()),
        ("id", string()),
        ("images", list(named("Image"))),
        ("name", string()),
        ("owner", named("PublicUser")),
        ("public", boolean()),
        ("snapshot_id", string()),
        ("tracks", named("PlaylistTracksRef")),
        ("type", string()),
        ("uri", string()),
    ], vec![])?;

    b.object("SimplifiedShow", vec![
        ("copyrights", list(named("Copyright"))),
        ("description", string()),
        ("explicit", boolean()),
        ("external_urls", named("ExternalUrl")),
        ("href", string()),
        ("html_description", string()),
        ("id", string()),
        ("images", list(named("Image"))),
        ("is_externally_hosted", boolean()),
        ("languages", list(string())),
        ("media_type", string()),
        ("name", string()),
        ("publisher", string()),
        ("type", string()),
        ("uri", string()),
    ], vec![
        ("available_markets", list(string())),
    ])?;

    b.object("SimplifiedTrack", vec![
        ("artists", list(named("SimplifiedArtist"))),
        ("disc_number", integer()),
        ("duration_ms", integer()),
        ("explicit", boolean()),
        ("external_urls", named("ExternalUrl")),
        ("href", string()),
        ("id", string()),
        ("is_local", boolean()),
        ("name", string()),
        ("preview_url", nullable(string())),
        ("track_number", integer()),
        ("type", string()),
        ("uri", string()),
    ], vec![
        ("linked_from", named("LinkedTrack")),
        ("restrictions", named("TrackRestriction")),
        ("is_playable", boolean()),
        ("available_markets", list(string())),
    ])?;

    b.object("Track", vec![
        ("album", named("SimplifiedAlbum")),
        ("artists", list(named("SimplifiedArtist"))),
        ("disc_number", integer()),
        ("duration_ms", integer()),
        ("explicit", boolean()),
        ("external_ids", named("ExternalId")),
        ("external_urls", named("ExternalUrl")),
        ("href", string()),
        ("id", string()),
        ("is_local", boolean()),
        ("name", string()),
        ("popularity", integer()),
        ("preview_url", nullable(string())),
        ("track_number", integer()),
        ("type", string()),
        ("uri", string()),
    ], vec![
        ("linked_from", named("LinkedTrack")),
        ("restrictions", named("TrackRestriction")),
        ("is_playable", boolean()),
        ("available_markets", list(string())),
    ])?;

    b.object("TrackRestriction", vec![("reason", string())], vec![])?;

    b.object("TuneableTrack", vec![
        ("acousticness", float()),
        ("danceability", float()),
        ("duration_ms", integer()),
        ("energy", float()),
        ("instrumentalness", float()),
        ("key", integer()),
        ("liveness", float()),
        ("loudness", float()),
        ("mode", integer()),
        ("popularity", float()),
        ("speechiness", float()),
        ("tempo", float()),
        ("time_signature", integer()),
        ("valence", float()),
    ], vec![])?;

    Ok(b.registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_builds_and_validates() {
        let registry = registry();
        assert!(registry.len() > 60);
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn optional_fields_are_declared_optional() {
        let Some(TypeDescription::Record(track)) = registry().get("Track") else {
            panic!("Track is a record")
        };
        assert!(track.is_required("preview_url"));
        assert!(!track.is_required("linked_from"));
        assert!(track.field("linked_from").is_some());
    }
}

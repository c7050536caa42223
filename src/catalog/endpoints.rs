//! Declared return shape of each client endpoint method.
use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::model::{TypeDescription, Union};

static RETURN_TYPES: Lazy<IndexMap<&'static str, TypeDescription>> = Lazy::new(declare);

/// Endpoints answering with an empty body; nothing to check.
const NO_CONTENT: &[&str] = &[
    "playlist_upload_cover_image",
    "playlist_change_details",
    "current_user_unfollow_playlist",
    "current_user_follow_playlist",
    "current_user_saved_albums_add",
    "current_user_saved_albums_delete",
    "current_user_saved_tracks_add",
    "current_user_saved_tracks_delete",
    "current_user_saved_episodes_add",
    "current_user_saved_episodes_delete",
    "current_user_saved_shows_add",
    "current_user_saved_shows_delete",
    "user_follow_artists",
    "user_follow_users",
    "user_unfollow_artists",
    "user_unfollow_users",
    "transfer_playback",
    "start_playback",
    "pause_playback",
    "next_track",
    "previous_track",
    "seek_track",
    "repeat",
    "volume",
    "shuffle",
    "add_to_queue",
];

pub fn declared_return_type(endpoint: &str) -> Option<&'static TypeDescription> {
    RETURN_TYPES.get(endpoint)
}

/// Endpoints with a declared shape, in declaration order.
pub fn names() -> impl Iterator<Item = &'static str> {
    RETURN_TYPES.keys().copied()
}

pub fn no_content() -> &'static [&'static str] {
    NO_CONTENT
}

fn declare() -> IndexMap<&'static str, TypeDescription> {
    use TypeDescription as T;
    fn named(name: &str) -> T { T::named(name) }
    let page = |item: &str| T::page(named(item));
    let bools = || T::list_of(T::boolean());

    let playlist_item = T::Union(Union::pair(named("PlaylistTrack"), named("Episode")));

    IndexMap::from_iter([
        ("track", named("Track")),
        ("tracks", named("TracksResponse")),
        ("artist", named("Artist")),
        ("artists", named("ArtistsResponse")),
        ("artist_albums", page("SimplifiedAlbum")),
        ("artist_top_tracks", named("TracksResponse")),
        ("artist_related_artists", named("ArtistsResponse")),
        ("album", named("Album")),
        ("album_tracks", page("SimplifiedTrack")),
        ("albums", named("AlbumsResponse")),
        ("show", named("Show")),
        ("shows", named("ShowsResponse")),
        ("show_episodes", page("SimplifiedEpisode")),
        ("episode", named("Episode")),
        ("episodes", named("EpisodesResponse")),
        ("search", named("SearchResponse")),
        ("user", named("PublicUser")),
        ("current_user_playlists", page("SimplifiedPlaylist")),
        ("playlist", named("Playlist")),
        ("playlist_items", T::page(playlist_item)),
        ("playlist_cover_image", T::list_of(named("Image"))),
        ("user_playlists", page("SimplifiedPlaylist")),
        ("user_playlist_create", named("Playlist")),
        ("playlist_add_items", named("SnapshotId")),
        ("playlist_replace_items", named("SnapshotId")),
        ("playlist_reorder_items", named("SnapshotId")),
        ("playlist_remove_all_occurrences_of_items", named("SnapshotId")),
        ("playlist_remove_specific_occurrences_of_items", named("SnapshotId")),
        ("playlist_is_following", bools()),
        ("me", named("PrivateUser")),
        ("current_user", named("PrivateUser")),
        ("current_user_playing_track", T::nullable(named("CurrentlyPlayingContext"))),
        ("current_user_saved_albums", page("SavedAlbum")),
        ("current_user_saved_albums_contains", bools()),
        ("current_user_saved_tracks", page("SavedTrack")),
        ("current_user_saved_tracks_contains", bools()),
        ("current_user_saved_episodes", page("SavedEpisode")),
        ("current_user_saved_episodes_contains", bools()),
        ("current_user_saved_shows", page("SavedShow")),
        ("current_user_saved_shows_contains", bools()),
        ("current_user_followed_artists", named("FollowedArtistsResponse")),
        ("current_user_following_artists", bools()),
        ("current_user_following_users", bools()),
        ("current_user_top_artists", page("Artist")),
        ("current_user_top_tracks", page("Track")),
        ("current_user_recently_played", T::cursor_page(named("PlayHistory"))),
        ("featured_playlists", named("FeaturedPlaylistsResponse")),
        ("new_releases", named("NewReleasesResponse")),
        ("category", named("Category")),
        ("categories", named("CategoriesResponse")),
        ("category_playlists", named("CategoriesPlaylistsResponse")),
        ("recommendations", named("Recommendations")),
        ("recommendation_genre_seeds", named("RecommendationGenresResponse")),
        ("audio_analysis", T::Any),
        ("audio_features", named("AudioFeaturesResponse")),
        ("devices", named("DevicesResponse")),
        ("current_playback", T::Any),
        ("currently_playing", named("CurrentlyPlayingContext")),
        ("available_markets", named("AvailableMarketsResponse")),
    ])
}

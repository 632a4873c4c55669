use serde::{Deserialize, Deserializer, Serialize};

/// Display name used when a stream carries neither a name nor a login
pub const UNKNOWN_STREAMER: &str = "Unknown";

/// Helix sends `null` for some fields it would otherwise omit
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A Twitch user as returned by `GET /users`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "null_to_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub login: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub display_name: String,
    #[serde(rename = "type", default, deserialize_with = "null_to_default")]
    pub user_type: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub broadcaster_type: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub profile_image_url: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub offline_image_url: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub view_count: u64,
    /// Kept as Helix formats it
    #[serde(default, deserialize_with = "null_to_default")]
    pub created_at: String,
}

/// A live stream as returned by `GET /streams`
///
/// Only the fields the listing surfaces are read; everything else Helix sends
/// is ignored so an odd value there cannot fail the whole page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    #[serde(default, deserialize_with = "null_to_default")]
    pub user_login: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub user_name: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub title: String,
}

impl Stream {
    /// Returns the name to show for the broadcaster
    ///
    /// Falls back from `user_name` to `user_login`, then to "Unknown".
    pub fn display_name(&self) -> &str {
        if !self.user_name.is_empty() {
            &self.user_name
        } else if !self.user_login.is_empty() {
            &self.user_login
        } else {
            UNKNOWN_STREAMER
        }
    }
}

//! Wire shapes of the web API responses.
//!
//! Only the fields the domain model needs are read; everything else in the
//! payloads is ignored.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::de::{DeserializeOwned, Error as _, IgnoredAny};
use serde::{Deserialize, Deserializer};

use crate::FetchError;

/// Envelope wrapping every API response.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    body: serde_json::Value,
}

impl Envelope {
    /// Checks the error flag and decodes the body.
    pub(crate) fn into_body<T: DeserializeOwned>(self) -> Result<T, FetchError> {
        if self.error {
            return Err(FetchError::Api {
                message: self.message.unwrap_or_default(),
            });
        }
        Ok(serde_json::from_value(self.body)?)
    }
}

/// Body of one bookmark listing slice.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BookmarksBody {
    #[serde(default)]
    pub(crate) works: Vec<BookmarkEntry>,
    #[serde(default)]
    pub(crate) total: u32,
    #[serde(default, deserialize_with = "bookmark_tags")]
    pub(crate) bookmark_tags: HashMap<u64, Vec<String>>,
}

/// One work in the bookmark listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BookmarkEntry {
    #[serde(deserialize_with = "id")]
    pub(crate) id: u64,
    #[serde(default)]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) illust_type: u8,
    #[serde(default)]
    pub(crate) url: String,
    #[serde(default)]
    pub(crate) tags: Vec<String>,
    #[serde(default, deserialize_with = "id")]
    pub(crate) user_id: u64,
    #[serde(default)]
    pub(crate) user_name: String,
    #[serde(default)]
    pub(crate) width: u32,
    #[serde(default)]
    pub(crate) height: u32,
    #[serde(default)]
    pub(crate) page_count: u32,
    #[serde(default)]
    pub(crate) is_bookmarkable: bool,
    #[serde(default)]
    pub(crate) bookmark_data: Option<BookmarkData>,
    pub(crate) create_date: DateTime<Utc>,
    pub(crate) update_date: DateTime<Utc>,
    #[serde(default)]
    pub(crate) is_unlisted: bool,
}

/// The viewer's bookmark as embedded in a work.
#[derive(Debug, Deserialize)]
pub(crate) struct BookmarkData {
    #[serde(deserialize_with = "id")]
    pub(crate) id: u64,
    #[serde(default)]
    pub(crate) private: bool,
}

/// Body of a work detail response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WorkBody {
    #[serde(deserialize_with = "id")]
    pub(crate) id: u64,
    #[serde(default)]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) illust_type: u8,
    pub(crate) create_date: DateTime<Utc>,
    pub(crate) upload_date: DateTime<Utc>,
    #[serde(default)]
    pub(crate) urls: ImageUrls,
    #[serde(default)]
    pub(crate) tags: TagList,
    #[serde(default, deserialize_with = "id")]
    pub(crate) user_id: u64,
    #[serde(default)]
    pub(crate) user_name: String,
    #[serde(default)]
    pub(crate) width: u32,
    #[serde(default)]
    pub(crate) height: u32,
    #[serde(default)]
    pub(crate) page_count: u32,
    pub(crate) bookmark_count: Option<u64>,
    pub(crate) like_count: Option<u64>,
    pub(crate) comment_count: Option<u64>,
    pub(crate) view_count: Option<u64>,
    #[serde(default)]
    pub(crate) is_bookmarkable: bool,
    #[serde(default)]
    pub(crate) bookmark_data: Option<BookmarkData>,
    #[serde(default)]
    pub(crate) is_unlisted: bool,
}

/// Image URLs at the sizes the API offers.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ImageUrls {
    #[serde(default)]
    pub(crate) original: Option<String>,
}

/// Tag container of the work detail shape.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TagList {
    #[serde(default)]
    pub(crate) tags: Vec<TagEntry>,
}

/// One tag object of the work detail shape.
#[derive(Debug, Deserialize)]
pub(crate) struct TagEntry {
    pub(crate) tag: String,
}

/// One entry of a page list response.
#[derive(Debug, Deserialize)]
pub(crate) struct PageEntry {
    pub(crate) urls: PageUrls,
    #[serde(default)]
    pub(crate) width: u32,
    #[serde(default)]
    pub(crate) height: u32,
}

/// Image URLs of one page.
#[derive(Debug, Deserialize)]
pub(crate) struct PageUrls {
    pub(crate) original: String,
}

/// Reads an id encoded either as a JSON number or as a numeric string.
fn id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(u64),
        Text(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Number(n) => Ok(n),
        Repr::Text(s) => s.trim().parse().map_err(D::Error::custom),
    }
}

/// Reads the bookmark id to personal tags mapping.
///
/// The API sends an empty array instead of an object when no bookmark in
/// the slice has personal tags; any array is read as an empty mapping.
fn bookmark_tags<'de, D>(deserializer: D) -> Result<HashMap<u64, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Map(HashMap<String, Vec<String>>),
        List(Vec<IgnoredAny>),
    }

    Ok(match Option::<Repr>::deserialize(deserializer)? {
        Some(Repr::Map(map)) => map
            .into_iter()
            .filter_map(|(key, tags)| key.parse().ok().map(|id| (id, tags)))
            .collect(),
        Some(Repr::List(_)) | None => HashMap::new(),
    })
}

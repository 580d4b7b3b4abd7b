//! Typed myQuran client on top of the dispatcher.
//!
//! Each method maps to one endpoint, picks the cache TTL for it and unwraps
//! the response envelope into domain types.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cache::CacheResult;

use super::api_types::{
  Ayah, CalendarDay, Hadis, Location, Perawi, PrayerDay, SurahDetail, SurahSummary,
};
use super::dispatcher::{Dispatcher, RequestOptions};
use super::envelope::{at_path, collection_items, first_present, unwrap_data};
use super::error::{ApiError, Result};
use super::transport::Transport;

/// The surah index rarely changes.
const SURAH_INDEX_CACHE_SECONDS: u64 = 3600;
const CALENDAR_TODAY_CACHE_SECONDS: u64 = 600;

const DEFAULT_PAGE: &str = "1";
const DEFAULT_LIMIT: &str = "10";

/// Client for the myQuran v3 API with transparent caching.
pub struct MyQuranClient<T: Transport> {
  dispatcher: Dispatcher<T>,
}

impl<T: Transport + Clone> Clone for MyQuranClient<T> {
  fn clone(&self) -> Self {
    Self {
      dispatcher: self.dispatcher.clone(),
    }
  }
}

impl<T: Transport> MyQuranClient<T> {
  pub fn new(dispatcher: Dispatcher<T>) -> Self {
    Self { dispatcher }
  }

  pub fn dispatcher(&self) -> &Dispatcher<T> {
    &self.dispatcher
  }

  async fn get(&self, path: &str, options: RequestOptions) -> Result<CacheResult<Value>> {
    self.dispatcher.request_with_source(path, options).await
  }

  /// Search cities/regencies by name.
  pub async fn search_locations(&self, keyword: &str) -> Result<CacheResult<Vec<Location>>> {
    let path = format!("/sholat/kabkota/cari/{}", encode_segment(keyword));
    self
      .get(&path, RequestOptions::new())
      .await?
      .try_map(|payload| decode_list(at_path(&payload, &["data"])))
  }

  /// Prayer schedule for a location; `period` is `today`, `YYYY-MM` or `YYYY-MM-DD`.
  pub async fn prayer_schedule(
    &self,
    location_id: &str,
    period: &str,
  ) -> Result<CacheResult<Vec<PrayerDay>>> {
    let path = format!(
      "/sholat/jadwal/{}/{}",
      encode_segment(location_id),
      encode_segment(period)
    );
    self.get(&path, RequestOptions::new()).await?.try_map(|payload| {
      let schedule = first_present(
        &payload,
        &[&["data", "jadwal"], &["data", "data", "jadwal"], &["jadwal"]],
      );
      schedule
        .map(collection_items)
        .unwrap_or_default()
        .into_iter()
        .map(|day| serde_json::from_value::<PrayerDay>(day.clone()).map_err(ApiError::from))
        .collect()
    })
  }

  pub async fn calendar_today(&self) -> Result<CacheResult<CalendarDay>> {
    let options = RequestOptions::new().cache_seconds(CALENDAR_TODAY_CACHE_SECONDS);
    self.get("/cal/today", options).await?.try_map(decode_data)
  }

  /// Convert a Gregorian date (`YYYY-MM-DD`).
  pub async fn calendar_from_gregorian(&self, date: &str) -> Result<CacheResult<CalendarDay>> {
    let path = format!("/cal/ce/{}", encode_segment(date));
    self.get(&path, RequestOptions::new()).await?.try_map(decode_data)
  }

  /// Convert a Hijri date (`YYYY-MM-DD`).
  pub async fn calendar_from_hijri(&self, date: &str) -> Result<CacheResult<CalendarDay>> {
    let path = format!("/cal/hijr/{}", encode_segment(date));
    self.get(&path, RequestOptions::new()).await?.try_map(decode_data)
  }

  /// The surah index.
  pub async fn surahs(&self) -> Result<CacheResult<Vec<SurahSummary>>> {
    let options = RequestOptions::new().cache_seconds(SURAH_INDEX_CACHE_SECONDS);
    self
      .get("/quran", options)
      .await?
      .try_map(|payload| decode_list(at_path(&payload, &["data"])))
  }

  pub async fn surah(&self, number: &str) -> Result<CacheResult<SurahDetail>> {
    let path = format!("/quran/{}", encode_segment(number));
    self.get(&path, RequestOptions::new()).await?.try_map(decode_data)
  }

  pub async fn ayah(&self, surah: &str, ayah: &str) -> Result<CacheResult<Ayah>> {
    let path = format!("/quran/{}/{}", encode_segment(surah), encode_segment(ayah));
    self.get(&path, RequestOptions::new()).await?.try_map(decode_data)
  }

  /// A random hadith, always fetched from the network.
  pub async fn random_hadis(&self) -> Result<CacheResult<Hadis>> {
    let options = RequestOptions::new().cache_seconds(0);
    self
      .get("/hadis/enc/random", options)
      .await?
      .try_map(decode_data)
  }

  pub async fn search_hadis(&self, keyword: &str) -> Result<CacheResult<Vec<Hadis>>> {
    let path = format!("/hadis/enc/cari/{}", encode_segment(keyword));
    self.get(&path, RequestOptions::new()).await?.try_map(|payload| {
      decode_list(first_present(&payload, &[&["data", "hadis"], &["data"]]))
    })
  }

  /// Page through the hadith collection. Empty page/limit use the defaults.
  pub async fn explore_hadis(&self, page: &str, limit: &str) -> Result<CacheResult<Vec<Hadis>>> {
    let path = format!("/hadis/enc/explore?{}", page_query(page, limit));
    self
      .get(&path, RequestOptions::new())
      .await?
      .try_map(|payload| decode_list(at_path(&payload, &["data", "hadis"])))
  }

  pub async fn hadis(&self, id: &str) -> Result<CacheResult<Hadis>> {
    self.hadis_at("show", id).await
  }

  pub async fn next_hadis(&self, id: &str) -> Result<CacheResult<Hadis>> {
    self.hadis_at("next", id).await
  }

  pub async fn prev_hadis(&self, id: &str) -> Result<CacheResult<Hadis>> {
    self.hadis_at("prev", id).await
  }

  async fn hadis_at(&self, relation: &str, id: &str) -> Result<CacheResult<Hadis>> {
    let path = format!("/hadis/enc/{}/{}", relation, encode_segment(id));
    self.get(&path, RequestOptions::new()).await?.try_map(decode_data)
  }

  /// Page through the narrator collection. Empty page/limit use the defaults.
  pub async fn browse_perawi(&self, page: &str, limit: &str) -> Result<CacheResult<Vec<Perawi>>> {
    let path = format!("/hadist/perawi/browse?{}", page_query(page, limit));
    self
      .get(&path, RequestOptions::new())
      .await?
      .try_map(|payload| decode_list(at_path(&payload, &["data", "rawi"])))
  }

  pub async fn perawi(&self, id: &str) -> Result<CacheResult<Perawi>> {
    let path = format!("/hadist/perawi/id/{}", encode_segment(id));
    self.get(&path, RequestOptions::new()).await?.try_map(decode_data)
  }
}

/// Decode `payload.data ?? payload` into `D`.
fn decode_data<D: DeserializeOwned>(payload: Value) -> Result<D> {
  Ok(serde_json::from_value(unwrap_data(&payload).clone())?)
}

/// Decode a list; a missing list, or anything that isn't an array, is empty.
fn decode_list<D: DeserializeOwned>(list: Option<&Value>) -> Result<Vec<D>> {
  match list {
    Some(list @ Value::Array(_)) => Ok(serde_json::from_value(list.clone())?),
    _ => Ok(Vec::new()),
  }
}

/// Percent-encode one path segment.
pub fn encode_segment(segment: &str) -> String {
  // form encoding turns spaces into '+' and escapes a literal '+', so the swap is safe
  url::form_urlencoded::byte_serialize(segment.as_bytes())
    .collect::<String>()
    .replace('+', "%20")
}

fn page_query(page: &str, limit: &str) -> String {
  let page = if page.trim().is_empty() { DEFAULT_PAGE } else { page.trim() };
  let limit = if limit.trim().is_empty() { DEFAULT_LIMIT } else { limit.trim() };
  url::form_urlencoded::Serializer::new(String::new())
    .append_pair("page", page)
    .append_pair("limit", limit)
    .finish()
}

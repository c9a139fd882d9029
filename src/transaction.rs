//! Transaction ID generation for X (Twitter) API requests.

use data_encoding::BASE64;
use tracing::{
   debug,
   trace,
};

#[cfg(feature = "fetch")]
use crate::fetch::MinreqFetcher;
use crate::{
   animation::{
      self,
      Frame,
      NIBBLE_MODULUS,
   },
   config::Config,
   document::StructuredDocument,
   error::Error,
   extract,
   fetch::PageFetcher,
   markup::MarkupDocument,
   migration::resolve_migration,
   source::{
      Clock,
      RandomByteSource,
      SystemClock,
      ThreadRandom,
   },
   token::{
      self,
      KEYWORD,
      RANDOM_SALT,
      TokenParts,
   },
};

/// Key material for generating X (Twitter) transaction IDs.
///
/// Holds the verification key bytes and the animation key derived from X's
/// home page and ondemand script. It never changes after construction, so
/// one context can be shared by every request of a session. Create one with
/// [`fetch`](Self::fetch) (requires `fetch` feature), [`build`](Self::build)
/// or [`from_html`](Self::from_html).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionContext {
   key_bytes:     Vec<u8>,
   animation_key: String,
   keyword:       &'static str,
   random_salt:   u8,
}

impl TransactionContext {
   /// Fetches x.com and creates a ready-to-use context.
   ///
   /// ```ignore
   /// let context = TransactionContext::fetch()?;
   /// let id = context.generate_token("GET", "/i/api/1.1/jot/client_event.json");
   /// ```
   #[cfg(feature = "fetch")]
   pub fn fetch() -> Result<Self, Error> {
      Self::fetch_with(&Config::default())
   }

   /// [`fetch`](Self::fetch) against custom endpoints.
   #[cfg(feature = "fetch")]
   pub fn fetch_with(config: &Config) -> Result<Self, Error> {
      let fetcher = MinreqFetcher::new(config.user_agent.as_str());
      let home_page_html = fetcher.get(&config.home_url)?;
      Self::build_with(
         MarkupDocument::parse(&home_page_html),
         &fetcher,
         config,
      )
   }

   /// Creates a context from a parsed home page, fetching the rest with
   /// `fetcher`.
   pub fn build<D, F>(home_page: D, fetcher: &F) -> Result<Self, Error>
   where
      D: StructuredDocument,
      F: PageFetcher + ?Sized,
   {
      Self::build_with(home_page, fetcher, &Config::default())
   }

   /// [`build`](Self::build) against custom endpoints.
   pub fn build_with<D, F>(home_page: D, fetcher: &F, config: &Config) -> Result<Self, Error>
   where
      D: StructuredDocument,
      F: PageFetcher + ?Sized,
   {
      let (home_page, migration) = resolve_migration(home_page, &config.home_url, fetcher)?;
      debug!(?migration, "home page ready");

      let ondemand_url = extract::ondemand_url(&home_page.html(), &config.ondemand_base_url)?;
      debug!(url = %ondemand_url, "fetching ondemand script");
      let ondemand_js = fetcher.get(&ondemand_url)?;

      Self::from_documents(&home_page, &ondemand_js)
   }

   /// Creates a context from pre-fetched HTML and JavaScript.
   ///
   /// Use this if you want to bring your own HTTP client. The home page must
   /// already be past any migration redirect.
   pub fn from_html(home_page_html: &str, ondemand_js: &str) -> Result<Self, Error> {
      Self::from_documents(&MarkupDocument::parse(home_page_html), ondemand_js)
   }

   /// Finds the ondemand script URL on a home page, for use with
   /// [`from_html`](Self::from_html).
   pub fn ondemand_url(home_page_html: &str) -> Result<String, Error> {
      extract::ondemand_url(home_page_html, crate::config::DEFAULT_ONDEMAND_BASE_URL)
   }

   /// Creates a context from previously derived key material.
   pub fn from_parts(key_bytes: Vec<u8>, animation_key: impl Into<String>) -> Self {
      Self {
         key_bytes,
         animation_key: animation_key.into(),
         keyword: KEYWORD,
         random_salt: RANDOM_SALT,
      }
   }

   fn from_documents<D: StructuredDocument>(
      home_page: &D,
      ondemand_js: &str,
   ) -> Result<Self, Error> {
      let (row_index, key_byte_indices) = extract::key_byte_indices(ondemand_js)?;
      debug!(row_index, indices = key_byte_indices.len(), "parsed key byte indices");

      let key_bytes = BASE64.decode(extract::verification_key(home_page)?.as_bytes())?;

      let path = extract::frame_path(home_page, &key_bytes)?;
      let rows = extract::parse_path_data(&path)?;

      let row_selector = key_bytes.get(row_index).ok_or(Error::OutOfRange {
         what:  "row index",
         index: row_index,
         len:   key_bytes.len(),
      })?;
      let row = usize::from(row_selector % NIBBLE_MODULUS);
      let frame = rows.get(row).ok_or(Error::OutOfRange {
         what:  "frame row",
         index: row,
         len:   rows.len(),
      })?;
      let frame = Frame::try_from(frame.as_slice())?;

      let target_time = animation::target_time(&key_bytes, &key_byte_indices)?;
      debug!(row, target_time, "sampling animation frame");

      let animation_key = animation::animation_key(&frame, target_time)?;
      debug!(len = animation_key.len(), "derived animation key");

      Ok(Self::from_parts(key_bytes, animation_key))
   }

   /// Generates a transaction ID for an API request.
   #[must_use]
   pub fn generate_token(&self, method: &str, path: &str) -> String {
      self.generate_token_with(method, path, &SystemClock, &mut ThreadRandom)
   }

   /// Generates a transaction ID with the given time and randomness.
   #[must_use]
   pub fn generate_token_with(
      &self,
      method: &str,
      path: &str,
      clock: &impl Clock,
      random: &mut impl RandomByteSource,
   ) -> String {
      let timestamp = token::encode_timestamp(clock.now_unix_seconds());
      trace!(method, path, timestamp, "generating transaction id");

      let parts = TokenParts {
         key_bytes:     &self.key_bytes,
         animation_key: &self.animation_key,
         keyword:       self.keyword,
         random_salt:   self.random_salt,
      };
      token::assemble_token(&parts, method, path, timestamp, random.next_byte())
   }

   pub fn secret_bytes(&self) -> &[u8] {
      &self.key_bytes
   }

   pub fn animation_key(&self) -> &str {
      &self.animation_key
   }

   pub const fn keyword(&self) -> &'static str {
      self.keyword
   }

   pub const fn random_salt(&self) -> u8 {
      self.random_salt
   }
}

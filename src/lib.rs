//! Generate X (Twitter) client transaction IDs.
//!
//! ```ignore
//! use x_client_txid::TransactionContext;
//!
//! let context = TransactionContext::fetch()?;
//! let id = context.generate_token("GET", "/i/api/1.1/jot/client_event.json");
//! ```
//!
//! To bring your own HTTP client:
//!
//! ```ignore
//! use x_client_txid::TransactionContext;
//!
//! let html = your_client.get("https://x.com").text()?;
//! let js_url = TransactionContext::ondemand_url(&html)?;
//! let js = your_client.get(&js_url).text()?;
//! let context = TransactionContext::from_html(&html, &js)?;
//! ```
//!
//! Or implement [`PageFetcher`] (and optionally [`StructuredDocument`]) and
//! use [`TransactionContext::build`], which also follows the twitter.com
//! migration redirect.

pub mod animation;
mod config;
pub mod cubic_curve;
mod document;
mod error;
mod extract;
mod fetch;
pub mod interpolate;
mod markup;
mod migration;
pub mod numeric;
pub mod rotation;
mod source;
pub mod token;
mod transaction;

pub use animation::Frame;
pub use config::Config;
pub use cubic_curve::CubicBezier;
pub use document::{
   AttrMatch,
   Selector,
   StructuredDocument,
};
pub use error::{
   Error,
   ErrorKind,
   TransportError,
};
#[cfg(feature = "fetch")]
pub use fetch::MinreqFetcher;
pub use fetch::PageFetcher;
pub use markup::{
   ElementId,
   MarkupDocument,
};
pub use migration::{
   Migration,
   resolve_migration,
};
pub use source::{
   Clock,
   FixedByte,
   FixedClock,
   RandomByteSource,
   SystemClock,
   ThreadRandom,
};
pub use transaction::TransactionContext;

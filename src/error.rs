//! Error types.

use std::{
   error::Error as StdError,
   fmt,
};

/// Boxed error returned by a [`PageFetcher`](crate::PageFetcher).
pub type TransportError = Box<dyn StdError + Send + Sync>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
   /// An expected pattern, tag, or element is absent.
   NotFound,
   /// A computed index exceeds the available data.
   OutOfRange,
   /// Interpolation vectors of unequal length.
   ShapeMismatch,
   /// Data was present but could not be understood.
   MalformedData,
   /// The network layer failed.
   TransportFailure,
}

impl ErrorKind {
   /// Whether retrying the whole setup may succeed.
   ///
   /// Everything except transport failures means X changed its page
   /// structure and the extraction has to be updated.
   #[must_use]
   pub const fn is_transient(self) -> bool {
      matches!(self, Self::TransportFailure)
   }
}

#[derive(Debug)]
pub enum Error {
   /// Required pattern, tag, element or attribute not found.
   NotFound(&'static str),
   /// An index derived from the key bytes points past the data.
   OutOfRange {
      what:  &'static str,
      index: usize,
      len:   usize,
   },
   /// Interpolation arrays have different lengths.
   ShapeMismatch { from: usize, to: usize },
   /// Path data, frames or script data that cannot be parsed.
   MalformedData(String),
   /// Base64 decoding of the verification key failed.
   Base64(data_encoding::DecodeError),
   /// A [`PageFetcher`](crate::PageFetcher) failed.
   Transport {
      url:    String,
      source: TransportError,
   },
   /// HTTP request failed.
   #[cfg(feature = "fetch")]
   Http(minreq::Error),
   /// HTTP response returned non-200 status.
   #[cfg(feature = "fetch")]
   HttpStatus(i32, String),
}

impl Error {
   /// Classifies this error.
   #[must_use]
   pub const fn kind(&self) -> ErrorKind {
      match *self {
         Self::NotFound(_) => ErrorKind::NotFound,
         Self::OutOfRange { .. } => ErrorKind::OutOfRange,
         Self::ShapeMismatch { .. } => ErrorKind::ShapeMismatch,
         Self::MalformedData(_) | Self::Base64(_) => ErrorKind::MalformedData,
         Self::Transport { .. } => ErrorKind::TransportFailure,
         #[cfg(feature = "fetch")]
         Self::Http(_) | Self::HttpStatus(..) => ErrorKind::TransportFailure,
      }
   }

   /// Wraps a network failure from a custom [`PageFetcher`](crate::PageFetcher).
   pub fn transport(url: &str, source: TransportError) -> Self {
      Self::Transport {
         url: url.to_owned(),
         source,
      }
   }
}

impl fmt::Display for Error {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      match *self {
         Self::NotFound(what) => write!(f, "not found: {what}"),
         Self::OutOfRange { what, index, len } => {
            write!(f, "{what} {index} out of range (have {len})")
         },
         Self::ShapeMismatch { from, to } => {
            write!(f, "interpolation arrays have different lengths ({from} vs {to})")
         },
         Self::MalformedData(ref msg) => write!(f, "malformed data: {msg}"),
         Self::Base64(ref err) => write!(f, "base64 decode error: {err}"),
         Self::Transport { ref url, ref source } => write!(f, "fetching {url} failed: {source}"),
         #[cfg(feature = "fetch")]
         Self::Http(ref err) => write!(f, "HTTP error: {err}"),
         #[cfg(feature = "fetch")]
         Self::HttpStatus(code, ref url) => write!(f, "{url} returned HTTP {code}"),
      }
   }
}

impl StdError for Error {
   fn source(&self) -> Option<&(dyn StdError + 'static)> {
      match *self {
         Self::Base64(ref err) => Some(err),
         Self::Transport { ref source, .. } => Some(&**source),
         Self::NotFound(_)
         | Self::OutOfRange { .. }
         | Self::ShapeMismatch { .. }
         | Self::MalformedData(_) => None,
         #[cfg(feature = "fetch")]
         Self::Http(ref err) => Some(err),
         #[cfg(feature = "fetch")]
         Self::HttpStatus(..) => None,
      }
   }
}

impl From<data_encoding::DecodeError> for Error {
   fn from(err: data_encoding::DecodeError) -> Self {
      Self::Base64(err)
   }
}

#[cfg(feature = "fetch")]
impl From<minreq::Error> for Error {
   fn from(err: minreq::Error) -> Self {
      Self::Http(err)
   }
}

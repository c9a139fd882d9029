//! Page fetching.

use crate::error::Error;

/// Blocking HTTP access used during setup.
///
/// Implement this to bring your own HTTP client. Failures should be wrapped
/// with [`Error::transport`] so callers can tell them apart from page
/// changes.
pub trait PageFetcher {
   /// GETs `url` and returns the body.
   fn get(&self, url: &str) -> Result<String, Error>;

   /// POSTs `fields` as `application/x-www-form-urlencoded` to `url`.
   fn post_form(&self, url: &str, fields: &[(String, String)]) -> Result<String, Error>;
}

impl<F: PageFetcher + ?Sized> PageFetcher for &F {
   fn get(&self, url: &str) -> Result<String, Error> {
      (**self).get(url)
   }

   fn post_form(&self, url: &str, fields: &[(String, String)]) -> Result<String, Error> {
      (**self).post_form(url, fields)
   }
}

/// Encodes `fields` as a form body or query string.
pub fn form_urlencode(fields: &[(String, String)]) -> String {
   url::form_urlencoded::Serializer::new(String::new())
      .extend_pairs(fields)
      .finish()
}

/// [`PageFetcher`] backed by `minreq`.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct MinreqFetcher {
   user_agent: String,
}

#[cfg(feature = "fetch")]
impl MinreqFetcher {
   pub fn new(user_agent: impl Into<String>) -> Self {
      Self {
         user_agent: user_agent.into(),
      }
   }

   fn send(&self, request: minreq::Request, url: &str) -> Result<String, Error> {
      let response = request.with_header("User-Agent", &self.user_agent).send()?;

      if response.status_code != 200 {
         return Err(Error::HttpStatus(response.status_code, url.to_owned()));
      }

      Ok(response.as_str()?.to_owned())
   }
}

#[cfg(feature = "fetch")]
impl Default for MinreqFetcher {
   fn default() -> Self {
      Self::new(crate::config::DEFAULT_USER_AGENT)
   }
}

#[cfg(feature = "fetch")]
impl PageFetcher for MinreqFetcher {
   fn get(&self, url: &str) -> Result<String, Error> {
      tracing::debug!(url, "GET");
      self.send(minreq::get(url), url)
   }

   fn post_form(&self, url: &str, fields: &[(String, String)]) -> Result<String, Error> {
      tracing::debug!(url, fields = fields.len(), "POST form");
      let request = minreq::post(url)
         .with_header("Content-Type", "application/x-www-form-urlencoded")
         .with_body(form_urlencode(fields));
      self.send(request, url)
   }
}

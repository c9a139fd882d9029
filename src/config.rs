//! Where the key material is fetched from.

pub const DEFAULT_HOME_URL: &str = "https://x.com";

pub const DEFAULT_ONDEMAND_BASE_URL: &str = "https://abs.twimg.com/responsive-web/client-web";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                                      AppleWebKit/537.36 (KHTML, like Gecko) \
                                      Chrome/133.0.0.0 Safari/537.36";

/// Endpoints and request identity used during setup.
///
/// ```
/// use x_client_txid::Config;
///
/// let config = Config::default().with_user_agent("my-agent/1.0");
/// assert_eq!(config.home_url, "https://x.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
   /// Page carrying the verification key and animation frames.
   pub home_url:          String,
   /// Directory holding the `ondemand.s.<hash>a.js` scripts.
   pub ondemand_base_url: String,
   pub user_agent:        String,
}

impl Default for Config {
   fn default() -> Self {
      Self {
         home_url:          DEFAULT_HOME_URL.to_owned(),
         ondemand_base_url: DEFAULT_ONDEMAND_BASE_URL.to_owned(),
         user_agent:        DEFAULT_USER_AGENT.to_owned(),
      }
   }
}

impl Config {
   #[must_use]
   pub fn with_home_url(mut self, url: impl Into<String>) -> Self {
      self.home_url = url.into();
      self
   }

   #[must_use]
   pub fn with_ondemand_base_url(mut self, url: impl Into<String>) -> Self {
      self.ondemand_base_url = url.into().trim_end_matches('/').to_owned();
      self
   }

   #[must_use]
   pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
      self.user_agent = user_agent.into();
      self
   }
}

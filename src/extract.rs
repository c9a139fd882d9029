//! Pulling the key material out of X's home page and ondemand script.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::{
   document::{
      Selector,
      StructuredDocument,
   },
   error::Error,
};

static ONDEMAND_HASH: LazyLock<Regex> = LazyLock::new(|| {
   Regex::new(r#"["']ondemand\.s["']\s*:\s*["'](\w+)["']"#).expect("ondemand pattern is valid")
});

/// Matches `(e[12], 16)`, the nibble reads in the ondemand script.
static KEY_BYTE_INDEX: LazyLock<Regex> = LazyLock::new(|| {
   Regex::new(r"\(\w\[(\d{1,2})\],\s*16\)").expect("key byte index pattern is valid")
});

pub static MIGRATION_URL: LazyLock<Regex> = LazyLock::new(|| {
   Regex::new(r"https?://(?:www\.)?(?:twitter|x)\.com(?:/x)?/migrate(?:[/?])?tok=[a-zA-Z0-9%\-_]+")
      .expect("migration pattern is valid")
});

const VERIFICATION_META: Selector<'static> =
   Selector::attr_eq("name", "twitter-site-verification").with_tag("meta");

const ANIMATION_FRAMES: Selector<'static> = Selector::attr_prefix("id", "loading-x-anim");

/// Number of `loading-x-anim` SVGs on the page.
pub const FRAME_COUNT: u8 = 4;

/// Key byte that selects the animation SVG.
pub const FRAME_SELECTOR_INDEX: usize = 5;

/// Length of the `M` move command every frame path starts with.
const PATH_PREFIX_LEN: usize = 9;

/// Extracts the ondemand.s.*.js URL from homepage HTML.
pub fn ondemand_url(home_page_html: &str, base_url: &str) -> Result<String, Error> {
   if let Some(hash) = ONDEMAND_HASH
      .captures(home_page_html)
      .and_then(|captures| captures.get(1))
   {
      return Ok(format!("{base_url}/ondemand.s.{}a.js", hash.as_str()));
   }

   // Tell a blocked request apart from a page redesign.
   Err(Error::NotFound(
      if home_page_html.contains("login") || home_page_html.contains("LoginForm") {
         "ondemand.s script hash (received login page, may need cookies)"
      } else if home_page_html.len() < 10_000 {
         "ondemand.s script hash (response too small, may be rate limited or blocked)"
      } else {
         "ondemand.s script hash (X may have changed their page structure)"
      },
   ))
}

/// Finds every `(e[N], 16)` in the script. The first is the row index, the
/// rest index the key bytes multiplied into the frame time.
pub fn key_byte_indices(ondemand_js: &str) -> Result<(usize, Vec<usize>), Error> {
   let indices = KEY_BYTE_INDEX
      .captures_iter(ondemand_js)
      .filter_map(|captures| captures.get(1)?.as_str().parse::<usize>().ok())
      .collect::<Vec<_>>();

   match *indices.as_slice() {
      [row_index, ref rest @ ..] if !rest.is_empty() => Ok((row_index, rest.to_vec())),
      _ => Err(Error::NotFound("key byte indices")),
   }
}

/// Reads the base64 verification key from its meta tag.
pub fn verification_key<D: StructuredDocument>(document: &D) -> Result<String, Error> {
   document
      .find_first(&VERIFICATION_META)
      .and_then(|meta| document.attr(&meta, "content"))
      .ok_or(Error::NotFound("twitter-site-verification meta tag"))
}

/// Returns the `d` attribute of the frame path chosen by the key.
///
/// The path is the second child of the first child of the selected SVG.
pub fn frame_path<D: StructuredDocument>(document: &D, key_bytes: &[u8]) -> Result<String, Error> {
   let selector = key_bytes
      .get(FRAME_SELECTOR_INDEX)
      .ok_or(Error::OutOfRange {
         what:  "frame selector byte",
         index: FRAME_SELECTOR_INDEX,
         len:   key_bytes.len(),
      })?;
   let frame_index = usize::from(selector % FRAME_COUNT);

   let frames = document.find_all(&ANIMATION_FRAMES);
   if frames.is_empty() {
      return Err(Error::NotFound("loading-x-anim animation frames"));
   }

   let frame = frames.get(frame_index).ok_or(Error::OutOfRange {
      what:  "animation frame",
      index: frame_index,
      len:   frames.len(),
   })?;

   let group = document
      .children(frame)
      .into_iter()
      .next()
      .ok_or(Error::NotFound("animation frame group"))?;

   let path = document
      .children(&group)
      .into_iter()
      .nth(1)
      .ok_or(Error::NotFound("animation frame path"))?;

   document
      .attr(&path, "d")
      .ok_or(Error::NotFound("animation frame path data"))
}

/// Splits path data into one integer row per `C` segment.
pub fn parse_path_data(path_d: &str) -> Result<Vec<Vec<i32>>, Error> {
   let body = path_d
      .get(PATH_PREFIX_LEN..)
      .filter(|body| !body.is_empty())
      .ok_or_else(|| {
         Error::MalformedData(format!("path data too short ({} bytes)", path_d.len()))
      })?;

   body.split('C').map(parse_segment).collect()
}

fn parse_segment(segment: &str) -> Result<Vec<i32>, Error> {
   segment
      .replace(|chr: char| !chr.is_ascii_digit() && chr != '-', " ")
      .split_whitespace()
      // A lone sign carries no value.
      .filter(|token| token.bytes().any(|byte| byte.is_ascii_digit()))
      .map(|token| {
         token
            .parse::<i32>()
            .map_err(|_| {
               debug!(token, segment, "rejecting path value");
               Error::MalformedData(format!("non-numeric path value {token:?}"))
            })
      })
      .collect()
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::{
      ErrorKind,
      markup::MarkupDocument,
   };

   const BASE: &str = "https://abs.twimg.com/responsive-web/client-web";

   #[test]
   fn verification_key_extraction() {
      let doc = MarkupDocument::parse(
         r#"<html><head><meta name="twitter-site-verification" content="abc123xyz"/></head></html>"#,
      );
      assert_eq!(verification_key(&doc).unwrap(), "abc123xyz");
   }

   #[test]
   fn verification_key_missing() {
      let doc =
         MarkupDocument::parse(r#"<html><head><meta name="other" content="x"></head></html>"#);
      let err = verification_key(&doc).unwrap_err();
      assert_eq!(err.kind(), ErrorKind::NotFound);
   }

   #[test]
   fn ondemand_url_extraction() {
      let html = r#"something "ondemand.s": "abc123def" something"#;
      assert_eq!(
         ondemand_url(html, BASE).unwrap(),
         "https://abs.twimg.com/responsive-web/client-web/ondemand.s.abc123defa.js"
      );
   }

   #[test]
   fn ondemand_url_single_quotes() {
      let html = "something 'ondemand.s':'xyz789' something";
      assert_eq!(
         ondemand_url(html, BASE).unwrap(),
         "https://abs.twimg.com/responsive-web/client-web/ondemand.s.xyz789a.js"
      );
   }

   #[test]
   fn ondemand_url_missing() {
      let err = ondemand_url("no ondemand here", BASE).unwrap_err();
      assert_eq!(err.kind(), ErrorKind::NotFound);
      assert!(err.to_string().contains("too small"));

      let err = ondemand_url("<form id=LoginForm>", BASE).unwrap_err();
      assert!(err.to_string().contains("login page"));
   }

   #[test]
   fn indices_parsing() {
      let js = "foo(e[5], 16)bar(e[10],16)x(t[2],  16)padding(e[123], 16)";
      let (row_index, indices) = key_byte_indices(js).unwrap();
      assert_eq!(row_index, 5);
      assert_eq!(indices, vec![10, 2]);
   }

   #[test]
   fn indices_need_two_matches() {
      key_byte_indices("no indices here").unwrap_err();
      let err = key_byte_indices("foo(e[5], 16)").unwrap_err();
      assert_eq!(err.kind(), ErrorKind::NotFound);
   }

   #[test]
   fn migration_url_pattern() {
      let content = "0; url = https://twitter.com/x/migrate?tok=abc%2D_9";
      let found = MIGRATION_URL.find(content).unwrap();
      assert_eq!(found.as_str(), "https://twitter.com/x/migrate?tok=abc%2D_9");
      assert!(MIGRATION_URL.find("https://x.com/home").is_none());
   }

   #[test]
   fn parse_path_coordinates() {
      let rows = parse_path_data("M0 0 0 0C10 20 30 40 50 60C70,-80 90 h100 110").unwrap();
      assert_eq!(rows, vec![vec![10, 20, 30, 40, 50, 60], vec![70, -80, 90, 100, 110]]);
   }

   #[test]
   fn parse_path_skips_lone_signs() {
      let rows = parse_path_data("M 10,30 C 1 - 2C-3").unwrap();
      assert_eq!(rows, vec![vec![1, 2], vec![-3]]);
   }

   #[test]
   fn parse_path_rejects_bad_data() {
      let err = parse_path_data("M0 0 0 0").unwrap_err();
      assert_eq!(err.kind(), ErrorKind::MalformedData);

      // Digits joined by a dash are one value that does not parse, not two.
      let err = parse_path_data("M0 0 0 0C1-2").unwrap_err();
      assert_eq!(err.kind(), ErrorKind::MalformedData);
      assert!(err.to_string().contains(r#""1-2""#));

      parse_path_data("M0 0 0 0C99999999999").unwrap_err();
   }

   #[test]
   fn frame_path_selection() {
      let doc = MarkupDocument::parse(concat!(
         r#"<div id="loading-x-anim-0"><g><path d="a"/><path d="first"/></g></div>"#,
         r#"<div id="loading-x-anim-1"><g><path d="b"/><path d="second"/></g></div>"#,
         r#"<div id="loading-x-anim-2"><g><path d="c"/></g></div>"#,
      ));

      // key_bytes[5] % 4 picks the frame.
      assert_eq!(frame_path(&doc, &[0, 0, 0, 0, 0, 4]).unwrap(), "first");
      assert_eq!(frame_path(&doc, &[0, 0, 0, 0, 0, 9]).unwrap(), "second");

      let err = frame_path(&doc, &[0, 0, 0, 0, 0, 2]).unwrap_err();
      assert_eq!(err.kind(), ErrorKind::NotFound);

      let err = frame_path(&doc, &[0, 0, 0, 0, 0, 3]).unwrap_err();
      assert!(matches!(err, Error::OutOfRange { index: 3, len: 3, .. }));

      let err = frame_path(&doc, &[0, 0, 0]).unwrap_err();
      assert_eq!(err.kind(), ErrorKind::OutOfRange);
   }
}

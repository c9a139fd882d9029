//! twitter.com -> x.com migration handling.
//!
//! Visitors without X cookies sometimes get an interstitial that bounces
//! them through `/x/migrate`, either with a meta refresh or with a form
//! that auto-submits. The real home page is only served after that hop.

use tracing::{
   debug,
   warn,
};
use url::Url;

use crate::{
   document::{
      Selector,
      StructuredDocument,
   },
   error::Error,
   extract::MIGRATION_URL,
   fetch::{
      PageFetcher,
      form_urlencode,
   },
};

const DEFAULT_MIGRATE_ACTION: &str = "https://x.com/x/migrate";

const META_REFRESH: Selector<'static> = Selector::attr_eq("http-equiv", "refresh").with_tag("meta");
const NAMED_FORM: Selector<'static> = Selector::attr_eq("name", "f").with_tag("form");
const MIGRATE_FORM: Selector<'static> =
   Selector::attr_eq("action", DEFAULT_MIGRATE_ACTION).with_tag("form");
const INPUT: Selector<'static> = Selector::tag("input");

/// Which hop, if any, was taken to reach the home page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Migration {
   None,
   MetaRefresh(String),
   Form { action: String, method: String },
}

/// A form that has to be submitted to finish the migration.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MigrationForm {
   action: String,
   method: String,
   fields: Vec<(String, String)>,
}

fn meta_refresh_target<D: StructuredDocument>(document: &D) -> Option<String> {
   let meta = document.find_first(&META_REFRESH)?;
   let content = document.attr(&meta, "content")?;
   MIGRATION_URL
      .find(&content)
      .map(|found| found.as_str().to_owned())
}

fn migration_form<D: StructuredDocument>(document: &D, page_url: &str) -> Option<MigrationForm> {
   let form = document
      .find_first(&NAMED_FORM)
      .or_else(|| document.find_first(&MIGRATE_FORM))?;

   let action = document
      .attr(&form, "action")
      .filter(|action| !action.is_empty())
      .map_or_else(
         || DEFAULT_MIGRATE_ACTION.to_owned(),
         |action| resolve(page_url, &action),
      );

   let method = document
      .attr(&form, "method")
      .map_or_else(|| "POST".to_owned(), |method| method.trim().to_uppercase());

   let mut fields: Vec<(String, String)> = Vec::new();
   for input in document.find_within(&form, &INPUT) {
      let (Some(name), Some(value)) =
         (document.attr(&input, "name"), document.attr(&input, "value"))
      else {
         continue;
      };

      match fields.iter_mut().find(|(existing, _)| *existing == name) {
         Some(field) => field.1 = value,
         None => fields.push((name, value)),
      }
   }

   // Fields go out with their keys sorted.
   fields.sort_unstable_by(|(left, _), (right, _)| left.cmp(right));

   Some(MigrationForm {
      action,
      method,
      fields,
   })
}

/// Resolves a possibly relative form action against the page it came from.
fn resolve(page_url: &str, action: &str) -> String {
   Url::parse(page_url)
      .and_then(|base| base.join(action))
      .map_or_else(|_| action.to_owned(), String::from)
}

/// Follows the migration hop if `document` is the interstitial.
///
/// Returns the document to use as the home page and the hop that was taken.
pub fn resolve_migration<D, F>(
   document: D,
   page_url: &str,
   fetcher: &F,
) -> Result<(D, Migration), Error>
where
   D: StructuredDocument,
   F: PageFetcher + ?Sized,
{
   if let Some(target) = meta_refresh_target(&document) {
      warn!(url = %target, "following migration meta refresh");
      let html = fetcher.get(&target)?;
      return Ok((D::from_html(&html), Migration::MetaRefresh(target)));
   }

   if let Some(form) = migration_form(&document, page_url) {
      warn!(action = %form.action, method = %form.method, "submitting migration form");
      let html = if form.method == "POST" {
         fetcher.post_form(&form.action, &form.fields)?
      } else {
         fetcher.get(&format!("{}?{}", form.action, form_urlencode(&form.fields)))?
      };
      return Ok((D::from_html(&html), Migration::Form {
         action: form.action,
         method: form.method,
      }));
   }

   debug!("no migration needed");
   Ok((document, Migration::None))
}

//! Read-only access to a parsed HTML page.
//!
//! The setup code only needs a handful of lookups, so any HTML parser can be
//! plugged in by implementing [`StructuredDocument`]. [`MarkupDocument`]
//! is the bundled implementation.
//!
//! [`MarkupDocument`]: crate::MarkupDocument

use std::borrow::Cow;

/// How an attribute value has to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrMatch<'a> {
   /// `[name="value"]`
   Equals(&'a str, &'a str),
   /// `[name^="value"]`
   Prefix(&'a str, &'a str),
}

/// A single compound selector: an optional tag plus an optional attribute
/// test, e.g. `meta[name="twitter-site-verification"]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selector<'a> {
   pub tag:       Option<&'a str>,
   pub attribute: Option<AttrMatch<'a>>,
}

impl<'a> Selector<'a> {
   /// Matches every element with this tag name.
   pub const fn tag(tag: &'a str) -> Self {
      Self {
         tag:       Some(tag),
         attribute: None,
      }
   }

   /// Matches elements whose attribute equals `value`.
   pub const fn attr_eq(name: &'a str, value: &'a str) -> Self {
      Self {
         tag:       None,
         attribute: Some(AttrMatch::Equals(name, value)),
      }
   }

   /// Matches elements whose attribute starts with `value`.
   pub const fn attr_prefix(name: &'a str, value: &'a str) -> Self {
      Self {
         tag:       None,
         attribute: Some(AttrMatch::Prefix(name, value)),
      }
   }

   /// Restricts the selector to one tag name.
   #[must_use]
   pub const fn with_tag(mut self, tag: &'a str) -> Self {
      self.tag = Some(tag);
      self
   }

   /// Tests an element given its tag name and an attribute lookup.
   ///
   /// Tag names compare ASCII case-insensitively, attribute values exactly.
   pub fn matches<'v>(&self, tag: &str, attr: impl Fn(&str) -> Option<&'v str>) -> bool {
      if let Some(want) = self.tag
         && !want.eq_ignore_ascii_case(tag)
      {
         return false;
      }

      match self.attribute {
         None => true,
         Some(AttrMatch::Equals(name, value)) => attr(name) == Some(value),
         Some(AttrMatch::Prefix(name, value)) => {
            attr(name).is_some_and(|got| got.starts_with(value))
         },
      }
   }
}

/// A parsed page that can be queried for elements and attributes.
pub trait StructuredDocument: Sized {
   /// Handle to one element of this document.
   type Element: Clone;

   /// Parses a whole page.
   fn from_html(html: &str) -> Self;

   /// Every matching element, in document order.
   fn find_all(&self, selector: &Selector<'_>) -> Vec<Self::Element>;

   /// Every matching descendant of `element`, in document order.
   fn find_within(&self, element: &Self::Element, selector: &Selector<'_>) -> Vec<Self::Element>;

   /// Direct child elements of `element`, in document order.
   fn children(&self, element: &Self::Element) -> Vec<Self::Element>;

   fn attr(&self, element: &Self::Element, name: &str) -> Option<String>;

   /// The page source, used for pattern searches across inline scripts.
   fn html(&self) -> Cow<'_, str>;

   /// The first matching element.
   fn find_first(&self, selector: &Selector<'_>) -> Option<Self::Element> {
      self.find_all(selector).into_iter().next()
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   fn lookup<'v>(attrs: &'v [(&'v str, &'v str)]) -> impl Fn(&str) -> Option<&'v str> {
      move |name: &str| {
         attrs
            .iter()
            .find(|&&(key, _)| key == name)
            .map(|&(_, value)| value)
      }
   }

   #[test]
   fn selector_tag_only() {
      let selector = Selector::tag("meta");
      assert!(selector.matches("meta", lookup(&[])));
      assert!(selector.matches("META", lookup(&[])));
      assert!(!selector.matches("form", lookup(&[])));
   }

   #[test]
   fn selector_attr_equals() {
      let selector = Selector::attr_eq("name", "f").with_tag("form");
      assert!(selector.matches("form", lookup(&[("name", "f")])));
      assert!(!selector.matches("form", lookup(&[("name", "g")])));
      assert!(!selector.matches("div", lookup(&[("name", "f")])));
      assert!(!selector.matches("form", lookup(&[])));
   }

   #[test]
   fn selector_attr_prefix() {
      let selector = Selector::attr_prefix("id", "loading-x-anim");
      assert!(selector.matches("svg", lookup(&[("id", "loading-x-anim-0")])));
      assert!(selector.matches("g", lookup(&[("id", "loading-x-anim")])));
      assert!(!selector.matches("svg", lookup(&[("id", "x-loading-anim")])));
   }
}

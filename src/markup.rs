//! Minimal HTML element scanner.
//!
//! Builds a flat element tree from raw markup, enough for meta tags, forms
//! and inline SVG. It is forgiving rather than conforming: unknown closing
//! tags are ignored, unclosed elements are closed by the nearest matching
//! end tag, and text content is not kept.

use std::borrow::Cow;

use crate::document::{
   Selector,
   StructuredDocument,
};

const VOID_ELEMENTS: &[&str] = &[
   "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
   "track", "wbr",
];

/// Elements whose content is raw text and must not be scanned for tags.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

/// Handle to an element of a [`MarkupDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(usize);

#[derive(Debug)]
struct Node {
   tag:    String,
   attrs:  Vec<(String, String)>,
   parent: Option<usize>,
}

impl Node {
   fn attr(&self, name: &str) -> Option<&str> {
      self
         .attrs
         .iter()
         .find(|(key, _)| key.eq_ignore_ascii_case(name))
         .map(|(_, value)| value.as_str())
   }

   fn matches(&self, selector: &Selector<'_>) -> bool {
      selector.matches(&self.tag, |name| self.attr(name))
   }
}

/// A page parsed by the bundled scanner.
#[derive(Debug)]
pub struct MarkupDocument {
   source: String,
   nodes:  Vec<Node>,
}

struct OpenTag {
   tag:          String,
   attrs:        Vec<(String, String)>,
   self_closing: bool,
   end:          usize,
}

impl MarkupDocument {
   pub fn parse(html: &str) -> Self {
      let mut nodes: Vec<Node> = Vec::new();
      let mut stack: Vec<usize> = Vec::new();
      let bytes = html.as_bytes();
      let mut pos = 0;

      while let Some(offset) = html.get(pos..).and_then(|rest| rest.find('<')) {
         let start = pos + offset;
         let rest = &html[start..];

         if rest.starts_with("<!--") {
            pos = find_from(html, start + 4, "-->").map_or(html.len(), |end| end + 3);
            continue;
         }

         if rest.starts_with("<!") || rest.starts_with("<?") {
            pos = find_from(html, start, ">").map_or(html.len(), |end| end + 1);
            continue;
         }

         if let Some(after) = rest.strip_prefix("</") {
            let name_len = tag_name_len(after.as_bytes());
            let name = after[..name_len].to_ascii_lowercase();
            if let Some(depth) = stack.iter().rposition(|&idx| nodes[idx].tag == name) {
               stack.truncate(depth);
            }
            pos = find_from(html, start, ">").map_or(html.len(), |end| end + 1);
            continue;
         }

         let Some(open) = scan_open_tag(html, bytes, start) else {
            // A stray '<' in text.
            pos = start + 1;
            continue;
         };

         let idx = nodes.len();
         let is_void = VOID_ELEMENTS.contains(&open.tag.as_str());
         let is_raw = RAW_TEXT_ELEMENTS.contains(&open.tag.as_str());
         let closing = format!("</{}", open.tag);
         nodes.push(Node {
            tag:    open.tag,
            attrs:  open.attrs,
            parent: stack.last().copied(),
         });
         pos = open.end;

         if open.self_closing || is_void {
            continue;
         }

         if is_raw {
            pos = find_from_ignore_case(html, pos, &closing)
               .and_then(|close| find_from(html, close, ">"))
               .map_or(html.len(), |end| end + 1);
            continue;
         }

         stack.push(idx);
      }

      Self {
         source: html.to_owned(),
         nodes,
      }
   }

   fn is_descendant(&self, mut idx: usize, ancestor: usize) -> bool {
      while let Some(parent) = self.nodes[idx].parent {
         if parent == ancestor {
            return true;
         }
         idx = parent;
      }
      false
   }

   /// Tag name of an element, lowercased.
   pub fn tag(&self, element: ElementId) -> &str {
      &self.nodes[element.0].tag
   }
}

impl StructuredDocument for MarkupDocument {
   type Element = ElementId;

   fn from_html(html: &str) -> Self {
      Self::parse(html)
   }

   fn find_all(&self, selector: &Selector<'_>) -> Vec<ElementId> {
      self
         .nodes
         .iter()
         .enumerate()
         .filter(|(_, node)| node.matches(selector))
         .map(|(idx, _)| ElementId(idx))
         .collect()
   }

   fn find_within(&self, element: &ElementId, selector: &Selector<'_>) -> Vec<ElementId> {
      self
         .nodes
         .iter()
         .enumerate()
         .skip(element.0 + 1)
         .filter(|&(idx, node)| self.is_descendant(idx, element.0) && node.matches(selector))
         .map(|(idx, _)| ElementId(idx))
         .collect()
   }

   fn children(&self, element: &ElementId) -> Vec<ElementId> {
      self
         .nodes
         .iter()
         .enumerate()
         .skip(element.0 + 1)
         .filter(|(_, node)| node.parent == Some(element.0))
         .map(|(idx, _)| ElementId(idx))
         .collect()
   }

   fn attr(&self, element: &ElementId, name: &str) -> Option<String> {
      self
         .nodes
         .get(element.0)?
         .attr(name)
         .map(ToOwned::to_owned)
   }

   fn html(&self) -> Cow<'_, str> {
      Cow::Borrowed(&self.source)
   }
}

fn find_from(html: &str, from: usize, needle: &str) -> Option<usize> {
   html
      .get(from..)
      .and_then(|rest| rest.find(needle))
      .map(|offset| from + offset)
}

fn find_from_ignore_case(html: &str, from: usize, needle: &str) -> Option<usize> {
   let haystack = html.as_bytes().get(from..)?;
   haystack
      .windows(needle.len())
      .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
      .map(|offset| from + offset)
}

fn tag_name_len(bytes: &[u8]) -> usize {
   bytes
      .iter()
      .take_while(|&&byte| byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b':' | b'_'))
      .count()
}

/// Parses `<name attr=value ...>` starting at the `<`.
fn scan_open_tag(html: &str, bytes: &[u8], start: usize) -> Option<OpenTag> {
   let name_start = start + 1;
   let name_len = tag_name_len(bytes.get(name_start..)?);
   if name_len == 0 || !bytes[name_start].is_ascii_alphabetic() {
      return None;
   }

   let tag = html[name_start..name_start + name_len].to_ascii_lowercase();
   let mut attrs = Vec::new();
   let mut pos = name_start + name_len;

   loop {
      while bytes.get(pos).is_some_and(u8::is_ascii_whitespace) {
         pos += 1;
      }

      match bytes.get(pos) {
         None => {
            return Some(OpenTag {
               tag,
               attrs,
               self_closing: false,
               end: html.len(),
            });
         },
         Some(b'>') => {
            return Some(OpenTag {
               tag,
               attrs,
               self_closing: false,
               end: pos + 1,
            });
         },
         Some(b'/') if bytes.get(pos + 1) == Some(&b'>') => {
            return Some(OpenTag {
               tag,
               attrs,
               self_closing: true,
               end: pos + 2,
            });
         },
         Some(b'/') => {
            pos += 1;
            continue;
         },
         Some(_) => {},
      }

      let key_start = pos;
      while bytes
         .get(pos)
         .is_some_and(|&byte| !byte.is_ascii_whitespace() && !matches!(byte, b'=' | b'>' | b'/'))
      {
         pos += 1;
      }
      let key = html[key_start..pos].to_ascii_lowercase();

      while bytes.get(pos).is_some_and(u8::is_ascii_whitespace) {
         pos += 1;
      }

      if bytes.get(pos) != Some(&b'=') {
         attrs.push((key, String::new()));
         continue;
      }
      pos += 1;

      while bytes.get(pos).is_some_and(u8::is_ascii_whitespace) {
         pos += 1;
      }

      let value = match bytes.get(pos) {
         Some(&quote @ (b'"' | b'\'')) => {
            let value_start = pos + 1;
            let value_end = bytes
               .get(value_start..)
               .and_then(|rest| rest.iter().position(|&byte| byte == quote))
               .map_or(html.len(), |offset| value_start + offset);
            pos = (value_end + 1).min(html.len());
            &html[value_start..value_end]
         },
         _ => {
            let value_start = pos;
            while bytes
               .get(pos)
               .is_some_and(|&byte| !byte.is_ascii_whitespace() && byte != b'>')
            {
               pos += 1;
            }
            &html[value_start..pos]
         },
      };

      attrs.push((key, decode_entities(value)));
   }
}

/// Decodes the character references that show up in attribute values.
fn decode_entities(value: &str) -> String {
   if !value.contains('&') {
      return value.to_owned();
   }

   let mut out = String::with_capacity(value.len());
   let mut rest = value;

   while let Some(amp) = rest.find('&') {
      out.push_str(&rest[..amp]);
      rest = &rest[amp..];

      let decoded = rest.find(';').and_then(|semi| {
         let chr = match &rest[1..semi] {
            "amp" => Some('&'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "lt" => Some('<'),
            "gt" => Some('>'),
            entity => entity
               .strip_prefix("#x")
               .or_else(|| entity.strip_prefix("#X"))
               .map_or_else(
                  || entity.strip_prefix('#').and_then(|num| num.parse::<u32>().ok()),
                  |hex| u32::from_str_radix(hex, 16).ok(),
               )
               .and_then(char::from_u32),
         }?;
         Some((chr, semi + 1))
      });

      match decoded {
         Some((chr, len)) => {
            out.push(chr);
            rest = &rest[len..];
         },
         None => {
            out.push('&');
            rest = &rest[1..];
         },
      }
   }

   out.push_str(rest);
   out
}

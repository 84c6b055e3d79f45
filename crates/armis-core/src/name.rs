//! Initials and rank-aware display headings.
//!
//! Officers and officer cadets are headed `Maj J P Mwamba (123)`; everyone
//! else `Sgt Mwamba J P (456)`. Headings are markup-escaped so a renderer can
//! embed them as is.

use std::borrow::Cow;

use crate::record::Category;

/// How consecutive initials are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitialsStyle {
  /// `J P`; used in display headings.
  #[default]
  Spaced,
  /// `J.P.`; used in formal (CV) contexts.
  Dotted,
}

/// Uppercased first letter of every whitespace-separated token of `given`.
pub fn initials(given: &str, style: InitialsStyle) -> String {
  let letters = given
    .split_whitespace()
    .filter_map(|token| token.chars().next())
    // One letter per token even where uppercasing expands (`ß` to `SS`).
    .map(|c| c.to_uppercase().next().unwrap_or(c));

  match style {
    InitialsStyle::Spaced => letters.map(String::from).collect::<Vec<_>>().join(" "),
    InitialsStyle::Dotted => letters.flat_map(|l| [l, '.']).collect(),
  }
}

/// The inputs of a display heading.
#[derive(Debug, Clone, Copy)]
pub struct HeadingParts<'a> {
  pub rank_abbrev:    &'a str,
  pub given:          &'a str,
  pub family:         &'a str,
  pub service_number: &'a str,
  pub category:       &'a Category,
}

/// Compose the escaped display heading.
///
/// Empty parts are dropped, so a person with no given name is headed
/// `Sgt Mwamba (456)`.
pub fn heading(parts: &HeadingParts<'_>, style: InitialsStyle) -> String {
  let initials = initials(parts.given, style);
  let family = parts.family.trim();

  let (first, second) = if parts.category.is_commissioned() {
    (initials.as_str(), family)
  } else {
    (family, initials.as_str())
  };

  let name = [parts.rank_abbrev.trim(), first, second]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join(" ");

  let service_number = parts.service_number.trim();
  let raw = match (name.is_empty(), service_number.is_empty()) {
    (_, true) => name,
    (true, false) => format!("({service_number})"),
    (false, false) => format!("{name} ({service_number})"),
  };

  escape_markup(&raw).into_owned()
}

/// Escape `& < > " '` for embedding in HTML or XML.
pub fn escape_markup(raw: &str) -> Cow<'_, str> { quick_xml::escape::escape(raw) }

#[cfg(test)]
mod tests {
  use super::*;

  fn parts<'a>(
    rank: &'a str,
    given: &'a str,
    family: &'a str,
    svc: &'a str,
    category: &'a Category,
  ) -> HeadingParts<'a> {
    HeadingParts {
      rank_abbrev: rank,
      given,
      family,
      service_number: svc,
      category,
    }
  }

  #[test]
  fn initials_one_letter_per_token() {
    assert_eq!(initials("John Peter", InitialsStyle::Spaced), "J P");
    assert_eq!(initials("john  peter  paul", InitialsStyle::Spaced), "J P P");
    assert_eq!(initials("John Peter", InitialsStyle::Dotted), "J.P.");
    assert_eq!(initials("  anna ", InitialsStyle::Dotted), "A.");
  }

  #[test]
  fn expanding_uppercase_still_gives_one_letter() {
    assert_eq!(initials("ßtefan Otto", InitialsStyle::Spaced), "S O");
    assert_eq!(initials("ßtefan Otto", InitialsStyle::Dotted), "S.O.");
    assert_eq!(initials("émile", InitialsStyle::Spaced), "É");
  }

  #[test]
  fn empty_given_name_has_no_initials() {
    assert_eq!(initials("", InitialsStyle::Spaced), "");
    assert_eq!(initials("   ", InitialsStyle::Dotted), "");
  }

  #[test]
  fn officer_heading_puts_initials_first() {
    let officer = Category::Officer;
    let h = heading(
      &parts("Maj", "John Peter", "Mwamba", "123", &officer),
      InitialsStyle::Spaced,
    );
    assert_eq!(h, "Maj J P Mwamba (123)");
  }

  #[test]
  fn officer_cadet_uses_officer_branch() {
    let cadet = Category::parse("Officer Cadet");
    let h = heading(
      &parts("OCdt", "Grace", "Banda", "789", &cadet),
      InitialsStyle::Spaced,
    );
    assert_eq!(h, "OCdt G Banda (789)");
  }

  #[test]
  fn nco_heading_puts_surname_first() {
    let nco = Category::Nco;
    let h = heading(
      &parts("Sgt", "John Peter", "Mwamba", "456", &nco),
      InitialsStyle::Spaced,
    );
    assert_eq!(h, "Sgt Mwamba J P (456)");
  }

  #[test]
  fn other_categories_use_surname_first() {
    for raw in ["civilian", "Reservist", ""] {
      let category = Category::parse(raw);
      let h = heading(
        &parts("Mr", "Ali", "Phiri", "1", &category),
        InitialsStyle::Spaced,
      );
      assert_eq!(h, "Mr Phiri A (1)", "{raw:?}");
    }
  }

  #[test]
  fn empty_given_name_degrades_gracefully() {
    let nco = Category::Nco;
    let officer = Category::Officer;
    assert_eq!(
      heading(&parts("Sgt", "", "Mwamba", "456", &nco), InitialsStyle::Spaced),
      "Sgt Mwamba (456)"
    );
    assert_eq!(
      heading(&parts("Maj", "", "Mwamba", "123", &officer), InitialsStyle::Spaced),
      "Maj Mwamba (123)"
    );
  }

  #[test]
  fn heading_is_escaped() {
    let nco = Category::Nco;
    let h = heading(
      &parts("Cpl", "Sean", "O'Brien <b>", "9&9", &nco),
      InitialsStyle::Spaced,
    );
    assert_eq!(h, "Cpl O&apos;Brien &lt;b&gt; S (9&amp;9)");
  }

  #[test]
  fn dotted_heading() {
    let officer = Category::Officer;
    let h = heading(
      &parts("Capt", "Mary Jane", "Zulu", "55", &officer),
      InitialsStyle::Dotted,
    );
    assert_eq!(h, "Capt M.J. Zulu (55)");
  }
}

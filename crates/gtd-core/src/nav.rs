//! Active navigation link selection.
//!
//! List pages share a base path and differ
//! only by query filters, so those paths are
//! matched on path and query together. Every
//! other section matches on path alone, which
//! keeps it highlighted when other features
//! append query parameters.

use tracing::debug;

/// Paths that only match when the query
/// string matches as well.
pub const DEFAULT_EXACT_PATHS: [&str; 2] =
  ["/", "/tasks"];

#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct CurrentLocation {
  pub path:  String,
  pub query: String
}

impl CurrentLocation {
  /// Builds a location from a pathname and
  /// a search string (`?a=b` or empty).
  pub fn from_parts(
    path: &str,
    search: &str
  ) -> Self {
    Self {
      path:  path.to_string(),
      query: strip_query_marker(search)
        .to_string()
    }
  }

  /// Parses a relative reference such as
  /// `/tasks?status=next`.
  pub fn parse(href: &str) -> Self {
    let (path, query) = split_href(href);
    Self {
      path:  path.to_string(),
      query: query.to_string()
    }
  }
}

fn strip_query_marker(
  search: &str
) -> &str {
  search
    .strip_prefix('?')
    .unwrap_or(search)
}

/// Splits an href into the part before the
/// first `?` and everything after it.
pub fn split_href(
  href: &str
) -> (&str, &str) {
  href
    .split_once('?')
    .unwrap_or((href, ""))
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
enum LinkMatch {
  Exact,
  PathOnly
}

fn classify(
  current_path: &str,
  current_query: &str,
  href: &str,
  exact_paths: &[String]
) -> Option<LinkMatch> {
  let (link_path, link_query) =
    split_href(href);
  if link_path != current_path {
    return None;
  }

  if link_query
    == strip_query_marker(current_query)
  {
    return Some(LinkMatch::Exact);
  }

  if exact_paths
    .iter()
    .any(|exact| exact == link_path)
  {
    None
  } else {
    Some(LinkMatch::PathOnly)
  }
}

/// Whether `href` designates the current
/// page. `current_query` may carry its
/// leading `?`.
pub fn link_matches(
  current_path: &str,
  current_query: &str,
  href: &str,
  exact_paths: &[String]
) -> bool {
  classify(
    current_path,
    current_query,
    href,
    exact_paths
  )
  .is_some()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavMatcher {
  exact_paths: Vec<String>
}

impl Default for NavMatcher {
  fn default() -> Self {
    Self::new(
      DEFAULT_EXACT_PATHS
        .iter()
        .map(|p| p.to_string())
    )
  }
}

impl NavMatcher {
  pub fn new<I>(exact_paths: I) -> Self
  where
    I: IntoIterator<Item = String>
  {
    Self {
      exact_paths: exact_paths
        .into_iter()
        .collect()
    }
  }

  pub fn exact_paths(&self) -> &[String] {
    &self.exact_paths
  }

  pub fn matches(
    &self,
    location: &CurrentLocation,
    href: &str
  ) -> bool {
    link_matches(
      &location.path,
      &location.query,
      href,
      &self.exact_paths
    )
  }

  /// Picks the single link to mark: the
  /// first exact match, else the first
  /// path-only match. Links without an href
  /// never match.
  pub fn best_match<S>(
    &self,
    location: &CurrentLocation,
    hrefs: &[Option<S>]
  ) -> Option<usize>
  where
    S: AsRef<str>
  {
    let mut path_only = None;

    for (index, href) in
      hrefs.iter().enumerate()
    {
      let Some(href) = href else {
        continue;
      };
      match classify(
        &location.path,
        &location.query,
        href.as_ref(),
        &self.exact_paths
      ) {
        | Some(LinkMatch::Exact) => {
          return Some(index);
        }
        | Some(LinkMatch::PathOnly) => {
          path_only.get_or_insert(index);
        }
        | None => {}
      }
    }

    path_only
  }
}

/// A rendered navigation anchor.
pub trait NavLink {
  fn href(&self) -> Option<String>;
  fn set_active(&self, active: bool);
}

/// Clears every active marker, then marks
/// the best match. Returns its index.
pub fn highlight<L: NavLink>(
  matcher: &NavMatcher,
  location: &CurrentLocation,
  links: &[L]
) -> Option<usize> {
  let hrefs: Vec<Option<String>> = links
    .iter()
    .map(|link| {
      link.set_active(false);
      link.href()
    })
    .collect();

  let active =
    matcher.best_match(location, &hrefs);
  if let Some(index) = active {
    links[index].set_active(true);
  }

  debug!(
    path = %location.path,
    query = %location.query,
    links = links.len(),
    ?active,
    "highlighted navigation"
  );
  active
}

/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use url::Url;

use crate::error::PrefsError;

const ARTICLE_ELEMENT_PREFIX: &str = "article-";

/// Builds absolute article URLs from the blog origin.
#[derive(Clone, Debug)]
pub struct ArticleLinker {
    origin: Url,
}

impl ArticleLinker {
    pub fn new(origin: &str) -> Result<Self, PrefsError> {
        let origin_url = Url::parse(origin.trim()).map_err(|source| PrefsError::Origin {
            origin: origin.to_owned(),
            source,
        })?;
        if origin_url.cannot_be_a_base() {
            return Err(PrefsError::OpaqueOrigin(origin.to_owned()));
        }
        Ok(Self { origin: origin_url })
    }

    /// `{origin}/article/{id}`. Any path, query or fragment on the configured
    /// origin is dropped, and the id is percent-encoded as a single segment.
    pub fn article_url(&self, article_id: &str) -> Url {
        let mut url = self.origin.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.clear().push("article").push(article_id);
        }
        url
    }

    /// Resolve a site-relative path such as `/api/health`.
    pub fn resolve(&self, path: &str) -> Result<Url, url::ParseError> {
        self.origin.join(path)
    }

    /// Host of the origin, if it has one.
    pub fn host(&self) -> Option<&str> {
        self.origin.host_str()
    }
}

/// Article id carried by an element id of the form `article-{id}`.
pub fn article_id_from_element_id(element_id: &str) -> Option<&str> {
    element_id
        .strip_prefix(ARTICLE_ELEMENT_PREFIX)
        .filter(|id| !id.is_empty())
}

/// Interpret the last segment of a page path as an article id.
///
/// A trailing slash yields no id, so `/article/42/` is not treated as article `42`.
pub fn article_id_from_path(path: &str) -> Option<&str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.rsplit('/').next().filter(|id| !id.is_empty())
}

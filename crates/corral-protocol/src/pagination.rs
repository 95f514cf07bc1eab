//! Page bounds and prev/next links for collection listings.
//!
//! A page is the half-open range `[start, stop)` of a collection's insertion
//! order. Bounds come from the `start` and `stop` query parameters, each
//! allowed at most once. Links keep the request URL's scheme, host, and path
//! and replace only the query.

use url::Url;

use corral_core::CollectionConfig;

use crate::error::{ApiError, ApiResult};

/// A validated page request plus the links around it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    pub start: usize,
    pub stop: usize,
    pub prev: Option<String>,
    pub next: Option<String>,
}

impl Page {
    /// Resolve the page requested by `query` against `base`.
    pub fn from_query(
        base: &Url,
        query: &[(String, String)],
        config: &CollectionConfig,
    ) -> ApiResult<Self> {
        let (start, stop) = parse_bounds(query, config.page_size)?;
        Self::new(base, start, stop, config.max_page_size)
    }

    /// Validate explicit bounds and build the links.
    pub fn new(base: &Url, start: i64, stop: i64, max_page_size: usize) -> ApiResult<Self> {
        let page_size = stop
            .checked_sub(start)
            .ok_or_else(|| ApiError::pagination("Requested page bounds overflow"))?;
        if page_size < 0 {
            return Err(ApiError::pagination("Requested page size is negative"));
        }
        if page_size > max_page_size as i64 {
            return Err(ApiError::pagination("Requested page size too large"));
        }
        if start < 0 {
            return Err(ApiError::pagination("Start is negative"));
        }

        let (start, stop) = (start as usize, stop as usize);
        let page_size = stop - start;

        let prev_start = start.saturating_sub(page_size);
        let prev = (prev_start != start).then(|| link(base, prev_start, start));
        let next = Some(link(base, stop, stop + page_size));

        Ok(Self {
            start,
            stop,
            prev,
            next,
        })
    }

    pub fn page_size(&self) -> usize {
        self.stop - self.start
    }

    /// Drop the next link when the query returned fewer elements than asked
    /// for: the collection ended inside this page.
    pub fn finish(mut self, returned: usize) -> Self {
        if returned < self.page_size() {
            self.next = None;
        }
        self
    }
}

/// Read `start` and `stop` from a multi-valued query.
///
/// A missing `start` is 0; a missing `stop` is `start + page_size`.
pub fn parse_bounds(query: &[(String, String)], page_size: usize) -> ApiResult<(i64, i64)> {
    let start = single(query, "start")?;
    let stop = single(query, "stop")?;

    let start = start.map(|v| integer("Start", v)).transpose()?.unwrap_or(0);
    let stop = match stop {
        Some(v) => integer("Stop", v)?,
        None => start.saturating_add(page_size as i64),
    };
    Ok((start, stop))
}

fn single<'a>(query: &'a [(String, String)], key: &str) -> ApiResult<Option<&'a str>> {
    let mut values = query
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.as_str());
    let first = values.next();
    if values.next().is_some() {
        return Err(ApiError::pagination(format!("More than one {key} in query")));
    }
    Ok(first)
}

fn integer(label: &str, value: &str) -> ApiResult<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| ApiError::pagination(format!("{label} not an integer")))
}

fn link(base: &Url, start: usize, stop: usize) -> String {
    let mut url = base.clone();
    url.set_fragment(None);
    url.query_pairs_mut()
        .clear()
        .append_pair("start", &start.to_string())
        .append_pair("stop", &stop.to_string());
    url.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CONFIG: CollectionConfig = CollectionConfig::new(3, 5);

    fn base() -> Url {
        Url::parse("http://zoo.example:8080/zoo?start=0&stop=3#frag").unwrap()
    }

    fn query(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    fn bounds_of(link: &str) -> (usize, usize) {
        let url = Url::parse(link).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let (start, stop) = parse_bounds(&pairs, 0).unwrap();
        (start as usize, stop as usize)
    }

    #[test]
    fn defaults_to_first_page() {
        let page = Page::from_query(&base(), &[], &CONFIG).unwrap();
        assert_eq!((page.start, page.stop), (0, 3));
        assert_eq!(page.prev, None);
        assert_eq!(
            page.next.as_deref(),
            Some("http://zoo.example:8080/zoo?start=3&stop=6")
        );
    }

    #[test]
    fn missing_stop_is_one_page_past_start() {
        let page = Page::from_query(&base(), &query(&[("start", "4")]), &CONFIG).unwrap();
        assert_eq!((page.start, page.stop), (4, 7));
    }

    #[test]
    fn prev_link_clamps_at_zero() {
        let page = Page::from_query(&base(), &query(&[("start", "1"), ("stop", "4")]), &CONFIG)
            .unwrap();
        assert_eq!(bounds_of(page.prev.as_deref().unwrap()), (0, 1));
        assert_eq!(bounds_of(page.next.as_deref().unwrap()), (4, 7));
    }

    #[test]
    fn short_page_drops_next() {
        let page = Page::from_query(&base(), &query(&[("start", "6"), ("stop", "9")]), &CONFIG)
            .unwrap()
            .finish(2);
        assert_eq!(page.next, None);
        assert_eq!(bounds_of(page.prev.as_deref().unwrap()), (3, 6));
    }

    #[test]
    fn full_page_keeps_next() {
        let page = Page::from_query(&base(), &[], &CONFIG).unwrap().finish(3);
        assert!(page.next.is_some());
    }

    #[test]
    fn duplicate_keys_fail() {
        for key in ["start", "stop"] {
            let err = Page::from_query(&base(), &query(&[(key, "1"), (key, "2")]), &CONFIG)
                .unwrap_err();
            assert_eq!(
                err,
                ApiError::pagination(format!("More than one {key} in query"))
            );
        }
    }

    #[test]
    fn non_integers_fail() {
        let err = Page::from_query(&base(), &query(&[("start", "one")]), &CONFIG).unwrap_err();
        assert_eq!(err, ApiError::pagination("Start not an integer"));
        let err = Page::from_query(&base(), &query(&[("stop", "3.5")]), &CONFIG).unwrap_err();
        assert_eq!(err, ApiError::pagination("Stop not an integer"));
    }

    #[test]
    fn stop_before_start_fails() {
        let err = Page::from_query(&base(), &query(&[("start", "4"), ("stop", "2")]), &CONFIG)
            .unwrap_err();
        assert_eq!(err, ApiError::pagination("Requested page size is negative"));
    }

    #[test]
    fn oversized_page_fails() {
        let err = Page::from_query(&base(), &query(&[("start", "0"), ("stop", "6")]), &CONFIG)
            .unwrap_err();
        assert_eq!(err, ApiError::pagination("Requested page size too large"));
    }

    #[test]
    fn negative_start_fails() {
        let err = Page::from_query(&base(), &query(&[("start", "-2"), ("stop", "1")]), &CONFIG)
            .unwrap_err();
        assert_eq!(err, ApiError::pagination("Start is negative"));
    }

    #[test]
    fn links_keep_scheme_host_and_path() {
        let base = Url::parse("https://api.example/v1/zoo?foo=bar").unwrap();
        let page = Page::new(&base, 3, 6, 5).unwrap();
        assert_eq!(
            page.prev.as_deref(),
            Some("https://api.example/v1/zoo?start=0&stop=3")
        );
    }

    proptest! {
        /// Following next links visits every index exactly once.
        #[test]
        fn walking_next_links_covers_collection(len in 0usize..40, page_size in 1usize..6) {
            let config = CollectionConfig::new(page_size, 5);
            let mut seen: Vec<usize> = Vec::new();
            let mut page = Page::from_query(&base(), &[], &config).unwrap();
            prop_assert!(page.prev.is_none());
            loop {
                let returned: Vec<usize> = (page.start..page.stop.min(len)).collect();
                seen.extend(&returned);
                page = page.finish(returned.len());
                let Some(next) = page.next.clone() else { break };
                let pairs: Vec<(String, String)> =
                    Url::parse(&next).unwrap().query_pairs().into_owned().collect();
                page = Page::from_query(&base(), &pairs, &config).unwrap();
            }
            prop_assert_eq!(seen, (0..len).collect::<Vec<_>>());
        }
    }
}

//! # Search ranking
//!
//! Pure building blocks of the resource search:
//!
//! - [`service_match_score`] counts how many requested service tags a resource offers.
//! - [`rank_resources`] orders resources by that score, highest first, keeping input
//!   order among equal scores.
//! - [`paginate`] cuts a ranked list into fixed-size, 1-based pages.
//!
//! None of these touch the database; they run on the batch a store fetch returned.

use db::models::resource::Model as Resource;
use std::collections::HashSet;

/// Number of resources per search page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 4;

/// Anything that can be ranked by the service tags it offers.
pub trait HasServiceTags {
    fn service_tags(&self) -> HashSet<&str>;
}

impl HasServiceTags for Resource {
    fn service_tags(&self) -> HashSet<&str> {
        Resource::service_tags(self)
    }
}

/// Counts the requested tags present in `offered`.
///
/// Comparison is exact and case-sensitive. Every occurrence in `requested`
/// counts, so a tag requested twice scores twice when it matches.
pub fn service_match_score<S: AsRef<str>>(requested: &[S], offered: &HashSet<&str>) -> usize {
    requested
        .iter()
        .filter(|tag| offered.contains(tag.as_ref()))
        .count()
}

/// Orders `resources` by descending match score against `requested`.
///
/// The sort is stable: equal scores keep their relative input order, which keeps
/// page boundaries identical across repeated requests. With no requested tags
/// the input is returned untouched.
pub fn rank_resources<R, S>(resources: Vec<R>, requested: &[S]) -> Vec<R>
where
    R: HasServiceTags,
    S: AsRef<str>,
{
    if requested.is_empty() {
        return resources;
    }

    let mut scored: Vec<(usize, R)> = resources
        .into_iter()
        .map(|resource| {
            let score = service_match_score(requested, &resource.service_tags());
            (score, resource)
        })
        .collect();

    scored.sort_by(|(a, _), (b, _)| b.cmp(a));
    scored.into_iter().map(|(_, resource)| resource).collect()
}

/// Returns page `page` (1-based) of `per_page` items.
///
/// Pages below 1 are read as page 1. A page past the end is empty.
pub fn paginate<T>(items: Vec<T>, page: i64, per_page: usize) -> Vec<T> {
    if per_page == 0 {
        return Vec::new();
    }

    let page = usize::try_from(page.max(1)).unwrap_or(usize::MAX);
    let offset = (page - 1).saturating_mul(per_page);

    items.into_iter().skip(offset).take(per_page).collect()
}

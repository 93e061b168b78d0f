//! Aggregate views over a completed run's results.
//!
//! Every function here is pure: inputs are borrowed, never mutated, and the
//! output depends only on the slice passed in. Callers recompute whenever
//! they hold a new result set.

use std::collections::HashMap;

use serde::Serialize;
use url::Url;

use crate::results::QueryResult;

/// Maximum rows returned by the frequency tables.
pub const TOP_N: usize = 15;

/// Sample URLs kept per cited domain.
pub const MAX_SAMPLE_URLS: usize = 3;

/// How often a competitor brand was detected across all responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitorStat {
    pub name: String,
    pub count: usize,
    /// `100 * count / number of results`.
    pub visibility_pct: f64,
}

/// How often a domain was cited as a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceDomainStat {
    pub domain: String,
    pub count: usize,
    pub sample_urls: Vec<String>,
}

/// Provider selector for the detailed results table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProviderFilter {
    #[default]
    All,
    Only(String),
}

impl std::str::FromStr for ProviderFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Ok(Self::Only(s.to_string()))
        }
    }
}

/// Counts occurrences of `key` in encounter order.
///
/// Returns `(key, count, slot)` entries in the order each key was first
/// seen, so a stable sort by count keeps ties in encounter order.
struct OrderedCounter<T> {
    index: HashMap<String, usize>,
    entries: Vec<(String, usize, T)>,
}

impl<T: Default> OrderedCounter<T> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn bump(&mut self, key: &str) -> &mut T {
        let pos = if let Some(&pos) = self.index.get(key) {
            pos
        } else {
            let pos = self.entries.len();
            self.index.insert(key.to_string(), pos);
            self.entries.push((key.to_string(), 0, T::default()));
            pos
        };
        let entry = &mut self.entries[pos];
        entry.1 += 1;
        &mut entry.2
    }

    /// Entries sorted by descending count, ties in encounter order, capped at `limit`.
    fn ranked(mut self, limit: usize) -> Vec<(String, usize, T)> {
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        self.entries.truncate(limit);
        self.entries
    }
}

/// Ranks the other brands detected in responses by how many times they appear.
#[must_use]
pub fn competitor_frequency(results: &[QueryResult]) -> Vec<CompetitorStat> {
    let mut counter = OrderedCounter::<()>::new();
    for brand in results.iter().flat_map(|r| &r.other_brands_detected) {
        counter.bump(brand);
    }

    #[allow(clippy::cast_precision_loss)]
    let total = results.len() as f64;
    counter
        .ranked(TOP_N)
        .into_iter()
        .map(|(name, count, ())| {
            #[allow(clippy::cast_precision_loss)]
            let visibility_pct = 100.0 * count as f64 / total;
            CompetitorStat {
                name,
                count,
                visibility_pct,
            }
        })
        .collect()
}

/// Hostname of `raw` with a leading `www.` removed.
///
/// Returns `None` for strings that do not parse as URLs or carry no host.
#[must_use]
pub fn source_domain(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    let host = url.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    (!host.is_empty()).then(|| host.to_string())
}

/// Ranks cited source domains by citation count.
///
/// Keeps up to [`MAX_SAMPLE_URLS`] example URLs per domain in encounter
/// order. Unparsable URLs are skipped.
#[must_use]
pub fn source_domain_frequency(results: &[QueryResult]) -> Vec<SourceDomainStat> {
    let mut counter = OrderedCounter::<Vec<String>>::new();
    for source in results.iter().flat_map(|r| &r.sources) {
        let Some(domain) = source_domain(&source.url) else {
            continue;
        };
        let samples = counter.bump(&domain);
        if samples.len() < MAX_SAMPLE_URLS {
            samples.push(source.url.clone());
        }
    }

    counter
        .ranked(TOP_N)
        .into_iter()
        .map(|(domain, count, sample_urls)| SourceDomainStat {
            domain,
            count,
            sample_urls,
        })
        .collect()
}

/// Results for one provider (or all), in their original order.
#[must_use]
pub fn filter_by_provider<'a>(
    results: &'a [QueryResult],
    filter: &ProviderFilter,
) -> Vec<&'a QueryResult> {
    match filter {
        ProviderFilter::All => results.iter().collect(),
        ProviderFilter::Only(provider) => results
            .iter()
            .filter(|r| r.provider == *provider)
            .collect(),
    }
}

/// Distinct providers present in the results, in first-seen order.
#[must_use]
pub fn providers_present(results: &[QueryResult]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for result in results {
        if !seen.contains(&result.provider.as_str()) {
            seen.push(&result.provider);
        }
    }
    seen
}

#[cfg(test)]
#[path = "presenter_test.rs"]
mod tests;

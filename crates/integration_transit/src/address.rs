//! Address clean-up strategies for fuzzy geocoding
//!
//! Calendar locations look like `"Acme Hall, Karl Johans gate 1, 0154 Oslo, Norway"`:
//! venue names, postal codes and a country suffix in no fixed order. The
//! geocoder copes badly with venue names and postal codes, so the resolver
//! tries progressively cleaned-up variants of the same text, most specific
//! first. Each strategy is a pure function from the split address to an
//! optional query string.

use serde::{Deserialize, Serialize};

/// Word lists the strategies match against
///
/// All matching is case-insensitive substring matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressMatchingConfig {
    /// Trailing country names to strip (must follow a comma)
    #[serde(default = "default_country_suffixes")]
    pub country_suffixes: Vec<String>,

    /// Street-type words; a part with one of these and a digit is a street address
    #[serde(default = "default_street_keywords")]
    pub street_keywords: Vec<String>,

    /// Known city names, in priority order for equally early matches
    #[serde(default = "default_city_names")]
    pub city_names: Vec<String>,

    /// Number of digits in a postal code part
    #[serde(default = "default_postal_code_digits")]
    pub postal_code_digits: usize,

    /// Fallback queries must be longer than this many characters
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(ToString::to_string).collect()
}

fn default_country_suffixes() -> Vec<String> {
    to_strings(&["norway", "norge"])
}

fn default_street_keywords() -> Vec<String> {
    to_strings(&[
        "gate", "vei", "veg", "plass", "street", "veien", "road", "avenue", "square",
    ])
}

fn default_city_names() -> Vec<String> {
    to_strings(&[
        "oslo",
        "bergen",
        "trondheim",
        "stavanger",
        "tromsø",
        "drammen",
        "fredrikstad",
        "kristiansand",
        "sandnes",
        "asker",
        "bærum",
        "skien",
        "tønsberg",
    ])
}

const fn default_postal_code_digits() -> usize {
    4
}

const fn default_min_query_chars() -> usize {
    5
}

impl Default for AddressMatchingConfig {
    fn default() -> Self {
        Self {
            country_suffixes: default_country_suffixes(),
            street_keywords: default_street_keywords(),
            city_names: default_city_names(),
            postal_code_digits: default_postal_code_digits(),
            min_query_chars: default_min_query_chars(),
        }
    }
}

/// Which clean-up produced a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Street address part plus the bare city name
    StreetAndCity,
    /// Everything but the first part (usually a venue name)
    WithoutFirstPart,
    /// Everything but postal-code parts
    WithoutPostalCodes,
}

/// A query string to send to the geocoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchStrategy {
    /// Clean-up that produced the query
    pub kind: StrategyKind,
    /// Free-text query
    pub query: String,
}

type Strategy = fn(&[&str], &AddressMatchingConfig) -> Option<String>;

const STRATEGIES: [(StrategyKind, Strategy); 3] = [
    (StrategyKind::StreetAndCity, street_and_city),
    (StrategyKind::WithoutFirstPart, without_first_part),
    (StrategyKind::WithoutPostalCodes, without_postal_codes),
];

/// Build the ordered geocoder queries for an address
///
/// A query produced by an earlier strategy is not repeated. The result is
/// empty when nothing useful can be extracted.
pub fn search_strategies(address: &str, config: &AddressMatchingConfig) -> Vec<SearchStrategy> {
    let cleaned = strip_country_suffix(address, &config.country_suffixes);
    let parts: Vec<&str> = cleaned.split(',').map(str::trim).collect();

    let mut strategies: Vec<SearchStrategy> = Vec::with_capacity(STRATEGIES.len());
    for (kind, strategy) in STRATEGIES {
        if let Some(query) = strategy(&parts, config) {
            if strategies.iter().all(|s| s.query != query) {
                strategies.push(SearchStrategy { kind, query });
            }
        }
    }
    strategies
}

fn street_and_city(parts: &[&str], config: &AddressMatchingConfig) -> Option<String> {
    let street = parts.iter().find(|part| {
        part.chars().any(|c| c.is_ascii_digit())
            && config
                .street_keywords
                .iter()
                .any(|keyword| find_ignore_case(part, keyword).is_some())
    })?;

    let city = parts
        .iter()
        .find_map(|part| first_city_name(part, &config.city_names));

    Some(city.map_or_else(|| (*street).to_string(), |city| format!("{street} {city}")))
}

fn without_first_part(parts: &[&str], config: &AddressMatchingConfig) -> Option<String> {
    if parts.len() < 2 {
        return None;
    }
    long_enough(join_words(&parts[1..]), config)
}

fn without_postal_codes(parts: &[&str], config: &AddressMatchingConfig) -> Option<String> {
    let kept: Vec<&str> = parts
        .iter()
        .copied()
        .filter(|part| !is_postal_code(part, config.postal_code_digits))
        .collect();
    long_enough(join_words(&kept), config)
}

fn long_enough(query: String, config: &AddressMatchingConfig) -> Option<String> {
    (query.chars().count() > config.min_query_chars).then_some(query)
}

/// Join parts with single spaces, collapsing runs of whitespace
fn join_words(parts: &[&str]) -> String {
    parts
        .iter()
        .flat_map(|part| part.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_postal_code(part: &str, digits: usize) -> bool {
    part.len() == digits && part.bytes().all(|b| b.is_ascii_digit())
}

/// Remove a trailing `", <country>"` for each configured country name
fn strip_country_suffix<'a>(address: &'a str, suffixes: &[String]) -> &'a str {
    let mut current = address.trim();
    for suffix in suffixes {
        let suffix_chars = suffix.chars().count();
        if suffix_chars == 0 {
            continue;
        }
        let Some((start, _)) = current.char_indices().rev().nth(suffix_chars - 1) else {
            continue;
        };
        if !eq_ignore_case(&current[start..], suffix) {
            continue;
        }
        if let Some(head) = current[..start].trim_end().strip_suffix(',') {
            current = head.trim();
        }
    }
    current
}

/// The leftmost city name in `part`, as written in `part`
///
/// When two names match at the same position the earlier list entry wins.
fn first_city_name<'a>(part: &'a str, cities: &[String]) -> Option<&'a str> {
    part.char_indices().find_map(|(start, _)| {
        cities
            .iter()
            .find_map(|city| prefix_len_ignore_case(&part[start..], city))
            .map(|len| &part[start..start + len])
    })
}

/// Byte offset of the first case-insensitive occurrence of `needle`
fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .char_indices()
        .find(|(start, _)| prefix_len_ignore_case(&haystack[*start..], needle).is_some())
        .map(|(start, _)| start)
}

/// If `text` starts with `prefix` (ignoring case), the byte length of that
/// prefix within `text`
fn prefix_len_ignore_case(text: &str, prefix: &str) -> Option<usize> {
    if prefix.is_empty() {
        return None;
    }
    let mut text_chars = text.char_indices();
    let mut end = 0;
    for expected in prefix.chars() {
        let (index, actual) = text_chars.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
        end = index + actual.len_utf8();
    }
    Some(end)
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

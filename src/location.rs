use std::{cell::RefCell, collections::BTreeMap};

use derive_ex::derive_ex;


thread_local! {
    static CURRENT: RefCell<Location> = RefCell::new(Location::default());
}

/// A navigation location: pathname, hash fragment, and query parameters.
///
/// The pathname and hash are standardized at construction (leading slash,
/// leading `#`), so two locations written differently but naming the same
/// place compare equal.
#[derive(Clone, Debug, PartialEq, Eq)]
#[derive_ex(Default)]
#[default(Self::new("", "", ""))]
pub struct Location {
    pathname: String,
    hash: String,
    params: Params,
}

impl Location {
    pub fn new(pathname: &str, hash: &str, search: &str) -> Self {
        Self {
            pathname: standardize_path(pathname),
            hash: standardize_hash(hash),
            params: Params::from(search),
        }
    }

    pub fn pathname(&self) -> &str {
        &self.pathname
    }
    pub fn hash(&self) -> &str {
        &self.hash
    }
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Returns the location the current thread considers itself at.
    pub fn current() -> Location {
        CURRENT.with(|c| c.borrow().clone())
    }

    /// Replaces the current thread's location.
    ///
    /// Call this from the navigation-event handler so that ambient
    /// predicates such as [`when::path`](crate::when::path) see fresh state.
    pub fn set_current(location: Location) {
        CURRENT.with(|c| *c.borrow_mut() = location);
    }
}

/// Query parameters decoded from a search string.
///
/// A search string that fails percent-decoding yields [`Params::Malformed`],
/// which behaves as an empty map; the error never propagates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Params {
    Parsed(BTreeMap<String, String>),
    Malformed,
}

impl Params {
    /// Returns the decoded value for `key`.
    ///
    /// Later duplicates of a key overwrite earlier ones.
    pub fn get(&self, key: &str) -> Option<&str> {
        match self {
            Params::Parsed(map) => map.get(key).map(String::as_str),
            Params::Malformed => None,
        }
    }
    pub fn is_malformed(&self) -> bool {
        matches!(self, Params::Malformed)
    }
}

impl Default for Params {
    fn default() -> Self {
        Params::Parsed(BTreeMap::new())
    }
}

impl From<&str> for Params {
    fn from(search: &str) -> Self {
        parse_search(search)
    }
}
impl From<BTreeMap<String, String>> for Params {
    fn from(map: BTreeMap<String, String>) -> Self {
        Params::Parsed(map)
    }
}
impl From<&Params> for Params {
    fn from(params: &Params) -> Self {
        params.clone()
    }
}

fn parse_search(search: &str) -> Params {
    let search = search.strip_prefix('?').unwrap_or(search);
    let mut map = BTreeMap::new();
    for pair in search.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = match pair.split_once('=') {
            Some((key, value)) => (key, value),
            None => (pair, ""),
        };
        match (percent_decode(key), percent_decode(value)) {
            (Some(key), Some(value)) => {
                map.insert(key, value);
            }
            _ => return Params::Malformed,
        }
    }
    Params::Parsed(map)
}

fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = hex_value(*bytes.get(i + 1)?)?;
            let lo = hex_value(*bytes.get(i + 2)?)?;
            out.push(hi << 4 | lo);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

pub(crate) fn standardize_path(path: &str) -> String {
    let body = path.trim_start_matches('/');
    let mut out = String::with_capacity(body.len() + 1);
    out.push('/');
    out.push_str(body);
    while out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    out
}

pub(crate) fn standardize_hash(hash: &str) -> String {
    let body = hash.trim_start_matches('#');
    if let Some(tail) = body.strip_prefix('*') {
        format!("#/*{tail}")
    } else {
        format!("#{body}")
    }
}

pub(crate) fn matches_path(pattern: &str, actual: &str) -> bool {
    matches(&standardize_path(pattern), &standardize_path(actual), "/*/")
}

pub(crate) fn matches_hash(pattern: &str, actual: &str) -> bool {
    matches(&standardize_hash(pattern), &standardize_hash(actual), "#/*/")
}

// The trailing-star rule is checked before the leading-star rule, so a
// pattern carrying both is treated as a prefix pattern.
fn matches(pattern: &str, actual: &str, leading_star: &str) -> bool {
    if pattern == actual {
        return true;
    }
    if let Some(prefix) = pattern.strip_suffix("/*") {
        return actual.starts_with(prefix);
    }
    if let Some(tail) = pattern.strip_prefix(leading_star) {
        let suffix: String = format!("/{tail}").chars().rev().collect();
        let reversed: String = actual.chars().rev().collect();
        return reversed.starts_with(&suffix);
    }
    false
}

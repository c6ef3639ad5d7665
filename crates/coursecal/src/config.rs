/// Process configuration and the term table
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Environment variable holding the schedule API key
pub const API_KEY_VAR: &str = "UWATERLOO_KEY";
const API_URL_VAR: &str = "COURSECAL_API_URL";
const ADDR_VAR: &str = "COURSECAL_ADDR";
const TIMEZONE_VAR: &str = "COURSECAL_TIMEZONE";
const TERMS_VAR: &str = "COURSECAL_TERMS";

pub const DEFAULT_API_URL: &str = "https://api.uwaterloo.ca/v2";
pub const DEFAULT_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Toronto;

/// An academic term (e.g., Fall 2014 = "1149")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: String,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Lookup table of terms by identifier. Read-only once loaded.
#[derive(Debug, Clone)]
pub struct TermCatalog {
    terms: BTreeMap<String, Term>,
}

impl TermCatalog {
    /// Builds a catalog, rejecting terms that end before they start
    pub fn new(terms: Vec<Term>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut map = BTreeMap::new();
        for term in terms {
            if term.end < term.start {
                return Err(format!(
                    "Term {} ends ({}) before it starts ({})",
                    term.id, term.end, term.start
                )
                .into());
            }
            map.insert(term.id.clone(), term);
        }

        Ok(TermCatalog { terms: map })
    }

    /// Loads a JSON array of terms from disk
    ///
    /// # Arguments
    /// * `path` - Path to a file like `[{"id": "1149", "name": "Fall 2014", "start": "2014-09-08", "end": "2014-12-02"}]`
    pub fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let terms: Vec<Term> = serde_json::from_str(&content)?;
        Self::new(terms)
    }

    /// Gets a term by identifier
    pub fn get(&self, term_id: &str) -> Option<&Term> {
        self.terms.get(term_id)
    }

    /// All terms, ordered by identifier
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.terms.values()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl Default for TermCatalog {
    fn default() -> Self {
        let term = |id: &str, name: &str, start: (i32, u32, u32), end: (i32, u32, u32)| Term {
            id: id.to_string(),
            name: name.to_string(),
            start: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap_or_default(),
        };

        let terms = [
            term("1149", "Fall 2014", (2014, 9, 8), (2014, 12, 2)),
            term("1151", "Winter 2015", (2015, 1, 5), (2015, 4, 6)),
            term("1155", "Spring 2015", (2015, 5, 4), (2015, 7, 28)),
        ];

        TermCatalog {
            terms: terms.into_iter().map(|t| (t.id.clone(), t)).collect(),
        }
    }
}

/// Everything read from the environment at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub api_url: String,
    pub bind_addr: SocketAddr,
    pub timezone: Tz,
    pub terms_path: Option<PathBuf>,
}

impl AppConfig {
    /// Reads the configuration from process environment variables
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Box<dyn std::error::Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| format!("{} must be set", API_KEY_VAR))?;

        let api_url = lookup(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        url::Url::parse(&api_url).map_err(|e| format!("Invalid {}: {}", API_URL_VAR, e))?;

        let bind_addr = lookup(ADDR_VAR)
            .unwrap_or_else(|| DEFAULT_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| format!("Invalid {}: {}", ADDR_VAR, e))?;

        let timezone = match lookup(TIMEZONE_VAR) {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|e| format!("Invalid {}: {}", TIMEZONE_VAR, e))?,
            None => DEFAULT_TIMEZONE,
        };

        Ok(AppConfig {
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            bind_addr,
            timezone,
            terms_path: lookup(TERMS_VAR).map(PathBuf::from),
        })
    }

    /// Loads the term table named by the config, or the built-in one
    pub fn load_terms(&self) -> Result<TermCatalog, Box<dyn std::error::Error>> {
        match &self.terms_path {
            Some(path) => TermCatalog::load_from_file(path),
            None => Ok(TermCatalog::default()),
        }
    }
}

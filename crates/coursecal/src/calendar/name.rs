//! Deterministic, human-readable calendar names.
//!
//! The same term and course list always produce the same name, so a user
//! re-downloading a calendar can recognize it.

use sha2::{Digest, Sha256};

use crate::config::Term;
use crate::schedule::CourseId;

/// Number of words in a generated name
const NAME_WORDS: usize = 4;

const WORDS: [&str; 256] = [
    "ack", "alabama", "alanine", "alaska", "alpha", "angel", "apart", "april", "arizona",
    "arkansas", "artist", "asparagus", "aspen", "august", "autumn", "avocado", "bacon",
    "bakerloo", "batman", "beer", "berlin", "beryllium", "black", "blossom", "blue",
    "bluebird", "bravo", "bulldog", "burger", "butter", "california", "carbon", "cardinal",
    "carolina", "carpet", "cat", "ceiling", "charlie", "chicken", "coffee", "cola", "cold",
    "colorado", "comet", "connecticut", "crystal", "cup", "dakota", "december", "delaware",
    "delta", "dune", "don", "double", "early", "earth", "east", "echo", "edward", "eight",
    "eighteen", "eleven", "emma", "ember", "equal", "falcon", "fanta", "fifteen", "fillet",
    "finch", "fish", "five", "fix", "floor", "florida", "football", "four", "fourteen",
    "foxtrot", "freddie", "friend", "fruit", "gee", "georgia", "glucose", "golf", "green",
    "grey", "hamper", "happy", "harry", "hawaii", "helium", "high", "hot", "hotel", "hydrogen",
    "idaho", "illinois", "india", "indigo", "ink", "iowa", "island", "item", "jersey", "jig",
    "johnny", "juliet", "july", "jupiter", "kansas", "kentucky", "kilo", "king", "kitten",
    "lactose", "lake", "lamp", "lemon", "leopard", "lima", "lion", "lithium", "london",
    "louisiana", "low", "magazine", "magnesium", "maine", "mango", "march", "mars", "maryland",
    "massachusetts", "may", "mexico", "michigan", "mike", "minnesota", "mirror", "mississippi",
    "missouri", "mobile", "mockingbird", "monkey", "montana", "moon", "mountain", "muppet",
    "music", "nebraska", "neptune", "network", "nevada", "nine", "nineteen", "nitrogen",
    "north", "november", "nuts", "october", "ohio", "oklahoma", "one", "orange", "oranges",
    "oregon", "oscar", "oven", "oxygen", "papa", "paris", "pasta", "pennsylvania", "pip",
    "pizza", "pluto", "potato", "princess", "purple", "quebec", "queen", "quiet", "red",
    "river", "robert", "robin", "romeo", "rugby", "sage", "salami", "saturn", "september",
    "seven", "seventeen", "shade", "sierra", "single", "sink", "six", "sixteen", "skylark",
    "snake", "social", "sodium", "solar", "south", "spaghetti", "speaker", "spring",
    "stairway", "steak", "stream", "summer", "sweet", "table", "tango", "ten", "tennessee",
    "tennis", "texas", "thirteen", "three", "timing", "triple", "twelve", "twenty", "two",
    "uncle", "unicorn", "uniform", "uranus", "utah", "vegan", "venus", "vermont", "victor",
    "video", "violet", "virginia", "washington", "west", "whiskey", "white", "william",
    "winner", "winter", "wisconsin", "wolfram", "wyoming", "xray", "yankee", "yellow", "zebra",
    "zulu",
];

/// Name and file name for a generated calendar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentName {
    /// e.g. "Fall 2014 (alpha-bravo-charlie-delta)"
    pub title: String,
    /// e.g. "1149-alpha-bravo-charlie-delta.ics"
    pub file_name: String,
}

/// Derives the document name for a request.
///
/// Course order is significant: it is also the event order in the document.
pub fn document_name(term: &Term, courses: &[CourseId]) -> DocumentName {
    let key = format!(
        "{}:{}",
        term.id,
        courses
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("+")
    );
    let words = humanize(&Sha256::digest(key.as_bytes()));

    DocumentName {
        title: format!("{} ({})", term.name, words),
        file_name: format!("{}-{}.ics", term.id, words),
    }
}

/// Folds a digest into `NAME_WORDS` bytes by XOR and maps each to a word.
fn humanize(digest: &[u8]) -> String {
    let chunk = digest.len() / NAME_WORDS;
    digest
        .chunks(chunk)
        .take(NAME_WORDS)
        .map(|c| WORDS[c.iter().fold(0u8, |acc, b| acc ^ b) as usize])
        .collect::<Vec<_>>()
        .join("-")
}

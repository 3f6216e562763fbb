//! Immutable snapshots of evolved strategies.

use chrono::{DateTime, SecondsFormat, Utc};
use evohold_ai::{ParameterizedPolicy, PokerStrategy, StrategyError};
use evohold_engine::seed::sha256_hex;
use evohold_genetics::genome::Genome;
use evohold_genetics::sanitize::{sanitize_string, MAX_DESCRIPTION, MAX_SHORT_STRING};
use evohold_genetics::serialize;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::benchmark::BenchmarkResult;
use crate::elo::EloRating;

/// Hex characters of the content hash kept in a solution id.
pub const ID_HASH_LEN: usize = 12;
const MAX_SLUG_LEN: usize = 32;
const ANONYMOUS: &str = "anonymous";

/// Poker results the entity accumulated in the simulation before capture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureStats {
    pub hands_played: u64,
    pub hands_won: u64,
    pub net_bb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionMetadata {
    pub solution_id: String,
    pub name: String,
    pub author: String,
    #[serde(default)]
    pub description: String,
    pub generation: u64,
    pub entity_id: u64,
    /// RFC3339, UTC. Not part of the content hash.
    pub captured_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionRecord {
    pub metadata: SolutionMetadata,
    pub poker_strategy: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior_strategy: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genome: Option<Value>,
    #[serde(default)]
    pub stats: CaptureStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<BenchmarkResult>,
    pub content_hash: String,
}

impl SolutionRecord {
    pub fn id(&self) -> &str {
        &self.metadata.solution_id
    }

    /// Decodes the poker strategy. Captured payloads are always well formed,
    /// so a failure means the file was edited by hand.
    pub fn poker_strategy(&self) -> Result<PokerStrategy, StrategyError> {
        PokerStrategy::try_from_value(&self.poker_strategy)
    }

    /// Decodes the embedded genome, if the record carries one.
    pub fn genome<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Genome> {
        self.genome
            .as_ref()
            .map(|value| serialize::from_value(value, rng))
    }

    pub fn elo(&self) -> Option<&EloRating> {
        self.benchmark.as_ref().map(|b| &b.elo)
    }

    /// Elo from the last benchmark, or the initial rating.
    pub fn rating(&self) -> f64 {
        self.elo()
            .map(|e| e.rating)
            .unwrap_or(crate::elo::INITIAL_RATING)
    }

    pub fn aggregate_bb_per_100(&self) -> Option<f64> {
        self.benchmark.as_ref().map(|b| b.aggregate_bb_per_100)
    }

    /// True when `content_hash` still matches the strategy payloads.
    pub fn verify_hash(&self) -> bool {
        content_hash(&self.poker_strategy, self.behavior_strategy.as_ref()) == self.content_hash
    }
}

/// Everything needed to capture one entity.
#[derive(Debug, Clone)]
pub struct CaptureSource<'a> {
    pub entity_id: u64,
    pub genome: &'a Genome,
    pub generation: u64,
    pub author: &'a str,
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub stats: CaptureStats,
}

/// SHA-256 over the canonical JSON of the strategy payloads.
///
/// `serde_json` objects keep their keys sorted, so serializing a `Value`
/// is canonical.
pub fn content_hash(poker_strategy: &Value, behavior_strategy: Option<&Value>) -> String {
    let payload = json!({
        "behavior_strategy": behavior_strategy.cloned().unwrap_or(Value::Null),
        "poker_strategy": poker_strategy,
    });
    sha256_hex(payload.to_string().as_bytes())
}

/// Lowercase `[a-z0-9-]` form of an author name, `anonymous` when empty.
///
/// ```
/// use evohold_arena::solution::author_slug;
///
/// assert_eq!(author_slug("Ada Lovelace"), "ada-lovelace");
/// assert_eq!(author_slug("  __ "), "anonymous");
/// ```
pub fn author_slug(author: &str) -> String {
    let mut slug = String::new();
    for c in author.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
        if slug.len() >= MAX_SLUG_LEN {
            break;
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        ANONYMOUS.to_string()
    } else {
        slug.to_string()
    }
}

pub fn solution_id(author: &str, content_hash: &str) -> String {
    let prefix: String = content_hash.chars().take(ID_HASH_LEN).collect();
    format!("{}_{}", author_slug(author), prefix)
}

/// True for ids of the `<slug>_<12 lowercase hex>` form produced by
/// [`solution_id`]. Such ids are safe to use as file names.
///
/// ```
/// use evohold_arena::solution::is_solution_id;
///
/// assert!(is_solution_id("ada-lovelace_0123456789ab"));
/// assert!(!is_solution_id("../escaped_0123456789ab"));
/// assert!(!is_solution_id("lab_0123456789AB"));
/// ```
pub fn is_solution_id(id: &str) -> bool {
    let Some((slug, hash)) = id.rsplit_once('_') else {
        return false;
    };
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        && hash.len() == ID_HASH_LEN
        && hash
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

/// Captures `source` with the current time as `captured_at`.
pub fn capture(source: &CaptureSource<'_>) -> SolutionRecord {
    capture_at(source, Utc::now())
}

pub fn capture_at(source: &CaptureSource<'_>, captured_at: DateTime<Utc>) -> SolutionRecord {
    let poker_strategy = source.genome.poker_strategy.to_value();
    let behavior_strategy = source.genome.behavior_strategy.to_value();
    let hash = content_hash(&poker_strategy, Some(&behavior_strategy));

    let author = match sanitize_string(source.author, MAX_SHORT_STRING) {
        a if a.is_empty() => ANONYMOUS.to_string(),
        a => a,
    };
    let name = source
        .name
        .map(|n| sanitize_string(n, MAX_SHORT_STRING))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| format!("gen{}-entity{}", source.generation, source.entity_id));
    let description = source
        .description
        .map(|d| sanitize_string(d, MAX_DESCRIPTION))
        .unwrap_or_default();

    SolutionRecord {
        metadata: SolutionMetadata {
            solution_id: solution_id(&author, &hash),
            name,
            author,
            description,
            generation: source.generation,
            entity_id: source.entity_id,
            captured_at: captured_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        },
        poker_strategy,
        behavior_strategy: Some(behavior_strategy),
        genome: Some(serialize::to_value(source.genome)),
        stats: source.stats,
        benchmark: None,
        content_hash: hash,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn source(genome: &Genome) -> CaptureSource<'_> {
        CaptureSource {
            entity_id: 17,
            genome,
            generation: 3,
            author: "Test Lab",
            name: None,
            description: Some("<b>shark</b>"),
            stats: CaptureStats::default(),
        }
    }

    #[test]
    fn id_is_slug_and_hash_prefix() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let genome = Genome::random(&mut rng);
        let record = capture(&source(&genome));
        assert!(record.id().starts_with("test-lab_"));
        assert_eq!(record.id().len(), "test-lab_".len() + ID_HASH_LEN);
        assert!(record.content_hash.starts_with(&record.id()["test-lab_".len()..]));
        assert_eq!(record.metadata.name, "gen3-entity17");
        assert_eq!(record.metadata.description, "bsharkb");
        assert!(record.verify_hash());
    }

    #[test]
    fn capture_time_does_not_change_hash() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let genome = Genome::random(&mut rng);
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 0).unwrap();
        let a = capture_at(&source(&genome), t1);
        let b = capture_at(&source(&genome), t2);
        assert_eq!(a.content_hash, b.content_hash);
        assert_eq!(a.metadata.captured_at, "2024-01-01T00:00:00Z");
        assert_ne!(a.metadata.captured_at, b.metadata.captured_at);
    }

    #[test]
    fn strategy_and_genome_decode() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let genome = Genome::random(&mut rng);
        let record = capture(&source(&genome));
        assert_eq!(record.poker_strategy().unwrap(), genome.poker_strategy);
        let back = record.genome(&mut rng).unwrap();
        assert_eq!(back.poker_strategy.kind(), genome.poker_strategy.kind());
    }

    #[test]
    fn tampered_payload_fails_hash_check() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let genome = Genome::random(&mut rng);
        let mut record = capture(&source(&genome));
        record.poker_strategy["kind"] = json!("trapper");
        record.poker_strategy["parameters"] = json!({});
        assert!(!record.verify_hash());
    }
}

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::models::{BranchDirection, Thought, ThoughtTable};

/// Placeholder substituted with the caller's problem statement
const PROBLEM_SLOT: &str = "{problem}";

/// Contrarian reframings a new thought is drawn from
pub const UNREASONABLE_TEMPLATES: [&str; 8] = [
    "What if we completely eliminated the concept of {problem}?",
    "Imagine if {problem} operated in reverse - what opportunities would that create?",
    "If we had infinite resources and no physical limitations, how would we solve {problem}?",
    "What if we combined {problem} with its exact opposite?",
    "How would an alien civilization with completely different logic solve {problem}?",
    "What if {problem} were scaled up a million times - or shrunk to almost nothing?",
    "What if every rule we assume governs {problem} simply stopped applying tomorrow?",
    "What if {problem} is not the problem at all, but the solution to something else?",
];

const BRANCH_PREFIX: &str = "branch_";

/// Probability that a generated thought challenges an assumption
pub const CHALLENGE_PROBABILITY: f64 = 0.7;

/// Every content string `generate` can produce for `problem` without a predecessor
pub fn template_expansions(problem: &str) -> Vec<String> {
    UNREASONABLE_TEMPLATES
        .iter()
        .map(|template| template.replace(PROBLEM_SLOT, problem))
        .collect()
}

/// Content of a thought that builds on an earlier one
pub fn chained_content(previous: &str, angle: &str) -> String {
    format!("Building on: {}\nNew angle: {}", previous, angle)
}

/// Content produced when branching `source` in `direction`
pub fn branched_content(source: &str, direction: &BranchDirection) -> String {
    match direction {
        BranchDirection::MoreExtreme => {
            format!("Taking it further: {} AND multiply it by 1000x", source)
        }
        BranchDirection::Opposite => format!(
            "Complete reversal: What if the exact opposite of \"{}\" is the answer?",
            source
        ),
        BranchDirection::Tangential => format!(
            "Unexpected connection: {} but in a completely different context",
            source
        ),
        BranchDirection::Other(_) => format!("Building on: {} in a new direction", source),
    }
}

/// How new branch identifiers are minted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchIdStrategy {
    /// `branch_1`, `branch_2`, ... counted in memory, resumed past the highest
    /// `branch_N` already recorded in the table
    #[default]
    Counter,
    /// `branch_<uuid>`, unique across restarts
    Random,
}

/// Produces thought records from problems and from existing thoughts.
///
/// All randomness flows through one `StdRng`, so a seeded generator is fully
/// reproducible apart from identifiers and timestamps.
pub struct ThoughtGenerator {
    rng: Mutex<StdRng>,
    branch_strategy: BranchIdStrategy,
    branch_counter: AtomicU64,
}

impl ThoughtGenerator {
    pub fn new(branch_strategy: BranchIdStrategy) -> Self {
        Self::from_rng(StdRng::from_entropy(), branch_strategy)
    }

    pub fn with_seed(seed: u64, branch_strategy: BranchIdStrategy) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed), branch_strategy)
    }

    fn from_rng(rng: StdRng, branch_strategy: BranchIdStrategy) -> Self {
        Self {
            rng: Mutex::new(rng),
            branch_strategy,
            branch_counter: AtomicU64::new(0),
        }
    }

    /// Create a new thought for `problem`, optionally chained onto `previous`.
    ///
    /// The new thought stays on `previous`'s branch (or the main line).
    pub fn generate(
        &self,
        problem: &str,
        previous: Option<&Thought>,
        force_rebellion: Option<bool>,
    ) -> Thought {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        let template = UNREASONABLE_TEMPLATES[rng.gen_range(0..UNREASONABLE_TEMPLATES.len())];
        let angle = template.replace(PROBLEM_SLOT, problem);
        let is_rebellion = force_rebellion.unwrap_or_else(|| rng.gen_bool(0.5));
        let challenges_assumption = rng.gen_bool(CHALLENGE_PROBABILITY);

        let content = match previous {
            Some(previous) => chained_content(&previous.content, &angle),
            None => angle,
        };

        Thought::new(
            content,
            is_rebellion,
            challenges_assumption,
            previous.map(|p| p.id.clone()),
            previous.and_then(|p| p.branch_id.clone()),
        )
    }

    /// Advance the branch counter past every `branch_N` recorded in `table`.
    pub fn skip_recorded_branches(&self, table: &ThoughtTable) {
        if self.branch_strategy != BranchIdStrategy::Counter {
            return;
        }

        let highest = table
            .values()
            .filter_map(|t| t.branch_id.as_deref()?.strip_prefix(BRANCH_PREFIX))
            .filter_map(|n| n.parse::<u64>().ok())
            .max();
        if let Some(highest) = highest {
            self.branch_counter.fetch_max(highest, Ordering::SeqCst);
        }
    }

    /// Fork `source` into a brand new branch.
    pub fn branch(&self, source: &Thought, direction: &BranchDirection) -> Thought {
        let branch_id = self.next_branch_id();
        tracing::debug!(
            "Minted branch {} from thought {} ({})",
            branch_id,
            source.id,
            direction.as_str()
        );

        Thought::new(
            branched_content(&source.content, direction),
            *direction == BranchDirection::Opposite,
            true,
            Some(source.id.clone()),
            Some(branch_id),
        )
    }

    fn next_branch_id(&self) -> String {
        match self.branch_strategy {
            BranchIdStrategy::Counter => {
                let n = self.branch_counter.fetch_add(1, Ordering::SeqCst) + 1;
                format!("{}{}", BRANCH_PREFIX, n)
            }
            BranchIdStrategy::Random => format!("{}{}", BRANCH_PREFIX, uuid::Uuid::new_v4().simple()),
        }
    }
}

impl Default for ThoughtGenerator {
    fn default() -> Self {
        Self::new(BranchIdStrategy::default())
    }
}

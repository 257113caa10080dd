use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// URI scheme under which full thought records are addressable
pub const THOUGHT_URI_SCHEME: &str = "thought://";

/// Label reported for thoughts that do not belong to any branch
pub const MAIN_BRANCH: &str = "main";

/// A single generated thought, as stored in the thought table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Thought {
    pub id: String,
    pub content: String,
    pub is_rebellion: bool,
    pub challenges_assumption: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_from_thought: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    /// Creation time in epoch milliseconds
    pub timestamp: i64,
}

impl Thought {
    /// Create a thought with a fresh identifier stamped with the current time
    pub fn new(
        content: String,
        is_rebellion: bool,
        challenges_assumption: bool,
        branch_from_thought: Option<String>,
        branch_id: Option<String>,
    ) -> Self {
        Self {
            id: format!("thought_{}", uuid::Uuid::new_v4().simple()),
            content,
            is_rebellion,
            challenges_assumption,
            branch_from_thought,
            branch_id,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn uri(&self) -> String {
        thought_uri(&self.id)
    }

    pub fn branch_label(&self) -> &str {
        self.branch_id.as_deref().unwrap_or(MAIN_BRANCH)
    }

    /// Whether this thought sits on `branch_id`; `"main"` selects the main line
    pub fn is_on_branch(&self, branch_id: &str) -> bool {
        self.branch_label() == branch_id
    }

    pub fn branch_info(&self) -> String {
        match &self.branch_id {
            Some(branch_id) => format!("Branch: {}", branch_id),
            None => "Main branch".to_string(),
        }
    }

    /// Metadata-only projection; content is deliberately left out
    pub fn summary(&self) -> ThoughtSummary {
        ThoughtSummary {
            id: self.id.clone(),
            uri: self.uri(),
            is_rebellion: self.is_rebellion,
            challenges_assumption: self.challenges_assumption,
            branch_id: self.branch_label().to_string(),
            timestamp: self.timestamp,
        }
    }
}

pub fn thought_uri(id: &str) -> String {
    format!("{}{}", THOUGHT_URI_SCHEME, id)
}

/// Extract the thought identifier from a `thought://` URI
pub fn parse_thought_uri(uri: &str) -> Option<&str> {
    uri.strip_prefix(THOUGHT_URI_SCHEME).filter(|id| !id.is_empty())
}

/// The full set of thoughts, keyed by identifier.
///
/// This is the unit of persistence: it is always loaded and saved whole.
/// Serializes as a plain JSON object mapping id to thought; keys are kept
/// ordered so the stored representation is stable across load/save cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThoughtTable {
    thoughts: BTreeMap<String, Thought>,
}

impl ThoughtTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Thought> {
        self.thoughts.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.thoughts.contains_key(id)
    }

    /// Insert a newly created thought. Existing records are never replaced.
    pub fn insert(&mut self, thought: Thought) -> bool {
        if self.thoughts.contains_key(&thought.id) {
            return false;
        }
        self.thoughts.insert(thought.id.clone(), thought);
        true
    }

    pub fn values(&self) -> impl Iterator<Item = &Thought> {
        self.thoughts.values()
    }

    pub fn len(&self) -> usize {
        self.thoughts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thoughts.is_empty()
    }
}

impl FromIterator<Thought> for ThoughtTable {
    fn from_iter<I: IntoIterator<Item = Thought>>(iter: I) -> Self {
        let mut table = ThoughtTable::new();
        for thought in iter {
            table.insert(thought);
        }
        table
    }
}

/// Metadata-only view of a thought returned by search and list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtSummary {
    pub id: String,
    /// Resource URI from which the full thought can be read
    pub uri: String,
    pub is_rebellion: bool,
    pub challenges_assumption: bool,
    /// Branch identifier, or "main" for thoughts outside any branch
    pub branch_id: String,
    pub timestamp: i64,
}

/// Recognised branch directions. Anything else is carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchDirection {
    MoreExtreme,
    Opposite,
    Tangential,
    Other(String),
}

impl BranchDirection {
    pub fn parse(direction: &str) -> Self {
        match direction {
            "more_extreme" => BranchDirection::MoreExtreme,
            "opposite" => BranchDirection::Opposite,
            "tangential" => BranchDirection::Tangential,
            other => BranchDirection::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BranchDirection::MoreExtreme => "more_extreme",
            BranchDirection::Opposite => "opposite",
            BranchDirection::Tangential => "tangential",
            BranchDirection::Other(other) => other,
        }
    }
}

/// Conjunctive metadata filter; `None` fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThoughtFilter {
    pub branch_id: Option<String>,
    pub is_rebellion: Option<bool>,
    pub challenges_assumption: Option<bool>,
}

impl ThoughtFilter {
    pub fn matches(&self, thought: &Thought) -> bool {
        if let Some(branch_id) = &self.branch_id {
            if !thought.is_on_branch(branch_id) {
                return false;
            }
        }
        if let Some(is_rebellion) = self.is_rebellion {
            if thought.is_rebellion != is_rebellion {
                return false;
            }
        }
        if let Some(challenges) = self.challenges_assumption {
            if thought.challenges_assumption != challenges {
                return false;
            }
        }
        true
    }
}

// Tool parameters

/// Parameters for the generate_unreasonable_thought tool
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateThoughtParams {
    /// The problem or challenge to think unreasonably about
    pub problem: String,
    /// Optional ID of a previous thought to build upon or rebel against
    pub previous_thought_id: Option<String>,
    /// Force the thought to rebel against conventional wisdom
    pub force_rebellion: Option<bool>,
}

/// Parameters for the branch_thought tool
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BranchThoughtParams {
    /// ID of the thought to branch from
    pub thought_id: String,
    /// Direction for the new branch (e.g. 'more_extreme', 'opposite', 'tangential')
    pub direction: String,
}

/// Parameters for the search_thoughts tool
#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchThoughtsParams {
    /// Only return thoughts from this branch ("main" for thoughts outside any branch)
    pub branch_id: Option<String>,
    /// Only return thoughts with this rebellion flag
    pub is_rebellion: Option<bool>,
    /// Only return thoughts with this assumption-challenge flag
    pub challenges_assumption: Option<bool>,
    /// Maximum number of results, most recent first (default: 10)
    pub limit: Option<usize>,
}

/// Parameters for the list_thoughts tool
#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListThoughtsParams {
    /// Optional branch ID to filter thoughts ("main" for thoughts outside any branch)
    pub branch_id: Option<String>,
}

/// Parameters for the get_thought tool
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetThoughtParams {
    /// ID of the thought whose full content should be returned
    pub thought_id: String,
}

// Tool responses

/// Response from generate_unreasonable_thought
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub thought_id: String,
    pub uri: String,
    pub thought: String,
    pub is_rebellion: bool,
    pub challenges_assumption: bool,
    pub branch_info: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_from_thought: Option<String>,
}

impl From<&Thought> for GenerateResponse {
    fn from(thought: &Thought) -> Self {
        Self {
            thought_id: thought.id.clone(),
            uri: thought.uri(),
            thought: thought.content.clone(),
            is_rebellion: thought.is_rebellion,
            challenges_assumption: thought.challenges_assumption,
            branch_info: thought.branch_info(),
            branch_from_thought: thought.branch_from_thought.clone(),
        }
    }
}

/// Response from branch_thought
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchResponse {
    pub thought_id: String,
    pub uri: String,
    pub thought: String,
    pub branch_id: String,
    pub branch_info: String,
    pub direction: String,
    pub is_rebellion: bool,
    pub challenges_assumption: bool,
}

/// Response from search_thoughts
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub thoughts: Vec<ThoughtSummary>,
    /// Matches before the limit was applied
    pub total_matches: usize,
}

/// Response from list_thoughts
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub thoughts: Vec<ThoughtSummary>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thought(id: &str, branch_id: Option<&str>, rebellion: bool, challenges: bool) -> Thought {
        Thought {
            id: id.to_string(),
            content: format!("content of {}", id),
            is_rebellion: rebellion,
            challenges_assumption: challenges,
            branch_from_thought: None,
            branch_id: branch_id.map(str::to_string),
            timestamp: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_thought_wire_format() {
        let mut t = thought("thought_a", Some("branch_1"), true, false);
        t.branch_from_thought = Some("thought_root".to_string());

        let value = serde_json::to_value(&t).unwrap();
        assert_eq!(value["isRebellion"], true);
        assert_eq!(value["challengesAssumption"], false);
        assert_eq!(value["branchFromThought"], "thought_root");
        assert_eq!(value["branchId"], "branch_1");
        assert_eq!(value["timestamp"], 1_700_000_000_000i64);

        let root = thought("thought_b", None, false, true);
        let value = serde_json::to_value(&root).unwrap();
        assert!(value.get("branchId").is_none());
        assert!(value.get("branchFromThought").is_none());
    }

    #[test]
    fn test_summary_omits_content() {
        let t = thought("thought_a", None, false, true);
        let summary = t.summary();
        assert_eq!(summary.branch_id, MAIN_BRANCH);
        assert_eq!(summary.uri, "thought://thought_a");

        let value = serde_json::to_value(&summary).unwrap();
        assert!(value.get("content").is_none());
        assert!(!value.to_string().contains("content of thought_a"));
    }

    #[test]
    fn test_table_rejects_duplicate_ids() {
        let mut table = ThoughtTable::new();
        assert!(table.insert(thought("thought_a", None, false, false)));
        assert!(!table.insert(thought("thought_a", Some("branch_9"), true, true)));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("thought_a").unwrap().branch_id, None);
    }

    #[test]
    fn test_table_serializes_as_id_map() {
        let table: ThoughtTable = vec![thought("thought_a", None, false, false)]
            .into_iter()
            .collect();
        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(value["thought_a"]["id"], "thought_a");
    }

    #[test]
    fn test_filter_is_conjunctive() {
        let t = thought("thought_a", Some("branch_1"), true, false);

        assert!(ThoughtFilter::default().matches(&t));
        assert!(ThoughtFilter {
            branch_id: Some("branch_1".into()),
            is_rebellion: Some(true),
            challenges_assumption: None,
        }
        .matches(&t));
        assert!(!ThoughtFilter {
            branch_id: Some("branch_1".into()),
            is_rebellion: Some(true),
            challenges_assumption: Some(true),
        }
        .matches(&t));
        assert!(!ThoughtFilter {
            branch_id: Some("branch_2".into()),
            ..Default::default()
        }
        .matches(&t));
    }

    #[test]
    fn test_thought_uri_parsing() {
        assert_eq!(parse_thought_uri("thought://thought_a"), Some("thought_a"));
        assert_eq!(parse_thought_uri("thought://"), None);
        assert_eq!(parse_thought_uri("file:///etc/passwd"), None);
    }

    #[test]
    fn test_branch_direction_parse() {
        assert_eq!(BranchDirection::parse("opposite"), BranchDirection::Opposite);
        assert_eq!(
            BranchDirection::parse("sideways"),
            BranchDirection::Other("sideways".into())
        );
        assert_eq!(BranchDirection::parse("sideways").as_str(), "sideways");
    }
}

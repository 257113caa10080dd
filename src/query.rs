use crate::models::{Thought, ThoughtFilter, ThoughtSummary, ThoughtTable};

/// Number of results `search` returns when the caller gives no limit
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Result of a filtered search: the capped page plus the uncapped match count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    pub thoughts: Vec<ThoughtSummary>,
    pub total_matches: usize,
}

/// Filter, newest first, then cap at `limit`.
pub fn search(table: &ThoughtTable, filter: &ThoughtFilter, limit: usize) -> SearchPage {
    let mut matches: Vec<&Thought> = table.values().filter(|t| filter.matches(t)).collect();
    let total_matches = matches.len();

    matches.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    SearchPage {
        thoughts: matches
            .into_iter()
            .take(limit)
            .map(Thought::summary)
            .collect(),
        total_matches,
    }
}

/// All thoughts on `branch_id` (or every thought), oldest first, uncapped.
pub fn list(table: &ThoughtTable, branch_id: Option<&str>) -> Vec<ThoughtSummary> {
    let mut thoughts: Vec<&Thought> = table
        .values()
        .filter(|t| branch_id.map_or(true, |b| t.is_on_branch(b)))
        .collect();

    thoughts.sort_by_key(|t| t.timestamp);

    thoughts.into_iter().map(Thought::summary).collect()
}

/// Full record lookup, content included
pub fn resolve<'a>(table: &'a ThoughtTable, id: &str) -> Option<&'a Thought> {
    table.get(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thought(id: &str, timestamp: i64, branch_id: Option<&str>, rebellion: bool) -> Thought {
        Thought {
            id: id.to_string(),
            content: format!("content {}", id),
            is_rebellion: rebellion,
            challenges_assumption: true,
            branch_from_thought: None,
            branch_id: branch_id.map(str::to_string),
            timestamp,
        }
    }

    fn sample_table() -> ThoughtTable {
        vec![
            thought("t1", 100, None, false),
            thought("t2", 300, Some("branch_1"), true),
            thought("t3", 200, Some("branch_1"), false),
            thought("t4", 400, Some("branch_2"), true),
            thought("t5", 250, None, true),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_search_orders_newest_first() {
        let page = search(&sample_table(), &ThoughtFilter::default(), DEFAULT_SEARCH_LIMIT);
        let ids: Vec<_> = page.thoughts.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t4", "t2", "t5", "t3", "t1"]);
        assert!(page.thoughts.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[test]
    fn test_search_caps_after_filtering() {
        let filter = ThoughtFilter {
            is_rebellion: Some(true),
            ..Default::default()
        };
        let page = search(&sample_table(), &filter, 2);
        let ids: Vec<_> = page.thoughts.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t4", "t2"]);
        assert_eq!(page.total_matches, 3);
    }

    #[test]
    fn test_search_combines_criteria() {
        let filter = ThoughtFilter {
            branch_id: Some("branch_1".into()),
            is_rebellion: Some(false),
            challenges_assumption: Some(true),
        };
        let page = search(&sample_table(), &filter, 100);
        assert_eq!(page.thoughts.len(), 1);
        assert_eq!(page.thoughts[0].id, "t3");
        assert_eq!(page.thoughts[0].branch_id, "branch_1");
    }

    #[test]
    fn test_list_orders_oldest_first() {
        let all = list(&sample_table(), None);
        let ids: Vec<_> = all.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t3", "t5", "t2", "t4"]);

        let branch = list(&sample_table(), Some("branch_1"));
        let ids: Vec<_> = branch.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t3", "t2"]);

        let main = all.iter().find(|t| t.id == "t1").unwrap();
        assert_eq!(main.branch_id, "main");
    }

    #[test]
    fn test_main_label_selects_main_line() {
        let table = sample_table();

        let main: Vec<_> = list(&table, Some("main")).into_iter().map(|t| t.id).collect();
        assert_eq!(main, vec!["t1", "t5"]);

        let filter = ThoughtFilter {
            branch_id: Some("main".into()),
            is_rebellion: Some(true),
            ..Default::default()
        };
        let page = search(&table, &filter, DEFAULT_SEARCH_LIMIT);
        assert_eq!(page.total_matches, 1);
        assert_eq!(page.thoughts[0].id, "t5");
        assert_eq!(page.thoughts[0].branch_id, "main");
    }

    #[test]
    fn test_list_is_uncapped() {
        let table: ThoughtTable = (0..50)
            .map(|i| thought(&format!("t{}", i), i, None, false))
            .collect();
        assert_eq!(list(&table, None).len(), 50);
        assert_eq!(search(&table, &ThoughtFilter::default(), DEFAULT_SEARCH_LIMIT).thoughts.len(), 10);
    }

    #[test]
    fn test_resolve() {
        let table = sample_table();
        assert_eq!(resolve(&table, "t2").unwrap().content, "content t2");
        assert!(resolve(&table, "missing").is_none());
    }
}

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{Result, ThinkingError};
use crate::generator::ThoughtGenerator;
use crate::models::{
    parse_thought_uri, BranchDirection, BranchResponse, BranchThoughtParams, GenerateResponse,
    GenerateThoughtParams, ListResponse, ListThoughtsParams, SearchResponse, SearchThoughtsParams,
    Thought, ThoughtFilter, ThoughtTable,
};
use crate::query;
use crate::store::ThoughtStore;
use crate::validation::InputValidator;

/// Runs every tool operation as one load, compute, save cycle against the store
pub struct ThoughtEngine<S: ThoughtStore + ?Sized> {
    store: Arc<S>,
    generator: ThoughtGenerator,
    validator: InputValidator,
    default_limit: usize,
    // Held across a whole mutating cycle so concurrent requests cannot interleave saves
    write_lock: Mutex<()>,
}

impl<S: ThoughtStore + ?Sized> ThoughtEngine<S> {
    pub fn new(
        store: Arc<S>,
        generator: ThoughtGenerator,
        validator: InputValidator,
        default_limit: usize,
    ) -> Self {
        Self {
            store,
            generator,
            validator,
            default_limit,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Handle generate_unreasonable_thought
    pub async fn generate(&self, params: GenerateThoughtParams) -> Result<GenerateResponse> {
        self.validator.validate_problem(&params.problem)?;
        // An empty previousThoughtId means no predecessor
        let previous_thought_id = params.previous_thought_id.filter(|id| !id.is_empty());
        if let Some(previous_id) = &previous_thought_id {
            self.validator.validate_thought_id("previousThoughtId", previous_id)?;
        }

        let _guard = self.write_lock.lock().await;
        let mut table = self.store.load().await?;

        let previous = match &previous_thought_id {
            Some(previous_id) => Some(table.get(previous_id).ok_or_else(|| {
                ThinkingError::NotFound(format!("Previous thought {} not found", previous_id))
            })?),
            None => None,
        };

        let thought = self
            .generator
            .generate(&params.problem, previous, params.force_rebellion);
        let response = GenerateResponse::from(&thought);

        tracing::info!(
            "Generated thought {} (rebellion: {}, challenges assumption: {}, {})",
            thought.id,
            thought.is_rebellion,
            thought.challenges_assumption,
            thought.branch_info()
        );

        self.record(&mut table, thought).await?;
        Ok(response)
    }

    /// Handle branch_thought
    pub async fn branch(&self, params: BranchThoughtParams) -> Result<BranchResponse> {
        self.validator.validate_thought_id("thoughtId", &params.thought_id)?;
        self.validator.validate_direction(&params.direction)?;
        let direction = BranchDirection::parse(&params.direction);

        let _guard = self.write_lock.lock().await;
        let mut table = self.store.load().await?;

        let source = table.get(&params.thought_id).ok_or_else(|| {
            ThinkingError::NotFound(format!("Source thought {} not found", params.thought_id))
        })?;

        self.generator.skip_recorded_branches(&table);
        let thought = self.generator.branch(source, &direction);
        let branch_id = thought.branch_label().to_string();

        let response = BranchResponse {
            thought_id: thought.id.clone(),
            uri: thought.uri(),
            thought: thought.content.clone(),
            branch_info: format!("New branch {} from thought {}", branch_id, params.thought_id),
            branch_id,
            direction: params.direction,
            is_rebellion: thought.is_rebellion,
            challenges_assumption: thought.challenges_assumption,
        };

        tracing::info!("{} ({})", response.branch_info, response.direction);

        self.record(&mut table, thought).await?;
        Ok(response)
    }

    /// Handle search_thoughts
    pub async fn search(&self, params: SearchThoughtsParams) -> Result<SearchResponse> {
        let limit = params.limit.unwrap_or(self.default_limit);
        self.validator.validate_limit(limit)?;

        let filter = ThoughtFilter {
            branch_id: branch_filter(params.branch_id),
            is_rebellion: params.is_rebellion,
            challenges_assumption: params.challenges_assumption,
        };

        let table = self.store.load().await?;
        let page = query::search(&table, &filter, limit);

        tracing::info!(
            "Search {:?} (limit {}) matched {} of {} thoughts",
            filter,
            limit,
            page.total_matches,
            table.len()
        );

        Ok(SearchResponse {
            thoughts: page.thoughts,
            total_matches: page.total_matches,
        })
    }

    /// Handle list_thoughts
    pub async fn list(&self, params: ListThoughtsParams) -> Result<ListResponse> {
        let branch_id = branch_filter(params.branch_id);
        let table = self.store.load().await?;
        let thoughts = query::list(&table, branch_id.as_deref());

        tracing::info!(
            "Listing {} thoughts on {}",
            thoughts.len(),
            branch_id.as_deref().unwrap_or("all branches")
        );

        Ok(ListResponse {
            count: thoughts.len(),
            thoughts,
        })
    }

    /// Full thought record, content included
    pub async fn resolve(&self, thought_id: &str) -> Result<Thought> {
        self.validator.validate_thought_id("thoughtId", thought_id)?;

        let table = self.store.load().await?;
        query::resolve(&table, thought_id)
            .cloned()
            .ok_or_else(|| ThinkingError::NotFound(format!("Thought {} not found", thought_id)))
    }

    /// Resolve a `thought://<id>` resource URI
    pub async fn resolve_uri(&self, uri: &str) -> Result<Thought> {
        let thought_id = parse_thought_uri(uri)
            .ok_or_else(|| ThinkingError::UnknownOperation(format!("unsupported resource: {}", uri)))?;
        self.resolve(thought_id).await
    }

    async fn record(&self, table: &mut ThoughtTable, thought: Thought) -> Result<()> {
        let id = thought.id.clone();
        if !table.insert(thought) {
            return Err(ThinkingError::Storage(format!("thought id {} already exists", id)));
        }
        self.store.save(table).await
    }
}

/// An empty branch filter selects every branch
fn branch_filter(branch_id: Option<String>) -> Option<String> {
    branch_id.filter(|b| !b.is_empty())
}

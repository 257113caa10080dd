use crate::config::ThinkingConfig;
use crate::engine::ThoughtEngine;
use crate::error::Result as ThinkingResult;
use crate::generator::ThoughtGenerator;
use crate::models::*;
use crate::store::{open_store, ThoughtStore};
use crate::validation::InputValidator;
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{
        AnnotateAble, CallToolResult, Content, ErrorData, Implementation, ListResourcesResult,
        PaginatedRequestParam, ProtocolVersion, RawResource, ReadResourceRequestParam,
        ReadResourceResult, ResourceContents, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    RoleServer, ServerHandler,
};
use rmcp_macros::{tool, tool_handler, tool_router};
use serde::Serialize;
use std::{future::Future, sync::Arc};

/// The unreasonable thinking MCP service
#[derive(Clone)]
pub struct ThinkingService {
    tool_router: ToolRouter<Self>,
    engine: Arc<ThoughtEngine<dyn ThoughtStore>>,
    config: ThinkingConfig,
}

impl ThinkingService {
    /// Create a new service from configuration loaded out of the environment
    pub async fn new() -> ThinkingResult<Self> {
        tracing::info!("Initializing unreasonable thinking service");

        let config = ThinkingConfig::load()?;
        config.validate()?;

        Self::from_config(config).await
    }

    /// Create a service from an explicit configuration
    pub async fn from_config(config: ThinkingConfig) -> ThinkingResult<Self> {
        let store = open_store(&config.storage).await?;

        // Fail at startup rather than on the first request if the stored table is unreadable
        let existing = store.load().await?;
        tracing::info!("Thought table holds {} thoughts", existing.len());

        let generator = match config.generation.seed {
            Some(seed) => {
                tracing::info!("Using fixed generation seed {}", seed);
                ThoughtGenerator::with_seed(seed, config.generation.branch_ids)
            }
            None => ThoughtGenerator::new(config.generation.branch_ids),
        };

        let engine = ThoughtEngine::new(
            store,
            generator,
            InputValidator::new(config.generation.max_problem_length),
            config.search.default_limit,
        );

        tracing::info!("Unreasonable thinking service initialized successfully");
        Ok(Self::with_engine(Arc::new(engine), config))
    }

    pub fn with_engine(engine: Arc<ThoughtEngine<dyn ThoughtStore>>, config: ThinkingConfig) -> Self {
        Self {
            tool_router: Self::tool_router(),
            engine,
            config,
        }
    }

    /// Get reference to the thought engine
    pub fn engine(&self) -> &ThoughtEngine<dyn ThoughtStore> {
        &self.engine
    }
}

fn json_result<T: Serialize>(value: T) -> Result<CallToolResult, ErrorData> {
    let content = Content::json(value)
        .map_err(|e| ErrorData::internal_error(format!("Failed to create JSON content: {}", e), None))?;
    Ok(CallToolResult::success(vec![content]))
}

/// Implementation of MCP tools using rmcp macros
#[tool_router]
impl ThinkingService {
    #[tool(description = "Generate a new unreasonable thought that challenges conventional thinking")]
    pub async fn generate_unreasonable_thought(
        &self,
        params: Parameters<GenerateThoughtParams>,
    ) -> Result<CallToolResult, ErrorData> {
        match self.engine.generate(params.0).await {
            Ok(response) => json_result(response),
            Err(e) => {
                tracing::error!("generate_unreasonable_thought error: {}", e);
                Err(ErrorData::from(e))
            }
        }
    }

    #[tool(description = "Create a new branch of thinking from an existing thought")]
    pub async fn branch_thought(
        &self,
        params: Parameters<BranchThoughtParams>,
    ) -> Result<CallToolResult, ErrorData> {
        match self.engine.branch(params.0).await {
            Ok(response) => json_result(response),
            Err(e) => {
                tracing::error!("branch_thought error: {}", e);
                Err(ErrorData::from(e))
            }
        }
    }

    #[tool(description = "Search thoughts by branch, rebellion flag and assumption-challenge flag. Returns metadata only, most recent first; read a thought's uri or call get_thought for its content. Use branchId \"main\" for thoughts outside any branch.")]
    pub async fn search_thoughts(
        &self,
        params: Parameters<SearchThoughtsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        match self.engine.search(params.0).await {
            Ok(response) => json_result(response),
            Err(e) => {
                tracing::error!("search_thoughts error: {}", e);
                Err(ErrorData::from(e))
            }
        }
    }

    #[tool(description = "List all thoughts in the current thinking session, oldest first. Returns metadata only. Use branchId \"main\" for thoughts outside any branch.")]
    pub async fn list_thoughts(
        &self,
        params: Parameters<ListThoughtsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        match self.engine.list(params.0).await {
            Ok(response) => json_result(response),
            Err(e) => {
                tracing::error!("list_thoughts error: {}", e);
                Err(ErrorData::from(e))
            }
        }
    }

    #[tool(description = "Get the full content of a thought by ID")]
    pub async fn get_thought(
        &self,
        params: Parameters<GetThoughtParams>,
    ) -> Result<CallToolResult, ErrorData> {
        match self.engine.resolve(&params.0.thought_id).await {
            Ok(thought) => json_result(thought),
            Err(e) => {
                tracing::error!("get_thought error: {}", e);
                Err(ErrorData::from(e))
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for ThinkingService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
            },
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            instructions: Some(
                "Unreasonable thinking server: generate contrarian thoughts, branch them, and search by metadata. \
                 Search and list return summaries; full thoughts are available as thought://<id> resources."
                    .into(),
            ),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        let listing = self.engine.list(ListThoughtsParams::default()).await.map_err(|e| {
            tracing::error!("list_resources error: {}", e);
            ErrorData::from(e)
        })?;

        let resources = listing
            .thoughts
            .into_iter()
            .map(|summary| {
                let mut resource = RawResource::new(summary.uri, summary.id);
                resource.mime_type = Some("application/json".to_string());
                resource.no_annotation()
            })
            .collect();

        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        ReadResourceRequestParam { uri }: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        let thought = self.engine.resolve_uri(&uri).await.map_err(|e| {
            tracing::error!("read_resource error for {}: {}", uri, e);
            ErrorData::from(e)
        })?;

        let text = serde_json::to_string_pretty(&thought)
            .map_err(|e| ErrorData::internal_error(format!("Failed to serialize thought: {}", e), None))?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, uri)],
        })
    }
}

//! MCP server implementation using the official rmcp SDK.
//!
//! Every SchoolDigger operation is registered as one read-only tool. Tool
//! failures are returned as tool results with `is_error` set and a JSON body
//! carrying a stable error kind, so a bad call never tears down the session.

use std::sync::Arc;

use rmcp::handler::server::tool::{ToolCallContext, ToolRouter};
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{tool, tool_router, ErrorData as McpError, ServerHandler};
use serde_json::{json, Value};
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

use crate::client::SchoolDiggerClient;
use crate::models::SchoolLevel;
use crate::operations::*;

pub const SCHOOL_LEVELS_URI: &str = "schooldigger://school-levels";

const INSTRUCTIONS: &str = "SchoolDigger exposes US K-12 school and district data. \
     Search schools by state, city, ZIP code or district, list the top ranked schools \
     of a city, and fetch full school or district records by id. States are two-letter \
     codes. Ranks are statewide, 1 is best. Failed calls return {\"error\": {\"kind\", \
     \"message\"}} with kind one of validation_error, transport_error, upstream_error, \
     parse_error or not_found.";

// ============================================================================
// SchoolDigger MCP Server Handler
// ============================================================================

/// SchoolDigger MCP server: one tool per API operation.
#[derive(Clone)]
pub struct SchoolDiggerServer {
    client: Arc<SchoolDiggerClient>,
    tool_router: ToolRouter<Self>,
}

impl SchoolDiggerServer {
    /// The client carries the credentials, so a server cannot be built
    /// without them.
    pub fn new(client: SchoolDiggerClient) -> Self {
        Self {
            client: Arc::new(client),
            tool_router: Self::tool_router(),
        }
    }

    pub fn client(&self) -> &SchoolDiggerClient {
        &self.client
    }

    /// Execute one operation and render the outcome as a tool result.
    async fn run(&self, operation: Operation) -> Result<CallToolResult, McpError> {
        let tool = operation.kind().tool_name();
        let span = info_span!("tool_call", tool, request_id = %Uuid::new_v4());

        let outcome = async {
            debug!("Executing tool call");
            self.client.execute(&operation).await?.into_value()
        }
        .instrument(span)
        .await;

        match outcome {
            Ok(value) => Ok(CallToolResult::success(vec![Content::text(pretty(&value))])),
            Err(err) => {
                warn!(tool, kind = err.kind().as_str(), "Tool call failed: {err}");
                Ok(CallToolResult::error(vec![Content::text(pretty(
                    &err.to_payload(),
                ))]))
            }
        }
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

fn school_levels() -> Value {
    let levels: Vec<Value> = SchoolLevel::ALL
        .iter()
        .map(|level| {
            json!({
                "level": level,
                "filter_value": level.as_query(),
                "description": level.describe(),
            })
        })
        .collect();
    json!({ "levels": levels })
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl SchoolDiggerServer {
    #[tool(
        description = "Search schools in a state, optionally narrowed by city, partial school name and level. Results are paged and sorted by statewide rank unless sort_by is \"name\".",
        annotations(read_only_hint = true, destructive_hint = false)
    )]
    async fn search_schools(
        &self,
        params: Parameters<SearchSchoolsParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run(Operation::SearchSchools(params.0)).await
    }

    #[tool(
        description = "Get the full record of one school by SchoolDigger id: contact details, grades, enrollment, rank history and test scores.",
        annotations(read_only_hint = true, destructive_hint = false)
    )]
    async fn get_school_details(
        &self,
        params: Parameters<SchoolDetailParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run(Operation::SchoolDetail(params.0)).await
    }

    #[tool(
        description = "List schools in a five-digit ZIP code, optionally filtered by level.",
        annotations(read_only_hint = true, destructive_hint = false)
    )]
    async fn search_schools_by_zip(
        &self,
        params: Parameters<SearchByZipParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run(Operation::SearchByZip(params.0)).await
    }

    #[tool(
        description = "The best ranked schools of a city, best first. Schools without a current statewide rank are left out.",
        annotations(read_only_hint = true, destructive_hint = false)
    )]
    async fn top_ranked_schools(
        &self,
        params: Parameters<TopRankedParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run(Operation::TopRankedByCity(params.0)).await
    }

    #[tool(
        description = "Search school districts in a state by partial name, city or ZIP code.",
        annotations(read_only_hint = true, destructive_hint = false)
    )]
    async fn search_districts(
        &self,
        params: Parameters<SearchDistrictsParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run(Operation::SearchDistricts(params.0)).await
    }

    #[tool(
        description = "List the schools of one district, sorted by statewide rank.",
        annotations(read_only_hint = true, destructive_hint = false)
    )]
    async fn schools_in_district(
        &self,
        params: Parameters<SchoolsInDistrictParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run(Operation::SchoolsInDistrict(params.0)).await
    }

    #[tool(
        description = "Suggest schools whose name starts with the given text. Useful for finding a school id before calling get_school_details.",
        annotations(read_only_hint = true, destructive_hint = false)
    )]
    async fn autocomplete_schools(
        &self,
        params: Parameters<AutocompleteParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run(Operation::AutocompleteSchools(params.0)).await
    }

    #[tool(
        description = "Get the full record of one school district by SchoolDigger id: address, enrollment, school counts per level and rank history.",
        annotations(read_only_hint = true, destructive_hint = false)
    )]
    async fn get_district_details(
        &self,
        params: Parameters<DistrictDetailParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run(Operation::DistrictDetail(params.0)).await
    }
}

// ============================================================================
// ServerHandler Implementation
// ============================================================================

impl ServerHandler for SchoolDiggerServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "schooldigger".into(),
                version: crate::VERSION.into(),
                title: Some("SchoolDigger MCP Server".into()),
                icons: None,
                website_url: Some("https://www.schooldigger.com".into()),
            },
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            instructions: Some(INSTRUCTIONS.into()),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let tools = self.tool_router.list_all();
        std::future::ready(Ok(ListToolsResult {
            tools,
            ..Default::default()
        }))
    }

    #[allow(clippy::manual_async_fn)]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            let tool_context = ToolCallContext::new(self, request, context);
            self.tool_router.call(tool_context).await
        }
    }

    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        use rmcp::model::{Annotated, RawResource};

        std::future::ready(Ok(ListResourcesResult {
            resources: vec![Annotated {
                raw: RawResource {
                    uri: SCHOOL_LEVELS_URI.into(),
                    name: "School Levels".into(),
                    title: None,
                    description: Some(
                        "Values accepted by the level parameter and the grades each covers"
                            .into(),
                    ),
                    mime_type: Some("application/json".into()),
                    size: None,
                    icons: None,
                    meta: None,
                },
                annotations: None,
            }],
            ..Default::default()
        }))
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        let uri = request.uri.as_str();
        let result = if uri == SCHOOL_LEVELS_URI {
            Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(pretty(&school_levels()), uri)],
            })
        } else {
            Err(McpError::invalid_params(
                format!("Unknown resource URI: {}", uri),
                None,
            ))
        };
        std::future::ready(result)
    }
}

// ============================================================================
// Tests
// ============================================================================

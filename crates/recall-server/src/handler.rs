//! rmcp [`ServerHandler`] for the graph tools.
//!
//! The protocol itself (handshake, ping, JSON-RPC framing) is rmcp's. This
//! handler supplies the server info, negotiates the protocol revision, and
//! hands `tools/list` and `tools/call` to the [`Dispatcher`].

use std::future::Future;

use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, InitializeRequestParam,
    InitializeResult, ListToolsResult, PaginatedRequestParam, ProtocolVersion, ServerCapabilities,
    ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler};
use serde_json::Value;

use recall_store::{GraphStore, JsonlGraphStore};

use crate::dispatch::Dispatcher;
use crate::tools::{self, ToolDescriptor};

pub const SERVER_NAME: &str = "recall";

/// Protocol revisions this server speaks, newest first.
pub const SUPPORTED_PROTOCOL_VERSIONS: [ProtocolVersion; 2] =
    [ProtocolVersion::V_2025_03_26, ProtocolVersion::V_2024_11_05];

/// Answer with the client's revision when supported, otherwise our newest.
pub fn negotiate_protocol(requested: &ProtocolVersion) -> ProtocolVersion {
    if SUPPORTED_PROTOCOL_VERSIONS.contains(requested) {
        requested.clone()
    } else {
        SUPPORTED_PROTOCOL_VERSIONS[0].clone()
    }
}

pub struct RecallHandler<S = JsonlGraphStore> {
    dispatcher: Dispatcher<S>,
}

impl<S> Clone for RecallHandler<S> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<S: GraphStore> RecallHandler<S> {
    pub fn new(dispatcher: Dispatcher<S>) -> Self {
        Self { dispatcher }
    }
}

impl<S: GraphStore + 'static> ServerHandler for RecallHandler<S> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: SUPPORTED_PROTOCOL_VERSIONS[0].clone(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                website_url: None,
                icons: None,
            },
            instructions: None,
        }
    }

    fn initialize(
        &self,
        request: InitializeRequestParam,
        context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<InitializeResult, ErrorData>> + Send + '_ {
        let mut info = self.get_info();
        info.protocol_version = negotiate_protocol(&request.protocol_version);
        tracing::info!(
            requested = ?request.protocol_version,
            agreed = ?info.protocol_version,
            "Client initialized"
        );

        if context.peer.peer_info().is_none() {
            context.peer.set_peer_info(request);
        }
        std::future::ready(Ok(info))
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, ErrorData>> + Send + '_ {
        let tools = tools::catalog()
            .into_iter()
            .map(ToolDescriptor::into_tool)
            .collect();
        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, ErrorData>> + Send + '_ {
        async move {
            let arguments = request.arguments.map(Value::Object);
            match self.dispatcher.call(&request.name, arguments).await {
                Ok(output) => Ok(CallToolResult::success(vec![Content::text(output.text)])),
                Err(e) => {
                    tracing::warn!(tool = %request.name, error = %e, "Tool call failed");
                    Err(e.into())
                }
            }
        }
    }
}

//! Stdio front end for the rmcp session.
//!
//! rmcp ends its session on a line it cannot decode, so every input line is
//! screened before it reaches the session. Lines that are not UTF-8, not
//! JSON, or not a well-formed MCP message are answered here with a JSON-RPC
//! error and the loop moves on. Accepted lines are relayed one request at a
//! time: the next line is only forwarded once the previous reply is out,
//! which keeps replies in arrival order.

use rmcp::model::{ClientJsonRpcMessage, ErrorCode};
use rmcp::{RmcpError, ServiceExt};
use serde_json::{json, Value};
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, DuplexStream, Lines,
};

use recall_store::{GraphStore, JsonlGraphStore};

use crate::dispatch::Dispatcher;
use crate::handler::RecallHandler;

/// Buffer size of each in-process pipe between the relay and the session.
const PIPE_CAPACITY: usize = 64 * 1024;

/// Methods this server answers; a malformed call to one of these is a
/// params problem rather than an unknown method.
const SERVED_METHODS: &[&str] = &["initialize", "ping", "tools/list", "tools/call"];

/// What to do with one raw input line.
#[derive(Debug, PartialEq)]
enum Screened {
    Blank,
    /// Pass to the session; `expects_reply` for requests.
    Forward { expects_reply: bool },
    /// Answer directly with this error response.
    Reject(Value),
    /// Malformed notification: nobody to answer.
    Discard(String),
}

fn error_response(id: Value, code: ErrorCode, message: impl Into<String>) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code.0, "message": message.into() },
    })
}

fn screen(raw: &[u8]) -> Screened {
    let Ok(text) = std::str::from_utf8(raw) else {
        return Screened::Reject(error_response(
            Value::Null,
            ErrorCode::PARSE_ERROR,
            "Parse error: message is not valid UTF-8",
        ));
    };
    let text = text.trim();
    if text.is_empty() {
        return Screened::Blank;
    }

    let value: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            return Screened::Reject(error_response(
                Value::Null,
                ErrorCode::PARSE_ERROR,
                format!("Parse error: {e}"),
            ))
        }
    };

    let method = value.get("method").and_then(Value::as_str);
    let Some(id) = value.get("id") else {
        return match serde_json::from_value::<ClientJsonRpcMessage>(value.clone()) {
            Ok(_) => Screened::Forward {
                expects_reply: false,
            },
            Err(e) => Screened::Discard(e.to_string()),
        };
    };

    // MCP ids are strings or integers; a null id is still a request and
    // gets an answer.
    if id.is_null() {
        return Screened::Reject(error_response(
            Value::Null,
            ErrorCode::INVALID_REQUEST,
            "Invalid request: id must be a string or an integer",
        ));
    }

    match serde_json::from_value::<ClientJsonRpcMessage>(value.clone()) {
        Ok(_) => Screened::Forward {
            expects_reply: method.is_some(),
        },
        Err(e) => {
            let (code, message) = match method {
                None => (ErrorCode::INVALID_REQUEST, format!("Invalid request: {e}")),
                Some(m) if SERVED_METHODS.contains(&m) => {
                    (ErrorCode::INVALID_PARAMS, format!("Invalid params for {m}: {e}"))
                }
                Some(m) => (ErrorCode::METHOD_NOT_FOUND, format!("Unknown method: {m}")),
            };
            Screened::Reject(error_response(id.clone(), code, message))
        }
    }
}

fn is_reply(line: &str) -> bool {
    serde_json::from_str::<Value>(line).is_ok_and(|v| {
        v.get("id").is_some() && (v.get("result").is_some() || v.get("error").is_some())
    })
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &[u8]) -> std::io::Result<()> {
    writer.write_all(line).await?;
    if line.last() != Some(&b'\n') {
        writer.write_all(b"\n").await?;
    }
    writer.flush().await
}

/// Copy session output to `writer` until a reply goes by. Returns `false`
/// once the session has closed.
async fn relay_until_reply<W: AsyncWrite + Unpin>(
    replies: &mut Lines<BufReader<DuplexStream>>,
    writer: &mut W,
) -> std::io::Result<bool> {
    while let Some(line) = replies.next_line().await? {
        write_line(writer, line.as_bytes()).await?;
        if is_reply(&line) {
            return Ok(true);
        }
    }
    Ok(false)
}

async fn run_session<S: GraphStore + 'static>(
    handler: RecallHandler<S>,
    input: DuplexStream,
    output: DuplexStream,
) -> Result<(), RmcpError> {
    let service = handler.serve((input, output)).await?;
    let reason = service.waiting().await?;
    tracing::debug!(?reason, "MCP session finished");
    Ok(())
}

/// MCP server exposing the graph tools of a [`Dispatcher`].
pub struct McpServer<S = JsonlGraphStore> {
    dispatcher: Dispatcher<S>,
}

impl<S: GraphStore + 'static> McpServer<S> {
    pub fn new(dispatcher: Dispatcher<S>) -> Self {
        Self { dispatcher }
    }

    /// Serve on the process's stdin/stdout until stdin closes.
    pub async fn serve_stdio(&self) -> std::io::Result<()> {
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve on an arbitrary reader/writer pair until the reader hits EOF or
    /// the session closes.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let (mut to_session, session_input) = tokio::io::duplex(PIPE_CAPACITY);
        let (session_output, from_session) = tokio::io::duplex(PIPE_CAPACITY);
        let handler = RecallHandler::new(self.dispatcher.clone());
        let session = tokio::spawn(run_session(handler, session_input, session_output));
        let mut replies = BufReader::new(from_session).lines();

        let mut line = Vec::new();
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line).await? == 0 {
                break;
            }

            match screen(&line) {
                Screened::Blank => {}
                Screened::Reject(response) => {
                    let reason = &response["error"]["message"];
                    tracing::warn!(error = %reason, "Rejected message");
                    write_line(&mut writer, response.to_string().as_bytes()).await?;
                }
                Screened::Discard(reason) => {
                    tracing::warn!(%reason, "Discarded malformed notification");
                }
                Screened::Forward { expects_reply } => {
                    if let Err(e) = write_line(&mut to_session, &line).await {
                        tracing::warn!(error = %e, "MCP session closed");
                        break;
                    }
                    if expects_reply && !relay_until_reply(&mut replies, &mut writer).await? {
                        tracing::warn!("MCP session closed");
                        break;
                    }
                }
            }
        }

        drop(to_session);
        while let Some(rest) = replies.next_line().await? {
            write_line(&mut writer, rest.as_bytes()).await?;
        }
        match session.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "MCP session ended with error"),
            Err(e) => tracing::warn!(error = %e, "MCP session task failed"),
        }

        tracing::info!("Input closed, shutting down");
        Ok(())
    }
}

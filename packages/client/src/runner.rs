//! Client lifecycle: connect, run the send and receive paths, shut down.

use std::{future::Future, sync::Arc, time::Duration};

use chitchat_server::domain::{ClientId, LogicalClock};
use futures_util::{SinkExt, StreamExt};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

use crate::{
    error::ClientError,
    input::{self, InputEvent},
    receiver::receive_loop,
    sender::MessageSender,
    transport::{Endpoints, HttpTransport},
};

/// Server address used when none is given
pub const DEFAULT_SERVER_ADDR: &str = "localhost:50051";

/// How long shutdown waits for the receive loop after closing the stream
const RECEIVE_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

const PROMPT: &str = "> ";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub client_id: ClientId,
    /// `host:port` of the server
    pub server_addr: String,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Signal,
    Interrupted,
    InputClosed,
    InputFailed,
    StreamClosed,
}

/// A participant whose StreamMessages connection is open
pub struct Session {
    client_id: ClientId,
    server_addr: String,
    endpoints: Endpoints,
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl Session {
    /// Open the inbound stream. Failure here is fatal for the client.
    pub async fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        let ClientConfig {
            client_id,
            server_addr,
        } = config;
        let endpoints = Endpoints::new(&server_addr, &client_id)?;

        let (stream, _) = connect_async(endpoints.stream.as_str())
            .await
            .map_err(|source| ClientError::Connect {
                url: endpoints.stream.to_string(),
                source,
            })?;

        Ok(Self {
            client_id,
            server_addr,
            endpoints,
            stream,
        })
    }

    /// Drive the session until `shutdown` resolves, input ends or the server
    /// closes the stream.
    ///
    /// On the way out the inbound stream is closed first, then the receive
    /// loop is awaited. Errors after connecting are reported through `output`
    /// and the log, never returned.
    pub async fn run<S, O>(
        self,
        mut input: mpsc::UnboundedReceiver<InputEvent>,
        shutdown: S,
        mut output: O,
    ) -> ExitReason
    where
        S: Future<Output = ()>,
        O: FnMut(String) + Clone + Send + 'static,
    {
        let Self {
            client_id,
            server_addr,
            endpoints,
            stream,
        } = self;
        let (mut ws_sink, ws_reader) = stream.split();

        let clock = Arc::new(LogicalClock::new());
        tracing::info!(
            component = "Client",
            event = "Start",
            client_id = %client_id,
            lamport = clock.value().value(),
            "connected to {}",
            server_addr
        );
        output(format!("Connected to {} as {}", server_addr, client_id));
        output("Type your message and press Enter. Ctrl+C to exit.".to_string());

        let mut receive_task = tokio::spawn(receive_loop(
            client_id.clone(),
            clock.clone(),
            ws_reader,
            output.clone(),
        ));

        let sender = MessageSender::new(
            client_id.clone(),
            clock.clone(),
            HttpTransport::new(endpoints.messages),
        );
        tokio::pin!(shutdown);

        let mut receive_finished = false;
        let reason = loop {
            tokio::select! {
                _ = &mut shutdown => break ExitReason::Signal,
                event = input.recv() => match event {
                    Some(InputEvent::Line(line)) => {
                        if let Some(feedback) = sender.submit(&line).await.feedback() {
                            output(feedback);
                        }
                    }
                    Some(InputEvent::Interrupted) => break ExitReason::Interrupted,
                    Some(InputEvent::Eof) | None => break ExitReason::InputClosed,
                    Some(InputEvent::Failed(e)) => {
                        tracing::error!("Input error: {}", e);
                        output(format!("Input error: {e}"));
                        break ExitReason::InputFailed;
                    }
                },
                _ = &mut receive_task => {
                    receive_finished = true;
                    output("Connection to server closed.".to_string());
                    break ExitReason::StreamClosed;
                }
            }
        };

        // Close the inbound stream and wait for the receive loop to drain
        if let Err(e) = ws_sink.send(Message::Close(None)).await {
            tracing::debug!("Close frame not sent: {}", e);
        }
        if !receive_finished {
            match tokio::time::timeout(RECEIVE_DRAIN_TIMEOUT, &mut receive_task).await {
                Ok(Ok(received)) => {
                    tracing::debug!("Receive loop rendered {} messages", received)
                }
                Ok(Err(e)) => tracing::error!("Receive task failed: {}", e),
                Err(_) => {
                    tracing::warn!("Receive loop did not finish in time; aborting");
                    receive_task.abort();
                }
            }
        }

        tracing::info!(
            component = "Client",
            event = "Shutdown",
            client_id = %client_id,
            lamport = clock.value().value(),
            "client exiting ({:?})",
            reason
        );
        reason
    }
}

/// Run an interactive session on the terminal until interrupt, end of input
/// or server close.
///
/// Only a failed initial connection is an error.
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let session = Session::connect(config).await?;
    let (input, console) = input::spawn_reader(PROMPT).await;

    session
        .run(
            input,
            chitchat_shared::signal::shutdown_signal(),
            move |line| console.print(line),
        )
        .await;
    Ok(())
}

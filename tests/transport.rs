//! End-to-end transport tests.
//!
//! Bind real listeners on ephemeral ports and talk to them over raw TCP
//! lines and WebSocket frames.

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use chat_relay::transport::{accept_loop, tcp::handle_tcp, ws::handle_websocket};
use chat_relay::{ChatServer, ServerCommand, TransportProfile};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Both listeners, sharing one ChatServer actor.
struct TestServer {
    tcp_addr: SocketAddr,
    ws_addr: SocketAddr,
}

async fn start_server() -> TestServer {
    let (cmd_tx, cmd_rx) = mpsc::channel::<ServerCommand>(256);
    tokio::spawn(ChatServer::new(cmd_rx).run());

    let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let ws = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let server = TestServer {
        tcp_addr: tcp.local_addr().unwrap(),
        ws_addr: ws.local_addr().unwrap(),
    };

    tokio::spawn(accept_loop(
        tcp,
        cmd_tx.clone(),
        TransportProfile::line_stream(),
        handle_tcp,
    ));
    tokio::spawn(accept_loop(
        ws,
        cmd_tx,
        TransportProfile::message_framed(),
        handle_websocket,
    ));

    server
}

struct LineClient {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl LineClient {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read, writer) = stream.into_split();
        let mut client = Self {
            lines: BufReader::new(read).lines(),
            writer,
        };
        assert_eq!(
            client.recv().await.as_deref(),
            Some("Welcome! Please enter your username")
        );
        client
    }

    async fn join(addr: SocketAddr, name: &str) -> Self {
        let mut client = Self::connect(addr).await;
        client.say(name).await;
        assert_eq!(
            client.recv().await,
            Some(format!("Welcome {name}! You can now chat"))
        );
        client
    }

    async fn say(&mut self, text: &str) {
        self.writer
            .write_all(format!("{text}\n").as_bytes())
            .await
            .unwrap();
    }

    /// Next line, or None once the server closed the connection.
    async fn recv(&mut self) -> Option<String> {
        timeout(RECV_TIMEOUT, self.lines.next_line())
            .await
            .expect("timed out waiting for line")
            .unwrap_or(None)
    }
}

struct WsClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    async fn join(addr: SocketAddr, name: &str) -> Self {
        let (ws, _) = connect_async(format!("ws://{addr}")).await.unwrap();
        let mut client = Self { ws };
        assert_eq!(
            client.recv().await,
            "Welcome! Please set your username with /name yourname"
        );

        client.say(&format!("/name {name}")).await;
        assert_eq!(
            client.recv().await,
            format!("Welcome {name}! You can now chat")
        );
        client
    }

    async fn say(&mut self, text: &str) {
        self.ws.send(Message::Text(text.into())).await.unwrap();
    }

    async fn recv(&mut self) -> String {
        loop {
            let frame = timeout(RECV_TIMEOUT, self.ws.next())
                .await
                .expect("timed out waiting for frame")
                .expect("connection closed")
                .unwrap();
            if let Message::Text(text) = frame {
                return text.to_string();
            }
        }
    }
}

#[tokio::test]
async fn test_tcp_chat_session() {
    let server = start_server().await;

    let mut alice = LineClient::join(server.tcp_addr, "alice").await;
    let mut bob = LineClient::join(server.tcp_addr, "bob").await;
    assert_eq!(alice.recv().await.as_deref(), Some("bob joined the chat"));

    alice.say("hello everyone").await;
    assert_eq!(bob.recv().await.as_deref(), Some("alice: hello everyone"));

    bob.say("/pm alice hi").await;
    assert_eq!(
        alice.recv().await.as_deref(),
        Some("[PRIVATE] bob -> you: hi")
    );

    drop(alice);
    assert_eq!(bob.recv().await.as_deref(), Some("alice left the chat"));

    bob.say("/users").await;
    assert_eq!(bob.recv().await.as_deref(), Some("ONLINE USERS: bob"));
}

#[tokio::test]
async fn test_tcp_name_conflict_closes_connection() {
    let server = start_server().await;

    let mut alice = LineClient::join(server.tcp_addr, "alice").await;

    let mut imposter = LineClient::connect(server.tcp_addr).await;
    imposter.say("alice").await;
    assert_eq!(
        imposter.recv().await.as_deref(),
        Some("SERVER: Username 'alice' is already taken.")
    );
    assert_eq!(imposter.recv().await, None);

    // The rejected connection never joined, so no leave notice follows
    alice.say("/users").await;
    assert_eq!(alice.recv().await.as_deref(), Some("ONLINE USERS: alice"));
}

#[tokio::test]
async fn test_websocket_name_retry() {
    let server = start_server().await;

    let _alice = WsClient::join(server.ws_addr, "alice").await;

    let (ws, _) = connect_async(format!("ws://{}", server.ws_addr))
        .await
        .unwrap();
    let mut other = WsClient { ws };
    other.recv().await;

    other.say("hi all").await;
    assert_eq!(
        other.recv().await,
        "SERVER: Set your username first with /name yourname"
    );

    other.say("/name alice").await;
    assert_eq!(
        other.recv().await,
        "SERVER: Username 'alice' is already taken."
    );

    other.say("/name bob").await;
    assert_eq!(other.recv().await, "Welcome bob! You can now chat");
}

#[tokio::test]
async fn test_transports_share_registry() {
    let server = start_server().await;

    let mut line_user = LineClient::join(server.tcp_addr, "terminal").await;
    let mut ws_user = WsClient::join(server.ws_addr, "browser").await;
    assert_eq!(
        line_user.recv().await.as_deref(),
        Some("browser joined the chat")
    );

    ws_user.say("hello from the web").await;
    assert_eq!(
        line_user.recv().await.as_deref(),
        Some("browser: hello from the web")
    );

    line_user.say("/pm browser hello from the shell").await;
    assert_eq!(
        ws_user.recv().await,
        "[PRIVATE] terminal -> you: hello from the shell"
    );

    ws_user.ws.close(None).await.unwrap();
    assert_eq!(
        line_user.recv().await.as_deref(),
        Some("browser left the chat")
    );
}

#[tokio::test]
async fn test_multiline_frame_relayed_line_by_line() {
    let server = start_server().await;

    let mut bob = LineClient::join(server.tcp_addr, "bob").await;
    let mut mallory = WsClient::join(server.ws_addr, "mallory").await;
    assert_eq!(bob.recv().await.as_deref(), Some("mallory joined the chat"));

    mallory
        .say("hi\nalice left the chat\r\nSERVER: admin says reset your password")
        .await;

    assert_eq!(bob.recv().await.as_deref(), Some("mallory: hi"));
    assert_eq!(
        bob.recv().await.as_deref(),
        Some("mallory: alice left the chat")
    );
    assert_eq!(
        bob.recv().await.as_deref(),
        Some("mallory: SERVER: admin says reset your password")
    );

    bob.say("/users").await;
    assert_eq!(bob.recv().await.as_deref(), Some("ONLINE USERS: bob, mallory"));
}

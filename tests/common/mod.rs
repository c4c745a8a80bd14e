// File: common/mod.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

#![allow(dead_code)]

use splitprobe::config::ProbeConfig;
use splitprobe::target::ProbeTarget;
use splitprobe::transport::Connector;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadBuf};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub const OK_RESPONSE: &[u8] =
    b"HTTP/1.1 200 OK\r\nServer: test\r\nContent-Length: 5\r\nConnection: keep-alive\r\n\r\nhello";
pub const BAD_REQUEST_RESPONSE: &[u8] =
    b"HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\n\r\n";

fn head_complete(received: &[u8]) -> bool {
    received.windows(4).any(|w| w == b"\r\n\r\n")
}

// ---------------------------------------------------------------------------
// Fake transport

#[derive(Debug, Clone)]
pub enum ConnectBehavior {
    Accept,
    Refuse,
    Hang,
}

#[derive(Debug, Clone)]
pub enum ReadBehavior {
    /// Return these bytes on the first read.
    Respond(Vec<u8>),
    /// 200 if everything written so far forms a complete head, else 400.
    Reassemble,
    /// 200 only if the first write alone was a complete head, else 400.
    FirstWriteOnly,
    /// Zero-byte read.
    Eof,
    Error(io::ErrorKind),
    Hang,
}

#[derive(Debug, Clone)]
pub enum WriteBehavior {
    Accept,
    /// Accept this many writes, then fail with the given kind.
    FailAfter(usize, io::ErrorKind),
}

#[derive(Debug, Default)]
pub struct FakeLog {
    pub writes: Mutex<Vec<Vec<u8>>>,
    pub connects: AtomicUsize,
    pub shutdowns: AtomicUsize,
    pub drops: AtomicUsize,
    pub reads: AtomicUsize,
}

impl FakeLog {
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.lock().unwrap().clone()
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn shutdowns(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }

    pub fn drops(&self) -> usize {
        self.drops.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct FakeConnector {
    connect: ConnectBehavior,
    read: ReadBehavior,
    write: WriteBehavior,
    pub log: Arc<FakeLog>,
}

impl FakeConnector {
    pub fn new(read: ReadBehavior) -> Self {
        FakeConnector {
            connect: ConnectBehavior::Accept,
            read,
            write: WriteBehavior::Accept,
            log: Arc::new(FakeLog::default()),
        }
    }

    pub fn with_connect(mut self, connect: ConnectBehavior) -> Self {
        self.connect = connect;
        self
    }

    pub fn with_write(mut self, write: WriteBehavior) -> Self {
        self.write = write;
        self
    }
}

impl Connector for FakeConnector {
    type Stream = FakeStream;

    fn connect(
        &self,
        _target: &ProbeTarget,
    ) -> impl Future<Output = io::Result<Self::Stream>> + Send {
        let connector = self.clone();
        async move {
            connector.log.connects.fetch_add(1, Ordering::SeqCst);
            match connector.connect {
                ConnectBehavior::Accept => Ok(FakeStream {
                    read: connector.read,
                    write: connector.write,
                    written: Vec::new(),
                    log: connector.log,
                }),
                ConnectBehavior::Refuse => Err(io::Error::from(io::ErrorKind::ConnectionRefused)),
                ConnectBehavior::Hang => std::future::pending().await,
            }
        }
    }
}

/// Records every write as its own chunk and counts releases.
#[derive(Debug)]
pub struct FakeStream {
    read: ReadBehavior,
    write: WriteBehavior,
    written: Vec<Vec<u8>>,
    log: Arc<FakeLog>,
}

impl FakeStream {
    fn answer(&self) -> Option<Vec<u8>> {
        let writes = &self.written;
        match &self.read {
            ReadBehavior::Respond(bytes) => Some(bytes.clone()),
            ReadBehavior::Reassemble => Some(if head_complete(&writes.concat()) {
                OK_RESPONSE.to_vec()
            } else {
                BAD_REQUEST_RESPONSE.to_vec()
            }),
            ReadBehavior::FirstWriteOnly => {
                let first = writes.first().cloned().unwrap_or_default();
                Some(if head_complete(&first) {
                    OK_RESPONSE.to_vec()
                } else {
                    BAD_REQUEST_RESPONSE.to_vec()
                })
            }
            ReadBehavior::Eof => Some(Vec::new()),
            ReadBehavior::Error(_) | ReadBehavior::Hang => None,
        }
    }
}

impl AsyncRead for FakeStream {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match &self.read {
            ReadBehavior::Hang => return Poll::Pending,
            ReadBehavior::Error(kind) => {
                self.log.reads.fetch_add(1, Ordering::SeqCst);
                return Poll::Ready(Err(io::Error::from(*kind)));
            }
            _ => {}
        }
        self.log.reads.fetch_add(1, Ordering::SeqCst);
        let answer = self.answer().unwrap_or_default();
        let n = answer.len().min(buf.remaining());
        buf.put_slice(&answer[..n]);
        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for FakeStream {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        if let WriteBehavior::FailAfter(limit, kind) = &this.write {
            if this.written.len() >= *limit {
                return Poll::Ready(Err(io::Error::from(*kind)));
            }
        }
        this.written.push(buf.to_vec());
        this.log.writes.lock().unwrap().push(buf.to_vec());
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.log.shutdowns.fetch_add(1, Ordering::SeqCst);
        Poll::Ready(Ok(()))
    }
}

impl Drop for FakeStream {
    fn drop(&mut self) {
        self.log.drops.fetch_add(1, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Real sockets

#[derive(Debug, Clone, Copy)]
pub enum ServerMode {
    /// Buffers until the head is complete, then answers with the response.
    Buffering(&'static [u8]),
    /// Treats the first read as the whole request.
    Naive,
    /// Reads but never answers.
    Silent,
    /// Reads the full head, then closes without answering.
    CloseAfterRequest,
}

/// In-process HTTP-ish server. Records how many reads each connection
/// needed to see its request.
pub struct TestServer {
    pub port: u16,
    pub reads: Arc<Mutex<Vec<usize>>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn(mode: ServerMode) -> TestServer {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let reads = Arc::new(Mutex::new(Vec::new()));
        let reads_clone = Arc::clone(&reads);

        let handle = tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    return;
                };
                let reads = Arc::clone(&reads_clone);
                tokio::spawn(async move {
                    let count = serve(socket, mode).await;
                    reads.lock().unwrap().push(count);
                });
            }
        });

        TestServer {
            port,
            reads,
            handle,
        }
    }

    pub fn target(&self) -> ProbeTarget {
        ProbeTarget::new("127.0.0.1", self.port).unwrap()
    }

    /// Waits until `connections` connections have finished.
    pub async fn wait_for_reads(&self, connections: usize) -> Vec<usize> {
        for _ in 0..200 {
            {
                let reads = self.reads.lock().unwrap();
                if reads.len() >= connections {
                    return reads.clone();
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.reads.lock().unwrap().clone()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve(mut socket: TcpStream, mode: ServerMode) -> usize {
    let mut received = Vec::new();
    let mut reads = 0;
    let mut buf = [0u8; 1024];

    match mode {
        ServerMode::Buffering(response) => {
            while !head_complete(&received) {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => return reads,
                    Ok(n) => {
                        reads += 1;
                        received.extend_from_slice(&buf[..n]);
                    }
                }
            }
            let _ = socket.write_all(response).await;
        }
        ServerMode::Naive => {
            if let Ok(n) = socket.read(&mut buf).await {
                reads += 1;
                let response = if head_complete(&buf[..n]) {
                    OK_RESPONSE
                } else {
                    BAD_REQUEST_RESPONSE
                };
                let _ = socket.write_all(response).await;
            }
        }
        ServerMode::Silent => {}
        ServerMode::CloseAfterRequest => {
            while !head_complete(&received) {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => return reads,
                    Ok(n) => {
                        reads += 1;
                        received.extend_from_slice(&buf[..n]);
                    }
                }
            }
            return reads;
        }
    }

    // Keep the connection open until the client lets go.
    loop {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return reads,
            Ok(_) => {}
        }
    }
}

/// A port nothing listens on.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

pub fn config_for(target: ProbeTarget) -> ProbeConfig {
    let mut config = ProbeConfig::new();
    config.set_target(target);
    config.set_delay(Duration::from_millis(20));
    config.set_timeout(Duration::from_secs(2));
    config
}

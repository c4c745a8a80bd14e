// File: transport.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::target::ProbeTarget;
use log::{debug, trace};
use std::future::Future;
use std::io;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// Opens the byte stream a probe talks over. The probe owns the returned
/// stream and drops it before it returns.
pub trait Connector {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    fn connect(&self, target: &ProbeTarget)
        -> impl Future<Output = io::Result<Self::Stream>> + Send;
}

/// Plain TCP. Nagle is disabled so every fragment leaves as its own segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl Connector for TcpConnector {
    type Stream = TcpStream;

    fn connect(
        &self,
        target: &ProbeTarget,
    ) -> impl Future<Output = io::Result<Self::Stream>> + Send {
        let addr = target.connect_addr();
        async move {
            trace!("Connecting to {}", addr);
            let stream = TcpStream::connect(&addr).await?;
            stream.set_nodelay(true)?;
            debug!(
                "Connected to {} from {}",
                addr,
                stream
                    .local_addr()
                    .map(|a| a.to_string())
                    .unwrap_or_else(|_| "unknown".to_string())
            );
            Ok(stream)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_tcp_connector_connects_with_nodelay() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let accept = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1];
            socket.read(&mut buf).await.unwrap()
        });

        let target = ProbeTarget::new("127.0.0.1", port).unwrap();
        let stream = TcpConnector.connect(&target).await.unwrap();
        assert!(stream.nodelay().unwrap());
        drop(stream);

        assert_eq!(accept.await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_tcp_connector_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let target = ProbeTarget::new("127.0.0.1", port).unwrap();
        let err = TcpConnector.connect(&target).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionRefused);
    }
}

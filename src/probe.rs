// File: probe.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::config::ProbeConfig;
use crate::fragment::FragmentSequence;
use crate::outcome::{ProbeResult, ProbeStage};
use crate::transport::{Connector, TcpConnector};
use log::{debug, info, trace, warn};
use std::io;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Sends one request as delayed fragments over a fresh connection and
/// classifies whatever a single read returns.
#[derive(Debug, Clone)]
pub struct FragmentationProbe<C = TcpConnector> {
    connector: C,
    config: ProbeConfig,
}

impl FragmentationProbe<TcpConnector> {
    pub fn new(config: ProbeConfig) -> Self {
        Self::with_connector(TcpConnector, config)
    }
}

impl<C: Connector> FragmentationProbe<C> {
    pub fn with_connector(connector: C, config: ProbeConfig) -> Self {
        Self { connector, config }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// One round trip with `fragments`. Every transport failure is folded
    /// into the result; the connection is released before returning.
    pub async fn run(&self, fragments: &FragmentSequence) -> ProbeResult {
        self.run_with_delay(fragments, self.config.delay()).await
    }

    /// The same request sent in one piece without delays.
    pub async fn run_baseline(&self, fragments: &FragmentSequence) -> ProbeResult {
        debug!("Running unfragmented baseline against {}", self.config.target());
        self.run_with_delay(&fragments.as_whole(), Duration::ZERO).await
    }

    async fn run_with_delay(&self, fragments: &FragmentSequence, delay: Duration) -> ProbeResult {
        let target = self.config.target();
        let timeout = self.config.timeout();

        info!(
            "Probing {} with {} fragment(s), {} bytes total",
            target,
            fragments.len(),
            fragments.total_len()
        );

        let mut stream = match tokio::time::timeout(timeout, self.connector.connect(target)).await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                warn!("Connection to {} failed: {}", target, e);
                return ProbeResult::from_io_error(ProbeStage::Connect, &e);
            }
            Err(_) => {
                warn!("Connection to {} timed out after {:?}", target, timeout);
                return ProbeResult::timed_out(ProbeStage::Connect);
            }
        };

        let result = self.exchange(&mut stream, fragments, delay).await;

        if let Err(e) = stream.shutdown().await {
            trace!("Shutdown of connection to {} failed: {}", target, e);
        }
        drop(stream);

        info!("Probe of {} finished: {}", target, result.kind());
        result
    }

    async fn exchange<S>(
        &self,
        stream: &mut S,
        fragments: &FragmentSequence,
        delay: Duration,
    ) -> ProbeResult
    where
        S: AsyncRead + AsyncWrite + Unpin + Send,
    {
        let timeout = self.config.timeout();

        for (index, fragment) in fragments.iter().enumerate() {
            match tokio::time::timeout(timeout, send_fragment(stream, fragment)).await {
                Ok(Ok(())) => {
                    debug!(
                        "Sent fragment {}/{} ({} bytes): {}",
                        index + 1,
                        fragments.len(),
                        fragment.len(),
                        fragment.escape_ascii()
                    );
                }
                Ok(Err(e)) => {
                    warn!("Sending fragment {} failed: {}", index + 1, e);
                    return ProbeResult::from_io_error(ProbeStage::Send, &e);
                }
                Err(_) => {
                    warn!("Sending fragment {} timed out after {:?}", index + 1, timeout);
                    return ProbeResult::timed_out(ProbeStage::Send);
                }
            }

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        let mut buffer = vec![0u8; self.config.read_capacity()];
        match tokio::time::timeout(timeout, stream.read(&mut buffer)).await {
            Ok(Ok(n)) => {
                buffer.truncate(n);
                debug!("Received {} bytes", n);
                self.classify(buffer)
            }
            Ok(Err(e)) => {
                warn!("Reading the response failed: {}", e);
                ProbeResult::from_io_error(ProbeStage::Receive, &e)
            }
            Err(_) => {
                warn!("No response within {:?}", timeout);
                ProbeResult::timed_out(ProbeStage::Receive)
            }
        }
    }

    fn classify(&self, response: Vec<u8>) -> ProbeResult {
        if self.config.predicate().is_satisfied_by(&response) {
            ProbeResult::Success(response)
        } else {
            debug!(
                "Response does not satisfy predicate ({})",
                self.config.predicate()
            );
            ProbeResult::invalid_response(response)
        }
    }
}

async fn send_fragment<S>(stream: &mut S, fragment: &[u8]) -> io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    stream.write_all(fragment).await?;
    stream.flush().await
}

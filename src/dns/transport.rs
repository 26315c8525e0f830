//! Single DNS exchange over UDP, retried over TCP when truncated.
//!
//! The UDP socket is connected to the server, so datagrams from any other
//! source are dropped by the kernel and ICMP errors surface as IO errors
//! instead of a silent timeout. Responses carrying a foreign message ID are
//! skipped until the timeout runs out.

use super::message::{build_query, parse_response, DnsResponse};
use crate::base::{
    context::{IoResultExt, TimeoutResultExt},
    error::ExchangeError,
};
use hickory_resolver::proto::rr::RecordType;
use std::{
    net::{Ipv4Addr, Ipv6Addr, SocketAddr},
    time::Duration,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpStream, UdpSocket},
    time::Instant,
};

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// Query `server` for `record_type` records of `fqdn`.
///
/// `timeout` bounds the whole exchange, including the TCP retry.
pub async fn exchange(
    server: SocketAddr,
    fqdn: &str,
    record_type: RecordType,
    timeout: Duration,
) -> Result<DnsResponse, ExchangeError> {
    let (id, query) = build_query(fqdn, record_type)?;
    let started = Instant::now();

    let response = tokio::time::timeout(timeout, udp_exchange(server, id, &query))
        .await
        .timeout_context(server, timeout)??;

    if !response.truncated {
        return Ok(response);
    }

    tracing::debug!(server = %server, domain = %fqdn, %record_type, "truncated UDP response, retrying over TCP");
    let remaining = timeout.saturating_sub(started.elapsed());
    tokio::time::timeout(remaining, tcp_exchange(server, fqdn, id, &query))
        .await
        .timeout_context(server, timeout)?
}

async fn udp_exchange(
    server: SocketAddr,
    id: u16,
    query: &[u8],
) -> Result<DnsResponse, ExchangeError> {
    let bind_addr = if server.is_ipv4() {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
    } else {
        SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
    };

    let socket = UdpSocket::bind(bind_addr).await.exchange_context(server)?;
    socket.connect(server).await.exchange_context(server)?;
    socket.send(query).await.exchange_context(server)?;
    tracing::trace!(server = %server, bytes = query.len(), "UDP query sent");

    let mut buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
    loop {
        let len = socket.recv(&mut buf).await.exchange_context(server)?;
        let response = parse_response(server, &buf[..len])?;
        if response.id == id {
            return Ok(response);
        }
        tracing::debug!(
            server = %server,
            expected = id,
            received = response.id,
            "ignoring UDP response with mismatched id"
        );
    }
}

async fn tcp_exchange(
    server: SocketAddr,
    fqdn: &str,
    id: u16,
    query: &[u8],
) -> Result<DnsResponse, ExchangeError> {
    let mut stream = TcpStream::connect(server).await.exchange_context(server)?;
    stream.set_nodelay(true).exchange_context(server)?;

    let length = u16::try_from(query.len()).map_err(|_| ExchangeError::Encode {
        domain: fqdn.to_string(),
        reason: format!("query of {} bytes exceeds TCP framing", query.len()),
    })?;
    stream
        .write_all(&length.to_be_bytes())
        .await
        .exchange_context(server)?;
    stream.write_all(query).await.exchange_context(server)?;
    stream.flush().await.exchange_context(server)?;

    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await.exchange_context(server)?;
    let mut buf = vec![0u8; usize::from(u16::from_be_bytes(len_buf))];
    stream.read_exact(&mut buf).await.exchange_context(server)?;

    let response = parse_response(server, &buf)?;
    if response.id != id {
        return Err(ExchangeError::Decode {
            server,
            reason: format!("TCP response id {} does not match query id {}", response.id, id),
        });
    }
    Ok(response)
}

//! DNS query construction and answer extraction (RFC 1035 wire format).

use crate::base::error::ExchangeError;
use hickory_resolver::proto::{
    op::{Message, MessageType, OpCode, Query, ResponseCode},
    rr::{DNSClass, Name as WireName, RData, RecordType},
    serialize::binary::BinEncodable,
};
use std::net::{IpAddr, SocketAddr};

/// Address-bearing view of a DNS response.
#[derive(Debug, Clone)]
pub struct DnsResponse {
    pub id: u16,
    pub rcode: ResponseCode,
    pub truncated: bool,
    /// A and AAAA answers in the order the server sent them
    pub addresses: Vec<IpAddr>,
}

impl DnsResponse {
    pub fn is_success(&self) -> bool {
        self.rcode == ResponseCode::NoError
    }
}

/// Build a recursive query for `fqdn`.
///
/// Returns the random message ID alongside the wire bytes so the response
/// can be matched.
pub fn build_query(fqdn: &str, record_type: RecordType) -> Result<(u16, Vec<u8>), ExchangeError> {
    let name = WireName::from_ascii(fqdn).map_err(|e| ExchangeError::Encode {
        domain: fqdn.to_string(),
        reason: e.to_string(),
    })?;

    let mut query = Query::query(name, record_type);
    query.set_query_class(DNSClass::IN);

    let id = fastrand::u16(..);
    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .add_query(query);

    let bytes = message.to_bytes().map_err(|e| ExchangeError::Encode {
        domain: fqdn.to_string(),
        reason: e.to_string(),
    })?;

    Ok((id, bytes))
}

/// Decode a response from `server`, keeping only A and AAAA answers.
pub fn parse_response(server: SocketAddr, bytes: &[u8]) -> Result<DnsResponse, ExchangeError> {
    let message = Message::from_vec(bytes).map_err(|e| ExchangeError::Decode {
        server,
        reason: e.to_string(),
    })?;

    if message.message_type() != MessageType::Response {
        return Err(ExchangeError::Decode {
            server,
            reason: "message is not a response".to_string(),
        });
    }

    let addresses = message
        .answers()
        .iter()
        .filter_map(|record| match record.data() {
            RData::A(a) => Some(IpAddr::V4(a.0)),
            RData::AAAA(aaaa) => Some(IpAddr::V6(aaaa.0)),
            _ => None,
        })
        .collect();

    Ok(DnsResponse {
        id: message.id(),
        rcode: message.response_code(),
        truncated: message.truncated(),
        addresses,
    })
}

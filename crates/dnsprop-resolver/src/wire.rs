//! One DNS exchange against one server.
//!
//! UDP first; a truncated UDP response is retried over TCP with the same
//! effective timeout. The response is then classified into a
//! [`Status`] and its answers rendered as text.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use dnsprop_core::server::socket_addr;
use dnsprop_core::{type_code, Answer, Lookup, ResolveResult, Status};
use hickory_proto::op::{Edns, Message, MessageType, OpCode, Query};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};
use tokio::time::{timeout, Instant};
use tracing::{debug, trace};

use crate::error::ExchangeError;

/// EDNS0 UDP payload size advertised in every query
pub const EDNS_BUFFER_SIZE: u16 = 1232;

/// Negative cache lifetime when no SOA is available
pub const DEFAULT_NEGATIVE_TTL: Duration = Duration::from_secs(30);

/// Receive buffer; large enough for any datagram
const MAX_DATAGRAM: usize = 65_535;

/// Timeout for one exchange: `per_query`, shortened to what is left before `deadline`.
///
/// An expired deadline gives zero.
#[must_use]
pub fn effective_timeout(per_query: Duration, deadline: Option<Instant>) -> Duration {
    deadline.map_or(per_query, |deadline| {
        per_query.min(deadline.saturating_duration_since(Instant::now()))
    })
}

/// Query `server` once and classify what comes back.
///
/// Never fails: problems are reported through the result's status.
pub async fn query(
    server: &str,
    lookup: &Lookup,
    per_query_timeout: Duration,
    deadline: Option<Instant>,
) -> ResolveResult {
    let mut result = ResolveResult::for_server(server);

    let qtype = type_code(&lookup.record_type);
    if qtype == 0 {
        debug!(server, qtype = %lookup.record_type, "unsupported record type");
        return result;
    }

    let limit = effective_timeout(per_query_timeout, deadline);
    let outcome = match socket_addr(server) {
        Some(addr) => exchange(addr, lookup, qtype, limit).await,
        None => Err(ExchangeError::InvalidServer(server.to_string())),
    };

    match outcome {
        Ok((response, rtt)) => {
            result.rtt_ms = millis(rtt);
            classify(&mut result, &response);
        }
        Err(e) => {
            result.status = if e.is_timeout() {
                Status::Timeout
            } else {
                Status::Error
            };
            debug!(server, name = %lookup.name, error = %e, status = %result.status, "exchange failed");
        }
    }

    result
}

/// UDP exchange with TCP fallback on truncation.
async fn exchange(
    addr: SocketAddr,
    lookup: &Lookup,
    qtype: u16,
    limit: Duration,
) -> Result<(Message, Duration), ExchangeError> {
    let request = build_query(&lookup.name, qtype, lookup.dnssec)?;
    let id = request.id();
    let wire = request.to_vec()?;

    let started = Instant::now();
    let response = timeout(limit, exchange_udp(addr, &wire, id)).await??;
    let rtt = started.elapsed();

    if !response.truncated() {
        return Ok((response, rtt));
    }

    trace!(%addr, "truncated over UDP, retrying over TCP");
    let started = Instant::now();
    match timeout(limit, exchange_tcp(addr, &wire, id)).await {
        Ok(Ok(full)) => Ok((full, started.elapsed())),
        // Keep the truncated answer rather than failing the lookup.
        Ok(Err(e)) => {
            debug!(%addr, error = %e, "TCP fallback failed");
            Ok((response, rtt))
        }
        Err(_) => {
            debug!(%addr, "TCP fallback timed out");
            Ok((response, rtt))
        }
    }
}

fn build_query(name: &str, qtype: u16, dnssec: bool) -> Result<Message, ExchangeError> {
    let mut qname = Name::from_ascii(name)?;
    qname.set_fqdn(true);

    let mut edns = Edns::new();
    edns.set_max_payload(EDNS_BUFFER_SIZE);
    edns.set_dnssec_ok(dnssec);

    let mut message = Message::new();
    message
        .set_id(rand::random())
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .add_query(Query::query(qname, RecordType::from(qtype)))
        .set_edns(edns);
    Ok(message)
}

async fn exchange_udp(addr: SocketAddr, wire: &[u8], id: u16) -> Result<Message, ExchangeError> {
    let local: SocketAddr = if addr.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };
    let socket = UdpSocket::bind(local).await?;
    socket.connect(addr).await?;
    socket.send(wire).await?;

    let mut buf = vec![0u8; MAX_DATAGRAM];
    loop {
        let len = socket.recv(&mut buf).await?;
        let datagram = &buf[..len];
        // Stray datagrams for other IDs are dropped; a bad one with our ID is an error.
        if datagram.len() < 2 || u16::from_be_bytes([datagram[0], datagram[1]]) != id {
            trace!(%addr, len, "ignoring unrelated datagram");
            continue;
        }
        return Ok(Message::from_vec(datagram)?);
    }
}

async fn exchange_tcp(addr: SocketAddr, wire: &[u8], id: u16) -> Result<Message, ExchangeError> {
    let len = u16::try_from(wire.len())
        .map_err(|_| ExchangeError::Malformed(format!("query of {} bytes", wire.len())))?;

    let mut stream = TcpStream::connect(addr).await?;
    let mut framed = Vec::with_capacity(wire.len() + 2);
    framed.extend_from_slice(&len.to_be_bytes());
    framed.extend_from_slice(wire);
    stream.write_all(&framed).await?;

    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await?;
    let mut buf = vec![0u8; usize::from(u16::from_be_bytes(len_buf))];
    stream.read_exact(&mut buf).await?;

    let message = Message::from_vec(&buf)?;
    if message.id() != id {
        return Err(ExchangeError::Malformed(format!(
            "response id {} does not match query id {id}",
            message.id()
        )));
    }
    Ok(message)
}

/// Fill status, answers, authority, and cache TTL from a response.
fn classify(result: &mut ResolveResult, response: &Message) {
    result.authenticated_data = response.authentic_data();
    let authority = response.name_servers();

    match u16::from(response.response_code()) {
        0 => {}
        3 => {
            result.status = Status::NxDomain;
            result.authority = owner_names(authority);
            return;
        }
        2 => {
            result.status = Status::ServFail;
            return;
        }
        code => {
            result.status = Status::Other(rcode_name(code));
            return;
        }
    }

    let answers = parse_answers(response.answers());
    if answers.is_empty() {
        result.status = Status::NoAnswer;
        result.cache_ttl = negative_ttl(authority);
    } else {
        result.status = Status::Ok;
        result.cache_ttl = min_answer_ttl(&answers);
        result.answers = answers;
    }
    if !authority.is_empty() {
        result.authority = owner_names(authority);
    }
}

/// Render the supported record types; everything else is skipped.
pub fn parse_answers(records: &[Record]) -> Vec<Answer> {
    records
        .iter()
        .filter_map(|record| {
            let value = match record.data() {
                RData::A(a) => a.0.to_string(),
                RData::AAAA(aaaa) => aaaa.0.to_string(),
                RData::CNAME(cname) => cname.0.to_string(),
                RData::TXT(txt) => txt
                    .txt_data()
                    .iter()
                    .map(|segment| String::from_utf8_lossy(segment))
                    .collect(),
                RData::MX(mx) => mx.exchange().to_string(),
                RData::NS(ns) => ns.0.to_string(),
                RData::SOA(soa) => format!("{} {}", soa.mname(), soa.rname()),
                _ => return None,
            };
            Some(Answer::new(value, record.ttl()))
        })
        .collect()
}

/// Smallest answer TTL, zero for no answers.
pub fn min_answer_ttl(answers: &[Answer]) -> Duration {
    answers
        .iter()
        .map(|a| a.ttl)
        .min()
        .map_or(Duration::ZERO, |ttl| Duration::from_secs(u64::from(ttl)))
}

/// Negative cache TTL: the first non-zero SOA minimum in `authority`, else 30s.
pub fn negative_ttl(authority: &[Record]) -> Duration {
    authority
        .iter()
        .find_map(|record| match record.data() {
            RData::SOA(soa) if soa.minimum() > 0 => {
                Some(Duration::from_secs(u64::from(soa.minimum())))
            }
            _ => None,
        })
        .unwrap_or(DEFAULT_NEGATIVE_TTL)
}

fn owner_names(records: &[Record]) -> Vec<String> {
    records.iter().map(|r| r.name().to_string()).collect()
}

/// Lower-case protocol mnemonic for a response code.
fn rcode_name(code: u16) -> String {
    let name = match code {
        1 => "formerr",
        4 => "notimp",
        5 => "refused",
        6 => "yxdomain",
        7 => "yxrrset",
        8 => "nxrrset",
        9 => "notauth",
        10 => "notzone",
        16 => "badsig",
        17 => "badkey",
        18 => "badtime",
        19 => "badmode",
        20 => "badname",
        21 => "badalg",
        22 => "badtrunc",
        23 => "badcookie",
        other => return format!("rcode{other}"),
    };
    name.to_string()
}

#[allow(clippy::cast_precision_loss)]
fn millis(d: Duration) -> f64 {
    d.as_micros() as f64 / 1000.0
}

//! In-process DNS servers for tests.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::rdata::{A, SOA};
use hickory_proto::rr::{Name, RData, Record};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::task::JoinHandle;

type Responder = Arc<dyn Fn(&Message) -> Message + Send + Sync>;

pub struct StubServer {
    pub addr: SocketAddr,
    /// UDP queries received
    pub queries: Arc<AtomicUsize>,
    /// TCP queries received
    pub tcp_queries: Arc<AtomicUsize>,
    /// Highest number of UDP queries being answered at once
    pub max_in_flight: Arc<AtomicUsize>,
    tasks: Vec<JoinHandle<()>>,
}

impl StubServer {
    pub async fn udp(respond: impl Fn(&Message) -> Message + Send + Sync + 'static) -> Self {
        Self::udp_with_delay(Duration::ZERO, respond).await
    }

    pub async fn udp_with_delay(
        delay: Duration,
        respond: impl Fn(&Message) -> Message + Send + Sync + 'static,
    ) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let mut server = Self::empty(socket.local_addr().unwrap());
        server.serve_udp(socket, delay, Arc::new(respond));
        server
    }

    pub async fn udp_and_tcp(
        udp: impl Fn(&Message) -> Message + Send + Sync + 'static,
        tcp: impl Fn(&Message) -> Message + Send + Sync + 'static,
    ) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        let listener = TcpListener::bind(addr).await.unwrap();
        let mut server = Self::empty(addr);
        server.serve_udp(socket, Duration::ZERO, Arc::new(udp));
        server.serve_tcp(listener, Arc::new(tcp));
        server
    }

    fn empty(addr: SocketAddr) -> Self {
        Self {
            addr,
            queries: Arc::default(),
            tcp_queries: Arc::default(),
            max_in_flight: Arc::default(),
            tasks: Vec::new(),
        }
    }

    fn serve_udp(&mut self, socket: UdpSocket, delay: Duration, respond: Responder) {
        let socket = Arc::new(socket);
        let queries = Arc::clone(&self.queries);
        let max_in_flight = Arc::clone(&self.max_in_flight);
        let in_flight = Arc::new(AtomicUsize::new(0));

        self.tasks.push(tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            loop {
                let Ok((len, peer)) = socket.recv_from(&mut buf).await else {
                    return;
                };
                let Ok(request) = Message::from_vec(&buf[..len]) else {
                    continue;
                };
                queries.fetch_add(1, Ordering::SeqCst);

                let socket = Arc::clone(&socket);
                let respond = Arc::clone(&respond);
                let in_flight = Arc::clone(&in_flight);
                let max_in_flight = Arc::clone(&max_in_flight);
                tokio::spawn(async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    max_in_flight.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(delay).await;
                    let response = respond(&request).to_vec().unwrap();
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    let _ = socket.send_to(&response, peer).await;
                });
            }
        }));
    }

    fn serve_tcp(&mut self, listener: TcpListener, respond: Responder) {
        let tcp_queries = Arc::clone(&self.tcp_queries);
        self.tasks.push(tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut len = [0u8; 2];
                if stream.read_exact(&mut len).await.is_err() {
                    continue;
                }
                let mut buf = vec![0u8; usize::from(u16::from_be_bytes(len))];
                if stream.read_exact(&mut buf).await.is_err() {
                    continue;
                }
                let Ok(request) = Message::from_vec(&buf) else {
                    continue;
                };
                tcp_queries.fetch_add(1, Ordering::SeqCst);

                let body = respond(&request).to_vec().unwrap();
                let mut framed = u16::try_from(body.len()).unwrap().to_be_bytes().to_vec();
                framed.extend_from_slice(&body);
                let _ = stream.write_all(&framed).await;
            }
        }));
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Empty response header matching `request`.
pub fn response_to(request: &Message, code: ResponseCode) -> Message {
    let mut response = Message::new();
    response
        .set_id(request.id())
        .set_message_type(MessageType::Response)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(request.recursion_desired())
        .set_recursion_available(true)
        .set_response_code(code)
        .add_queries(request.queries().to_vec());
    response
}

/// Responder answering every query with `code` and the given answers.
pub fn respond_with(
    code: ResponseCode,
    answers: impl Fn(&Message) -> Vec<Record> + Send + Sync + 'static,
) -> impl Fn(&Message) -> Message + Send + Sync + 'static {
    move |request| {
        let mut response = response_to(request, code);
        response.add_answers(answers(request));
        response
    }
}

/// Whether the query carries an OPT record with the DO bit set.
pub fn wants_dnssec(request: &Message) -> bool {
    request
        .extensions()
        .as_ref()
        .is_some_and(|edns| format!("{edns:?}").contains("dnssec_ok: true"))
}

pub fn a_record(owner: &str, ip: [u8; 4], ttl: u32) -> Record {
    Record::from_rdata(
        Name::from_ascii(owner).unwrap(),
        ttl,
        RData::A(A(Ipv4Addr::from(ip))),
    )
}

pub fn soa_record(zone: &str, minimum: u32) -> Record {
    let soa = SOA::new(
        Name::from_ascii("ns1.example.com.").unwrap(),
        Name::from_ascii("hostmaster.example.com.").unwrap(),
        2_024_050_101,
        3600,
        900,
        604_800,
        minimum,
    );
    Record::from_rdata(Name::from_ascii(zone).unwrap(), 3600, RData::SOA(soa))
}

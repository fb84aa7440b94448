use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::GroupingConfig;

pub mod api;
pub mod routes;

const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

/// How long a client may stall mid-request before its connection is dropped.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub fn run_server(config: &GroupingConfig) -> io::Result<()> {
    let listener = TcpListener::bind(&config.bind_addr)?;
    info!(
        "paygroups server listening on http://{}",
        listener.local_addr()?
    );
    serve(listener, config, REQUEST_TIMEOUT)
}

/// Accept loop over an already bound listener. Requests are handled one at a
/// time, so every connection gets `timeout` for reads and writes.
pub fn serve(
    listener: TcpListener,
    config: &GroupingConfig,
    timeout: Duration,
) -> io::Result<()> {
    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => match handle_connection(&mut stream, config, timeout) {
                Ok(()) => {}
                Err(err) if is_timeout(&err) => {
                    warn!(
                        peer = ?stream.peer_addr().ok(),
                        "client timed out, dropping connection"
                    );
                }
                Err(err) => warn!("request error: {err}"),
            },
            Err(err) => warn!("connection failed: {err}"),
        }
    }

    Ok(())
}

fn is_timeout(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}

fn handle_connection(
    stream: &mut TcpStream,
    config: &GroupingConfig,
    timeout: Duration,
) -> io::Result<()> {
    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))?;
    let mut reader = BufReader::new(stream.try_clone()?);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line)? == 0 {
        return Ok(());
    }
    let mut request_parts = request_line.split_whitespace();
    let method = request_parts.next().unwrap_or("GET").to_string();
    let path = request_parts.next().unwrap_or("/").to_string();

    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header)? == 0 {
            break;
        }
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }

    let mut body = vec![0_u8; content_length.min(MAX_BODY_BYTES)];
    reader.read_exact(&mut body)?;
    let body = String::from_utf8_lossy(&body);

    debug!(%method, %path, bytes = body.len(), "request");
    let response = routes::route_request(&method, &path, &body, config);
    debug!(status = response.status_code, "response");

    stream.write_all(response.to_http_string().as_bytes())?;
    stream.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn spawn_server(timeout: Duration) -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        let config = GroupingConfig::default();
        thread::spawn(move || serve(listener, &config, timeout));
        addr
    }

    fn get(addr: std::net::SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).expect("connect");
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .expect("client timeout");
        write!(stream, "GET {path} HTTP/1.1\r\nHost: localhost\r\n\r\n").expect("send request");
        let mut response = String::new();
        stream.read_to_string(&mut response).expect("read response");
        response
    }

    #[test]
    fn serves_health_over_tcp() {
        let addr = spawn_server(Duration::from_secs(1));
        let response = get(addr, "/api/health");
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("paygroups-api"));
    }

    #[test]
    fn short_body_does_not_block_later_clients() {
        let addr = spawn_server(Duration::from_millis(200));

        let mut stalled = TcpStream::connect(addr).expect("connect stalled client");
        stalled
            .write_all(b"POST /api/groups HTTP/1.1\r\nContent-Length: 100\r\n\r\nabcd")
            .expect("send partial body");

        let response = get(addr, "/api/health");
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        drop(stalled);
    }
}

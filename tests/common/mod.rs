#![allow(dead_code)]

pub mod http {
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpStream};
    use std::time::Duration;

    /// A raw HTTP/1.1 response split into its parts.
    #[derive(Debug)]
    pub struct RawResponse {
        pub status: u16,
        pub headers: Vec<(String, String)>,
        pub body: String,
    }

    impl RawResponse {
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        }

        pub fn json(&self) -> serde_json::Value {
            serde_json::from_str(&self.body).unwrap_or_else(|e| {
                panic!("body is not JSON ({e}): {:?}", self.body);
            })
        }
    }

    fn content_length(head: &str) -> Option<usize> {
        head.lines().find_map(|line| {
            let (k, v) = line.split_once(':')?;
            if k.trim().eq_ignore_ascii_case("content-length") {
                v.trim().parse().ok()
            } else {
                None
            }
        })
    }

    /// Write `req` and read until the response is complete or the socket
    /// goes quiet for 200ms.
    pub fn send_request(addr: &SocketAddr, req: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(req.as_bytes()).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_millis(200)))
            .unwrap();
        let mut buf = Vec::new();
        loop {
            let mut tmp = [0u8; 1024];
            match stream.read(&mut tmp) {
                Ok(0) => break,
                Ok(n) => buf.extend_from_slice(&tmp[..n]),
                Err(ref e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    break
                }
                Err(e) => panic!("read error: {e:?}"),
            }
            let text = String::from_utf8_lossy(&buf);
            if let Some(idx) = text.find("\r\n\r\n") {
                let expected = content_length(&text[..idx]).unwrap_or(0);
                if buf.len() >= idx + 4 + expected {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    pub fn parse_response(resp: &str) -> RawResponse {
        let (head, body) = resp.split_once("\r\n\r\n").unwrap_or((resp, ""));
        let mut lines = head.lines();
        let status = lines
            .next()
            .and_then(|l| l.split_whitespace().nth(1))
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        let headers = lines
            .filter_map(|l| l.split_once(':'))
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .collect();
        RawResponse {
            status,
            headers,
            body: body.to_string(),
        }
    }

    pub fn request(addr: &SocketAddr, method: &str, path: &str, body: Option<&str>) -> RawResponse {
        let raw = match body {
            Some(b) => format!(
                "{method} {path} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{b}",
                b.len()
            ),
            None => format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\n\r\n"),
        };
        parse_response(&send_request(addr, &raw))
    }
}

pub mod test_server {
    use httpmediator::server::{AppService, HttpServer, ServerHandle};
    use std::net::{SocketAddr, TcpListener};
    use std::sync::Once;

    static MAY_INIT: Once = Once::new();

    /// Configure the may runtime once per test binary.
    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_stack_size(0x10000);
        });
    }

    /// Server on a random local port, stopped on drop.
    pub struct TestServer {
        handle: Option<ServerHandle>,
        pub addr: SocketAddr,
    }

    impl TestServer {
        pub fn start(service: AppService) -> Self {
            setup_may_runtime();
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let addr = listener.local_addr().unwrap();
            drop(listener);
            let handle = HttpServer(service).start(addr).unwrap();
            handle.wait_ready().unwrap();
            Self {
                handle: Some(handle),
                addr,
            }
        }
    }

    impl Drop for TestServer {
        fn drop(&mut self) {
            if let Some(handle) = self.handle.take() {
                handle.stop();
            }
        }
    }
}

pub mod requests {
    use httpmediator::cancellation::CancellationToken;
    use httpmediator::dispatcher::{HandlerRequest, HandlerResponse, HeaderVec};
    use httpmediator::ids::RequestId;
    use httpmediator::router::ParamVec;
    use may::sync::mpsc;
    use std::sync::Arc;

    /// Hand-built request plus the receiving end of its reply channel.
    pub fn handler_request(
        handler_name: &str,
        path_params: &[(&str, &str)],
        body: Option<serde_json::Value>,
    ) -> (HandlerRequest, mpsc::Receiver<HandlerResponse>) {
        let (reply_tx, reply_rx) = mpsc::channel();
        let path_params: ParamVec = path_params
            .iter()
            .map(|(k, v)| (Arc::from(*k), (*v).to_string()))
            .collect();
        let req = HandlerRequest {
            request_id: RequestId::new(),
            method: http::Method::GET,
            path: format!("/{handler_name}"),
            handler_name: handler_name.to_string(),
            path_params,
            query_params: ParamVec::new(),
            headers: HeaderVec::new(),
            body,
            cancellation: CancellationToken::new(),
            reply_tx,
        };
        (req, reply_rx)
    }
}

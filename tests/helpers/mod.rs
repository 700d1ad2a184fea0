use notex::application::AirtableConnector;
use notex::infrastructure::AirtableClient;
use serde_json::Value;
use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

pub const TEST_TOKEN: &str = "patTEST0000secret";
pub const TEST_BASE: &str = "appTEST";

/// A canned HTTP response
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

#[allow(dead_code)]
impl Reply {
    pub fn ok(body: Value) -> Self {
        Self::json(200, body)
    }

    /// Reply with a body that is not JSON, e.g. a proxy's error page
    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

/// What the fake server received
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

#[allow(dead_code)]
impl RecordedRequest {
    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or("")
    }

    /// Decoded value of a query parameter
    pub fn query(&self, name: &str) -> Option<String> {
        let query = self.target.split_once('?')?.1;
        query.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (percent_decode(key) == name).then(|| percent_decode(value))
        })
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("Request body should be JSON")
    }
}

/// Loopback stand-in for the Airtable API.
///
/// Serves the given replies in order, one connection each, and records every
/// request. Once the replies run out the listener closes.
pub struct FakeAirtable {
    endpoint: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[allow(dead_code)]
impl FakeAirtable {
    pub fn start(replies: Vec<Reply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind fake server");
        let port = listener.local_addr().expect("Fake server has no address").port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        thread::spawn(move || {
            for reply in replies {
                let Ok((stream, _)) = listener.accept() else {
                    return;
                };
                if serve(stream, &reply, &recorded).is_err() {
                    return;
                }
            }
        });

        Self {
            endpoint: format!("http://127.0.0.1:{port}/v0"),
            requests,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("Request log poisoned").clone()
    }

    /// Client pointed at this server with token and base already set
    pub fn client(&self) -> AirtableClient {
        let mut client = AirtableClient::with_endpoint(&self.endpoint);
        let configured = client
            .configure(TEST_TOKEN, Some(TEST_BASE))
            .expect("Configure with explicit base should not fail");
        assert!(configured);
        client
    }
}

fn serve(
    mut stream: TcpStream,
    reply: &Reply,
    recorded: &Mutex<Vec<RecordedRequest>>,
) -> io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();

    let mut headers = HashMap::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    let length = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0; length];
    reader.read_exact(&mut body)?;

    recorded.lock().expect("Request log poisoned").push(RecordedRequest {
        method,
        target,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.status,
        reason(reply.status),
        reply.body.len(),
        reply.body
    );
    stream.write_all(response.as_bytes())?;
    stream.flush()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

fn percent_decode(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => decoded.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).unwrap_or("");
                match u8::from_str_radix(hex, 16) {
                    Ok(byte) => {
                        decoded.push(byte);
                        i += 2;
                    }
                    Err(_) => decoded.push(b'%'),
                }
            }
            other => decoded.push(other),
        }
        i += 1;
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

/// Airtable record JSON for a book
#[allow(dead_code)]
pub fn book_record(record_id: &str, id: &str, name: &str, updated_at: &str) -> Value {
    serde_json::json!({
        "id": record_id,
        "createdTime": "2024-01-01T00:00:00.000Z",
        "fields": {
            "Id": id,
            "Name": name,
            "CreatedAt": "2024-01-01T00:00:00.000Z",
            "UpdatedAt": updated_at
        }
    })
}

/// Airtable record JSON for a note
#[allow(dead_code)]
pub fn note_record(record_id: &str, id: &str, book_id: &str, title: &str, content: &str) -> Value {
    serde_json::json!({
        "id": record_id,
        "createdTime": "2024-01-01T00:00:00.000Z",
        "fields": {
            "Id": id,
            "BookId": book_id,
            "Title": title,
            "Content": content,
            "CreatedAt": "2024-01-01T00:00:00.000Z",
            "UpdatedAt": "2024-01-02T00:00:00.000Z"
        }
    })
}

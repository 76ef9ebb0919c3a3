use common::{get_socket_path, ERROR_SIGNAL, OK_SIGNAL};
use common::query::Query;
use std::io::{Read, Write};
use std::net::Shutdown;
use std::os::unix::net::UnixStream;
use std::time::Duration;

/// Sends one query to the daemon socket of a dataset and returns the JSON
/// payload of the report, or the daemon's error message.
pub fn query_daemon(query: &Query, socket_root: &str, timeout: u64,
        dataset: &str) -> Result<String, String> {
    let socket_path = get_socket_path(socket_root, dataset);
    let stream = UnixStream::connect(socket_path);
    if stream.is_err() {
        return Err("The daemon is not running, please start it.".to_string());
    }
    let mut stream = stream.unwrap();
    let bytes = query.serialize()?;
    let res = stream.write_all(bytes.as_slice());
    if res.is_err() {
        return Err(res.unwrap_err().to_string());
    };

    let _ = stream.shutdown(Shutdown::Write);
    let timeout = Duration::new(timeout, 0);
    let _ = stream.set_read_timeout(Some(timeout));
    let mut response = Vec::new();
    let res = stream.read_to_end(&mut response);
    if res.is_err() {
        return Err("Timeout is met, please retry".to_string());
    };
    let response = String::from_utf8(response);
    if response.is_err() {
        return Err("Cannot decode the response".to_string());
    };
    let response = response.unwrap();

    // The first line carries the signal, the rest is the payload
    let mut parts = response.splitn(2, '\n');
    let signal = parts.next().unwrap_or("");
    let payload = parts.next().unwrap_or("").to_string();
    if OK_SIGNAL == signal {
        Ok(payload)
    } else if ERROR_SIGNAL == signal {
        Err(payload)
    } else {
        Err(format!("Unexpected response from the server: {}", response))
    }
}

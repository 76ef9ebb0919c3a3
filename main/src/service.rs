use analytics::loader::load_records;
use analytics::record::Record;
use analytics::report::build_report;
use common::{get_socket_path, ERROR_SIGNAL, OK_SIGNAL};
use common::dataset::Dataset;
use common::query::Query;
use std::fs;
use std::io::{Read, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::Path;

/// Serves one dataset on its own unix socket until the listener dies. The
/// whole log is loaded once at startup; queries only read it.
pub fn serve_dataset(dataset: Dataset, socket_root: String) {
    let records = match load_records(Path::new(&dataset.path)) {
        Ok(records) => records,
        Err(e) => {
            error!("Cannot load dataset {}: {}", dataset.label, e);
            return;
        },
    };
    info!("dataset {} is ready with {} records",
          dataset.label, records.len());

    // close the socket, if it exists
    let _ = fs::remove_file(get_socket_path(&socket_root, &dataset.label));

    if let Ok(listener) = UnixListener::bind(
            get_socket_path(&socket_root, &dataset.label)) {
        for stream in listener.incoming() {
            match stream {
                Ok(mut stream) => answer(&records, &mut stream),
                _              => {
                    /* connection failed */
                    break;
                }
            }
        }
    } else {
        panic!("failed to open a socket")
    }
}

fn answer(records: &[Record], stream: &mut UnixStream) {
    let mut bytes = Vec::new();
    if let Err(e) = stream.read_to_end(&mut bytes) {
        error!("Error happened while reading the incoming query {}", e);
        reply_error(stream, "Cannot read the query");
        return;
    }

    let query = match Query::deserialize(&mut bytes) {
        Ok(query) => query,
        Err(e) => {
            error!("Error happened while decoding the incoming query {}", e);
            reply_error(stream, &e);
            return;
        },
    };

    match build_report(records, &query) {
        Ok(report) => match serde_json::to_string(&report) {
            Ok(json) => {
                let _ = stream.write_all(OK_SIGNAL.as_bytes());
                let _ = stream.write_all(b"\n");
                let _ = stream.write_all(json.as_bytes());
            },
            Err(e) => {
                error!("Cannot encode the report: {}", e);
                reply_error(stream, "Cannot encode the report");
            },
        },
        Err(message) => {
            info!("query rejected: {}", message);
            reply_error(stream, &message);
        },
    }
}

fn reply_error(stream: &mut UnixStream, message: &str) {
    let _ = stream.write_all(ERROR_SIGNAL.as_bytes());
    let _ = stream.write_all(b"\n");
    let _ = stream.write_all(message.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::report::Report;
    use chrono::NaiveDate;
    use common::query::{Query, ReportKind};
    use std::io::{Read, Write};
    use std::net::Shutdown;

    fn record(day: u32, user: &str, amount: f64) -> Record {
        Record {
            id: day as u64,
            created: NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
                .and_hms_opt(12, 0, 0).unwrap(),
            user: user.to_string(),
            game: 1,
            amount,
            pool: None,
        }
    }

    fn exchange(records: &[Record], bytes: &[u8]) -> String {
        let (mut client, mut server) = UnixStream::pair().unwrap();
        client.write_all(bytes).unwrap();
        client.shutdown(Shutdown::Write).unwrap();

        answer(records, &mut server);
        drop(server);

        let mut response = String::new();
        client.read_to_string(&mut response).unwrap();
        response
    }

    #[test]
    fn test_answer_sends_the_report_behind_an_ok_line() {
        let records = vec![record(1, "a", -100.0), record(2, "a", 80.0)];
        let query = Query {
            kind: ReportKind::Overview,
            from: None,
            to: None,
            user: None,
            games: vec![],
            steps: 2,
            limit: 10,
        };

        let response = exchange(&records, &query.serialize().unwrap());
        let mut parts = response.splitn(2, '\n');
        assert_eq!(Some("OK"), parts.next());

        let report: Report = serde_json::from_str(parts.next().unwrap()).unwrap();
        match report {
            Report::Overview(overview) => assert_eq!(100.0, overview.turnover),
            other => panic!("unexpected report: {:?}", other),
        }
    }

    #[test]
    fn test_answer_sends_an_error_line_for_a_truncated_frame() {
        let records = vec![record(1, "a", -100.0)];
        let query = Query {
            kind: ReportKind::Overview,
            from: None,
            to: None,
            user: None,
            games: vec![],
            steps: 2,
            limit: 10,
        };

        let mut bytes = query.serialize().unwrap();
        bytes.truncate(bytes.len() - 4);

        assert_eq!("ERROR\nQuery unexpectedly truncated",
                   exchange(&records, &bytes));
    }

    #[test]
    fn test_answer_relays_report_errors() {
        let records = vec![record(1, "a", -100.0)];
        let query = Query {
            kind: ReportKind::User,
            from: None,
            to: None,
            user: Some("ghost".to_string()),
            games: vec![],
            steps: 2,
            limit: 10,
        };

        assert_eq!("ERROR\nUnknown user id: ghost",
                   exchange(&records, &query.serialize().unwrap()));
    }
}

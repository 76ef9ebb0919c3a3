use std::str;
use crate::{transform_u64_to_array_of_u8, transform_array_of_u8_to_u64};

pub const DEFAULT_TIMELINE_STEPS: u64 = 12;
pub const DEFAULT_DETAIL_LIMIT: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportKind {
    Overview,
    Health,
    Games,
    Timeline,
    User,
    Detail,
}

impl ReportKind {
    fn to_u8(self) -> u8 {
        match self {
            ReportKind::Overview => 1,
            ReportKind::Health   => 2,
            ReportKind::Games    => 3,
            ReportKind::Timeline => 4,
            ReportKind::User     => 5,
            ReportKind::Detail   => 6,
        }
    }

    fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(ReportKind::Overview),
            2 => Some(ReportKind::Health),
            3 => Some(ReportKind::Games),
            4 => Some(ReportKind::Timeline),
            5 => Some(ReportKind::User),
            6 => Some(ReportKind::Detail),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Query {
    pub kind: ReportKind,
    pub from: Option<String>,
    pub to: Option<String>,
    pub user: Option<String>,
    pub games: Vec<u32>,
    pub steps: u64,
    pub limit: u64,
}

impl Query {
    const MAGIC_NUMBER: &'static str = "SLINST";
    const VERSION_MAJOR: u8 = 1;
    const VERSION_MINOR: u8 = 0;

    pub fn serialize(&self) -> Result<Vec<u8>, String> {
        // Lengths travel as a single byte
        if self.games.len() > 255 {
            return Err("Too many game ids in query".to_string());
        }

        let mut sink = Vec::new();
        // Write the magic number
        sink.extend_from_slice(Query::MAGIC_NUMBER.as_bytes());

        // Write the version
        sink.push(Query::VERSION_MAJOR);
        sink.push(Query::VERSION_MINOR);

        // Write the report kind
        sink.push(self.kind.to_u8());

        // Write the optional date bounds and user id, each as a length
        // byte followed by the bytes themselves, 0 meaning absent
        Query::write_optional(&mut sink, &self.from)?;
        Query::write_optional(&mut sink, &self.to)?;
        Query::write_optional(&mut sink, &self.user)?;

        // Write the number of game ids and the ids themselves
        sink.push(self.games.len() as u8);
        for game in &self.games {
            sink.extend_from_slice(&transform_u64_to_array_of_u8(*game as u64));
        }

        // Write the snapshot and row bounds
        sink.extend_from_slice(&transform_u64_to_array_of_u8(self.steps));
        sink.extend_from_slice(&transform_u64_to_array_of_u8(self.limit));
        Ok(sink)
    }

    fn write_optional(sink: &mut Vec<u8>, field: &Option<String>)
            -> Result<(), String> {
        match field {
            None        => sink.push(0),
            Some(value) => {
                let value_bytes = value.as_bytes();
                if value_bytes.len() > 255 {
                    return Err("Text field too long in query".to_string());
                }
                sink.push(value_bytes.len() as u8);
                sink.extend_from_slice(value_bytes);
            },
        };
        Ok(())
    }

    fn sanity_check(bytes: &[u8]) -> bool {
        // check the length of the bytes
        // magic number
        let mut expected_length = Query::MAGIC_NUMBER.len();
        // major version
        expected_length += 1;
        // minor version
        expected_length += 1;
        // report kind
        expected_length += 1;
        // the three length-prefixed optional fields
        for _ in 0..3 {
            expected_length += 1;
            match bytes.get(expected_length - 1) {
                Some(&value) =>
                    expected_length += value as usize,
                None         =>
                    return false,
            };
        }
        // game id count
        expected_length += 1;
        match bytes.get(expected_length - 1) {
            Some(&count) =>
                expected_length += count as usize * 8,
            None         =>
                return false,
        };
        // steps and limit
        expected_length += 16;

        if bytes.len() < expected_length {
            return false;
        }

        true
    }

    pub fn deserialize(bytes: &mut Vec<u8>) -> Result<Self, String> {
        if ! Query::sanity_check(bytes) {
            return Err("Query unexpectedly truncated".to_string());
        }

        // Read and check magic number
        let magic_len = Query::MAGIC_NUMBER.len();
        let possible_magic: Vec<u8> = bytes.drain(0..magic_len).collect();
        if possible_magic.as_slice() != Query::MAGIC_NUMBER.as_bytes() {
            return Err("Bad magic number for query".to_string());
        }

        // Read and check major version
        if bytes.remove(0) != Query::VERSION_MAJOR {
            return Err("Bad major version number for query".to_string());
        };

        // Read and check minor version
        if bytes.remove(0) != Query::VERSION_MINOR {
            return Err("Bad minor version number for query".to_string());
        };

        // Read the report kind
        let kind = match ReportKind::from_u8(bytes.remove(0)) {
            Some(kind) => kind,
            None       => return Err("Unknown report kind in query".to_string()),
        };

        // Read the optional date bounds and user id
        let from = Query::read_optional(bytes)?;
        let to   = Query::read_optional(bytes)?;
        let user = Query::read_optional(bytes)?;

        // Read the game ids
        let count = bytes.remove(0);
        let mut games = Vec::new();
        for _ in 0..count {
            let id_bytes: Vec<u8> = bytes.drain(0..8).collect();
            games.push(transform_array_of_u8_to_u64(id_bytes.as_slice()) as u32);
        }

        // Read the snapshot and row bounds
        let steps_bytes: Vec<u8> = bytes.drain(0..8).collect();
        let steps = transform_array_of_u8_to_u64(steps_bytes.as_slice());
        let limit_bytes: Vec<u8> = bytes.drain(0..8).collect();
        let limit = transform_array_of_u8_to_u64(limit_bytes.as_slice());

        Ok(Query {
            kind,
            from,
            to,
            user,
            games,
            steps,
            limit,
        })
    }

    fn read_optional(bytes: &mut Vec<u8>) -> Result<Option<String>, String> {
        let next = bytes.remove(0);
        match next {
            0    => Ok(None),
            size => {
                let value: Vec<u8> = bytes.drain(0..size as usize).collect();
                match str::from_utf8(value.as_slice()) {
                    Ok(value) => Ok(Some(value.to_string())),
                    Err(_)    => Err("Invalid text field in query".to_string()),
                }
            }
        }
    }
}

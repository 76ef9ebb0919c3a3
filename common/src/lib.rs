extern crate dirs;
extern crate docopt;
extern crate ini;

#[macro_use]
extern crate log;

pub mod args;
pub mod config;
pub mod dataset;
pub mod prefs;
pub mod query;

#[macro_use]
extern crate serde_derive;

pub fn get_socket_path(socket_root: &str, dataset: &str) -> String {
  format!("{}/{}-{}", socket_root, SOCKET_PATH_PREFIX, dataset)
}

pub fn log_and_panic(msg: &str) -> ! {
  error!("{}", msg);
  panic!("{}", msg);
}

pub fn transform_u64_to_array_of_u8(x: u64) -> [u8; 8] {
  [((x >> 56) & 0xff) as u8,
   ((x >> 48) & 0xff) as u8,
   ((x >> 40) & 0xff) as u8,
   ((x >> 32) & 0xff) as u8,
   ((x >> 24) & 0xff) as u8,
   ((x >> 16) & 0xff) as u8,
   ((x >> 8)  & 0xff) as u8,
   (x & 0xff) as u8]
}

pub fn transform_array_of_u8_to_u64(x: &[u8]) -> u64 {
  ((x[0] as u64) << 56) |
  ((x[1] as u64) << 48) |
  ((x[2] as u64) << 40) |
  ((x[3] as u64) << 32) |
  ((x[4] as u64) << 24) |
  ((x[5] as u64) << 16) |
  ((x[6] as u64) << 8)  |
  (x[7] as u64)
}

static SOCKET_PATH_PREFIX: &'static str = "slotinsight-daemon-socket";
pub static OK_SIGNAL: &'static str = "OK";
pub static ERROR_SIGNAL: &'static str = "ERROR";

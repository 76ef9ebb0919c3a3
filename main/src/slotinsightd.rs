pub mod service;

extern crate analytics;
extern crate common;
extern crate fs2;

#[macro_use]
extern crate log;

use std::fs::File;
use std::process::exit;
use std::thread::{self, JoinHandle};
use fs2::FileExt;
use common::args::*;
use common::config::*;
use common::prefs;

fn print_welcome_message() {
    println!("slotinsightd daemon started...");
    println!("Ready to answer report queries");
}

fn start_daemon(conf: Configuration) -> Vec<JoinHandle<()>> {
    let mut children = vec![];
    for dataset in conf.datasets {
        let socket_root = conf.socket_root.clone();
        children.push(thread::spawn(move || {
            service::serve_dataset(dataset, socket_root);
        }));
    }

    children
}

fn main() {
    let config_dir = prefs::config_dir();
    log4rs::init_file(config_dir.join("slotinsightd-log4rs.yaml"),
          Default::default()).unwrap();

    let args = process_args("slotinsightd", &slotinsightd_usage("slotinsightd"));
    let conf = read_config(&args.flag_slotinsightrc);
    conf.require_datasets();

    // one daemon per machine; a held lock means another instance is up
    let lock_path = config_dir.join("slotinsightd.lock");
    let lock_file = File::create(&lock_path).unwrap_or_else(|_| {
        eprintln!("slotinsightd: cannot create {}", lock_path.display());
        exit(1);
    });
    if lock_file.try_lock_exclusive().is_err() {
        eprintln!("slotinsightd: another instance is already running");
        exit(1);
    }

    info!("slotinsightd started");

    print_welcome_message();
    let servers = start_daemon(conf);

    for server in servers {
        // Wait for the thread to finish. Returns a result.
        let _ = server.join();
    }

    let _ = lock_file.unlock();
}

mod launch;

extern crate common;

#[macro_use]
extern crate log;

use std::io;
use std::path::Path;
use std::process::exit;
use common::args::*;
use common::config::*;
use common::prefs;

fn bootstrap(dir: &Path) -> io::Result<()> {
    prefs::ensure_preference_file(dir)?;
    for binary in &["slotinsight", "slotinsightd", "slotinsightc"] {
        prefs::ensure_log_config(dir, binary)?;
    }
    Ok(())
}

fn main() {
    let config_dir = prefs::config_dir();

    // Logging is not up yet, failures here can only go to stderr
    if let Err(e) = bootstrap(&config_dir) {
        eprintln!("slotinsight: cannot prepare {}: {}", config_dir.display(), e);
        exit(1);
    }

    log4rs::init_file(config_dir.join("slotinsight-log4rs.yaml"),
          Default::default()).unwrap();

    let args = process_args("slotinsight", &slotinsight_usage("slotinsight"));

    // The original launch scripts ran without any configuration, so a
    // missing rc file falls back to the built-in defaults
    let conf = if Path::new(&args.flag_slotinsightrc).exists() {
        read_config(&args.flag_slotinsightrc)
    } else {
        Configuration::defaults()
    };

    if conf.installer.is_empty() {
        info!("dependency installation disabled by configuration");
    } else if let Err(message) =
            launch::install_dependencies(&conf.installer, &conf.manifest) {
        error!("{}", message);
        eprintln!("slotinsight: {}", message);
        exit(1);
    }

    info!("dependencies are in place, starting the server");
    println!("slotinsight launcher: starting the server...");

    match launch::run_server(conf.server.as_ref().map(|s| s.as_str()),
                             &args.flag_slotinsightrc) {
        Ok(code) => {
            info!("server exited with code {}", code);
            exit(code);
        },
        Err(message) => {
            error!("{}", message);
            eprintln!("slotinsight: {}", message);
            exit(1);
        },
    }
}

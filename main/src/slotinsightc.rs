mod remote;
mod render;

extern crate analytics;
extern crate common;

#[macro_use]
extern crate log;

use std::process::exit;
use analytics::report::Report;
use common::args::*;
use common::config::*;
use common::log_and_panic;
use common::query::*;
use common::prefs;

fn build_query(args: &ClientArgs) -> Query {
    let kind = if args.cmd_overview {
        ReportKind::Overview
    } else if args.cmd_health {
        ReportKind::Health
    } else if args.cmd_games {
        ReportKind::Games
    } else if args.cmd_timeline {
        ReportKind::Timeline
    } else if args.cmd_user {
        ReportKind::User
    } else {
        ReportKind::Detail
    };

    let games = args.flag_games.as_ref().map(|list| {
        list.split(',')
            .map(|game| game.trim().parse::<u32>().unwrap_or_else(|_|
                log_and_panic(&format!("Invalid game id: {}", game))))
            .collect()
    }).unwrap_or_else(Vec::new);

    Query {
        kind,
        from: args.flag_from.clone(),
        to: args.flag_to.clone(),
        user: args.arg_user_id.clone(),
        games,
        steps: args.flag_steps.unwrap_or(DEFAULT_TIMELINE_STEPS),
        limit: args.flag_limit.unwrap_or(DEFAULT_DETAIL_LIMIT),
    }
}

fn main() {
    log4rs::init_file(prefs::config_dir().join("slotinsightc-log4rs.yaml"),
          Default::default()).unwrap();

    let args = process_client_args("slotinsightc",
                                   &slotinsightc_usage("slotinsightc"));
    let conf = read_config(&args.flag_slotinsightrc);
    conf.require_datasets();

    let dataset = match &args.flag_dataset {
        Some(label) => conf.dataset(label).unwrap_or_else(||
            log_and_panic(&format!("Unknown dataset: {}", label))),
        None => conf.default_dataset().unwrap_or_else(||
            log_and_panic(
                "Please pass a valid dataset name or set a default dataset")),
    };

    let query = build_query(&args);

    match remote::query_daemon(&query, &conf.socket_root, conf.timeout,
                               &dataset.label) {
        Ok(payload) => {
            let report: Report = serde_json::from_str(&payload)
                .unwrap_or_else(|_| log_and_panic("Cannot decode the report"));
            print!("{}", render::render(&report));
            exit(0);
        },
        Err(message) => {
            error!("{}", message);
            eprintln!("slotinsightc: {}", message);
            exit(1);
        },
    }
}

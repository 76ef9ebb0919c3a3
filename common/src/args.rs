use docopt::Docopt;
use dirs::home_dir;
use std::process::exit;


#[derive(Deserialize, Debug)]
pub struct Args {
    pub flag_slotinsightrc: String,
    flag_help: bool,
    flag_version: bool,
}

#[derive(Deserialize, Debug)]
pub struct ClientArgs {
    pub cmd_overview: bool,
    pub cmd_health: bool,
    pub cmd_games: bool,
    pub cmd_timeline: bool,
    pub cmd_user: bool,
    pub cmd_detail: bool,
    pub arg_user_id: Option<String>,
    pub flag_dataset: Option<String>,
    pub flag_from: Option<String>,
    pub flag_to: Option<String>,
    pub flag_games: Option<String>,
    pub flag_steps: Option<u64>,
    pub flag_limit: Option<u64>,
    pub flag_slotinsightrc: String,
    flag_help: bool,
    flag_version: bool,
}

pub fn slotinsight_usage(app_name: &str) -> String {
    let home_dir = home_dir().expect("Cannot find the home directory");
    let home_dir = home_dir.display();
    format!("
        {}

        Usage: {0}
               {0} --slotinsightrc=<string>
               {0} --help
               {0} --version

        Options:
            --slotinsightrc=<string> Path to the slotinsightrc [default: {}/.slotinsightrc]
            -h, --help               Show this help.
            -v, --version            Show the version.
        ", app_name, home_dir)
}

pub fn slotinsightd_usage(app_name: &str) -> String {
    slotinsight_usage(app_name)
}

pub fn slotinsightc_usage(app_name: &str) -> String {
    let home_dir = home_dir().expect("Cannot find the home directory");
    let home_dir = home_dir.display();
    format!("
        {}

        Usage: {0} [options] overview
               {0} [options] health
               {0} [options] games
               {0} [options] timeline
               {0} [options] user <user-id>
               {0} [options] detail
               {0} --help
               {0} --version

        Options:
            --slotinsightrc=<string> Path to the slotinsightrc [default: {}/.slotinsightrc]
            --dataset=<string>       The dataset the report should be computed on.
                                     If none is provided, the default dataset
                                     would be chosen.
            --from=<date>            Keep records on or after this date (YYYY-MM-DD).
            --to=<date>              Keep records on or before this date (YYYY-MM-DD).
            --games=<gids>           Comma separated game ids to keep.
            --steps=<n>              Number of timeline snapshots.
            --limit=<n>              Maximum number of detail rows.
            -h, --help               Show this help.
            -v, --version            Show the version.
        ", app_name, home_dir)
}

pub fn process_args(app_name: &str, usage: &str) -> Args {

    let app_version = env!("CARGO_PKG_VERSION");

    let args: Args = Docopt::new(usage)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    if args.flag_version {
        println!("{}, v {}", app_name, app_version);
        exit(0);
    }

    if args.flag_help {
        println!("{}", usage);
        exit(0);
    }

    args
}

pub fn process_client_args(app_name: &str, usage: &str) -> ClientArgs {

    let app_version = env!("CARGO_PKG_VERSION");

    let args: ClientArgs = Docopt::new(usage)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    if args.flag_version {
        println!("{}, v {}", app_name, app_version);
        exit(0);
    }

    if args.flag_help {
        println!("{}", usage);
        exit(0);
    }

    args
}

use clap::{Arg, ArgAction, Command};

fn election_arg() -> Arg {
    Arg::new("election")
        .help("Election id")
        .required(true)
        .index(1)
}

fn candidate_arg() -> Arg {
    Arg::new("candidate")
        .help("Candidate id")
        .required(true)
        .index(2)
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Output in JSON format")
        .action(ArgAction::SetTrue)
}

pub fn build_cli() -> Command {
    Command::new("ballot")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Follow an election countdown, check your vote status and start a vote")
        .long_about("ballot talks to the campus election service. It shows the approved candidates of an election, counts down to its close, ends the election when the countdown reaches zero, and runs the checks that come before casting a vote.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .help("Base URL of the election service (overrides config and BALLOT_API_URL)")
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("login")
                .about("Store the session token used for every request")
                .arg(
                    Arg::new("token")
                        .long("token")
                        .short('t')
                        .help("Bearer token issued by the election service")
                        .required(true),
                ),
        )
        .subcommand(Command::new("logout").about("Remove the stored session token"))
        .subcommand(
            Command::new("candidates")
                .about("List the approved candidates of an election")
                .arg(election_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("election")
                .about("Show election details and the time left")
                .arg(election_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("status")
                .about("Check whether you have already voted in an election")
                .arg(election_arg()),
        )
        .subcommand(
            Command::new("vote")
                .about("Start voting for a candidate")
                .arg(election_arg())
                .arg(candidate_arg()),
        )
        .subcommand(
            Command::new("profile")
                .about("Show where a candidate's profile lives")
                .arg(election_arg())
                .arg(candidate_arg()),
        )
        .subcommand(
            Command::new("watch")
                .about("Count down to the close of an election and end it at zero")
                .arg(election_arg()),
        )
}

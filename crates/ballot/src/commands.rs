use clap::ArgMatches;
use tracing::{error, info, warn};

use ballot_core::config::BallotConfig;
use ballot_core::config::loading::apply_env_overrides;
use ballot_core::countdown::CountdownState;
use ballot_core::eligibility::{UnknownStatusPolicy, VoteCheck, check_vote_status};
use ballot_core::errors::{BallotError, FlowError};
use ballot_core::events;
use ballot_core::storage::keys;
use ballot_core::{
    Election, ElectionScreen, FileStore, HttpElectionApi, Notice, Phase, ScreenConfig,
    SystemClock, TransitionOutcome, VoteStart, VoteStep,
};

type Screen = ElectionScreen<HttpElectionApi, FileStore, SystemClock>;

/// Load configuration with warning on errors.
///
/// Falls back to defaults if config loading fails, but notifies the user via:
/// - stderr message for immediate visibility
/// - structured log event `cli.config.load_failed` for debugging
///
/// `--api-url` is applied last and validated.
fn load_config_with_warning(
    matches: &ArgMatches,
) -> Result<BallotConfig, Box<dyn std::error::Error>> {
    let mut config = match BallotConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.ballot/config.toml and ./.ballot/config.toml for syntax errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            let mut config = BallotConfig::default();
            apply_env_overrides(&mut config);
            config
        }
    };

    if let Some(url) = matches.get_one::<String>("api-url") {
        config.api.base_url = Some(url.clone());
    }

    if let Err(e) = config.validate() {
        eprintln!("❌ {}", e);
        error!(event = "cli.config.invalid", error = %e);
        return Err(e.into());
    }

    Ok(config)
}

fn build_runtime() -> Result<tokio::runtime::Runtime, std::io::Error> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

fn open_screen(
    config: &BallotConfig,
    election_id: &str,
) -> Result<Screen, Box<dyn std::error::Error>> {
    let api = HttpElectionApi::new(&config.api)?;
    Ok(ElectionScreen::new(
        api,
        FileStore::open_default(),
        SystemClock,
        election_id,
        ScreenConfig::from_config(config),
    ))
}

/// Print a flow failure, log it, and convert it for `main`.
fn report_flow_error(
    event: &'static str,
    action: &str,
    election_id: &str,
    e: FlowError,
) -> Box<dyn std::error::Error> {
    eprintln!("❌ Failed to {}: {}", action, e);
    if e.requires_login() {
        eprintln!("Tip: Run 'ballot login --token <TOKEN>' to log in.");
    }

    error!(
        event = event,
        election_id = election_id,
        error = %e,
        error_code = e.error_code()
    );

    events::log_app_error(&e);
    e.into()
}

fn print_notice(notice: &Notice) {
    eprintln!("{}: {}", notice.title, notice.message);
    if let Some(route) = &notice.redirect {
        eprintln!("Next: {}", route);
    }
}

fn election_arg(matches: &ArgMatches) -> Result<&String, Box<dyn std::error::Error>> {
    Ok(matches
        .get_one::<String>("election")
        .ok_or("Election argument is required")?)
}

fn candidate_arg(matches: &ArgMatches) -> Result<&String, Box<dyn std::error::Error>> {
    Ok(matches
        .get_one::<String>("candidate")
        .ok_or("Candidate argument is required")?)
}

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let command = matches.subcommand_name().unwrap_or("none");
    events::log_app_startup(command, FileStore::open_default().path());

    let result = match matches.subcommand() {
        Some(("login", sub_matches)) => handle_login_command(sub_matches),
        Some(("logout", _)) => handle_logout_command(),
        Some(("candidates", sub_matches)) => handle_candidates_command(sub_matches),
        Some(("election", sub_matches)) => handle_election_command(sub_matches),
        Some(("status", sub_matches)) => handle_status_command(sub_matches),
        Some(("vote", sub_matches)) => handle_vote_command(sub_matches),
        Some(("profile", sub_matches)) => handle_profile_command(sub_matches),
        Some(("watch", sub_matches)) => handle_watch_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    };

    events::log_app_shutdown(command, result.is_ok());
    result
}

fn handle_login_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let token = matches
        .get_one::<String>("token")
        .ok_or("Token argument is required")?;

    if token.trim().is_empty() {
        eprintln!("❌ Token must not be empty");
        return Err("Token must not be empty".into());
    }

    let mut store = FileStore::open_default();
    match keys::save_token(&mut store, token.trim()) {
        Ok(()) => {
            println!("✅ Logged in. Token stored in {}", store.path().display());
            info!(event = "cli.login_completed", path = %store.path().display());
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Failed to store token: {}", e);
            error!(event = "cli.login_failed", error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

fn handle_logout_command() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = FileStore::open_default();
    match keys::clear_token(&mut store) {
        Ok(()) => {
            println!("Logged out.");
            info!(event = "cli.logout_completed");
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Failed to remove token: {}", e);
            error!(event = "cli.logout_failed", error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

fn handle_candidates_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let election_id = election_arg(matches)?;
    let json_output = matches.get_flag("json");
    let config = load_config_with_warning(matches)?;

    info!(
        event = "cli.candidates_started",
        election_id = election_id.as_str(),
        json_output = json_output
    );

    build_runtime()?.block_on(list_candidates(&config, election_id, json_output))
}

async fn list_candidates(
    config: &BallotConfig,
    election_id: &str,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut screen = open_screen(config, election_id)?;
    let loaded = screen.initialize().await;
    screen.teardown();

    if let Err(e) = loaded
        && (e.requires_login() || screen.state().phase != Phase::Ready)
    {
        return Err(report_flow_error(
            "cli.candidates_failed",
            "list candidates",
            election_id,
            e,
        ));
    }

    let candidates = &screen.state().candidates;
    if json_output {
        println!("{}", serde_json::to_string_pretty(candidates)?);
    } else if let Some(message) = screen.state().empty_message() {
        println!("{}", message);
    } else {
        println!("Candidates for election {}:", election_id);
        let formatter = crate::table::TableFormatter::new(candidates);
        formatter.print_table(candidates);
    }

    info!(
        event = "cli.candidates_completed",
        election_id = election_id,
        count = candidates.len()
    );
    Ok(())
}

#[derive(serde::Serialize)]
struct ElectionSummary<'a> {
    election: &'a Election,
    end_time: Option<chrono::DateTime<chrono::Utc>>,
    remaining: Option<CountdownState>,
    ended: bool,
}

fn summarize(election: &Election, now: chrono::DateTime<chrono::Utc>) -> ElectionSummary<'_> {
    let end_time = election.end_time();
    let remaining_ms = end_time.map(|end| (end - now).num_milliseconds());
    ElectionSummary {
        election,
        end_time,
        remaining: remaining_ms.map(CountdownState::from_remaining_millis),
        ended: remaining_ms.is_some_and(|ms| ms <= 0),
    }
}

fn print_summary(summary: &ElectionSummary<'_>) {
    let election = summary.election;
    println!("Election:  {}", election.election_name);
    println!("Faculty:   {}", election.faculty_name);
    println!("Status:    {}", election.status);
    match election.start_date {
        Some(start) => println!("Starts:    {}", start.format("%Y-%m-%d %H:%M UTC")),
        None => println!("Starts:    not scheduled"),
    }
    match election.duration {
        Some(minutes) => println!("Duration:  {} minutes", minutes),
        None => println!("Duration:  not set"),
    }
    match (summary.end_time, summary.remaining) {
        (Some(end), Some(remaining)) => {
            println!("Ends:      {}", end.format("%Y-%m-%d %H:%M UTC"));
            if summary.ended {
                println!("Time left: {} (ended)", remaining);
            } else {
                println!("Time left: {}", remaining);
            }
        }
        _ => println!("Time left: no deadline set"),
    }
}

fn handle_election_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let election_id = election_arg(matches)?;
    let json_output = matches.get_flag("json");
    let config = load_config_with_warning(matches)?;

    info!(
        event = "cli.election_started",
        election_id = election_id.as_str()
    );

    build_runtime()?.block_on(show_election(&config, election_id, json_output))
}

async fn show_election(
    config: &BallotConfig,
    election_id: &str,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut screen = open_screen(config, election_id)?;
    let loaded = screen.initialize().await;
    screen.teardown();

    let Some(election) = screen.state().election.as_ref() else {
        if let Some(message) = &screen.state().election_error {
            eprintln!("{}", message);
        }
        let e = loaded.err().unwrap_or(FlowError::NotLoaded);
        return Err(report_flow_error(
            "cli.election_failed",
            "fetch election",
            election_id,
            e,
        ));
    };

    let summary = summarize(election, chrono::Utc::now());
    if json_output {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    info!(
        event = "cli.election_completed",
        election_id = election_id,
        ended = summary.ended
    );
    Ok(())
}

fn handle_status_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let election_id = election_arg(matches)?;
    let config = load_config_with_warning(matches)?;

    info!(
        event = "cli.status_started",
        election_id = election_id.as_str()
    );

    build_runtime()?.block_on(show_vote_status(&config, election_id))
}

async fn show_vote_status(
    config: &BallotConfig,
    election_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let api = HttpElectionApi::new(&config.api)?;
    let mut store = FileStore::open_default();
    let policy = UnknownStatusPolicy::from_fail_closed(config.voting.fail_closed());

    let check = match check_vote_status(&api, &mut store, election_id, policy).await {
        Ok(check) => check,
        Err(e) => {
            return Err(report_flow_error(
                "cli.status_failed",
                "check vote status",
                election_id,
                e,
            ));
        }
    };

    info!(
        event = "cli.status_completed",
        election_id = election_id,
        eligible = check.is_eligible()
    );

    match check {
        VoteCheck::Eligible { cleared_stale } => {
            println!("✅ You have not voted in election {}.", election_id);
            if cleared_stale {
                println!("A stale local vote record was removed.");
            }
            Ok(())
        }
        VoteCheck::AlreadyVoted(notice) | VoteCheck::Forbidden(notice) => {
            println!("{}: {}", notice.title, notice.message);
            Ok(())
        }
        VoteCheck::Unavailable(notice) => {
            print_notice(&notice);
            Err(notice.title.into())
        }
    }
}

/// Initialize a screen and fail unless its candidate list loaded.
async fn load_candidate_screen(
    config: &BallotConfig,
    election_id: &str,
    event: &'static str,
) -> Result<Screen, Box<dyn std::error::Error>> {
    let mut screen = open_screen(config, election_id)?;
    let loaded = screen.initialize().await;
    screen.teardown();

    if let Err(e) = loaded
        && (e.requires_login() || screen.state().phase != Phase::Ready)
    {
        return Err(report_flow_error(event, "load candidates", election_id, e));
    }
    Ok(screen)
}

fn handle_vote_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let election_id = election_arg(matches)?;
    let candidate_id = candidate_arg(matches)?;
    let config = load_config_with_warning(matches)?;

    info!(
        event = "cli.vote_started",
        election_id = election_id.as_str(),
        candidate_id = candidate_id.as_str()
    );

    build_runtime()?.block_on(start_vote(&config, election_id, candidate_id))
}

async fn start_vote(
    config: &BallotConfig,
    election_id: &str,
    candidate_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut screen = load_candidate_screen(config, election_id, "cli.vote_failed").await?;

    let start = match screen.start_vote(candidate_id).await {
        Ok(start) => start,
        Err(e) => {
            return Err(report_flow_error(
                "cli.vote_failed",
                "start vote",
                election_id,
                e,
            ));
        }
    };

    match start {
        VoteStart::Proceed(route) => {
            let current = screen.state().step;
            println!("✅ Vote started.");
            for step in VoteStep::ALL {
                let marker = if step == current { ">" } else { " " };
                println!("{} {}. {}", marker, step.number(), step.label());
            }
            println!("Continue at: {}", route);
            info!(
                event = "cli.vote_completed",
                election_id = election_id,
                route = %route
            );
            Ok(())
        }
        VoteStart::Blocked(notice) => {
            print_notice(&notice);
            warn!(
                event = "cli.vote_blocked",
                election_id = election_id,
                reason = ?notice.kind
            );
            Err(notice.title.into())
        }
    }
}

fn handle_profile_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let election_id = election_arg(matches)?;
    let candidate_id = candidate_arg(matches)?;
    let config = load_config_with_warning(matches)?;

    build_runtime()?.block_on(show_profile(&config, election_id, candidate_id))
}

async fn show_profile(
    config: &BallotConfig,
    election_id: &str,
    candidate_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut screen = load_candidate_screen(config, election_id, "cli.profile_failed").await?;

    match screen.view_profile(candidate_id) {
        Ok(route) => {
            println!("{}", route);
            Ok(())
        }
        Err(e) => Err(report_flow_error(
            "cli.profile_failed",
            "open profile",
            election_id,
            e,
        )),
    }
}

fn handle_watch_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let election_id = election_arg(matches)?;
    let config = load_config_with_warning(matches)?;

    info!(event = "cli.watch_started", election_id = election_id.as_str());

    build_runtime()?.block_on(watch_election(&config, election_id))
}

async fn watch_election(
    config: &BallotConfig,
    election_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut screen = open_screen(config, election_id)?;

    let loaded = screen.initialize().await;
    if let Err(e) = loaded
        && (e.requires_login() || screen.state().election.is_none())
    {
        if let Some(message) = &screen.state().election_error {
            eprintln!("{}", message);
        }
        return Err(report_flow_error("cli.watch_failed", "watch", election_id, e));
    }

    let Some((name, end)) = screen
        .state()
        .election
        .as_ref()
        .and_then(|e| e.end_time().map(|end| (e.election_name.clone(), end)))
    else {
        return Err(report_flow_error(
            "cli.watch_failed",
            "watch",
            election_id,
            FlowError::NoCountdown,
        ));
    };
    println!(
        "Watching {} ({}). Closes at {}.",
        name,
        election_id,
        end.format("%Y-%m-%d %H:%M:%S UTC")
    );

    let mut last_shown: Option<CountdownState> = None;
    let outcome = match screen
        .run_until_ended(|state| {
            if !state.ended && last_shown != Some(state.countdown) {
                println!("Time remaining: {}", state.countdown);
                last_shown = Some(state.countdown);
            }
        })
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            return Err(report_flow_error(
                "cli.watch_failed",
                "end election",
                election_id,
                e,
            ));
        }
    };

    let ended = Notice::election_ended(election_id);
    println!("Time remaining: {}", screen.state().countdown);
    println!("{}: {}", ended.title, ended.message);

    match outcome {
        TransitionOutcome::Completed { route, notified } => {
            if !notified {
                eprintln!("Warning: the status notification could not be sent.");
            }
            println!("Results: {}", route);
            info!(
                event = "cli.watch_completed",
                election_id = election_id,
                notified = notified
            );
            Ok(())
        }
        TransitionOutcome::StatusUpdateFailed { error } => {
            eprintln!("❌ Failed to end election {}: {}", election_id, error);
            error!(
                event = "cli.watch_failed",
                election_id = election_id,
                error = %error
            );
            events::log_app_error(&error);
            Err(error.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn election(duration: Option<u32>) -> Election {
        serde_json::from_value(serde_json::json!({
            "election_name": "SRC 2025",
            "faculty_name": "Engineering",
            "start_date": "2025-03-01T09:00:00Z",
            "duration": duration
        }))
        .unwrap()
    }

    #[test]
    fn test_summary_before_close() {
        let election = election(Some(60));
        let now = chrono::Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 1).unwrap();
        let summary = summarize(&election, now);
        assert!(!summary.ended);
        assert_eq!(summary.remaining.unwrap().to_string(), "00:59:59");
    }

    #[test]
    fn test_summary_after_close() {
        let election = election(Some(60));
        let now = chrono::Utc.with_ymd_and_hms(2025, 3, 1, 11, 0, 0).unwrap();
        let summary = summarize(&election, now);
        assert!(summary.ended);
        assert_eq!(summary.remaining, Some(CountdownState::ZERO));
    }

    #[test]
    fn test_summary_without_duration() {
        let election = election(None);
        let now = chrono::Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let summary = summarize(&election, now);
        assert!(!summary.ended);
        assert_eq!(summary.end_time, None);
        assert_eq!(summary.remaining, None);
    }
}

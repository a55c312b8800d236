use std::env;
use std::ffi::OsStr;

use crate::amount_formatter::*;
use crate::constants::*;
use crate::database::models::*;
use crate::database::*;
use crate::errors::*;
use crate::goal_tracker::*;
use crate::notifications::*;
use crate::types::*;
use crate::utilities::*;

pub fn run() -> Result<()> {
    initialize()?;
    run_clap_matches(get_clap_matches())
}

fn initialize() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let proj_dirs = directories::ProjectDirs::from("io", "borsboom", clap::crate_name!())
        .chain_err(|| "Failed to determine user data directory")?;
    let mut default_database_file = proj_dirs.data_dir().to_path_buf();
    default_database_file.push(DEFAULT_DATABASE_FILENAME);

    default_env(DATABASE_FILE_ENV, default_database_file);
    default_env(USER_ID_ENV, DEFAULT_USER_ID);
    default_env(CURRENCY_SYMBOL_ENV, DEFAULT_CURRENCY_SYMBOL);

    Ok(())
}

fn get_clap_matches() -> clap::ArgMatches<'static> {
    let goal_id_arg = || {
        clap::Arg::with_name(GOAL_ID_ARG)
            .help("Savings goal ID (see 'list')")
            .required(true)
            .validator(|value| {
                parse_goal_id(&value)
                    .map(|_| ())
                    .map_err(|err| err.to_string())
            })
    };
    let amount_arg = |name: &'static str, help: &'static str| {
        clap::Arg::with_name(name)
            .help(help)
            .required(true)
            .validator(|value| {
                parse_amount(&value)
                    .map(|_| ())
                    .map_err(|err| err.to_string())
            })
    };
    clap::App::new(clap::crate_name!())
        .version(option_env!("CI_BUILD_VERSION").unwrap_or(clap::crate_version!()))
        .author(clap::crate_authors!())
        .about(clap::crate_description!())
        .setting(clap::AppSettings::SubcommandRequiredElseHelp)
        .arg(
            clap::Arg::with_name(DATABASE_FILE_ARG)
                .env(DATABASE_FILE_ENV)
                .long(DATABASE_FILE_ARG)
                .value_name("PATH")
                .help("Set the database file where goals and deposits are stored")
                .takes_value(true)
                .global(true),
        )
        .arg(
            clap::Arg::with_name(USER_ID_ARG)
                .env(USER_ID_ENV)
                .long(USER_ID_ARG)
                .value_name("ID")
                .help("User whose goals are shown and changed")
                .takes_value(true)
                .global(true),
        )
        .arg(
            clap::Arg::with_name(CURRENCY_SYMBOL_ARG)
                .env(CURRENCY_SYMBOL_ENV)
                .long(CURRENCY_SYMBOL_ARG)
                .value_name("SYMBOL")
                .help("Currency symbol used when displaying amounts")
                .takes_value(true)
                .global(true),
        )
        .subcommand(clap::SubCommand::with_name(LIST_COMMAND).about("List savings goals"))
        .subcommand(
            clap::SubCommand::with_name(ADD_COMMAND)
                .about("Create a new savings goal")
                .arg(
                    clap::Arg::with_name(NAME_ARG)
                        .help("Goal name")
                        .required(true),
                )
                .arg(amount_arg(TARGET_ARG, "Target amount"))
                .arg(
                    clap::Arg::with_name(DEADLINE_ARG)
                        .long(DEADLINE_ARG)
                        .value_name("YYYY-MM-DD")
                        .help("Advisory deadline for reaching the target")
                        .takes_value(true)
                        .validator(|value| {
                            parse_iso_date(&value)
                                .map(|_| ())
                                .map_err(|err| err.to_string())
                        }),
                )
                .arg(
                    clap::Arg::with_name(DESCRIPTION_ARG)
                        .long(DESCRIPTION_ARG)
                        .value_name("TEXT")
                        .help("Free-form description")
                        .takes_value(true),
                ),
        )
        .subcommand(
            clap::SubCommand::with_name(UPDATE_COMMAND)
                .about("Set the total amount saved towards a goal")
                .arg(goal_id_arg())
                .arg(amount_arg(AMOUNT_ARG, "New total saved (not the change)")),
        )
        .subcommand(
            clap::SubCommand::with_name(DELETE_COMMAND)
                .about("Delete a savings goal and its deposits")
                .arg(goal_id_arg())
                .arg(
                    clap::Arg::with_name(YES_ARG)
                        .long(YES_ARG)
                        .short("y")
                        .help("Confirm the deletion (without this, nothing is deleted)"),
                ),
        )
        .subcommand(
            clap::SubCommand::with_name(DEPOSITS_COMMAND)
                .about("List the deposits recorded for a goal")
                .arg(goal_id_arg()),
        )
        .get_matches()
}

fn run_clap_matches(matches: clap::ArgMatches) -> Result<()> {
    let user_id = UserId::new(
        matches
            .value_of(USER_ID_ARG)
            .expect("CLAP matches should have USER_ID_ARG"),
    );
    let currency_format = CurrencyFormat::with_symbol(
        matches
            .value_of(CURRENCY_SYMBOL_ARG)
            .expect("CLAP matches should have CURRENCY_SYMBOL_ARG"),
    );
    let formatter = AmountFormatter::new(&currency_format);
    let database = Database::establish_connection(
        matches
            .value_of(DATABASE_FILE_ARG)
            .expect("CLAP matches should have DATABASE_FILE_ARG"),
    )?;
    let (notification_sender, notification_inbox) = notification_channel();
    let tracker = GoalTracker::new(&database, &notification_sender, &user_id, &formatter);

    let result = match matches.subcommand() {
        (LIST_COMMAND, Some(_)) => list_goals(&tracker, &formatter),
        (ADD_COMMAND, Some(sub_matches)) => add_goal(&tracker, &formatter, sub_matches),
        (UPDATE_COMMAND, Some(sub_matches)) => update_goal(&tracker, &formatter, sub_matches),
        (DELETE_COMMAND, Some(sub_matches)) => delete_goal(&tracker, sub_matches),
        (DEPOSITS_COMMAND, Some(sub_matches)) => {
            list_deposits(&tracker, &formatter, sub_matches)
        }
        _ => unreachable!("CLAP should require a known subcommand"),
    };
    for notification in notification_inbox.drain() {
        println!("\n*** {} ***\n{}", notification.title, notification.body);
    }
    result
}

fn list_goals<S: GoalStore>(tracker: &GoalTracker<S>, formatter: &AmountFormatter) -> Result<()> {
    let goals = tracker.list_goals()?;
    if goals.is_empty() {
        println!("No savings goals yet; create one with '{}'.", ADD_COMMAND);
        return Ok(());
    }
    for goal in goals {
        print_goal(&goal, formatter);
    }
    Ok(())
}

fn add_goal<S: GoalStore>(
    tracker: &GoalTracker<S>,
    formatter: &AmountFormatter,
    matches: &clap::ArgMatches,
) -> Result<()> {
    let goal = tracker.create_goal(NewSavingsGoal {
        name: matches
            .value_of(NAME_ARG)
            .expect("CLAP matches should have NAME_ARG")
            .to_string(),
        target_amount: parse_amount(
            matches
                .value_of(TARGET_ARG)
                .expect("CLAP matches should have TARGET_ARG"),
        )?,
        deadline: matches
            .value_of(DEADLINE_ARG)
            .map(parse_iso_date)
            .transpose()?,
        description: matches.value_of(DESCRIPTION_ARG).map(str::to_string),
    })?;
    println!("Created savings goal:");
    print_goal(&goal, formatter);
    Ok(())
}

fn update_goal<S: GoalStore>(
    tracker: &GoalTracker<S>,
    formatter: &AmountFormatter,
    matches: &clap::ArgMatches,
) -> Result<()> {
    let goal_id = parse_goal_id(
        matches
            .value_of(GOAL_ID_ARG)
            .expect("CLAP matches should have GOAL_ID_ARG"),
    )?;
    let new_amount = parse_amount(
        matches
            .value_of(AMOUNT_ARG)
            .expect("CLAP matches should have AMOUNT_ARG"),
    )?;
    match tracker.update_amount(goal_id, new_amount)? {
        UpdateOutcome::NotFound => {
            println!("No savings goal with ID {}; nothing to do!", goal_id);
        }
        UpdateOutcome::Updated { deposit, .. } => {
            println!(
                "Saved amount updated to {}.",
                formatter.format_amount(new_amount)
            );
            match deposit {
                DepositOutcome::NotRequired => {}
                DepositOutcome::Recorded(amount) => {
                    println!("  Recorded deposit of {}.", formatter.format_amount(amount))
                }
                DepositOutcome::Dropped(amount) => println!(
                    "  WARNING: deposit of {} could not be recorded.",
                    formatter.format_amount(amount)
                ),
            }
        }
    }
    if let Some(goal) = tracker
        .list_goals()?
        .into_iter()
        .find(|goal| goal.id == goal_id)
    {
        print_goal(&goal, formatter);
    }
    Ok(())
}

fn delete_goal<S: GoalStore>(tracker: &GoalTracker<S>, matches: &clap::ArgMatches) -> Result<()> {
    let goal_id = parse_goal_id(
        matches
            .value_of(GOAL_ID_ARG)
            .expect("CLAP matches should have GOAL_ID_ARG"),
    )?;
    if !matches.is_present(YES_ARG) {
        println!(
            "Re-run with '--{}' to delete savings goal {} and all of its deposits.",
            YES_ARG, goal_id
        );
        return Ok(());
    }
    let outcome = tracker.delete_goal(goal_id)?;
    match outcome.deposits_deleted {
        Some(count) => println!("Deleted savings goal {} and {} deposit(s).", goal_id, count),
        None => println!(
            "Deleted savings goal {}, but its deposits could not be deleted.",
            goal_id
        ),
    }
    Ok(())
}

fn list_deposits<S: GoalStore>(
    tracker: &GoalTracker<S>,
    formatter: &AmountFormatter,
    matches: &clap::ArgMatches,
) -> Result<()> {
    let goal_id = parse_goal_id(
        matches
            .value_of(GOAL_ID_ARG)
            .expect("CLAP matches should have GOAL_ID_ARG"),
    )?;
    let deposits = tracker.list_deposits(goal_id)?;
    if deposits.is_empty() {
        println!("No deposits recorded for savings goal {}.", goal_id);
        return Ok(());
    }
    let mut total = Amount::zero();
    for deposit in &deposits {
        println!(
            "  {}  {:>14}",
            formatter.format_date(deposit.deposit_date),
            formatter.format_amount(deposit.amount)
        );
        total += deposit.amount;
    }
    println!("  {:>10}  {:>14}", "Total", formatter.format_amount(total));
    Ok(())
}

fn print_goal(goal: &SavingsGoal, formatter: &AmountFormatter) {
    println!(
        "{:>4}  {}{}",
        goal.id.0,
        goal.name,
        if goal.is_achieved() { " (achieved)" } else { "" }
    );
    println!(
        "      {} of {}  {}",
        formatter.format_amount(goal.current_amount),
        formatter.format_amount(goal.target_amount),
        formatter.format_progress_bar(goal.progress())
    );
    if let Some(deadline) = goal.deadline {
        println!("      Deadline: {}", formatter.format_date(deadline));
    }
    if let Some(description) = &goal.description {
        println!("      {}", description);
    }
}

fn default_env<V: AsRef<OsStr>>(var_name: &str, default_value: V) {
    if let Err(env::VarError::NotPresent) = env::var(var_name) {
        env::set_var(var_name, default_value);
    }
}

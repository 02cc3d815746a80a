mod controllers;
mod save;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, eyre, Result, WrapErr};
use env_logger::Env;
use log::{info, warn};
use rayon::prelude::*;

use kickoff_shared::*;
use kickoff_sim::{rollout, run_match, CurriculumPhase, EpisodeSummary, FootballEnv, Match};

use controllers::{resolve_controller, resolve_policy, CONTROLLER_HELP};
use save::SaveStore;

#[derive(Parser)]
#[command(name = "kickoff", about = "1v1 football arcade engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a match between two controllers
    Run {
        /// Red controller (striker, defender, chaser, idle, human:<keys.json>, onnx:<model.onnx>)
        #[arg(long, default_value = "striker")]
        red: String,

        /// Blue controller
        #[arg(long, default_value = "defender")]
        blue: String,

        /// Game config JSON (pitch, physics, clock, key bindings)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output path for replay JSON
        #[arg(long)]
        output: Option<PathBuf>,

        /// Save slot to resume from / pause into
        #[arg(long)]
        user: Option<String>,

        /// Continue the user's saved match instead of kicking off
        #[arg(long, requires = "user")]
        resume: bool,

        /// Pause once the match clock reaches this many ms and save
        #[arg(long, requires = "user")]
        stop_after_ms: Option<u64>,

        #[arg(long, default_value = "saves")]
        save_dir: PathBuf,
    },

    /// Round-robin tournament between controllers
    Tournament {
        /// Comma-separated controller names
        #[arg(long)]
        controllers: String,

        /// Matches per pairing; sides alternate between rounds
        #[arg(long, default_value_t = 2)]
        rounds: u32,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run training-environment episodes for a policy
    Rollout {
        /// chaser, idle or onnx:<model.onnx>
        #[arg(long, default_value = "chaser")]
        policy: String,

        /// Game config JSON; the pitch, physics and clock shape every episode
        #[arg(long)]
        config: Option<PathBuf>,

        /// Curriculum phase (0, 1 or 2)
        #[arg(long, default_value_t = 0)]
        phase: u8,

        #[arg(long, default_value_t = 16)]
        episodes: u32,

        /// First episode seed; episode i uses seed + i, wrapping at u64::MAX
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },

    /// Manage saved matches
    Saves {
        #[command(subcommand)]
        action: SavesAction,

        #[arg(long, default_value = "saves", global = true)]
        save_dir: PathBuf,
    },

    /// Validate a game config file
    CheckConfig { path: PathBuf },
}

#[derive(Subcommand)]
enum SavesAction {
    List,
    Show { user: String },
    Delete { user: String },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            red,
            blue,
            config,
            output,
            user,
            resume,
            stop_after_ms,
            save_dir,
        } => cmd_run(RunArgs {
            red,
            blue,
            config,
            output,
            user,
            resume,
            stop_after_ms,
            store: SaveStore::new(save_dir),
        }),

        Commands::Tournament {
            controllers,
            rounds,
            config,
        } => cmd_tournament(&controllers, rounds, config.as_deref()),

        Commands::Rollout {
            policy,
            config,
            phase,
            episodes,
            seed,
        } => cmd_rollout(&policy, config.as_deref(), phase, episodes, seed),

        Commands::Saves { action, save_dir } => cmd_saves(action, &SaveStore::new(save_dir)),

        Commands::CheckConfig { path } => {
            let config = load_config(Some(&path))?;
            println!(
                "{} is valid: {}x{} pitch, {} Hz, {} s matches",
                path.display(),
                config.sim.pitch.width,
                config.sim.pitch.height,
                config.sim.clock.tick_rate,
                config.sim.clock.match_duration_ms / 1000
            );
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    match path {
        Some(path) => {
            GameConfig::load(path).wrap_err_with(|| format!("loading config {}", path.display()))
        }
        None => Ok(GameConfig::default()),
    }
}

struct RunArgs {
    red: String,
    blue: String,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    user: Option<String>,
    resume: bool,
    stop_after_ms: Option<u64>,
    store: SaveStore,
}

fn cmd_run(args: RunArgs) -> Result<()> {
    let game = load_config(args.config.as_deref())?;
    let red = resolve_controller(&args.red, &game)?;
    let blue = resolve_controller(&args.blue, &game)?;
    let config = MatchConfig {
        red_name: red.name(),
        blue_name: blue.name(),
        sim_config: game.sim,
    };

    let saved = match (&args.user, args.resume) {
        (Some(user), true) => {
            let saved = args.store.load(user)?;
            if saved.is_none() {
                warn!("no saved match for {user}, kicking off a new one");
            }
            saved
        }
        _ => None,
    };

    let mut game = match saved {
        Some(saved) => Match::resume(config.clone(), &saved, red, blue)
            .wrap_err("resuming saved match")?,
        None => Match::new(config.clone(), red, blue)?,
    };

    if let (Some(limit_ms), Some(user)) = (args.stop_after_ms, &args.user) {
        game.play_until(limit_ms)?;
        if !game.is_finished() {
            let path = args.store.save(user, &game.save())?;
            let state = game.state();
            println!(
                "Paused at {:.1}s ({} {}-{} {}), saved to {}",
                state.elapsed_ms() as f32 / 1000.0,
                config.red_name,
                state.stadium.score_red,
                state.stadium.score_blue,
                config.blue_name,
                path.display()
            );
            return Ok(());
        }
    }

    let replay = game.play_out()?;
    print_result(&config, &replay.result);

    if let Some(user) = &args.user {
        args.store.delete(user)?;
    }

    if let Some(path) = args.output {
        let json = serde_json::to_string(&replay).wrap_err("serializing replay")?;
        std::fs::write(&path, json)
            .wrap_err_with(|| format!("writing replay to {}", path.display()))?;
        println!("\nReplay written to {}", path.display());
    }
    Ok(())
}

fn print_result(config: &MatchConfig, result: &MatchResult) {
    println!();
    println!("=== Full Time ===");
    println!(
        "{} {} - {} {}  ({:?})",
        config.red_name, result.score_red, result.score_blue, config.blue_name, result.outcome
    );
    println!(
        "Final tick: {} ({:.1}s)",
        result.final_tick,
        result.elapsed_ms as f32 / 1000.0
    );
    println!();
    println!("--- Stats ---");
    for (name, team) in [(&config.red_name, Team::Red), (&config.blue_name, Team::Blue)] {
        let s = result.stats.team(team);
        println!(
            "  {:<16} kicks={} passes={} dribbles={} tackles={} possession={:.1}s",
            name,
            s.kicks,
            s.passes,
            s.dribbles,
            s.tackles,
            config.sim_config.clock.ticks_to_ms(s.possession_ticks) as f32 / 1000.0
        );
    }
    println!("  out of bounds: {}", result.stats.out_of_bounds);
}

struct Fixture {
    red: usize,
    blue: usize,
}

fn cmd_tournament(names_str: &str, rounds: u32, config: Option<&Path>) -> Result<()> {
    let names: Vec<&str> = names_str.split(',').map(|s| s.trim()).collect();
    if names.len() < 2 {
        bail!("tournament needs at least 2 controllers ({CONTROLLER_HELP})");
    }
    let game = load_config(config)?;
    for name in &names {
        resolve_controller(name, &game)?;
    }

    let mut fixtures = Vec::new();
    for i in 0..names.len() {
        for j in (i + 1)..names.len() {
            for round in 0..rounds {
                let (red, blue) = if round % 2 == 0 { (i, j) } else { (j, i) };
                fixtures.push(Fixture { red, blue });
            }
        }
    }

    info!(
        "tournament: {} controllers, {} matches",
        names.len(),
        fixtures.len()
    );

    let results: Vec<(usize, usize, MatchResult)> = fixtures
        .par_iter()
        .map(|f| {
            let mut red = resolve_controller(names[f.red], &game)?;
            let mut blue = resolve_controller(names[f.blue], &game)?;
            let config = MatchConfig {
                red_name: names[f.red].to_string(),
                blue_name: names[f.blue].to_string(),
                sim_config: game.sim,
            };
            let replay = run_match(&config, &mut red, &mut blue)?;
            Ok((f.red, f.blue, replay.result))
        })
        .collect::<Result<_>>()?;

    let mut points: HashMap<usize, u32> = HashMap::new();
    let mut goal_diff: HashMap<usize, i64> = HashMap::new();
    for (red, blue, result) in &results {
        println!(
            "  {:<16} {} - {} {}",
            names[*red], result.score_red, result.score_blue, names[*blue]
        );
        *points.entry(*red).or_default() += result.outcome.points(Team::Red);
        *points.entry(*blue).or_default() += result.outcome.points(Team::Blue);
        let diff = i64::from(result.score_red) - i64::from(result.score_blue);
        *goal_diff.entry(*red).or_default() += diff;
        *goal_diff.entry(*blue).or_default() -= diff;
    }

    let mut table: Vec<usize> = (0..names.len()).collect();
    table.sort_by_key(|i| {
        (
            std::cmp::Reverse(points.get(i).copied().unwrap_or(0)),
            std::cmp::Reverse(goal_diff.get(i).copied().unwrap_or(0)),
        )
    });

    println!();
    println!("=== Tournament Table ===");
    println!("{:<20} {:>8} {:>6}", "Controller", "Points", "GD");
    println!("{:-<20} {:-<8} {:-<6}", "", "", "");
    for i in table {
        println!(
            "{:<20} {:>8} {:>+6}",
            names[i],
            points.get(&i).copied().unwrap_or(0),
            goal_diff.get(&i).copied().unwrap_or(0)
        );
    }
    Ok(())
}

/// Episode `i` runs with seed `seed + i`, wrapping past `u64::MAX`.
fn episode_seeds(seed: u64, episodes: u32) -> impl Iterator<Item = u64> {
    (0..u64::from(episodes)).map(move |i| seed.wrapping_add(i))
}

fn run_rollouts(
    policy: &str,
    config: &SimConfig,
    phase: CurriculumPhase,
    episodes: u32,
    seed: u64,
) -> Result<Vec<EpisodeSummary>> {
    config.validate().wrap_err("invalid rollout config")?;
    // fail fast on a bad name or model file before fanning out
    resolve_policy(policy, config)?;

    episode_seeds(seed, episodes)
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|episode_seed| {
            let mut env = FootballEnv::new(*config, phase, episode_seed);
            let mut agent = resolve_policy(policy, config)?;
            Ok(rollout(&mut env, agent.as_mut(), episode_seed)?)
        })
        .collect::<Result<Vec<_>>>()
}

fn cmd_rollout(
    policy: &str,
    config: Option<&Path>,
    phase: u8,
    episodes: u32,
    seed: u64,
) -> Result<()> {
    let phase = CurriculumPhase::from_index(phase)
        .ok_or_else(|| eyre!("curriculum phase must be 0, 1 or 2, got {phase}"))?;
    let game = load_config(config)?;
    let summaries = run_rollouts(policy, &game.sim, phase, episodes, seed)?;

    let n = summaries.len().max(1) as f32;
    let goals = summaries.iter().filter(|s| s.scored).count();
    let own_goals = summaries.iter().filter(|s| s.own_goal).count();
    let mean_reward = summaries.iter().map(|s| s.total_reward).sum::<f32>() / n;
    let mean_steps = summaries.iter().map(|s| s.steps as f32).sum::<f32>() / n;
    let kicks: u32 = summaries.iter().map(|s| s.kicks).sum();

    println!("=== Rollout: {policy} ({phase:?}) ===");
    println!("Episodes:    {}", summaries.len());
    println!("Goals:       {goals}");
    println!("Own goals:   {own_goals}");
    println!("Kicks:       {kicks}");
    println!("Mean steps:  {mean_steps:.1}");
    println!("Mean reward: {mean_reward:.3}");
    Ok(())
}

fn cmd_saves(action: SavesAction, store: &SaveStore) -> Result<()> {
    match action {
        SavesAction::List => {
            let users = store.list_users()?;
            if users.is_empty() {
                println!("No saves in {}", store.dir().display());
            }
            for user in users {
                println!("{user}");
            }
        }
        SavesAction::Show { user } => match store.load(&user)? {
            Some(saved) => println!("{}", serde_json::to_string_pretty(&saved)?),
            None => bail!("no saved match for {user}"),
        },
        SavesAction::Delete { user } => {
            store.delete(&user)?;
            println!("Deleted save for {user}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_episode_seeds_wrap() {
        let seeds: Vec<u64> = episode_seeds(u64::MAX - 1, 3).collect();
        assert_eq!(seeds, vec![u64::MAX - 1, u64::MAX, 0]);
        assert_eq!(episode_seeds(7, 0).count(), 0);
    }

    #[test]
    fn test_rollouts_use_the_given_config() {
        let summaries =
            run_rollouts("idle", &SimConfig::default(), CurriculumPhase::Near, 2, u64::MAX).unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].seed, u64::MAX);
        assert_eq!(summaries[1].seed, 0);

        let mut wide = SimConfig::default();
        wide.pitch.width = 1_600.0;
        let summaries = run_rollouts("chaser", &wide, CurriculumPhase::Near, 1, 3).unwrap();
        assert_eq!(summaries.len(), 1);

        let mut broken = SimConfig::default();
        broken.clock.tick_rate = 0;
        assert!(run_rollouts("chaser", &broken, CurriculumPhase::Near, 1, 3).is_err());
        assert!(run_rollouts("striker", &wide, CurriculumPhase::Near, 1, 3).is_err());
    }
}

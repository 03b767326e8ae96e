// cadence: command-line driver for the audio engine.
//
// Lists backends, runs the positional sound test and plays files as a
// looping playlist on whichever backend discovery picks.

mod logging;

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use cadence_audio::config::CONFIG_FILE;
use cadence_audio::{AudioConfig, AudioEngine, Discovery, Music, default_providers};
use clap::{Parser, Subcommand};
use log::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "cadence", about = "Audio engine diagnostics and playlist player")]
struct Args {
    /// Path to the audio config JSON file.
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Show debug logs.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the default configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// List compiled-in backends and the one discovery selects.
    Backends,

    /// Play a file once from each diagnostic listener position.
    Test {
        file: String,

        /// Update ticks to run before closing.
        #[arg(long, default_value_t = 180)]
        ticks: u64,

        /// Milliseconds between ticks.
        #[arg(long, default_value_t = 16)]
        tick_ms: u64,
    },

    /// Play files in order, looping, as a playlist.
    Play {
        #[arg(required = true)]
        files: Vec<String>,

        /// Playlist name.
        #[arg(long, default_value = "cli")]
        name: String,

        /// Update ticks to run before closing.
        #[arg(long, default_value_t = 3600)]
        ticks: u64,

        /// Milliseconds between ticks.
        #[arg(long, default_value_t = 16)]
        tick_ms: u64,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(args.verbose);
    debug!("Command-line args: {args:?}");

    match args.command {
        Command::Init { force } => init_config(&args.config, force),
        Command::Backends => {
            let config = load_config(&args.config)?;
            list_backends(&config);
            Ok(())
        }
        Command::Test {
            file,
            ticks,
            tick_ms,
        } => {
            let config = load_config(&args.config)?;
            let mut engine = AudioEngine::get_engine(&config);
            engine.test_audio(&file)?;
            pump(&mut engine, ticks, tick_ms, |_| {});
            engine.close()?;
            Ok(())
        }
        Command::Play {
            files,
            name,
            ticks,
            tick_ms,
        } => {
            let config = load_config(&args.config)?;
            play(&config, &name, &files, ticks, tick_ms)
        }
    }
}

fn load_config(path: &Path) -> Result<AudioConfig> {
    let config = AudioConfig::load_from(path)?;
    info!("Using audio config {}", path.display());
    Ok(config)
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    AudioConfig::default()
        .save_to(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote default audio config to {}", path.display());
    Ok(())
}

fn list_backends(config: &AudioConfig) {
    for provider in default_providers() {
        println!("{}", provider.name());
    }
    println!("dummy (fallback)");

    let engine = AudioEngine::get_engine(config);
    match engine.discovery() {
        Discovery::Provider(name) => println!("selected: {name}"),
        Discovery::Fallback => println!("selected: dummy (no provider available)"),
    }
}

fn play(
    config: &AudioConfig,
    name: &str,
    files: &[String],
    ticks: u64,
    tick_ms: u64,
) -> Result<()> {
    let mut engine = AudioEngine::get_engine(config);
    let playlist = engine.create_playlist(name)?;
    for file in files {
        playlist.borrow_mut().add_music(Music::from_file(file.as_str())?);
    }

    engine.play_playlist(name)?;
    let mut last_track: Option<String> = None;
    pump(&mut engine, ticks, tick_ms, |engine| {
        let Ok(playlist) = engine.playlist(name) else {
            return;
        };
        let now = playlist.borrow().now_playing().map(|m| m.name().to_string());
        if now != last_track {
            if let Some(track) = &now {
                info!("Now playing: {track}");
            }
            last_track = now;
        }
    });

    engine.close()?;
    Ok(())
}

/// Drive the engine like a game loop.
fn pump(engine: &mut AudioEngine, ticks: u64, tick_ms: u64, mut on_tick: impl FnMut(&AudioEngine)) {
    let interval = Duration::from_millis(tick_ms);
    for _ in 0..ticks {
        engine.update();
        on_tick(engine);
        thread::sleep(interval);
    }
}

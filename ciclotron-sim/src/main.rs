//! # Ciclotron Simulator
//!
//! Thermal cycler protocol editor and heating run simulator.
//!
//! Loads a protocol (or the built-in one), applies scripted edits, prints
//! the resulting screens and optionally simulates the heating run.
//!
//! ## Usage
//!
//! ```bash
//! # Show the built-in protocol
//! ciclotron-sim
//!
//! # Set stage 1 to 98°C for 3 minutes, then stretch the run to 20 minutes
//! ciclotron-sim --edit 1:98:180 --total 0:20:0
//!
//! # Run a protocol file, advancing 30 seconds per tick
//! ciclotron-sim --protocol protocol.toml --run --tick 30
//! ```

mod config;
mod controller;
mod display;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, info};

use ciclotron_core::editor::EditField;
use ciclotron_core::state::{Event, View};

use controller::{Controller, InputEvent};
use display::{Renderer, RunStatus};

/// Ciclotron - thermal cycler protocol simulator
#[derive(Parser)]
#[command(name = "ciclotron-sim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Protocol TOML file (built-in protocol if omitted)
    #[arg(short, long, value_name = "FILE")]
    protocol: Option<PathBuf>,

    /// Edit a stage: 1-based index, temperature (°C) and duration (s)
    #[arg(short, long = "edit", value_name = "INDEX:TEMP:DURATION", value_parser = parse_stage_edit)]
    edits: Vec<StageEdit>,

    /// Rescale all stages to a new total run time
    #[arg(short, long, value_name = "H:M:S", value_parser = parse_total_time)]
    total: Option<TotalTimeEdit>,

    /// Simulate the heating run after editing
    #[arg(short, long)]
    run: bool,

    /// Simulated seconds per tick
    #[arg(long, value_name = "SECONDS", default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    tick: u32,

    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Scripted single-stage edit
///
/// Values stay as text; the editor coerces them.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StageEdit {
    stage_num: usize,
    temperature: String,
    duration: String,
}

/// Scripted total-time edit
#[derive(Debug, Clone, PartialEq, Eq)]
struct TotalTimeEdit {
    hours: String,
    minutes: String,
    seconds: String,
}

fn parse_stage_edit(s: &str) -> Result<StageEdit, String> {
    let mut parts = s.splitn(3, ':');
    let (Some(index), Some(temperature), Some(duration)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected INDEX:TEMP:DURATION, got \"{s}\""));
    };
    let stage_num = index
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("invalid stage index \"{index}\""))?;
    if stage_num == 0 {
        return Err("stage index starts at 1".to_owned());
    }
    Ok(StageEdit {
        stage_num,
        temperature: temperature.to_owned(),
        duration: duration.to_owned(),
    })
}

fn parse_total_time(s: &str) -> Result<TotalTimeEdit, String> {
    let parts: Vec<&str> = s.split(':').collect();
    let [hours, minutes, seconds] = parts.as_slice() else {
        return Err(format!("expected H:M:S, got \"{s}\""));
    };
    Ok(TotalTimeEdit {
        hours: (*hours).to_owned(),
        minutes: (*minutes).to_owned(),
        seconds: (*seconds).to_owned(),
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let protocol = config::load(cli.protocol.as_deref()).with_context(|| match &cli.protocol {
        Some(path) => format!("Failed to load protocol {}", path.display()),
        None => "Failed to load built-in protocol".to_owned(),
    })?;

    let mut controller = Controller::new(protocol);
    let mut renderer = Renderer::new();

    show(&controller, &mut renderer);
    controller.process_input(InputEvent::Continue);
    show(&controller, &mut renderer);
    controller.process_input(InputEvent::NewExperiment);
    show(&controller, &mut renderer);

    for edit in &cli.edits {
        run_stage_edit(&mut controller, &mut renderer, edit)?;
    }
    if let Some(total) = &cli.total {
        run_total_edit(&mut controller, &mut renderer, total)?;
    }

    if cli.run {
        run_simulation(&mut controller, &mut renderer, cli.tick)?;
    }

    Ok(())
}

fn run_stage_edit(
    controller: &mut Controller,
    renderer: &mut Renderer,
    edit: &StageEdit,
) -> Result<()> {
    info!("Editing stage {}", edit.stage_num);
    if controller
        .process_input(InputEvent::SelectStage(edit.stage_num - 1))
        .is_none()
    {
        bail!(
            "Stage {} does not exist (protocol has {} stages)",
            edit.stage_num,
            controller.stages().len()
        );
    }

    controller.process_input(InputEvent::SetField(
        EditField::Temperature,
        edit.temperature.clone(),
    ));
    controller.process_input(InputEvent::SetField(
        EditField::Duration,
        edit.duration.clone(),
    ));
    show(controller, renderer);

    controller.process_input(InputEvent::Save);
    show(controller, renderer);
    Ok(())
}

fn run_total_edit(
    controller: &mut Controller,
    renderer: &mut Renderer,
    total: &TotalTimeEdit,
) -> Result<()> {
    info!("Editing total time");
    if controller.process_input(InputEvent::EditTotalTime).is_none() {
        bail!("Total time cannot be edited from {:?}", controller.view());
    }

    for (field, text) in [
        (EditField::Hours, &total.hours),
        (EditField::Minutes, &total.minutes),
        (EditField::Seconds, &total.seconds),
    ] {
        controller.process_input(InputEvent::SetField(field, text.clone()));
    }
    show(controller, renderer);

    controller.process_input(InputEvent::Save);
    show(controller, renderer);
    Ok(())
}

/// Tick the run until the results screen is shown
fn run_simulation(controller: &mut Controller, renderer: &mut Renderer, tick_s: u32) -> Result<()> {
    if controller.process_input(InputEvent::Start).is_none() {
        bail!("Run could not be started");
    }
    show(controller, renderer);

    let mut now_s: u64 = 0;
    loop {
        let event = controller.tick(tick_s);
        now_s += tick_s as u64;

        match event {
            Some(Event::StageAdvanced) | Some(Event::RunFinished) => {
                debug!("t={}s: {:?}", now_s, event);
                show(controller, renderer);
            }
            Some(Event::ShowResults) => {
                show(controller, renderer);
                break;
            }
            _ => {}
        }

        if controller.view() != View::Heating && controller.view() != View::RunComplete {
            break;
        }
    }

    info!("Simulation finished after {}s", now_s);
    Ok(())
}

/// Render the current view and print it
fn show(controller: &Controller, renderer: &mut Renderer) {
    render_current_view(controller, renderer);
    println!("{}\n", renderer.screen());
}

/// Render the screen for the controller's current view
fn render_current_view(controller: &Controller, renderer: &mut Renderer) {
    let label = controller.label();
    let scheduler = controller.scheduler();

    match controller.view() {
        View::Welcome => renderer.render_welcome(),
        View::Menu => renderer.render_menu(),
        View::Setup => {
            let stages = controller.stages();
            renderer.render_setup(
                label,
                &controller.chart(),
                stages.total_duration_s(),
                stages.is_configured(),
            );
        }
        View::EditStage => {
            if let Some((index, stage)) = controller.editing_stage() {
                let session = controller.session();
                renderer.render_edit_stage(
                    index + 1,
                    &stage.name,
                    session.field(EditField::Temperature).unwrap_or(""),
                    session.field(EditField::Duration).unwrap_or(""),
                );
            }
        }
        View::EditTotalTime => {
            let session = controller.session();
            renderer.render_edit_total(
                controller.stages().total_duration_s(),
                session.field(EditField::Hours).unwrap_or(""),
                session.field(EditField::Minutes).unwrap_or(""),
                session.field(EditField::Seconds).unwrap_or(""),
            );
        }
        View::Heating | View::Paused => {
            if let (Some(state), Some(stage)) = (scheduler.stage_state(), scheduler.current_stage())
            {
                let status = RunStatus {
                    stage_num: state.stage_index + 1,
                    total_stages: state.total_stages,
                    stage_name: stage.name.as_str(),
                    target_c: stage.temperature_c,
                    stage_remaining_s: state.remaining_s,
                    elapsed_s: scheduler.elapsed_s(),
                    total_s: scheduler.total_duration_s(),
                    progress_percent: scheduler.progress_percent(),
                    configured: scheduler.is_configured(),
                };
                if controller.view() == View::Heating {
                    renderer.render_heating(label, &status);
                } else {
                    renderer.render_paused(label, &status);
                }
            }
        }
        View::RunComplete => renderer.render_complete(
            label,
            scheduler.total_duration_s(),
            controller.redirect_remaining_s(),
        ),
        View::Results => renderer.render_results(
            label,
            scheduler.stages().len(),
            scheduler.total_duration_s(),
            scheduler.is_configured(),
        ),
    }
}

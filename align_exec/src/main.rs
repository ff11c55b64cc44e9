//! Align executable entry point.
//!
//! Drives a simulated vehicle to the target given in the align command parameters and archives
//! every cycle in the session directory.
//!
//! # Architecture
//!
//!     - Initialise the session, logger and parameters
//!     - Main loop:
//!         - Align command processing (reads the drivetrain, writes demands back)
//!         - Drivetrain simulation step
//!         - Finish check
//!     - Stop the drivetrain

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use serde::Deserialize;
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;
use color_eyre::{Report, eyre::{WrapErr, eyre}};

// Internal
use align_lib::{
    align_cmd::{self, AlignCmd},
    drive::{Drivetrain, SimDrive, SimDriveParams}
};
use util::{
    module::State,
    logger::{logger_init, LevelFilter},
    session::Session,
    time::period_to_duration
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Command line options.
#[derive(Debug, StructOpt)]
#[structopt(name = "align_exec", about = "Drive a simulated vehicle to an autopilot target")]
struct Opts {
    /// Align command parameter file, relative to the params directory
    #[structopt(long, default_value = "align_cmd.toml")]
    cmd_params: String,

    /// Executable parameter file, relative to the params directory
    #[structopt(long, default_value = "align_exec.toml")]
    exec_params: String,

    /// Run as fast as possible rather than in real time
    #[structopt(long)]
    fast: bool,

    /// Log every cycle
    #[structopt(short, long)]
    verbose: bool
}

/// Executable parameters.
#[derive(Debug, Deserialize)]
struct ExecParams {
    /// Time after which the command is interrupted
    max_duration_s: f64,

    /// Simulated drivetrain
    sim: SimDriveParams
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "align_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    let level = if opts.verbose { LevelFilter::Trace } else { LevelFilter::Info };
    logger_init(level, &session)
        .wrap_err("Failed to initialise logging")?;

    info!("Autopilot Align Executable\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI options: {:?}", opts);

    // ---- LOAD PARAMETERS ----

    let cmd_params: align_cmd::Params = util::params::load(&opts.cmd_params)
        .wrap_err("Could not load align command params")?;
    let exec_params: ExecParams = util::params::load(&opts.exec_params)
        .wrap_err("Could not load exec params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE MODULES ----

    let mut align = AlignCmd::init(cmd_params, &session)
        .wrap_err("Failed to initialise the align command")?;

    let period_s = align.controller().period_s();
    let cycle_period = period_to_duration(period_s)
        .ok_or_else(|| eyre!("Invalid control period: {} s", period_s))?;

    let mut drive = SimDrive::from_params(&exec_params.sim, period_s);

    info!("Initialisation complete, cycle period {} s\n", period_s);

    // ---- MAIN LOOP ----

    let max_cycles = (exec_params.max_duration_s / period_s).ceil() as u64;
    let mut finished = false;

    while align.num_cycles() < max_cycles {
        let cycle_start_instant = Instant::now();

        // ---- ALIGN COMMAND ----

        let report = align.execute(&mut drive)
            .wrap_err("Align command processing failed")?;

        debug!("{:?}", report);

        // ---- DRIVETRAIN ----

        drive.step();

        if align.is_finished(&drive.get_pose()) {
            finished = true;
            break;
        }

        // ---- CYCLE MANAGEMENT ----

        if opts.fast {
            continue;
        }

        let cycle_dur = Instant::now() - cycle_start_instant;

        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => thread::sleep(d),
            None => warn!(
                "Cycle overran by {:.06} s",
                cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
            )
        }
    }

    // ---- SHUTDOWN ----

    align.end(&mut drive, !finished);

    let pose = drive.get_pose();
    info!(
        "Final pose: ({:.3}, {:.3}) m, {:.3} rad",
        pose.position_m.x, pose.position_m.y, pose.get_heading()
    );

    if !finished {
        warn!("Target not reached within {} s", exec_params.max_duration_s);
    }

    info!("End of execution");

    Ok(())
}

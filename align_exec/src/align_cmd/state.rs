//! Implementations for the AlignCmd state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace};
use nalgebra::{UnitComplex, Vector2};
use serde::Serialize;

// Internal
use super::{AlignCmdError, Params};
use crate::drive::Drivetrain;
use autopilot::{Controller, Pose, Route, Target};
use util::{
    archive::{ArchiveError, Archived, Archiver},
    module::State,
    session::Session
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Align command state
pub struct AlignCmd {
    controller: Controller,

    target: Target,

    /// Number of cycles processed since the command was created
    num_cycles: u64,

    last_input: Option<InputData>,

    pub(crate) output: Option<OutputData>,

    pub(crate) report: Option<StatusReport>,

    arch: Archiver
}

/// Input data to the align command.
#[derive(Debug, Clone, Copy)]
pub struct InputData {
    /// Current field-relative pose of the vehicle
    pub pose: Pose,

    /// Current field-relative velocity of the vehicle
    pub velocity_ms: Vector2<f64>
}

/// Demands which the drivetrain must execute.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct OutputData {
    pub vx_ms: f64,

    pub vy_ms: f64,

    pub heading_rad: f64
}

/// Status report for align command processing.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct StatusReport {
    /// The route taken on this cycle
    pub route: Route,

    /// Distance to the target position
    pub dist_m: f64,

    /// True if the vehicle is within the profile's tolerances of the target
    pub at_target: bool
}

/// One row of the archive.
#[derive(Serialize)]
struct ArchRecord {
    time_s: f64,
    x_m: f64,
    y_m: f64,
    heading_rad: f64,
    vx_ms: f64,
    vy_ms: f64,
    target_heading_rad: f64,
    route: Route,
    dist_m: f64,
    at_target: bool
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for AlignCmd {
    type InitData = Params;
    type InitError = AlignCmdError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = AlignCmdError;

    /// Initialise the align command from its parameters.
    ///
    /// If archiving is enabled the cycle records are written to
    /// `align_cmd/align_cmd.csv` in the session's archive.
    fn init(init_data: Self::InitData, session: &Session)
        -> Result<Self, Self::InitError>
    {
        let controller = init_data.profile
            .to_controller()
            .map_err(AlignCmdError::InvalidParams)?;
        let target = init_data.target
            .to_target()
            .map_err(AlignCmdError::InvalidParams)?;

        let mut cmd = Self::new(controller, target);

        if init_data.archive {
            let arch = Archiver::from_path(session, "align_cmd/align_cmd.csv")
                .map_err(AlignCmdError::ArchiveInitError)?;
            cmd = cmd.with_archiver(arch);
        }

        Ok(cmd)
    }

    /// Run the autopilot for one cycle.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let pose = &input_data.pose;

        let result = self.controller.calculate(
            pose,
            &input_data.velocity_ms,
            &self.target
        );

        let output = OutputData {
            vx_ms: result.vx_ms,
            vy_ms: result.vy_ms,
            heading_rad: result.target_heading.angle()
        };

        let report = StatusReport {
            route: self.controller.route(pose, &self.target),
            dist_m: pose.distance_to(self.target.reference()),
            at_target: self.controller.at_target(pose, &self.target)
        };

        let was_at_target = self.report.map(|r| r.at_target).unwrap_or(false);
        if report.at_target && !was_at_target {
            info!("Target reached after {} cycles", self.num_cycles + 1);
        }

        trace!("AlignCmd output: {:?}, report: {:?}", output, report);

        self.last_input = Some(*input_data);
        self.output = Some(output);
        self.report = Some(report);
        self.num_cycles += 1;

        if self.arch.is_init() {
            self.write().map_err(AlignCmdError::ArchiveWriteError)?;
        }

        Ok((output, report))
    }
}

impl Archived for AlignCmd {
    fn write(&mut self) -> Result<(), ArchiveError> {
        let (input, output, report) = match (self.last_input, self.output, self.report) {
            (Some(i), Some(o), Some(r)) => (i, o, r),
            // Nothing processed yet
            _ => return Ok(())
        };

        self.arch.serialise(ArchRecord {
            time_s: (self.num_cycles - 1) as f64 * self.controller.period_s(),
            x_m: input.pose.position_m.x,
            y_m: input.pose.position_m.y,
            heading_rad: input.pose.get_heading(),
            vx_ms: output.vx_ms,
            vy_ms: output.vy_ms,
            target_heading_rad: output.heading_rad,
            route: report.route,
            dist_m: report.dist_m,
            at_target: report.at_target
        })
    }
}

impl AlignCmd {
    /// Create a new command driving to `target` without archiving.
    pub fn new(controller: Controller, target: Target) -> Self {
        Self {
            controller,
            target,
            num_cycles: 0,
            last_input: None,
            output: None,
            report: None,
            arch: Archiver::default()
        }
    }

    /// Archive every processed cycle with the given archiver.
    pub fn with_archiver(mut self, arch: Archiver) -> Self {
        self.arch = arch;
        self
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn num_cycles(&self) -> u64 {
        self.num_cycles
    }

    /// Replace the target. The next cycle drives toward the new target.
    pub fn retarget(&mut self, target: Target) {
        let r = target.reference();
        info!(
            "New align target: ({:.3}, {:.3}) m, {:.3} rad",
            r.position_m.x, r.position_m.y, r.get_heading()
        );

        self.target = target;
        self.report = None;
    }

    /// Returns true once the pose is within tolerance of the target.
    pub fn is_finished(&self, pose: &Pose) -> bool {
        self.controller.at_target(pose, &self.target)
    }

    /// Read the drivetrain, run one cycle and send the demands back.
    pub fn execute<D: Drivetrain>(
        &mut self, drive: &mut D
    ) -> Result<StatusReport, AlignCmdError> {
        let input = InputData {
            pose: drive.get_pose(),
            velocity_ms: drive.get_field_relative_speeds()
        };

        let (output, report) = self.proc(&input)?;

        drive.set_field_relative_speeds(
            output.vx_ms,
            output.vy_ms,
            UnitComplex::new(output.heading_rad)
        );

        Ok(report)
    }

    /// Stop the drivetrain at the end of the command.
    pub fn end<D: Drivetrain>(&mut self, drive: &mut D, interrupted: bool) {
        drive.stop();

        if interrupted {
            info!("Align command interrupted after {} cycles", self.num_cycles);
        }
        else {
            debug!("Align command ended after {} cycles", self.num_cycles);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::drive::SimDrive;
    use approx::assert_relative_eq;
    use autopilot::{Constraints, Profile};

    fn test_controller() -> Controller {
        let profile = Profile::new(Constraints::new(2.0, 1.0, 1.0))
            .with_error_xy(0.05)
            .with_error_theta(0.05);

        Controller::new(profile)
    }

    #[test]
    fn test_proc_first_cycle() {
        let mut cmd = AlignCmd::new(
            test_controller(),
            Target::new(Pose::new(1.0, 0.0, 0.0))
        );

        let input = InputData {
            pose: Pose::default(),
            velocity_ms: Vector2::zeros()
        };

        let (output, report) = cmd.proc(&input).unwrap();

        assert_relative_eq!(output.vx_ms, 0.02, epsilon = 1e-12);
        assert_relative_eq!(output.vy_ms, 0.0, epsilon = 1e-12);
        assert_relative_eq!(output.heading_rad, 0.0, epsilon = 1e-12);

        assert_eq!(report.route, Route::Beeline);
        assert_relative_eq!(report.dist_m, 1.0, epsilon = 1e-12);
        assert!(!report.at_target);
        assert_eq!(cmd.num_cycles(), 1);
    }

    #[test]
    fn test_proc_at_target() {
        let target = Target::new(Pose::new(1.0, 2.0, 0.5));
        let mut cmd = AlignCmd::new(test_controller(), target);

        let input = InputData {
            pose: Pose::new(1.0, 2.0, 0.5),
            velocity_ms: Vector2::zeros()
        };

        let (output, report) = cmd.proc(&input).unwrap();

        assert_eq!(output.vx_ms, 0.0);
        assert_eq!(output.vy_ms, 0.0);
        assert_relative_eq!(output.heading_rad, 0.5, epsilon = 1e-12);
        assert_eq!(report.route, Route::Arrived);
        assert!(report.at_target);
        assert!(cmd.is_finished(&input.pose));
    }

    #[test]
    fn test_retarget() {
        let mut cmd = AlignCmd::new(
            test_controller(),
            Target::new(Pose::new(1.0, 0.0, 0.0))
        );
        let pose = Pose::new(1.0, 0.0, 0.0);

        assert!(cmd.is_finished(&pose));

        cmd.retarget(Target::new(Pose::new(0.0, -1.0, 0.0)));
        assert!(!cmd.is_finished(&pose));

        let (output, _) = cmd.proc(&InputData {
            pose,
            velocity_ms: Vector2::zeros()
        }).unwrap();

        // Heads off toward the new target
        assert_relative_eq!(output.vx_ms, -0.02 / 2f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(output.vy_ms, -0.02 / 2f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_drives_sim_to_target() {
        let controller = test_controller();
        let mut sim = SimDrive::new(Pose::default(), 2.0, controller.period_s());
        let mut cmd = AlignCmd::new(controller, Target::new(Pose::new(5.0, 0.0, 0.0)));

        let mut finished = false;
        for _ in 0..1500 {
            let report = cmd.execute(&mut sim).unwrap();
            assert!(sim.get_field_relative_speeds().norm() <= 2.0 + 1e-9);
            assert!(report.dist_m <= 5.0 + 1e-9);

            sim.step();

            if cmd.is_finished(&sim.get_pose()) {
                finished = true;
                break;
            }
        }

        cmd.end(&mut sim, !finished);

        assert!(finished);
        assert_eq!(sim.get_field_relative_speeds(), Vector2::zeros());
        assert!(sim.get_pose().distance_to(cmd.target().reference()) <= 0.05);
    }

    #[test]
    fn test_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("align_cmd.csv");

        let mut cmd = AlignCmd::new(
            test_controller(),
            Target::new(Pose::new(1.0, 0.0, 0.0))
        ).with_archiver(Archiver::from_file_path(&path).unwrap());

        // No record before the first cycle
        cmd.write().unwrap();

        let mut sim = SimDrive::new(Pose::default(), 1.0, cmd.controller().period_s());
        for _ in 0..3 {
            cmd.execute(&mut sim).unwrap();
            sim.step();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "time_s,x_m,y_m,heading_rad,vx_ms,vy_ms,target_heading_rad,route,dist_m,at_target"
        );
        assert!(lines[1].starts_with("0.0,0.0,0.0,0.0,0.02,"));
        assert!(lines[3].contains(",Beeline,"));
        assert!(lines[3].ends_with(",false"));
    }
}

//! The episode environment: owns one needle, the ordered gates, and the
//! tissue surfaces, and drives the `reset`/`step` protocol.

use std::collections::VecDeque;
use std::path::PathBuf;

use crate::error::SimError;
use crate::gate::{Gate, GateStatus};
use crate::level::Level;
use crate::needle::Needle;
use crate::scene::{Color, Frame, FrameRenderer, Scene};
use crate::surface::Surface;

/// How observations are produced.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ObservationMode {
    /// Flattened numeric state vector (length `9 + n_gates`).
    State,
    /// Rolling stack of rendered frames; requires a [`FrameRenderer`].
    RgbArray,
}

/// One observation, shaped by the configured [`ObservationMode`].
#[derive(Clone, Debug)]
pub enum Observation {
    State(Vec<f32>),
    Frames(Vec<Frame>),
}

/// Environment configuration.
#[derive(Clone, Debug)]
pub struct EnvConfig {
    pub mode: ObservationMode,
    /// Depth of the frame stack in `RgbArray` mode.
    pub stack_size: usize,
    /// Episode ends once `t` exceeds this.
    pub max_time: u32,
    /// Action dimensionality: 1 (heading delta) or 2 (linear + angular).
    pub action_dim: usize,
    /// Directory for diagnostic frame captures.
    pub out_dir: PathBuf,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            mode: ObservationMode::State,
            stack_size: 1,
            max_time: 150,
            action_dim: 1,
            out_dir: PathBuf::from("out"),
        }
    }
}

/// Outcome of advancing the gate sequence for one step.
enum GateProgress {
    /// All gates were already resolved before this step.
    Done,
    Status(GateStatus),
}

/// The simulation environment.
///
/// Single-threaded and synchronous: each [`step`](Environment::step) fully
/// completes before the next call. Parallel rollouts need one independent
/// `Environment` each.
pub struct Environment {
    pub width: f64,
    pub height: f64,
    pub needle: Needle,
    pub gates: Vec<Gate>,
    pub surfaces: Vec<Surface>,
    /// Index of the gate currently holding [`GateStatus::Next`]; `None` once
    /// every gate is resolved.
    pub next_gate: Option<usize>,
    /// Steps taken this episode.
    pub t: u32,
    /// Cumulative damage this episode, for the termination cap.
    pub damage: f64,
    pub done: bool,
    pub total_reward: f64,
    pub last_reward: f64,
    /// Episodes started since construction.
    pub episode: u32,
    level: Level,
    config: EnvConfig,
    last_dist: Option<f64>,
    record: bool,
    stack: VecDeque<Frame>,
    renderer: Option<Box<dyn FrameRenderer>>,
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("needle", &self.needle)
            .field("gates", &self.gates)
            .field("surfaces", &self.surfaces)
            .field("next_gate", &self.next_gate)
            .field("t", &self.t)
            .field("damage", &self.damage)
            .field("done", &self.done)
            .field("total_reward", &self.total_reward)
            .field("last_reward", &self.last_reward)
            .field("episode", &self.episode)
            .finish_non_exhaustive()
    }
}

impl Environment {
    pub const BACKGROUND: Color = [99.0, 153.0, 174.0];
    const NEXT_GATE_HIGHLIGHT: Color = [0.0, 255.0, 0.0];
    /// Capture frames on the first episode and every `RECORD_INTERVAL`th.
    const RECORD_INTERVAL: u32 = 40;
    /// Within a recorded episode, capture every `RECORD_STEP_INTERVAL`th step.
    const RECORD_STEP_INTERVAL: u32 = 3;

    /// Creates an environment over a parsed level. `State` mode needs no
    /// renderer.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MissingRenderer`] when `RgbArray` mode is
    /// configured without one.
    pub fn new(level: Level, config: EnvConfig) -> Result<Self, SimError> {
        Self::with_renderer(level, config, None)
    }

    /// Creates an environment with an optional renderer. A renderer in
    /// `State` mode is still used for diagnostic captures.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MissingRenderer`] when `RgbArray` mode is
    /// configured without a renderer.
    pub fn with_renderer(
        level: Level,
        config: EnvConfig,
        renderer: Option<Box<dyn FrameRenderer>>,
    ) -> Result<Self, SimError> {
        if config.mode == ObservationMode::RgbArray && renderer.is_none() {
            return Err(SimError::MissingRenderer(config.mode));
        }
        let mut env = Self {
            width: level.width,
            height: level.height,
            needle: Needle::new(level.width, level.height),
            gates: Vec::new(),
            surfaces: Vec::new(),
            next_gate: None,
            t: 0,
            damage: 0.0,
            done: false,
            total_reward: 0.0,
            last_reward: 0.0,
            episode: 0,
            level,
            config,
            last_dist: None,
            record: false,
            stack: VecDeque::new(),
            renderer,
        };
        env.reset();
        Ok(env)
    }

    /// Loads a level file and builds an environment over it.
    ///
    /// # Errors
    ///
    /// Returns a [`SimError`] if the level fails to load or the configuration
    /// is inconsistent.
    pub fn from_file(path: impl AsRef<std::path::Path>, config: EnvConfig) -> Result<Self, SimError> {
        let level = Level::from_file(path)?;
        Self::with_renderer(level, config, None)
    }

    /// Starts a fresh episode: rebuilds gates and surfaces from the level
    /// record, recreates the needle at the start pose, zeroes the counters,
    /// and returns the initial observation.
    pub fn reset(&mut self) -> Observation {
        self.done = false;
        self.t = 0;
        self.damage = 0.0;
        self.last_dist = None;
        self.total_reward = 0.0;
        self.last_reward = 0.0;
        self.episode += 1;
        self.record = self.episode == 1 || self.episode % Self::RECORD_INTERVAL == 0;

        self.gates = self
            .level
            .gates
            .iter()
            .map(|spec| Gate::new(spec, self.width, self.height))
            .collect();
        self.next_gate = if self.gates.is_empty() { None } else { Some(0) };
        if let Some(first) = self.gates.first_mut() {
            first.activate();
        }
        self.surfaces = self
            .level
            .surfaces
            .iter()
            .map(|spec| Surface::new(spec, self.height))
            .collect();
        self.needle = Needle::new(self.width, self.height);

        match self.config.mode {
            ObservationMode::State => Observation::State(self.state_vector()),
            ObservationMode::RgbArray => {
                let frame = self.render_frame();
                self.stack = std::iter::repeat(frame)
                    .take(self.config.stack_size)
                    .collect();
                Observation::Frames(self.stack.iter().cloned().collect())
            }
        }
    }

    /// Advances one time step. Returns the new observation, the step reward,
    /// and whether the episode is over.
    pub fn step(&mut self, action: &[f32]) -> (Observation, f64, bool) {
        // The surface the tip is in *before* moving also receives the damage.
        let in_surface = {
            let tip = self.needle.tip();
            self.surfaces.iter().position(|s| s.contains(tip))
        };
        self.needle.advance(action, in_surface.is_some());
        let new_damage = match in_surface {
            Some(i) => self.surfaces[i].apply_damage(action),
            None => 0.0,
        };
        self.damage += new_damage;
        self.t += 1;

        let mut reward = 0.0;
        let mut done = false;

        match self.advance_gate_progress() {
            GateProgress::Done => done = true,
            GateProgress::Status(GateStatus::Passed) => reward += 10.0,
            GateProgress::Status(GateStatus::Failed) => reward -= 10.0,
            GateProgress::Status(_) => {}
        }

        // Distance shaping: reward approaching the next gate.
        if let Some(idx) = self.next_gate {
            let gate = &self.gates[idx];
            let dist = (self.needle.x - gate.x).hypot(self.needle.y - gate.y);
            if let Some(last) = self.last_dist {
                reward += (last - dist) / 1000.0;
            }
            self.last_dist = Some(dist);
        }

        if self.needle.x < 0.0
            || self.needle.x > self.width
            || self.needle.y < 0.0
            || self.needle.y > self.height
        {
            done = true;
        }

        if self.deep_tissue_intersect() {
            reward -= 100.0;
            done = true;
        }

        reward -= new_damage / 100.0;

        if self.damage > 100.0 {
            reward -= 50.0;
            done = true;
        }

        if self.t > self.config.max_time {
            done = true;
        }

        self.last_reward = reward;
        self.total_reward += reward;
        self.done = done;

        if self.record && self.t % Self::RECORD_STEP_INTERVAL == 0 {
            self.capture_frame();
        }

        let obs = match self.config.mode {
            ObservationMode::State => Observation::State(self.state_vector()),
            ObservationMode::RgbArray => {
                let frame = self.render_frame();
                self.stack.pop_front();
                self.stack.push_back(frame);
                Observation::Frames(self.stack.iter().cloned().collect())
            }
        };
        (obs, reward, done)
    }

    /// Uniform-random baseline action for the configured dimensionality.
    #[must_use]
    pub fn sample_action(&self) -> Vec<f32> {
        match self.config.action_dim {
            2 => vec![fastrand::f32(), fastrand::f32() * 2.0 - 1.0],
            _ => vec![fastrand::f32() * 2.0 - 1.0],
        }
    }

    /// Length of the state vector: `9 + n_gates`.
    #[must_use]
    pub fn state_size(&self) -> usize {
        9 + self.level.gates.len()
    }

    /// Flattened numeric state.
    ///
    /// Layout: normalized needle x, y, heading; raw (dx, dy, dw); one
    /// passed-flag per gate; normalized (x, y, heading) of the next target.
    /// Once every gate is resolved the target is a synthetic destination past
    /// the last gate (offset by 100 in both axes, heading 1).
    #[must_use]
    pub fn state_vector(&self) -> Vec<f32> {
        let (gate_x, gate_y, gate_w) = match self.next_gate {
            Some(idx) => {
                let g = &self.gates[idx];
                (
                    g.x / self.width,
                    g.y / self.height,
                    g.w / std::f64::consts::PI,
                )
            }
            None => match self.gates.last() {
                Some(g) => ((g.x + 100.0) / self.width, (g.y + 100.0) / self.height, 1.0),
                // Gate-free level: head for the far corner.
                None => (1.0, 1.0, 1.0),
            },
        };

        let mut state = Vec::with_capacity(self.state_size());
        state.push((self.needle.x / self.width) as f32);
        state.push((self.needle.y / self.height) as f32);
        state.push((self.needle.w / std::f64::consts::PI) as f32);
        state.push(self.needle.dx as f32);
        state.push(self.needle.dy as f32);
        state.push(self.needle.dw as f32);
        for gate in &self.gates {
            state.push(if gate.status() == GateStatus::Passed {
                1.0
            } else {
                0.0
            });
        }
        state.push(gate_x as f32);
        state.push(gate_y as f32);
        state.push(gate_w as f32);
        state
    }

    /// Resolves the active gate against the needle tip and advances the
    /// sequence on a terminal transition. The next unresolved gate (if any)
    /// becomes `Next`, keeping exactly one active gate.
    fn advance_gate_progress(&mut self) -> GateProgress {
        let Some(idx) = self.next_gate else {
            return GateProgress::Done;
        };
        let status = self.gates[idx].update_status(self.needle.tip());
        if status.is_terminal() {
            let next = idx + 1;
            if next < self.gates.len() {
                self.gates[next].activate();
                self.next_gate = Some(next);
            } else {
                self.next_gate = None;
            }
        }
        GateProgress::Status(status)
    }

    fn deep_tissue_intersect(&self) -> bool {
        let tip = self.needle.tip();
        self.surfaces.iter().any(|s| s.deep() && s.contains(tip))
    }

    /// Assembles the draw list for the current state: surfaces, then gates
    /// (with the active gate outlined), then the needle body and thread.
    #[must_use]
    pub fn scene(&self) -> Scene {
        let mut scene = Scene::new(self.width, self.height, Self::BACKGROUND);
        for surface in &self.surfaces {
            scene.push_polygon(surface.polygon().vertices().to_vec(), surface.color());
        }
        for gate in &self.gates {
            scene.push_polygon(gate.corners().to_vec(), gate.body_color());
            if gate.status() == GateStatus::Next {
                scene.push_outline(gate.corners().to_vec(), Self::NEXT_GATE_HIGHLIGHT, 20);
            }
            scene.push_polygon(gate.top().to_vec(), gate.top_color());
            scene.push_polygon(gate.bottom().to_vec(), gate.bottom_color());
        }
        scene.push_polygon(self.needle.corners().to_vec(), Needle::COLOR);
        if self.needle.trace().len() > 1 {
            scene.push_polyline(self.needle.trace().to_vec(), Needle::THREAD_COLOR, 10);
        }
        scene
    }

    fn render_frame(&mut self) -> Frame {
        let scene = self.scene();
        let Some(renderer) = self.renderer.as_mut() else {
            // Construction rejects RgbArray mode without a renderer.
            unreachable!("frame requested without a renderer");
        };
        renderer.render(&scene)
    }

    /// Diagnostic capture at the configured cadence; never fails the step.
    fn capture_frame(&mut self) {
        if self.t == 0 {
            return;
        }
        let scene = self.scene();
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        let frame = renderer.render(&scene);
        let path = self
            .config
            .out_dir
            .join(format!("{:06}_{:03}.png", self.episode, self.t));
        if let Err(err) = renderer.save(&frame, &path) {
            tracing::warn!(path = %path.display(), %err, "failed to save frame capture");
        }
    }
}

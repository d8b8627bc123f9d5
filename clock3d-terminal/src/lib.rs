/// Terminal-based ASCII driver for the 3D clock
use chrono::Local;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use clock3d_core::{Camera, ClockConfig, ClockModel, LabelSwitchController, StdFontSource};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Radians per arrow key press
const TILT_STEP: f32 = 0.1;

/// Main application struct for the terminal clock
pub struct TerminalApp {
    model: ClockModel,
    controller: LabelSwitchController,
    camera: Camera,
    renderer: AsciiRenderer,
    frame_rate: u32,
    status: Option<String>,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: &ClockConfig) -> anyhow::Result<Self> {
        let (width, height) = terminal::size()?;
        let model = ClockModel::from_config(config, StdFontSource)?;
        Ok(Self::with_model(model, config, width, height))
    }

    /// Build the app around an existing model without touching the terminal
    pub fn with_model(model: ClockModel, config: &ClockConfig, width: u16, height: u16) -> Self {
        // Terminal cells are roughly twice as tall as they are wide
        let camera = Camera::new(width as u32, height as u32 * 2);

        Self {
            model,
            controller: LabelSwitchController::new(config.initial_labels),
            camera,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            frame_rate: config.frame_rate.max(1),
            status: None,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn model(&self) -> &ClockModel {
        &self.model
    }

    pub fn controller(&self) -> &LabelSwitchController {
        &self.controller
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Last label failure shown in the status line
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / self.frame_rate as u64);

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            // Update
            self.update();

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        match event::read()? {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                self.handle_key(code);
            }
            _ => {}
        }
        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Up => self.model.tilt(TILT_STEP, 0.0),
            KeyCode::Down => self.model.tilt(-TILT_STEP, 0.0),
            KeyCode::Left => self.model.tilt(0.0, -TILT_STEP),
            KeyCode::Right => self.model.tilt(0.0, TILT_STEP),
            KeyCode::Char(key) => {
                if let Err(err) = self.controller.handle_key(key, &mut self.model) {
                    log::error!("label switch failed: {err}");
                    self.status = Some(err.to_string());
                }
            }
            _ => {}
        }
    }

    /// Advance the pointers to the current local time and settle pending numerals
    pub fn update(&mut self) {
        self.model.update_time(&Local::now());

        match self.model.pump() {
            Some(Ok(count)) => {
                log::debug!("{count} numerals attached");
                self.status = None;
            }
            Some(Err(err)) => {
                self.status = Some(format!("font {}: {err}", self.model.font_id()));
            }
            None => {}
        }
    }

    /// Rasterize the current frame into the renderer's buffers
    pub fn draw_frame(&mut self) {
        self.renderer.clear();
        self.renderer
            .render_scene(self.model.scene(), self.model.root(), &self.camera);
    }

    fn render(&mut self) -> io::Result<()> {
        self.draw_frame();

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let mut line = format!(
            "Clock3D | FPS: {:.1} | Numerals: {} | A/S/D=Numerals Arrows=Tilt Q=Quit",
            self.fps,
            self.controller.active()
        );
        if self.model.has_pending_labels() {
            line.push_str(" | loading font...");
        }
        if let Some(status) = &self.status {
            line.push_str(" | ");
            line.push_str(status);
        }
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(line),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

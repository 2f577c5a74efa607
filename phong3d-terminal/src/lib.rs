/// Terminal front-end: ASCII render step and interactive viewer loop
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use phong3d_core::{Model, PerspectiveCamera, Registry, Scene};
use std::io::{stdout, Write};
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub mod config;
pub mod renderer;

pub use config::ViewerConfig;
pub use renderer::{AsciiRenderer, Shading};

const ROTATE_STEP: f32 = 0.1;
const FOV_STEP: f32 = 5.0;
const FOV_RANGE: (f32, f32) = (10.0, 120.0);

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    config: ViewerConfig,
    scene: Scene,
    camera: PerspectiveCamera,
    renderer: AsciiRenderer,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(model: Model, config: ViewerConfig) -> anyhow::Result<Self> {
        let (width, height) = terminal::size()?;
        Self::with_size(model, config, width as usize, height as usize)
    }

    /// Build the viewer for a fixed character grid without touching the terminal.
    pub fn with_size(
        model: Model,
        config: ViewerConfig,
        width: usize,
        height: usize,
    ) -> anyhow::Result<Self> {
        let mut registry = Registry::new();

        let mut scene = Scene::new(&mut registry);
        let meshes = scene.add(model)?;

        let mut renderer = AsciiRenderer::new(&mut registry, width, height)
            .with_shading(Shading::from(&config));
        renderer.target = config.camera_target();

        let mut camera = PerspectiveCamera::new(
            &mut registry,
            config.fov,
            renderer.aspect(),
            config.near,
            config.far_plane(),
        );
        camera.camera.position = config.camera_position();

        info!(meshes, width, height, "viewer ready");

        Ok(Self {
            config,
            scene,
            camera,
            renderer,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> anyhow::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / u64::from(self.config.target_fps.max(1)));

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                match event::read()? {
                    Event::Key(KeyEvent {
                        code,
                        kind: KeyEventKind::Press,
                        ..
                    }) => self.handle_key(code),
                    Event::Resize(width, height) => self.resize(width as usize, height as usize),
                    _ => {}
                }
            }

            self.update();
            self.draw_frame()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    /// Apply one key press. The view's Z row points from the target back to
    /// the eye, so W moves along its negative.
    pub fn handle_key(&mut self, code: KeyCode) {
        let speed = self.config.move_speed;
        let moved = match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
                Ok(())
            }
            KeyCode::Char('w') => self.camera.camera.move_backward(speed).map(|_| ()),
            KeyCode::Char('s') => self.camera.camera.move_forward(speed).map(|_| ()),
            KeyCode::Char('a') => self.camera.camera.move_left(speed).map(|_| ()),
            KeyCode::Char('d') => self.camera.camera.move_right(speed).map(|_| ()),
            KeyCode::Char('r') => {
                self.camera.camera.move_up(speed);
                Ok(())
            }
            KeyCode::Char('f') => {
                self.camera.camera.move_down(speed);
                Ok(())
            }
            KeyCode::Left => {
                self.scene.world.rotate_y(-ROTATE_STEP);
                Ok(())
            }
            KeyCode::Right => {
                self.scene.world.rotate_y(ROTATE_STEP);
                Ok(())
            }
            KeyCode::Up => {
                self.scene.world.rotate_x(-ROTATE_STEP);
                Ok(())
            }
            KeyCode::Down => {
                self.scene.world.rotate_x(ROTATE_STEP);
                Ok(())
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.zoom(-FOV_STEP);
                Ok(())
            }
            KeyCode::Char('-') => {
                self.zoom(FOV_STEP);
                Ok(())
            }
            _ => Ok(()),
        };

        if let Err(e) = moved {
            warn!(error = %e, "camera movement skipped");
        }
    }

    fn zoom(&mut self, delta: f32) {
        self.camera.fov = (self.camera.fov + delta).clamp(FOV_RANGE.0, FOV_RANGE.1);
        self.camera.update_perspective();
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.renderer.resize(width, height);
        self.camera.aspect = self.renderer.aspect();
        self.camera.update_perspective();
    }

    /// Per-frame spin of the scene around +Y.
    pub fn update(&mut self) {
        self.scene.world.rotate_y(self.config.spin_speed);
    }

    /// Rasterize the current scene into the renderer's buffer.
    pub fn render(&mut self) -> usize {
        self.renderer.clear();
        self.renderer.render(&self.scene, &mut self.camera)
    }

    fn draw_frame(&mut self) -> anyhow::Result<()> {
        self.render();

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "phong3d | FPS: {:.1} | FOV: {:.0} | WASD=Move R/F=Up/Down Arrows=Rotate +/-=Zoom Q=Quit",
                self.fps, self.camera.fov
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phong3d_core::{Matrix4, ModelJson};

    fn app() -> TerminalApp {
        TerminalApp::with_size(
            Model::from(ModelJson::cube(2.0)),
            ViewerConfig::default(),
            40,
            20,
        )
        .unwrap()
    }

    #[test]
    fn test_first_frame_draws_cube() {
        let mut app = app();
        assert_eq!(app.scene().len(), 1);
        assert!(app.render() > 0);
        assert_ne!(app.renderer().char_at(20, 10), Some(' '));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        app.handle_key(KeyCode::Char('x'));
        assert!(app.is_running());
        app.handle_key(KeyCode::Esc);
        assert!(!app.is_running());
    }

    #[test]
    fn test_w_moves_towards_target() {
        let mut app = app();
        app.render();
        let before = app.camera().camera.position.magnitude();
        app.handle_key(KeyCode::Char('w'));
        let after = app.camera().camera.position.magnitude();
        assert!((before - after - 0.1).abs() < 1e-5);

        app.handle_key(KeyCode::Char('r'));
        assert!((app.camera().camera.position.y - (3.0 - 0.1 / 3.0f32.sqrt() + 0.1)).abs() < 1e-5);
    }

    #[test]
    fn test_zoom_updates_projection() {
        let mut app = app();
        let before = app.camera().projection[5];
        app.handle_key(KeyCode::Char('+'));
        assert_eq!(app.camera().fov, 40.0);
        assert!(app.camera().projection[5] > before);

        for _ in 0..50 {
            app.handle_key(KeyCode::Char('-'));
        }
        assert_eq!(app.camera().fov, 120.0);
    }

    #[test]
    fn test_spin_and_arrows_rotate_world() {
        let mut app = app();
        app.update();
        assert_ne!(app.scene().world, Matrix4::IDENTITY);

        let spun = app.scene().world;
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Left);
        let restored = app.scene().world;
        for i in 0..16 {
            assert!((spun[i] - restored[i]).abs() < 1e-5);
        }
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut app = app();
        app.resize(100, 25);
        assert_eq!(app.renderer().size(), (100, 25));
        assert!((app.camera().aspect - 2.0).abs() < 1e-6);
    }
}

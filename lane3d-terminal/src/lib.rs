/// Terminal front end: the bowling scene rasterized as ASCII art
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use lane3d_core::{Camera, KeyframeTweener, Light, SceneConfig, TweenState};
use log::{debug, info};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod bowling;
pub mod renderer;

pub use bowling::BowlingScene;
pub use renderer::AsciiRenderer;

/// Rows reserved above the picture for the status line
const HUD_ROWS: u16 = 1;

/// Wrap a library error so it can leave through `io::Result`
pub fn to_io_error<E>(err: E) -> io::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    io::Error::new(io::ErrorKind::Other, err)
}

/// Main application struct for the animated terminal scene
pub struct TerminalApp {
    scene: BowlingScene,
    tweener: KeyframeTweener,
    camera: Camera,
    light: Light,
    renderer: AsciiRenderer,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    /// Size the picture to the current terminal
    pub fn new(config: SceneConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Self::with_size(config, width, height)
    }

    pub fn with_size(config: SceneConfig, width: u16, height: u16) -> io::Result<Self> {
        let scene = BowlingScene::build().map_err(to_io_error)?;
        let sprites = scene.sprites().map_err(to_io_error)?;
        let tweener = KeyframeTweener::new(sprites, config.animation).map_err(to_io_error)?;

        let renderer = AsciiRenderer::new(
            width as usize,
            height.saturating_sub(HUD_ROWS) as usize,
        );
        let mut camera = config.camera;
        camera.set_aspect(renderer.aspect());

        Ok(Self {
            scene,
            tweener,
            camera,
            light: config.light,
            renderer,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
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
        let target_frame_time = self.tweener.frame_interval();
        info!("terminal loop running at {:?} per frame", target_frame_time);

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?)?;
            }

            self.update()?;
            self.present()?;

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

    fn handle_event(&mut self, event: Event) -> io::Result<()> {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press | KeyEventKind::Repeat,
                ..
            }) => self.handle_key(code),
            Event::Resize(width, height) => {
                self.resize(width, height);
                execute!(stdout(), terminal::Clear(ClearType::All))
            }
            _ => Ok(()),
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> io::Result<()> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char(' ') => self.restart()?,
            KeyCode::Char('x') => self.tweener.stop(),
            KeyCode::Up => self.camera.advance(1.0),
            KeyCode::Down => self.camera.advance(-1.0),
            KeyCode::Left => self.camera.turn(1.0),
            KeyCode::Right => self.camera.turn(-1.0),
            KeyCode::Char('a') => self.camera.strafe(-1.0),
            KeyCode::Char('d') => self.camera.strafe(1.0),
            KeyCode::Char('w') => self.camera.climb(1.0),
            KeyCode::Char('s') => self.camera.climb(-1.0),
            _ => {}
        }
        Ok(())
    }

    /// Put the scene back where it started and play the animation again
    pub fn restart(&mut self) -> io::Result<()> {
        self.tweener
            .restore_initial_pose(&mut self.scene.graph)
            .map_err(to_io_error)?;
        self.tweener.rewind();
        self.tweener.start();
        debug!("animation restarted");
        Ok(())
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.renderer
            .resize(width as usize, height.saturating_sub(HUD_ROWS) as usize);
        self.camera.set_aspect(self.renderer.aspect());
    }

    /// Advance the animation by one frame when it is running, otherwise just
    /// redraw the scene from the current camera
    pub fn update(&mut self) -> io::Result<()> {
        let renderer = &mut self.renderer;
        let camera = &self.camera;
        let light = &self.light;

        if self.tweener.is_running() {
            self.tweener
                .tick(&mut self.scene.graph, |graph| graph.render(renderer, camera, light))
                .map_err(to_io_error)?;
            if self.tweener.is_running() {
                return Ok(());
            }
        }
        self.scene
            .graph
            .render(renderer, camera, light)
            .map_err(to_io_error)
    }

    fn present(&mut self) -> io::Result<()> {
        let mut stdout = stdout();
        self.renderer.draw(&mut stdout, HUD_ROWS)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(self.status_line()),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }

    pub fn status_line(&self) -> String {
        let state = match self.tweener.state() {
            TweenState::Idle => "ready",
            TweenState::Running => "rolling",
            TweenState::Stopped => "stopped",
        };
        format!(
            "Lane3D | FPS: {:.1} | frame {}/{} {} | Space=Roll X=Stop Arrows/WASD=Camera Q=Quit",
            self.fps,
            self.tweener.current_frame(),
            self.tweener.settings().final_frame,
            state
        )
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn scene(&self) -> &BowlingScene {
        &self.scene
    }

    pub fn tweener(&self) -> &KeyframeTweener {
        &self.tweener
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn app() -> TerminalApp {
        TerminalApp::with_size(SceneConfig::default(), 80, 25).unwrap()
    }

    #[test]
    fn test_app_starts_idle() {
        let app = app();
        assert_eq!(app.tweener().state(), TweenState::Idle);
        assert_eq!(app.renderer().height(), 24);
        assert!(app.is_running());
        assert!(app.status_line().contains("frame 0/240 ready"));
    }

    #[test]
    fn test_update_draws_scene_when_idle() {
        let mut app = app();
        app.update().unwrap();
        assert!(app.renderer().covered_cells() > 0);
        assert_eq!(app.tweener().current_frame(), 0);
    }

    #[test]
    fn test_space_rolls_and_x_stops() {
        let mut app = app();
        app.handle_key(KeyCode::Char(' ')).unwrap();
        for _ in 0..3 {
            app.update().unwrap();
        }
        assert_eq!(app.tweener().current_frame(), 3);

        app.handle_key(KeyCode::Char('x')).unwrap();
        app.update().unwrap();
        assert_eq!(app.tweener().current_frame(), 3);
        assert_eq!(app.tweener().state(), TweenState::Stopped);
    }

    #[test]
    fn test_restart_restores_pose() {
        let mut app = app();
        let ball = app.scene().balls[0];
        let start = app.scene().graph.transform(ball).unwrap().translate;

        app.handle_key(KeyCode::Char(' ')).unwrap();
        for _ in 0..20 {
            app.update().unwrap();
        }
        let moved = app.scene().graph.transform(ball).unwrap().translate;
        assert!(moved.y > start.y);

        app.handle_key(KeyCode::Char(' ')).unwrap();
        assert_eq!(app.scene().graph.transform(ball).unwrap().translate, start);
        assert_eq!(app.tweener().state(), TweenState::Running);
        assert_eq!(app.tweener().current_frame(), 0);
    }

    #[test]
    fn test_camera_keys() {
        let mut app = app();
        let before = *app.camera();
        app.handle_key(KeyCode::Left).unwrap();
        app.handle_key(KeyCode::Char('w')).unwrap();
        assert_relative_eq!(app.camera().yaw, before.yaw + Camera::TURN);
        assert_relative_eq!(app.camera().position[1], before.position[1] + Camera::CLIMB);

        app.handle_key(KeyCode::Char('q')).unwrap();
        assert!(!app.is_running());
    }

    #[test]
    fn test_resize_refits_camera() {
        let mut app = app();
        app.resize(120, 41);
        assert_eq!(app.renderer().width(), 120);
        assert_relative_eq!(
            app.camera().frustum.right / app.camera().frustum.top,
            app.renderer().aspect()
        );
    }
}

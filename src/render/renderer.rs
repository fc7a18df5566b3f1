use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph, Wrap},
};

use crate::backdrop::Dot;
use crate::catalog::themes::GAME_OVER_RED;
use crate::catalog::{Puzzle, Rgb, Theme};
use crate::game::{Direction, Ending, GameConfig, GameState, Phase, Position};
use crate::metrics::GameMetrics;

const WHITE: Rgb = Rgb::new(255, 255, 255);
const BLACK: Rgb = Rgb::new(0, 0, 0);
const LOGO_GREEN: Rgb = Rgb::from_hex(0x00ff96);

const LOGO: [&str; 5] = [
    "███ █   █  ██  █  █ ████",
    "█   ██  █ █  █ █ █  █   ",
    "███ █ █ █ ████ ██   ███ ",
    "  █ █  ██ █  █ █ █  █   ",
    "███ █   █ █  █ █  █ ████",
];

/// Start screen gestures in progress
#[derive(Debug, Clone, Copy, Default)]
pub struct UnlockView {
    /// Long-press completion in `[0, 1]`
    pub progress: f64,
    /// Characters typed toward the secret code
    pub typed: usize,
    pub code_len: usize,
}

/// Everything one frame draws
pub struct Scene<'a> {
    pub state: &'a GameState,
    pub phase: Phase,
    pub config: &'a GameConfig,
    pub companion: &'a str,
    pub metrics: &'a GameMetrics,
    pub backdrop: &'a [Dot],
    pub unlock: UnlockView,
    /// Text typed into the puzzle answer field
    pub answer: &'a str,
    /// Game over and the restart/quit prompt is due
    pub prompt_ready: bool,
    /// Wall-clock seconds, drives the food pulse and the background drift
    pub clock: f64,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, scene: &Scene) {
        let area = frame.area();
        self.render_backdrop(frame, area, scene.backdrop);

        if scene.phase == Phase::Idle {
            self.render_start_screen(frame, area, scene);
            return;
        }

        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(1), // Footer
            ])
            .split(area);

        frame.render_widget(self.render_header(scene), chunks[0]);

        let board_area = centered_rect(
            scene.state.grid_width as u16 * 2 + 2,
            scene.state.grid_height as u16 + 2,
            chunks[1],
        );
        frame.render_widget(self.render_board(scene), board_area);

        match scene.phase {
            Phase::Paused => self.render_pause_menu(frame, chunks[1]),
            Phase::Running => {
                if let Some(puzzle) = scene.state.puzzle.active() {
                    self.render_puzzle(frame, chunks[1], puzzle, scene.answer);
                }
            }
            Phase::GameOver if scene.prompt_ready => self.render_game_over(frame, chunks[1], scene),
            _ => {}
        }

        frame.render_widget(self.render_controls(scene), chunks[2]);
    }

    fn render_backdrop(&self, frame: &mut Frame, area: Rect, dots: &[Dot]) {
        let buffer = frame.buffer_mut();
        for dot in dots {
            let (x, y) = (dot.x as u16, dot.y as u16);
            if x < area.right() && y < area.bottom() {
                let color = blend(BLACK, LOGO_GREEN, dot.opacity);
                buffer[(x, y)].set_char('·').set_fg(to_color(color));
            }
        }
    }

    fn render_start_screen(&self, frame: &mut Frame, area: Rect, scene: &Scene) {
        let panel = centered_rect(40, LOGO.len() as u16 + 8, area);

        let mut lines: Vec<Line> = LOGO
            .iter()
            .map(|row| {
                Line::from(Span::styled(
                    *row,
                    Style::default()
                        .fg(to_color(LOGO_GREEN))
                        .add_modifier(Modifier::BOLD),
                ))
            })
            .collect();
        lines.push(Line::from(""));

        let dots: String = (0..scene.unlock.code_len)
            .map(|i| if i < scene.unlock.typed { '●' } else { '○' })
            .collect();
        lines.push(Line::from(Span::styled(
            dots,
            Style::default().fg(Color::DarkGray),
        )));

        let logo_height = lines.len() as u16;
        let [text_area, gauge_area, hint_area] = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(logo_height),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .areas(panel);

        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), text_area);

        if scene.unlock.progress > 0.0 {
            let gauge = Gauge::default()
                .ratio(scene.unlock.progress.clamp(0.0, 1.0))
                .label("")
                .gauge_style(Style::default().fg(to_color(LOGO_GREEN)).bg(Color::Black));
            frame.render_widget(gauge, gauge_area);
        }

        let hint = Paragraph::new(Line::from(Span::styled(
            "Un secret ouvre la partie...",
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(hint, hint_area);
    }

    fn render_header(&self, scene: &Scene) -> Paragraph<'static> {
        let state = scene.state;
        let theme = state.theme();
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        let stats = Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(state.score.to_string(), value),
            Span::raw("    "),
            Span::styled("Level: ", label),
            Span::styled(state.level.to_string(), value),
            Span::raw("    "),
            Span::styled("Size: ", label),
            Span::styled(state.snake.len().to_string(), value),
            Span::raw("    "),
            Span::styled(
                theme.name.to_string(),
                Style::default()
                    .fg(to_color(theme.snake))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(scene.metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(
                scene.metrics.high_score.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Games: ", label),
            Span::styled(
                scene.metrics.games_played.to_string(),
                Style::default().fg(Color::White),
            ),
        ]);

        let companion = Line::from(vec![
            Span::styled("◆ ", Style::default().fg(to_color(theme.snake))),
            Span::styled(
                scene.companion.to_string(),
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]);

        Paragraph::new(vec![stats, companion, Line::from("")]).alignment(Alignment::Center)
    }

    fn render_board(&self, scene: &Scene) -> Paragraph<'static> {
        let state = scene.state;
        let theme = state.theme();
        let paints = paint_board(state, theme, scene.config.cell_size, scene.clock);

        let lines: Vec<Line> = paints
            .chunks(state.grid_width.max(1))
            .map(|row| {
                let spans: Vec<Span> = row
                    .iter()
                    .flat_map(|paint| {
                        (0..2).map(move |i| {
                            Span::styled(
                                paint.glyphs[i].to_string(),
                                Style::default()
                                    .fg(to_color(paint.fg[i]))
                                    .bg(to_color(paint.bg)),
                            )
                        })
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        let border = if scene.phase == Phase::GameOver {
            to_color(GAME_OVER_RED)
        } else {
            to_color(theme.grid.adjust(60))
        };

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(border))
                .title(format!(" {} ", theme.name)),
        )
    }

    fn render_pause_menu(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(30, 9, area);
        let key = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "PAUSE",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![Span::styled("Esc", key), Span::raw(" reprendre")]),
            Line::from(vec![Span::styled("R", key), Span::raw(" recommencer")]),
            Line::from(vec![Span::styled("Q", key), Span::raw(" quitter")]),
        ];

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(text).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::White)),
            ),
            popup,
        );
    }

    fn render_puzzle(&self, frame: &mut Frame, area: Rect, puzzle: &Puzzle, answer: &str) {
        let popup = centered_rect(48, 11, area);

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                puzzle.question,
                Style::default().fg(Color::White),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Cyan)),
                Span::styled(
                    answer.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("_", Style::default().fg(Color::Cyan)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                format!("Récompense : {}", puzzle.reward),
                Style::default().fg(Color::Yellow),
            )),
            Line::from(Span::styled(
                "Entrée valider · Échap fermer",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(Color::Cyan))
                        .title(format!(" {} ", puzzle.title)),
                ),
            popup,
        );
    }

    fn render_game_over(&self, frame: &mut Frame, area: Rect, scene: &Scene) {
        let popup = centered_rect(36, 9, area);
        let victory = scene.state.ending == Some(Ending::BoardFull);
        let (title, color) = if victory {
            ("PLATEAU COMPLET !", Color::Green)
        } else {
            ("GAME OVER", to_color(GAME_OVER_RED))
        };

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    scene.state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from("Voulez-vous recommencer ?"),
            Line::from(vec![
                Span::styled(
                    "Entrée/R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" oui   ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Échap/Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" non", Style::default().fg(Color::Gray)),
            ]),
        ];

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(text).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            ),
            popup,
        );
    }

    fn render_controls(&self, scene: &Scene) -> Paragraph<'static> {
        let key = Style::default().fg(Color::Cyan);
        let text = match scene.phase {
            Phase::Running if scene.state.puzzle.is_pending() => Line::from(vec![
                Span::raw("Tapez la réponse | "),
                Span::styled("Entrée", key),
                Span::raw(" valider | "),
                Span::styled("Échap", key),
                Span::raw(" fermer"),
            ]),
            Phase::GameOver => Line::from(""),
            _ => Line::from(vec![
                Span::styled("↑↓←→", key),
                Span::raw(" or "),
                Span::styled("WASD", key),
                Span::raw(" to move | "),
                Span::styled("Esc/Space", key),
                Span::raw(" pause | "),
                Span::styled("Ctrl+C", Style::default().fg(Color::Red)),
                Span::raw(" to exit"),
            ]),
        };

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// One grid cell, two terminal columns wide
#[derive(Debug, Clone, Copy, PartialEq)]
struct Paint {
    glyphs: [char; 2],
    fg: [Rgb; 2],
    bg: Rgb,
}

fn paint_board(state: &GameState, theme: &Theme, cell_size: f32, clock: f64) -> Vec<Paint> {
    let (width, height) = (state.grid_width, state.grid_height);
    let canvas = (width as f32 * cell_size, height as f32 * cell_size);
    let dot = theme.grid.adjust(24);

    let mut paints: Vec<Paint> = (0..width * height)
        .map(|i| {
            let (x, y) = (i % width, i / width);
            let centre = (
                (x as f32 + 0.5) * cell_size,
                (y as f32 + 0.5) * cell_size,
            );
            Paint {
                glyphs: ['·', ' '],
                fg: [dot, dot],
                bg: background_at(theme.background, centre, canvas, clock),
            }
        })
        .collect();
    let index = |pos: Position| -> Option<usize> {
        state
            .is_in_bounds(pos)
            .then(|| pos.y as usize * width + pos.x as usize)
    };

    if let Some(i) = state.food.and_then(index) {
        let pulse = food_pulse(clock);
        let glyph = match pulse {
            p if p >= 0.85 => '█',
            p if p >= 0.6 => '▓',
            _ => '▒',
        };
        let color = blend(paints[i].bg, theme.food, pulse);
        paints[i].glyphs = [glyph, glyph];
        paints[i].fg = [color, color];
    }

    // Tail first so the head wins on stacked cells
    let len = state.snake.len();
    for (n, &segment) in state.snake.body.iter().enumerate().rev() {
        let Some(i) = index(segment) else { continue };
        let alpha = segment_alpha(n, len);
        let bg = paints[i].bg;
        let near = blend(bg, theme.snake, alpha);
        let far = blend(bg, theme.snake.adjust(-30), alpha);

        paints[i] = if n == 0 {
            Paint {
                glyphs: head_glyphs(state.snake.direction),
                fg: [WHITE, WHITE],
                bg: near,
            }
        } else {
            Paint {
                glyphs: ['█', '█'],
                fg: [near, far],
                bg,
            }
        };
    }

    for particle in state.particles.iter() {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }
        let pos = Position::new(
            (particle.x / cell_size) as i32,
            (particle.y / cell_size) as i32,
        );
        let Some(i) = index(pos) else { continue };
        let color = blend(paints[i].bg, particle.color, particle.life);
        paints[i].glyphs[0] = particle_glyph(particle.life);
        paints[i].fg[0] = color;
    }

    paints
}

/// Opacity of the snake segment at `index`, from 1.0 at the head to 0.5
fn segment_alpha(index: usize, len: usize) -> f32 {
    if len == 0 {
        return 1.0;
    }
    1.0 - (index as f32 / len as f32) * 0.5
}

/// Eyes on the side of the head facing the direction of travel
fn head_glyphs(direction: Direction) -> [char; 2] {
    match direction {
        Direction::Right => [' ', '⠨'],
        Direction::Left => ['⠅', ' '],
        Direction::Up => ['⠁', '⠈'],
        Direction::Down => ['⠄', '⠠'],
    }
}

/// Food size factor in `[0.4, 1.0]`
fn food_pulse(clock: f64) -> f32 {
    ((clock * 5.0).sin() * 0.3 + 0.7) as f32
}

fn particle_glyph(life: f32) -> char {
    if life > 0.66 {
        '●'
    } else if life > 0.33 {
        '•'
    } else {
        '·'
    }
}

/// Radial background: theme color at a slowly circling centre, a touch
/// brighter halfway out, black at the rim.
fn background_at(base: Rgb, point: (f32, f32), canvas: (f32, f32), clock: f64) -> Rgb {
    let centre = (
        canvas.0 / 2.0 + (clock.sin() * 50.0) as f32,
        canvas.1 / 2.0 + (clock.cos() * 50.0) as f32,
    );
    let radius = canvas.0.max(canvas.1).max(1.0);
    let distance = ((point.0 - centre.0).powi(2) + (point.1 - centre.1).powi(2)).sqrt();
    let t = (distance / radius).min(1.0);

    let middle = base.adjust(10);
    if t < 0.5 {
        blend(base, middle, t * 2.0)
    } else {
        blend(middle, BLACK, (t - 0.5) * 2.0)
    }
}

/// `fg` drawn over `bg` at the given opacity
fn blend(bg: Rgb, fg: Rgb, alpha: f32) -> Rgb {
    let alpha = alpha.clamp(0.0, 1.0);
    let mix = |b: u8, f: u8| (b as f32 + (f as f32 - b as f32) * alpha).round() as u8;
    Rgb::new(mix(bg.r, fg.r), mix(bg.g, fg.g), mix(bg.b, fg.b))
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// `width` x `height` rectangle in the middle of `area`, shrunk to fit
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::THEMES;
    use crate::game::{Burst, GameEngine, ParticleField};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ratatui::{Terminal, backend::TestBackend};
    use std::time::Instant;

    fn quiet_state() -> GameState {
        let config = GameConfig {
            puzzle_chance: 0.0,
            companion_chance: 0.0,
            ..GameConfig::small()
        };
        GameEngine::with_seed(config, 9).reset()
    }

    #[test]
    fn test_segment_alpha() {
        assert_eq!(segment_alpha(0, 4), 1.0);
        assert!((segment_alpha(2, 4) - 0.75).abs() < 1e-6);
        assert!(segment_alpha(3, 4) > 0.5);
    }

    #[test]
    fn test_blend() {
        let bg = Rgb::new(0, 0, 0);
        let fg = Rgb::new(200, 100, 50);
        assert_eq!(blend(bg, fg, 1.0), fg);
        assert_eq!(blend(bg, fg, 0.0), bg);
        assert_eq!(blend(bg, fg, 0.5), Rgb::new(100, 50, 25));
        assert_eq!(blend(bg, fg, 7.0), fg);
    }

    #[test]
    fn test_food_pulse_range() {
        for i in 0..1000 {
            let pulse = food_pulse(i as f64 * 0.013);
            assert!((0.4 - 1e-6..=1.0 + 1e-6).contains(&pulse));
        }
    }

    #[test]
    fn test_centered_rect_fits() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_rect(10, 4, area), Rect::new(5, 3, 10, 4));
        assert_eq!(centered_rect(50, 50, area), area);
    }

    #[test]
    fn test_paint_board() {
        let mut state = quiet_state();
        state.food = Some(Position::new(0, 0));
        let theme = &THEMES[0];
        let paints = paint_board(&state, theme, 30.0, 0.0);

        assert_eq!(paints.len(), state.grid_width * state.grid_height);

        let head = state.snake.head();
        let head_paint = paints[head.y as usize * state.grid_width + head.x as usize];
        assert_eq!(head_paint.glyphs, head_glyphs(Direction::Right));
        assert_eq!(head_paint.fg, [WHITE, WHITE]);

        let tail = state.snake.tail();
        let tail_paint = paints[tail.y as usize * state.grid_width + tail.x as usize];
        assert_eq!(tail_paint.glyphs, ['█', '█']);

        assert_ne!(paints[0].glyphs, ['·', ' ']);
    }

    #[test]
    fn test_particles_land_on_their_cell() {
        let mut state = quiet_state();
        state.food = None;
        state.particles = ParticleField::new();
        let mut rng = StdRng::seed_from_u64(1);
        state
            .particles
            .burst(&mut rng, Burst::Food, (45.0, 75.0), GAME_OVER_RED);
        let paints = paint_board(&state, &THEMES[0], 30.0, 0.0);
        assert_eq!(paints[2 * state.grid_width + 1].glyphs[0], '●');
    }

    #[test]
    fn test_render_smoke() {
        let state = quiet_state();
        let config = GameConfig::small();
        let metrics = GameMetrics::new();
        let renderer = Renderer::new();
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).expect("test terminal");

        for phase in [Phase::Idle, Phase::Running, Phase::Paused, Phase::GameOver] {
            let scene = Scene {
                state: &state,
                phase,
                config: &config,
                companion: "hello",
                metrics: &metrics,
                backdrop: &[],
                unlock: UnlockView {
                    progress: 0.5,
                    typed: 2,
                    code_len: 4,
                },
                answer: "",
                prompt_ready: true,
                clock: 1.0,
            };
            terminal
                .draw(|frame| renderer.render(frame, &scene))
                .expect("draw");
        }
    }

    #[test]
    fn test_header_shows_session_stats() {
        let t0 = Instant::now();
        let mut metrics = GameMetrics::new();
        for score in [10, 60, 5] {
            metrics.on_game_start(t0);
            metrics.on_game_over(score);
        }

        let state = quiet_state();
        let config = GameConfig::small();
        let renderer = Renderer::new();
        let mut terminal = Terminal::new(TestBackend::new(120, 20)).expect("test terminal");
        let scene = Scene {
            state: &state,
            phase: Phase::Running,
            config: &config,
            companion: "hello",
            metrics: &metrics,
            backdrop: &[],
            unlock: UnlockView {
                progress: 0.0,
                typed: 0,
                code_len: 4,
            },
            answer: "",
            prompt_ready: false,
            clock: 0.0,
        };
        terminal
            .draw(|frame| renderer.render(frame, &scene))
            .expect("draw");

        let buffer = terminal.backend().buffer();
        let header: String = (0..buffer.area.width)
            .map(|x| buffer[(x, 0)].symbol())
            .collect();
        assert!(header.contains("Score: 0"), "{header}");
        assert!(header.contains("Best: 60"), "{header}");
        assert!(header.contains("Games: 3"), "{header}");
    }
}

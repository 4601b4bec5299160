//! Cube turning demo with iced UI.
//!
//! Shows a 3x3 cube held in an in-memory scene and turns its faces on button
//! or key presses, one animated quarter turn at a time.

use std::path::PathBuf;
use std::time::Duration;

use iced::time::Instant;
use iced::widget::{Column, Row, button, container, text};
use iced::{Element, Font, Length, Subscription, Task, keyboard, window};

use cube_turn::config::DEFAULT_CONFIG_PATH;
use cube_turn::{CubeConfig, CubeSession, Face, SceneGraph, Ticker, TurnOutcome};

/// Faces in the order their buttons are shown.
const BUTTON_FACES: [Face; 6] = [Face::W, Face::Y, Face::G, Face::B, Face::R, Face::O];

/// Main application state
#[derive(Debug)]
pub(crate) struct CubeApp {
    scene: SceneGraph,
    session: CubeSession,
    ticker: Ticker,
    /// Time of the last frame, or `None` if no turn is animating.
    last_frame: Option<Instant>,
}

/// Messages that the application can receive
#[derive(Debug, Clone)]
pub(crate) enum Message {
    Turn(Face),
    Frame(Instant),
}

impl CubeApp {
    /// Create a new application instance
    pub(crate) fn new(config: &CubeConfig) -> Self {
        let scene = SceneGraph::cube(&config.scene);
        let mut session = CubeSession::new(config);
        // The in-memory scene is loaded as soon as it exists.
        if !session.resolve(&scene) {
            log::error!("cube scene is missing objects; turns are disabled");
        }
        Self {
            scene,
            session,
            ticker: Ticker::new(config.animation.frame_delay()),
            last_frame: None,
        }
    }

    /// Get the title of the application
    pub(crate) fn title(&self) -> &'static str {
        "Cube"
    }

    /// Update the application state
    pub(crate) fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Turn(face) => match self.session.turn(&self.scene, face) {
                TurnOutcome::Accepted => {
                    self.ticker.reset();
                    self.last_frame = None;
                }
                outcome => log::debug!("turn {} ignored: {outcome:?}", face.notation()),
            },
            Message::Frame(now) => {
                let elapsed = self
                    .last_frame
                    .map_or(Duration::ZERO, |last| now.duration_since(last));
                self.last_frame = Some(now);
                for _ in 0..self.ticker.advance(elapsed) {
                    if !self.session.tick(&mut self.scene) {
                        break;
                    }
                }
                if !self.session.is_animating() {
                    self.last_frame = None;
                }
            }
        }

        Task::none()
    }

    /// Frame events while a turn animates, plus move keys
    pub(crate) fn subscription(&self) -> Subscription<Message> {
        let keys = keyboard::on_key_press(key_turn);
        if self.session.is_animating() {
            Subscription::batch([keys, window::frames().map(Message::Frame)])
        } else {
            keys
        }
    }

    /// Create the view for the application
    pub(crate) fn view(&self) -> Element<'_, Message> {
        let animating = self.session.is_animating();

        let buttons = BUTTON_FACES.iter().fold(Row::new().spacing(10), |row, &face| {
            row.push(
                button(text(face.notation().to_string()).font(Font::MONOSPACE))
                    .on_press_maybe((!animating).then_some(Message::Turn(face))),
            )
        });

        let status = match self.session.current_turn() {
            Some((face, progress)) => {
                format!("Turning {} ({:.0}%)", face.notation(), progress * 100.0)
            }
            None if !self.session.is_ready() => "Waiting for scene".to_string(),
            None if self.session.is_solved() => "Solved".to_string(),
            None => "Ready".to_string(),
        };

        let slots = Column::with_children(self.session.occupancy().iter().map(|(slot, id)| {
            let line = match id.and_then(|id| self.scene.object(id)) {
                Some(obj) => format!(
                    "{:>2} {:<4} {:>5} ({:+.2}, {:+.2}, {:+.2})",
                    slot.index(),
                    slot.home_piece(),
                    obj.name,
                    obj.position.x,
                    obj.position.y,
                    obj.position.z,
                ),
                None => format!("{:>2} {:<4} -", slot.index(), slot.home_piece()),
            };
            text(line).font(Font::MONOSPACE).into()
        }));

        let content = Column::new()
            .spacing(20)
            .push(buttons)
            .push(text(status))
            .push(text(self.session.describe()).font(Font::MONOSPACE))
            .push(slots);

        container(content)
            .padding(10)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

/// Maps move letters to face turns.
fn key_turn(key: keyboard::Key, _modifiers: keyboard::Modifiers) -> Option<Message> {
    let keyboard::Key::Character(c) = key.as_ref() else {
        return None;
    };
    let letter = c.chars().next()?.to_ascii_uppercase();
    Face::from_notation(letter).ok().map(Message::Turn)
}

/// Entry point for the cube turning demo
fn main() -> iced::Result {
    env_logger::builder().format_timestamp(None).init();

    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = CubeConfig::load_or_default(&config_path);

    let app = CubeApp::new(&config);
    iced::application(app.title(), CubeApp::update, CubeApp::view)
        .subscription(CubeApp::subscription)
        .run_with(move || (app, Task::none()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_animates_to_completion() {
        let mut app = CubeApp::new(&CubeConfig::default());
        let _ = app.update(Message::Turn(Face::W));
        assert!(app.session.is_animating());

        // Buttons are disabled, but a stray message must not start a turn.
        let _ = app.update(Message::Turn(Face::R));

        let start = Instant::now();
        for i in 0..=200 {
            let _ = app.update(Message::Frame(start + Duration::from_millis(16 * i)));
        }
        assert!(!app.session.is_animating());
        assert_eq!(
            "OBW BW RBW RW RGW GW OGW OW OG OB RB RG OYG OY OYB YB RYB RY RYG YG",
            app.session.describe(),
        );
    }

    #[test]
    fn test_move_keys() {
        let key = |s: &str| keyboard::Key::Character(s.into());
        let none = keyboard::Modifiers::empty();
        assert!(matches!(key_turn(key("u"), none), Some(Message::Turn(Face::W))));
        assert!(matches!(key_turn(key("L"), none), Some(Message::Turn(Face::G))));
        assert!(key_turn(key("x"), none).is_none());
    }
}

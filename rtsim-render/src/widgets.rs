use rtsim_cache::intern_label;
use rtsim_core::{Aabb, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Start,
    NewTest,
    Exit,
}

/// Clickable labelled rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub label_id: usize,
    pub rect: Aabb,
    pub action: ButtonAction,
}

impl Button {
    pub fn new(label: &'static str, rect: Aabb, action: ButtonAction) -> Self {
        Self {
            label_id: intern_label(label),
            rect,
            action,
        }
    }

    /// Border pixels do not count as inside.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.rect.contains(x, y)
    }
}

/// Buttons shown on a screen, laid out around the arena centre.
pub fn buttons_for(screen: Screen, arena_width: u32, arena_height: u32) -> Vec<Button> {
    let (cx, cy) = ((arena_width / 2) as f32, (arena_height / 2) as f32);
    let exit = Button::new(
        "Exit",
        Aabb::new(cx - 50.0, cy + 70.0, 100.0, 40.0),
        ButtonAction::Exit,
    );
    match screen {
        Screen::Menu => vec![
            Button::new(
                "Start Simulation",
                Aabb::new(cx - 100.0, cy, 200.0, 50.0),
                ButtonAction::Start,
            ),
            exit,
        ],
        Screen::Result => vec![
            Button::new(
                "New Test",
                Aabb::new(cx - 80.0, cy + 10.0, 160.0, 50.0),
                ButtonAction::NewTest,
            ),
            exit,
        ],
        Screen::Simulation => Vec::new(),
    }
}

pub fn hit_test(buttons: &[Button], x: f32, y: f32) -> Option<ButtonAction> {
    buttons.iter().find(|b| b.contains(x, y)).map(|b| b.action)
}

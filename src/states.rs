/// Push-down automaton of game states.
///
/// Only the top of the stack receives input. Rendering walks down through
/// each entry's `prev` index so overlays can draw what lies beneath them.

use tracing::{info, warn};

use crate::canvas::{Anchor, Canvas, BACKGROUND_COLOR, TEXT_COLOR};
use crate::config::Config;
use crate::game::Context;
use crate::input::{FrameInput, GameEvent, Key};
use crate::menu::TextMenu;
use crate::timers::TimerId;
use crate::world::GameWorld;

/// What the active state asks the stack to do after its update.
#[derive(Debug)]
pub enum Transition {
    None,
    /// Enter a new state on top.
    Push(State),
    /// Leave the active state.
    Pop,
    /// Leave the active state and reset the one it was drawn over.
    PopAndReset,
    /// Unwind to the root state.
    PopToRoot,
    Quit,
}

#[derive(Debug)]
pub enum State {
    MainMenu(MainMenu),
    GameWorld(Box<GameWorld>),
    PauseMenu(PauseMenu),
    FailedMenu(EndScreen),
    WinState(EndScreen),
    RankingMenu(RankingMenu),
    CreditsMenu(CreditsMenu),
}

impl State {
    pub fn name(&self) -> &'static str {
        match self {
            State::MainMenu(_) => "MainMenu",
            State::GameWorld(_) => "GameWorld",
            State::PauseMenu(_) => "PauseMenu",
            State::FailedMenu(_) => "FailedMenu",
            State::WinState(_) => "WinState",
            State::RankingMenu(_) => "RankingMenu",
            State::CreditsMenu(_) => "CreditsMenu",
        }
    }

    pub fn update(&mut self, input: &FrameInput, ctx: &mut Context) -> Transition {
        match self {
            State::MainMenu(menu) => menu.update(input, ctx),
            State::GameWorld(world) => world.update(input, ctx),
            State::PauseMenu(menu) => menu.update(input, ctx),
            State::FailedMenu(screen) | State::WinState(screen) => screen.update(input, ctx),
            State::RankingMenu(_) | State::CreditsMenu(_) => dismiss_on_confirm(input),
        }
    }

    /// Only the playing field has anything to reset.
    pub fn reset(&mut self, ctx: &mut Context) {
        if let State::GameWorld(world) = self {
            world.reset(ctx);
        }
    }

    /// Called once the state is off the stack. The playing field owns the
    /// recurring timers, so they stop with it.
    fn leave(&self, ctx: &mut Context) {
        if let State::GameWorld(_) = self {
            ctx.timers.disarm(TimerId::AlienFire);
            ctx.timers.disarm(TimerId::ExtraSpawn);
        }
    }

    pub fn as_world(&self) -> Option<&GameWorld> {
        match self {
            State::GameWorld(world) => Some(&**world),
            _ => None,
        }
    }

    pub fn as_world_mut(&mut self) -> Option<&mut GameWorld> {
        match self {
            State::GameWorld(world) => Some(&mut **world),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Entry {
    state: State,
    /// Index of the state that was on top when this one was entered.
    prev: Option<usize>,
}

#[derive(Debug)]
pub struct StateStack {
    entries: Vec<Entry>,
}

impl StateStack {
    pub fn new(root: State) -> Self {
        Self {
            entries: vec![Entry { state: root, prev: None }],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top(&self) -> &State {
        &self.top_entry().state
    }

    pub fn top_mut(&mut self) -> &mut State {
        let last = self.entries.len() - 1;
        &mut self.entries[last].state
    }

    pub fn get(&self, index: usize) -> Option<&State> {
        self.entries.get(index).map(|e| &e.state)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut State> {
        self.entries.get_mut(index).map(|e| &mut e.state)
    }

    /// Names from root to top.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.state.name()).collect()
    }

    pub fn prev_of_top(&self) -> Option<usize> {
        self.top_entry().prev
    }

    fn top_entry(&self) -> &Entry {
        // The root is never popped, so there is always a top.
        &self.entries[self.entries.len() - 1]
    }

    pub fn enter(&mut self, state: State) {
        let prev = self.entries.len().checked_sub(1);
        info!(from = self.top().name(), to = state.name(), "enter state");
        self.entries.push(Entry { state, prev });
    }

    /// Pop the active state. The root stays put; returns the popped state and
    /// the index it was entered over.
    pub fn exit(&mut self) -> Option<(State, Option<usize>)> {
        if self.entries.len() <= 1 {
            warn!(state = self.top().name(), "refusing to pop the root state");
            return None;
        }
        let entry = self.entries.pop()?;
        info!(from = entry.state.name(), to = self.top().name(), "exit state");
        Some((entry.state, entry.prev))
    }

    fn exit_above_root(&mut self) -> Option<(State, Option<usize>)> {
        if self.entries.len() > 1 {
            self.exit()
        } else {
            None
        }
    }

    /// Feed the frame to the active state and apply its transition.
    /// Returns false once the game should stop.
    pub fn update(&mut self, input: &FrameInput, ctx: &mut Context) -> bool {
        let transition = self.top_mut().update(input, ctx);
        self.apply(transition, ctx)
    }

    pub fn apply(&mut self, transition: Transition, ctx: &mut Context) -> bool {
        match transition {
            Transition::None => {}
            Transition::Push(state) => self.enter(state),
            Transition::Pop => {
                if let Some((state, _)) = self.exit() {
                    state.leave(ctx);
                }
            }
            Transition::PopAndReset => {
                if let Some((state, prev)) = self.exit() {
                    state.leave(ctx);
                    if let Some(beneath) = prev.and_then(|i| self.get_mut(i)) {
                        beneath.reset(ctx);
                    }
                }
            }
            Transition::PopToRoot => {
                while let Some((state, _)) = self.exit_above_root() {
                    state.leave(ctx);
                }
            }
            Transition::Quit => {
                info!(state = self.top().name(), "quit");
                return false;
            }
        }
        true
    }

    pub fn render(&self, canvas: &mut Canvas, ctx: &Context) {
        self.render_at(self.entries.len() - 1, canvas, ctx);
    }

    fn render_at(&self, index: usize, canvas: &mut Canvas, ctx: &Context) {
        let entry = &self.entries[index];
        match &entry.state {
            State::MainMenu(menu) => menu.render(canvas),
            State::GameWorld(world) => {
                self.render_background_at(entry.prev, canvas);
                world.render(canvas, ctx);
            }
            State::PauseMenu(menu) => {
                canvas.clear(BACKGROUND_COLOR);
                self.render_prev(entry.prev, canvas, ctx);
                menu.render(canvas);
            }
            State::FailedMenu(screen) | State::WinState(screen) => {
                canvas.clear(BACKGROUND_COLOR);
                self.render_prev(entry.prev, canvas, ctx);
                screen.render(canvas, ctx);
            }
            State::RankingMenu(ranking) => {
                self.render_background_at(entry.prev, canvas);
                ranking.render(canvas, ctx);
            }
            State::CreditsMenu(credits) => {
                self.render_background_at(entry.prev, canvas);
                credits.render(canvas);
            }
        }
    }

    fn render_prev(&self, prev: Option<usize>, canvas: &mut Canvas, ctx: &Context) {
        if let Some(prev) = prev {
            self.render_at(prev, canvas, ctx);
        }
    }

    /// The nearest main-menu backdrop below `index`, or a plain fill.
    fn render_background_at(&self, index: Option<usize>, canvas: &mut Canvas) {
        match index.map(|i| &self.entries[i]) {
            Some(Entry { state: State::MainMenu(menu), .. }) => menu.render_background(canvas),
            Some(entry) => self.render_background_at(entry.prev, canvas),
            None => canvas.clear(BACKGROUND_COLOR),
        }
    }
}

fn dismiss_on_confirm(input: &FrameInput) -> Transition {
    for event in &input.events {
        match event {
            GameEvent::Quit => return Transition::Quit,
            GameEvent::KeyDown(Key::Confirm) => return Transition::Pop,
            _ => {}
        }
    }
    Transition::None
}

// ── Main menu ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MainOption {
    Play,
    Ranking,
    Credits,
}

#[derive(Debug)]
pub struct MainMenu {
    pub menu: TextMenu<MainOption>,
    width: i32,
    height: i32,
}

impl MainMenu {
    pub fn new(config: &Config) -> Self {
        let (w, h) = (config.canvas_width, config.canvas_height);
        Self {
            menu: TextMenu::new(
                vec![
                    (MainOption::Play, "Play"),
                    (MainOption::Ranking, "Ranking"),
                    (MainOption::Credits, "Credits"),
                ],
                (h / 2, h),
                (0, w),
            ),
            width: w,
            height: h,
        }
    }

    fn update(&mut self, input: &FrameInput, ctx: &mut Context) -> Transition {
        let mut trigger = false;
        for event in &input.events {
            match event {
                GameEvent::Quit => return Transition::Quit,
                GameEvent::KeyDown(Key::Confirm) => trigger = true,
                GameEvent::KeyDown(key) => self.menu.handle_key(*key),
                _ => {}
            }
        }
        if !trigger {
            return Transition::None;
        }
        match self.menu.selected() {
            MainOption::Play => Transition::Push(State::GameWorld(Box::new(GameWorld::new(ctx)))),
            MainOption::Ranking => Transition::Push(State::RankingMenu(RankingMenu::open(ctx))),
            MainOption::Credits => Transition::Push(State::CreditsMenu(CreditsMenu)),
        }
    }

    pub fn render_background(&self, canvas: &mut Canvas) {
        canvas.clear(BACKGROUND_COLOR);
        canvas.border(TEXT_COLOR);
    }

    fn render(&self, canvas: &mut Canvas) {
        self.render_background(canvas);
        canvas.text("Space Invaders", TEXT_COLOR, self.width / 2, self.height / 4, Anchor::Center);
        self.menu.render(canvas);
    }
}

// ── Pause menu ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PauseOption {
    Restart,
    Exit,
}

#[derive(Debug)]
pub struct PauseMenu {
    pub menu: TextMenu<PauseOption>,
}

impl PauseMenu {
    pub fn new(config: &Config) -> Self {
        let (w, h) = (config.canvas_width, config.canvas_height);
        Self {
            menu: TextMenu::new(
                vec![(PauseOption::Restart, "Restart"), (PauseOption::Exit, "Exit")],
                (h / 4, 3 * h / 4),
                (w / 4, 3 * w / 4),
            ),
        }
    }

    fn update(&mut self, input: &FrameInput, ctx: &mut Context) -> Transition {
        let mut trigger = false;
        for event in &input.events {
            match event {
                GameEvent::Quit => return Transition::Quit,
                GameEvent::KeyDown(Key::Confirm) => trigger = true,
                GameEvent::KeyDown(key) => self.menu.handle_key(*key),
                _ => {}
            }
        }
        if !trigger {
            return Transition::None;
        }
        match self.menu.selected() {
            PauseOption::Restart => Transition::PopAndReset,
            PauseOption::Exit => {
                ctx.persist_score();
                Transition::PopToRoot
            }
        }
    }

    fn render(&self, canvas: &mut Canvas) {
        self.menu.render(canvas);
    }
}

// ── End of episode ────────────────────────────────────────────────────────────

/// Shown over the frozen playing field after a loss or a win.
#[derive(Debug)]
pub struct EndScreen {
    pub headline: &'static str,
}

impl EndScreen {
    pub fn failed() -> Self {
        Self { headline: "You died!" }
    }

    pub fn won() -> Self {
        Self { headline: "You won!" }
    }

    /// Confirm (or Esc) saves the score and restarts the episode beneath.
    fn update(&mut self, input: &FrameInput, ctx: &mut Context) -> Transition {
        for event in &input.events {
            match event {
                GameEvent::Quit => return Transition::Quit,
                GameEvent::KeyDown(Key::Confirm | Key::Cancel) => {
                    ctx.persist_score();
                    return Transition::PopAndReset;
                }
                _ => {}
            }
        }
        Transition::None
    }

    fn render(&self, canvas: &mut Canvas, ctx: &Context) {
        let (cx, cy) = (canvas.width / 2, canvas.height / 2);
        canvas.text(self.headline, TEXT_COLOR, cx, cy - 50, Anchor::Center);
        canvas.text(format!("score: {}", ctx.score), TEXT_COLOR, cx, cy, Anchor::Center);
    }
}

// ── Ranking & credits ─────────────────────────────────────────────────────────

const RANKING_LINE_GAP: i32 = 32;

#[derive(Debug)]
pub struct RankingMenu;

impl RankingMenu {
    /// Reload the stored board so the listing is current.
    pub fn open(ctx: &mut Context) -> Self {
        ctx.leaderboard.load();
        RankingMenu
    }

    fn render(&self, canvas: &mut Canvas, ctx: &Context) {
        let cx = canvas.width / 2;
        let entries = ctx.leaderboard.entries();
        if entries.is_empty() {
            canvas.text("There are no ranking yet !", TEXT_COLOR, cx, canvas.height / 2, Anchor::Center);
            return;
        }
        let top = canvas.height / 2 - (entries.len() as i32 * RANKING_LINE_GAP) / 2;
        for (i, entry) in entries.iter().enumerate() {
            let line = format!("{}. {}: {}", i + 1, entry.name, entry.score);
            let y = top + i as i32 * RANKING_LINE_GAP;
            canvas.text(line, TEXT_COLOR, cx, y, Anchor::Center);
        }
    }
}

#[derive(Debug)]
pub struct CreditsMenu;

impl CreditsMenu {
    fn render(&self, canvas: &mut Canvas) {
        let (cx, cy) = (canvas.width / 2, canvas.height / 2);
        canvas.text("CREDITS", TEXT_COLOR, cx, cy - 15, Anchor::Center);
        canvas.text("a terminal Space Invaders", TEXT_COLOR, cx, cy + 30, Anchor::Center);
    }
}

// src/game/states/playing.rs
use std::fs;

use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use winit::event::{ElementState, KeyboardInput, VirtualKeyCode, WindowEvent};

use crate::engine::graphics::{FrameBatch, Renderer};
use crate::engine::state::GameState;
use crate::game::config::GameConfig;
use crate::game::entities::Entity;
use crate::game::entities::enemy::Enemy;
use crate::game::entities::player::Player;

// Round layout, matching the shipped board
const PLAYER_SPAWN: (f32, f32) = (375.0, 673.0);
const PLAYER_SIZE: (f32, f32) = (50.0, 80.0);
const ENEMY_SIZE: (f32, f32) = (50.0, 50.0);
// Rows for enemies 0..2, top to bottom of their patrol lanes
const ENEMY_ROWS: [f32; 3] = [600.0, 400.0, 200.0];
const GOAL_SPAWN: (f32, f32) = (375.0, 50.0);
const GOAL_SIZE: (f32, f32) = (50.0, 50.0);

// End-of-round banner, centered on the board
const BANNER_RECT: (f32, f32, f32, f32) = (200.0, 350.0, 400.0, 100.0);
const WIN_BANNER_COLOR: [f32; 4] = [0.83, 0.66, 0.22, 0.92];
const LOSE_BANNER_COLOR: [f32; 4] = [0.45, 0.07, 0.07, 0.92];

// Texture table entries and the asset files backing them
const TEXTURE_FILES: [(&str, &str); 4] = [
    ("background", "background.png"),
    ("player", "Character.png"),
    ("enemy", "enemy.png"),
    ("treasure", "treasure.png"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Running,
    Lost,
    Won,
}

// The whole game lives in this one state: the fixed-timestep round loop, the
// Running/Lost/Won machine and the difficulty escalation across rounds.
pub struct PlayingState {
    config: GameConfig,
    player: Player,
    enemies: [Enemy; 3],
    goal: Entity,
    // Input intent: 1 = up, -1 = down, 0 = idle
    direction: i8,
    level_speed: f32,
    outcome: RoundOutcome,
    // Ticks left to keep the final frame on screen before the terminal
    // transition fires
    hold_ticks: u32,
    accumulator: f32,
    assets_loaded: bool,
}

impl PlayingState {
    pub fn new(config: GameConfig) -> Self {
        let (player, enemies, goal) = seed_round(&config, 1.0);
        Self {
            config,
            player,
            enemies,
            goal,
            direction: 0,
            level_speed: 1.0,
            outcome: RoundOutcome::Running,
            hold_ticks: 0,
            accumulator: 0.0,
            assets_loaded: false,
        }
    }

    // Re-seed the board in place. Called once at construction and again after
    // every win, so difficulty escalates without recursing.
    fn start_round(&mut self, level_speed: f32) {
        let (player, enemies, goal) = seed_round(&self.config, level_speed);
        self.player = player;
        self.enemies = enemies;
        self.goal = goal;
        self.direction = 0;
        self.level_speed = level_speed;
        self.outcome = RoundOutcome::Running;
        self.hold_ticks = 0;
        log::info!("round started at level speed {}", level_speed);
    }

    fn hold_duration_ticks(&self) -> u32 {
        (self.config.end_hold_seconds * self.config.tick_rate as f32).round() as u32
    }

    // Key handling: releasing either arrow zeroes the intent even while the
    // other arrow is still held. Returns true for the quit path (Escape).
    fn apply_key(&mut self, key: VirtualKeyCode, pressed: bool) -> bool {
        if key == VirtualKeyCode::Escape && pressed {
            return true;
        }
        // The end-of-round hold ignores movement intent
        if self.outcome != RoundOutcome::Running {
            return false;
        }
        match (key, pressed) {
            (VirtualKeyCode::Up, true) => self.direction = 1,
            (VirtualKeyCode::Down, true) => self.direction = -1,
            (VirtualKeyCode::Up | VirtualKeyCode::Down, false) => self.direction = 0,
            _ => {}
        }
        false
    }

    // One fixed 60 Hz tick. Returns true when the session is over.
    fn step(&mut self) -> bool {
        match self.outcome {
            RoundOutcome::Running => {
                self.step_round();
                false
            }
            RoundOutcome::Won | RoundOutcome::Lost => {
                if self.hold_ticks > 0 {
                    self.hold_ticks -= 1;
                    return false;
                }
                if self.outcome == RoundOutcome::Won {
                    self.start_round(self.level_speed + 0.5);
                    false
                } else {
                    true
                }
            }
        }
    }

    fn step_round(&mut self) {
        let width = self.config.window_width as f32;
        let height = self.config.window_height as f32;

        self.player
            .move_by(self.direction, height, self.config.bottom_margin);

        self.enemies[0].move_across(width, self.config.left_margin, self.config.right_margin);
        // More enemies patrol at higher levels of difficulty
        if self.level_speed > 2.0 {
            self.enemies[1].move_across(width, self.config.left_margin, self.config.right_margin);
        }
        if self.level_speed > 4.0 {
            self.enemies[2].move_across(width, self.config.left_margin, self.config.right_margin);
        }

        // Only the first enemy ends the round; the goal is checked after it
        if self.player.entity.overlaps(&self.enemies[0].entity) {
            self.outcome = RoundOutcome::Lost;
            self.hold_ticks = self.hold_duration_ticks();
            log::info!("you lose at level speed {}", self.level_speed);
        } else if self.player.entity.overlaps(&self.goal) {
            self.outcome = RoundOutcome::Won;
            self.hold_ticks = self.hold_duration_ticks();
            log::info!(
                "you win, advancing to level speed {}",
                self.level_speed + 0.5
            );
        }
    }

    // Read the round's textures from disk and upload them. Any missing or
    // broken asset is fatal.
    fn load_assets(&mut self, renderer: &mut Renderer, device: &Device, queue: &Queue) {
        if self.assets_loaded {
            return;
        }
        for (id, file) in TEXTURE_FILES {
            let path = self.config.assets_dir.join(file);
            let bytes = fs::read(&path)
                .unwrap_or_else(|err| panic!("failed to read asset {}: {}", path.display(), err));
            renderer
                .load_texture(device, queue, id, &bytes)
                .unwrap_or_else(|err| panic!("failed to load asset {}: {:#}", path.display(), err));
        }
        self.assets_loaded = true;
    }
}

impl GameState for PlayingState {
    fn handle_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        state,
                        virtual_keycode: Some(keycode),
                        ..
                    },
                ..
            } => self.apply_key(*keycode, *state == ElementState::Pressed),
            _ => false,
        }
    }

    fn update(&mut self, dt: f32) -> bool {
        // Cap catch-up after a stall so the board does not teleport
        self.accumulator += dt.min(0.1);
        let tick_dt = 1.0 / self.config.tick_rate as f32;
        while self.accumulator >= tick_dt {
            self.accumulator -= tick_dt;
            if self.step() {
                return true;
            }
        }
        false
    }

    fn render(
        &mut self,
        renderer: &mut Renderer,
        device: &Device,
        queue: &Queue,
        surface: &Surface,
        _config: &SurfaceConfiguration,
    ) -> Result<(), wgpu::SurfaceError> {
        self.load_assets(renderer, device, queue);

        let width = self.config.window_width as f32;
        let height = self.config.window_height as f32;
        let mut batch = FrameBatch::new(width, height);

        batch.push_sprite("background", 0.0, 0.0, width, height);
        self.goal.push_sprite(&mut batch);
        self.player.entity.push_sprite(&mut batch);
        self.enemies[0].entity.push_sprite(&mut batch);
        if self.level_speed > 2.0 {
            self.enemies[1].entity.push_sprite(&mut batch);
        }
        if self.level_speed > 4.0 {
            self.enemies[2].entity.push_sprite(&mut batch);
        }

        match self.outcome {
            RoundOutcome::Running => {}
            RoundOutcome::Won => {
                let (x, y, w, h) = BANNER_RECT;
                batch.push_overlay(x, y, w, h, WIN_BANNER_COLOR);
            }
            RoundOutcome::Lost => {
                let (x, y, w, h) = BANNER_RECT;
                batch.push_overlay(x, y, w, h, LOSE_BANNER_COLOR);
            }
        }

        renderer.flush(device, queue, surface, batch)
    }
}

fn seed_round(config: &GameConfig, level_speed: f32) -> (Player, [Enemy; 3], Entity) {
    let width = config.window_width as f32;
    let player = Player::new(
        PLAYER_SPAWN.0,
        PLAYER_SPAWN.1,
        PLAYER_SIZE.0,
        PLAYER_SIZE.1,
        config.player_speed,
    );
    let enemy_speed = config.enemy_speed * level_speed;
    let enemies = [
        Enemy::new(
            config.left_margin,
            ENEMY_ROWS[0],
            ENEMY_SIZE.0,
            ENEMY_SIZE.1,
            enemy_speed,
        ),
        Enemy::new(
            width - config.right_margin,
            ENEMY_ROWS[1],
            ENEMY_SIZE.0,
            ENEMY_SIZE.1,
            enemy_speed,
        ),
        Enemy::new(
            config.left_margin,
            ENEMY_ROWS[2],
            ENEMY_SIZE.0,
            ENEMY_SIZE.1,
            enemy_speed,
        ),
    ];
    let goal = Entity::new("treasure", GOAL_SPAWN.0, GOAL_SPAWN.1, GOAL_SIZE.0, GOAL_SIZE.1);
    (player, enemies, goal)
}

use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

use space_invaders::canvas::{Canvas, Sprite};
use space_invaders::clock::ManualClock;
use space_invaders::config::Config;
use space_invaders::entities::*;
use space_invaders::game::Context;
use space_invaders::input::{Controls, FrameInput, GameEvent, Key};
use space_invaders::states::{State, Transition};
use space_invaders::timers::TimerId;
use space_invaders::world::GameWorld;

/// Context writing its leaderboard into a scratch directory.
fn context() -> (Context, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        save_file: dir.path().join("save.json"),
        ..Config::default()
    };
    let ctx = Context::new(&config, Box::new(ManualClock::new(0)), StdRng::seed_from_u64(42));
    (ctx, dir)
}

/// A world with nothing in it but the player.
fn bare_world(ctx: &mut Context) -> GameWorld {
    let mut world = GameWorld::new(ctx);
    world.obstacles.clear();
    world.wave.clear();
    world
}

fn idle() -> FrameInput {
    FrameInput::default()
}

// ── Construction ──────────────────────────────────────────────────────────────

#[test]
fn new_world_is_fully_populated() {
    let (mut ctx, _dir) = context();
    ctx.score = 900;
    let world = GameWorld::new(&mut ctx);
    assert_eq!(world.wave.aliens.len(), 48);
    assert_eq!(world.obstacles.len(), 3 * Obstacle::blocks_per_obstacle());
    assert_eq!(world.player.lives, 3);
    assert!(world.extra.is_none());
    assert_eq!(ctx.score, 0);
    assert_eq!(ctx.timers.interval_ms(TimerId::AlienFire), Some(800));
    let extra_in = ctx.timers.interval_ms(TimerId::ExtraSpawn).unwrap();
    assert!((4_000..=8_000).contains(&extra_in));
}

#[test]
fn obstacles_sit_at_three_quarters_height() {
    let (mut ctx, _dir) = context();
    let world = GameWorld::new(&mut ctx);
    let top = world.obstacles.iter().map(|b| b.rect.y).min().unwrap();
    assert_eq!(top, 450);
}

#[test]
fn reset_rebuilds_everything_and_zeroes_score() {
    let (mut ctx, _dir) = context();
    let mut world = bare_world(&mut ctx);
    world.player.lives = 1;
    world.go_to_pause = true;
    world.go_to_win = true;
    ctx.score = 700;

    world.reset(&mut ctx);
    assert_eq!(ctx.score, 0);
    assert_eq!(world.player.lives, 3);
    assert_eq!(world.wave.aliens.len(), 48);
    assert_eq!(world.obstacles.len(), 156);
    assert!(!world.go_to_pause && !world.go_to_fail && !world.go_to_win);
}

// ── Player lasers ─────────────────────────────────────────────────────────────

#[test]
fn obstacle_absorbs_laser_before_aliens() {
    let (mut ctx, _dir) = context();
    let mut world = bare_world(&mut ctx);
    world.obstacles.push(Block::new(5, 100, 100));
    world.wave.aliens.push(Alien::new(90, 90, 300));
    world.player.lasers.push(Laser::new(LaserOwner::Player, 102, 102, -5));

    world.check_collisions(&mut ctx);
    assert!(world.obstacles.is_empty());
    assert_eq!(world.wave.aliens.len(), 1);
    assert!(world.player.lasers.is_empty());
    assert_eq!(ctx.score, 0);
}

#[test]
fn laser_kills_every_overlapping_alien() {
    let (mut ctx, _dir) = context();
    let mut world = bare_world(&mut ctx);
    world.wave.aliens.push(Alien::new(70, 90, 300));
    world.wave.aliens.push(Alien::new(100, 90, 200));
    world.wave.aliens.push(Alien::new(300, 90, 100));
    world.player.lasers.push(Laser::new(LaserOwner::Player, 102, 102, -5));

    world.check_collisions(&mut ctx);
    assert_eq!(ctx.score, 500);
    assert_eq!(world.wave.aliens.len(), 1);
    assert_eq!(world.wave.aliens[0].value, 100);
    assert!(world.player.lasers.is_empty());
}

#[test]
fn alien_hit_spares_the_extra() {
    let (mut ctx, _dir) = context();
    let mut world = bare_world(&mut ctx);
    let mut extra = Extra::new(Side::Left, 600, 2);
    extra.rect.x = 90;
    extra.rect.y = 90;
    world.extra = Some(extra);
    world.wave.aliens.push(Alien::new(90, 90, 100));
    world.player.lasers.push(Laser::new(LaserOwner::Player, 102, 102, -5));

    world.check_collisions(&mut ctx);
    assert_eq!(ctx.score, 100);
    assert!(world.extra.is_some());
}

#[test]
fn laser_shoots_down_extra() {
    let (mut ctx, _dir) = context();
    let mut world = bare_world(&mut ctx);
    let mut extra = Extra::new(Side::Left, 600, 2);
    extra.rect.x = 200;
    world.extra = Some(extra);
    world.player.lasers.push(Laser::new(LaserOwner::Player, 210, 70, -5));

    world.check_collisions(&mut ctx);
    assert_eq!(ctx.score, EXTRA_VALUE);
    assert!(world.extra.is_none());
    assert!(world.player.lasers.is_empty());
}

#[test]
fn score_sums_over_kills() {
    let (mut ctx, _dir) = context();
    let mut world = bare_world(&mut ctx);
    for (i, value) in [300, 200, 100].into_iter().enumerate() {
        world.wave.aliens.push(Alien::new(i as i32 * 100, 200, value));
    }
    for i in 0..3 {
        world.player.lasers.push(Laser::new(LaserOwner::Player, i * 100 + 20, 216, -5));
    }
    world.check_collisions(&mut ctx);
    assert_eq!(ctx.score, 600);
    assert!(world.wave.aliens.is_empty());
}

// ── Alien lasers and bodies ───────────────────────────────────────────────────

#[test]
fn alien_laser_costs_a_life() {
    let (mut ctx, _dir) = context();
    let mut world = bare_world(&mut ctx);
    world.wave.lasers.push(Laser::new(LaserOwner::Alien, 300, 580, 3));

    world.check_collisions(&mut ctx);
    assert_eq!(world.player.lives, 2);
    assert!(world.wave.lasers.is_empty());
    assert!(!world.go_to_fail);
}

#[test]
fn last_life_lost_flags_failure() {
    let (mut ctx, _dir) = context();
    let mut world = bare_world(&mut ctx);
    world.player.lives = 1;
    world.wave.lasers.push(Laser::new(LaserOwner::Alien, 300, 580, 3));

    world.check_collisions(&mut ctx);
    assert_eq!(world.player.lives, 0);
    assert!(world.go_to_fail);
}

#[test]
fn obstacle_shields_player_from_alien_laser() {
    let (mut ctx, _dir) = context();
    let mut world = bare_world(&mut ctx);
    world.obstacles.push(Block::new(5, 298, 575));
    world.wave.lasers.push(Laser::new(LaserOwner::Alien, 300, 580, 3));

    world.check_collisions(&mut ctx);
    assert_eq!(world.player.lives, 3);
    assert!(world.obstacles.is_empty());
    assert!(world.wave.lasers.is_empty());
}

#[test]
fn alien_body_crushes_blocks() {
    let (mut ctx, _dir) = context();
    let mut world = bare_world(&mut ctx);
    world.obstacles.push(Block::new(5, 110, 460));
    world.obstacles.push(Block::new(5, 200, 460));
    world.wave.aliens.push(Alien::new(100, 450, 100));

    world.check_collisions(&mut ctx);
    assert_eq!(world.obstacles.len(), 1);
    assert_eq!(world.obstacles[0].rect.x, 200);
}

#[test]
fn alien_reaching_player_is_fatal() {
    let (mut ctx, _dir) = context();
    let mut world = bare_world(&mut ctx);
    world.wave.aliens.push(Alien::new(280, 560, 100));

    world.check_collisions(&mut ctx);
    assert!(world.go_to_fail);
    assert_eq!(world.player.lives, 3);
}

// ── Frame update and transitions ──────────────────────────────────────────────

#[test]
fn failure_persists_score_and_clears_field() {
    let (mut ctx, _dir) = context();
    let mut world = GameWorld::new(&mut ctx);
    world.player.lives = 1;
    world.wave.lasers.push(Laser::new(LaserOwner::Alien, 300, 580, 3));
    ctx.score = 1_234;

    let t = world.update(&idle(), &mut ctx);
    assert!(matches!(t, Transition::Push(State::FailedMenu(_))));
    assert!(world.obstacles.is_empty());
    assert!(world.wave.aliens.is_empty());
    assert!(!world.go_to_fail);
    assert_eq!(ctx.leaderboard.best("player"), Some(1_234));
    assert!(ctx.leaderboard.path().exists());
}

#[test]
fn cleared_wave_wins() {
    let (mut ctx, _dir) = context();
    let mut world = bare_world(&mut ctx);
    let t = world.update(&idle(), &mut ctx);
    assert!(matches!(t, Transition::Push(State::WinState(_))));
    assert!(!world.go_to_win);
}

#[test]
fn win_is_noticed_on_the_frame_after_the_last_kill() {
    let (mut ctx, _dir) = context();
    let mut world = bare_world(&mut ctx);
    world.wave.aliens.push(Alien::new(100, 100, 300));
    world.player.lasers.push(Laser::new(LaserOwner::Player, 120, 125, -5));

    let t = world.update(&idle(), &mut ctx);
    assert!(matches!(t, Transition::None));
    assert_eq!(ctx.score, 300);
    assert!(world.wave.aliens.is_empty());

    let t = world.update(&idle(), &mut ctx);
    assert!(matches!(t, Transition::Push(State::WinState(_))));
}

#[test]
fn wave_below_canvas_wins() {
    let (mut ctx, _dir) = context();
    let mut world = bare_world(&mut ctx);
    world.wave.aliens.push(Alien::new(100, 700, 100));
    let t = world.update(&idle(), &mut ctx);
    assert!(matches!(t, Transition::Push(State::WinState(_))));
}

#[test]
fn failure_outranks_pause_and_win() {
    let (mut ctx, _dir) = context();
    let mut world = bare_world(&mut ctx);
    world.player.lives = 1;
    world.wave.lasers.push(Laser::new(LaserOwner::Alien, 300, 580, 3));

    let input = FrameInput::with_events(vec![GameEvent::KeyDown(Key::Cancel)]);
    let t = world.update(&input, &mut ctx);
    assert!(matches!(t, Transition::Push(State::FailedMenu(_))));
}

#[test]
fn pause_outranks_win() {
    let (mut ctx, _dir) = context();
    let mut world = bare_world(&mut ctx);
    let input = FrameInput::with_events(vec![GameEvent::KeyDown(Key::Cancel)]);
    let t = world.update(&input, &mut ctx);
    assert!(matches!(t, Transition::Push(State::PauseMenu(_))));
    // The win is still pending once play resumes
    let t = world.update(&idle(), &mut ctx);
    assert!(matches!(t, Transition::Push(State::WinState(_))));
}

#[test]
fn quit_event_short_circuits() {
    let (mut ctx, _dir) = context();
    let mut world = GameWorld::new(&mut ctx);
    let t = world.update(&FrameInput::with_events(vec![GameEvent::Quit]), &mut ctx);
    assert!(matches!(t, Transition::Quit));
}

#[test]
fn alien_fire_event_adds_a_laser() {
    let (mut ctx, _dir) = context();
    let mut world = GameWorld::new(&mut ctx);
    let t = world.update(&FrameInput::with_events(vec![GameEvent::AlienFire]), &mut ctx);
    assert!(matches!(t, Transition::None));
    assert_eq!(world.wave.lasers.len(), 1);
}

#[test]
fn extra_spawn_event_launches_extra_and_rearms() {
    let (mut ctx, _dir) = context();
    let mut world = GameWorld::new(&mut ctx);
    world.update(&FrameInput::with_events(vec![GameEvent::ExtraSpawn]), &mut ctx);
    let extra = world.extra.as_ref().unwrap();
    assert_eq!(extra.rect.y, 60);
    assert_eq!(extra.speed.abs(), 2);
    let next = ctx.timers.interval_ms(TimerId::ExtraSpawn).unwrap();
    assert!((4_000..=8_000).contains(&next));
}

#[test]
fn extra_despawns_after_crossing() {
    let (mut ctx, _dir) = context();
    let mut world = GameWorld::new(&mut ctx);
    let mut extra = Extra::new(Side::Left, 600, 2);
    extra.rect.x = 598;
    world.extra = Some(extra);
    world.update(&idle(), &mut ctx);
    assert!(world.extra.is_none());
}

#[test]
fn held_controls_move_and_fire() {
    let (mut ctx, _dir) = context();
    let mut world = GameWorld::new(&mut ctx);
    let x = world.player.rect.x;
    let input = FrameInput::with_controls(Controls {
        left: true,
        right: false,
        fire: true,
    });
    world.update(&input, &mut ctx);
    assert_eq!(world.player.rect.x, x - 5);
    assert_eq!(world.player.lasers.len(), 1);
}

// ── Rendering ─────────────────────────────────────────────────────────────────

#[test]
fn render_draws_hud_and_entities() {
    let (mut ctx, _dir) = context();
    let world = GameWorld::new(&mut ctx);
    let mut canvas = Canvas::new(600, 600);
    world.render(&mut canvas, &ctx);

    assert_eq!(canvas.count_sprites(Sprite::Player), 1);
    assert_eq!(canvas.count_sprites(Sprite::Alien(300)), 8);
    assert_eq!(canvas.count_sprites(Sprite::Alien(200)), 16);
    assert_eq!(canvas.count_sprites(Sprite::Alien(100)), 24);
    // One icon per spare life
    assert_eq!(canvas.count_sprites(Sprite::LifeIcon), 2);
    assert!(canvas.texts().any(|t| t == "score: 0"));
}

//! The per-tick movement and collision step.
//!
//! All alive snakes move simultaneously: every proposed head cell is
//! computed first, deaths are resolved against that consistent picture, and
//! only the survivors actually advance. A snake that dies this tick keeps
//! the body it had before the tick.

use std::collections::HashSet;

use crate::game::grid::Cell;
use crate::game::state::{GameMode, RoomGame, TickEvent};

/// Advance the room by one tick. No-op once the round has finished.
pub fn advance(game: &mut RoomGame) -> Vec<TickEvent> {
    if game.finished {
        return Vec::new();
    }
    game.tick += 1;
    let mut events = Vec::new();

    // Apply buffered headings at the tick boundary
    for snake in game.snakes.iter_mut().filter(|s| s.alive) {
        if let Some(direction) = snake.pending.take() {
            snake.heading = direction;
        }
    }

    // Proposed head cell for every mover
    let movers: Vec<(usize, Cell)> = game
        .snakes
        .iter()
        .enumerate()
        .filter(|(_, s)| s.alive)
        .map(|(i, s)| (i, s.head().step(s.heading)))
        .collect();

    let mut died = vec![false; game.snakes.len()];

    // (a) leaving the grid
    for &(i, head) in &movers {
        if !head.in_bounds() {
            died[i] = true;
        }
    }

    // (c) two or more heads arriving at the same cell: all involved die,
    // no winner by priority
    for (a, &(i, head_a)) in movers.iter().enumerate() {
        for &(j, head_b) in movers.iter().skip(a + 1) {
            if head_a == head_b {
                died[i] = true;
                died[j] = true;
            }
        }
    }

    // (b) head intersects a body segment. Cells vacated this tick (the
    // tails of snakes that move without growing) are not occupied.
    let grows: Vec<bool> = movers
        .iter()
        .map(|&(i, head)| !died[i] && head == game.food)
        .collect();
    let mut vacated: HashSet<Cell> = HashSet::new();
    for (slot, &(i, _)) in movers.iter().enumerate() {
        if !died[i] && !grows[slot] {
            vacated.insert(game.snakes[i].tail());
        }
    }
    for &(i, head) in &movers {
        if died[i] {
            continue;
        }
        let blocked = game
            .snakes
            .iter()
            .any(|s| s.occupies(head) && !vacated.contains(&head));
        if blocked {
            died[i] = true;
        }
    }

    // Survivors advance; (d) a head on the food cell grows the body and
    // scores, and the food moves to a free cell afterwards
    let mut ate = false;
    for (slot, &(i, head)) in movers.iter().enumerate() {
        if died[i] {
            continue;
        }
        let snake = &mut game.snakes[i];
        snake.body.push_front(head);
        if grows[slot] {
            snake.score += 1;
            ate = true;
            events.push(TickEvent::FoodEaten {
                name: snake.name.clone(),
            });
        } else {
            snake.body.pop_back();
        }
    }
    if ate {
        game.relocate_food();
    }

    for (i, dead) in died.iter().enumerate() {
        if *dead {
            let snake = &mut game.snakes[i];
            snake.alive = false;
            snake.pending = None;
            events.push(TickEvent::SnakeDied {
                name: snake.name.clone(),
            });
        }
    }

    if round_over(game) {
        game.finished = true;
        events.push(TickEvent::RoundEnded);
    }

    events
}

/// Solo ends when its single snake dies; Duel ends when at most one snake
/// remains alive (a simultaneous wipe is a draw).
fn round_over(game: &RoomGame) -> bool {
    match game.mode {
        GameMode::Solo => game.alive_count() == 0,
        GameMode::Duel => game.alive_count() <= 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::grid::{Cell, Direction};

    fn solo_game() -> RoomGame {
        let mut game = RoomGame::with_seed(GameMode::Solo, 11);
        game.add_snake("Solo", "c1");
        game
    }

    fn duel_game() -> RoomGame {
        let mut game = RoomGame::with_seed(GameMode::Duel, 11);
        game.add_snake("A", "c1");
        game.add_snake("B", "c2");
        game
    }

    /// Park the food where no head will reach it during a test.
    fn park_food(game: &mut RoomGame, cell: Cell) {
        game.food = cell;
    }

    #[test]
    fn test_snake_moves_one_cell_per_tick() {
        let mut game = solo_game();
        park_food(&mut game, Cell::new(0, 0));
        let head = game.snakes[0].head();

        advance(&mut game);

        assert_eq!(game.snakes[0].head(), head.step(Direction::Right));
        assert_eq!(game.snakes[0].body.len(), 3);
        assert_eq!(game.tick, 1);
    }

    #[test]
    fn test_pending_heading_applied_at_tick() {
        let mut game = solo_game();
        park_food(&mut game, Cell::new(0, 0));
        let head = game.snakes[0].head();
        game.snake_mut("Solo").unwrap().set_pending(Direction::Down);

        advance(&mut game);

        let snake = game.snake("Solo").unwrap();
        assert_eq!(snake.heading, Direction::Down);
        assert_eq!(snake.head(), head.step(Direction::Down));
        assert_eq!(snake.pending, None);
    }

    #[test]
    fn test_wall_collision_kills_and_ends_solo() {
        let mut game = solo_game();
        park_food(&mut game, Cell::new(0, 0));

        // Head starts at col 2 heading right; the wall is past col 11
        let mut saw_end = false;
        for _ in 0..12 {
            let events = advance(&mut game);
            if events.contains(&TickEvent::RoundEnded) {
                saw_end = true;
                break;
            }
        }

        assert!(saw_end);
        assert!(game.finished);
        assert!(!game.snakes[0].alive);
        assert!(game.snakes[0].body.iter().all(|c| c.in_bounds()));
    }

    #[test]
    fn test_dead_snake_never_moves() {
        let mut game = solo_game();
        park_food(&mut game, Cell::new(0, 0));
        game.snakes[0].alive = false;
        game.finished = false;
        let body: Vec<Cell> = game.snakes[0].body.iter().copied().collect();

        advance(&mut game);

        let after: Vec<Cell> = game.snakes[0].body.iter().copied().collect();
        assert_eq!(body, after);
    }

    #[test]
    fn test_finished_game_ignores_ticks() {
        let mut game = solo_game();
        game.finished = true;
        let tick = game.tick;

        let events = advance(&mut game);

        assert!(events.is_empty());
        assert_eq!(game.tick, tick);
    }

    #[test]
    fn test_body_collision_kills_runner() {
        let mut game = duel_game();
        park_food(&mut game, Cell::new(0, 0));

        // A heads straight into B's body
        let a = game.snake_mut("A").unwrap();
        a.body.clear();
        a.body.extend([Cell::new(8, 7), Cell::new(8, 6), Cell::new(8, 5)]);
        a.heading = Direction::Right;
        let b = game.snake_mut("B").unwrap();
        b.body.clear();
        b.body.extend([Cell::new(7, 8), Cell::new(8, 8), Cell::new(9, 8)]);
        b.heading = Direction::Up;

        let events = advance(&mut game);

        assert!(events.contains(&TickEvent::SnakeDied { name: "A".into() }));
        assert!(events.contains(&TickEvent::RoundEnded));
        assert!(game.finished);
        assert!(!game.snake("A").unwrap().alive);
        assert!(game.snake("B").unwrap().alive);
    }

    #[test]
    fn test_self_collision_kills() {
        let mut game = solo_game();
        park_food(&mut game, Cell::new(0, 0));

        // A tight hook: head at (5,5) turning up into its own body at (4,5)
        let snake = game.snake_mut("Solo").unwrap();
        snake.body.clear();
        snake.body.extend([
            Cell::new(5, 5),
            Cell::new(5, 4),
            Cell::new(4, 4),
            Cell::new(4, 5),
            Cell::new(4, 6),
        ]);
        snake.heading = Direction::Right;
        snake.set_pending(Direction::Up);

        advance(&mut game);

        assert!(!game.snake("Solo").unwrap().alive);
        assert!(game.finished);
    }

    #[test]
    fn test_moving_into_vacated_tail_cell_survives() {
        let mut game = solo_game();
        park_food(&mut game, Cell::new(0, 0));

        // A 4-long loop: the head moves into the cell the tail leaves
        let snake = game.snake_mut("Solo").unwrap();
        snake.body.clear();
        snake.body.extend([
            Cell::new(5, 5),
            Cell::new(5, 4),
            Cell::new(4, 4),
            Cell::new(4, 5),
        ]);
        snake.heading = Direction::Right;
        snake.set_pending(Direction::Up);

        advance(&mut game);

        let snake = game.snake("Solo").unwrap();
        assert!(snake.alive);
        assert_eq!(snake.head(), Cell::new(4, 5));
    }

    #[test]
    fn test_head_to_head_kills_both() {
        let mut game = duel_game();
        park_food(&mut game, Cell::new(0, 0));

        let a = game.snake_mut("A").unwrap();
        a.body.clear();
        a.body.extend([Cell::new(5, 4), Cell::new(5, 3), Cell::new(5, 2)]);
        a.heading = Direction::Right;
        let b = game.snake_mut("B").unwrap();
        b.body.clear();
        b.body.extend([Cell::new(5, 6), Cell::new(5, 7), Cell::new(5, 8)]);
        b.heading = Direction::Left;

        let events = advance(&mut game);

        assert!(!game.snake("A").unwrap().alive);
        assert!(!game.snake("B").unwrap().alive);
        assert!(game.finished);
        assert!(events.contains(&TickEvent::RoundEnded));
    }

    #[test]
    fn test_eating_food_grows_and_scores() {
        let mut game = solo_game();
        let head = game.snakes[0].head();
        game.food = head.step(Direction::Right);
        let len = game.snakes[0].body.len();

        let events = advance(&mut game);

        let snake = game.snake("Solo").unwrap();
        assert_eq!(snake.body.len(), len + 1);
        assert_eq!(snake.score, 1);
        assert!(events.contains(&TickEvent::FoodEaten { name: "Solo".into() }));
        // Food relocated off every occupied cell
        assert!(!game.snakes.iter().any(|s| s.occupies(game.food)));
        assert!(game.food.in_bounds());
    }

    #[test]
    fn test_scores_never_decrease() {
        let mut game = duel_game();
        park_food(&mut game, Cell::new(0, 0));
        let mut last = (0, 0);
        for _ in 0..12 {
            advance(&mut game);
            let now = (game.snakes[0].score, game.snakes[1].score);
            assert!(now.0 >= last.0 && now.1 >= last.1);
            last = now;
            if game.finished {
                break;
            }
        }
    }

    #[test]
    fn test_duel_draw_when_both_die_same_tick() {
        let mut game = duel_game();
        park_food(&mut game, Cell::new(0, 0));

        // Default spawns run both snakes into opposite walls on the same tick
        let mut ticks = 0;
        while !game.finished && ticks < 16 {
            advance(&mut game);
            ticks += 1;
        }

        assert!(game.finished);
        assert_eq!(game.alive_count(), 0);
    }
}

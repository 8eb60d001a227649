// src/game/entities/player.rs
use super::Entity;

// The character controlled by the player. It only ever moves vertically;
// horizontal position is fixed for the whole round.
#[derive(Debug, Clone)]
pub struct Player {
    pub entity: Entity,
    // Pixels moved per tick while a direction key is held.
    pub speed: f32,
}

impl Player {
    pub fn new(x: f32, y: f32, width: f32, height: f32, speed: f32) -> Self {
        Self {
            entity: Entity::new("player", x, y, width, height),
            speed,
        }
    }

    // Move up when direction > 0 and down when direction < 0, then clamp at
    // the floor. There is no matching clamp at the top of the screen: holding
    // up can carry the player past y = 0 indefinitely.
    pub fn move_by(&mut self, direction: i8, screen_height: f32, bottom_margin: f32) {
        if direction > 0 {
            self.entity.rect.position.y -= self.speed;
        } else if direction < 0 {
            self.entity.rect.position.y += self.speed;
        }

        let floor = screen_height - bottom_margin;
        if self.entity.rect.position.y >= floor {
            self.entity.rect.position.y = floor;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_at(y: f32) -> Player {
        Player::new(375.0, y, 50.0, 80.0, 10.0)
    }

    #[test]
    fn moving_up_subtracts_speed() {
        let mut player = player_at(700.0);
        player.move_by(1, 800.0, 40.0);
        assert_eq!(player.entity.rect.position.y, 690.0);
    }

    #[test]
    fn moving_down_adds_speed() {
        let mut player = player_at(700.0);
        player.move_by(-1, 800.0, 40.0);
        assert_eq!(player.entity.rect.position.y, 710.0);
    }

    #[test]
    fn zero_direction_leaves_position_unchanged() {
        let mut player = player_at(700.0);
        player.move_by(0, 800.0, 40.0);
        assert_eq!(player.entity.rect.position.y, 700.0);
    }

    #[test]
    fn downward_movement_clamps_to_floor_and_stays_pinned() {
        let mut player = player_at(755.0);
        player.move_by(-1, 800.0, 40.0);
        assert_eq!(player.entity.rect.position.y, 760.0);

        for _ in 0..10 {
            player.move_by(-1, 800.0, 40.0);
            assert_eq!(player.entity.rect.position.y, 760.0);
        }
    }

    #[test]
    fn moving_up_is_unbounded() {
        let mut player = player_at(50.0);
        for _ in 0..20 {
            player.move_by(1, 800.0, 40.0);
        }
        assert_eq!(player.entity.rect.position.y, -150.0);
    }

    #[test]
    fn horizontal_position_never_changes() {
        let mut player = player_at(700.0);
        player.move_by(1, 800.0, 40.0);
        player.move_by(-1, 800.0, 40.0);
        assert_eq!(player.entity.rect.position.x, 375.0);
    }
}

// src/game/entities/enemy.rs
use super::Entity;

// An enemy patrolling horizontally between the two screen margins. The sign
// of `speed` encodes the current travel direction; its magnitude never
// changes after construction.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub entity: Entity,
    pub speed: f32,
}

impl Enemy {
    pub fn new(x: f32, y: f32, width: f32, height: f32, speed: f32) -> Self {
        Self {
            entity: Entity::new("enemy", x, y, width, height),
            speed,
        }
    }

    // The reversal check runs before the position update, so the enemy can
    // sit at or past a bound for one tick before it turns around.
    pub fn move_across(&mut self, screen_width: f32, left_margin: f32, right_margin: f32) {
        let x = self.entity.rect.position.x;
        if x <= left_margin {
            self.speed = self.speed.abs();
        } else if x >= screen_width - right_margin {
            self.speed = -self.speed.abs();
        }
        self.entity.rect.position.x += self.speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy_at(x: f32, speed: f32) -> Enemy {
        Enemy::new(x, 600.0, 50.0, 50.0, speed)
    }

    #[test]
    fn reverses_to_rightward_at_left_bound() {
        let mut enemy = enemy_at(20.0, -10.0);
        enemy.move_across(800.0, 20.0, 40.0);
        assert_eq!(enemy.speed, 10.0);
        assert_eq!(enemy.entity.rect.position.x, 30.0);
    }

    #[test]
    fn reverses_to_leftward_at_right_bound() {
        let mut enemy = enemy_at(760.0, 10.0);
        enemy.move_across(800.0, 20.0, 40.0);
        assert_eq!(enemy.speed, -10.0);
        assert_eq!(enemy.entity.rect.position.x, 750.0);
    }

    #[test]
    fn keeps_direction_between_bounds() {
        let mut enemy = enemy_at(400.0, 10.0);
        enemy.move_across(800.0, 20.0, 40.0);
        assert_eq!(enemy.speed, 10.0);
        assert_eq!(enemy.entity.rect.position.x, 410.0);
    }

    #[test]
    fn can_sit_past_a_bound_for_one_tick() {
        // Starting just inside the bound with leftward speed, the enemy steps
        // beyond it first and only reverses on the following tick.
        let mut enemy = enemy_at(25.0, -10.0);
        enemy.move_across(800.0, 20.0, 40.0);
        assert_eq!(enemy.entity.rect.position.x, 15.0);
        assert_eq!(enemy.speed, -10.0);

        enemy.move_across(800.0, 20.0, 40.0);
        assert_eq!(enemy.speed, 10.0);
        assert_eq!(enemy.entity.rect.position.x, 25.0);
    }

    #[test]
    fn speed_magnitude_is_preserved_across_many_ticks() {
        let mut enemy = enemy_at(20.0, 15.0);
        for _ in 0..500 {
            enemy.move_across(800.0, 20.0, 40.0);
            assert_eq!(enemy.speed.abs(), 15.0);
        }
    }
}

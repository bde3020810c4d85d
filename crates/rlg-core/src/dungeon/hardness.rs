//! Interior rock hardness seeding

use std::collections::VecDeque;

use super::{Level, Position};
use crate::GameRng;
use crate::world::{GenerationConfig, HardnessProfile};

/// 5x5 gaussian kernel used by the smoothed profile
const GAUSSIAN: [[u32; 5]; 5] = [
    [1, 4, 7, 4, 1],
    [4, 16, 26, 16, 4],
    [7, 26, 41, 26, 7],
    [4, 16, 26, 16, 4],
    [1, 4, 7, 4, 1],
];

/// Seed values scattered before diffusion: 1, 21, ..., 241
const SEED_MIN: u32 = 1;
const SEED_MAX: u32 = 241;
const SEED_STEP: usize = 20;

/// Assign hardness to every interior rock cell
pub fn seed_hardness(level: &mut Level, config: &GenerationConfig, rng: &mut GameRng) {
    match config.hardness_profile {
        HardnessProfile::Uniform => seed_uniform(level, config, rng),
        HardnessProfile::Smoothed => seed_smoothed(level, config, rng),
    }
}

fn seed_uniform(level: &mut Level, config: &GenerationConfig, rng: &mut GameRng) {
    let (lo, hi) = (config.min_hardness as usize, config.max_hardness as usize);
    for y in 1..level.height().saturating_sub(1) {
        for x in 1..level.width().saturating_sub(1) {
            let hardness = rng.range(lo, hi) as u8;
            level.set_rock_hardness(Position::new(x, y), hardness);
        }
    }
}

fn seed_smoothed(level: &mut Level, config: &GenerationConfig, rng: &mut GameRng) {
    let width = level.width().saturating_sub(2);
    let height = level.height().saturating_sub(2);
    if width == 0 || height == 0 {
        return;
    }

    let field = blur(&blur(&diffuse(width, height, rng), width, height), width, height);

    let lo = config.min_hardness as u32;
    let hi = config.max_hardness as u32;
    for (index, &value) in field.iter().enumerate() {
        let clamped = value.clamp(SEED_MIN, SEED_MAX);
        let scaled = lo + (clamped - SEED_MIN) * (hi - lo) / (SEED_MAX - SEED_MIN);
        let pos = Position::new(index % width + 1, index / width + 1);
        level.set_rock_hardness(pos, scaled as u8);
    }
}

/// Scatter seed values and grow them breadth-first until the field is full
fn diffuse(width: usize, height: usize, rng: &mut GameRng) -> Vec<u32> {
    let mut field = vec![0u32; width * height];
    let mut queue = VecDeque::new();

    for value in (SEED_MIN..=SEED_MAX).step_by(SEED_STEP) {
        if queue.len() == field.len() {
            break;
        }
        let index = loop {
            let candidate = rng.rn2(field.len() as u32) as usize;
            if field[candidate] == 0 {
                break candidate;
            }
        };
        field[index] = value;
        queue.push_back(index);
    }

    while let Some(index) = queue.pop_front() {
        let (x, y) = (index % width, index / width);
        let value = field[index];
        for dy in -1isize..=1 {
            for dx in -1isize..=1 {
                let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy))
                else {
                    continue;
                };
                if nx >= width || ny >= height {
                    continue;
                }
                let neighbor = ny * width + nx;
                if field[neighbor] == 0 {
                    field[neighbor] = value;
                    queue.push_back(neighbor);
                }
            }
        }
    }

    field
}

/// One pass of the 5x5 gaussian, renormalised at the edges
fn blur(field: &[u32], width: usize, height: usize) -> Vec<u32> {
    let mut out = vec![0u32; field.len()];
    for y in 0..height {
        for x in 0..width {
            let (mut weight, mut total) = (0u32, 0u32);
            for (p, row) in GAUSSIAN.iter().enumerate() {
                for (q, &k) in row.iter().enumerate() {
                    let (Some(sx), Some(sy)) = (
                        (x + q).checked_sub(2).filter(|&sx| sx < width),
                        (y + p).checked_sub(2).filter(|&sy| sy < height),
                    ) else {
                        continue;
                    };
                    weight += k;
                    total += field[sy * width + sx] * k;
                }
            }
            out[y * width + x] = total / weight;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interior_hardness(level: &Level) -> Vec<u8> {
        let mut values = Vec::new();
        for y in 1..level.height() - 1 {
            for x in 1..level.width() - 1 {
                values.push(level.hardness(Position::new(x, y)));
            }
        }
        values
    }

    #[test]
    fn test_uniform_within_range() {
        let config = GenerationConfig {
            min_hardness: 10,
            max_hardness: 20,
            ..Default::default()
        };
        let mut level = Level::new(80, 21);
        seed_hardness(&mut level, &config, &mut GameRng::new(42));
        assert!(interior_hardness(&level).iter().all(|h| (10..=20).contains(h)));
        assert!(level.is_consistent());
    }

    #[test]
    fn test_smoothed_within_range() {
        let config = GenerationConfig {
            hardness_profile: HardnessProfile::Smoothed,
            ..Default::default()
        };
        let mut level = Level::new(80, 21);
        seed_hardness(&mut level, &config, &mut GameRng::new(7));
        let values = interior_hardness(&level);
        assert!(values.iter().all(|&h| h >= config.min_hardness && h <= config.max_hardness));
        assert!(level.is_consistent());
    }

    #[test]
    fn test_smoothed_neighbours_are_close() {
        let config = GenerationConfig {
            hardness_profile: HardnessProfile::Smoothed,
            ..Default::default()
        };
        let mut level = Level::new(80, 21);
        seed_hardness(&mut level, &config, &mut GameRng::new(11));
        let mut max_jump = 0;
        for y in 1..20 {
            for x in 1..78 {
                let a = level.hardness(Position::new(x, y)) as i32;
                let b = level.hardness(Position::new(x + 1, y)) as i32;
                max_jump = max_jump.max((a - b).abs());
            }
        }
        // Independent uniform draws would jump by close to the full range.
        assert!(max_jump < 150, "largest step was {}", max_jump);
    }

    #[test]
    fn test_diffuse_fills_everything() {
        let field = diffuse(10, 4, &mut GameRng::new(3));
        assert!(field.iter().all(|&v| v > 0));
    }

    #[test]
    fn test_diffuse_tiny_field() {
        let field = diffuse(2, 2, &mut GameRng::new(3));
        assert_eq!(field.len(), 4);
        assert!(field.iter().all(|&v| v > 0));
    }
}

use bevy::prelude::*;
use bevy_egui::egui::{self, Color32, Pos2, Stroke};
use rand::Rng;
use std::f32::consts::TAU;

const CONFETTI_COUNT: usize = 100;
const BALLOON_COUNT: usize = 20;
const GLITTER_COUNT: usize = 50;

/// Downward velocity gained by confetti each tick.
const CONFETTI_GRAVITY: f32 = 0.1;

const STRING_COLOR: [u8; 3] = [200, 200, 200];

enum ParticleKind {
    Confetti { rotation: f32, spin: f32 },
    Balloon { wobble: f32, wobble_speed: f32, wobble_amount: f32 },
    Glitter,
}

/// One transient shape. Lifetimes are counted in ticks of the 60 Hz frame
/// loop, matching the spawn ranges below.
struct Particle {
    pos: Vec2,
    vel: Vec2,
    color: [u8; 3],
    size: f32,
    age: u32,
    lifetime: u32,
}

struct Spawned {
    particle: Particle,
    kind: ParticleKind,
}

impl Spawned {
    fn confetti(width: f32, height: f32, rng: &mut impl Rng) -> Self {
        Self {
            particle: Particle {
                pos: Vec2::new(
                    rng.gen_range(0.0..=width),
                    rng.gen_range(0.0..=height / 2.0),
                ),
                vel: Vec2::new(rng.gen_range(-2.0..2.0), rng.gen_range(1.0..5.0)),
                color: [
                    rng.gen_range(50..=255),
                    rng.gen_range(50..=255),
                    rng.gen_range(50..=255),
                ],
                size: rng.gen_range(5..=15) as f32,
                age: 0,
                lifetime: rng.gen_range(120..=240),
            },
            kind: ParticleKind::Confetti {
                rotation: rng.gen_range(0.0..360.0),
                spin: rng.gen_range(-5.0..5.0),
            },
        }
    }

    fn balloon(width: f32, height: f32, rng: &mut impl Rng) -> Self {
        Self {
            particle: Particle {
                // Released just below the bottom edge, rising.
                pos: Vec2::new(
                    rng.gen_range(0.0..=width),
                    height + rng.gen_range(10.0..=50.0),
                ),
                vel: Vec2::new(rng.gen_range(-0.5..0.5), rng.gen_range(-3.0..-1.0)),
                color: [
                    rng.gen_range(100..=255),
                    rng.gen_range(100..=255),
                    rng.gen_range(100..=255),
                ],
                size: rng.gen_range(20..=40) as f32,
                age: 0,
                lifetime: rng.gen_range(180..=300),
            },
            kind: ParticleKind::Balloon {
                wobble: 0.0,
                wobble_speed: rng.gen_range(0.05..0.1),
                wobble_amount: rng.gen_range(0.5..2.0),
            },
        }
    }

    fn glitter(width: f32, height: f32, rng: &mut impl Rng) -> Self {
        let angle = rng.gen_range(0.0..TAU);
        let speed = rng.gen_range(1.0..3.0);
        Self {
            particle: Particle {
                pos: Vec2::new(rng.gen_range(0.0..=width), rng.gen_range(0.0..=height)),
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                color: [
                    rng.gen_range(200..=255),
                    rng.gen_range(200..=255),
                    rng.gen_range(100..=150),
                ],
                size: rng.gen_range(2..=5) as f32,
                age: 0,
                lifetime: rng.gen_range(60..=120),
            },
            kind: ParticleKind::Glitter,
        }
    }

    /// Advances one tick. Returns false once the particle is spent: its age
    /// reached its lifetime, or a balloon cleared the top edge.
    fn step(&mut self) -> bool {
        let p = &mut self.particle;
        match &mut self.kind {
            ParticleKind::Confetti { rotation, spin } => {
                p.pos += p.vel;
                p.vel.y += CONFETTI_GRAVITY;
                *rotation += *spin;
            }
            ParticleKind::Balloon {
                wobble,
                wobble_speed,
                wobble_amount,
            } => {
                p.pos.y += p.vel.y;
                p.pos.x += p.vel.x + wobble.sin() * *wobble_amount;
                *wobble += *wobble_speed;
            }
            ParticleKind::Glitter => {
                p.pos += p.vel;
            }
        }
        p.age += 1;
        let alive = p.age < p.lifetime;
        match self.kind {
            ParticleKind::Balloon { .. } => alive && p.pos.y > -p.size,
            _ => alive,
        }
    }

    /// Opacity fades linearly from opaque at birth to transparent at the end
    /// of the lifetime.
    fn alpha(&self) -> u8 {
        let p = &self.particle;
        let fade = 1.0 - p.age as f32 / p.lifetime as f32;
        (255.0 * fade.clamp(0.0, 1.0)) as u8
    }

    fn fill(&self) -> Color32 {
        let [r, g, b] = self.particle.color;
        Color32::from_rgba_unmultiplied(r, g, b, self.alpha())
    }

    fn draw(&self, painter: &egui::Painter) {
        let p = &self.particle;
        let center = Pos2::new(p.pos.x, p.pos.y);
        match &self.kind {
            ParticleKind::Confetti { rotation, .. } => {
                // A square of side `size`, rotated about its center.
                let half = p.size * 0.5;
                let (sin, cos) = rotation.to_radians().sin_cos();
                let corners = [(-half, -half), (half, -half), (half, half), (-half, half)]
                    .map(|(x, y)| {
                        Pos2::new(center.x + x * cos - y * sin, center.y + x * sin + y * cos)
                    });
                painter.add(egui::Shape::convex_polygon(
                    corners.to_vec(),
                    self.fill(),
                    Stroke::NONE,
                ));
            }
            ParticleKind::Balloon { .. } => {
                let fill = self.fill();
                painter.circle_filled(center, p.size, fill);
                // Tie knot under the body, then the string.
                painter.add(egui::Shape::convex_polygon(
                    vec![
                        Pos2::new(center.x, center.y + p.size),
                        Pos2::new(center.x - 5.0, center.y + p.size + 15.0),
                        Pos2::new(center.x + 5.0, center.y + p.size + 15.0),
                    ],
                    fill,
                    Stroke::NONE,
                ));
                let [r, g, b] = STRING_COLOR;
                painter.line_segment(
                    [
                        Pos2::new(center.x, center.y + p.size + 15.0),
                        Pos2::new(center.x, center.y + p.size + 40.0),
                    ],
                    Stroke::new(2.0, Color32::from_rgba_unmultiplied(r, g, b, self.alpha())),
                );
            }
            ParticleKind::Glitter => {
                painter.circle_filled(center, p.size, self.fill());
            }
        }
    }
}

/// The celebration engine. Inactive and empty until a win activates it;
/// drains itself back to inactive once every particle has expired.
#[derive(Resource, Default)]
pub struct ParticleSystem {
    particles: Vec<Spawned>,
    active: bool,
}

impl ParticleSystem {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Fills the three celebration groups. A no-op while a celebration is
    /// already running, so re-entering the win screen neither resets nor
    /// duplicates the swarm.
    pub fn start_celebration(&mut self, width: f32, height: f32, rng: &mut impl Rng) {
        if self.active {
            return;
        }
        self.active = true;
        self.particles.clear();
        self.particles.reserve(CONFETTI_COUNT + BALLOON_COUNT + GLITTER_COUNT);
        for _ in 0..CONFETTI_COUNT {
            self.particles.push(Spawned::confetti(width, height, rng));
        }
        for _ in 0..BALLOON_COUNT {
            self.particles.push(Spawned::balloon(width, height, rng));
        }
        for _ in 0..GLITTER_COUNT {
            self.particles.push(Spawned::glitter(width, height, rng));
        }
    }

    pub fn update(&mut self) {
        if !self.active {
            return;
        }
        self.particles.retain_mut(Spawned::step);
        if self.particles.is_empty() {
            self.active = false;
        }
    }

    pub fn draw(&self, painter: &egui::Painter) {
        if !self.active {
            return;
        }
        for particle in &self.particles {
            particle.draw(painter);
        }
    }
}

pub struct CelebrationPlugin;

impl Plugin for CelebrationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ParticleSystem>()
            .add_systems(Update, tick_particles);
    }
}

fn tick_particles(mut fx: ResMut<ParticleSystem>) {
    fx.update();
}

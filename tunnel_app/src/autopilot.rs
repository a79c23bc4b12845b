//! Scripted shooter standing in for a human player

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tunnel_engine::config::HitStrategy;
use tunnel_engine::foundation::math::{Vec3, Vec4};
use tunnel_engine::input::PointerState;
use tunnel_engine::prelude::*;

// Seconds between trigger pulls
const FIRE_INTERVAL: f32 = 0.25;
// Chance of picking the wrong laser color
const COLOR_SLIP: f64 = 0.15;
// Aim jitter in world units / pixels
const AIM_JITTER: f32 = 1.5;
const CLICK_JITTER: f64 = 6.0;

/// Fires at the nearest card on a fixed cadence
pub struct Autopilot {
    rng: StdRng,
    cooldown: f32,
    camera: Camera,
    pointer: PointerState,
}

impl Autopilot {
    /// Create an autopilot viewing through `camera` on a `width`x`height` window
    pub fn new(seed: u64, camera: Camera, width: u32, height: u32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            cooldown: 0.0,
            camera,
            pointer: PointerState::new(width, height),
        }
    }

    /// Step the trigger cadence and shoot when ready
    pub fn update(&mut self, session: &mut Session, delta: f32) {
        self.cooldown -= delta;
        if self.cooldown > 0.0 {
            return;
        }

        let Some((position, color)) = Self::closest(session) else { return };
        self.cooldown = FIRE_INTERVAL;

        match session.config().hit.strategy {
            HitStrategy::Proximity => {
                let color = if self.rng.gen_bool(COLOR_SLIP) { color.opposite() } else { color };
                let aim = position
                    + Vec3::new(
                        self.rng.gen_range(-AIM_JITTER..=AIM_JITTER),
                        self.rng.gen_range(-AIM_JITTER..=AIM_JITTER),
                        0.0,
                    );
                session.shoot(&Shot::Proximity { position: aim, color });
            }
            HitStrategy::Ray => {
                let (x, y) = self.click_at(position);
                session.shoot(&Shot::Screen { x, y, camera: &self.camera });
            }
        }
    }

    /// Move the pointer over a world position and read it back as NDC
    fn click_at(&mut self, position: Vec3) -> (f32, f32) {
        let clip = self.camera.view_projection_matrix() * Vec4::new(position.x, position.y, position.z, 1.0);
        let (ndc_x, ndc_y) = (f64::from(clip.x / clip.w), f64::from(clip.y / clip.w));

        let width = f64::from(self.pointer.window_width);
        let height = f64::from(self.pointer.window_height);
        self.pointer.update_position(
            (ndc_x + 1.0) * 0.5 * width + self.rng.gen_range(-CLICK_JITTER..=CLICK_JITTER),
            (1.0 - ndc_y) * 0.5 * height + self.rng.gen_range(-CLICK_JITTER..=CLICK_JITTER),
        );
        self.pointer.to_ndc()
    }

    fn closest(session: &Session) -> Option<(Vec3, CardColor)> {
        session
            .pool()
            .targets()
            .max_by(|(_, a), (_, b)| a.position.z.total_cmp(&b.position.z))
            .map(|(_, t)| (t.position, t.color().unwrap_or(CardColor::Red)))
    }
}

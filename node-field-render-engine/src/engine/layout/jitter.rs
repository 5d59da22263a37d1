use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// Independent jitter streams per entity, so one channel never shifts another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JitterChannel {
    Angle,
    Radius,
    Height,
}

impl JitterChannel {
    fn salt(self) -> u64 {
        match self {
            Self::Angle => 0x9E37_79B9_7F4A_7C15,
            Self::Radius => 0xC2B2_AE3D_27D4_EB4F,
            Self::Height => 0x1656_67B1_9E37_79F9,
        }
    }
}

/// Source of per-entity random draws in `[-0.5, 0.5)`.
///
/// Draws depend only on the entity and channel, never on call order.
pub trait JitterSource {
    fn draw(&self, entity_id: &str, channel: JitterChannel) -> f32;
}

/// PCG stream seeded from the layout seed and the entity identifier.
#[derive(Debug, Clone, Copy)]
pub struct SeededJitter {
    seed: u64,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl JitterSource for SeededJitter {
    fn draw(&self, entity_id: &str, channel: JitterChannel) -> f32 {
        let stream = self.seed ^ fnv1a(entity_id.as_bytes()) ^ channel.salt();
        let mut rng = Pcg64Mcg::seed_from_u64(stream);
        rng.random::<f32>() - 0.5
    }
}

/// Disables jitter entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn draw(&self, _entity_id: &str, _channel: JitterChannel) -> f32 {
        0.0
    }
}

// 64-bit FNV-1a, stable across toolchains unlike the std hasher.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, byte| (hash ^ *byte as u64).wrapping_mul(PRIME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_draws_are_stable_and_bounded() {
        let jitter = SeededJitter::new(7);
        for id in ["a", "b", "sun-wukong", ""] {
            for channel in [JitterChannel::Angle, JitterChannel::Radius, JitterChannel::Height] {
                let first = jitter.draw(id, channel);
                assert_eq!(first, jitter.draw(id, channel));
                assert!((-0.5..0.5).contains(&first));
            }
        }
    }

    #[test]
    fn channels_and_seeds_produce_different_streams() {
        let jitter = SeededJitter::new(7);
        assert_ne!(
            jitter.draw("entity", JitterChannel::Angle),
            jitter.draw("entity", JitterChannel::Radius)
        );
        assert_ne!(
            jitter.draw("entity", JitterChannel::Angle),
            SeededJitter::new(8).draw("entity", JitterChannel::Angle)
        );
    }

    #[test]
    fn fnv1a_matches_reference_vectors() {
        assert_eq!(fnv1a(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
    }
}

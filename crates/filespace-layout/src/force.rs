//! The three forces of the model plus the integrator.
//!
//! All functions accumulate into node velocities; positions only change in [`integrate`]. Forces
//! follow d3-force semantics (link, many-body, x/y positioning) with the many-body term computed
//! over all pairs.

use crate::geom::WorldVector;
use crate::graph::SimNode;

/// A link resolved to dense node indices, with its rest length.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Link {
    pub parent: usize,
    pub child: usize,
    pub rest_length: f64,
}

pub(crate) fn apply_links(nodes: &mut [SimNode], links: &[Link], alpha: f64, rng: &mut Jitter) {
    for link in links {
        let (s, t) = (link.parent, link.child);
        if s == t || s >= nodes.len() || t >= nodes.len() {
            continue;
        }
        let source = (nodes[s].position + nodes[s].velocity, nodes[s].degree.max(1));
        let target = (nodes[t].position + nodes[t].velocity, nodes[t].degree.max(1));

        let mut d = target.0 - source.0;
        if d.x == 0.0 {
            d.x = rng.jiggle();
        }
        if d.y == 0.0 {
            d.y = rng.jiggle();
        }
        let len = d.length();
        let strength = 1.0 / (source.1.min(target.1) as f64);
        let d = d * ((len - link.rest_length) / len * alpha * strength);

        // Heavier-connected endpoints move less.
        let bias = source.1 as f64 / (source.1 + target.1) as f64;
        nodes[t].velocity -= d * bias;
        nodes[s].velocity += d * (1.0 - bias);
    }
}

/// All-pairs inverse-square repulsion. `strengths[i]` is the push exerted by node `i`.
pub(crate) fn apply_repulsion(
    nodes: &mut [SimNode],
    strengths: &[f64],
    distance_min: f64,
    alpha: f64,
    rng: &mut Jitter,
) {
    let n = nodes.len();
    if n < 2 {
        return;
    }
    let distance_min2 = distance_min * distance_min;
    let mut dv: Vec<WorldVector> = vec![WorldVector::zero(); n];

    for i in 0..n {
        for j in (i + 1)..n {
            let mut d = nodes[j].position - nodes[i].position;
            if d.x == 0.0 {
                d.x = rng.jiggle();
            }
            if d.y == 0.0 {
                d.y = rng.jiggle();
            }
            let mut l2 = d.square_length();
            if l2 < distance_min2 {
                l2 = (distance_min2 * l2).sqrt();
            }
            dv[i] -= d * (strengths[j] * alpha / l2);
            dv[j] += d * (strengths[i] * alpha / l2);
        }
    }

    for (node, delta) in nodes.iter_mut().zip(dv) {
        node.velocity += delta;
    }
}

pub(crate) fn apply_centering(nodes: &mut [SimNode], strength: f64, alpha: f64) {
    let k = strength * alpha;
    for node in nodes {
        node.velocity.x -= node.position.x * k;
        node.velocity.y -= node.position.y * k;
    }
}

/// Moves free nodes by their damped velocity and snaps pinned nodes to their pin.
///
/// Returns the summed displacement of all nodes.
pub(crate) fn integrate(nodes: &mut [SimNode], velocity_decay: f64) -> f64 {
    let keep = 1.0 - velocity_decay;
    let mut total = 0.0;
    for node in nodes {
        match node.pinned {
            Some(pin) => {
                total += node.position.distance_to(pin);
                node.position = pin;
                node.velocity = WorldVector::zero();
            }
            None => {
                node.velocity *= keep;
                node.position += node.velocity;
                total += node.velocity.length();
            }
        }
    }
    total
}

/// Deterministic tiny offsets for coincident coordinates (xorshift64*).
#[derive(Debug, Clone)]
pub(crate) struct Jitter {
    state: u64,
}

impl Jitter {
    const MAGNITUDE: f64 = 1e-6;

    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D_u64)
    }

    fn next_f64_unit(&mut self) -> f64 {
        // [0, 1) with 53 bits of precision.
        let u = self.next_u64() >> 11;
        (u as f64) / ((1u64 << 53) as f64)
    }

    /// Never returns zero.
    pub fn jiggle(&mut self) -> f64 {
        let v = (self.next_f64_unit() - 0.5) * Self::MAGNITUDE;
        if v == 0.0 { Self::MAGNITUDE / 2.0 } else { v }
    }
}

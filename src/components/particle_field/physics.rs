use super::node::{Node, POINTER_RADIUS};

/// Advance every node by one tick: ballistic motion plus elastic reflection
/// off the four viewport walls. A pinned pointer node is held at its pin
/// with zero velocity instead.
///
/// There are no forces and no damping; speed magnitude only ever changes
/// at a wall, where the bounced axis flips sign.
pub fn step(nodes: &mut [Node], width: f64, height: f64) {
	for node in nodes.iter_mut() {
		match node {
			Node::Particle(p) => {
				p.x += p.vx;
				p.y += p.vy;
				reflect_axis(&mut p.x, &mut p.vx, p.radius, width);
				reflect_axis(&mut p.y, &mut p.vy, p.radius, height);
			}
			Node::Pointer(p) => match p.pin {
				Some(pin) => {
					p.vx = 0.0;
					p.vy = 0.0;
					p.x = pin.x;
					p.y = pin.y;
				}
				None => {
					p.x += p.vx;
					p.y += p.vy;
					reflect_axis(&mut p.x, &mut p.vx, POINTER_RADIUS, width);
					reflect_axis(&mut p.y, &mut p.vy, POINTER_RADIUS, height);
				}
			},
		}
	}
}

/// Clamp one axis to `[radius, extent - radius]`, turning the velocity back
/// into the interior at the instant of contact. A radius wider than half
/// the extent degenerates to the midpoint with the axis velocity zeroed.
fn reflect_axis(pos: &mut f64, vel: &mut f64, radius: f64, extent: f64) {
	if radius * 2.0 > extent {
		*pos = extent / 2.0;
		*vel = 0.0;
		return;
	}
	if *pos <= radius {
		*pos = radius;
		*vel = vel.abs();
	} else if *pos >= extent - radius {
		*pos = extent - radius;
		*vel = -vel.abs();
	}
}

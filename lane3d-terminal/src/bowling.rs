/// The bowling alley scene and its keyframed roll
use lane3d_core::{
    shapes, Color, Easing, Keyframe, NodeId, NormalMode, SceneError, SceneGraph, ShapeBuilder,
    Sprite, TweenError,
};

const WOOD: Color = Color::new(0.55, 0.5, 0.45);
const LANE: Color = Color::new(0.3, 0.2, 0.1);
const PIN_WHITE: Color = Color::new(0.98, 0.98, 0.98);
const BALL_COLORS: [Color; 3] = [
    Color::new(0.5, 0.05, 0.05),
    Color::new(0.5, 0.5, 0.05),
    Color::new(0.5, 0.05, 0.5),
];

/// Pin profile as `[radius, height]`, top to bottom
const PIN_PROFILE: [[f64; 2]; 23] = [
    [0.0, 0.43],
    [0.03, 0.425],
    [0.065, 0.40],
    [0.095, 0.35],
    [0.104, 0.30],
    [0.10, 0.25],
    [0.09, 0.20],
    [0.075, 0.15],
    [0.071, 0.12],
    [0.075, 0.09],
    [0.09, 0.05],
    [0.117, 0.0],
    [0.145, -0.06],
    [0.17, -0.12],
    [0.18, -0.17],
    [0.183, -0.23],
    [0.18, -0.28],
    [0.17, -0.34],
    [0.15, -0.44],
    [0.135, -0.50],
    [0.12, -0.55],
    [0.10, -0.60],
    [0.0, -0.60],
];

const PIN_BANDS: usize = 25;
const BALL_BANDS: usize = 15;
const RACK_ROWS: usize = 4;
const RACK_Y: f64 = 1.1;
const RACK_FRONT_Z: f64 = -106.0;
const PIN_SPACING: f64 = 1.4;

/// Where a knocked pin flies, lands and comes to rest.
///
/// Fixed so every run of the animation looks the same.
struct PinScatter {
    /// Frame the ball reaches the pin
    hit_frame: u32,
    /// Frames between the hit and the landing
    flight: u32,
    tumble_axis: [f64; 3],
    landing: [f64; 3],
    landing_axis: [f64; 3],
    /// `x` and `z` of the final resting place
    rest: [f64; 2],
    rest_axis: [f64; 3],
}

const fn scatter(
    hit_frame: u32,
    flight: u32,
    tumble_axis: [f64; 3],
    landing: [f64; 3],
    landing_axis: [f64; 3],
    rest: [f64; 2],
    rest_axis: [f64; 3],
) -> PinScatter {
    PinScatter {
        hit_frame,
        flight,
        tumble_axis,
        landing,
        landing_axis,
        rest,
        rest_axis,
    }
}

// front pin first, then row by row from left to right
const SCATTER: [PinScatter; 10] = [
    scatter(199, 6, [0.62, 0.18, 0.91], [0.35, 1.12, -109.1], [0.44, 0.73, 0.15], [-0.52, -115.4], [0.21, 0.84, 0.37]),
    scatter(201, 7, [0.11, 0.57, 0.83], [-1.86, 0.93, -110.7], [0.92, 0.31, 0.55], [-2.17, -113.6], [0.67, 0.12, 0.49]),
    scatter(201, 8, [0.75, 0.42, 0.06], [1.94, 1.04, -111.3], [0.28, 0.66, 0.81], [1.63, -114.9], [0.35, 0.58, 0.72]),
    scatter(203, 6, [0.33, 0.88, 0.47], [-2.31, 0.86, -108.4], [0.59, 0.07, 0.94], [-1.38, -112.5], [0.83, 0.46, 0.19]),
    scatter(203, 7, [0.97, 0.25, 0.64], [0.12, 1.18, -111.8], [0.16, 0.95, 0.38], [0.77, -115.8], [0.48, 0.29, 0.86]),
    scatter(203, 8, [0.41, 0.69, 0.22], [2.27, 0.97, -109.6], [0.73, 0.52, 0.11], [2.08, -113.1], [0.14, 0.77, 0.63]),
    scatter(205, 6, [0.58, 0.09, 0.77], [-1.12, 1.07, -110.2], [0.37, 0.84, 0.26], [-0.91, -114.3], [0.69, 0.33, 0.58]),
    scatter(205, 7, [0.24, 0.81, 0.53], [-0.47, 0.82, -111.5], [0.88, 0.19, 0.67], [0.24, -112.8], [0.26, 0.91, 0.44]),
    scatter(205, 8, [0.86, 0.36, 0.29], [1.21, 1.15, -108.9], [0.09, 0.62, 0.87], [1.12, -115.1], [0.57, 0.18, 0.79]),
    scatter(205, 7, [0.15, 0.94, 0.68], [2.38, 0.89, -110.9], [0.71, 0.43, 0.34], [2.31, -113.9], [0.92, 0.64, 0.08]),
];

const PIN_REST_FRAME: u32 = 218;
const PIN_SETTLE_FRAME: u32 = 225;

/// The assembled alley and the nodes the animation drives
#[derive(Debug, Clone)]
pub struct BowlingScene {
    pub graph: SceneGraph,
    pub balls: [NodeId; 3],
    pub pins: Vec<NodeId>,
}

impl BowlingScene {
    pub fn build() -> Result<Self, SceneError> {
        let mut graph = SceneGraph::new();
        let root = graph.root();

        graph.insert(root, alley())?;
        for (name, x, y, scale) in [
            ("end top", 0.0, 5.0, (4.3, 0.5, 4.2)),
            ("end left", -3.6, 2.6, (0.6, 2.8, 4.0)),
            ("end right", 3.6, 2.6, (0.6, 2.8, 4.0)),
        ] {
            graph.insert(
                root,
                ShapeBuilder::new(shapes::cube())
                    .name(name)
                    .translate(x, y, -111.0)
                    .scale(scale.0, scale.1, scale.2)
                    .color(WOOD),
            )?;
        }

        let mut balls = [root; 3];
        for (i, (ball, color)) in balls.iter_mut().zip(BALL_COLORS).enumerate() {
            *ball = graph.insert(
                root,
                ShapeBuilder::new(shapes::sphere(0.5, BALL_BANDS, BALL_BANDS))
                    .name(format!("ball {}", i + 1))
                    .normal_mode(NormalMode::Vertex)
                    .translate(3.6, 0.9, -11.0 - 2.0 * i as f64)
                    .scale(0.4, 0.4, 0.4)
                    .color(color)
                    .shininess(30.0),
            )?;
        }

        let rack = graph.insert(root, ShapeBuilder::group().name("pins").children(rack()))?;
        let pins = graph.children(rack)?.to_vec();

        Ok(Self { graph, balls, pins })
    }

    /// Keyframe tracks for the first ball and every pin
    pub fn sprites(&self) -> Result<Vec<Sprite>, TweenError> {
        let mut sprites = Vec::with_capacity(1 + self.pins.len());
        sprites.push(self.ball_roll()?);
        for (pin, scatter) in self.pins.iter().zip(&SCATTER) {
            sprites.push(self.pin_scatter(*pin, scatter)?);
        }
        Ok(sprites)
    }

    /// The ball is lifted off the rack, dropped onto the lane, rolled with a
    /// heavy spin and swept into the pit
    fn ball_roll(&self) -> Result<Sprite, TweenError> {
        let ball = self.balls[0];
        let start = self.graph.transform(ball)?.translate;

        Sprite::new(
            ball,
            vec![
                Keyframe::at(0)
                    .translate(start.x, start.y, start.z)
                    .ease(Easing::QuadInOut),
                Keyframe::at(72)
                    .translate(0.01, 4.0, -7.0)
                    .ease(Easing::QuadInOut),
                Keyframe::at(100)
                    .translate(0.01, 3.0, -5.0)
                    .axis(0.0, 1.0, 0.0)
                    .angle(0.0)
                    .ease(Easing::QuadOut),
                Keyframe::at(110)
                    .translate(0.01, 1.0, -8.0)
                    .axis(0.0, 1.0, 0.0)
                    .angle(90.0)
                    .ease(Easing::QuadInOut),
                Keyframe::at(118)
                    .translate(0.01, 0.4, -16.0)
                    .axis(1.0, 1.0, 0.0)
                    .angle(720.0)
                    .ease(Easing::QuadInOut),
                Keyframe::at(200)
                    .translate(0.01, 0.4, -108.0)
                    .axis(1.0, 1.0, 0.0)
                    .angle(36000.0)
                    .ease(Easing::Linear),
                Keyframe::at(220)
                    .translate(-1.1, 0.4, -112.0)
                    .axis(0.0, 1.0, 0.0)
                    .angle(3400.0)
                    .ease(Easing::QuadIn),
                Keyframe::at(230)
                    .translate(-2.3, 0.4, -112.0)
                    .axis(0.0, 1.0, 0.0)
                    .angle(3200.0)
                    .ease(Easing::QuadIn),
            ],
        )
    }

    /// A pin stands until the ball arrives, tumbles into the pit and settles
    fn pin_scatter(&self, pin: NodeId, scatter: &PinScatter) -> Result<Sprite, TweenError> {
        let stand = self.graph.transform(pin)?.translate;
        let [tx, ty, tz] = scatter.tumble_axis;
        let [lx, ly, lz] = scatter.landing;
        let [lax, lay, laz] = scatter.landing_axis;
        let [rx, rz] = scatter.rest;
        let [rax, ray, raz] = scatter.rest_axis;

        Sprite::new(
            pin,
            vec![
                Keyframe::at(0)
                    .translate(stand.x, stand.y, stand.z)
                    .ease(Easing::QuadIn),
                Keyframe::at(scatter.hit_frame)
                    .translate(stand.x, stand.y, stand.z)
                    .axis(tx, ty, tz)
                    .ease(Easing::Linear),
                Keyframe::at(scatter.hit_frame + scatter.flight)
                    .translate(lx, ly, lz)
                    .axis(lax, lay, laz)
                    .angle(90.0)
                    .ease(Easing::Linear),
                Keyframe::at(PIN_REST_FRAME)
                    .translate(rx, 0.3, rz)
                    .axis(rax, ray, raz)
                    .angle(200.0)
                    .ease(Easing::QuadIn),
                Keyframe::at(PIN_SETTLE_FRAME)
                    .angle(270.0)
                    .ease(Easing::QuadIn),
            ],
        )
    }
}

fn alley() -> ShapeBuilder {
    let rail = |x: f64| {
        ShapeBuilder::new(shapes::cube())
            .name(if x < 0.0 { "left rail" } else { "right rail" })
            .translate(x, 1.5, 0.0)
            .scale(0.2, 3.0, 1.0)
            .color(WOOD)
    };

    ShapeBuilder::new(shapes::cube())
        .name("alley")
        .translate(0.0, -0.1, -62.0)
        .scale(3.0, 0.1, 52.0)
        .color(LANE)
        .shininess(4.0)
        .child(rail(1.2))
        .child(rail(-1.2))
}

/// Ten pins in a triangle, one more per row going back
fn rack() -> Vec<ShapeBuilder> {
    let pin = ShapeBuilder::new(shapes::lathe(&PIN_PROFILE, PIN_BANDS))
        .rotate(0.0, 1.0, 0.0, 1.0)
        .scale(0.8, 0.9, 0.8)
        .color(PIN_WHITE)
        .shininess(20.0);

    let mut pins = Vec::with_capacity(10);
    let mut z = RACK_FRONT_Z;
    for row in 0..RACK_ROWS {
        let mut x = -PIN_SPACING - row as f64 * PIN_SPACING / 2.0;
        for _ in 0..=row {
            x += PIN_SPACING;
            pins.push(
                pin.clone()
                    .name(format!("pin {}", pins.len() + 1))
                    .translate(x, RACK_Y, z),
            );
        }
        z -= 1.0;
    }
    pins
}

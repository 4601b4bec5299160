//! Face turn engine.
//!
//! A [`CubeSession`] owns the occupancy mapping (which piece object sits in
//! which slot) and at most one in-flight turn animation. Turns are requested
//! with [`CubeSession::turn()`] and advanced one frame per
//! [`CubeSession::tick()`]; the slot permutation is committed on the final
//! frame.

use std::collections::HashSet;
use std::f64::consts::{FRAC_PI_2, TAU};

use strum::{EnumCount, IntoEnumIterator};

use crate::clock::{FrameClock, Tick};
use crate::config::{AnimationConfig, CubeConfig, SceneConfig};
use crate::cube::{
    FACE_PIECE_COUNT, Face, PIECE_COUNT, PIECES, Piece, QUARTER_TURN_SHIFT, Slot,
};
use crate::easing::Curve;
use crate::scene::{ObjectId, Scene};

/// Rotation of one face turn, in radians.
pub const TURN: f32 = std::f32::consts::FRAC_PI_2;

/// Result of a turn request.
#[must_use]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The turn started animating.
    Accepted,
    /// Another turn is still animating; the request was dropped.
    Busy,
    /// Some scene objects are not resolved yet; the request was dropped.
    NotReady,
}

/// Assignment of piece objects to slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupancy([Option<ObjectId>; PIECE_COUNT]);

impl Default for Occupancy {
    fn default() -> Self {
        Self([None; PIECE_COUNT])
    }
}

impl Occupancy {
    /// Object currently in `slot`, or `None` if it has not been resolved.
    pub fn get(&self, slot: Slot) -> Option<ObjectId> {
        self.0[slot.index()]
    }

    /// Whether every slot holds an object.
    pub fn is_resolved(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    /// Iterates over slots and their objects in occupancy order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, Option<ObjectId>)> + '_ {
        Slot::all().zip(self.0.iter().copied())
    }

    /// Objects in the slots moved by `face`, in ring order.
    fn ring(&self, face: Face) -> Option<[ObjectId; FACE_PIECE_COUNT]> {
        let mut objects = [ObjectId::new(0); FACE_PIECE_COUNT];
        for (object, slot) in objects.iter_mut().zip(face.slots()) {
            *object = self.get(slot)?;
        }
        Some(objects)
    }

    /// Applies the slot permutation of a quarter turn of `face`: each ring
    /// slot takes the occupant of the slot two positions ahead of it.
    fn quarter_turn(&mut self, face: Face) {
        let slots = face.slots();
        let before = self.0;
        for (i, slot) in slots.iter().enumerate() {
            let from = slots[(i + QUARTER_TURN_SHIFT) % FACE_PIECE_COUNT];
            self.0[slot.index()] = before[from.index()];
        }
    }
}

/// Turn in progress.
///
/// Angles are kept in `f64` and the face angle is wrapped into `[0, 2π)`
/// when the turn starts, so precision does not degrade over a long session.
#[derive(Debug, Clone)]
struct TurnAnimation {
    face: Face,
    /// Orientation marker of the face.
    marker: ObjectId,
    /// Objects being moved, in ring order.
    objects: [ObjectId; FACE_PIECE_COUNT],
    /// Angle of each object around the axis, relative to the face angle,
    /// measured before the first frame.
    offsets: [f64; FACE_PIECE_COUNT],
    /// Face angle before the turn, in `[0, 2π)`.
    initial_angle: f64,
    curve: Curve,
    clock: FrameClock,
}

impl TurnAnimation {
    fn new(
        face: Face,
        marker: ObjectId,
        objects: [ObjectId; FACE_PIECE_COUNT],
        animation: &AnimationConfig,
        scene: &impl Scene,
    ) -> Self {
        let [a, b] = face.plane();
        let initial_angle = f64::from(scene.rotation(marker, face.axis())).rem_euclid(TAU);
        let offsets = objects.map(|obj| {
            let pos_a = f64::from(scene.position(obj, a));
            let pos_b = f64::from(scene.position(obj, b));
            pos_a.atan2(pos_b) - initial_angle
        });
        Self {
            face,
            marker,
            objects,
            offsets,
            initial_angle,
            curve: animation.easing.curve(),
            clock: FrameClock::new(animation.frames),
        }
    }

    fn angle_at(&self, tick: Tick) -> f64 {
        match tick {
            Tick::Step { .. } => {
                self.initial_angle + FRAC_PI_2 * f64::from(self.curve.ease(tick.progress()))
            }
            // Snap so that easing error never accumulates across turns.
            Tick::Final => self.initial_angle + FRAC_PI_2,
        }
    }

    /// Moves every object to `angle` around the face axis, keeping its
    /// distance from the axis.
    fn apply(&self, angle: f64, scene: &mut impl Scene) {
        let axis = self.face.axis();
        let [a, b] = self.face.plane();
        for (&obj, &offset) in self.objects.iter().zip(&self.offsets) {
            let pos_a = f64::from(scene.position(obj, a));
            let pos_b = f64::from(scene.position(obj, b));
            let radius = pos_a.hypot(pos_b);
            scene.set_position(obj, a, (radius * (angle + offset).sin()) as f32);
            scene.set_position(obj, b, (radius * (angle + offset).cos()) as f32);
            scene.set_rotation(obj, axis, angle as f32);
        }
        scene.set_rotation(self.marker, axis, angle as f32);
    }
}

#[derive(Debug, Clone, Default)]
enum AnimationState {
    #[default]
    Idle,
    Animating(Box<TurnAnimation>),
}

/// Long-lived cube state: occupancy mapping, face markers and the turn
/// currently animating.
#[derive(Debug, Clone)]
pub struct CubeSession {
    animation: AnimationConfig,
    scene: SceneConfig,

    /// Current occupancy.
    occupancy: Occupancy,
    /// Occupancy at load time.
    home: Occupancy,
    /// Orientation marker of each face.
    markers: [Option<ObjectId>; Face::COUNT],

    state: AnimationState,
}

impl CubeSession {
    /// Constructs a session with nothing resolved yet.
    pub fn new(config: &CubeConfig) -> Self {
        Self {
            animation: config.animation.clone(),
            scene: config.scene.clone(),

            occupancy: Occupancy::default(),
            home: Occupancy::default(),
            markers: [None; Face::COUNT],

            state: AnimationState::Idle,
        }
    }

    /// Resolves piece and face objects by name. Call this once the scene has
    /// reported that it finished loading; calling it again resolves whatever
    /// was still missing.
    ///
    /// If two names resolve to the same object, everything resolved so far
    /// is discarded.
    ///
    /// # Returns
    /// Whether every piece and face object is now resolved to its own object.
    pub fn resolve(&mut self, scene: &impl Scene) -> bool {
        if self.is_ready() {
            return true;
        }

        let mut missing = vec![];
        for piece in Piece::iter() {
            let slot = piece.slot().index();
            if self.home.0[slot].is_none() {
                let name = self.scene.object_name(piece.name());
                match scene.resolve(&name) {
                    Some(id) => self.home.0[slot] = Some(id),
                    None => missing.push(name),
                }
            }
        }
        // No turn can happen before this point, so occupancy is still home.
        self.occupancy = self.home.clone();

        for face in Face::iter() {
            if self.markers[face.index()].is_none() {
                let name = self.scene.object_name(face.name());
                match scene.resolve(&name) {
                    Some(id) => self.markers[face.index()] = Some(id),
                    None => missing.push(name),
                }
            }
        }

        if !missing.is_empty() {
            log::warn!("unresolved scene objects: {}", missing.join(", "));
            return false;
        }

        // Every slot and marker owns a distinct object.
        let mut seen = HashSet::new();
        let duplicate = (self.home.0.iter().chain(&self.markers))
            .flatten()
            .copied()
            .find(|&id| !seen.insert(id));
        if let Some(duplicate) = duplicate {
            log::error!("scene object {duplicate:?} resolved for more than one name");
            self.home = Occupancy::default();
            self.occupancy = Occupancy::default();
            self.markers = [None; Face::COUNT];
            return false;
        }

        log::debug!("all cube objects resolved");
        true
    }

    /// Whether every piece and face object is resolved.
    pub fn is_ready(&self) -> bool {
        self.occupancy.is_resolved() && self.markers.iter().all(Option::is_some)
    }

    /// Whether a turn is animating.
    pub fn is_animating(&self) -> bool {
        matches!(self.state, AnimationState::Animating(_))
    }

    /// Face of the turn animating and its linear progress from 0 to 1.
    pub fn current_turn(&self) -> Option<(Face, f32)> {
        match &self.state {
            AnimationState::Idle => None,
            AnimationState::Animating(anim) => {
                let progress = match anim.clock.total() {
                    0 => 1.0,
                    total => anim.clock.frame() as f32 / total as f32,
                };
                Some((anim.face, progress))
            }
        }
    }

    /// Requests a quarter turn of `face`.
    ///
    /// The turn animates over the following [`Self::tick()`] calls. It is
    /// dropped if another turn is animating or if any object is unresolved;
    /// in that case nothing is written to the scene.
    pub fn turn(&mut self, scene: &impl Scene, face: Face) -> TurnOutcome {
        if self.is_animating() {
            log::debug!("dropping turn {face}: already animating");
            return TurnOutcome::Busy;
        }
        let (true, Some(marker), Some(objects)) = (
            self.is_ready(),
            self.markers[face.index()],
            self.occupancy.ring(face),
        ) else {
            log::debug!("dropping turn {face}: scene objects not resolved");
            return TurnOutcome::NotReady;
        };

        let anim = TurnAnimation::new(face, marker, objects, &self.animation, scene);
        log::debug!("turning {face} from {:.3} rad", anim.initial_angle);
        self.state = AnimationState::Animating(Box::new(anim));
        TurnOutcome::Accepted
    }

    /// Advances the turn animating by one frame and writes the new transforms
    /// to the scene. On the final frame the occupancy permutation is
    /// committed and the session becomes idle again.
    ///
    /// # Returns
    /// Whether a frame was written.
    pub fn tick(&mut self, scene: &mut impl Scene) -> bool {
        let AnimationState::Animating(anim) = &mut self.state else {
            return false;
        };
        let Some(tick) = anim.clock.advance() else {
            self.state = AnimationState::Idle;
            return false;
        };

        let angle = anim.angle_at(tick);
        log::trace!("turn {} {tick:?}: angle {angle:.4}", anim.face);
        anim.apply(angle, scene);

        if tick == Tick::Final {
            let face = anim.face;
            self.state = AnimationState::Idle;
            self.occupancy.quarter_turn(face);
            log::debug!("turned {face}: {}", self.describe());
        }
        true
    }

    /// Current occupancy mapping.
    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    /// Piece currently in each slot, or `None` where unresolved.
    pub fn pieces_by_slot(&self) -> [Option<Piece>; PIECE_COUNT] {
        std::array::from_fn(|i| {
            let obj = self.occupancy.0[i]?;
            let home_slot = self.home.0.iter().position(|&home| home == Some(obj))?;
            Some(PIECES[home_slot])
        })
    }

    /// Whether every slot holds the piece it held at load time.
    pub fn is_solved(&self) -> bool {
        self.occupancy.is_resolved() && self.occupancy == self.home
    }

    /// One-line listing of slot occupants, `-` for unresolved slots.
    pub fn describe(&self) -> String {
        self.pieces_by_slot()
            .iter()
            .map(|piece| piece.map_or("-", Piece::name))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cube::Axis;
    use crate::scene::SceneGraph;

    fn ready_session(config: &CubeConfig) -> (CubeSession, SceneGraph) {
        let scene = SceneGraph::cube(&config.scene);
        let mut session = CubeSession::new(config);
        assert!(session.resolve(&scene));
        (session, scene)
    }

    fn run_to_completion(session: &mut CubeSession, scene: &mut SceneGraph) -> usize {
        let mut frames = 0;
        while session.tick(scene) {
            frames += 1;
        }
        frames
    }

    #[test]
    fn test_turn_frame_count() {
        let config = CubeConfig::default();
        let (mut session, mut scene) = ready_session(&config);
        assert_eq!(TurnOutcome::Accepted, session.turn(&scene, Face::W));
        assert_eq!(51, run_to_completion(&mut session, &mut scene));
        assert!(!session.is_animating());
        assert!(!session.tick(&mut scene));
    }

    #[test]
    fn test_white_quarter_turn_moves_pieces() {
        let config = CubeConfig::default();
        let (mut session, mut scene) = ready_session(&config);
        assert_eq!(TurnOutcome::Accepted, session.turn(&scene, Face::W));
        run_to_completion(&mut session, &mut scene);

        // RW started at +Z and ends at +X, where BW was.
        let rw = scene.object_by_name("RWf").unwrap();
        assert_abs_diff_eq!(rw.position, Piece::BW.rest_position(1.0), epsilon = 1e-5);
        assert_abs_diff_eq!(rw.rotation[Axis::Y.index()], TURN);
        assert_eq!(Some(Piece::RW), session.pieces_by_slot()[Piece::BW.slot().index()]);

        let marker = scene.object_by_name("Wf").unwrap();
        assert_eq!(TURN, marker.rotation[Axis::Y.index()]);

        // The bottom layer is untouched.
        let ry = scene.object_by_name("RYf").unwrap();
        assert_eq!(Piece::RY.rest_position(1.0), ry.position);
    }

    #[test]
    fn test_current_turn_progress() {
        let config = CubeConfig::default();
        let (mut session, mut scene) = ready_session(&config);
        assert_eq!(None, session.current_turn());
        assert_eq!(TurnOutcome::Accepted, session.turn(&scene, Face::G));
        assert_eq!(Some((Face::G, 0.0)), session.current_turn());
        for _ in 0..25 {
            session.tick(&mut scene);
        }
        assert_eq!(Some((Face::G, 0.5)), session.current_turn());
    }

    #[test]
    fn test_describe() {
        let config = CubeConfig::default();
        let (session, _scene) = ready_session(&config);
        assert_eq!(
            "OGW OW OBW BW RBW RW RGW GW OG OB RB RG OYG OY OYB YB RYB RY RYG YG",
            session.describe(),
        );
        assert!(session.is_solved());

        let unresolved = CubeSession::new(&config);
        assert!(unresolved.describe().starts_with("- - -"));
        assert!(!unresolved.is_solved());
    }

    #[test]
    fn test_quarter_turn_permutation() {
        let mut occupancy = Occupancy(std::array::from_fn(|i| Some(ObjectId::new(i as u32))));
        occupancy.quarter_turn(Face::W);
        let ring = Face::W.slots();
        for i in 0..FACE_PIECE_COUNT {
            let expected = ring[(i + 2) % FACE_PIECE_COUNT].index() as u32;
            assert_eq!(Some(ObjectId::new(expected)), occupancy.get(ring[i]));
        }
        for slot in Piece::OG.slot().index()..PIECE_COUNT {
            assert_eq!(Some(ObjectId::new(slot as u32)), occupancy.0[slot]);
        }
    }
}

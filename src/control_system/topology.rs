//! Static lane and pattern tables for a four-way intersection.
//!
//! Both tables are indexed by enum ordinal. An empty slot (`None`) marks a
//! lane that is not part of the entry: the lane itself or its phase partner
//! in the opposing table, and every lane outside the phase in the pattern
//! table is simply absent.

use crate::shared_data::{Lane, Phase, SensorState, VehicleSensors, LANE_COUNT, PHASE_COUNT};

type OpposingRow = [Option<Lane>; LANE_COUNT];

const ALL_BUT_NORTH_SOUTH_TURNING: OpposingRow = [
    Some(Lane::N_N),
    None,
    Some(Lane::S_S),
    None,
    Some(Lane::E_E),
    Some(Lane::E_N),
    Some(Lane::W_W),
    Some(Lane::W_S),
];

const ALL_BUT_NORTH_SOUTH_THROUGH: OpposingRow = [
    None,
    Some(Lane::N_W),
    None,
    Some(Lane::S_E),
    Some(Lane::E_E),
    Some(Lane::E_N),
    Some(Lane::W_W),
    Some(Lane::W_S),
];

const ALL_BUT_EAST_WEST_TURNING: OpposingRow = [
    Some(Lane::N_N),
    Some(Lane::N_W),
    Some(Lane::S_S),
    Some(Lane::S_E),
    Some(Lane::E_E),
    None,
    Some(Lane::W_W),
    None,
];

const ALL_BUT_EAST_WEST_THROUGH: OpposingRow = [
    Some(Lane::N_N),
    Some(Lane::N_W),
    Some(Lane::S_S),
    Some(Lane::S_E),
    None,
    Some(Lane::E_N),
    None,
    Some(Lane::W_S),
];

/// Lanes whose occupancy conflicts with a green on the indexing lane.
pub const OPPOSING_LANES: [OpposingRow; LANE_COUNT] = [
    ALL_BUT_NORTH_SOUTH_THROUGH, // N_N
    ALL_BUT_NORTH_SOUTH_TURNING, // N_W
    ALL_BUT_NORTH_SOUTH_THROUGH, // S_S
    ALL_BUT_NORTH_SOUTH_TURNING, // S_E
    ALL_BUT_EAST_WEST_THROUGH,   // E_E
    ALL_BUT_EAST_WEST_TURNING,   // E_N
    ALL_BUT_EAST_WEST_THROUGH,   // W_W
    ALL_BUT_EAST_WEST_TURNING,   // W_S
];

/// The two lanes turned green by each phase.
pub const PHASE_LANES: [[Lane; 2]; PHASE_COUNT] = [
    [Lane::N_W, Lane::S_E], // NorthSouthTurning
    [Lane::N_N, Lane::S_S], // NorthSouthThrough
    [Lane::E_N, Lane::W_S], // EastWestTurning
    [Lane::E_E, Lane::W_W], // EastWestThrough
];

pub fn opposing_lanes(lane: Lane) -> impl Iterator<Item = Lane> {
    OPPOSING_LANES[lane.index()].into_iter().flatten()
}

pub fn phase_lanes(phase: Phase) -> &'static [Lane; 2] {
    &PHASE_LANES[phase.index()]
}

pub fn phase_contains(phase: Phase, lane: Lane) -> bool {
    phase_lanes(phase).contains(&lane)
}

/// True when none of `lane`'s opposing lanes report a vehicle.
pub fn opposing_lanes_clear(lane: Lane, sensors: &VehicleSensors) -> bool {
    opposing_lanes(lane).all(|other| sensors[other.index()] == SensorState::Clear)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared_data::{all_sensors, sensors_with};

    fn partner(lane: Lane) -> Lane {
        let phase = Phase::ALL
            .into_iter()
            .find(|phase| phase_contains(*phase, lane))
            .unwrap();
        phase_lanes(phase)
            .iter()
            .copied()
            .find(|other| *other != lane)
            .unwrap()
    }

    #[test]
    fn opposing_lanes_never_list_self_or_partner() {
        for lane in Lane::ALL {
            let opposing: Vec<Lane> = opposing_lanes(lane).collect();
            assert!(!opposing.contains(&lane), "{lane} opposes itself");
            assert!(!opposing.contains(&partner(lane)), "{lane} opposes its partner");
            assert_eq!(opposing.len(), LANE_COUNT - 2);
        }
    }

    #[test]
    fn opposition_is_symmetric() {
        for lane in Lane::ALL {
            for other in opposing_lanes(lane) {
                assert!(
                    opposing_lanes(other).any(|back| back == lane),
                    "{lane} opposes {other} but not the other way round"
                );
            }
        }
    }

    #[test]
    fn phases_cover_every_lane_exactly_once() {
        let mut seen = [0usize; LANE_COUNT];
        for phase in Phase::ALL {
            for lane in phase_lanes(phase) {
                seen[lane.index()] += 1;
            }
        }
        assert_eq!(seen, [1; LANE_COUNT]);
    }

    #[test]
    fn clearance_depends_only_on_opposing_lanes() {
        // The partner lane being occupied does not block clearance.
        let sensors = sensors_with(&[Lane::N_W, Lane::S_E]);
        assert!(opposing_lanes_clear(Lane::N_W, &sensors));
        assert!(!opposing_lanes_clear(Lane::N_N, &sensors));

        let everything = all_sensors(SensorState::Set);
        for lane in Lane::ALL {
            assert!(!opposing_lanes_clear(lane, &everything));
        }
    }
}

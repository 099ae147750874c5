use super::*;

fn settled_snapshot(map: &InfluenceMap) -> Vec<(Pos, PathSquare)> {
    let mut out = Vec::new();
    for y in 0..map.rows() {
        for x in 0..map.cols() {
            let pos = Pos::new(x as i32, y as i32);
            let square = map.square(pos);
            if square.is_settled() {
                out.push((pos, square));
            }
        }
    }
    out
}

#[test]
fn target_square_is_distance_zero_without_direction() {
    let mut map = InfluenceMap::new(6, 6, Pos::new(2, 3));
    assert!(map.compute(None));
    let target = map.square(Pos::new(2, 3));
    assert_eq!(target.distance, 0);
    assert_eq!(target.direction, Orientation::None);
    assert!(target.is_settled());
}

#[test]
fn open_room_distances_are_chebyshev() {
    let target = Pos::new(5, 5);
    let mut map = InfluenceMap::new(10, 10, target);
    assert!(map.compute(None));
    for y in 0..10 {
        for x in 0..10 {
            let pos = Pos::new(x, y);
            assert_eq!(map.square(pos).distance, pos.chebyshev(target), "distance at {pos:?}");
        }
    }
}

#[test]
fn corner_square_points_diagonally_at_target() {
    let mut map = InfluenceMap::new(10, 10, Pos::new(5, 5));
    map.compute(None);
    let corner = map.square(Pos::new(0, 0));
    assert_eq!(corner.direction, Orientation::SE);
    assert_eq!(corner.distance, 5);
}

#[test]
fn ring_scoring_takes_diagonal_over_orthogonal_at_equal_distance() {
    // (2,0) has settled ring-1 neighbours at (1,1) diagonal and (2,1) orthogonal.
    let mut map = InfluenceMap::new(5, 5, Pos::new(2, 2));
    map.compute(None);
    assert_eq!(map.square(Pos::new(2, 0)).direction, Orientation::SW);
    assert_eq!(map.square(Pos::new(2, 1)).direction, Orientation::S);
}

#[test]
fn enclosed_square_never_settles() {
    let mut map = InfluenceMap::new(7, 7, Pos::new(0, 0));
    for pos in Pos::new(4, 4).neighbours() {
        map.set_obstacle(pos, true);
    }
    assert!(map.compute(None));
    let pocket = map.square(Pos::new(4, 4));
    assert_eq!(pocket.state, SquareState::Pending);
    assert_eq!(pocket.distance, UNREACHABLE);
    assert!(map.recommended_moves(Pos::new(4, 4)).is_empty());
}

#[test]
fn obstacle_is_excluded_from_recommendations() {
    let mut map = InfluenceMap::new(10, 10, Pos::new(5, 5));
    map.set_obstacle(Pos::new(5, 4), true);
    map.compute(None);

    assert_eq!(map.square(Pos::new(5, 4)).state, SquareState::Blocked);
    let from_target = map.recommended_moves(Pos::new(5, 5));
    assert!(!from_target.contains(&Pos::new(5, 4)));
    for neighbour in [Pos::new(5, 3), Pos::new(4, 4), Pos::new(6, 4), Pos::new(4, 3)] {
        let moves = map.recommended_moves(neighbour);
        assert!(!moves.contains(&Pos::new(5, 4)), "{neighbour:?} routed through obstacle");
    }
    // Square directly above the obstacle still settles around it.
    assert_eq!(map.square(Pos::new(5, 3)).distance, 2);
}

#[test]
fn recommended_moves_rank_by_score_then_neighbourhood_order() {
    let mut map = InfluenceMap::new(10, 10, Pos::new(5, 5));
    map.compute(None);
    let moves = map.recommended_moves(Pos::new(5, 3));
    // Distance 1 row: (4,4),(5,4),(6,4) score 5,3,5; standing still scores 7.
    assert_eq!(moves[0], Pos::new(5, 4));
    assert_eq!(moves[1], Pos::new(4, 4));
    assert_eq!(moves[2], Pos::new(6, 4));
    assert_eq!(moves[3], Pos::new(4, 3));
    assert_eq!(moves[4], Pos::new(6, 3));
    assert_eq!(moves[5], Pos::new(5, 3));
    assert_eq!(moves.len(), 9);
}

#[test]
fn same_target_does_not_reset() {
    let mut map = InfluenceMap::new(8, 8, Pos::new(1, 1));
    map.compute(Some(3));
    let before = settled_snapshot(&map);
    let ring = map.frontier_distance();
    map.set_target(Pos::new(1, 1));
    assert_eq!(settled_snapshot(&map), before);
    assert_eq!(map.frontier_distance(), ring);
}

#[test]
fn new_target_restarts_from_single_square() {
    let mut map = InfluenceMap::new(8, 8, Pos::new(1, 1));
    map.compute(None);
    map.set_target(Pos::new(6, 6));
    assert!(!map.is_complete());
    let settled = settled_snapshot(&map);
    assert_eq!(settled.len(), 1);
    assert_eq!(settled[0].0, Pos::new(6, 6));
}

#[test]
fn budget_stops_at_requested_distance() {
    let mut map = InfluenceMap::new(12, 12, Pos::new(0, 0));
    assert!(!map.compute(Some(4)));
    for (pos, square) in settled_snapshot(&map) {
        assert!(square.distance <= 4, "{pos:?} settled beyond budget");
    }
    assert_eq!(map.square(Pos::new(5, 5)).state, SquareState::Pending);
    assert!(map.compute(Some(20)));
}

#[test]
fn repeated_budgets_match_unbounded_compute() {
    let blocked = [Pos::new(3, 1), Pos::new(3, 2), Pos::new(3, 3), Pos::new(6, 5)];
    let mut incremental = InfluenceMap::new(9, 7, Pos::new(1, 1));
    let mut single = InfluenceMap::new(9, 7, Pos::new(1, 1));
    for pos in blocked {
        incremental.set_obstacle(pos, true);
        single.set_obstacle(pos, true);
    }
    let mut budget = 0;
    while !incremental.compute(Some(budget)) {
        budget += 1;
    }
    single.compute(None);
    assert_eq!(settled_snapshot(&incremental), settled_snapshot(&single));
}

#[test]
fn settled_squares_keep_values_across_later_rings() {
    let mut map = InfluenceMap::new(10, 10, Pos::new(4, 4));
    map.compute(Some(2));
    let early = settled_snapshot(&map);
    map.compute(None);
    for (pos, square) in early {
        assert_eq!(map.square(pos), square, "{pos:?} changed after settling");
    }
}

#[test]
fn unchanged_obstacle_flag_keeps_field() {
    let mut map = InfluenceMap::new(6, 6, Pos::new(0, 0));
    map.compute(None);
    map.set_obstacle(Pos::new(3, 3), false);
    assert!(map.is_complete());
    map.set_obstacle(Pos::new(3, 3), true);
    assert!(!map.is_complete());
}

#[test]
#[should_panic(expected = "outside")]
fn out_of_range_square_is_a_contract_violation() {
    let map = InfluenceMap::new(4, 4, Pos::new(0, 0));
    let _ = map.square(Pos::new(4, 0));
}

use specpick_core::{Candidate, CandidateNavigator};

fn navigator(len: usize) -> CandidateNavigator {
    #[allow(clippy::cast_precision_loss)]
    let positions = (0..len)
        .map(|i| Candidate::new(500.0 + 10.0 * i as f64, 1.0))
        .collect();
    CandidateNavigator::new(1, positions)
}

#[test]
fn test_clamp_then_advance() {
    let mut nav = navigator(3);
    nav.move_by(-5).unwrap();
    nav.move_by(1).unwrap();
    assert_eq!(nav.cursor(), Some(1));
}

#[test]
fn test_cursor_never_leaves_range() {
    let deltas = [1, 1, 1, 1, -2, 5, -7, 3, -1, 0, 100, -100];
    for len in 1..6 {
        let mut nav = navigator(len);
        for delta in deltas {
            let cursor = nav.move_by(delta).unwrap();
            assert!(cursor < len, "len {len}: cursor {cursor} after {delta}");
            assert!(nav.current().is_ok());
        }
    }
}

#[test]
fn test_seek_then_move() {
    let mut nav = navigator(4);
    assert_eq!(nav.seek_nearest(529.0).unwrap(), 3);
    assert_eq!(nav.move_by(1).unwrap(), 3);
    assert_eq!(nav.move_by(-2).unwrap(), 1);
}

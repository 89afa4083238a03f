mod common;

use common::GcodeFile;
use gmcode_camtools::helical_entry;
use gmcode_core::Vector;
use gmcode_machine::{Machine, Target};

#[test]
fn test_helical_entry() {
    for (clockwise, command) in [(true, "G2"), (false, "G3")] {
        let centre = Vector::new(-5.0, -6.0, -7.0);
        let start = centre + Vector::new(4.0, 5.0, 0.0).unit_vector().unwrap() * 4.0;
        let mut m = Machine::new(Vec::new());
        m.g0(Target::xy(start.x, start.y)).unwrap();

        helical_entry(&mut m, centre, centre.z, 0.5, clockwise).unwrap();
        assert_eq!(m.position(), Vector::new(start.x, start.y, centre.z));

        let file = GcodeFile::from_machine(m);
        let last = file.len() - 1;
        assert!(file.line_contains_word(last, command));
        assert!(file.line_contains_word(last, "P14"));
        assert_eq!(file.value(last, 'Z'), Some(-7.0));
        assert_eq!(file.value(last, 'I'), Some(-5.0));
        assert_eq!(file.value(last, 'J'), Some(-6.0));
        assert_eq!(file.comments(), ["helical entry start"]);
    }
}

#[test]
fn test_helical_entry_rounds_turns_up() {
    let mut m = Machine::new(Vec::new());
    m.g0(Target::xyz(3.0, 0.0, 0.0)).unwrap();
    helical_entry(&mut m, Vector::ZERO, -1.0, 0.3, true).unwrap();
    let file = GcodeFile::from_machine(m);
    assert_eq!(file.value(file.len() - 1, 'P'), Some(4.0));
}

#[test]
fn test_single_turn_omits_p() {
    let mut m = Machine::new(Vec::new());
    m.g0(Target::xyz(3.0, 0.0, 0.0)).unwrap();
    helical_entry(&mut m, Vector::ZERO, -0.2, 1.0, true).unwrap();
    let file = GcodeFile::from_machine(m);
    assert_eq!(file.value(file.len() - 1, 'P'), None);
    assert_eq!(file.value(file.len() - 1, 'Z'), Some(-0.2));
}

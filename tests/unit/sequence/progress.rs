use super::*;

#[test]
fn fraction_is_zero_before_begin() {
    let c = BuildControl::new();
    assert_eq!(c.progress(), (0, 0));
    assert_eq!(c.fraction(), 0.0);
}

#[test]
fn clones_share_counters() {
    let c = BuildControl::new();
    let observer = c.clone();
    c.begin(4).unwrap();
    assert_eq!(c.frame_done(), 1);
    assert_eq!(c.frame_done(), 2);
    assert_eq!(observer.progress(), (2, 4));
    assert_eq!(observer.fraction(), 0.5);

    observer.cancel();
    assert!(c.is_cancelled());
}

#[test]
fn counter_is_visible_across_threads() {
    let c = BuildControl::new();
    c.begin(100).unwrap();
    let worker = {
        let c = c.clone();
        std::thread::spawn(move || {
            for _ in 0..100 {
                c.frame_done();
            }
        })
    };

    let mut last = 0;
    loop {
        let (processed, total) = c.progress();
        assert!(processed >= last);
        assert_eq!(total, 100);
        last = processed;
        if worker.is_finished() {
            break;
        }
    }
    worker.join().unwrap();
    assert_eq!(c.progress(), (100, 100));
}

#[test]
fn a_control_only_starts_one_build() {
    let c = BuildControl::new();
    c.begin(2).unwrap();
    c.frame_done();

    let err = c.clone().begin(5).unwrap_err();
    assert!(matches!(err, PlysError::InvalidState(_)));
    assert_eq!(c.progress(), (1, 2));
}

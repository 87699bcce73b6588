use goroutine_stats::parser::{Event, EventType, Frame};
use goroutine_stats::stats::{goroutine_stats, StatCategory};
use goroutine_stats::utils::EngineError;
use pretty_assertions::assert_eq;

fn ev(kind: EventType, ts: i64, g: u64) -> Event {
    Event::new(kind, ts, g)
}

fn create(ts: i64, parent: u64, child: u64) -> Event {
    ev(EventType::GoCreate, ts, parent).with_args(&[child])
}

fn start(ts: i64, g: u64, func: &str) -> Event {
    ev(EventType::GoStart, ts, g).with_stack(vec![Frame::new(0x1000, func)])
}

fn unblock(ts: i64, by: u64, target: u64) -> Event {
    ev(EventType::GoUnblock, ts, by).with_args(&[target])
}

fn region(ts: i64, g: u64, task: u64, mode: u64, name: &str) -> Event {
    ev(EventType::UserRegion, ts, g)
        .with_args(&[task, mode])
        .with_sargs(&[name])
}

#[test]
fn test_syscall_round_trip() {
    let events = vec![
        create(0, 0, 1),
        start(10, 1, "main.worker"),
        ev(EventType::GoSysBlock, 30, 1),
        ev(EventType::GoSysExit, 70, 1),
        start(90, 1, "main.worker"),
        ev(EventType::GoEnd, 100, 1),
    ];

    let stats = goroutine_stats(&events).unwrap();
    let s = &stats[&1].stat;

    assert_eq!(s.exec_time.total, 30);
    assert_eq!(s.exec_time.count, 2);
    assert_eq!(s.syscall_time.total, 40);
    assert_eq!(s.sched_wait_time.total, 30);
    assert_eq!(s.sched_wait_time.count, 2);
    assert_eq!(s.total_time.total, 100);
    assert_eq!(s.unknown_time().total, 0);
}

#[test]
fn test_region_accumulates_only_its_own_window() {
    let events = vec![
        create(0, 0, 1),
        start(10, 1, "main.handler"),
        region(20, 1, 0, 0, "fetch"),
        ev(EventType::GoBlockNet, 40, 1),
        unblock(60, 0, 1),
        start(70, 1, "main.handler"),
        region(90, 1, 0, 1, "fetch"),
        ev(EventType::GoEnd, 100, 1),
    ];

    let stats = goroutine_stats(&events).unwrap();
    let g = &stats[&1];

    assert_eq!(g.stat.exec_time.total, 60);
    assert_eq!(g.stat.io_time.total, 20);
    assert_eq!(g.stat.sched_wait_time.total, 20);

    assert_eq!(g.regions.len(), 1);
    let r = &g.regions[0];
    assert_eq!(r.name, "fetch");
    assert_eq!(r.start_ts(), Some(20));
    assert_eq!(r.end_ts(), Some(90));
    assert_eq!(r.stat.total_time.total, 70);
    assert_eq!(r.stat.exec_time.total, 40);
    assert_eq!(r.stat.io_time.total, 20);
    assert_eq!(r.stat.sched_wait_time.total, 10);
}

#[test]
fn test_goroutine_never_started() {
    let events = vec![create(0, 0, 1), create(5, 0, 2), start(10, 2, "main.b")];

    let stats = goroutine_stats(&events).unwrap();
    let g = &stats[&1];

    assert_eq!(g.start_time, None);
    assert_eq!(g.end_time, None);
    assert_eq!(g.stat.exec_time.count, 0);
    assert_eq!(g.stat.sched_wait_time.total, 10);
    assert_eq!(g.stat.total_time.total, 10);
    assert!(g.regions.is_empty());
}

#[test]
fn test_lifetime_parts_never_exceed_total() {
    let events = vec![
        create(0, 0, 1),
        create(0, 0, 2),
        start(5, 1, "main.producer"),
        region(6, 1, 7, 0, "produce"),
        create(8, 1, 3),
        ev(EventType::GoBlockSend, 20, 1),
        start(21, 2, "main.consumer"),
        ev(EventType::GcStart, 25, 0),
        unblock(30, 2, 1),
        ev(EventType::GcSweepStart, 31, 2),
        ev(EventType::GcSweepDone, 35, 2),
        ev(EventType::GcDone, 40, 0),
        ev(EventType::GoSched, 45, 2),
        start(46, 1, "main.producer"),
        region(50, 1, 7, 1, "produce"),
        ev(EventType::GoSleep, 60, 1),
        start(61, 3, "main.child"),
        ev(EventType::GoEnd, 80, 3),
        unblock(90, 0, 1),
    ];

    let stats = goroutine_stats(&events).unwrap();
    assert_eq!(stats.len(), 3);

    for g in stats.values() {
        let s = &g.stat;
        let parts: i64 = StatCategory::LIFETIME_PARTS
            .iter()
            .map(|c| s.entry(*c).total)
            .sum();
        assert!(parts <= s.total_time.total, "goroutine {}", g.id);
        assert!(s.gc_time.total <= s.total_time.total, "goroutine {}", g.id);

        for r in &g.regions {
            for c in StatCategory::ALL {
                assert!(r.stat.entry(c).total >= 0, "goroutine {} region {}", g.id, r.name);
            }
        }
    }

    // Child inherits task 7 from its creator's open region.
    let child = &stats[&3];
    assert_eq!(child.regions.len(), 1);
    assert_eq!(child.regions[0].task_id, 7);
    assert_eq!(child.regions[0].name, "");
    assert_eq!(child.end_time, Some(80));
}

#[test]
fn test_unknown_goroutine_is_an_error() {
    let events = vec![start(10, 9, "main.ghost")];

    let err = goroutine_stats(&events).unwrap_err();
    assert_eq!(
        err,
        EngineError::UnknownGoroutine {
            goroutine: 9,
            ts: 10,
            kind: EventType::GoStart,
        }
    );
}

#[test]
fn test_unknown_event_kinds_are_ignored() {
    let raw = serde_json::json!([
        {"type": "go-create", "ts": 0, "g": 0, "args": [1]},
        {"type": "proc-start", "ts": 1, "g": 0},
        {"type": "go-start", "ts": 2, "g": 1},
        {"type": "go-end", "ts": 5, "g": 1}
    ]);
    let events = goroutine_stats::parser::parse_events(&raw).unwrap();

    let stats = goroutine_stats(&events).unwrap();
    assert_eq!(stats[&1].stat.exec_time.total, 3);
}

#[test]
fn test_gc_window_charged_by_overlap_with_lifetime() {
    let events = vec![
        create(0, 0, 1),
        ev(EventType::GcStart, 1000, 0),
        create(1500, 0, 2),
        ev(EventType::GcDone, 2000, 0),
    ];

    let stats = goroutine_stats(&events).unwrap();
    let window = 1000;
    let before = stats[&1].stat.gc_time.total;
    let inside = stats[&2].stat.gc_time.total;

    assert_eq!(before, 1000);
    assert_eq!(inside, 500);
    assert!(inside < window);
    assert!(before + inside <= window * stats.len() as i64);
    assert_eq!(stats[&2].stat.gc_time.count, 1);
}

#[test]
fn test_sibling_regions_fit_inside_enclosing_region() {
    let events = vec![
        create(0, 0, 1),
        start(10, 1, "main.handler"),
        region(20, 1, 0, 0, "outer"),
        region(30, 1, 0, 0, "decode"),
        ev(EventType::GoBlockRecv, 40, 1),
        unblock(50, 0, 1),
        start(55, 1, "main.handler"),
        region(60, 1, 0, 1, "decode"),
        ev(EventType::GcStart, 65, 0),
        region(70, 1, 0, 0, "encode"),
        ev(EventType::GcDone, 80, 0),
        region(90, 1, 0, 1, "encode"),
        region(100, 1, 0, 1, "outer"),
        ev(EventType::GoEnd, 110, 1),
    ];

    let stats = goroutine_stats(&events).unwrap();
    let g = &stats[&1];
    let find = |name: &str| g.regions.iter().find(|r| r.name == name).unwrap();
    let (outer, decode, encode) = (find("outer"), find("decode"), find("encode"));

    assert_eq!(outer.stat.total_time.total, 80);
    assert_eq!(decode.stat.total_time.total, 30);
    assert_eq!(decode.stat.exec_time.total, 15);
    assert_eq!(decode.stat.block_time.total, 10);
    assert_eq!(decode.stat.sched_wait_time.total, 5);
    assert_eq!(encode.stat.total_time.total, 20);
    assert_eq!(encode.stat.gc_time.total, 10);

    assert!(decode.stat.total_time.total + encode.stat.total_time.total <= outer.stat.total_time.total);
    for c in StatCategory::ALL {
        assert!(decode.stat.entry(c).total + encode.stat.entry(c).total <= outer.stat.entry(c).total);
        for r in &g.regions {
            assert!(r.stat.entry(c).total >= 0, "region {} {:?}", r.name, c);
        }
    }
}

#[test]
fn test_unblock_during_syscall_is_an_error() {
    let events = vec![
        create(0, 0, 1),
        start(10, 1, "main.reader"),
        ev(EventType::GoSysBlock, 20, 1),
        unblock(30, 0, 1),
    ];

    let err = goroutine_stats(&events).unwrap_err();
    assert_eq!(err, EngineError::UnblockDuringSyscall { goroutine: 1, ts: 30 });
}

#[test]
fn test_start_straight_out_of_network_wait() {
    let events = vec![
        create(0, 0, 1),
        start(10, 1, "main.poller"),
        ev(EventType::GoBlockNet, 20, 1),
        start(45, 1, "main.poller"),
        ev(EventType::GoEnd, 50, 1),
    ];

    let stats = goroutine_stats(&events).unwrap();
    let s = &stats[&1].stat;

    assert_eq!(s.io_time.total, 25);
    assert_eq!(s.exec_time.total, 15);
    assert_eq!(s.unknown_time().total, 0);
}

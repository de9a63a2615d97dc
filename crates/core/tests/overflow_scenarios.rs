//! End-to-end overflow scenarios: static slots, ISR servicing, clock reads and
//! deadline notification driven the way the firmware interrupt handlers do.

use flextick_core::{
    service_overflow, DeadlineState, DeadlineTimer, MockDispatchQueue, MockTickSource,
    MonotonicClock, TickSource, TickSpec, TimerSlot,
};

type MockClock = MonotonicClock<&'static MockTickSource>;
type MockDeadline = DeadlineTimer<&'static MockTickSource>;

/// Advances a mock counter and delivers one ISR per wrap.
fn run_ticks<T>(slot: &TimerSlot<T>, source: &MockTickSource, ticks: u64)
where
    T: flextick_core::OverflowHandler + 'static,
{
    let wraps = source.advance(ticks);
    for _ in 0..wraps {
        source.raise_overflow();
        assert!(service_overflow(slot, source));
    }
}

#[test]
fn deadline_at_5000us_fires_once() {
    // 1 ns ticks, 20 us per overflow
    static SOURCE: MockTickSource = MockTickSource::new(TickSpec::new(1_000, 20_000));
    static QUEUE: MockDispatchQueue = MockDispatchQueue::new();
    static TIMER: TimerSlot<MockDeadline> = TimerSlot::new();

    let timer = TIMER.instantiate(|| DeadlineTimer::new(&SOURCE, &QUEUE));

    // 249 overflows + 10 us = 4990 us
    run_ticks(&TIMER, &SOURCE, 249 * 20_000 + 10_000);
    assert_eq!(timer.read_us(), 4_990);

    critical_section::with(|cs| timer.set_next_deadline_us(cs, 5_000));

    // One overflow moves the base to 5000 us; live count adds 10 us
    run_ticks(&TIMER, &SOURCE, 20_000);
    assert_eq!(timer.read_us(), 5_010);
    assert_eq!(QUEUE.notifications(), 1);
    assert_eq!(
        critical_section::with(|cs| timer.state(cs)),
        DeadlineState::Empty
    );

    // No new deadline, no new notification
    run_ticks(&TIMER, &SOURCE, 20_000);
    assert_eq!(QUEUE.notifications(), 1);
}

#[test]
fn rearm_after_fire_notifies_again_only_for_new_deadline() {
    static SOURCE: MockTickSource = MockTickSource::new(TickSpec::new(1_000, 20_000));
    static QUEUE: MockDispatchQueue = MockDispatchQueue::new();
    static TIMER: TimerSlot<MockDeadline> = TimerSlot::new();

    let timer = TIMER.instantiate(|| DeadlineTimer::new(&SOURCE, &QUEUE));

    critical_section::with(|cs| timer.set_next_deadline_us(cs, 100));
    run_ticks(&TIMER, &SOURCE, 5 * 20_000);
    assert_eq!(QUEUE.notifications(), 1);

    critical_section::with(|cs| timer.set_next_deadline_us(cs, 200));
    run_ticks(&TIMER, &SOURCE, 4 * 20_000);
    assert_eq!(QUEUE.notifications(), 1);
    run_ticks(&TIMER, &SOURCE, 20_000);
    assert_eq!(QUEUE.notifications(), 2);
}

#[test]
fn clock_extends_counter_through_isr_path() {
    // 60 MHz, 16-bit counter
    static SOURCE: MockTickSource = MockTickSource::new(TickSpec::new(16_667, 65_536));
    static CLOCK: TimerSlot<MockClock> = TimerSlot::new();

    let clock = CLOCK.instantiate(|| MonotonicClock::new(&SOURCE));

    let n = 10_000u64;
    run_ticks(&CLOCK, &SOURCE, n * 65_536 + 123);

    let spec = SOURCE.spec();
    let expected = (spec.picos_per_tick as u128 * (n * 65_536 + 123) as u128 / 1_000_000) as u64;
    assert_eq!(clock.read_us(), expected);
    assert_eq!(SOURCE.clear_count() as u64, n);
}

#[test]
fn reads_are_monotonic_with_interleaved_interrupts() {
    static SOURCE: MockTickSource = MockTickSource::new(TickSpec::new(266_667, 65_536));
    static CLOCK: TimerSlot<MockClock> = TimerSlot::new();

    let clock = CLOCK.instantiate(|| MonotonicClock::new(&SOURCE));

    let mut last = 0;
    let mut step = 1u64;
    for _ in 0..200 {
        run_ticks(&CLOCK, &SOURCE, step);
        let now = clock.read_us();
        assert!(now >= last, "clock went backwards: {} -> {}", last, now);
        last = now;
        step = (step * 7 + 13) % 150_000;
    }
}

#[test]
fn second_instantiate_keeps_armed_deadline() {
    // 1 us per overflow
    static SOURCE: MockTickSource = MockTickSource::new(TickSpec::new(1_000, 1_000));
    static OTHER_SOURCE: MockTickSource = MockTickSource::new(TickSpec::new(2_000, 500));
    static QUEUE: MockDispatchQueue = MockDispatchQueue::new();
    static OTHER_QUEUE: MockDispatchQueue = MockDispatchQueue::new();
    static TIMER: TimerSlot<MockDeadline> = TimerSlot::new();

    let first = TIMER.instantiate(|| DeadlineTimer::new(&SOURCE, &QUEUE));
    critical_section::with(|cs| first.set_next_deadline_us(cs, 3));
    run_ticks(&TIMER, &SOURCE, 1_000);

    let mut ran = false;
    let second = TIMER.instantiate(|| {
        ran = true;
        DeadlineTimer::new(&OTHER_SOURCE, &OTHER_QUEUE)
    });

    assert!(!ran);
    assert!(core::ptr::eq(first, second));
    assert_eq!(second.source().spec(), SOURCE.spec());
    critical_section::with(|cs| {
        assert_eq!(second.state(cs), DeadlineState::Armed(3));
        assert_eq!(second.base_ticks(cs), 1_000);
    });

    run_ticks(&TIMER, &SOURCE, 2_000);
    assert_eq!(QUEUE.notifications(), 1);
    assert_eq!(OTHER_QUEUE.notifications(), 0);
    assert_eq!(
        critical_section::with(|cs| second.state(cs)),
        DeadlineState::Empty
    );
}

#[test]
fn overflow_before_instantiation_is_dropped() {
    static SOURCE: MockTickSource = MockTickSource::new(TickSpec::new(1_000, 1_000));
    static CLOCK: TimerSlot<MockClock> = TimerSlot::new();

    SOURCE.raise_overflow();
    assert!(!service_overflow(&CLOCK, &SOURCE));
    assert_eq!(SOURCE.clear_count(), 1);

    let clock = CLOCK.instantiate(|| MonotonicClock::new(&SOURCE));
    assert_eq!(critical_section::with(|cs| clock.base_ticks(cs)), 0);
}

#[test]
fn independent_timers_keep_independent_bases() {
    static CLOCK_SOURCE: MockTickSource = MockTickSource::new(TickSpec::new(16_667, 65_536));
    static DEADLINE_SOURCE: MockTickSource = MockTickSource::new(TickSpec::new(266_667, 65_536));
    static QUEUE: MockDispatchQueue = MockDispatchQueue::new();
    static CLOCK: TimerSlot<MockClock> = TimerSlot::new();
    static DEADLINE: TimerSlot<MockDeadline> = TimerSlot::new();

    let clock = CLOCK.instantiate(|| MonotonicClock::new(&CLOCK_SOURCE));
    let deadline = DEADLINE.instantiate(|| DeadlineTimer::new(&DEADLINE_SOURCE, &QUEUE));

    run_ticks(&CLOCK, &CLOCK_SOURCE, 3 * 65_536);
    run_ticks(&DEADLINE, &DEADLINE_SOURCE, 65_536);

    critical_section::with(|cs| {
        assert_eq!(clock.base_ticks(cs), 3 * 65_536);
        assert_eq!(deadline.base_ticks(cs), 65_536);
    });
    assert_eq!(CLOCK_SOURCE.clear_count(), 3);
    assert_eq!(DEADLINE_SOURCE.clear_count(), 1);
}
